//! Database service layer
//!
//! Bundles the per-aggregate repositories behind a single handle.

use crate::database::{
    DatabasePool, EventRepository, GuestRepository, MessageRepository, ModerationRepository,
    NotificationRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub events: EventRepository,
    pub guests: GuestRepository,
    pub messages: MessageRepository,
    pub moderation: ModerationRepository,
    pub notifications: NotificationRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            guests: GuestRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            moderation: ModerationRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn health_check(&self) -> bool {
        super::connection::health_check(&self.pool).await.is_ok()
    }
}
