//! Messaging service implementation
//!
//! Direct messages between users scoped to an event, with conversation
//! summaries and read tracking.

use tracing::debug;

use crate::database::repositories::{EventRepository, MessageRepository, UserRepository};
use crate::models::message::{Conversation, Message, SendMessageRequest};
use crate::models::user::User;
use crate::utils::errors::{EventFlowError, Result};

#[derive(Clone)]
pub struct MessageService {
    messages: MessageRepository,
    events: EventRepository,
    users: UserRepository,
}

impl MessageService {
    pub fn new(
        messages: MessageRepository,
        events: EventRepository,
        users: UserRepository,
    ) -> Self {
        Self {
            messages,
            events,
            users,
        }
    }

    /// Send a message within an event
    pub async fn send(
        &self,
        sender: &User,
        event_id: i64,
        request: SendMessageRequest,
    ) -> Result<Message> {
        if request.recipient_id == sender.id {
            return Err(EventFlowError::InvalidInput(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound { event_id })?;

        self.users
            .find_by_id(request.recipient_id)
            .await?
            .ok_or(EventFlowError::UserNotFound {
                user_id: request.recipient_id,
            })?;

        let message = self
            .messages
            .create(event_id, sender.id, request.recipient_id, &request.body)
            .await?;

        debug!(
            event_id = event_id,
            sender_id = sender.id,
            recipient_id = request.recipient_id,
            "Message sent"
        );
        Ok(message)
    }

    /// Conversation summaries for the caller within an event
    pub async fn conversations(&self, caller: &User, event_id: i64) -> Result<Vec<Conversation>> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound { event_id })?;

        self.messages.conversations(event_id, caller.id).await
    }

    /// Full thread with one counterparty; fetching it marks their messages
    /// to the caller as read.
    pub async fn thread(
        &self,
        caller: &User,
        event_id: i64,
        counterparty_id: i64,
    ) -> Result<Vec<Message>> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(EventFlowError::EventNotFound { event_id })?;

        self.messages
            .mark_read(event_id, caller.id, counterparty_id)
            .await?;
        self.messages
            .thread(event_id, caller.id, counterparty_id)
            .await
    }
}
