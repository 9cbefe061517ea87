//! Database repositories module
//!
//! One repository per aggregate, each owning its SQL.

pub mod event;
pub mod guest;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod user;

pub use event::EventRepository;
pub use guest::GuestRepository;
pub use message::MessageRepository;
pub use moderation::ModerationRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;
