//! Data models
//!
//! Plain records mirroring the database schema, plus the request bodies
//! accepted by the API.

pub mod event;
pub mod guest;
pub mod message;
pub mod moderation;
pub mod notification;
pub mod user;

pub use event::{
    CreateEventRequest, Event, EventListQuery, EventState, EventVisibility, UpdateEventRequest,
};
pub use guest::{CreateGuestRequest, Guest, RsvpStatus, UpdateGuestRequest};
pub use message::{
    Announcement, Conversation, CreateAnnouncementRequest, Message, SendMessageRequest,
};
pub use moderation::{
    BanUserRequest, CreateReportRequest, Penalty, Report, ReportStatus, ReviewReportRequest,
};
pub use notification::{DeviceToken, SubscribeRequest, UnsubscribeRequest};
pub use user::{
    GoogleLoginRequest, LoginRequest, RegisterRequest, User, UserProfile, UserRole,
};
