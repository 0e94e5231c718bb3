//! Google Calendar as an event source for gcal2diary.
//!
//! - `credentials`: the OAuth client downloaded from the Cloud console
//! - `token`: persisted access/refresh tokens
//! - `auth`: browser consent flow and token refresh
//! - `api`: paginated listing of a calendar's events

pub mod api;
pub mod auth;
pub mod credentials;
pub mod token;

pub use api::GoogleCalendarSource;
pub use credentials::Credentials;
pub use token::Token;
