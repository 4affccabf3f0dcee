//! Session lifecycle management: login, logout, and refresh with rotation.

pub mod manager;
pub mod store;

pub use manager::{LoginResult, SessionManager};
pub use store::TokenSessions;
