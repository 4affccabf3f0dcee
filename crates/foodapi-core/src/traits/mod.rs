//! Collaborator traits defined in `foodapi-core` and implemented by other crates.

pub mod clock;
pub mod session_store;
pub mod user_repository;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session_store::SessionStore;
pub use user_repository::UserRepository;
