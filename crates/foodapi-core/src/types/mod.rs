//! Shared domain types.

pub mod user;

pub use user::User;
