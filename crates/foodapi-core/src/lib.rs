//! # foodapi-core
//!
//! Core crate for the Food API. Contains the unified error system,
//! configuration schemas, the collaborator traits injected into the
//! session subsystem, and the user entity.
//!
//! This crate has **no** internal dependencies on other Food API crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
