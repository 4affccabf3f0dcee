//! # foodapi-cache
//!
//! Session store implementations for the Food API. Supports two modes:
//!
//! - **redis**: production backend using the [redis](https://crates.io/crates/redis) crate
//! - **memory**: in-process backend with an injectable clock, used in tests
//!
//! The backend is selected at runtime based on configuration.

#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::SessionBackend;
