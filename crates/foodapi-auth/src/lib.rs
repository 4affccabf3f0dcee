//! # foodapi-auth
//!
//! Authentication and session lifecycle for the Food API.
//!
//! ## Modules
//!
//! - `jwt`: signed access/refresh token creation and verification
//! - `gate`: bearer-header check in front of protected routes
//! - `password`: Argon2id password hashing and verification
//! - `session`: login, logout, and refresh-with-rotation over the session store

pub mod gate;
pub mod jwt;
pub mod password;
pub mod session;

pub use gate::AuthGate;
pub use jwt::{AccessDetails, JwtDecoder, JwtEncoder, TokenDetails};
pub use password::PasswordHasher;
pub use session::{LoginResult, SessionManager, TokenSessions};
