//! JWT token encoding, decoding, and claims management.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessDetails, TokenDetails, VerifiedAccess, VerifiedRefresh, refresh_id_for};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
