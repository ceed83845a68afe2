//! Session token models and wire payloads for the auth endpoints.

pub mod secret;
pub mod tokens;
pub mod wire;

pub use secret::*;
pub use tokens::*;
