//! Serde payloads exchanged with the `/auth/login/` and `/auth/refresh/` endpoints.

// self
use crate::_prelude::*;

/// Credentials submitted to `POST /auth/login/`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest<'a> {
	/// Account username.
	pub username: &'a str,
	/// Account password.
	pub password: &'a str,
}

/// Successful login response: a fresh access/refresh pair.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
	/// Newly issued access token.
	pub access: String,
	/// Newly issued refresh token.
	pub refresh: String,
}

/// Error payload returned by the auth endpoints on rejection.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthFailure {
	/// Human-readable rejection reason.
	pub detail: String,
}

/// Refresh token submitted to `POST /auth/refresh/`.
#[derive(Clone, Debug, Serialize)]
pub struct RefreshRequest<'a> {
	/// Current refresh token.
	pub refresh: &'a str,
}

/// Successful refresh response.
///
/// The refresh field is only present when the server rotates refresh tokens.
#[derive(Clone, Debug, Deserialize)]
pub struct RefreshResponse {
	/// Newly issued access token.
	pub access: String,
	/// Rotated refresh token, when the server issues one.
	#[serde(default)]
	pub refresh: Option<String>,
}
