//! Access/refresh token pair persisted between requests.

// self
use crate::{_prelude::*, auth::secret::TokenSecret};

/// Token pair for the current session.
///
/// The serde representation uses the persisted storage keys `token` and `refresh`, so a
/// serialized value matches the shape file-backed stores write to disk.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
	/// Short-lived access token attached as `Authorization: Bearer <token>`.
	#[serde(rename = "token")]
	pub access: TokenSecret,
	/// Longer-lived refresh token, absent once the session can no longer be recovered.
	#[serde(rename = "refresh", default, skip_serializing_if = "Option::is_none")]
	pub refresh: Option<TokenSecret>,
}
impl SessionTokens {
	/// Creates a new token pair.
	pub fn new(access: TokenSecret, refresh: Option<TokenSecret>) -> Self {
		Self { access, refresh }
	}

	/// Builds the pair left behind by a refresh call.
	///
	/// Servers may rotate the refresh token; when the response omits one, the previous
	/// refresh secret stays valid and is carried over.
	pub fn rotated(&self, access: TokenSecret, refresh: Option<TokenSecret>) -> Self {
		Self { access, refresh: refresh.or_else(|| self.refresh.clone()) }
	}

	/// Returns `true` when a refresh secret is available for session recovery.
	pub fn has_refresh(&self) -> bool {
		self.refresh.is_some()
	}
}
impl Debug for SessionTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionTokens")
			.field("access", &"<redacted>")
			.field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}
