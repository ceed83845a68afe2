//! Storage contracts and built-in backends for the persisted session tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::SessionTokens};

/// Persisted storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "token";
/// Persisted storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh";

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for the session token pair.
///
/// Implementations stand in for whatever durable storage the embedding application uses
/// (a browser's local storage, a config directory, a keyring). The client only ever holds
/// one session, so the contract is a single slot rather than a keyed map.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Fetches the current token pair, if a session exists.
	fn load(&self) -> StoreFuture<'_, Option<SessionTokens>>;

	/// Persists or replaces the current token pair.
	fn save(&self, tokens: SessionTokens) -> StoreFuture<'_, ()>;

	/// Removes any persisted tokens.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
