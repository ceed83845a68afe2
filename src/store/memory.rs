//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::SessionTokens,
	store::{SessionStore, StoreFuture},
};

type Slot = Arc<RwLock<Option<SessionTokens>>>;

/// Keeps the session in-process; nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store pre-seeded with an existing session, useful in tests.
	pub fn with_tokens(tokens: SessionTokens) -> Self {
		Self(Arc::new(RwLock::new(Some(tokens))))
	}

	/// Returns a copy of the current session without going through the async contract.
	pub fn snapshot(&self) -> Option<SessionTokens> {
		self.0.read().clone()
	}
}
impl SessionStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<SessionTokens>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, tokens: SessionTokens) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(tokens);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = None;

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TokenSecret;

	#[tokio::test]
	async fn save_load_clear_round_trip() {
		let store = MemoryStore::default();

		assert!(store.load().await.expect("Empty store load should succeed.").is_none());

		let tokens = SessionTokens::new(TokenSecret::new("A1"), Some(TokenSecret::new("R1")));

		store.save(tokens.clone()).await.expect("Store save should succeed.");

		let loaded = store
			.load()
			.await
			.expect("Store load should succeed.")
			.expect("Saved session should be present.");

		assert_eq!(loaded, tokens);

		store.clear().await.expect("Store clear should succeed.");

		assert!(store.snapshot().is_none());
	}
}
