//! Navigation collaborator fired when the session can no longer be recovered.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// self
use crate::_prelude::*;

/// Receives the forced-logout redirect.
///
/// In a browser shell this navigates to the login view; in a headless embedding it can
/// prompt for credentials or simply record that the session ended. The client calls
/// [`redirect_to_login`](Navigator::redirect_to_login) exactly once per forced logout,
/// after the persisted tokens have been cleared.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Sends the user to the login view.
	fn redirect_to_login(&self);
}

/// Default [`Navigator`] that ignores redirects; suitable for embeddings without a UI.
#[derive(Clone, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect_to_login(&self) {}
}

/// Test double that counts redirects instead of performing them.
#[derive(Debug, Default)]
pub struct RecordingNavigator(AtomicUsize);
impl RecordingNavigator {
	/// Creates a shareable recording navigator.
	pub fn shared() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Returns how many times the login redirect has fired.
	pub fn visits(&self) -> usize {
		self.0.load(Ordering::Relaxed)
	}
}
impl Navigator for RecordingNavigator {
	fn redirect_to_login(&self) {
		self.0.fetch_add(1, Ordering::Relaxed);
	}
}
