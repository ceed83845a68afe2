//! The authenticated request client and its request-side helpers.

pub mod common;
pub mod refresh;

mod request;

pub use common::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::HttpTransport,
	nav::{Navigator, NoopNavigator},
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Issues API requests with the current access token attached and transparently recovers
/// from token expiry.
///
/// The client owns its transport, session store, navigator, and single-flight refresh
/// gate, so independent instances never share refresh state. All collaborators sit behind
/// `Arc`s; cloning the client is cheap and clones observe the same session.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Persistence collaborator holding the session token pair.
	pub store: Arc<dyn SessionStore>,
	/// Navigation collaborator fired on forced logout.
	pub navigator: Arc<dyn Navigator>,
	/// Base URL the relative API paths are appended to.
	pub base_url: Url,
	/// Counters for session-recovery attempts on this instance.
	pub refresh_metrics: Arc<RefreshMetrics>,
	pub(crate) refresh_gate: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		base_url: impl AsRef<str>,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn SessionStore>,
	) -> Result<Self> {
		let base_url = Url::parse(base_url.as_ref())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Ok(Self {
			transport: transport.into(),
			store,
			navigator: Arc::new(NoopNavigator),
			base_url,
			refresh_metrics: Default::default(),
			refresh_gate: Default::default(),
		})
	}

	/// Sets or replaces the navigator that receives forced-logout redirects.
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = navigator;

		self
	}

	/// Resolves a relative API path against the base URL.
	///
	/// Paths are appended verbatim, so query strings survive (`/movies/?search=x`).
	pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
		let raw = format!("{}{path}", self.base_url.as_str().trim_end_matches('/'));

		Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidPath { path: path.into(), source }.into())
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	///
	/// Use [`ApiClient::with_transport`] to supply a [`ReqwestClient`] with custom
	/// timeouts or TLS settings.
	pub fn new(base_url: impl AsRef<str>, store: Arc<dyn SessionStore>) -> Result<Self> {
		Self::with_transport(base_url, ReqwestTransport::default(), store)
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			store: self.store.clone(),
			navigator: self.navigator.clone(),
			base_url: self.base_url.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_gate: self.refresh_gate.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient").field("base_url", &self.base_url.as_str()).finish()
	}
}
