//! Session recovery: single-flight refresh with request coalescing.
//!
//! Every authenticated request that sees a `401` funnels into
//! [`ApiClient::recover_session`]. The first caller through the per-instance gate
//! performs the one `POST /auth/refresh/` call; callers that arrive while it is in
//! flight park on the gate and observe the outcome through the session store. A rotated
//! access token means success (reuse it, no second refresh call); a cleared store means
//! the refresh failed and the session is over. Each waiter settles exactly once.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use http::{HeaderValue, header::CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::{
		SessionTokens, TokenSecret,
		wire::{RefreshRequest, RefreshResponse},
	},
	client::ApiClient,
	error::ConfigError,
	http::{ApiRequest, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Recovers the session after an authenticated `401`, returning the access token the
	/// original request must be replayed with.
	///
	/// `stale` is the access token that earned the `401` (`None` when the request went
	/// out without one). On an unrecoverable failure the persisted tokens are cleared,
	/// the navigator fires, and the caller receives [`Error::SessionExpired`].
	pub(crate) async fn recover_session(
		&self,
		stale: Option<&TokenSecret>,
	) -> Result<TokenSecret> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "recover_session");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.recover_session_inner(stale)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn recover_session_inner(&self, stale: Option<&TokenSecret>) -> Result<TokenSecret> {
		self.refresh_metrics.record_attempt();

		// A session without a refresh secret is unrecoverable; fail before queueing on
		// the gate so the refresh endpoint is never called.
		match self.store.load().await? {
			Some(tokens) if tokens.has_refresh() => {},
			_ => {
				self.refresh_metrics.record_failure();
				self.force_logout().await;

				return Err(Error::SessionExpired);
			},
		}

		// Single flight: the winner refreshes, everyone else parks here.
		let _flight = self.refresh_gate.lock().await;
		let current = match self.store.load().await? {
			Some(tokens) => tokens,
			// The in-flight refresh failed and cleared the session while we waited.
			None => {
				self.refresh_metrics.record_failure();

				return Err(Error::SessionExpired);
			},
		};

		// A different access token than the one that earned the 401 means another flight
		// already rotated the session; reuse it without a second refresh call.
		if let Some(stale) = stale {
			if current.access != *stale {
				self.refresh_metrics.record_success();

				return Ok(current.access);
			}
		}

		let Some(refresh) = current.refresh.clone() else {
			self.refresh_metrics.record_failure();
			self.force_logout().await;

			return Err(Error::SessionExpired);
		};

		match self.call_refresh_endpoint(&current, &refresh).await {
			Ok(rotated) => {
				self.store.save(rotated.clone()).await?;
				self.refresh_metrics.record_success();

				Ok(rotated.access)
			},
			// Any failure here (network, non-2xx, malformed payload) ends the session for
			// this caller and every parked one.
			Err(_) => {
				self.refresh_metrics.record_failure();
				self.force_logout().await;

				Err(Error::SessionExpired)
			},
		}
	}

	async fn call_refresh_endpoint(
		&self,
		current: &SessionTokens,
		refresh: &TokenSecret,
	) -> Result<SessionTokens> {
		let url = self.endpoint("/auth/refresh/")?;
		let body = serde_json::to_vec(&RefreshRequest { refresh: refresh.reveal() })
			.map_err(|source| ConfigError::SerializeBody { source })?;
		let mut request = ApiRequest::new(Method::POST, url);

		request.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		request.body = Some(body);

		let response = self.transport.execute(request).await?;

		if !response.is_success() {
			return Err(Error::SessionExpired);
		}

		let payload: RefreshResponse = response.json()?;

		Ok(current.rotated(TokenSecret::new(payload.access), payload.refresh.map(TokenSecret::new)))
	}

	/// Clears the persisted session and fires the login redirect.
	///
	/// Store failures are ignored here; they must not mask the session error the caller
	/// is about to receive.
	pub(crate) async fn force_logout(&self) {
		let _ = self.store.clear().await;

		self.navigator.redirect_to_login();
	}
}
