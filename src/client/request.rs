//! Raw request path: bearer attachment, 401 recovery, replay, and the auth operations.

// crates.io
use http::{HeaderValue, header::AUTHORIZATION};
// self
use crate::{
	_prelude::*,
	auth::{
		SessionTokens, TokenSecret,
		wire::{AuthFailure, LoginRequest, LoginResponse},
	},
	client::{ApiClient, common::RequestOptions},
	error::ConfigError,
	http::{ApiRequest, ApiResponse, HttpTransport},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Issues a request against a relative API path, transparently recovering from token
	/// expiry.
	///
	/// Unless [`RequestOptions::skip_auth`] is set, the current access token is attached
	/// as `Authorization: Bearer <token>`. A `401` on an authenticated request triggers
	/// the single-flight refresh protocol and exactly one replay under the new token;
	/// every other response, non-2xx statuses included, is returned unmodified for the
	/// caller to interpret. A second `401` after the replay is such a response: it
	/// propagates verbatim, so there is no retry loop.
	pub async fn request(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "request");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.dispatch(path, options)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn dispatch(&self, path: &str, options: RequestOptions) -> Result<ApiResponse> {
		let url = self.endpoint(path)?;
		let attached = if options.skip_auth {
			None
		} else {
			self.store.load().await?.map(|tokens| tokens.access)
		};
		let mut headers = options.headers.clone();

		if let Some(access) = &attached {
			headers.insert(AUTHORIZATION, bearer_value(access)?);
		}

		let first = self
			.transport
			.execute(ApiRequest {
				method: options.method.clone(),
				url: url.clone(),
				headers: headers.clone(),
				body: options.body.clone(),
			})
			.await?;

		// Only an authenticated 401 enters the recovery protocol.
		if options.skip_auth || first.status() != StatusCode::UNAUTHORIZED {
			return Ok(first);
		}

		let access = self.recover_session(attached.as_ref()).await?;

		headers.insert(AUTHORIZATION, bearer_value(&access)?);

		let replay = self
			.transport
			.execute(ApiRequest { method: options.method, url, headers, body: options.body })
			.await?;

		Ok(replay)
	}

	/// Issues a `GET` request.
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.request(path, RequestOptions::new(Method::GET)).await
	}

	/// Issues a `POST` request with `body` serialized as JSON.
	pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(path, RequestOptions::new(Method::POST).json(body)?).await
	}

	/// Issues a `PATCH` request with `body` serialized as JSON.
	pub async fn patch<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(path, RequestOptions::new(Method::PATCH).json(body)?).await
	}

	/// Issues a `DELETE` request.
	pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
		self.request(path, RequestOptions::new(Method::DELETE)).await
	}

	/// Authenticates against `POST /auth/login/` and persists the issued token pair.
	///
	/// A rejection surfaces as [`Error::LoginRejected`] carrying the server's `detail`
	/// string (or the raw body when the payload has another shape).
	pub async fn login(&self, username: &str, password: &str) -> Result<SessionTokens> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let options = RequestOptions::new(Method::POST)
					.json(&LoginRequest { username, password })?
					.skip_auth();
				let response = self.dispatch("/auth/login/", options).await?;

				if !response.is_success() {
					let detail = response
						.json::<AuthFailure>()
						.map(|failure| failure.detail)
						.unwrap_or_else(|_| response.text());

					return Err(Error::LoginRejected { detail });
				}

				let grant: LoginResponse = response.json()?;
				let tokens = SessionTokens::new(
					TokenSecret::new(grant.access),
					Some(TokenSecret::new(grant.refresh)),
				);

				self.store.save(tokens.clone()).await?;

				Ok(tokens)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Clears the persisted session and sends the user to the login view.
	pub async fn logout(&self) -> Result<()> {
		self.store.clear().await?;
		self.navigator.redirect_to_login();

		Ok(())
	}
}

/// Formats an access token as a sensitive `Authorization` header value.
pub(crate) fn bearer_value(access: &TokenSecret) -> Result<HeaderValue> {
	let mut value = HeaderValue::from_str(&format!("Bearer {}", access.reveal()))
		.map_err(http::Error::from)
		.map_err(ConfigError::from)?;

	value.set_sensitive(true);

	Ok(value)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn bearer_value_is_sensitive_and_well_formed() {
		let value = bearer_value(&TokenSecret::new("A1")).expect("Header value should build.");

		assert!(value.is_sensitive());
		assert_eq!(value.to_str().expect("Bearer header should be ASCII."), "Bearer A1");
	}
}
