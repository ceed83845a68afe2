//! Transport primitives for API requests.
//!
//! The module exposes [`HttpTransport`] alongside the [`ApiRequest`]/[`ApiResponse`] pair
//! so downstream crates can integrate custom HTTP clients. The trait is the client's only
//! dependency on an HTTP stack: implementations execute one request, buffer the body, and
//! map their native failures into [`TransportError`]. Status interpretation (the 401
//! recovery protocol included) stays in the request client, never in the transport.

pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{DecodeError, TransportError},
};

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing catalog API requests.
///
/// Implementations must be `Send + Sync + 'static` so they can sit behind `Arc<T>` and be
/// shared across client instances, and the returned futures must be `Send` so callers can
/// hop executors freely.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes the request and buffers the full response.
	///
	/// Non-2xx statuses are not errors at this layer; they travel back inside
	/// [`ApiResponse`] so the request client can apply its recovery protocol.
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_>;
}

/// A single outbound API request.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Fully resolved request URL.
	pub url: Url,
	/// Request headers, including the bearer header when one is attached.
	pub headers: HeaderMap,
	/// Raw request body, already serialized.
	pub body: Option<Vec<u8>>,
}
impl ApiRequest {
	/// Creates a request with no headers and no body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: None }
	}
}

/// Buffered API response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Returns the HTTP status code.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Returns the raw body bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.body
	}

	/// Returns the body decoded as lossy UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON into `T`, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let deserializer = &mut serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(deserializer)
			.map_err(|source| DecodeError { source, status: Some(self.status.as_u16()) })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Configure timeouts on the wrapped client; the request client imposes none of its own,
/// so a hung endpoint is bounded only by the transport's deadlines.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: ApiRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let mut builder =
				client.request(request.method, request.url).headers(request.headers);

			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			Ok(ApiResponse { status, headers, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: StatusCode, body: &str) -> ApiResponse {
		ApiResponse { status, headers: HeaderMap::new(), body: body.as_bytes().to_vec() }
	}

	#[test]
	fn json_decode_reports_status_and_path() {
		let ok = response(StatusCode::OK, "{\"access\":\"A1\"}");
		let payload: crate::auth::wire::RefreshResponse =
			ok.json().expect("Valid payload should decode.");

		assert_eq!(payload.access, "A1");

		let broken = response(StatusCode::OK, "{\"access\":7}");
		let err = broken
			.json::<crate::auth::wire::RefreshResponse>()
			.expect_err("Mistyped payload should fail to decode.");

		assert_eq!(err.status, Some(200));
		assert_eq!(err.source.path().to_string(), "access");
	}

	#[test]
	fn text_is_lossy_utf8() {
		let resp = response(StatusCode::BAD_REQUEST, "plain failure");

		assert!(!resp.is_success());
		assert_eq!(resp.text(), "plain failure");
	}
}
