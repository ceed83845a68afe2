//! Client-level error types shared across the request path, stores, and catalog helpers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(#[from] crate::store::StoreError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the expected shape.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// The session could not be recovered: no refresh token was available or the refresh
	/// call itself failed. Persisted tokens have been cleared.
	#[error("Session expired. Please login again.")]
	SessionExpired,
	/// The login endpoint rejected the supplied credentials.
	#[error("Login rejected: {detail}.")]
	LoginRejected {
		/// Server-supplied `detail` string, or the raw body when absent.
		detail: String,
	},
	/// A typed catalog call received a non-2xx response.
	#[error("API request failed with status {status}: {body}.")]
	Api {
		/// HTTP status code returned by the server.
		status: u16,
		/// Raw response body for caller-side interpretation.
		body: String,
	},
}

/// Configuration and validation failures raised while building requests.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP header or request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// The configured base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request path does not join into a valid URL.
	#[error("Request path `{path}` does not form a valid URL.")]
	InvalidPath {
		/// Path fragment supplied by the caller.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A request body could not be serialized as JSON.
	#[error("Request body could not be serialized as JSON.")]
	SerializeBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Structured JSON decode failure carrying the path that failed and the HTTP status.
#[derive(Debug, ThisError)]
#[error("Response body is not valid JSON for the expected type.")]
pub struct DecodeError {
	/// Structured parsing failure pointing at the offending field.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response being decoded, when available.
	pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "disk unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("disk unreachable"));

		let source = StdError::source(&error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn session_expired_message_matches_login_prompt() {
		assert_eq!(Error::SessionExpired.to_string(), "Session expired. Please login again.");
	}
}
