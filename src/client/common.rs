//! Per-request options shared by the raw request path and the typed catalog helpers.

// crates.io
use http::{
	HeaderValue,
	header::{CONTENT_TYPE, HeaderName},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Options for a single API request.
#[derive(Clone, Debug)]
pub struct RequestOptions {
	/// HTTP method.
	pub method: Method,
	/// Extra headers merged into the request.
	pub headers: HeaderMap,
	/// Serialized request body, if any.
	pub body: Option<Vec<u8>>,
	/// Skips bearer attachment and 401 recovery when `true`.
	pub skip_auth: bool,
}
impl RequestOptions {
	/// Creates options for the provided method with no headers or body.
	pub fn new(method: Method) -> Self {
		Self { method, headers: HeaderMap::new(), body: None, skip_auth: false }
	}

	/// Adds a header to the request.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Serializes `body` as the JSON request body and sets `Content-Type: application/json`.
	pub fn json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		self.body =
			Some(serde_json::to_vec(body).map_err(|source| ConfigError::SerializeBody { source })?);
		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

		Ok(self)
	}

	/// Marks the request as exempt from bearer attachment and 401 recovery.
	pub fn skip_auth(mut self) -> Self {
		self.skip_auth = true;

		self
	}

	/// Overrides the auth-exemption flag.
	pub fn with_skip_auth(mut self, skip: bool) -> Self {
		self.skip_auth = skip;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn json_sets_body_and_content_type() {
		let options = RequestOptions::new(Method::POST)
			.json(&serde_json::json!({ "name": "Ridley Scott" }))
			.expect("JSON body should serialize.");

		assert_eq!(
			options.headers.get(CONTENT_TYPE).map(|v| v.to_str().unwrap_or_default()),
			Some("application/json"),
		);
		assert_eq!(options.body.as_deref(), Some(&b"{\"name\":\"Ridley Scott\"}"[..]));
		assert!(!options.skip_auth);
	}

	#[test]
	fn skip_auth_flag_toggles() {
		let options = RequestOptions::new(Method::GET).skip_auth();

		assert!(options.skip_auth);
		assert!(!options.with_skip_auth(false).skip_auth);
	}
}
