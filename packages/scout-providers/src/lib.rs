//! HTTP clients for the collaborators the search engine talks to.
//!
//! Each call builds its own `reqwest` client with the provider's `timeout_ms`. Nothing here
//! retries; callers decide what a failure means.

pub mod catalog;
pub mod embedding;
pub mod geocode;
pub mod ranker;

mod error;

pub use error::{Error, Result};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	extend_headers(&mut headers, default_headers)?;

	Ok(headers)
}

pub(crate) fn extend_headers(
	headers: &mut HeaderMap,
	default_headers: &Map<String, Value>,
) -> Result<()> {
	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(())
}

pub(crate) fn endpoint(api_base: &str, path: &str) -> String {
	format!("{}/{}", api_base.trim_end_matches('/'), path.trim_start_matches('/'))
}
