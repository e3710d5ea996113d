use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::Result;

/// Pulls one catalog page from the content API. The body is returned unparsed.
pub async fn fetch(cfg: &scout_config::Catalog, path: &str) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, path);
	let res = client
		.get(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.query(&[("limit", cfg.fetch_limit)])
		.send()
		.await?;

	Ok(res.error_for_status()?.json().await?)
}
