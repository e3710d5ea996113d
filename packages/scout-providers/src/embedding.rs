use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

pub async fn embed(
	cfg: &scout_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if texts.is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_embedding_response(json)
}

/// Accepts the OpenAI `data[].embedding` shape and the Ollama `embeddings` shape.
fn parse_embedding_response(json: Value) -> Result<Vec<Vec<f32>>> {
	if let Some(embeddings) = json.get("embeddings").and_then(|v| v.as_array()) {
		return embeddings.iter().map(parse_vector).collect();
	}

	let data = json
		.get("data")
		.and_then(|v| v.as_array())
		.ok_or_else(|| Error::response("Embedding response is missing data array."))?;
	let mut indexed: Vec<(usize, Vec<f32>)> = Vec::with_capacity(data.len());

	for (fallback_index, item) in data.iter().enumerate() {
		let index = item
			.get("index")
			.and_then(|v| v.as_u64())
			.map(|v| v as usize)
			.unwrap_or(fallback_index);
		let embedding = item
			.get("embedding")
			.ok_or_else(|| Error::response("Embedding item missing embedding array."))?;

		indexed.push((index, parse_vector(embedding)?));
	}

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

fn parse_vector(value: &Value) -> Result<Vec<f32>> {
	let items =
		value.as_array().ok_or_else(|| Error::response("Embedding must be a numeric array."))?;
	let mut vec = Vec::with_capacity(items.len());

	for item in items {
		let number =
			item.as_f64().ok_or_else(|| Error::response("Embedding value must be numeric."))?;

		vec.push(number as f32);
	}

	Ok(vec)
}
