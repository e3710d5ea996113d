use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Sends one chat completion and returns the assistant's raw text.
///
/// The text is not parsed here: ranking responses are often wrapped in code fences and the
/// caller owns the fallback when they are not valid JSON.
pub async fn complete(cfg: &scout_config::LlmProviderConfig, messages: &[Value]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_content(&json)
}

fn parse_completion_content(json: &Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| Error::response("Completion response is missing message content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "```json\n{\"orderedIds\": []}\n```" } }
			]
		});
		let content = parse_completion_content(&json).expect("parse failed");

		assert!(content.starts_with("```json"));
	}

	#[test]
	fn missing_choices_is_an_error() {
		assert!(parse_completion_content(&serde_json::json!({ "error": "quota" })).is_err());
	}
}
