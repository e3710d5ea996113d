use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use scout_domain::{CatalogKind, SearchCriteria, lenient};

use crate::{Error, RankingOutcome, RankingStrategy, Result, SearchService, SlimCandidate};

const ORDER_KEYS: &[&str] = &["orderedIds", "ordered_ids", "ranking", "ids"];
const REASON_KEYS: &[&str] = &["reasonsById", "reasons_by_id", "reasons"];
const SCORE_KEYS: &[&str] = &["scoresById", "scores_by_id", "scores"];

impl SearchService {
	pub(crate) async fn rank_by_llm(
		&self,
		criteria: &SearchCriteria,
		candidates: &[SlimCandidate],
		kind: CatalogKind,
	) -> Result<RankingOutcome> {
		let cfg = &self.cfg.providers.ranker;
		let messages = build_ranking_messages(criteria, candidates, kind)?;
		let raw = crate::with_timeout(
			"ranker",
			cfg.timeout_ms,
			self.providers.ranker.complete(cfg, &messages),
		)
		.await?;

		parse_ranking(&raw, candidates)
	}
}

pub(crate) fn build_ranking_messages(
	criteria: &SearchCriteria,
	candidates: &[SlimCandidate],
	kind: CatalogKind,
) -> Result<Vec<Value>> {
	let schema = serde_json::json!({
		"orderedIds": ["string"],
		"reasonsById": { "<id>": "string" },
		"scoresById": { "<id>": 0 }
	});
	let schema_text = serde_json::to_string_pretty(&schema).map_err(invalid_payload)?;
	let criteria_text = serde_json::to_string(criteria).map_err(invalid_payload)?;
	let candidates_text = serde_json::to_string(candidates).map_err(invalid_payload)?;
	let system_prompt = format!(
		"You rank {plural} for a shopper. Output must be valid JSON only and must match the \
provided schema exactly. Include every candidate id exactly once in orderedIds, most relevant \
first. Give each id a reason of at most one sentence and a score from 0 to 100. Do not add \
explanations or extra fields.",
		plural = kind.plural()
	);
	let user_prompt = format!(
		"Return JSON matching this exact schema:\n{schema_text}\nSearch criteria:\n{criteria_text}\nCandidates:\n{candidates_text}"
	);

	Ok(vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_prompt }),
	])
}

/// Reads the ranker's reply.
///
/// Unparseable text is an error. A reply without an id list keeps filter order and whatever
/// scores and reasons it did carry. Entries for unknown ids are dropped.
pub(crate) fn parse_ranking(raw: &str, candidates: &[SlimCandidate]) -> Result<RankingOutcome> {
	let cleaned = strip_code_fence(raw);
	let json: Value = serde_json::from_str(cleaned)
		.or_else(|err| embedded_object(cleaned).ok_or(err))
		.map_err(|err| Error::InvalidResponse {
			message: format!("Ranking response is not valid JSON: {err}."),
		})?;
	let Some(fields) = json.as_object() else {
		return Err(Error::InvalidResponse {
			message: "Ranking response is not a JSON object.".to_string(),
		});
	};
	let known: HashSet<&str> = candidates.iter().map(|candidate| candidate.id.as_str()).collect();
	let reasons_by_id: BTreeMap<String, String> = id_map(fields, REASON_KEYS, &known)
		.filter_map(|(id, value)| lenient::text(value).map(|reason| (id, reason)))
		.collect();
	let scores_by_id: BTreeMap<String, f32> = id_map(fields, SCORE_KEYS, &known)
		.filter_map(|(id, value)| {
			lenient::number(value).map(|score| (id, score.clamp(0.0, 100.0) as f32))
		})
		.collect();
	let ordered = lenient::first(fields, ORDER_KEYS).and_then(Value::as_array);

	let Some(ordered) = ordered else {
		tracing::warn!("Ranking response has no orderedIds; keeping filter order.");

		return Ok(RankingOutcome {
			scores_by_id,
			reasons_by_id,
			..RankingOutcome::identity(candidates)
		});
	};

	Ok(RankingOutcome {
		ordered_ids: ordered.iter().filter_map(lenient::text).collect(),
		scores_by_id,
		reasons_by_id,
		strategy: RankingStrategy::Llm,
		degraded: false,
	})
}

/// Drops a surrounding Markdown code fence and a bare `json` language tag.
pub(crate) fn strip_code_fence(raw: &str) -> &str {
	let trimmed = raw.trim();

	if let Some(rest) = trimmed.strip_prefix("```") {
		let body = match rest.find('\n') {
			Some(newline) => &rest[newline + 1..],
			None => rest.trim_start_matches("json"),
		};

		return body.trim_end().trim_end_matches("```").trim();
	}

	trimmed.strip_prefix("json").map(str::trim).unwrap_or(trimmed)
}

/// Parses the outermost `{...}` when the model wrapped its JSON in prose.
fn embedded_object(text: &str) -> Option<Value> {
	let start = text.find('{')?;
	let end = text.rfind('}')?;

	if end <= start {
		return None;
	}

	serde_json::from_str(&text[start..=end]).ok()
}

fn id_map<'a>(
	fields: &'a Map<String, Value>,
	keys: &[&str],
	known: &'a HashSet<&'a str>,
) -> impl Iterator<Item = (String, &'a Value)> + 'a {
	lenient::first(fields, keys)
		.and_then(Value::as_object)
		.into_iter()
		.flatten()
		.filter(move |(id, _)| known.contains(id.as_str()))
		.map(|(id, value)| (id.clone(), value))
}

fn invalid_payload(err: serde_json::Error) -> Error {
	Error::InvalidResponse { message: format!("Failed to encode ranking payload: {err}.") }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidates(ids: &[&str]) -> Vec<SlimCandidate> {
		ids.iter().map(|id| SlimCandidate { id: id.to_string(), ..Default::default() }).collect()
	}

	#[test]
	fn strips_fences_and_language_tags() {
		assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
		assert_eq!(strip_code_fence("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
		assert_eq!(strip_code_fence("json {\"a\":1}"), "{\"a\":1}");
		assert_eq!(strip_code_fence(" {\"a\":1} "), "{\"a\":1}");
	}

	#[test]
	fn parses_fenced_ranking() {
		let input = candidates(&["a", "b"]);
		let raw = "```json\n{\"orderedIds\":[\"b\",\"a\"],\"reasonsById\":{\"a\":\"Cheaper\",\"b\":\"Closer\",\"z\":\"?\"},\"scoresById\":{\"a\":\"70\",\"b\":140}}\n```";
		let outcome = parse_ranking(raw, &input).expect("parse failed");

		assert_eq!(outcome.ordered_ids, vec!["b", "a"]);
		assert_eq!(outcome.strategy, RankingStrategy::Llm);
		assert_eq!(outcome.scores_by_id.get("a"), Some(&70.0));
		assert_eq!(outcome.scores_by_id.get("b"), Some(&100.0));
		assert!(!outcome.reasons_by_id.contains_key("z"));
		assert!(outcome.is_complete(&input));
	}

	#[test]
	fn missing_order_keeps_filter_order_with_best_effort_maps() {
		let input = candidates(&["a", "b"]);
		let outcome =
			parse_ranking("{\"reasonsById\":{\"b\":\"Closer\"}}", &input).expect("parse failed");

		assert_eq!(outcome.ordered_ids, vec!["a", "b"]);
		assert_eq!(outcome.strategy, RankingStrategy::Identity);
		assert_eq!(outcome.reasons_by_id.get("b").map(String::as_str), Some("Closer"));
	}

	#[test]
	fn prose_wrapped_json_is_recovered() {
		let input = candidates(&["a"]);
		let outcome = parse_ranking("Here you go: {\"orderedIds\":[\"a\"]} hope it helps", &input)
			.expect("parse failed");

		assert_eq!(outcome.ordered_ids, vec!["a"]);
	}

	#[test]
	fn malformed_text_is_an_error() {
		assert!(parse_ranking("I cannot rank these.", &candidates(&["a"])).is_err());
	}

	#[test]
	fn prompt_carries_criteria_and_candidates() {
		let criteria = SearchCriteria { location: Some("makati".to_string()), ..Default::default() };
		let messages = build_ranking_messages(&criteria, &candidates(&["a"]), CatalogKind::Vehicle)
			.expect("messages");

		assert_eq!(messages.len(), 2);
		assert!(messages[0]["content"].as_str().is_some_and(|text| text.contains("vehicles")));
		assert!(messages[1]["content"].as_str().is_some_and(|text| text.contains("\"makati\"")));
	}
}
