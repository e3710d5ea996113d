//! Coercions for loosely-typed JSON coming from the query analyzer and content feeds.
//!
//! Every function degrades to `None` or an empty list on input it cannot read. None of them
//! invent a value.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static NUMBER_TOKEN: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").ok());
static MAGNITUDE_SUFFIX: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^\s*(thousand|million|billion|mil|mn|bn|k|m|b)\b").ok());

/// Returns the first non-null value stored under any of `keys`.
pub fn first<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
	keys.iter().filter_map(|key| fields.get(*key)).find(|value| !value.is_null())
}

/// Reads a plain number from a JSON number or from a string such as `"2 bedrooms"`.
///
/// Unit words are ignored, never treated as magnitudes.
pub fn number(value: &Value) -> Option<f64> {
	match value {
		Value::Number(number) => number.as_f64().filter(|value| value.is_finite()),
		Value::String(raw) => parse_number_text(raw),
		_ => None,
	}
}

/// Reads a money amount such as `"₱5,000,000"`, `"5.5M"` or `"5 million pesos"`.
pub fn amount(value: &Value) -> Option<f64> {
	match value {
		Value::String(raw) => parse_amount_text(raw),
		other => number(other),
	}
}

pub fn parse_number_text(raw: &str) -> Option<f64> {
	numeric_token(raw).map(|(value, _)| value)
}

/// Like [`parse_number_text`], scaled by a `k`/`m`/`b` or word suffix directly after the digits.
pub fn parse_amount_text(raw: &str) -> Option<f64> {
	let (value, rest) = numeric_token(raw)?;
	let multiplier = match MAGNITUDE_SUFFIX.as_ref()?.captures(&rest.to_lowercase()) {
		Some(caps) => match caps.get(1).map(|suffix| suffix.as_str()) {
			Some("thousand" | "k") => 1_000.0,
			Some("million" | "mil" | "mn" | "m") => 1_000_000.0,
			Some("billion" | "bn" | "b") => 1_000_000_000.0,
			_ => 1.0,
		},
		None => 1.0,
	};
	let scaled = value * multiplier;

	scaled.is_finite().then_some(scaled)
}

/// The single numeric token in `raw` and the text after it. Several tokens are ambiguous.
fn numeric_token(raw: &str) -> Option<(f64, &str)> {
	let re = NUMBER_TOKEN.as_ref()?;
	let mut tokens = re.find_iter(raw);
	let token = tokens.next()?;

	if tokens.next().is_some() {
		return None;
	}

	let parsed: f64 = token.as_str().replace(',', "").parse().ok()?;
	let negative = raw[..token.start()].trim_end().ends_with('-');
	let value = if negative { -parsed } else { parsed };

	value.is_finite().then_some((value, &raw[token.end()..]))
}

/// Reads a trimmed, non-empty string. Numbers are rendered so numeric ids survive.
pub fn text(value: &Value) -> Option<String> {
	let raw = match value {
		Value::String(raw) => raw.trim().to_string(),
		Value::Number(number) => number.to_string(),
		_ => return None,
	};

	if raw.is_empty() { None } else { Some(raw) }
}

/// Reads a list from an array, a comma-separated string, or a scalar.
///
/// Array items may be strings, numbers, or objects carrying a `name`, `title` or `label`.
pub fn string_list(value: &Value) -> Vec<String> {
	match value {
		Value::Array(items) => items.iter().filter_map(list_item).collect(),
		Value::String(raw) => raw
			.split(',')
			.map(str::trim)
			.filter(|item| !item.is_empty())
			.map(str::to_string)
			.collect(),
		Value::Number(_) => text(value).into_iter().collect(),
		_ => Vec::new(),
	}
}

fn list_item(value: &Value) -> Option<String> {
	match value {
		Value::Object(fields) => first(fields, &["name", "title", "label"]).and_then(text),
		other => text(other),
	}
}

pub fn flag(value: &Value) -> bool {
	match value {
		Value::Bool(flag) => *flag,
		Value::String(raw) => matches!(raw.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
		Value::Number(number) => number.as_f64().map(|value| value != 0.0).unwrap_or(false),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_currency_and_separators() {
		assert_eq!(number(&Value::String("₱5,000,000".to_string())), Some(5_000_000.0));
		assert_eq!(number(&Value::String(" 2 ".to_string())), Some(2.0));
		assert_eq!(number(&serde_json::json!(3.5)), Some(3.5));
	}

	#[test]
	fn honours_magnitude_suffixes_on_amounts() {
		assert_eq!(parse_amount_text("5M"), Some(5_000_000.0));
		assert_eq!(parse_amount_text("1.2 million"), Some(1_200_000.0));
		assert_eq!(parse_amount_text("800k"), Some(800_000.0));
		assert_eq!(parse_amount_text("5 million pesos"), Some(5_000_000.0));
		assert_eq!(amount(&Value::String("₱2.5M".to_string())), Some(2_500_000.0));
	}

	#[test]
	fn unit_words_are_not_magnitudes() {
		assert_eq!(parse_number_text("2 bedroom"), Some(2.0));
		assert_eq!(parse_number_text("2-bedroom"), Some(2.0));
		assert_eq!(parse_number_text("100 sqm"), Some(100.0));
		assert_eq!(parse_number_text("5M"), Some(5.0));
		assert_eq!(parse_amount_text("2 bedroom"), Some(2.0));
		assert_eq!(parse_amount_text("100 sqm"), Some(100.0));
		assert_eq!(parse_amount_text("7 seater"), Some(7.0));
	}

	#[test]
	fn unparseable_numbers_are_none_not_zero() {
		assert_eq!(parse_number_text("five million"), None);
		assert_eq!(parse_number_text(""), None);
		assert_eq!(parse_number_text("1.2.3"), None);
		assert_eq!(parse_amount_text("2 to 3 million"), None);
		assert_eq!(number(&Value::Bool(true)), None);
	}

	#[test]
	fn keeps_negative_sign() {
		assert_eq!(parse_number_text("-200"), Some(-200.0));
	}

	#[test]
	fn reads_lists_from_scalars_and_objects() {
		assert_eq!(string_list(&serde_json::json!("Pool, Gym ,")), vec!["Pool", "Gym"]);
		assert_eq!(
			string_list(&serde_json::json!([{ "name": "Pool" }, "Gym", 4, null])),
			vec!["Pool", "Gym", "4"]
		);
		assert!(string_list(&Value::Null).is_empty());
	}
}
