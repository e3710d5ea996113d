use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static PROXIMITY_INTENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(
		r"\b(near|nearby|close to|walking distance|within\s+\d+(\.\d+)?\s*(km|kms|kilometers?|kilometres?|mins?|minutes?))\b",
	)
	.ok()
});
static PROXIMITY_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(
		r"^\s*(near(by)?|close to|around|walking distance (to|from)|within\s+\d+(\.\d+)?\s*(km|kms|kilometers?|kilometres?|mins?|minutes?)\s+(of|from|to))\s+",
	)
	.ok()
});
static TOKEN_SEPARATOR: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"\s*(,|;|/|\band\b|\bor\b|\bvs\.?)\s*").ok());

/// Lower-cases, strips diacritics (`Parañaque` → `paranaque`) and collapses whitespace.
pub fn fold(text: &str) -> String {
	let stripped: String = text.nfkd().filter(|ch| !is_combining_mark(*ch)).collect();

	stripped.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn has_proximity_intent(text: &str) -> bool {
	PROXIMITY_INTENT.as_ref().is_some_and(|re| re.is_match(&fold(text)))
}

/// Removes a leading proximity phrase so `"near BGC"` matches listings located in `"BGC"`.
pub fn strip_proximity_prefix(location: &str) -> String {
	let folded = fold(location);

	match PROXIMITY_PREFIX.as_ref() {
		Some(re) => re.replace(&folded, "").trim().to_string(),
		None => folded,
	}
}

/// Splits a multi-location request into folded, deduplicated tokens in request order.
pub fn location_tokens(location: &str) -> Vec<String> {
	let folded = fold(location);
	let tokens: Vec<&str> = match TOKEN_SEPARATOR.as_ref() {
		Some(re) => re.split(&folded).collect(),
		None => vec![folded.as_str()],
	};
	let mut seen = HashSet::new();
	let mut out = Vec::new();

	for token in tokens {
		let token = token.trim();

		if token.is_empty() {
			continue;
		}
		if seen.insert(token.to_string()) {
			out.push(token.to_string());
		}
	}

	out
}

/// Substring containment in either direction on folded text.
pub fn loosely_contains(lhs: &str, rhs: &str) -> bool {
	let lhs = fold(lhs);
	let rhs = fold(rhs);

	if lhs.is_empty() || rhs.is_empty() {
		return false;
	}

	lhs.contains(&rhs) || rhs.contains(&lhs)
}

/// Truncates on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
	text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn folds_diacritics_and_case() {
		assert_eq!(fold("  Parañaque   City "), "paranaque city");
	}

	#[test]
	fn detects_proximity_intent() {
		assert!(has_proximity_intent("condo near BGC"));
		assert!(has_proximity_intent("within 10 km of Makati"));
		assert!(!has_proximity_intent("condo in Makati"));
	}

	#[test]
	fn strips_leading_proximity_phrase() {
		assert_eq!(strip_proximity_prefix("Near BGC"), "bgc");
		assert_eq!(strip_proximity_prefix("within 5 km of Ortigas"), "ortigas");
		assert_eq!(strip_proximity_prefix("Taguig"), "taguig");
	}

	#[test]
	fn splits_location_tokens() {
		assert_eq!(location_tokens("Cavite, Taguig"), vec!["cavite", "taguig"]);
		assert_eq!(location_tokens("Makati or Pasig / makati"), vec!["makati", "pasig"]);
		assert!(location_tokens(" , ").is_empty());
	}

	#[test]
	fn contains_in_either_direction() {
		assert!(loosely_contains("Ayala Land Premier", "ayala land"));
		assert!(loosely_contains("ayala", "Ayala Land"));
		assert!(!loosely_contains("", "Ayala"));
	}
}
