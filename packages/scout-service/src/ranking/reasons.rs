//! Short justifications built from a candidate's concrete attributes.

use scout_domain::{CatalogKind, SearchCriteria};

use crate::SlimCandidate;

/// `₱850K`, `₱4.2M`, `₱1.25B`.
pub(crate) fn format_price(value: f64) -> String {
	let (scaled, suffix) = if value >= 1_000_000_000.0 {
		(value / 1_000_000_000.0, "B")
	} else if value >= 1_000_000.0 {
		(value / 1_000_000.0, "M")
	} else if value >= 1_000.0 {
		(value / 1_000.0, "K")
	} else {
		(value, "")
	};
	let rendered = format!("{scaled:.2}");
	let rendered = rendered.trim_end_matches('0').trim_end_matches('.');

	format!("₱{rendered}{suffix}")
}

/// Location, count match, budget fit and brand, in that order, when each applies.
pub(crate) fn concrete_reasons(
	candidate: &SlimCandidate,
	criteria: &SearchCriteria,
	kind: CatalogKind,
) -> Vec<String> {
	let mut reasons = Vec::new();

	if let Some(distance) = candidate.distance_km {
		reasons.push(format!("About {distance:.1} km away"));
	} else if criteria.has_location()
		&& let Some(location) = candidate.location.as_deref()
	{
		reasons.push(format!("Located in {location}"));
	}

	if criteria.count.is_active()
		&& let Some(count) =
			candidate.counts.iter().copied().find(|count| criteria.count.contains(*count))
	{
		reasons.push(count_phrase(count, kind));
	}

	if let Some(budget) = criteria.price.max
		&& candidate.price_min.map(|price| price <= budget).unwrap_or(false)
	{
		reasons.push(format!("Within your {} budget", format_price(budget)));
	}

	if let Some(brand) = candidate.brand.as_deref() {
		reasons.push(format!("By {brand}"));
	}

	reasons
}

/// Used when no strategy supplied a reason, as on the skip path and after identity fallback.
pub(crate) fn synthesized_reason(
	candidate: &SlimCandidate,
	criteria: &SearchCriteria,
	kind: CatalogKind,
) -> String {
	let reasons = concrete_reasons(candidate, criteria, kind);

	if !reasons.is_empty() {
		return reasons.join("; ");
	}

	match candidate.price_min {
		Some(price) => format!("Matches your search; starts at {}", format_price(price)),
		None => "Matches your search".to_string(),
	}
}

pub(crate) fn similarity_tier(similarity: f32) -> &'static str {
	if similarity >= 0.8 {
		"Excellent match"
	} else if similarity >= 0.6 {
		"Good match"
	} else {
		"Quality option"
	}
}

fn count_phrase(count: u32, kind: CatalogKind) -> String {
	let label = kind.count_label();

	if count == 1 {
		format!("1 {}", label.trim_end_matches('s'))
	} else {
		format!("{count} {label}")
	}
}

#[cfg(test)]
mod tests {
	use scout_domain::Bounds;

	use super::*;

	#[test]
	fn formats_prices_compactly() {
		assert_eq!(format_price(850_000.0), "₱850K");
		assert_eq!(format_price(4_200_000.0), "₱4.2M");
		assert_eq!(format_price(1_250_000_000.0), "₱1.25B");
		assert_eq!(format_price(500.0), "₱500");
	}

	#[test]
	fn builds_reasons_from_matching_attributes() {
		let candidate = SlimCandidate {
			id: "a".to_string(),
			location: Some("BGC, Taguig".to_string()),
			brand: Some("Ayala Land".to_string()),
			price_min: Some(4_500_000.0),
			counts: vec![1, 2],
			..Default::default()
		};
		let criteria = SearchCriteria {
			location: Some("taguig".to_string()),
			price: Bounds { min: None, max: Some(5_000_000.0) },
			count: Bounds { min: Some(2), max: None },
			..Default::default()
		};
		let reasons = concrete_reasons(&candidate, &criteria, CatalogKind::Property);

		assert_eq!(
			reasons,
			vec!["Located in BGC, Taguig", "2 bedrooms", "Within your ₱5M budget", "By Ayala Land"]
		);
	}

	#[test]
	fn falls_back_to_generic_reason() {
		let candidate = SlimCandidate { id: "a".to_string(), ..Default::default() };
		let reason =
			synthesized_reason(&candidate, &SearchCriteria::default(), CatalogKind::Vehicle);

		assert_eq!(reason, "Matches your search");
		assert_eq!(count_phrase(1, CatalogKind::Vehicle), "1 seat");
	}
}
