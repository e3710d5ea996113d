use serde_json::json;

use scout_domain::{
	CatalogKind, ClarificationReason, PriceOutlier, RangeField, RangeIssueKind, SortOrder,
	TerminalState, normalize, parse_catalog,
};
use scout_testkit::{property_catalog, test_config, vehicle_catalog};

#[test]
fn inverted_price_range_is_cleared_and_recorded() {
	let cfg = test_config();
	let out = normalize(
		&json!({ "min_price": 5_000_000, "max_price": 3_000_000, "min_bedrooms": 2 }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.criteria.price.min, None);
	assert_eq!(out.criteria.price.max, None);
	assert_eq!(out.flags.range_issue(RangeField::Price), Some(RangeIssueKind::Inverted));
	assert_eq!(out.criteria.count.min, Some(2));
	assert!(!out.flags.blocks_search());
}

#[test]
fn negative_bound_wins_over_inverted() {
	let cfg = test_config();
	let out = normalize(
		&json!({ "min_bedrooms": 3, "max_bedrooms": -1 }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.flags.range_issue(RangeField::Count), Some(RangeIssueKind::Negative));
	assert!(!out.criteria.count.is_active());
}

#[test]
fn implausibly_low_price_blocks_search() {
	let cfg = test_config();
	let out = normalize(&json!({ "min_price": 50, "max_price": 100 }), CatalogKind::Property, &cfg);

	assert_eq!(out.flags.price_outlier, Some(PriceOutlier::TooLow));
	assert!(!out.criteria.price.is_active());
	assert!(out.flags.blocks_search());
}

#[test]
fn price_floor_depends_on_catalog_kind() {
	let cfg = test_config();
	let raw = json!({ "max_price": 80_000 });
	let property = normalize(&raw, CatalogKind::Property, &cfg);
	let vehicle = normalize(&raw, CatalogKind::Vehicle, &cfg);

	assert_eq!(property.flags.price_outlier, Some(PriceOutlier::TooLow));
	assert_eq!(vehicle.flags.price_outlier, None);
	assert_eq!(vehicle.criteria.price.max, Some(80_000.0));
}

#[test]
fn implausibly_high_price_is_flagged() {
	let cfg = test_config();
	let out = normalize(&json!({ "budget": "9 billion" }), CatalogKind::Property, &cfg);

	assert_eq!(out.flags.price_outlier, Some(PriceOutlier::TooHigh));
}

#[test]
fn coerces_strings_and_shorthand() {
	let cfg = test_config();
	let out = normalize(
		&json!({
			"max_price": "₱5M",
			"min_price": "not a number",
			"bedrooms": "2",
			"amenities": "Pool, GYM, pool",
			"developer": ["Ayala Land", " "],
			"sort": "cheapest",
			"requested_count": "5",
		}),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.criteria.price.max, Some(5_000_000.0));
	assert_eq!(out.criteria.price.min, None);
	assert_eq!(out.criteria.count.min, Some(2));
	assert_eq!(out.criteria.count.max, Some(2));
	assert_eq!(out.criteria.features, Some(vec!["pool".to_string(), "gym".to_string()]));
	assert_eq!(out.criteria.brands, Some(vec!["ayala land".to_string()]));
	assert_eq!(out.criteria.sort, Some(SortOrder::PriceAsc));
	assert_eq!(out.criteria.requested_count, 5);
	assert!(out.flags.range_issues.is_empty());
}

#[test]
fn unit_words_do_not_scale_counts_or_prices() {
	let cfg = test_config();
	let out = normalize(
		&json!({ "bedrooms": "2 bedroom", "max_price": "5 million pesos" }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.criteria.count.min, Some(2));
	assert_eq!(out.criteria.count.max, Some(2));
	assert_eq!(out.criteria.price.max, Some(5_000_000.0));
	assert_eq!(out.flags.price_outlier, None);

	let out = normalize(
		&json!({ "min_bedrooms": "3-bedroom", "max_bedrooms": "4 br" }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.criteria.count.min, Some(3));
	assert_eq!(out.criteria.count.max, Some(4));
}

#[test]
fn empty_lists_become_none() {
	let cfg = test_config();
	let out = normalize(
		&json!({ "amenities": [], "tags": "", "developer": null }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.criteria.features, None);
	assert_eq!(out.criteria.tags, None);
	assert_eq!(out.criteria.brands, None);
}

#[test]
fn requested_count_is_clamped() {
	let cfg = test_config();

	for (raw, expected) in [
		(json!(25), 10),
		(json!("abc"), 3),
		(json!(0), 1),
		(json!(-4), 1),
		(json!(1), 1),
		(json!("7 results"), 7),
	] {
		let out = normalize(&json!({ "requested_count": raw }), CatalogKind::Property, &cfg);

		assert_eq!(out.criteria.requested_count, expected, "requested_count {raw}");
	}
}

#[test]
fn sentinel_query_is_terminal() {
	let cfg = test_config();
	let out = normalize(
		&json!({ "query": "NOT_PROPERTY_QUERY", "max_price": 3_000_000, "location": "Makati" }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(out.flags.terminal, Some(TerminalState::NonDomain));
	assert!(!out.criteria.price.is_active());
	assert_eq!(out.criteria.location, None);
	assert!(out.flags.blocks_search());

	let out = normalize(
		&json!({ "status": "contradictory_request" }),
		CatalogKind::Vehicle,
		&cfg,
	);

	assert_eq!(out.flags.terminal, Some(TerminalState::Contradictory));
}

#[test]
fn zero_bedroom_house_is_contradictory() {
	let cfg = test_config();

	for listing_type in ["House and Lot", "single detached"] {
		let out = normalize(
			&json!({ "property_type": listing_type, "max_bedrooms": 0, "location": "Cavite" }),
			CatalogKind::Property,
			&cfg,
		);

		assert_eq!(out.flags.terminal, Some(TerminalState::Contradictory), "{listing_type}");
		assert_eq!(out.criteria.listing_type, None);
	}

	let studio = normalize(
		&json!({ "property_type": "condo", "max_bedrooms": 0 }),
		CatalogKind::Property,
		&cfg,
	);

	assert_eq!(studio.flags.terminal, None);
	assert_eq!(studio.criteria.count.max, Some(0));
}

#[test]
fn reads_envelope_shape() {
	let cfg = test_config();
	let out = normalize(
		&json!({
			"criteria": { "location": "Makati", "vehicle_type": "SUV" },
			"flags": {
				"needs_clarification": true,
				"clarification_reason": "Which city?",
				"notes": ["prefers high floor"],
			},
			"shown_ids": ["a", "b"],
			"previously_shown": "c",
		}),
		CatalogKind::Vehicle,
		&cfg,
	);

	assert_eq!(out.criteria.location.as_deref(), Some("makati"));
	assert_eq!(out.criteria.listing_type.as_deref(), Some("suv"));
	assert_eq!(
		out.flags.clarification,
		Some(ClarificationReason::Analyzer { detail: Some("Which city?".to_string()) })
	);
	assert_eq!(out.flags.notes, vec!["prefers high floor"]);
	assert_eq!(
		out.criteria.exclude_ids.iter().map(String::as_str).collect::<Vec<_>>(),
		vec!["a", "b", "c"]
	);
}

#[test]
fn proximity_phrase_is_stripped_from_location() {
	let cfg = test_config();
	let out = normalize(&json!({ "location": "Near BGC" }), CatalogKind::Property, &cfg);

	assert_eq!(out.criteria.location.as_deref(), Some("bgc"));
	assert!(out.criteria.proximity);

	let out = normalize(
		&json!({ "query": "condos close to Ortigas", "location": "Ortigas" }),
		CatalogKind::Property,
		&cfg,
	);

	assert!(out.criteria.proximity);
	assert_eq!(out.criteria.location.as_deref(), Some("ortigas"));
}

#[test]
fn deictic_location_needs_clarification() {
	let cfg = test_config();

	for location in ["near me", "Nearby", "here"] {
		let out = normalize(&json!({ "location": location }), CatalogKind::Property, &cfg);

		assert_eq!(out.criteria.location, None, "{location}");
		assert_eq!(out.flags.clarification, Some(ClarificationReason::UnresolvedLocation));
		assert!(out.flags.blocks_search());
	}
}

#[test]
fn non_object_input_yields_defaults() {
	let cfg = test_config();
	let out = normalize(&json!("three bedroom house"), CatalogKind::Property, &cfg);

	assert_eq!(out.criteria.requested_count, 3);
	assert!(!out.flags.blocks_search());
	assert!(!out.criteria.price.is_active());
}

#[test]
fn fixture_catalogs_parse() {
	let properties = parse_catalog(&property_catalog());
	let vehicles = parse_catalog(&vehicle_catalog());

	assert_eq!(properties.len(), 8);
	assert_eq!(vehicles.len(), 4);

	let ranger = vehicles.iter().find(|record| record.id == "v4").expect("ranger");

	assert_eq!(ranger.price, None);
	assert_eq!(ranger.price_floor(), Some(1_300_000.0));
	assert_eq!(ranger.brand.as_deref(), Some("Ford"));
	assert!(properties.iter().all(|record| record.coordinates.is_some()));
}
