use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
	Bounds, CatalogKind, ClarificationReason, PriceOutlier, RangeField, RangeIssue, RangeIssueKind,
	SearchCriteria, SortOrder, TerminalState, ValidationFlags, lenient, text,
};
use scout_config::Config;

const NON_DOMAIN_SENTINELS: &[&str] =
	&["NON_DOMAIN_QUERY", "NOT_PROPERTY_QUERY", "NOT_VEHICLE_QUERY", "OUT_OF_SCOPE", "OFF_TOPIC"];
const CONTRADICTORY_SENTINELS: &[&str] =
	&["CONTRADICTORY_REQUEST", "CONTRADICTORY", "IMPOSSIBLE_REQUEST"];
const DEICTIC_LOCATIONS: &[&str] =
	&["me", "near me", "nearby", "around me", "here", "around here", "my area", "my location"];

const QUERY_KEYS: &[&str] = &["query", "search_query", "text"];
const STATUS_KEYS: &[&str] = &["status", "intent"];
const MIN_PRICE_KEYS: &[&str] = &["min_price", "price_min", "minPrice"];
const MAX_PRICE_KEYS: &[&str] = &["max_price", "price_max", "maxPrice", "budget"];
const TYPE_KEYS: &[&str] = &["property_type", "vehicle_type", "body_type", "type", "category"];
const MIN_COUNT_KEYS: &[&str] =
	&["min_bedrooms", "bedrooms_min", "minBedrooms", "min_seats", "seats_min", "minSeats"];
const MAX_COUNT_KEYS: &[&str] =
	&["max_bedrooms", "bedrooms_max", "maxBedrooms", "max_seats", "seats_max", "maxSeats"];
const EXACT_COUNT_KEYS: &[&str] = &["bedrooms", "seats", "seating_capacity"];
const BRAND_KEYS: &[&str] =
	&["developer", "developers", "brand", "brands", "make", "project", "projects", "project_name"];
const TAG_KEYS: &[&str] = &["fuel_type", "fuel_types", "fuel", "tags", "category_tags"];
const LOCATION_KEYS: &[&str] = &["location", "locations", "city", "area"];
const FEATURE_KEYS: &[&str] = &["amenities", "features", "required_features"];
const SORT_KEYS: &[&str] = &["sort", "sort_by", "order"];
const COUNT_KEYS: &[&str] = &["requested_count", "count", "limit", "num_results"];
const EXCLUDE_KEYS: &[&str] =
	&["exclude_ids", "excluded_ids", "shown_ids", "previously_shown", "seen_ids"];
const CLARIFY_KEYS: &[&str] = &["needs_clarification", "needsClarification"];
const CLARIFY_DETAIL_KEYS: &[&str] = &["clarification_reason", "clarificationReason", "reason"];
const NOTE_KEYS: &[&str] = &["notes", "soft_requirements", "softRequirements"];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NormalizedCriteria {
	pub criteria: SearchCriteria,
	pub flags: ValidationFlags,
}

/// Coerces analyzer output into [`SearchCriteria`] plus [`ValidationFlags`].
///
/// Accepts either the flattened criteria object or an envelope of the form
/// `{ "criteria" | "filters": {...}, "flags": {...}, "exclude_ids": [...] }`. Never fails:
/// unreadable fields become `None` and questionable states become flags.
pub fn normalize(raw: &Value, kind: CatalogKind, cfg: &Config) -> NormalizedCriteria {
	let empty = Map::new();
	let root = raw.as_object().unwrap_or(&empty);
	let fields = lenient::first(root, &["criteria", "filters"])
		.and_then(Value::as_object)
		.unwrap_or(root);
	let envelope_flags = root.get("flags").and_then(Value::as_object).unwrap_or(&empty);
	let requested_count = requested_count(fields, cfg);
	let mut flags = ValidationFlags { notes: notes(fields, envelope_flags), ..Default::default() };

	if let Some(state) = terminal_sentinel(fields) {
		flags.terminal = Some(state);

		return NormalizedCriteria { criteria: terminal_criteria(requested_count), flags };
	}

	let price = normalize_range(
		first_amount(fields, MIN_PRICE_KEYS),
		first_amount(fields, MAX_PRICE_KEYS),
		RangeField::Price,
		&mut flags,
	);
	let price = check_price_outliers(price, kind, cfg, &mut flags);
	let (min_count, max_count) = count_inputs(fields);
	let count = normalize_range(min_count, max_count, RangeField::Count, &mut flags);
	let count = Bounds { min: count.min.map(to_count), max: count.max.map(to_count) };
	let listing_type =
		lenient::first(fields, TYPE_KEYS).and_then(lenient::text).map(|value| text::fold(&value));

	if is_contradictory(count, listing_type.as_deref(), cfg) {
		flags.terminal = Some(TerminalState::Contradictory);
		flags.price_outlier = None;
		flags.range_issues.clear();

		return NormalizedCriteria { criteria: terminal_criteria(requested_count), flags };
	}

	let query = lenient::first(fields, QUERY_KEYS).and_then(lenient::text);
	let raw_location = location_text(fields);
	let proximity = query.as_deref().map(text::has_proximity_intent).unwrap_or(false)
		|| raw_location.as_deref().map(text::has_proximity_intent).unwrap_or(false);
	let mut location = raw_location
		.as_deref()
		.map(text::strip_proximity_prefix)
		.filter(|location| !location.is_empty());

	if raw_location.as_deref().map(is_deictic).unwrap_or(false)
		|| location.as_deref().map(is_deictic).unwrap_or(false)
	{
		location = None;
		flags.clarification = Some(ClarificationReason::UnresolvedLocation);
	}
	if let Some(reason) = clarification(fields).or_else(|| clarification(envelope_flags)) {
		flags.clarification = Some(reason);
	}

	let criteria = SearchCriteria {
		query,
		price,
		count,
		listing_type,
		brands: merged_list(fields, BRAND_KEYS),
		tags: merged_list(fields, TAG_KEYS),
		location,
		features: merged_list(fields, FEATURE_KEYS),
		sort: lenient::first(fields, SORT_KEYS)
			.and_then(lenient::text)
			.and_then(|raw| SortOrder::parse(&raw)),
		requested_count,
		exclude_ids: exclude_ids(root, fields),
		proximity,
	};

	NormalizedCriteria { criteria, flags }
}

/// Clears both bounds when either is negative or they are inverted. Negative wins.
fn normalize_range(
	min: Option<f64>,
	max: Option<f64>,
	field: RangeField,
	flags: &mut ValidationFlags,
) -> Bounds<f64> {
	let negative = min.map(|value| value < 0.0).unwrap_or(false)
		|| max.map(|value| value < 0.0).unwrap_or(false);
	let inverted = matches!((min, max), (Some(min), Some(max)) if min > max);
	let kind = if negative {
		Some(RangeIssueKind::Negative)
	} else if inverted {
		Some(RangeIssueKind::Inverted)
	} else {
		None
	};

	match kind {
		Some(kind) => {
			flags.range_issues.push(RangeIssue { field, kind });

			Bounds::default()
		},
		None => Bounds { min, max },
	}
}

fn check_price_outliers(
	price: Bounds<f64>,
	kind: CatalogKind,
	cfg: &Config,
	flags: &mut ValidationFlags,
) -> Bounds<f64> {
	let bounds = kind.price_bounds(cfg);
	let sides = [price.min, price.max];
	let too_low = sides.iter().flatten().any(|value| *value > 0.0 && *value < bounds.floor);
	let too_high = sides.iter().flatten().any(|value| *value > bounds.ceiling);

	if too_low {
		flags.price_outlier = Some(PriceOutlier::TooLow);
	} else if too_high {
		flags.price_outlier = Some(PriceOutlier::TooHigh);
	} else {
		return price;
	}

	Bounds::default()
}

fn count_inputs(fields: &Map<String, Value>) -> (Option<f64>, Option<f64>) {
	let min = first_number(fields, MIN_COUNT_KEYS);
	let max = first_number(fields, MAX_COUNT_KEYS);

	if min.is_some() || max.is_some() {
		return (min, max);
	}

	let exact = first_number(fields, EXACT_COUNT_KEYS);

	(exact, exact)
}

fn to_count(value: f64) -> u32 {
	value.clamp(0.0, u32::MAX as f64).round() as u32
}

fn is_contradictory(count: Bounds<u32>, listing_type: Option<&str>, cfg: &Config) -> bool {
	let Some(listing_type) = listing_type else { return false };

	if count.max != Some(0) {
		return false;
	}

	let canonical = cfg
		.synonyms
		.categories
		.iter()
		.find(|(_, forms)| forms.iter().any(|form| form == listing_type))
		.map(|(canonical, _)| canonical.as_str());

	cfg.search
		.count_required_types
		.iter()
		.any(|required| required == listing_type || Some(required.as_str()) == canonical)
}

fn terminal_sentinel(fields: &Map<String, Value>) -> Option<TerminalState> {
	let mut values = QUERY_KEYS.iter().chain(STATUS_KEYS).filter_map(|key| fields.get(*key));

	values.find_map(|value| {
		let raw = value.as_str()?.trim().to_uppercase();

		if NON_DOMAIN_SENTINELS.contains(&raw.as_str()) {
			Some(TerminalState::NonDomain)
		} else if CONTRADICTORY_SENTINELS.contains(&raw.as_str()) {
			Some(TerminalState::Contradictory)
		} else {
			None
		}
	})
}

fn terminal_criteria(requested_count: u32) -> SearchCriteria {
	SearchCriteria { requested_count, ..Default::default() }
}

fn requested_count(fields: &Map<String, Value>, cfg: &Config) -> u32 {
	let max = cfg.search.max_requested_count;

	first_number(fields, COUNT_KEYS)
		.map(|value| value.clamp(1.0, max as f64).floor() as u32)
		.unwrap_or(cfg.search.default_count)
		.clamp(1, max.max(1))
}

fn location_text(fields: &Map<String, Value>) -> Option<String> {
	let parts = lenient::string_list(lenient::first(fields, LOCATION_KEYS)?);

	if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

/// Lower-cased, deduplicated union of every list stored under `keys`.
fn merged_list(fields: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
	let mut out: Vec<String> = Vec::new();

	for value in keys.iter().filter_map(|key| fields.get(*key)) {
		for item in lenient::string_list(value) {
			let item = text::fold(&item);

			if !item.is_empty() && !out.contains(&item) {
				out.push(item);
			}
		}
	}

	if out.is_empty() { None } else { Some(out) }
}

fn exclude_ids(root: &Map<String, Value>, fields: &Map<String, Value>) -> BTreeSet<String> {
	let mut out = BTreeSet::new();

	for source in [root, fields] {
		for value in EXCLUDE_KEYS.iter().filter_map(|key| source.get(*key)) {
			out.extend(lenient::string_list(value));
		}
	}

	out
}

fn clarification(fields: &Map<String, Value>) -> Option<ClarificationReason> {
	if !lenient::first(fields, CLARIFY_KEYS).map(lenient::flag).unwrap_or(false) {
		return None;
	}

	let detail = lenient::first(fields, CLARIFY_DETAIL_KEYS).and_then(lenient::text);

	Some(ClarificationReason::Analyzer { detail })
}

fn notes(fields: &Map<String, Value>, envelope_flags: &Map<String, Value>) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for source in [fields, envelope_flags] {
		for value in NOTE_KEYS.iter().filter_map(|key| source.get(*key)) {
			for note in lenient::string_list(value) {
				if !out.contains(&note) {
					out.push(note);
				}
			}
		}
	}

	out
}

fn is_deictic(location: &str) -> bool {
	DEICTIC_LOCATIONS.contains(&text::fold(location).as_str())
}

fn first_number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
	keys.iter().filter_map(|key| fields.get(*key)).find_map(lenient::number)
}

fn first_amount(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
	keys.iter().filter_map(|key| fields.get(*key)).find_map(lenient::amount)
}
