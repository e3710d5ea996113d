use std::collections::BTreeMap;

use scout_config::Synonyms;
use scout_domain::{ListingRecord, SearchCriteria, text};

use crate::search::Candidate;

/// Which relaxable filters a pass applies. Type, count, brand and tag filters always apply.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ActiveFilters {
	pub(crate) price: bool,
	pub(crate) features: bool,
	pub(crate) location: bool,
}
impl ActiveFilters {
	pub(crate) const STRICT: Self = Self { price: true, features: true, location: true };
}

pub(crate) struct Matcher<'a> {
	criteria: &'a SearchCriteria,
	synonyms: &'a Synonyms,
	tokens: Vec<String>,
}
impl<'a> Matcher<'a> {
	pub(crate) fn new(criteria: &'a SearchCriteria, synonyms: &'a Synonyms) -> Self {
		Self { criteria, synonyms, tokens: criteria.location_tokens() }
	}

	pub(crate) fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub(crate) fn matches(&self, record: &ListingRecord, filters: ActiveFilters) -> bool {
		(!filters.price || self.price_matches(record))
			&& self.type_matches(record)
			&& self.count_matches(record)
			&& self.brand_matches(record)
			&& self.tag_matches(record)
			&& (!filters.features || self.features_match(record))
			&& (!filters.location || self.location_matches(record))
	}

	/// Index of the first requested location token the listing matches.
	pub(crate) fn first_token(&self, record: &ListingRecord) -> Option<usize> {
		let haystack = record.location_haystack();

		self.tokens.iter().position(|token| haystack.contains(token.as_str()))
	}

	fn price_matches(&self, record: &ListingRecord) -> bool {
		let price = self.criteria.price;

		!price.is_active() || record.prices().any(|value| price.contains(value))
	}

	fn count_matches(&self, record: &ListingRecord) -> bool {
		let count = self.criteria.count;

		!count.is_active() || record.counts().any(|value| count.contains(value))
	}

	fn type_matches(&self, record: &ListingRecord) -> bool {
		let Some(wanted) = self.criteria.listing_type.as_deref() else { return true };
		let Some(actual) = record.listing_type.as_deref() else { return false };
		let actual = text::fold(actual);

		match synonym_entry(&self.synonyms.categories, wanted) {
			Some((canonical, forms)) => actual == canonical || forms.iter().any(|form| *form == actual),
			None => text::loosely_contains(wanted, &actual),
		}
	}

	fn brand_matches(&self, record: &ListingRecord) -> bool {
		let Some(brands) = self.criteria.brands.as_deref() else { return true };
		let fields = [record.brand.as_deref(), record.project.as_deref()];

		brands.iter().any(|brand| {
			fields.iter().flatten().any(|field| text::loosely_contains(brand, field))
		})
	}

	fn tag_matches(&self, record: &ListingRecord) -> bool {
		let Some(tags) = self.criteria.tags.as_deref() else { return true };
		let fields: Vec<&str> =
			record.fuel_type.as_deref().into_iter().chain(record.all_tags()).collect();

		tags.iter().any(|tag| fields.iter().any(|field| text::loosely_contains(tag, field)))
	}

	/// Every required feature must be present on the listing or one of its units.
	fn features_match(&self, record: &ListingRecord) -> bool {
		let Some(features) = self.criteria.features.as_deref() else { return true };
		let tags: Vec<String> = record.all_tags().map(text::fold).collect();

		features.iter().all(|feature| tags.iter().any(|tag| self.feature_matches(feature, tag)))
	}

	fn feature_matches(&self, feature: &str, tag: &str) -> bool {
		match synonym_entry(&self.synonyms.features, feature) {
			Some((canonical, forms)) =>
				tag.contains(canonical) || forms.iter().any(|form| tag.contains(form.as_str())),
			None => text::loosely_contains(feature, tag),
		}
	}

	/// Any requested token inside the folded location, name and description.
	fn location_matches(&self, record: &ListingRecord) -> bool {
		self.tokens.is_empty() || self.first_token(record).is_some()
	}
}

pub(crate) fn run_pass<'a>(
	pool: &[&'a ListingRecord],
	matcher: &Matcher<'_>,
	filters: ActiveFilters,
) -> Vec<Candidate<'a>> {
	pool.iter()
		.copied()
		.filter(|record| matcher.matches(record, filters))
		.map(Candidate::new)
		.collect()
}

/// Finds the table entry whose canonical key or surface forms include `term`.
fn synonym_entry<'t>(
	table: &'t BTreeMap<String, Vec<String>>,
	term: &str,
) -> Option<(&'t str, &'t [String])> {
	let term = text::fold(term);

	table
		.iter()
		.find(|(canonical, forms)| **canonical == term || forms.iter().any(|form| *form == term))
		.map(|(canonical, forms)| (canonical.as_str(), forms.as_slice()))
}

#[cfg(test)]
mod tests {
	use scout_domain::Bounds;

	use super::*;

	fn condo() -> ListingRecord {
		ListingRecord {
			id: "c1".to_string(),
			listing_type: Some("Condominium".to_string()),
			price: Some(4_000_000.0),
			count: Some(1),
			brand: Some("Ayala Land Premier".to_string()),
			location: Some("Rockwell, Makati".to_string()),
			tags: vec!["Lap Pool".to_string(), "Fitness Center".to_string()],
			units: vec![scout_domain::UnitVariant {
				price: Some(7_000_000.0),
				count: Some(2),
				..Default::default()
			}],
			..Default::default()
		}
	}

	#[test]
	fn numeric_ranges_match_over_units() {
		let synonyms = Synonyms::default();
		let criteria = SearchCriteria {
			price: Bounds { min: Some(6_000_000.0), max: Some(8_000_000.0) },
			count: Bounds { min: Some(2), max: None },
			..Default::default()
		};
		let matcher = Matcher::new(&criteria, &synonyms);

		assert!(matcher.matches(&condo(), ActiveFilters::STRICT));
	}

	#[test]
	fn type_and_features_use_synonyms() {
		let synonyms = Synonyms::default();
		let criteria = SearchCriteria {
			listing_type: Some("condo".to_string()),
			features: Some(vec!["pool".to_string(), "gym".to_string()]),
			brands: Some(vec!["ayala land".to_string()]),
			..Default::default()
		};
		let matcher = Matcher::new(&criteria, &synonyms);

		assert!(matcher.matches(&condo(), ActiveFilters::STRICT));

		let criteria = SearchCriteria {
			features: Some(vec!["pool".to_string(), "parking".to_string()]),
			..Default::default()
		};
		let matcher = Matcher::new(&criteria, &synonyms);

		assert!(!matcher.matches(&condo(), ActiveFilters::STRICT));
		assert!(matcher.matches(
			&condo(),
			ActiveFilters { features: false, ..ActiveFilters::STRICT }
		));
	}

	#[test]
	fn house_type_does_not_match_townhouse() {
		let synonyms = Synonyms::default();
		let criteria =
			SearchCriteria { listing_type: Some("house".to_string()), ..Default::default() };
		let matcher = Matcher::new(&criteria, &synonyms);
		let townhouse =
			ListingRecord { listing_type: Some("Townhouse".to_string()), ..condo() };

		assert!(!matcher.matches(&townhouse, ActiveFilters::STRICT));
	}

	#[test]
	fn location_matches_any_token() {
		let synonyms = Synonyms::default();
		let criteria =
			SearchCriteria { location: Some("taguig, makati".to_string()), ..Default::default() };
		let matcher = Matcher::new(&criteria, &synonyms);

		assert_eq!(matcher.first_token(&condo()), Some(1));
		assert!(matcher.matches(&condo(), ActiveFilters::STRICT));
	}
}
