use std::{cmp::Ordering, collections::HashSet};

use serde::Serialize;

use scout_config::Search;
use scout_domain::{ListingRecord, SortOrder, text};

/// A listing that survived the filter cascade. Borrowed from the caller's catalog.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
	pub record: &'a ListingRecord,
	/// Set only by the geo fallback pass.
	pub distance_km: Option<f64>,
}
impl<'a> Candidate<'a> {
	pub fn new(record: &'a ListingRecord) -> Self {
		Self { record, distance_km: None }
	}

	pub fn slim(&self, cfg: &Search) -> SlimCandidate {
		let record = self.record;
		let mut counts: Vec<u32> = record.counts().collect();

		counts.sort_unstable();
		counts.dedup();

		SlimCandidate {
			id: record.id.clone(),
			name: record.name.clone(),
			listing_type: record.listing_type.clone(),
			location: record.location.clone(),
			brand: record.brand.clone(),
			project: record.project.clone(),
			price_min: record.price_floor(),
			price_max: record.price_ceiling(),
			counts,
			fuel_type: record.fuel_type.clone(),
			features: feature_sample(
				record,
				cfg.feature_sample_size as usize,
				cfg.feature_max_chars as usize,
			),
			distance_km: self.distance_km.map(|distance| (distance * 10.0).round() / 10.0),
			embedding: record.embedding.clone(),
		}
	}
}

/// What ranking strategies see of a candidate. Never converted back into a listing.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SlimCandidate {
	pub id: String,
	pub name: Option<String>,
	pub listing_type: Option<String>,
	pub location: Option<String>,
	pub brand: Option<String>,
	pub project: Option<String>,
	pub price_min: Option<f64>,
	pub price_max: Option<f64>,
	/// Distinct bedroom or seat counts across the listing and its units, ascending.
	pub counts: Vec<u32>,
	pub fuel_type: Option<String>,
	pub features: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub distance_km: Option<f64>,
	#[serde(skip)]
	pub embedding: Option<Vec<f32>>,
}
impl SlimCandidate {
	pub fn display_name(&self) -> &str {
		self.name.as_deref().or(self.project.as_deref()).unwrap_or(&self.id)
	}
}

/// Keeps the first occurrence of each id.
pub(crate) fn dedup_by_id(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
	let mut seen = HashSet::new();

	candidates.into_iter().filter(|candidate| seen.insert(candidate.record.id.as_str())).collect()
}

/// Stable price sort.
///
/// Ascending compares the cheapest unit (or the listing price) and puts unpriced listings last.
/// Descending compares the most expensive unit (or the listing price) and treats unpriced
/// listings as zero.
pub(crate) fn sort_by_price(candidates: &mut [Candidate<'_>], sort: SortOrder) {
	match sort {
		SortOrder::PriceAsc => candidates.sort_by(|lhs, rhs| {
			match (lhs.record.price_floor(), rhs.record.price_floor()) {
				(Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
				(Some(_), None) => Ordering::Less,
				(None, Some(_)) => Ordering::Greater,
				(None, None) => Ordering::Equal,
			}
		}),
		SortOrder::PriceDesc => candidates.sort_by(|lhs, rhs| {
			let lhs = lhs.record.price_ceiling().unwrap_or(0.0);
			let rhs = rhs.record.price_ceiling().unwrap_or(0.0);

			rhs.total_cmp(&lhs)
		}),
	}
}

fn feature_sample(record: &ListingRecord, sample_size: usize, max_chars: usize) -> Vec<String> {
	let mut seen = HashSet::new();

	record
		.all_tags()
		.filter(|tag| seen.insert(text::fold(tag)))
		.take(sample_size)
		.map(|tag| text::truncate_chars(tag, max_chars))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str, price: Option<f64>) -> ListingRecord {
		ListingRecord { id: id.to_string(), price, ..Default::default() }
	}

	fn ids(candidates: &[Candidate<'_>]) -> Vec<String> {
		candidates.iter().map(|candidate| candidate.record.id.clone()).collect()
	}

	#[test]
	fn ascending_puts_unpriced_last() {
		let records = [record("a", None), record("b", Some(3.0)), record("c", Some(1.0))];
		let mut candidates: Vec<_> = records.iter().map(Candidate::new).collect();

		sort_by_price(&mut candidates, SortOrder::PriceAsc);

		assert_eq!(ids(&candidates), vec!["c", "b", "a"]);
	}

	#[test]
	fn descending_treats_unpriced_as_zero() {
		let records =
			[record("a", None), record("b", Some(3.0)), record("c", Some(0.0)), record("d", Some(9.0))];
		let mut candidates: Vec<_> = records.iter().map(Candidate::new).collect();

		sort_by_price(&mut candidates, SortOrder::PriceDesc);

		assert_eq!(ids(&candidates), vec!["d", "b", "a", "c"]);
	}

	#[test]
	fn dedup_keeps_first_occurrence() {
		let records = [record("a", Some(1.0)), record("b", None), record("a", Some(2.0))];
		let candidates = dedup_by_id(records.iter().map(Candidate::new).collect());

		assert_eq!(ids(&candidates), vec!["a", "b"]);
		assert_eq!(candidates[0].record.price, Some(1.0));
	}

	#[test]
	fn slim_projection_bounds_features() {
		let mut listing = record("a", Some(1.0));

		listing.tags = vec![
			"Swimming Pool".to_string(),
			"swimming pool".to_string(),
			"Gym".to_string(),
			"A very long amenity description".to_string(),
		];

		let cfg = Search { feature_sample_size: 2, feature_max_chars: 6, ..Default::default() };
		let slim = Candidate { record: &listing, distance_km: Some(12.345) }.slim(&cfg);

		assert_eq!(slim.features, vec!["Swimmi", "Gym"]);
		assert_eq!(slim.distance_km, Some(12.3));
	}
}
