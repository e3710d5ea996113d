mod candidate;
mod diversity;
mod filter;
mod geo;

pub use candidate::{Candidate, SlimCandidate};

use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::{SearchResults, SearchService, assemble};
use filter::{ActiveFilters, Matcher};
use geo::GeoResolver;
use scout_domain::{
	CatalogKind, ListingRecord, NormalizedCriteria, SearchCriteria, ValidationFlags, normalize,
};

/// The cascade stage that produced the candidates.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPass {
	Strict,
	AmenityRelaxed,
	PriceRelaxed,
	GeoFallback,
}
impl FilterPass {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Strict => "strict",
			Self::AmenityRelaxed => "amenity_relaxed",
			Self::PriceRelaxed => "price_relaxed",
			Self::GeoFallback => "geo_fallback",
		}
	}
}

/// Pre-ranking result of the filter engine.
#[derive(Clone, Debug, Serialize)]
pub struct FilterResponse {
	pub candidates: Vec<SlimCandidate>,
	pub count: usize,
	pub reference_location: Option<String>,
	pub flags: ValidationFlags,
	pub requested_count: u32,
	/// `None` when filtering was skipped or every pass came back empty.
	pub pass: Option<FilterPass>,
}
impl FilterResponse {
	fn empty(normalized: &NormalizedCriteria) -> Self {
		Self {
			candidates: Vec::new(),
			count: 0,
			reference_location: None,
			flags: normalized.flags.clone(),
			requested_count: normalized.criteria.requested_count,
			pass: None,
		}
	}
}

impl SearchService {
	/// Runs normalize, filter, rank and assemble for one request. Never fails.
	pub async fn search(
		&self,
		raw_criteria: &Value,
		kind: CatalogKind,
		catalog: &[ListingRecord],
	) -> SearchResults {
		let normalized = normalize(raw_criteria, kind, &self.cfg);
		let trace_id = Uuid::new_v4();
		let fingerprint = criteria_fingerprint(&normalized.criteria);
		let span = tracing::info_span!(
			"search",
			trace_id = %trace_id,
			kind = kind.as_str(),
			criteria = %fingerprint,
		);

		async {
			let filtered = self.filter(catalog, &normalized, kind).await;
			let outcome = self.rank(&normalized.criteria, &filtered.candidates, kind).await;
			let results =
				assemble::assemble(kind, &normalized.criteria, filtered, outcome, &self.cfg.ranking);

			tracing::info!(
				count = results.count,
				strategy = results.strategy.as_str(),
				degraded = results.degraded,
				message = results.message.as_deref().unwrap_or(""),
				"Search completed."
			);

			results
		}
		.instrument(span)
		.await
	}

	/// Runs the filter cascade over `catalog` and returns capped slim candidates.
	///
	/// Blocking validation flags skip filtering entirely. Passes run in order and the first
	/// non-empty one wins: strict, amenity-relaxed, price-relaxed, then geo fallback.
	pub async fn filter(
		&self,
		catalog: &[ListingRecord],
		normalized: &NormalizedCriteria,
		kind: CatalogKind,
	) -> FilterResponse {
		if normalized.flags.blocks_search() {
			tracing::info!(flags = ?normalized.flags, "Filtering skipped by validation flags.");

			return FilterResponse::empty(normalized);
		}

		let criteria = &normalized.criteria;
		let search_cfg = &self.cfg.search;
		let matcher = Matcher::new(criteria, &self.cfg.synonyms);
		let pool: Vec<&ListingRecord> =
			catalog.iter().filter(|record| !criteria.exclude_ids.contains(&record.id)).collect();
		let mut reference_location = criteria.location.clone();
		let mut pass = FilterPass::Strict;
		let mut found = filter::run_pass(&pool, &matcher, ActiveFilters::STRICT);

		tracing::debug!(pass = pass.as_str(), count = found.len(), pool = pool.len(), "Filter pass.");

		if found.is_empty() && criteria.has_location() && criteria.features.is_some() {
			pass = FilterPass::AmenityRelaxed;
			found = filter::run_pass(
				&pool,
				&matcher,
				ActiveFilters { features: false, ..ActiveFilters::STRICT },
			);

			tracing::debug!(pass = pass.as_str(), count = found.len(), "Filter pass.");
		}
		if found.is_empty() && criteria.has_location() && criteria.price.is_closed() {
			pass = FilterPass::PriceRelaxed;
			found = filter::run_pass(
				&pool,
				&matcher,
				ActiveFilters { price: false, ..ActiveFilters::STRICT },
			);

			tracing::debug!(pass = pass.as_str(), count = found.len(), "Filter pass.");
		}
		if found.is_empty()
			&& criteria.proximity
			&& let Some(location) = criteria.location.as_deref()
		{
			let mut resolver = GeoResolver::new(
				self.providers.geocoder.as_ref(),
				&self.cfg.providers.geocoder,
				location,
			);

			if let Some(place) = resolver.resolve().await {
				let nearby = filter::run_pass(
					&pool,
					&matcher,
					ActiveFilters { location: false, ..ActiveFilters::STRICT },
				);

				pass = FilterPass::GeoFallback;
				found = geo::within_radius(
					nearby,
					place.point,
					search_cfg.geo_radius_km,
					criteria.sort.is_none(),
				);
				reference_location = Some(place.label.clone());

				tracing::debug!(pass = pass.as_str(), count = found.len(), "Filter pass.");
			}
		}

		let mut found = candidate::dedup_by_id(found);

		if let Some(sort) = criteria.sort {
			candidate::sort_by_price(&mut found, sort);
		}

		let cap = criteria.requested_count.min(search_cfg.max_results) as usize;
		let mut found = diversity::balance(found, &matcher, cap);

		found.truncate(cap);

		let candidates: Vec<SlimCandidate> =
			found.iter().map(|candidate| candidate.slim(search_cfg)).collect();
		let pass = (!candidates.is_empty()).then_some(pass);

		tracing::info!(
			kind = kind.as_str(),
			pass = pass.map(FilterPass::as_str).unwrap_or("none"),
			count = candidates.len(),
			cap,
			"Filtering completed."
		);

		FilterResponse {
			count: candidates.len(),
			candidates,
			reference_location,
			flags: normalized.flags.clone(),
			requested_count: criteria.requested_count,
			pass,
		}
	}
}

/// Short blake3 digest of the normalized criteria, logged to correlate identical requests.
pub fn criteria_fingerprint(criteria: &SearchCriteria) -> String {
	let raw = serde_json::to_vec(criteria).unwrap_or_default();

	blake3::hash(&raw).to_hex().as_str()[..16].to_string()
}
