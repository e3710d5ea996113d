use std::{cmp::Ordering, collections::HashMap};

use scout_config::Ranking;
use scout_domain::{CatalogKind, SearchCriteria};

use crate::{
	Error, RankingOutcome, RankingStrategy, Result, SearchService, SlimCandidate,
	ranking::reasons,
};

impl SearchService {
	/// Ranks by cosine similarity between the criteria text and each candidate description.
	///
	/// Candidates carrying a precomputed vector are not re-embedded. The query and candidate
	/// embedding requests run concurrently.
	pub(crate) async fn rank_by_embedding(
		&self,
		criteria: &SearchCriteria,
		candidates: &[SlimCandidate],
		kind: CatalogKind,
	) -> Result<RankingOutcome> {
		let query = query_text(criteria, kind);

		if query.trim().is_empty() {
			return Err(Error::InvalidResponse { message: "Embedding query text is empty.".into() });
		}

		let cfg = &self.cfg.providers.embedding;
		let provider = self.providers.embedding.as_ref();
		let missing: Vec<usize> = candidates
			.iter()
			.enumerate()
			.filter(|(_, candidate)| candidate.embedding.is_none())
			.map(|(index, _)| index)
			.collect();
		let texts: Vec<String> =
			missing.iter().map(|index| candidate_text(&candidates[*index], kind)).collect();
		let queries = vec![query];
		let (query_vectors, candidate_vectors) = tokio::join!(
			crate::with_timeout("embedding", cfg.timeout_ms, provider.embed(cfg, &queries)),
			async {
				if texts.is_empty() {
					return Ok(Vec::new());
				}

				crate::with_timeout("embedding", cfg.timeout_ms, provider.embed(cfg, &texts)).await
			},
		);
		let query_vectors = query_vectors?;
		let candidate_vectors = candidate_vectors?;

		if query_vectors.len() != 1 {
			return Err(Error::InvalidResponse {
				message: format!("Expected one query embedding, got {}.", query_vectors.len()),
			});
		}
		if candidate_vectors.len() != texts.len() {
			return Err(Error::InvalidResponse {
				message: format!(
					"Expected {} candidate embeddings, got {}.",
					texts.len(),
					candidate_vectors.len()
				),
			});
		}

		let query_vector = &query_vectors[0];
		let fresh: HashMap<usize, Vec<f32>> = missing.into_iter().zip(candidate_vectors).collect();
		let mut scored: Vec<(usize, f32)> = Vec::with_capacity(candidates.len());

		for (index, candidate) in candidates.iter().enumerate() {
			let vector = candidate
				.embedding
				.as_deref()
				.or_else(|| fresh.get(&index).map(Vec::as_slice))
				.unwrap_or_default();
			let similarity = cosine_similarity(query_vector, vector).ok_or_else(|| {
				Error::InvalidResponse {
					message: format!("Embedding for {} is empty or has mismatched dimensions.", candidate.id),
				}
			})?;

			scored.push((index, similarity));
		}

		// Stable: ties keep filter order.
		scored.sort_by(|lhs, rhs| cmp_f32_desc(lhs.1, rhs.1));

		let mut outcome = RankingOutcome {
			ordered_ids: Vec::with_capacity(scored.len()),
			scores_by_id: Default::default(),
			reasons_by_id: Default::default(),
			strategy: RankingStrategy::Embedding,
			degraded: false,
		};

		for (index, similarity) in scored {
			let candidate = &candidates[index];

			outcome.ordered_ids.push(candidate.id.clone());
			outcome
				.scores_by_id
				.insert(candidate.id.clone(), display_score(similarity, &self.cfg.ranking));
			outcome
				.reasons_by_id
				.insert(candidate.id.clone(), similarity_reason(candidate, criteria, kind, similarity));
		}

		Ok(outcome)
	}
}

/// Free-text query, location, count and type, falling back to a generic phrase per catalog.
pub(crate) fn query_text(criteria: &SearchCriteria, kind: CatalogKind) -> String {
	let mut parts: Vec<String> = Vec::new();

	if let Some(query) = criteria.query.as_deref() {
		parts.push(query.to_string());
	}
	if let Some(listing_type) = criteria.listing_type.as_deref() {
		parts.push(listing_type.to_string());
	}
	if let Some(count) = criteria.count.min.or(criteria.count.max) {
		parts.push(format!("{count} {}", kind.count_label()));
	}
	if let Some(location) = criteria.location.as_deref() {
		parts.push(format!("in {location}"));
	}

	if parts.is_empty() {
		return match kind {
			CatalogKind::Property => "well-located residential property for sale".to_string(),
			CatalogKind::Vehicle => "reliable vehicle for sale".to_string(),
		};
	}

	parts.join(" ")
}

/// Name, type, location, brand, counts, price band and features as one line.
pub(crate) fn candidate_text(candidate: &SlimCandidate, kind: CatalogKind) -> String {
	let mut parts: Vec<String> = vec![candidate.display_name().to_string()];

	if let Some(listing_type) = candidate.listing_type.as_deref() {
		parts.push(listing_type.to_string());
	}
	if let Some(location) = candidate.location.as_deref() {
		parts.push(format!("in {location}"));
	}
	if let Some(brand) = candidate.brand.as_deref() {
		parts.push(format!("by {brand}"));
	}
	if !candidate.counts.is_empty() {
		let counts: Vec<String> = candidate.counts.iter().map(u32::to_string).collect();

		parts.push(format!("{} {}", counts.join("/"), kind.count_label()));
	}

	match (candidate.price_min, candidate.price_max) {
		(Some(min), Some(max)) if max > min => parts.push(format!(
			"priced {} to {}",
			reasons::format_price(min),
			reasons::format_price(max)
		)),
		(Some(price), _) | (None, Some(price)) =>
			parts.push(format!("priced {}", reasons::format_price(price))),
		(None, None) => {},
	}

	if !candidate.features.is_empty() {
		parts.push(format!("features: {}", candidate.features.join(", ")));
	}

	parts.join(", ")
}

pub(crate) fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Option<f32> {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return None;
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return None;
	}

	Some((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}

/// Maps similarity linearly onto the display range. Negative similarity floors at the minimum.
fn display_score(similarity: f32, cfg: &Ranking) -> f32 {
	let span = cfg.max_display_score - cfg.min_display_score;
	let score = cfg.min_display_score + span * similarity;

	(score.clamp(cfg.min_display_score, cfg.max_display_score) * 10.0).round() / 10.0
}

fn similarity_reason(
	candidate: &SlimCandidate,
	criteria: &SearchCriteria,
	kind: CatalogKind,
	similarity: f32,
) -> String {
	let mut concrete = reasons::concrete_reasons(candidate, criteria, kind);

	if concrete.len() < 2 {
		concrete.insert(0, reasons::similarity_tier(similarity).to_string());
	}

	concrete.join("; ")
}

fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
