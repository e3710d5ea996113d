mod embedding;
mod llm;

pub(crate) mod reasons;

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{SearchService, SlimCandidate};
use scout_domain::{CatalogKind, SearchCriteria};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStrategy {
	/// Few enough candidates that filter order is kept and self-scored.
	Skip,
	Embedding,
	Llm,
	/// Filter order after every strategy failed or broke the output contract.
	Identity,
}
impl RankingStrategy {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Skip => "skip",
			Self::Embedding => "embedding",
			Self::Llm => "llm",
			Self::Identity => "identity",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankingOutcome {
	pub ordered_ids: Vec<String>,
	/// Display scores on a 0 to 100 scale.
	pub scores_by_id: BTreeMap<String, f32>,
	pub reasons_by_id: BTreeMap<String, String>,
	pub strategy: RankingStrategy,
	/// The selected strategy did not produce this outcome.
	pub degraded: bool,
}
impl RankingOutcome {
	pub fn skipped(candidates: &[SlimCandidate]) -> Self {
		Self {
			ordered_ids: candidates.iter().map(|candidate| candidate.id.clone()).collect(),
			scores_by_id: BTreeMap::new(),
			reasons_by_id: BTreeMap::new(),
			strategy: RankingStrategy::Skip,
			degraded: false,
		}
	}

	pub fn identity(candidates: &[SlimCandidate]) -> Self {
		Self { strategy: RankingStrategy::Identity, degraded: true, ..Self::skipped(candidates) }
	}

	/// `ordered_ids` holds every candidate id exactly once and nothing else.
	pub fn is_permutation(&self, candidates: &[SlimCandidate]) -> bool {
		if self.ordered_ids.len() != candidates.len() {
			return false;
		}

		let expected: HashSet<&str> =
			candidates.iter().map(|candidate| candidate.id.as_str()).collect();
		let mut seen = HashSet::with_capacity(self.ordered_ids.len());

		self.ordered_ids.iter().all(|id| expected.contains(id.as_str()) && seen.insert(id.as_str()))
	}

	/// A permutation with a score and a reason for every id.
	pub fn is_complete(&self, candidates: &[SlimCandidate]) -> bool {
		self.is_permutation(candidates)
			&& self
				.ordered_ids
				.iter()
				.all(|id| self.scores_by_id.contains_key(id) && self.reasons_by_id.contains_key(id))
	}
}

/// Chooses a strategy from the candidate count alone.
pub fn select_strategy(count: usize, cfg: &scout_config::Ranking) -> RankingStrategy {
	if count <= cfg.skip_max_candidates as usize {
		RankingStrategy::Skip
	} else if count <= cfg.embedding_max_candidates as usize {
		RankingStrategy::Embedding
	} else {
		RankingStrategy::Llm
	}
}

impl SearchService {
	/// Orders `candidates` by relevance. Never fails.
	///
	/// Embedding failures fall through to generative ranking, whose failures fall through to
	/// filter order. Outcomes that drop, repeat or invent ids are replaced by filter order.
	pub async fn rank(
		&self,
		criteria: &SearchCriteria,
		candidates: &[SlimCandidate],
		kind: CatalogKind,
	) -> RankingOutcome {
		let selected = select_strategy(candidates.len(), &self.cfg.ranking);

		tracing::info!(
			strategy = selected.as_str(),
			candidates = candidates.len(),
			"Ranking strategy selected."
		);

		if selected == RankingStrategy::Skip {
			return RankingOutcome::skipped(candidates);
		}
		if selected == RankingStrategy::Embedding {
			match self.rank_by_embedding(criteria, candidates, kind).await {
				Ok(outcome) if outcome.is_complete(candidates) => return outcome,
				Ok(_) => tracing::warn!(
					"Embedding ranking returned an incomplete order; falling back to generative ranking."
				),
				Err(err) => tracing::warn!(
					error = %err,
					"Embedding ranking failed; falling back to generative ranking."
				),
			}
		}

		let fell_back = selected != RankingStrategy::Llm;

		match self.rank_by_llm(criteria, candidates, kind).await {
			Ok(mut outcome) if outcome.is_complete(candidates) => {
				outcome.degraded |= fell_back;

				outcome
			},
			Ok(outcome)
				if outcome.strategy == RankingStrategy::Identity
					&& outcome.is_permutation(candidates) =>
				outcome,
			Ok(_) => {
				tracing::warn!("Generative ranking returned an incomplete order; using filter order.");

				RankingOutcome::identity(candidates)
			},
			Err(err) => {
				tracing::warn!(error = %err, "Generative ranking failed; using filter order.");

				RankingOutcome::identity(candidates)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidates(ids: &[&str]) -> Vec<SlimCandidate> {
		ids.iter().map(|id| SlimCandidate { id: id.to_string(), ..Default::default() }).collect()
	}

	#[test]
	fn selects_strategy_by_count() {
		let cfg = scout_config::Ranking::default();

		assert_eq!(select_strategy(0, &cfg), RankingStrategy::Skip);
		assert_eq!(select_strategy(3, &cfg), RankingStrategy::Skip);
		assert_eq!(select_strategy(4, &cfg), RankingStrategy::Embedding);
		assert_eq!(select_strategy(10, &cfg), RankingStrategy::Embedding);
		assert_eq!(select_strategy(11, &cfg), RankingStrategy::Llm);
	}

	#[test]
	fn permutation_rejects_duplicates_and_strangers() {
		let input = candidates(&["a", "b", "c"]);
		let mut outcome = RankingOutcome::identity(&input);

		assert!(outcome.is_permutation(&input));
		assert!(!outcome.is_complete(&input));

		outcome.ordered_ids = vec!["a".to_string(), "a".to_string(), "c".to_string()];

		assert!(!outcome.is_permutation(&input));

		outcome.ordered_ids = vec!["a".to_string(), "b".to_string(), "x".to_string()];

		assert!(!outcome.is_permutation(&input));
	}
}
