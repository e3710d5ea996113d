//! Reshapes filter and ranking output into the response handed to the conversational layer.

use std::collections::HashMap;

use serde::Serialize;

use scout_config::Ranking;
use scout_domain::{
	CatalogKind, PriceOutlier, RangeField, SearchCriteria, TerminalState, ValidationFlags,
};

use crate::{
	FilterPass, FilterResponse, RankingOutcome, RankingStrategy, SlimCandidate, ranking::reasons,
};

/// Why a response carries no results, or needs a follow-up question.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageCode {
	NonDomain,
	Contradictory,
	PriceTooLow,
	PriceTooHigh,
	NeedsClarification,
	NoResults,
	/// Results were found after an invalid price or count range was ignored.
	RangeDropped,
}
impl MessageCode {
	/// Precedence: terminal state, price outlier, clarification, an empty result, then a dropped
	/// range.
	pub fn from_outcome(flags: &ValidationFlags, count: usize) -> Option<Self> {
		if let Some(terminal) = flags.terminal {
			return Some(match terminal {
				TerminalState::NonDomain => Self::NonDomain,
				TerminalState::Contradictory => Self::Contradictory,
			});
		}
		if let Some(outlier) = flags.price_outlier {
			return Some(match outlier {
				PriceOutlier::TooLow => Self::PriceTooLow,
				PriceOutlier::TooHigh => Self::PriceTooHigh,
			});
		}
		if flags.needs_clarification() {
			return Some(Self::NeedsClarification);
		}

		if count == 0 {
			return Some(Self::NoResults);
		}

		(!flags.range_issues.is_empty()).then_some(Self::RangeDropped)
	}

	pub fn message(self, kind: CatalogKind, flags: &ValidationFlags) -> String {
		match self {
			Self::NonDomain => format!("not a {} query", kind.as_str()),
			Self::Contradictory => "contradictory request".to_string(),
			Self::PriceTooLow => "price too low".to_string(),
			Self::PriceTooHigh => "price too high".to_string(),
			Self::NeedsClarification => "needs clarification".to_string(),
			Self::NoResults => format!("no {} found", kind.plural()),
			Self::RangeDropped => {
				let fields: Vec<&str> = flags
					.range_issues
					.iter()
					.map(|issue| match issue.field {
						RangeField::Price => "price",
						RangeField::Count => kind.count_label(),
					})
					.collect();

				format!("invalid {} range ignored", fields.join(" and "))
			},
		}
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct ResultItem {
	/// 1-based position in the ranked list.
	pub rank: usize,
	pub score: f32,
	pub reason: String,
	#[serde(flatten)]
	pub candidate: SlimCandidate,
}

#[derive(Clone, Debug, Serialize)]
pub struct SearchResults {
	pub kind: CatalogKind,
	pub items: Vec<ResultItem>,
	pub count: usize,
	pub requested_count: u32,
	pub reference_location: Option<String>,
	pub pass: Option<FilterPass>,
	pub strategy: RankingStrategy,
	pub degraded: bool,
	pub message_code: Option<MessageCode>,
	pub message: Option<String>,
	pub flags: ValidationFlags,
}

/// Orders candidates by `outcome`, filling any missing score or reason.
///
/// Missing scores fall back to position (100, 95, 90, ...) floored at the minimum display score.
/// Missing reasons are built from the candidate's attributes.
pub fn assemble(
	kind: CatalogKind,
	criteria: &SearchCriteria,
	filtered: FilterResponse,
	outcome: RankingOutcome,
	cfg: &Ranking,
) -> SearchResults {
	let FilterResponse { candidates, reference_location, flags, requested_count, pass, .. } =
		filtered;
	let mut by_id: HashMap<String, SlimCandidate> =
		candidates.iter().map(|candidate| (candidate.id.clone(), candidate.clone())).collect();
	let mut ordered: Vec<SlimCandidate> = outcome
		.ordered_ids
		.iter()
		.filter_map(|id| by_id.remove(id))
		.collect();

	// Anything the order left out keeps its filter position at the end.
	ordered.extend(candidates.into_iter().filter(|candidate| by_id.contains_key(&candidate.id)));

	let items: Vec<ResultItem> = ordered
		.into_iter()
		.enumerate()
		.map(|(position, candidate)| ResultItem {
			rank: position + 1,
			score: outcome
				.scores_by_id
				.get(&candidate.id)
				.copied()
				.unwrap_or_else(|| position_score(position, cfg)),
			reason: outcome
				.reasons_by_id
				.get(&candidate.id)
				.cloned()
				.unwrap_or_else(|| reasons::synthesized_reason(&candidate, criteria, kind)),
			candidate,
		})
		.collect();
	let message_code = MessageCode::from_outcome(&flags, items.len());

	SearchResults {
		kind,
		count: items.len(),
		items,
		requested_count,
		reference_location,
		pass,
		strategy: outcome.strategy,
		degraded: outcome.degraded,
		message: message_code.map(|code| code.message(kind, &flags)),
		message_code,
		flags,
	}
}

fn position_score(position: usize, cfg: &Ranking) -> f32 {
	(cfg.max_display_score - 5.0 * position as f32).max(cfg.min_display_score)
}
