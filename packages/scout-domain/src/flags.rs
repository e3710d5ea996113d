use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceOutlier {
	TooLow,
	TooHigh,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeField {
	Price,
	Count,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeIssueKind {
	Negative,
	Inverted,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RangeIssue {
	pub field: RangeField,
	pub kind: RangeIssueKind,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClarificationReason {
	/// The query analyzer asked for clarification.
	Analyzer { detail: Option<String> },
	/// A location like "near me" that names no place.
	UnresolvedLocation,
}

/// Requests the engine refuses to search for.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalState {
	NonDomain,
	Contradictory,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ValidationFlags {
	pub clarification: Option<ClarificationReason>,
	pub price_outlier: Option<PriceOutlier>,
	pub range_issues: Vec<RangeIssue>,
	pub terminal: Option<TerminalState>,
	/// Soft requirements and analyzer notes carried through to the response.
	pub notes: Vec<String>,
}
impl ValidationFlags {
	pub fn needs_clarification(&self) -> bool {
		self.clarification.is_some()
	}

	pub fn unrealistic_price(&self) -> bool {
		self.price_outlier.is_some()
	}

	pub fn range_issue(&self, field: RangeField) -> Option<RangeIssueKind> {
		self.range_issues.iter().find(|issue| issue.field == field).map(|issue| issue.kind)
	}

	/// Range issues alone do not block: the offending range is dropped and the search runs.
	pub fn blocks_search(&self) -> bool {
		self.terminal.is_some() || self.price_outlier.is_some() || self.clarification.is_some()
	}
}
