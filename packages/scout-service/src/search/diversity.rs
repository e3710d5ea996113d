use std::collections::HashSet;

use crate::search::{Candidate, filter::Matcher};

/// Reorders sorted candidates so each requested location leads with its best match.
///
/// Only applies when at least two tokens were requested, at least two of them have matches, and
/// `cap` leaves room for one listing per token. If any token ends up without a candidate the
/// input order is returned unchanged.
pub(crate) fn balance<'a>(
	candidates: Vec<Candidate<'a>>,
	matcher: &Matcher<'_>,
	cap: usize,
) -> Vec<Candidate<'a>> {
	let tokens = matcher.tokens();

	if tokens.len() < 2 || cap < tokens.len() {
		return candidates;
	}

	let groups: Vec<Option<usize>> =
		candidates.iter().map(|candidate| matcher.first_token(candidate.record)).collect();
	let distinct: HashSet<usize> = groups.iter().flatten().copied().collect();

	if distinct.len() < 2 {
		return candidates;
	}

	let mut leaders = Vec::with_capacity(tokens.len());

	for token in 0..tokens.len() {
		match groups.iter().position(|group| *group == Some(token)) {
			Some(position) => leaders.push(position),
			None => {
				tracing::debug!(
					token = tokens[token].as_str(),
					"Diversity balancing skipped; a requested location has no match."
				);

				return candidates;
			},
		}
	}

	let chosen: HashSet<usize> = leaders.iter().copied().collect();
	let mut out: Vec<Candidate<'a>> = leaders.iter().map(|position| candidates[*position]).collect();

	out.extend(
		candidates
			.iter()
			.enumerate()
			.filter(|(position, _)| !chosen.contains(position))
			.map(|(_, candidate)| *candidate),
	);

	out
}

#[cfg(test)]
mod tests {
	use scout_config::Synonyms;
	use scout_domain::{ListingRecord, SearchCriteria};

	use super::*;

	fn located(id: &str, location: &str) -> ListingRecord {
		ListingRecord {
			id: id.to_string(),
			location: Some(location.to_string()),
			..Default::default()
		}
	}

	fn ids(candidates: &[Candidate<'_>]) -> Vec<String> {
		candidates.iter().map(|candidate| candidate.record.id.clone()).collect()
	}

	#[test]
	fn leads_with_one_listing_per_token() {
		let synonyms = Synonyms::default();
		let criteria =
			SearchCriteria { location: Some("cavite, taguig".to_string()), ..Default::default() };
		let matcher = Matcher::new(&criteria, &synonyms);
		let records = [
			located("t1", "BGC, Taguig"),
			located("t2", "Arca South, Taguig"),
			located("c1", "Naic, Cavite"),
			located("c2", "Imus, Cavite"),
		];
		let candidates = records.iter().map(Candidate::new).collect();
		let balanced = balance(candidates, &matcher, 2);

		assert_eq!(ids(&balanced), vec!["c1", "t1", "t2", "c2"]);
	}

	#[test]
	fn partial_coverage_keeps_input_order() {
		let synonyms = Synonyms::default();
		let criteria = SearchCriteria {
			location: Some("cavite, taguig, pasig".to_string()),
			..Default::default()
		};
		let matcher = Matcher::new(&criteria, &synonyms);
		let records = [located("t1", "Taguig"), located("c1", "Cavite"), located("t2", "Taguig")];
		let candidates = records.iter().map(Candidate::new).collect();

		assert_eq!(ids(&balance(candidates, &matcher, 3)), vec!["t1", "c1", "t2"]);
	}

	#[test]
	fn cap_below_token_count_is_a_no_op() {
		let synonyms = Synonyms::default();
		let criteria =
			SearchCriteria { location: Some("cavite, taguig".to_string()), ..Default::default() };
		let matcher = Matcher::new(&criteria, &synonyms);
		let records = [located("t1", "Taguig"), located("c1", "Cavite")];
		let candidates = records.iter().map(Candidate::new).collect();

		assert_eq!(ids(&balance(candidates, &matcher, 1)), vec!["t1", "c1"]);
	}
}
