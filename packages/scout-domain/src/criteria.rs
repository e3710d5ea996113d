use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::text;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
	PriceAsc,
	PriceDesc,
}
impl SortOrder {
	pub fn parse(raw: &str) -> Option<Self> {
		match text::fold(raw).replace([' ', '-'], "_").as_str() {
			"price_asc" | "asc" | "ascending" | "cheapest" | "lowest" | "lowest_price" =>
				Some(Self::PriceAsc),
			"price_desc" | "desc" | "descending" | "most_expensive" | "highest" | "highest_price" =>
				Some(Self::PriceDesc),
			_ => None,
		}
	}
}

/// An optional numeric range. Either side may be open.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Bounds<T> {
	pub min: Option<T>,
	pub max: Option<T>,
}
impl<T> Bounds<T>
where
	T: Copy + PartialOrd,
{
	pub fn is_active(&self) -> bool {
		self.min.is_some() || self.max.is_some()
	}

	/// Both sides present, as in "between ₱3M and ₱5M".
	pub fn is_closed(&self) -> bool {
		self.min.is_some() && self.max.is_some()
	}

	pub fn contains(&self, value: T) -> bool {
		self.min.map(|min| value >= min).unwrap_or(true)
			&& self.max.map(|max| value <= max).unwrap_or(true)
	}
}

/// Filter-ready query produced by [`crate::normalize`].
///
/// List filters are `None` when absent and never `Some(vec![])`, so "no filter" and
/// "filter matching nothing" stay distinguishable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SearchCriteria {
	/// Free-text form of the request, used for proximity intent and embedding queries.
	pub query: Option<String>,
	pub price: Bounds<f64>,
	/// Bedrooms for properties, seats for vehicles.
	pub count: Bounds<u32>,
	pub listing_type: Option<String>,
	/// Developer, brand or project names, lower-cased.
	pub brands: Option<Vec<String>>,
	/// Fuel or category tags, lower-cased.
	pub tags: Option<Vec<String>>,
	/// Folded location text with any proximity phrase removed. Comma-separated when multiple.
	pub location: Option<String>,
	pub features: Option<Vec<String>>,
	pub sort: Option<SortOrder>,
	pub requested_count: u32,
	pub exclude_ids: BTreeSet<String>,
	/// The request asked for results near a place rather than in it.
	pub proximity: bool,
}
impl SearchCriteria {
	pub fn location_tokens(&self) -> Vec<String> {
		self.location.as_deref().map(text::location_tokens).unwrap_or_default()
	}

	pub fn has_location(&self) -> bool {
		self.location.as_deref().map(|location| !location.trim().is_empty()).unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bounds_accept_open_sides() {
		let under = Bounds { min: None, max: Some(5.0) };

		assert!(under.is_active());
		assert!(!under.is_closed());
		assert!(under.contains(1.0));
		assert!(under.contains(5.0));
		assert!(!under.contains(5.1));
		assert!(!Bounds::<u32>::default().is_active());
		assert!(Bounds::<u32>::default().contains(0));
	}

	#[test]
	fn parses_sort_aliases() {
		assert_eq!(SortOrder::parse("price_asc"), Some(SortOrder::PriceAsc));
		assert_eq!(SortOrder::parse("Most Expensive"), Some(SortOrder::PriceDesc));
		assert_eq!(SortOrder::parse("relevance"), None);
	}
}
