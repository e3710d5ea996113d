pub mod criteria;
pub mod flags;
pub mod lenient;
pub mod listing;
pub mod normalize;
pub mod text;

pub use criteria::{Bounds, SearchCriteria, SortOrder};
pub use flags::{
	ClarificationReason, PriceOutlier, RangeField, RangeIssue, RangeIssueKind, TerminalState,
	ValidationFlags,
};
pub use listing::{CatalogKind, GeoPoint, ListingRecord, UnitVariant, parse_catalog};
pub use normalize::{NormalizedCriteria, normalize};
