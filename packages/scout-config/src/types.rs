use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub catalog: Option<Catalog>,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
	#[serde(default)]
	pub synonyms: Synonyms,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub ranker: LlmProviderConfig,
	pub geocoder: GeocoderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Nominatim-compatible forward geocoder.
#[derive(Clone, Debug, Deserialize)]
pub struct GeocoderConfig {
	pub api_base: String,
	pub path: String,
	/// Public Nominatim instances reject requests without an identifying agent.
	pub user_agent: String,
	pub api_key: Option<String>,
	/// Optional. Comma-separated ISO 3166-1 alpha-2 codes, e.g. "ph".
	pub country_codes: Option<String>,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Content API the catalog is pulled from. Only the first `fetch_limit` records are read.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
	pub api_base: String,
	pub api_key: String,
	pub property_path: String,
	pub vehicle_path: String,
	pub fetch_limit: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	pub max_results: u32,
	pub default_count: u32,
	pub max_requested_count: u32,
	pub geo_radius_km: f64,
	pub feature_sample_size: u32,
	pub feature_max_chars: u32,
	/// Listing types for which a zero bedroom or seat count is contradictory.
	pub count_required_types: Vec<String>,
	pub price: SearchPrice,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			max_results: 12,
			default_count: 3,
			max_requested_count: 10,
			geo_radius_km: 100.0,
			feature_sample_size: 8,
			feature_max_chars: 48,
			count_required_types: [
				"house",
				"house and lot",
				"townhouse",
				"sedan",
				"suv",
				"mpv",
				"pickup",
				"hatchback",
				"van",
			]
			.into_iter()
			.map(str::to_string)
			.collect(),
			price: SearchPrice::default(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SearchPrice {
	pub property: PriceBounds,
	pub vehicle: PriceBounds,
}
impl Default for SearchPrice {
	fn default() -> Self {
		Self {
			property: PriceBounds { floor: 100_000.0, ceiling: 5_000_000_000.0 },
			vehicle: PriceBounds { floor: 50_000.0, ceiling: 500_000_000.0 },
		}
	}
}

/// Prices outside `floor..=ceiling` are treated as extraction mistakes, not budgets.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct PriceBounds {
	pub floor: f64,
	pub ceiling: f64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub skip_max_candidates: u32,
	pub embedding_max_candidates: u32,
	pub min_display_score: f32,
	pub max_display_score: f32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self {
			skip_max_candidates: 3,
			embedding_max_candidates: 10,
			min_display_score: 50.0,
			max_display_score: 100.0,
		}
	}
}

/// Canonical tag mapped to the surface forms that count as a match for it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Synonyms {
	pub features: BTreeMap<String, Vec<String>>,
	pub categories: BTreeMap<String, Vec<String>>,
}
impl Default for Synonyms {
	fn default() -> Self {
		Self {
			features: table(&[
				("pool", &["pool", "swimming pool", "lap pool", "infinity pool"]),
				("gym", &["gym", "fitness center", "fitness centre", "fitness gym"]),
				("parking", &["parking", "car park", "garage", "parking slot"]),
				("security", &["security", "24/7 security", "cctv", "guard house"]),
				("balcony", &["balcony", "lanai", "terrace"]),
				("playground", &["playground", "play area", "kids area"]),
				("clubhouse", &["clubhouse", "club house", "function room"]),
				("elevator", &["elevator", "lift"]),
				("garden", &["garden", "landscaped", "courtyard"]),
				("sunroof", &["sunroof", "moonroof", "panoramic roof"]),
				("backup camera", &["backup camera", "rear camera", "reverse camera", "360 camera"]),
				("carplay", &["carplay", "apple carplay", "android auto"]),
				("cruise control", &["cruise control", "adaptive cruise"]),
				("4wd", &["4wd", "4x4", "awd", "all-wheel drive", "four-wheel drive"]),
			]),
			categories: table(&[
				("condo", &["condo", "condominium", "condo unit"]),
				("house", &["house", "house and lot", "single detached", "single-detached"]),
				("townhouse", &["townhouse", "town house", "rowhouse"]),
				("lot", &["lot", "lot only", "vacant lot"]),
				("suv", &["suv", "crossover", "sport utility"]),
				("sedan", &["sedan", "saloon"]),
				("pickup", &["pickup", "pick-up", "pickup truck"]),
				("mpv", &["mpv", "minivan", "van"]),
			]),
		}
	}
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
	entries
		.iter()
		.map(|(canonical, forms)| {
			(canonical.to_string(), forms.iter().map(|form| form.to_string()).collect())
		})
		.collect()
}
