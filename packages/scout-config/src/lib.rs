mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Catalog, Config, EmbeddingProviderConfig, GeocoderConfig, LlmProviderConfig, PriceBounds,
	Providers, Ranking, Search, SearchPrice, Service, Synonyms,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::Read { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::Parse { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let search = &cfg.search;

	if search.max_results == 0 {
		return Err(Error::invalid("search.max_results", "must be greater than zero."));
	}
	if search.max_requested_count == 0 {
		return Err(Error::invalid("search.max_requested_count", "must be greater than zero."));
	}
	if search.default_count == 0 || search.default_count > search.max_requested_count {
		return Err(Error::invalid(
			"search.default_count",
			"must be between 1 and search.max_requested_count.",
		));
	}
	if !search.geo_radius_km.is_finite() || search.geo_radius_km <= 0.0 {
		return Err(Error::invalid("search.geo_radius_km", "must be a positive finite number."));
	}
	if search.feature_sample_size == 0 {
		return Err(Error::invalid("search.feature_sample_size", "must be greater than zero."));
	}
	if search.feature_max_chars == 0 {
		return Err(Error::invalid("search.feature_max_chars", "must be greater than zero."));
	}

	for (field, bounds) in [
		("search.price.property", &search.price.property),
		("search.price.vehicle", &search.price.vehicle),
	] {
		if !bounds.floor.is_finite() || !bounds.ceiling.is_finite() {
			return Err(Error::invalid(field, "floor and ceiling must be finite numbers."));
		}
		if bounds.floor < 0.0 || bounds.floor >= bounds.ceiling {
			return Err(Error::invalid(field, "floor must be non-negative and below ceiling."));
		}
	}

	let ranking = &cfg.ranking;

	if ranking.embedding_max_candidates <= ranking.skip_max_candidates {
		return Err(Error::invalid(
			"ranking.embedding_max_candidates",
			"must be greater than ranking.skip_max_candidates.",
		));
	}
	if !ranking.min_display_score.is_finite() || !ranking.max_display_score.is_finite() {
		return Err(Error::invalid("ranking", "display scores must be finite numbers."));
	}
	if !(0.0..=100.0).contains(&ranking.min_display_score)
		|| !(0.0..=100.0).contains(&ranking.max_display_score)
		|| ranking.min_display_score >= ranking.max_display_score
	{
		return Err(Error::invalid(
			"ranking.min_display_score",
			"must be below ranking.max_display_score, both within 0-100.",
		));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::invalid(
			"providers.embedding.dimensions",
			"must be greater than zero.",
		));
	}

	for (field, key) in [
		("providers.embedding.api_key", &cfg.providers.embedding.api_key),
		("providers.ranker.api_key", &cfg.providers.ranker.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::invalid(field, "must be non-empty."));
		}
	}

	if cfg.providers.geocoder.user_agent.trim().is_empty() {
		return Err(Error::invalid("providers.geocoder.user_agent", "must be non-empty."));
	}

	if let Some(catalog) = cfg.catalog.as_ref() {
		if catalog.fetch_limit == 0 {
			return Err(Error::invalid("catalog.fetch_limit", "must be greater than zero."));
		}
		if catalog.api_key.trim().is_empty() {
			return Err(Error::invalid("catalog.api_key", "must be non-empty."));
		}
	}

	for (field, table) in
		[("synonyms.features", &cfg.synonyms.features), ("synonyms.categories", &cfg.synonyms.categories)]
	{
		if table.iter().any(|(canonical, forms)| canonical.is_empty() || forms.is_empty()) {
			return Err(Error::invalid(field, "entries must have a key and at least one form."));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.geocoder.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.geocoder.api_key = None;
	}
	if cfg
		.providers
		.geocoder
		.country_codes
		.as_deref()
		.map(|codes| codes.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.geocoder.country_codes = None;
	}

	cfg.search.count_required_types =
		cfg.search.count_required_types.iter().map(|value| value.trim().to_lowercase()).collect();

	for table in [&mut cfg.synonyms.features, &mut cfg.synonyms.categories] {
		let lowered = std::mem::take(table)
			.into_iter()
			.map(|(canonical, forms)| {
				let forms = forms
					.into_iter()
					.map(|form| form.trim().to_lowercase())
					.filter(|form| !form.is_empty())
					.collect();

				(canonical.trim().to_lowercase(), forms)
			})
			.collect();

		*table = lowered;
	}
}
