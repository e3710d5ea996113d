pub mod assemble;
pub mod ranking;
pub mod search;

mod error;

pub use assemble::{MessageCode, ResultItem, SearchResults};
pub use error::{Error, Result};
pub use ranking::{RankingOutcome, RankingStrategy, select_strategy};
pub use scout_providers::geocode::Place;
pub use search::{Candidate, FilterPass, FilterResponse, SlimCandidate};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;

use scout_config::{Config, EmbeddingProviderConfig, GeocoderConfig, LlmProviderConfig};
use scout_providers::{embedding, geocode, ranker};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Generative ranking backend. Returns the raw assistant text.
pub trait RankProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>>;
}

pub trait Geocoder
where
	Self: Send + Sync,
{
	fn geocode<'a>(
		&'a self,
		cfg: &'a GeocoderConfig,
		query: &'a str,
	) -> BoxFuture<'a, Result<Option<Place>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub ranker: Arc<dyn RankProvider>,
	pub geocoder: Arc<dyn Geocoder>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		ranker: Arc<dyn RankProvider>,
		geocoder: Arc<dyn Geocoder>,
	) -> Self {
		Self { embedding, ranker, geocoder }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), ranker: provider.clone(), geocoder: provider }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config) -> Self {
		Self { cfg, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		Self { cfg, providers }
	}
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}

impl RankProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(ranker::complete(cfg, messages).await?) })
	}
}

impl Geocoder for DefaultProviders {
	fn geocode<'a>(
		&'a self,
		cfg: &'a GeocoderConfig,
		query: &'a str,
	) -> BoxFuture<'a, Result<Option<Place>>> {
		Box::pin(async move { Ok(geocode::geocode(cfg, query).await?) })
	}
}

/// Bounds a provider call. An elapsed timer is reported as [`Error::Timeout`].
pub(crate) async fn with_timeout<T>(
	provider: &'static str,
	timeout_ms: u64,
	fut: impl Future<Output = Result<T>>,
) -> Result<T> {
	match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
		Ok(result) => result,
		Err(_) => Err(Error::Timeout { provider, timeout_ms }),
	}
}
