use scout_config::GeocoderConfig;
use scout_domain::GeoPoint;

use crate::{Geocoder, search::Candidate};

#[derive(Clone, Debug)]
pub(crate) struct ResolvedPlace {
	pub(crate) point: GeoPoint,
	pub(crate) label: String,
}

/// Geocodes the requested location lazily and at most once per request.
pub(crate) struct GeoResolver<'a> {
	geocoder: &'a dyn Geocoder,
	cfg: &'a GeocoderConfig,
	query: &'a str,
	resolved: Option<Option<ResolvedPlace>>,
}
impl<'a> GeoResolver<'a> {
	pub(crate) fn new(geocoder: &'a dyn Geocoder, cfg: &'a GeocoderConfig, query: &'a str) -> Self {
		Self { geocoder, cfg, query, resolved: None }
	}

	pub(crate) async fn resolve(&mut self) -> Option<&ResolvedPlace> {
		if self.resolved.is_none() {
			let result = crate::with_timeout(
				"geocoder",
				self.cfg.timeout_ms,
				self.geocoder.geocode(self.cfg, self.query),
			)
			.await;
			let place = match result {
				Ok(Some(place)) => {
					tracing::info!(query = self.query, label = %place.display_name, "Location geocoded.");

					Some(ResolvedPlace {
						point: GeoPoint { latitude: place.latitude, longitude: place.longitude },
						label: place.display_name,
					})
				},
				Ok(None) => {
					tracing::info!(query = self.query, "Geocoder found no match; skipping geo fallback.");

					None
				},
				Err(err) => {
					tracing::warn!(error = %err, query = self.query, "Geocoding failed; skipping geo fallback.");

					None
				},
			};

			self.resolved = Some(place);
		}

		self.resolved.as_ref().and_then(Option::as_ref)
	}
}

/// Keeps candidates with coordinates inside `radius_km` of `origin`, tagged with their distance.
pub(crate) fn within_radius<'a>(
	candidates: Vec<Candidate<'a>>,
	origin: GeoPoint,
	radius_km: f64,
	order_by_distance: bool,
) -> Vec<Candidate<'a>> {
	let mut kept: Vec<Candidate<'a>> = candidates
		.into_iter()
		.filter_map(|candidate| {
			let distance = candidate.record.coordinates?.distance_km(origin);

			(distance <= radius_km).then_some(Candidate { distance_km: Some(distance), ..candidate })
		})
		.collect();

	if order_by_distance {
		kept.sort_by(|lhs, rhs| {
			lhs.distance_km.unwrap_or(f64::MAX).total_cmp(&rhs.distance_km.unwrap_or(f64::MAX))
		});
	}

	kept
}
