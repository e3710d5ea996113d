use std::time::Duration;

use reqwest::{
	Client,
	header::{HeaderMap, USER_AGENT},
};
use serde::Serialize;
use serde_json::Value;

use crate::Result;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Place {
	pub latitude: f64,
	pub longitude: f64,
	pub display_name: String,
}

/// Forward-geocodes free text against a Nominatim-compatible endpoint.
///
/// Returns `Ok(None)` when the service answers but knows no such place.
pub async fn geocode(cfg: &scout_config::GeocoderConfig, query: &str) -> Result<Option<Place>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = crate::endpoint(&cfg.api_base, &cfg.path);
	let mut params = vec![("q", query), ("format", "json"), ("limit", "1")];

	if let Some(codes) = cfg.country_codes.as_deref() {
		params.push(("countrycodes", codes));
	}

	let res = client.get(url).headers(geocoder_headers(cfg)?).query(&params).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_place(&json, query))
}

fn geocoder_headers(cfg: &scout_config::GeocoderConfig) -> Result<HeaderMap> {
	let mut headers = match cfg.api_key.as_deref() {
		Some(api_key) => crate::auth_headers(api_key, &cfg.default_headers)?,
		None => {
			let mut headers = HeaderMap::new();

			crate::extend_headers(&mut headers, &cfg.default_headers)?;

			headers
		},
	};

	headers.insert(USER_AGENT, cfg.user_agent.parse()?);

	Ok(headers)
}

fn parse_place(json: &Value, query: &str) -> Option<Place> {
	let first = match json {
		Value::Array(items) => items.first()?,
		Value::Object(_) => json,
		_ => return None,
	};
	let latitude = coordinate(first.get("lat")?)?;
	let longitude = coordinate(first.get("lon")?)?;

	if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
		return None;
	}

	let display_name = first
		.get("display_name")
		.and_then(|v| v.as_str())
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.unwrap_or(query)
		.to_string();

	Some(Place { latitude, longitude, display_name })
}

/// Nominatim encodes coordinates as strings.
fn coordinate(value: &Value) -> Option<f64> {
	let parsed = match value {
		Value::Number(number) => number.as_f64(),
		Value::String(raw) => raw.trim().parse::<f64>().ok(),
		_ => None,
	};

	parsed.filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_nominatim_strings() {
		let json = serde_json::json!([
			{ "lat": "14.5509", "lon": "121.0503", "display_name": "Bonifacio Global City, Taguig" }
		]);
		let place = parse_place(&json, "bgc").expect("place");

		assert!((place.latitude - 14.5509).abs() < 1e-9);
		assert_eq!(place.display_name, "Bonifacio Global City, Taguig");
	}

	#[test]
	fn empty_result_is_none() {
		assert_eq!(parse_place(&serde_json::json!([]), "nowhere"), None);
	}

	#[test]
	fn falls_back_to_query_for_display_name() {
		let json = serde_json::json!([{ "lat": 14.0, "lon": 121.0 }]);

		let place = parse_place(&json, "Ortigas").expect("place");

		assert_eq!(place.display_name, "Ortigas");
	}
}
