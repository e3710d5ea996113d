use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{lenient, text};

/// The two catalogs served by the engine. Both share one filter and ranking pipeline.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
	#[default]
	Property,
	Vehicle,
}
impl CatalogKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Property => "property",
			Self::Vehicle => "vehicle",
		}
	}

	pub fn plural(self) -> &'static str {
		match self {
			Self::Property => "properties",
			Self::Vehicle => "vehicles",
		}
	}

	/// What the count range measures for this catalog.
	pub fn count_label(self) -> &'static str {
		match self {
			Self::Property => "bedrooms",
			Self::Vehicle => "seats",
		}
	}

	pub fn price_bounds(self, cfg: &scout_config::Config) -> scout_config::PriceBounds {
		match self {
			Self::Property => cfg.search.price.property,
			Self::Vehicle => cfg.search.price.vehicle,
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeoPoint {
	pub latitude: f64,
	pub longitude: f64,
}
impl GeoPoint {
	const EARTH_RADIUS_KM: f64 = 6_371.0;

	/// Great-circle distance using the haversine formula.
	pub fn distance_km(self, other: Self) -> f64 {
		let lat1 = self.latitude.to_radians();
		let lat2 = other.latitude.to_radians();
		let d_lat = (other.latitude - self.latitude).to_radians();
		let d_lon = (other.longitude - self.longitude).to_radians();
		let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

		2.0 * Self::EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
	}
}

/// A unit-level offer under a listing: a floor plan of a condo project or a trim of a model.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UnitVariant {
	pub name: Option<String>,
	pub price: Option<f64>,
	pub count: Option<u32>,
	#[serde(default)]
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ListingRecord {
	pub id: String,
	pub name: Option<String>,
	pub listing_type: Option<String>,
	pub price: Option<f64>,
	/// Bedrooms for properties, seats for vehicles.
	pub count: Option<u32>,
	/// Developer for properties, make for vehicles.
	pub brand: Option<String>,
	/// Project for properties, model for vehicles.
	pub project: Option<String>,
	pub location: Option<String>,
	pub description: Option<String>,
	pub fuel_type: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	pub coordinates: Option<GeoPoint>,
	#[serde(default)]
	pub units: Vec<UnitVariant>,
	/// Precomputed content embedding, when the feed carries one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub embedding: Option<Vec<f32>>,
}
impl ListingRecord {
	/// Adapts a content-feed object. Returns `None` when the object has no usable id.
	pub fn from_feed(value: &Value) -> Option<Self> {
		let fields = value.as_object()?;
		let id = lenient::first(fields, &["id", "_id", "listing_id", "slug"]).and_then(lenient::text)?;

		Some(Self {
			id,
			name: text_field(fields, &["name", "title", "model_name"]),
			listing_type: text_field(
				fields,
				&["property_type", "vehicle_type", "body_type", "type", "category"],
			),
			price: amount_field(fields, &["price", "list_price", "srp", "price_min"])
				.filter(|price| *price >= 0.0),
			count: count_field(fields, &["bedrooms", "seats", "seating_capacity", "seater"]),
			brand: text_field(fields, &["developer", "brand", "make", "manufacturer"]),
			project: text_field(fields, &["project", "project_name", "model"]),
			location: composite_location(fields),
			description: text_field(fields, &["description", "summary", "details"]),
			fuel_type: text_field(fields, &["fuel_type", "fuel"]),
			tags: merged_list(fields, &["amenities", "features", "tags"]),
			coordinates: coordinates(fields),
			units: lenient::first(fields, &["units", "unit_types", "variants", "floor_plans"])
				.and_then(Value::as_array)
				.map(|items| items.iter().filter_map(unit_from_feed).collect())
				.unwrap_or_default(),
			embedding: lenient::first(fields, &["embedding", "vector"]).and_then(vector),
		})
	}

	pub fn unit_prices(&self) -> impl Iterator<Item = f64> + '_ {
		self.units.iter().filter_map(|unit| unit.price)
	}

	/// Listing-level price followed by every unit price.
	pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
		self.price.into_iter().chain(self.unit_prices())
	}

	pub fn counts(&self) -> impl Iterator<Item = u32> + '_ {
		self.count.into_iter().chain(self.units.iter().filter_map(|unit| unit.count))
	}

	pub fn all_tags(&self) -> impl Iterator<Item = &str> + '_ {
		self.tags
			.iter()
			.chain(self.units.iter().flat_map(|unit| unit.tags.iter()))
			.map(String::as_str)
	}

	/// Cheapest unit when units carry prices, otherwise the listing price.
	pub fn price_floor(&self) -> Option<f64> {
		self.unit_prices().reduce(f64::min).or(self.price)
	}

	/// Most expensive unit when units carry prices, otherwise the listing price.
	pub fn price_ceiling(&self) -> Option<f64> {
		self.unit_prices().reduce(f64::max).or(self.price)
	}

	/// Folded location, name and description used for text-location matching.
	pub fn location_haystack(&self) -> String {
		let parts = [self.location.as_deref(), self.name.as_deref(), self.description.as_deref()];

		text::fold(&parts.into_iter().flatten().collect::<Vec<_>>().join(" | "))
	}
}

/// Accepts a bare array or an envelope carrying `data`, `items` or `results`.
pub fn parse_catalog(value: &Value) -> Vec<ListingRecord> {
	let items = match value {
		Value::Array(items) => items,
		Value::Object(fields) => match lenient::first(fields, &["data", "items", "results"]) {
			Some(Value::Array(items)) => items,
			_ => return Vec::new(),
		},
		_ => return Vec::new(),
	};

	items.iter().filter_map(ListingRecord::from_feed).collect()
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	lenient::first(fields, keys).and_then(lenient::text)
}

fn number_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
	lenient::first(fields, keys).and_then(lenient::number)
}

fn amount_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
	lenient::first(fields, keys).and_then(lenient::amount)
}

fn count_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
	number_field(fields, keys)
		.filter(|value| *value >= 0.0 && *value <= u32::MAX as f64)
		.map(|value| value.floor() as u32)
}

fn merged_list(fields: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for key in keys {
		let Some(value) = fields.get(*key) else { continue };

		for item in lenient::string_list(value) {
			if !out.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
				out.push(item);
			}
		}
	}

	out
}

fn composite_location(fields: &Map<String, Value>) -> Option<String> {
	let mut parts: Vec<String> = Vec::new();

	for key in ["location", "address", "area", "city", "municipality", "province", "region"] {
		let Some(part) = fields.get(key).and_then(lenient::text) else { continue };

		let folded = text::fold(&part);

		if !parts.iter().any(|existing| text::fold(existing).contains(&folded)) {
			parts.push(part);
		}
	}

	if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

fn coordinates(fields: &Map<String, Value>) -> Option<GeoPoint> {
	let nested = lenient::first(fields, &["coordinates", "geo", "position"]).and_then(Value::as_object);
	let source = nested.unwrap_or(fields);
	let latitude = number_field(source, &["latitude", "lat"])?;
	let longitude = number_field(source, &["longitude", "lng", "lon"])?;

	if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
		return None;
	}

	Some(GeoPoint { latitude, longitude })
}

fn unit_from_feed(value: &Value) -> Option<UnitVariant> {
	let fields = value.as_object()?;

	Some(UnitVariant {
		name: text_field(fields, &["name", "title", "unit_type", "variant"]),
		price: amount_field(fields, &["price", "list_price", "srp"]).filter(|price| *price >= 0.0),
		count: count_field(fields, &["bedrooms", "seats", "seating_capacity"]),
		tags: merged_list(fields, &["features", "amenities", "tags"]),
	})
}

fn vector(value: &Value) -> Option<Vec<f32>> {
	let items = value.as_array()?;
	let mut out = Vec::with_capacity(items.len());

	for item in items {
		out.push(item.as_f64()? as f32);
	}

	if out.is_empty() { None } else { Some(out) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn adapts_property_feed_objects() {
		let feed = serde_json::json!({
			"id": 42,
			"title": "Verve Residences",
			"developer": "Ayala Land",
			"property_type": "Condominium",
			"city": "Taguig",
			"address": "BGC, Taguig",
			"amenities": [{ "name": "Swimming Pool" }, "Gym"],
			"lat": "14.55",
			"lng": 121.05,
			"unit_types": [
				{ "bedrooms": "2", "price": "₱12,500,000", "features": ["Balcony"] },
				{ "bedrooms": 1, "price": 8_000_000 }
			]
		});
		let record = ListingRecord::from_feed(&feed).expect("record must parse");

		assert_eq!(record.id, "42");
		assert_eq!(record.name.as_deref(), Some("Verve Residences"));
		assert_eq!(record.location.as_deref(), Some("BGC, Taguig"));
		assert_eq!(record.tags, vec!["Swimming Pool", "Gym"]);
		assert_eq!(record.price_floor(), Some(8_000_000.0));
		assert_eq!(record.price_ceiling(), Some(12_500_000.0));
		assert_eq!(record.counts().collect::<Vec<_>>(), vec![2, 1]);
		assert!(record.all_tags().any(|tag| tag == "Balcony"));
		assert!(record.coordinates.is_some());
	}

	#[test]
	fn skips_objects_without_id() {
		let catalog = serde_json::json!({ "data": [{ "name": "orphan" }, { "id": "a" }] });
		let records = parse_catalog(&catalog);

		assert_eq!(records.len(), 1);
		assert_eq!(records[0].id, "a");
	}

	#[test]
	fn price_bounds_fall_back_to_listing_price() {
		let record = ListingRecord { id: "x".to_string(), price: Some(3.0), ..Default::default() };

		assert_eq!(record.price_floor(), Some(3.0));
		assert_eq!(record.price_ceiling(), Some(3.0));
	}

	#[test]
	fn haversine_distance_is_reasonable() {
		let makati = GeoPoint { latitude: 14.5547, longitude: 121.0244 };
		let tagaytay = GeoPoint { latitude: 14.1153, longitude: 120.9621 };
		let distance = makati.distance_km(tagaytay);

		assert!((45.0..55.0).contains(&distance), "unexpected distance {distance}");
		assert!(makati.distance_km(makati) < 1e-9);
	}
}
