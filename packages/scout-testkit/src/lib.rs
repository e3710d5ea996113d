//! Shared fixtures for the scout test suites.

use serde_json::{Map, Value, json};

use scout_config::{
	Config, EmbeddingProviderConfig, GeocoderConfig, LlmProviderConfig, Providers, Ranking, Search,
	Service, Synonyms,
};

pub fn test_config() -> Config {
	Config {
		service: Service { log_level: "info".to_string() },
		providers: Providers {
			embedding: dummy_embedding_provider(),
			ranker: dummy_llm_provider(),
			geocoder: dummy_geocoder(),
		},
		catalog: None,
		search: Search::default(),
		ranking: Ranking::default(),
		synonyms: Synonyms::default(),
	}
}

pub fn dummy_embedding_provider() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "test".to_string(),
		dimensions: 3,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn dummy_llm_provider() -> LlmProviderConfig {
	LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://localhost".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/chat/completions".to_string(),
		model: "test".to_string(),
		temperature: 0.1,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

pub fn dummy_geocoder() -> GeocoderConfig {
	GeocoderConfig {
		api_base: "http://localhost".to_string(),
		path: "/search".to_string(),
		user_agent: "scout-tests/0.1".to_string(),
		api_key: None,
		country_codes: Some("ph".to_string()),
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

/// Eight properties across Metro Manila, Cavite and Cebu, in a content-feed shape.
pub fn property_catalog() -> Value {
	json!({
		"data": [
			{
				"id": "p1",
				"title": "Verve Residences",
				"property_type": "Condominium",
				"developer": "Ayala Land",
				"address": "BGC, Taguig",
				"price": "₱12,500,000",
				"bedrooms": 2,
				"amenities": ["Swimming Pool", "Gym"],
				"lat": 14.5509,
				"lng": 121.0503
			},
			{
				"id": "p2",
				"title": "Lumina Homes Naic",
				"property_type": "House and Lot",
				"developer": "Lumina Homes",
				"address": "Naic, Cavite",
				"price": 1_800_000,
				"bedrooms": 2,
				"amenities": "Playground, Parking",
				"lat": 14.3183,
				"lng": 120.7669
			},
			{
				"id": "p3",
				"title": "Avida Towers Sola",
				"property_type": "Condo",
				"developer": "Avida Land",
				"address": "Vertis North, Quezon City",
				"price": 4_200_000,
				"bedrooms": 1,
				"amenities": ["Pool"],
				"lat": 14.6507,
				"lng": 121.0325
			},
			{
				"id": "p4",
				"title": "Camella Dasmariñas",
				"property_type": "House and Lot",
				"developer": "Camella",
				"address": "Dasmariñas, Cavite",
				"price": "2.8M",
				"bedrooms": 3,
				"amenities": ["Playground", "Clubhouse"],
				"lat": 14.3294,
				"lng": 120.9367
			},
			{
				"id": "p5",
				"title": "Arca South Tower",
				"property_type": "Condominium",
				"developer": "Ayala Land",
				"address": "Arca South, Taguig",
				"unit_types": [
					{ "name": "1BR", "bedrooms": 1, "price": 6_500_000 },
					{ "name": "2BR", "bedrooms": 2, "price": 9_800_000, "features": ["Balcony"] }
				],
				"amenities": ["Gym", "Function Room"],
				"lat": 14.5042,
				"lng": 121.0490
			},
			{
				"id": "p6",
				"title": "Tagaytay Highlands Villa",
				"property_type": "Single Detached",
				"developer": "Highlands Prime",
				"address": "Tagaytay, Cavite",
				"price": 25_000_000,
				"bedrooms": 4,
				"amenities": ["Garden", "Parking"],
				"lat": 14.1153,
				"lng": 120.9621
			},
			{
				"id": "p7",
				"title": "Cebu IT Park Residences",
				"property_type": "Condominium",
				"developer": "Cebu Landmasters",
				"address": "Lahug, Cebu City",
				"price": 5_500_000,
				"bedrooms": 1,
				"amenities": ["Pool", "Security"],
				"lat": 10.3308,
				"lng": 123.9054
			},
			{
				"id": "p8",
				"title": "Makati Grand",
				"property_type": "Condominium",
				"developer": "Megaworld",
				"address": "Makati",
				"price": 8_000_000,
				"bedrooms": 2,
				"amenities": ["Lap Pool", "Fitness Center"],
				"lat": 14.5547,
				"lng": 121.0244
			}
		]
	})
}

pub fn vehicle_catalog() -> Value {
	json!([
		{
			"id": "v1",
			"model_name": "Toyota Fortuner",
			"body_type": "SUV",
			"make": "Toyota",
			"model": "Fortuner",
			"srp": "1,800,000",
			"seats": 7,
			"fuel_type": "Diesel",
			"features": ["Backup Camera", "4x4"]
		},
		{
			"id": "v2",
			"model_name": "Honda City",
			"body_type": "Sedan",
			"make": "Honda",
			"model": "City",
			"srp": 1_000_000,
			"seats": 5,
			"fuel_type": "Gasoline",
			"features": ["Apple CarPlay"]
		},
		{
			"id": "v3",
			"model_name": "Mitsubishi Xpander",
			"body_type": "MPV",
			"make": "Mitsubishi",
			"model": "Xpander",
			"srp": 1_100_000,
			"seats": 7,
			"fuel_type": "Gasoline"
		},
		{
			"id": "v4",
			"model_name": "Ford Ranger",
			"body_type": "Pickup",
			"make": "Ford",
			"model": "Ranger",
			"fuel_type": "Diesel",
			"variants": [
				{ "variant": "XLS", "price": 1_300_000, "seats": 5 },
				{ "variant": "Raptor", "price": 2_600_000, "seats": 5, "features": ["Sunroof"] }
			]
		}
	])
}
