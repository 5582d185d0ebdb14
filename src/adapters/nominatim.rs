use crate::core::GeocodingService;
use crate::domain::model::GeoPoint;
use crate::utils::error::{GeocodeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

pub const DEFAULT_NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Nominatim sends coordinates as strings; some mirrors send numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(deserialize_with = "string_or_number")]
    lat: String,
    #[serde(deserialize_with = "string_or_number")]
    lon: String,
}

/// Nominatim free-text search: `GET {endpoint}?q=..&format=json&limit=N`.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    /// Nominatim rejects requests without an identifying User-Agent.
    pub fn new(endpoint: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl GeocodingService for NominatimClient {
    async fn search(&self, address: &str, max_results: usize) -> Result<Vec<GeoPoint>> {
        tracing::debug!("Making Nominatim request for: {}", address);

        let limit = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", limit.as_str())])
            .send()
            .await?;
        tracing::debug!("Nominatim response status: {}", response.status());

        if !response.status().is_success() {
            return Err(GeocodeError::UpstreamStatusError {
                service: "Nominatim".to_string(),
                status: response.status().as_u16(),
            });
        }

        let places: Vec<Place> = response.json().await?;
        Ok(places
            .into_iter()
            .take(max_results)
            .map(|place| GeoPoint {
                lat: place.lat,
                lon: place.lon,
            })
            .collect())
    }
}
