//! SerpAPI-backed flight and hotel search.

use crate::error::SearchError;
use crate::flights::{FlightOffer, FlightQuery, FlightSearch};
use crate::hotels::{HotelOffer, HotelQuery, HotelSearch};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default SerpAPI endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search";

/// Request timeout for search calls.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Currency flight prices are quoted in.
pub const FLIGHT_CURRENCY: &str = "USD";

/// Currency hotel prices are quoted in.
pub const HOTEL_CURRENCY: &str = "INR";

/// HTTP client for SerpAPI's Google Flights and Google Hotels engines.
#[derive(Clone)]
pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SerpApiClient {
    /// Creates a client against `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|err| SearchError::Http(err.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    async fn search(&self, params: Vec<(&str, String)>) -> Result<serde_json::Value, SearchError> {
        let mut query = vec![("api_key", self.api_key.clone())];
        query.extend(params);
        let url = reqwest::Url::parse_with_params(&self.endpoint, &query)
            .map_err(|err| SearchError::Http(format!("invalid endpoint: {err}")))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))?;

        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| SearchError::InvalidResponse(err.to_string()))?;
        if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
            return Err(SearchError::Api(message.to_string()));
        }
        Ok(value)
    }
}

/// Deserializes the array under `key`, keeping at most `limit` entries.
/// A missing key means no results.
fn results<T: DeserializeOwned>(
    mut payload: serde_json::Value,
    key: &str,
    limit: usize,
) -> Result<Vec<T>, SearchError> {
    let Some(serde_json::Value::Array(mut items)) = payload.get_mut(key).map(serde_json::Value::take)
    else {
        return Ok(Vec::new());
    };
    items.truncate(limit);
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|err| SearchError::InvalidResponse(format!("{key}: {err}")))
}

fn flight_params(query: &FlightQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("engine", "google_flights".to_string()),
        ("departure_id", query.departure_airport.clone()),
        ("arrival_id", query.arrival_airport.clone()),
        ("outbound_date", query.outbound_date.format("%Y-%m-%d").to_string()),
        ("adults", query.adults.to_string()),
        ("currency", FLIGHT_CURRENCY.to_string()),
        (
            "type",
            if query.is_round_trip() { "3" } else { "2" }.to_string(),
        ),
    ];
    if let Some(back) = query.return_date {
        params.push(("return_date", back.format("%Y-%m-%d").to_string()));
    }
    params
}

fn hotel_params(query: &HotelQuery) -> Vec<(&'static str, String)> {
    vec![
        ("engine", "google_hotels".to_string()),
        ("q", query.q.clone()),
        ("check_in_date", query.check_in_date.format("%Y-%m-%d").to_string()),
        ("check_out_date", query.check_out_date.format("%Y-%m-%d").to_string()),
        ("adults", query.adults.to_string()),
        ("rooms", query.rooms.to_string()),
        ("currency", HOTEL_CURRENCY.to_string()),
    ]
}

#[async_trait]
impl FlightSearch for SerpApiClient {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError> {
        let payload = self.search(flight_params(query)).await?;
        results(payload, "best_flights", crate::MAX_RESULTS)
    }
}

#[async_trait]
impl HotelSearch for SerpApiClient {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>, SearchError> {
        let payload = self.search(hotel_params(query)).await?;
        results(payload, "properties", crate::MAX_RESULTS)
    }
}

impl core::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Search backend used when no API key is configured. Every search fails
/// with [`SearchError::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSearch;

#[async_trait]
impl FlightSearch for UnconfiguredSearch {
    async fn search_flights(&self, _query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError> {
        Err(SearchError::NotConfigured)
    }
}

#[async_trait]
impl HotelSearch for UnconfiguredSearch {
    async fn search_hotels(&self, _query: &HotelQuery) -> Result<Vec<HotelOffer>, SearchError> {
        Err(SearchError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn query(return_date: Option<NaiveDate>) -> FlightQuery {
        FlightQuery {
            departure_airport: "BLR".into(),
            arrival_airport: "BOM".into(),
            outbound_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            return_date,
            adults: 2,
        }
    }

    fn param<'a>(params: &'a [(&str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn one_way_and_round_trip_types() {
        let one_way = flight_params(&query(None));
        assert_eq!(param(&one_way, "type"), Some("2"));
        assert_eq!(param(&one_way, "return_date"), None);
        assert_eq!(param(&one_way, "currency"), Some("USD"));

        let round = flight_params(&query(NaiveDate::from_ymd_opt(2026, 3, 8)));
        assert_eq!(param(&round, "type"), Some("3"));
        assert_eq!(param(&round, "return_date"), Some("2026-03-08"));
    }

    #[test]
    fn results_are_capped_and_missing_key_is_empty() {
        let payload = json!({
            "best_flights": (0..8).map(|i| json!({"price": i, "flights": []})).collect::<Vec<_>>()
        });
        let offers: Vec<FlightOffer> = results(payload, "best_flights", 5).unwrap();
        assert_eq!(offers.len(), 5);
        assert_eq!(offers[0].price, Some(0.0));

        let none: Vec<FlightOffer> = results(json!({}), "best_flights", 5).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn hotel_results_parse_known_fields() {
        let payload = json!({
            "properties": [{
                "name": "Sea View",
                "type": "hotel",
                "rate_per_night": {"lowest": "₹4,250", "extracted_lowest": 4250},
                "overall_rating": 4.3,
                "amenities": ["Pool", "Free Wi-Fi"],
                "images": [{"thumbnail": "ignored"}]
            }]
        });
        let offers: Vec<HotelOffer> = results(payload, "properties", 5).unwrap();
        assert_eq!(offers[0].name, "Sea View");
        assert_eq!(offers[0].kind.as_deref(), Some("hotel"));
        assert_eq!(
            offers[0].rate_per_night.as_ref().unwrap().extracted_lowest,
            Some(4250.0)
        );
    }
}
