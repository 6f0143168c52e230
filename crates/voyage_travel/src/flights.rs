//! Flight search.

use crate::MAX_RESULTS;
use crate::dates::{Clock, resolve_date};
use crate::error::SearchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use voyage_tools::{FunctionCall, FunctionMetadata, ParameterInfo, Tool, ToolError, ToolFuture};

/// A resolved flight search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightQuery {
    /// IATA code of the origin airport.
    pub departure_airport: String,
    /// IATA code of the destination airport.
    pub arrival_airport: String,
    /// Departure date.
    pub outbound_date: NaiveDate,
    /// Return date for a round trip.
    pub return_date: Option<NaiveDate>,
    /// Number of adult passengers.
    pub adults: u32,
}

impl FlightQuery {
    /// Returns whether a return leg was requested.
    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Departure or arrival point of a segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportTime {
    /// Airport name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// IATA code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local time, `YYYY-MM-DD HH:MM`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// One leg of a flight offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightSegment {
    /// Operating airline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,
    /// Flight number, e.g. `6E 501`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    /// Departure point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_airport: Option<AirportTime>,
    /// Arrival point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_airport: Option<AirportTime>,
    /// Duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Cabin class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_class: Option<String>,
}

/// A bookable itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOffer {
    /// Legs in travel order.
    #[serde(default)]
    pub flights: Vec<FlightSegment>,
    /// Total duration in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<u64>,
    /// Total price in the search currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Trip type label, e.g. `One way`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub trip_type: Option<String>,
}

/// Flight search backend.
#[async_trait]
pub trait FlightSearch: Send + Sync + 'static {
    /// Returns offers for `query`, best first.
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct FlightsArgs {
    departure_airport: String,
    arrival_airport: String,
    outbound_date: String,
    return_date: Option<String>,
    adults: i64,
}

/// The `flights_finder` tool.
#[derive(Clone)]
pub struct FlightsFinderTool {
    search: Arc<dyn FlightSearch>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for FlightsFinderTool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlightsFinderTool").finish_non_exhaustive()
    }
}

impl FlightsFinderTool {
    /// Tool name.
    pub const NAME: &'static str = "flights_finder";

    /// Creates the tool.
    pub fn new(search: Arc<dyn FlightSearch>, clock: Arc<dyn Clock>) -> Self {
        Self { search, clock }
    }

    /// Validates the arguments and resolves relative dates.
    fn query(&self, args: FlightsArgs) -> Result<FlightQuery, ToolError> {
        let outbound_date = resolve_date(&args.outbound_date, self.clock.as_ref()).ok_or_else(|| {
            ToolError::validation_error(format!(
                "outbound_date '{}' must be YYYY-MM-DD, 'today' or 'tomorrow'",
                args.outbound_date
            ))
        })?;
        let return_date = match args.return_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(resolve_date(raw, self.clock.as_ref()).ok_or_else(|| {
                ToolError::validation_error(format!("return_date '{raw}' must be YYYY-MM-DD"))
            })?),
        };
        if let Some(back) = return_date
            && back < outbound_date
        {
            return Err(ToolError::validation_error(
                "return_date cannot be before outbound_date",
            ));
        }
        let adults = u32::try_from(args.adults)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| ToolError::validation_error("adults must be at least 1"))?;

        Ok(FlightQuery {
            departure_airport: args.departure_airport.trim().to_uppercase(),
            arrival_airport: args.arrival_airport.trim().to_uppercase(),
            outbound_date,
            return_date,
            adults,
        })
    }
}

impl Tool for FlightsFinderTool {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new(Self::NAME)
            .with_description(
                "Look up flights between two airports. Use IATA codes; call city_code first \
                 if you only have city names.",
            )
            .add_parameter(
                ParameterInfo::of::<String>("departure_airport").describe("IATA code (e.g. BLR)"),
            )
            .add_parameter(
                ParameterInfo::of::<String>("arrival_airport").describe("IATA code (e.g. BOM)"),
            )
            .add_parameter(
                ParameterInfo::of::<String>("outbound_date")
                    .describe("'YYYY-MM-DD', 'today', or 'tomorrow'"),
            )
            .add_parameter(
                ParameterInfo::of::<String>("return_date")
                    .describe("'YYYY-MM-DD' for a round trip")
                    .optional(),
            )
            .add_parameter(
                ParameterInfo::of::<i64>("adults")
                    .describe("Number of adult passengers")
                    .with_default(serde_json::json!(1)),
            )
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let query = self.query(call.parse()?)?;
            tracing::debug!(
                from = %query.departure_airport,
                to = %query.arrival_airport,
                date = %query.outbound_date,
                "searching flights"
            );
            let mut offers = self
                .search
                .search_flights(&query)
                .await
                .map_err(|err| ToolError::execution_error(err.to_string()))?;
            offers.truncate(MAX_RESULTS);
            Ok(serde_json::to_value(offers)?)
        })
    }
}
