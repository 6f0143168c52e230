//! Hotel search.

use crate::MAX_RESULTS;
use crate::dates::{Clock, resolve_date};
use crate::error::SearchError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use voyage_tools::{FunctionCall, FunctionMetadata, ParameterInfo, Tool, ToolError, ToolFuture};

/// A resolved hotel search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelQuery {
    /// City or area.
    pub q: String,
    /// Arrival date.
    pub check_in_date: NaiveDate,
    /// Departure date, after `check_in_date`.
    pub check_out_date: NaiveDate,
    /// Number of adult guests.
    pub adults: u32,
    /// Number of rooms.
    pub rooms: u32,
}

/// Nightly or total price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    /// Display price, e.g. `₹4,250`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest: Option<String>,
    /// Numeric price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_lowest: Option<f64>,
}

/// A hotel result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOffer {
    /// Property name.
    pub name: String,
    /// Property kind, e.g. `hotel`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Booking or details link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Lowest nightly rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_night: Option<Rate>,
    /// Lowest total for the stay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rate: Option<Rate>,
    /// Average guest rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_rating: Option<f64>,
    /// Number of reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
    /// Location rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_rating: Option<f64>,
    /// Listed amenities.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    /// Check-in time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<String>,
    /// Check-out time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<String>,
}

/// Hotel search backend.
#[async_trait]
pub trait HotelSearch: Send + Sync + 'static {
    /// Returns properties for `query`, best first.
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct HotelsArgs {
    q: String,
    check_in_date: String,
    check_out_date: String,
    adults: i64,
    rooms: i64,
}

/// The `hotels_finder` tool.
#[derive(Clone)]
pub struct HotelsFinderTool {
    search: Arc<dyn HotelSearch>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for HotelsFinderTool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HotelsFinderTool").finish_non_exhaustive()
    }
}

fn at_least_one(value: i64, name: &str) -> Result<u32, ToolError> {
    u32::try_from(value)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| ToolError::validation_error(format!("{name} must be at least 1")))
}

impl HotelsFinderTool {
    /// Tool name.
    pub const NAME: &'static str = "hotels_finder";

    /// Creates the tool.
    pub fn new(search: Arc<dyn HotelSearch>, clock: Arc<dyn Clock>) -> Self {
        Self { search, clock }
    }

    fn query(&self, args: HotelsArgs) -> Result<HotelQuery, ToolError> {
        let date = |raw: &str, name: &str| {
            resolve_date(raw, self.clock.as_ref()).ok_or_else(|| {
                ToolError::validation_error(format!("{name} '{raw}' must be YYYY-MM-DD"))
            })
        };
        let check_in_date = date(&args.check_in_date, "check_in_date")?;
        let check_out_date = date(&args.check_out_date, "check_out_date")?;
        if check_out_date <= check_in_date {
            return Err(ToolError::validation_error(
                "check_out_date must be after check_in_date",
            ));
        }
        let q = args.q.trim().to_string();
        if q.is_empty() {
            return Err(ToolError::validation_error("q must name a city or area"));
        }
        Ok(HotelQuery {
            q,
            check_in_date,
            check_out_date,
            adults: at_least_one(args.adults, "adults")?,
            rooms: at_least_one(args.rooms, "rooms")?,
        })
    }
}

impl Tool for HotelsFinderTool {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new(Self::NAME)
            .with_description("Look up hotels in a city or area for a stay.")
            .add_parameter(
                ParameterInfo::of::<String>("q").describe("City or area (e.g. Singapore)"),
            )
            .add_parameter(ParameterInfo::of::<String>("check_in_date").describe("'YYYY-MM-DD'"))
            .add_parameter(ParameterInfo::of::<String>("check_out_date").describe("'YYYY-MM-DD'"))
            .add_parameter(ParameterInfo::of::<i64>("adults").with_default(serde_json::json!(1)))
            .add_parameter(ParameterInfo::of::<i64>("rooms").with_default(serde_json::json!(1)))
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let query = self.query(call.parse()?)?;
            tracing::debug!(q = %query.q, check_in = %query.check_in_date, "searching hotels");
            let mut offers = self
                .search
                .search_hotels(&query)
                .await
                .map_err(|err| ToolError::execution_error(err.to_string()))?;
            offers.truncate(MAX_RESULTS);
            Ok(serde_json::to_value(offers)?)
        })
    }
}
