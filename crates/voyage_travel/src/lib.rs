//! Travel tools for Voyage.
//!
//! This crate provides the five tools the travel assistant exposes to the
//! model, along with the collaborators they delegate to:
//!
//! | Tool | Collaborator |
//! |------|--------------|
//! | `city_code` | [`CityDirectory`] |
//! | `flights_finder` | [`FlightSearch`] |
//! | `hotels_finder` | [`HotelSearch`] |
//! | `get_user_flight_bookings` | [`BookingStore`] |
//! | `create_flight_booking` | [`BookingStore`], optional [`PaymentGateway`] |
//!
//! [`TravelServices`] bundles the collaborators and [`travel_registry`]
//! registers every tool over them. [`default_adapters`] returns the argument
//! adapters that repair common near-miss argument names and inject the
//! session's user id.
//!
//! ```no_run
//! use std::sync::Arc;
//! use voyage_travel::{
//!     InMemoryBookingStore, TravelServices, UnconfiguredSearch, default_adapters,
//!     travel_registry,
//! };
//! use voyage_tools::ToolExecutor;
//!
//! let services = TravelServices::new(
//!     Arc::new(UnconfiguredSearch),
//!     Arc::new(UnconfiguredSearch),
//!     Arc::new(InMemoryBookingStore::default()),
//! );
//! let registry = travel_registry(&services).unwrap();
//! let executor = ToolExecutor::new(Arc::new(registry)).with_adapters(default_adapters("u1"));
//! ```

pub mod bookings;
pub mod cities;
pub mod dates;
pub mod error;
pub mod flights;
pub mod hotels;
pub mod payment;
pub mod prompt;
pub mod serpapi;

pub use bookings::{
    Booking, BookingStore, CreateBookingTool, InMemoryBookingStore, NewBooking, UserBookingsTool,
};
pub use cities::{CityCodeTool, CityDirectory, CityTable, UNKNOWN_CITY_CODE};
pub use dates::{Clock, FixedClock, SystemClock, resolve_date};
pub use error::{CityTableError, PaymentError, SearchError, StoreError};
pub use flights::{FlightOffer, FlightQuery, FlightSearch, FlightsFinderTool};
pub use hotels::{HotelOffer, HotelQuery, HotelSearch, HotelsFinderTool};
pub use payment::{OrderRequest, PaymentGateway, PaymentOrder};
pub use prompt::{SYSTEM_PROMPT, human_prompt};
pub use serpapi::{SerpApiClient, UnconfiguredSearch};

use std::sync::Arc;
use voyage_tools::{AdapterSet, FillMissing, RegistryError, RenameKeys, ToolRegistry};

/// Maximum number of flight or hotel offers returned by a search.
pub const MAX_RESULTS: usize = 5;

/// Collaborators shared by the travel tools.
#[derive(Clone)]
pub struct TravelServices {
    /// Airport code table.
    pub cities: Arc<CityDirectory>,
    /// Flight search backend.
    pub flights: Arc<dyn FlightSearch>,
    /// Hotel search backend.
    pub hotels: Arc<dyn HotelSearch>,
    /// Booking persistence.
    pub bookings: Arc<dyn BookingStore>,
    /// Payment gateway; bookings skip payment when absent.
    pub payments: Option<Arc<dyn PaymentGateway>>,
    /// Source of "today".
    pub clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for TravelServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TravelServices")
            .field("cities", &self.cities)
            .field("payments", &self.payments.is_some())
            .finish_non_exhaustive()
    }
}

impl TravelServices {
    /// Bundles the search and booking backends with the built-in city table,
    /// no payment gateway and the system clock.
    pub fn new(
        flights: Arc<dyn FlightSearch>,
        hotels: Arc<dyn HotelSearch>,
        bookings: Arc<dyn BookingStore>,
    ) -> Self {
        Self {
            cities: Arc::new(CityDirectory::builtin()),
            flights,
            hotels,
            bookings,
            payments: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the city directory.
    #[must_use]
    pub fn with_cities(mut self, cities: Arc<CityDirectory>) -> Self {
        self.cities = cities;
        self
    }

    /// Enables payment orders for new bookings.
    #[must_use]
    pub fn with_payments(mut self, payments: Arc<dyn PaymentGateway>) -> Self {
        self.payments = Some(payments);
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Registers the five travel tools.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateToolName`] only if the tool names
/// collide, which they do not.
pub fn travel_registry(services: &TravelServices) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(CityCodeTool::new(Arc::clone(&services.cities)))?;
    registry.register(FlightsFinderTool::new(
        Arc::clone(&services.flights),
        Arc::clone(&services.clock),
    ))?;
    registry.register(HotelsFinderTool::new(
        Arc::clone(&services.hotels),
        Arc::clone(&services.clock),
    ))?;
    registry.register(UserBookingsTool::new(Arc::clone(&services.bookings)))?;
    registry.register(CreateBookingTool::new(
        Arc::clone(&services.bookings),
        services.payments.clone(),
        Arc::clone(&services.clock),
    ))?;
    Ok(registry)
}

/// Argument adapters for the travel tools, injecting `user_id` for the
/// booking tools.
#[must_use]
pub fn default_adapters(user_id: &str) -> AdapterSet {
    AdapterSet::new()
        .with(
            FlightsFinderTool::NAME,
            RenameKeys::new()
                .alias("origin_airport", "departure_airport")
                .alias("origin_city", "departure_airport")
                .alias("destination_airport", "arrival_airport")
                .alias("destination_city", "arrival_airport"),
        )
        .with(CityCodeTool::NAME, RenameKeys::new().alias("city", "city_name"))
        .with(UserBookingsTool::NAME, FillMissing::new("user_id", user_id))
        .with(CreateBookingTool::NAME, FillMissing::new("user_id", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_the_travel_tools_in_order() {
        let services = TravelServices::new(
            Arc::new(UnconfiguredSearch),
            Arc::new(UnconfiguredSearch),
            Arc::new(InMemoryBookingStore::default()),
        );
        let registry = travel_registry(&services).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "city_code",
                "flights_finder",
                "hotels_finder",
                "get_user_flight_bookings",
                "create_flight_booking",
            ]
        );
    }

    #[test]
    fn adapters_rename_and_fill() {
        let adapters = default_adapters("u7");

        let mut args = serde_json::Map::new();
        args.insert("origin_city".into(), "BLR".into());
        args.insert("destination_airport".into(), "BOM".into());
        adapters.apply("flights_finder", &mut args);
        assert_eq!(args["departure_airport"], "BLR");
        assert_eq!(args["arrival_airport"], "BOM");
        assert!(!args.contains_key("origin_city"));

        let mut args = serde_json::Map::new();
        adapters.apply("get_user_flight_bookings", &mut args);
        assert_eq!(args["user_id"], "u7");
    }
}
