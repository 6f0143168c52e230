//! Flight booking persistence and the two booking tools.

use crate::dates::{Clock, resolve_date};
use crate::error::StoreError;
use crate::payment::{OrderRequest, PAYMENT_CURRENCY, PaymentGateway, receipt_id, to_minor_units};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use voyage_tools::{FunctionCall, FunctionMetadata, ParameterInfo, Tool, ToolError, ToolFuture};

/// Booking details supplied by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    /// Owner of the booking.
    pub user_id: String,
    /// Passenger name.
    pub name: String,
    /// Origin city.
    pub from_city: String,
    /// Destination city.
    pub to_city: String,
    /// Airline.
    pub airline: String,
    /// Flight number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flightno: Option<String>,
    /// Travel date.
    #[serde(rename = "dateOfJourney")]
    pub date_of_journey: NaiveDate,
    /// Total price in INR.
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    /// Number of tickets.
    #[serde(rename = "numberOfTickets")]
    pub number_of_tickets: u32,
}

/// A stored booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Store-assigned id.
    #[serde(rename = "bookingId")]
    pub id: String,
    /// Booking details.
    #[serde(flatten)]
    pub details: NewBooking,
    /// When the booking was stored.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Booking persistence.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Returns a user's bookings, oldest first.
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    /// Stores a booking and returns it with its id.
    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, StoreError>;
}

/// Process-local booking store. Ids are `bk_1`, `bk_2`, ...
pub struct InMemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
    next_id: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for InMemoryBookingStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryBookingStore")
            .field("bookings", &self.bookings.read().len())
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new(Arc::new(crate::dates::SystemClock))
    }
}

impl InMemoryBookingStore {
    /// Creates an empty store stamping bookings with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            clock,
        }
    }

    /// Returns the number of stored bookings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bookings.read().len()
    }

    /// Returns whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookings.read().is_empty()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .read()
            .iter()
            .filter(|booking| booking.details.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_booking(&self, booking: NewBooking) -> Result<Booking, StoreError> {
        let id = format!("bk_{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let booking = Booking {
            id,
            details: booking,
            created_at: self.clock.now(),
        };
        self.bookings.write().push(booking.clone());
        Ok(booking)
    }
}

// ─────────────────────
// get_user_flight_bookings
// ─────────────────────

/// The `get_user_flight_bookings` tool.
#[derive(Clone)]
pub struct UserBookingsTool {
    store: Arc<dyn BookingStore>,
}

impl core::fmt::Debug for UserBookingsTool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UserBookingsTool").finish_non_exhaustive()
    }
}

impl UserBookingsTool {
    /// Tool name.
    pub const NAME: &'static str = "get_user_flight_bookings";

    /// Creates the tool.
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }
}

impl Tool for UserBookingsTool {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new(Self::NAME)
            .with_description("Retrieve the current user's flight bookings.")
            .add_parameter(ParameterInfo::of::<String>("user_id").describe("The current user's id"))
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let user_id: String = call.get_param("user_id")?;
            let bookings = self
                .store
                .bookings_for_user(&user_id)
                .await
                .map_err(|err| ToolError::execution_error(err.to_string()))?;
            Ok(serde_json::to_value(bookings)?)
        })
    }
}

// ─────────────────────
// create_flight_booking
// ─────────────────────

const NAME_LEN: RangeInclusive<usize> = 2..=100;
const CITY_LEN: RangeInclusive<usize> = 3..=100;
const AIRLINE_LEN: RangeInclusive<usize> = 2..=50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingArgs {
    #[serde(rename = "user_id")]
    user_id: String,
    name: String,
    #[serde(rename = "from_city")]
    from_city: String,
    #[serde(rename = "to_city")]
    to_city: String,
    airline: String,
    flightno: Option<String>,
    date_of_journey: String,
    total_price: f64,
    number_of_tickets: Option<i64>,
}

fn trimmed(value: &str, field: &str, len: RangeInclusive<usize>) -> Result<String, ToolError> {
    let value = value.trim();
    if len.contains(&value.chars().count()) {
        Ok(value.to_string())
    } else {
        Err(ToolError::validation_error(format!(
            "{field} must be {} to {} characters",
            len.start(),
            len.end()
        )))
    }
}

/// The `create_flight_booking` tool.
///
/// Rejects journeys dated before today (UTC). When a [`PaymentGateway`] is
/// configured, a payment order is created before the booking is stored and
/// the result asks the client to show its payment UI.
#[derive(Clone)]
pub struct CreateBookingTool {
    store: Arc<dyn BookingStore>,
    payments: Option<Arc<dyn PaymentGateway>>,
    clock: Arc<dyn Clock>,
}

impl core::fmt::Debug for CreateBookingTool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CreateBookingTool")
            .field("payments", &self.payments.is_some())
            .finish_non_exhaustive()
    }
}

impl CreateBookingTool {
    /// Tool name.
    pub const NAME: &'static str = "create_flight_booking";

    /// Creates the tool.
    pub fn new(
        store: Arc<dyn BookingStore>,
        payments: Option<Arc<dyn PaymentGateway>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            payments,
            clock,
        }
    }

    fn validate(&self, args: CreateBookingArgs) -> Result<NewBooking, ToolError> {
        let date_of_journey = resolve_date(&args.date_of_journey, self.clock.as_ref())
            .ok_or_else(|| ToolError::validation_error("dateOfJourney must be YYYY-MM-DD"))?;
        if date_of_journey < self.clock.today() {
            return Err(ToolError::validation_error(
                "Journey date cannot be in the past.",
            ));
        }
        if !args.total_price.is_finite() || args.total_price < 0.0 {
            return Err(ToolError::validation_error(
                "totalPrice must be zero or more",
            ));
        }
        let number_of_tickets = match args.number_of_tickets {
            None => 1,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ToolError::validation_error("numberOfTickets must be at least 1"))?,
        };
        let user_id = args.user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(ToolError::validation_error("user_id is required"));
        }

        Ok(NewBooking {
            user_id,
            name: trimmed(&args.name, "name", NAME_LEN)?,
            from_city: trimmed(&args.from_city, "from_city", CITY_LEN)?,
            to_city: trimmed(&args.to_city, "to_city", CITY_LEN)?,
            airline: trimmed(&args.airline, "airline", AIRLINE_LEN)?,
            flightno: args
                .flightno
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty()),
            date_of_journey,
            total_price: args.total_price,
            number_of_tickets,
        })
    }

    async fn book(&self, booking: NewBooking) -> Result<serde_json::Value, ToolError> {
        let order = match &self.payments {
            None => None,
            Some(gateway) => {
                let amount = to_minor_units(booking.total_price)
                    .ok_or_else(|| ToolError::validation_error("totalPrice must be zero or more"))?;
                let flightno = booking.flightno.clone().unwrap_or_default();
                let request = OrderRequest {
                    amount,
                    currency: PAYMENT_CURRENCY.to_string(),
                    receipt: receipt_id(&booking.user_id, &flightno, self.clock.now().timestamp()),
                    notes: BTreeMap::from([
                        ("user_id".to_string(), booking.user_id.clone()),
                        ("flightno".to_string(), flightno),
                    ]),
                };
                let order = gateway
                    .create_order(request)
                    .await
                    .map_err(|err| ToolError::execution_error(err.to_string()))?;
                Some((order, gateway.public_key()))
            }
        };

        let stored = self
            .store
            .create_booking(booking)
            .await
            .map_err(|err| ToolError::execution_error(err.to_string()))?;
        tracing::info!(booking_id = %stored.id, user_id = %stored.details.user_id, "flight booked");

        let mut result = json!({
            "message": "Booking confirmed",
            "bookingId": stored.id,
            "booking": stored,
        });
        if let Some((order, key)) = order
            && let Some(obj) = result.as_object_mut()
        {
            obj.insert("action".into(), json!("show_payment_ui"));
            obj.insert("order_id".into(), json!(order.id));
            obj.insert("amount".into(), json!(order.amount));
            obj.insert("currency".into(), json!(order.currency));
            obj.insert("key".into(), json!(key));
            obj.insert("meta".into(), serde_json::to_value(&stored.details)?);
            obj.insert("type".into(), json!("ignore"));
        }
        Ok(result)
    }
}

impl Tool for CreateBookingTool {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new(Self::NAME)
            .with_description(
                "Book a flight for the current user with all booking details. \
                 The journey date must not be in the past.",
            )
            .add_parameter(ParameterInfo::of::<String>("user_id").describe("The current user's id"))
            .add_parameter(ParameterInfo::of::<String>("name").describe("Passenger name"))
            .add_parameter(ParameterInfo::of::<String>("from_city"))
            .add_parameter(ParameterInfo::of::<String>("to_city"))
            .add_parameter(ParameterInfo::of::<String>("airline"))
            .add_parameter(ParameterInfo::of::<String>("flightno").optional())
            .add_parameter(ParameterInfo::of::<String>("dateOfJourney").describe("'YYYY-MM-DD'"))
            .add_parameter(ParameterInfo::of::<f64>("totalPrice").describe("Total price in INR"))
            .add_parameter(ParameterInfo::of::<i64>("numberOfTickets").optional())
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let booking = self.validate(call.parse()?)?;
            self.book(booking).await
        })
    }
}
