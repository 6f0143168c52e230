//! Integration tests for the travel tools, run through the tool executor.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use voyage_models::llm::ToolCall;
use voyage_tools::{ToolExecutor, ToolFailure, ToolOutcome};
use voyage_travel::{
    BookingStore, FixedClock, FlightOffer, FlightQuery, FlightSearch, HotelOffer, HotelQuery,
    HotelSearch, InMemoryBookingStore, OrderRequest, PaymentError, PaymentGateway, PaymentOrder,
    SearchError, TravelServices, UnconfiguredSearch, default_adapters, travel_registry,
};

// ─────────────────────────────────────────────────────────────────────
// Fakes
// ─────────────────────────────────────────────────────────────────────

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
}

#[derive(Default)]
struct RecordingFlights {
    queries: Mutex<Vec<FlightQuery>>,
}

#[async_trait]
impl FlightSearch for RecordingFlights {
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<FlightOffer>, SearchError> {
        self.queries.lock().push(query.clone());
        let offers = (0..8)
            .map(|i| {
                serde_json::from_value(json!({
                    "flights": [{
                        "airline": "IndiGo",
                        "flight_number": format!("6E {}", 500 + i),
                        "departure_airport": {"id": query.departure_airport, "time": "2026-03-11 06:00"},
                        "arrival_airport": {"id": query.arrival_airport, "time": "2026-03-11 07:45"},
                        "duration": 105
                    }],
                    "total_duration": 105,
                    "price": 4500 + i * 100,
                    "type": "One way"
                }))
                .unwrap()
            })
            .collect();
        Ok(offers)
    }
}

#[derive(Default)]
struct RecordingHotels {
    queries: Mutex<Vec<HotelQuery>>,
}

#[async_trait]
impl HotelSearch for RecordingHotels {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>, SearchError> {
        self.queries.lock().push(query.clone());
        Ok(vec![
            serde_json::from_value(json!({"name": "Harbour Inn", "overall_rating": 4.1})).unwrap(),
        ])
    }
}

struct FakeGateway {
    orders: Mutex<Vec<OrderRequest>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn public_key(&self) -> Option<String> {
        Some("rzp_test_key".into())
    }

    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder, PaymentError> {
        let order = PaymentOrder {
            id: "order_1".into(),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        self.orders.lock().push(request);
        Ok(order)
    }
}

struct Harness {
    executor: ToolExecutor,
    flights: Arc<RecordingFlights>,
    hotels: Arc<RecordingHotels>,
    store: Arc<InMemoryBookingStore>,
}

fn harness_with(payments: Option<Arc<dyn PaymentGateway>>) -> Harness {
    let clock = Arc::new(FixedClock::on(today()));
    let flights = Arc::new(RecordingFlights::default());
    let hotels = Arc::new(RecordingHotels::default());
    let store = Arc::new(InMemoryBookingStore::new(clock.clone()));
    let mut services = TravelServices::new(flights.clone(), hotels.clone(), store.clone())
        .with_clock(clock);
    if let Some(gateway) = payments {
        services = services.with_payments(gateway);
    }
    let registry = travel_registry(&services).unwrap();
    Harness {
        executor: ToolExecutor::new(Arc::new(registry)).with_adapters(default_adapters("u1")),
        flights,
        hotels,
        store,
    }
}

fn harness() -> Harness {
    harness_with(None)
}

async fn run(executor: &ToolExecutor, name: &str, args: Value) -> ToolOutcome {
    executor.execute(&ToolCall::new("call_1", name, args)).await
}

fn booking_args() -> Value {
    json!({
        "name": "Asha Rao",
        "from_city": "Bengaluru",
        "to_city": "Mumbai",
        "airline": "IndiGo",
        "flightno": "6E501",
        "dateOfJourney": "2026-03-11",
        "totalPrice": 4599.5,
        "numberOfTickets": 2
    })
}

// ─────────────────────────────────────────────────────────────────────
// city_code
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn city_code_is_case_insensitive() {
    let h = harness();
    for city in ["Bengaluru", "bengaluru", "BENGALURU"] {
        let outcome = run(&h.executor, "city_code", json!({"city_name": city})).await;
        assert_eq!(outcome.result.unwrap(), json!("BLR"));
    }
}

#[tokio::test]
async fn city_code_unknown_city_is_unk() {
    let h = harness();
    let outcome = run(&h.executor, "city_code", json!({"city_name": "Atlantis"})).await;
    assert_eq!(outcome.result.unwrap(), json!("UNK"));
}

#[tokio::test]
async fn city_code_accepts_city_alias() {
    let h = harness();
    let outcome = run(&h.executor, "city_code", json!({"city": "mumbai"})).await;
    assert_eq!(outcome.result.unwrap(), json!("BOM"));
}

// ─────────────────────────────────────────────────────────────────────
// flights_finder
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn flights_resolve_tomorrow_and_cap_results() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "flights_finder",
        json!({"departure_airport": "blr", "arrival_airport": "BOM", "outbound_date": "tomorrow"}),
    )
    .await;

    let offers = outcome.result.unwrap();
    assert_eq!(offers.as_array().unwrap().len(), 5);
    assert_eq!(offers[0]["flights"][0]["flight_number"], "6E 500");

    let queries = h.flights.queries.lock();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].departure_airport, "BLR");
    assert_eq!(
        queries[0].outbound_date,
        NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
    );
    assert_eq!(queries[0].adults, 1);
    assert!(!queries[0].is_round_trip());
}

#[tokio::test]
async fn flights_accept_origin_and_destination_aliases() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "flights_finder",
        json!({
            "origin_airport": "DEL",
            "destination_city": "GOI",
            "outbound_date": "2026-04-01",
            "return_date": "2026-04-05",
            "adults": "2"
        }),
    )
    .await;
    assert!(outcome.is_success(), "{:?}", outcome.result);

    let queries = h.flights.queries.lock();
    assert_eq!(queries[0].departure_airport, "DEL");
    assert_eq!(queries[0].arrival_airport, "GOI");
    assert_eq!(queries[0].adults, 2);
    assert!(queries[0].is_round_trip());
}

#[tokio::test]
async fn flights_reject_return_before_outbound() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "flights_finder",
        json!({
            "departure_airport": "DEL",
            "arrival_airport": "GOI",
            "outbound_date": "2026-04-05",
            "return_date": "2026-04-01"
        }),
    )
    .await;
    assert!(matches!(
        outcome.result,
        Err(ToolFailure::ValidationError { .. })
    ));
    assert!(h.flights.queries.lock().is_empty());
}

#[tokio::test]
async fn flights_missing_arrival_never_searches() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "flights_finder",
        json!({"departure_airport": "DEL", "outbound_date": "today"}),
    )
    .await;
    assert_eq!(
        outcome.result,
        Err(ToolFailure::MissingParameter {
            name: "arrival_airport".into()
        })
    );
    assert!(h.flights.queries.lock().is_empty());
}

#[tokio::test]
async fn unconfigured_search_is_an_execution_failure() {
    let clock = Arc::new(FixedClock::on(today()));
    let services = TravelServices::new(
        Arc::new(UnconfiguredSearch),
        Arc::new(UnconfiguredSearch),
        Arc::new(InMemoryBookingStore::new(clock.clone())),
    )
    .with_clock(clock);
    let executor = ToolExecutor::new(Arc::new(travel_registry(&services).unwrap()));

    let outcome = run(
        &executor,
        "flights_finder",
        json!({"departure_airport": "BLR", "arrival_airport": "BOM", "outbound_date": "today"}),
    )
    .await;
    let Err(ToolFailure::ToolExecutionFailed { cause, .. }) = outcome.result else {
        panic!("expected execution failure, got {:?}", outcome.result);
    };
    assert!(cause.contains("not configured"));
}

// ─────────────────────────────────────────────────────────────────────
// hotels_finder
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn hotels_fill_defaults() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "hotels_finder",
        json!({"q": "Goa", "check_in_date": "2026-04-01", "check_out_date": "2026-04-03"}),
    )
    .await;
    assert_eq!(outcome.result.unwrap()[0]["name"], "Harbour Inn");

    let queries = h.hotels.queries.lock();
    assert_eq!(queries[0].adults, 1);
    assert_eq!(queries[0].rooms, 1);
}

#[tokio::test]
async fn hotels_reject_checkout_on_checkin_day() {
    let h = harness();
    let outcome = run(
        &h.executor,
        "hotels_finder",
        json!({"q": "Goa", "check_in_date": "2026-04-01", "check_out_date": "2026-04-01"}),
    )
    .await;
    assert!(matches!(
        outcome.result,
        Err(ToolFailure::ValidationError { .. })
    ));
}

// ─────────────────────────────────────────────────────────────────────
// Bookings
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_in_the_past_is_a_validation_error() {
    let h = harness();
    let mut args = booking_args();
    args["dateOfJourney"] = json!("2026-03-09");

    let outcome = run(&h.executor, "create_flight_booking", args).await;
    let Err(ToolFailure::ValidationError { tool, message }) = &outcome.result else {
        panic!("expected validation error, got {:?}", outcome.result);
    };
    assert_eq!(tool, "create_flight_booking");
    assert_eq!(message, "Journey date cannot be in the past.");
    assert!(h.store.is_empty());

    let result = outcome.into_tool_result();
    assert!(result.is_error());
}

#[tokio::test]
async fn booking_today_is_confirmed_with_injected_user() {
    let h = harness();
    let mut args = booking_args();
    args["dateOfJourney"] = json!("2026-03-10");

    let outcome = run(&h.executor, "create_flight_booking", args).await;
    let confirmation = outcome.result.unwrap();
    assert_eq!(confirmation["message"], "Booking confirmed");
    assert_eq!(confirmation["bookingId"], "bk_1");
    assert_eq!(confirmation["booking"]["user_id"], "u1");
    assert_eq!(confirmation["booking"]["numberOfTickets"], 2);
    assert!(confirmation.get("action").is_none());
    assert_eq!(h.store.len(), 1);
}

#[tokio::test]
async fn booking_rejects_short_airline() {
    let h = harness();
    let mut args = booking_args();
    args["airline"] = json!(" I ");

    let outcome = run(&h.executor, "create_flight_booking", args).await;
    assert!(matches!(
        outcome.result,
        Err(ToolFailure::ValidationError { .. })
    ));
}

#[tokio::test]
async fn booking_with_gateway_requests_payment_ui() {
    let gateway = Arc::new(FakeGateway {
        orders: Mutex::new(Vec::new()),
    });
    let h = harness_with(Some(gateway.clone() as Arc<dyn PaymentGateway>));

    let outcome = run(&h.executor, "create_flight_booking", booking_args()).await;
    let confirmation = outcome.result.unwrap();
    assert_eq!(confirmation["action"], "show_payment_ui");
    assert_eq!(confirmation["order_id"], "order_1");
    assert_eq!(confirmation["amount"], 459_950);
    assert_eq!(confirmation["currency"], "INR");
    assert_eq!(confirmation["key"], "rzp_test_key");
    assert_eq!(confirmation["meta"]["flightno"], "6E501");

    let orders = gateway.orders.lock();
    assert_eq!(orders.len(), 1);
    assert!(orders[0].receipt.starts_with("flt_u16E501"));
    assert!(orders[0].receipt.chars().count() <= 40);
}

#[tokio::test]
async fn user_bookings_lists_only_own_bookings() {
    let h = harness();
    assert!(
        run(&h.executor, "create_flight_booking", booking_args())
            .await
            .is_success()
    );
    let mut other = booking_args();
    other["user_id"] = json!("u2");
    assert!(
        run(&h.executor, "create_flight_booking", other)
            .await
            .is_success()
    );

    let outcome = run(&h.executor, "get_user_flight_bookings", json!({})).await;
    let bookings = outcome.result.unwrap();
    assert_eq!(bookings.as_array().unwrap().len(), 1);
    assert_eq!(bookings[0]["bookingId"], "bk_1");
    assert_eq!(bookings[0]["to_city"], "Mumbai");

    let stored = h.store.bookings_for_user("u2").await.unwrap();
    assert_eq!(stored[0].id, "bk_2");
}

#[tokio::test]
async fn user_bookings_empty_is_empty_array() {
    let h = harness();
    let outcome = run(&h.executor, "get_user_flight_bookings", json!({})).await;
    assert_eq!(outcome.result.unwrap(), json!([]));
}
