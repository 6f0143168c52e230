//! Integration tests for the `voyage_tools` crate.

use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use voyage_models::llm::{ToolCall, ToolResult};
use voyage_tools::{
    AdapterSet, FillMissing, FunctionCall, FunctionMetadata, ParameterInfo, RenameKeys, Tool,
    ToolError, ToolExecutor, ToolFailure, ToolFuture, ToolRegistry, from_fn,
};

// ─────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────

struct CityCode;

impl Tool for CityCode {
    fn metadata(&self) -> FunctionMetadata {
        FunctionMetadata::new("city_code")
            .with_description("Returns the IATA code for a city.")
            .add_parameter(ParameterInfo::of::<String>("city_name").describe("City name"))
    }

    fn execute(&self, call: FunctionCall) -> ToolFuture<'_> {
        Box::pin(async move {
            let city: String = call.get_param("city_name")?;
            let code = match city.as_str() {
                "Mumbai" => "BOM",
                "Delhi" => "DEL",
                _ => "UNK",
            };
            Ok(json!(code))
        })
    }
}

#[derive(Deserialize)]
struct BookingArgs {
    user_id: String,
    flightno: String,
    #[serde(rename = "numberOfTickets")]
    tickets: i64,
}

fn booking_tool() -> impl Tool {
    from_fn(
        FunctionMetadata::new("create_flight_booking")
            .add_parameter(ParameterInfo::of::<String>("user_id"))
            .add_parameter(ParameterInfo::of::<String>("flightno"))
            .add_parameter(ParameterInfo::of::<i64>("numberOfTickets").with_default(json!(1))),
        |call| async move {
            let args: BookingArgs = call.parse()?;
            if args.flightno.is_empty() {
                return Err(ToolError::validation_error("flight number is empty"));
            }
            Ok::<_, ToolError>(json!({
                "user_id": args.user_id,
                "flightno": args.flightno,
                "tickets": args.tickets,
            }))
        },
    )
}

fn executor(registry: ToolRegistry) -> ToolExecutor {
    ToolExecutor::new(Arc::new(registry))
}

fn call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall::new(id, name, args)
}

// ─────────────────────────────────────────────────────────────────────
// 1. Registry
// ─────────────────────────────────────────────────────────────────────

#[test]
fn registry_advertises_metadata_schema() {
    let mut registry = ToolRegistry::new();
    registry.register(CityCode).unwrap();
    registry.register(booking_tool()).unwrap();

    let defs = registry.definitions();
    assert_eq!(defs.len(), 2);
    assert_eq!(defs[0].name, "city_code");
    assert_eq!(defs[0].description, "Returns the IATA code for a city.");
    assert_eq!(defs[0].parameters["required"], json!(["city_name"]));
    assert_eq!(
        defs[1].parameters["required"],
        json!(["user_id", "flightno"])
    );
}

#[test]
fn duplicate_registration_keeps_first_tool() {
    let mut registry = ToolRegistry::new();
    registry.register(CityCode).unwrap();
    assert!(registry.register(CityCode).is_err());
    assert_eq!(registry.names(), ["city_code"]);
}

// ─────────────────────────────────────────────────────────────────────
// 2. Executor success path
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn executes_registered_tool() {
    let mut registry = ToolRegistry::new();
    registry.register(CityCode).unwrap();

    let outcome = executor(registry)
        .execute(&call("call_1", "city_code", json!({"city_name": "Mumbai"})))
        .await;

    assert_eq!(outcome.call_id, "call_1");
    assert_eq!(outcome.result, Ok(json!("BOM")));

    let result: ToolResult = outcome.into();
    assert!(!result.is_error());
    assert_eq!(result.name, "city_code");
}

#[tokio::test]
async fn adapters_run_before_validation() {
    let mut registry = ToolRegistry::new();
    registry.register(CityCode).unwrap();
    registry.register(booking_tool()).unwrap();

    let adapters = AdapterSet::new()
        .with("city_code", RenameKeys::new().alias("city", "city_name"))
        .with("create_flight_booking", FillMissing::new("user_id", "u-42"));
    let executor = executor(registry).with_adapters(adapters);

    let outcome = executor
        .execute(&call("call_1", "city_code", json!({"city": "Delhi"})))
        .await;
    assert_eq!(outcome.result, Ok(json!("DEL")));

    let outcome = executor
        .execute(&call(
            "call_2",
            "create_flight_booking",
            json!({"flightno": "AI 101", "numberOfTickets": "2"}),
        ))
        .await;
    assert_eq!(
        outcome.result,
        Ok(json!({"user_id": "u-42", "flightno": "AI 101", "tickets": 2}))
    );
}

#[tokio::test]
async fn string_encoded_arguments_are_accepted() {
    let mut registry = ToolRegistry::new();
    registry.register(CityCode).unwrap();

    let outcome = executor(registry)
        .execute(&call("c", "city_code", json!("{\"city_name\": \"Mumbai\"}")))
        .await;
    assert_eq!(outcome.result, Ok(json!("BOM")));
}

// ─────────────────────────────────────────────────────────────────────
// 3. Failure containment
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_tool_becomes_failure_payload() {
    let outcome = executor(ToolRegistry::new())
        .execute(&call("call_9", "teleport", json!({})))
        .await;

    assert_eq!(
        outcome.result,
        Err(ToolFailure::UnknownTool {
            name: "teleport".into()
        })
    );
    let result = outcome.into_tool_result();
    assert!(result.is_error());
    assert_eq!(result.call_id, "call_9");
    assert_eq!(result.content["error"], "unknown_tool");
}

#[tokio::test]
async fn missing_parameter_never_reaches_tool() {
    let invoked = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invoked);
    let tool = from_fn(
        FunctionMetadata::new("counted").add_parameter(ParameterInfo::of::<String>("q")),
        move |_call| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ToolError>(json!(null)) }
        },
    );
    let mut registry = ToolRegistry::new();
    registry.register(tool).unwrap();

    let outcome = executor(registry)
        .execute(&call("c", "counted", json!({})))
        .await;
    assert_eq!(
        outcome.result,
        Err(ToolFailure::MissingParameter { name: "q".into() })
    );
    assert_eq!(invoked.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn domain_rejection_is_validation_error() {
    let mut registry = ToolRegistry::new();
    registry.register(booking_tool()).unwrap();

    let outcome = executor(registry)
        .execute(&call(
            "c",
            "create_flight_booking",
            json!({"user_id": "u", "flightno": ""}),
        ))
        .await;
    assert_eq!(
        outcome.result,
        Err(ToolFailure::ValidationError {
            tool: "create_flight_booking".into(),
            message: "flight number is empty".into(),
        })
    );
}

#[tokio::test]
async fn execution_error_is_contained() {
    let tool = from_fn(FunctionMetadata::new("flaky"), |_call| async {
        Err::<Value, _>(ToolError::execution_error("upstream returned 503"))
    });
    let mut registry = ToolRegistry::new();
    registry.register(tool).unwrap();

    let outcome = executor(registry).execute(&call("c", "flaky", json!({}))).await;
    let Err(ToolFailure::ToolExecutionFailed { tool, cause }) = outcome.result else {
        panic!("expected execution failure");
    };
    assert_eq!(tool, "flaky");
    assert!(cause.contains("503"));
}

#[tokio::test]
async fn panicking_tool_is_contained() {
    let tool = from_fn(FunctionMetadata::new("boom"), |_call| async {
        if true {
            panic!("kaboom");
        }
        Ok::<_, ToolError>(json!(null))
    });
    let mut registry = ToolRegistry::new();
    registry.register(tool).unwrap();

    let outcome = executor(registry).execute(&call("c", "boom", json!({}))).await;
    let Err(ToolFailure::ToolExecutionFailed { cause, .. }) = outcome.result else {
        panic!("expected execution failure");
    };
    assert!(cause.contains("kaboom"));
}

#[tokio::test]
async fn slow_tool_times_out() {
    let tool = from_fn(FunctionMetadata::new("slow"), |_call| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, ToolError>(json!(null))
    });
    let mut registry = ToolRegistry::new();
    registry.register(tool).unwrap();

    let outcome = executor(registry)
        .with_timeout(Duration::from_millis(20))
        .execute(&call("c", "slow", json!({})))
        .await;
    let Err(ToolFailure::ToolExecutionFailed { cause, .. }) = outcome.result else {
        panic!("expected execution failure");
    };
    assert!(cause.contains("timed out"));
}
