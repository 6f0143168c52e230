//! Integration tests for the Ollama provider.
//!
//! The wire tests run against a one-shot HTTP server on localhost. The live
//! tests are ignored by default because they need a running Ollama server
//! (`OLLAMA_HOST`, default `http://localhost:11434`) with `gemma3:4b` pulled:
//!
//! ```sh
//! cargo test -p voyage_model_providers --test ollama_integration -- --ignored
//! ```

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use voyage_model_providers::ollama;
use voyage_models::ModelRegistry;
use voyage_models::llm::{GenerationError, GenerationRequest, Llm, ToolDefinition, Turn};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Serves a single request with `status` and `body`, returning the request
/// body it received.
async fn serve_once(status: u16, body: Value) -> (String, JoinHandle<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 4096];
        let (header_end, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_ascii_lowercase();
                let length = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .map_or(0, |v| v.trim().parse::<usize>().unwrap());
                break (pos + 4, length);
            }
        };
        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }
        let request: Value =
            serde_json::from_slice(&buf[header_end..header_end + content_length]).unwrap();

        let payload = body.to_string();
        let response = format!(
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{payload}",
            payload.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (url, handle)
}

fn llm(base_url: &str, model: &str) -> Llm {
    let mut registry = ModelRegistry::new();
    ollama::register(&mut registry, base_url);
    registry.llm(format!("ollama/{model}")).unwrap()
}

fn city_code_tool() -> ToolDefinition {
    ToolDefinition {
        name: "city_code".into(),
        description: "Look up the IATA code for a city.".into(),
        parameters: json!({
            "type": "object",
            "properties": {"city_name": {"type": "string"}},
            "required": ["city_name"]
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Wire tests
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_round_trip_over_http() {
    let (url, server) = serve_once(
        200,
        json!({
            "model": "gemma3:4b",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "city_code", "arguments": {"city_name": "Pune"}}}]
            },
            "done": true
        }),
    )
    .await;

    let request = GenerationRequest::from_turns(vec![
        Turn::system("You are a travel assistant."),
        Turn::human("What is the code for Pune?"),
    ])
    .tools(vec![city_code_tool()])
    .auto_tool();
    let response = llm(&url, "gemma3:4b").generate(request).await.unwrap();

    let calls = response.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].id, "call_1");
    assert_eq!(calls[0].function.arguments, json!({"city_name": "Pune"}));

    let sent = server.await.unwrap();
    assert_eq!(sent["model"], "gemma3:4b");
    assert_eq!(sent["stream"], false);
    assert_eq!(sent["messages"][0]["role"], "system");
    assert_eq!(sent["messages"][1]["role"], "user");
    assert_eq!(sent["tools"][0]["function"]["name"], "city_code");
}

#[tokio::test]
async fn error_status_maps_to_provider_error() {
    let (url, server) = serve_once(404, json!({"error": "model 'nope' not found"})).await;

    let err = llm(&url, "nope")
        .generate(GenerationRequest::new("hi"))
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        GenerationError::Provider {
            status, message, ..
        } => {
            assert_eq!(status, Some(404));
            assert_eq!(message, "model 'nope' not found");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = llm(&url, "gemma3:4b")
        .generate(GenerationRequest::new("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Http(_)), "{err:?}");
}

// ─────────────────────────────────────────────────────────────────────
// Live tests
// ─────────────────────────────────────────────────────────────────────

fn live_llm() -> Llm {
    let _ = dotenvy::dotenv();
    let host = std::env::var("OLLAMA_HOST").unwrap_or_else(|_| ollama::DEFAULT_BASE_URL.into());
    llm(&host, "gemma3:4b")
}

#[tokio::test]
#[ignore = "requires a running Ollama server"]
async fn live_basic_generation() {
    let response = live_llm()
        .generate(GenerationRequest::new("Reply with the single word: hello"))
        .await
        .unwrap();
    assert!(!response.text().trim().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Ollama server"]
async fn live_tool_calling() {
    let request = GenerationRequest::with_system(
        "Use the city_code tool to answer airport code questions.",
        "What is the airport code for Mumbai?",
    )
    .tools(vec![city_code_tool()])
    .auto_tool();
    let response = live_llm().generate(request).await.unwrap();

    let calls = response.tool_calls();
    assert!(!calls.is_empty(), "expected a tool call, got {:?}", response.text());
    assert_eq!(calls[0].name(), "city_code");
}
