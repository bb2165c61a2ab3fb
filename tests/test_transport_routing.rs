use std::sync::Arc;

use axum::Router;
use http_body_util::BodyExt; // for .collect / .frame
use hyper::{header, Request, StatusCode};
use serde_json::json;
use tokio::time::{timeout, Duration};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt; // for .oneshot

use calc_mcp_gateway::core::error::GatewayError;
use calc_mcp_gateway::infra::http_app::{build_app, TransportRouter};
use calc_mcp_gateway::infra::mcp::{factory_with_transcriber, FnTranscriber, Transcriber};

fn stub_router() -> Router {
    let event_stream = Router::new().fallback(|| async { "event-stream" });
    let streamable = Router::new().fallback(|| async { "streamable" });
    TransportRouter::new(event_stream, streamable).into_app()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn sse_paths_reach_the_event_stream_adapter() {
    let app = stub_router();
    for (method, uri) in [
        ("GET", "/sse"),
        ("POST", "/sse/message"),
        ("POST", "/sse/message?sessionId=abc"),
    ] {
        let (status, body) = send(&app, method, uri).await;
        assert_eq!(status, StatusCode::OK, "{method} {uri}");
        assert_eq!(body, "event-stream", "{method} {uri}");
    }
}

#[tokio::test]
async fn mcp_path_reaches_the_streamable_adapter() {
    let app = stub_router();
    for method in ["GET", "POST", "DELETE"] {
        let (status, body) = send(&app, method, "/mcp").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "streamable");
    }
}

#[tokio::test]
async fn unmapped_paths_are_not_found() {
    let app = stub_router();
    for uri in ["/", "/other", "/mcp/extra", "/sse/other", "/healthz"] {
        for method in ["GET", "POST"] {
            let (status, body) = send(&app, method, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body, "Not found", "{method} {uri}");
        }
    }
}

fn real_app() -> (Router, CancellationToken) {
    let backend: Arc<dyn Transcriber> = Arc::new(FnTranscriber::new(
        |_data: String, _mime: String| async move { Ok::<_, GatewayError>(String::from("stub")) },
    ));
    let ct = CancellationToken::new();
    let app = build_app(
        factory_with_transcriber(backend),
        ([127, 0, 0, 1], 0).into(),
        ct.clone(),
    );
    (app, ct)
}

#[tokio::test]
async fn full_app_returns_not_found_for_other_paths() {
    let (app, ct) = real_app();
    let (status, body) = send(&app, "GET", "/other").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not found");
    ct.cancel();
}

#[tokio::test]
async fn full_app_opens_an_event_stream_with_endpoint_frame() {
    let (app, ct) = real_app();
    let req = Request::builder()
        .method("GET")
        .uri("/sse")
        .header(header::ACCEPT, "text/event-stream")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/event-stream"), "{content_type}");

    let mut body = res.into_body();
    let frame = timeout(Duration::from_secs(5), body.frame())
        .await
        .expect("first SSE frame timed out")
        .expect("stream ended")
        .unwrap();
    let data = frame.into_data().unwrap_or_default();
    let text = String::from_utf8_lossy(&data);
    assert!(text.contains("endpoint"), "{text}");
    assert!(text.contains("/sse/message"), "{text}");
    ct.cancel();
}

#[tokio::test]
async fn full_app_answers_initialize_on_mcp() {
    let (app, ct) = real_app();
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2025-03-26","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(init.to_string()))
        .unwrap();
    let res = app.oneshot(req).await.unwrap();
    assert!(res.status().is_success());
    assert!(res.headers().contains_key("MCP-Session-Id"));
    ct.cancel();
}

/// Accumulates SSE frames until a `data:` line satisfies `pick`.
async fn next_sse_data<F>(body: &mut axum::body::Body, buf: &mut String, mut pick: F) -> String
where
    F: FnMut(&str) -> bool,
{
    timeout(Duration::from_secs(10), async {
        loop {
            if let Some(pos) = buf.find("\n\n") {
                let event: String = buf.drain(..pos + 2).collect();
                if let Some(data) = event
                    .lines()
                    .find_map(|l| l.strip_prefix("data: ").or_else(|| l.strip_prefix("data:")))
                {
                    if pick(data) {
                        return data.trim().to_owned();
                    }
                }
                continue;
            }
            let frame = body.frame().await.expect("stream ended").unwrap();
            if let Ok(data) = frame.into_data() {
                buf.push_str(&String::from_utf8_lossy(&data));
            }
        }
    })
    .await
    .expect("SSE event timed out")
}

async fn post_message(app: &Router, endpoint: &str, body: serde_json::Value) -> StatusCode {
    let req = Request::builder()
        .method("POST")
        .uri(endpoint)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap().status()
}

fn response_with_id(id: u64) -> impl FnMut(&str) -> bool {
    move |data| {
        serde_json::from_str::<serde_json::Value>(data)
            .map(|v| v["id"] == json!(id))
            .unwrap_or(false)
    }
}

#[tokio::test]
async fn tool_call_round_trips_over_the_event_stream() {
    let (app, ct) = real_app();
    let req = Request::builder()
        .method("GET")
        .uri("/sse")
        .header(header::ACCEPT, "text/event-stream")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let mut body = res.into_body();
    let mut buf = String::new();

    let endpoint = next_sse_data(&mut body, &mut buf, |d| d.contains("sessionId=")).await;
    assert!(endpoint.starts_with("/sse/message?sessionId="), "{endpoint}");

    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{ "protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0.1"} }
    });
    assert_eq!(post_message(&app, &endpoint, init).await, StatusCode::ACCEPTED);
    let data = next_sse_data(&mut body, &mut buf, response_with_id(1)).await;
    let v: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v["result"]["serverInfo"]["name"], "Authless Calculator");

    let initialized = json!({"jsonrpc":"2.0","method":"notifications/initialized"});
    assert_eq!(post_message(&app, &endpoint, initialized).await, StatusCode::ACCEPTED);

    let call = json!({
        "jsonrpc":"2.0","id":2,"method":"tools/call",
        "params":{"name":"calculate","arguments":{"operation":"divide","a":1,"b":0}}
    });
    assert_eq!(post_message(&app, &endpoint, call).await, StatusCode::ACCEPTED);
    let data = next_sse_data(&mut body, &mut buf, response_with_id(2)).await;
    let v: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(v["result"]["content"][0]["text"], "Error: Cannot divide by zero");

    ct.cancel();
}
