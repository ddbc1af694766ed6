#![cfg(test)]
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use cvm_proxy_cli::server::{build_router, AppState};
use cvm_proxy_core::clock::ManualClock;
use cvm_proxy_core::rate_limit::RateLimiter;
use cvm_proxy_integration_tests::{service, Call, FakeRegistry, SAMPLE_CNPJ, SAMPLE_DIGITS};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

const START_MS: u64 = 1_700_000_000_000;

struct Harness {
    router: Router,
    registry: Arc<FakeRegistry>,
    clock: ManualClock,
    _downloads: tempfile::TempDir,
}

fn harness(registry: FakeRegistry, max: u32, trust_proxy: bool, public_dir: &Path) -> Harness {
    let downloads = tempfile::tempdir().unwrap();
    let download_dir = downloads.path().join("downloads");
    let registry: Arc<FakeRegistry> = Arc::new(registry);
    let clock: ManualClock = ManualClock::new(START_MS);

    let state = AppState {
        resolver: Arc::new(service(registry.clone(), &download_dir)),
        limiter: Arc::new(RateLimiter::new(Duration::from_millis(1_000), max)),
        clock: Arc::new(clock.clone()),
        trust_proxy,
        download_dir,
    };

    Harness {
        router: build_router(state, public_dir),
        registry,
        clock,
        _downloads: downloads,
    }
}

async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn post_returns_success_payload() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let response = send(&h.router, post_json("/regulamentos/ultimo", json!({ "cnpj": SAMPLE_CNPJ }))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({
            "cnpj": SAMPLE_DIGITS,
            "registroFundoId": 77,
            "regulamentoId": 3,
            "dataInicioVigencia": "2021-01-01",
            "fileName": "vigente.pdf",
            "filePath": format!("downloads/{SAMPLE_DIGITS}/vigente.pdf"),
        })
    );
}

#[tokio::test]
async fn body_identifier_wins_over_query() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let response = send(
        &h.router,
        post_json("/regulamentos/ultimo?cnpj=11111111111111", json!({ "cnpj": SAMPLE_CNPJ })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.registry.calls()[0], Call::Search(SAMPLE_DIGITS.to_string()));
}

#[tokio::test]
async fn non_string_body_falls_back_to_query() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let response = send(
        &h.router,
        post_json("/regulamentos/ultimo?cnpj=36498670000127", json!({ "cnpj": 1 })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.registry.calls()[0], Call::Search(SAMPLE_DIGITS.to_string()));
}

#[tokio::test]
async fn repeated_query_key_does_not_reject_json_body() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let response = send(
        &h.router,
        post_json("/regulamentos/ultimo?cnpj=1&cnpj=2", json!({ "cnpj": SAMPLE_CNPJ })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.registry.calls()[0], Call::Search(SAMPLE_DIGITS.to_string()));
}

#[tokio::test]
async fn repeated_query_key_uses_first_value() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let response = send(
        &h.router,
        get("/regulamentos/ultimo?cnpj=36498670000127&cnpj=123"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.registry.calls()[0], Call::Search(SAMPLE_DIGITS.to_string()));
}

#[tokio::test]
async fn plain_text_body_is_not_parsed() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());
    let body: String = json!({ "cnpj": SAMPLE_CNPJ }).to_string();

    let without_query = Request::post("/regulamentos/ultimo")
        .header("content-type", "text/plain")
        .body(Body::from(body.clone()))
        .unwrap();
    let response = send(&h.router, without_query).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "cnpj_required" }));

    let with_query = Request::post("/regulamentos/ultimo?cnpj=36498670000127")
        .header("content-type", "text/plain")
        .body(Body::from(body))
        .unwrap();
    let response = send(&h.router, with_query).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.registry.calls()[0], Call::Search(SAMPLE_DIGITS.to_string()));
}

#[tokio::test]
async fn missing_and_short_identifiers_are_bad_requests() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 10, false, public.path());

    let missing = send(&h.router, get("/regulamentos/ultimo")).await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(missing).await, json!({ "error": "cnpj_required" }));

    let short = send(&h.router, get("/regulamentos/ultimo?cnpj=123")).await;
    assert_eq!(short.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(short).await, json!({ "error": "cnpj_invalid" }));

    assert!(h.registry.calls().is_empty());
}

#[tokio::test]
async fn unknown_fund_is_not_found() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(
        FakeRegistry {
            summaries: Vec::new(),
            ..FakeRegistry::happy_path()
        },
        10,
        false,
        public.path(),
    );

    let response = send(&h.router, get("/regulamentos/ultimo?cnpj=36498670000127")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "fundo_not_found" }));
}

#[tokio::test]
async fn upstream_status_is_reported_as_bad_gateway() {
    let public = tempfile::tempdir().unwrap();
    let failure = cvm_proxy_common::error::UpstreamError::status("http://cvm/x", 503, "down".to_string());
    let h = harness(
        FakeRegistry::happy_path().failing(cvm_proxy_integration_tests::FailAt::Search, failure),
        10,
        false,
        public.path(),
    );

    let response = send(&h.router, get("/regulamentos/ultimo?cnpj=36498670000127")).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(json_body(response).await, json!({ "error": "cvm_request_failed", "status": 503 }));
}

#[tokio::test]
async fn third_request_in_window_is_limited() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 2, false, public.path());
    let reset: String = (START_MS + 1_000).div_ceil(1_000).to_string();

    let first = send(&h.router, get("/health")).await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(first.headers()["x-ratelimit-limit"], "2");
    assert_eq!(first.headers()["x-ratelimit-remaining"], "1");
    assert_eq!(first.headers()["x-ratelimit-reset"], reset.as_str());

    h.clock.advance(400);
    let second = send(&h.router, get("/health")).await;
    assert_eq!(second.headers()["x-ratelimit-remaining"], "0");

    h.clock.advance(100);
    let third = send(&h.router, get("/regulamentos/ultimo?cnpj=36498670000127")).await;
    assert_eq!(third.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(third.headers()["x-ratelimit-remaining"], "0");
    assert_eq!(third.headers()["retry-after"], "1");
    assert_eq!(
        json_body(third).await,
        json!({ "error": "rate_limit_exceeded", "retryAfterSeconds": 1 })
    );
    assert!(h.registry.calls().is_empty());

    h.clock.advance(501);
    let fresh = send(&h.router, get("/health")).await;
    assert_eq!(fresh.status(), StatusCode::OK);
    assert_eq!(fresh.headers()["x-ratelimit-remaining"], "1");
}

#[tokio::test]
async fn clients_are_keyed_by_peer_address() {
    let public = tempfile::tempdir().unwrap();
    let h = harness(FakeRegistry::happy_path(), 1, false, public.path());

    let from = |addr: &str| {
        let mut request = get("/health");
        let peer: SocketAddr = addr.parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));
        request
    };

    assert_eq!(send(&h.router, from("10.0.0.1:5000")).await.status(), StatusCode::OK);
    assert_eq!(send(&h.router, from("10.0.0.2:5000")).await.status(), StatusCode::OK);
    assert_eq!(
        send(&h.router, from("10.0.0.1:6000")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn forwarded_for_is_honored_only_when_trusted() {
    let public = tempfile::tempdir().unwrap();
    let forwarded = |value: &str| {
        Request::get("/health")
            .header("x-forwarded-for", value)
            .body(Body::empty())
            .unwrap()
    };

    let trusted = harness(FakeRegistry::happy_path(), 1, true, public.path());
    assert_eq!(send(&trusted.router, forwarded("203.0.113.7, 10.0.0.1")).await.status(), StatusCode::OK);
    assert_eq!(send(&trusted.router, forwarded("198.51.100.2")).await.status(), StatusCode::OK);
    assert_eq!(
        send(&trusted.router, forwarded("203.0.113.7")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );

    // untrusted: both land in the same "unknown" bucket
    let untrusted = harness(FakeRegistry::happy_path(), 1, false, public.path());
    assert_eq!(send(&untrusted.router, forwarded("203.0.113.7")).await.status(), StatusCode::OK);
    assert_eq!(
        send(&untrusted.router, forwarded("198.51.100.2")).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn static_assets_are_served_without_limits() {
    let public = tempfile::tempdir().unwrap();
    std::fs::write(public.path().join("index.html"), "<h1>Signal Desk</h1>").unwrap();
    let h = harness(FakeRegistry::happy_path(), 1, false, public.path());

    for _ in 0..3 {
        let response = send(&h.router, get("/index.html")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-ratelimit-limit").is_none());
    }

    let root = send(&h.router, get("/")).await;
    assert_eq!(root.status(), StatusCode::OK);
    let bytes = root.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<h1>Signal Desk</h1>");
}
