//! End-to-end exporter scenarios.
//!
//! Runs a fake stats source on a real socket, wires the fetcher,
//! collector and registry exactly as the daemon does, and scrapes the
//! resulting router.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use statbridge_api::build_router;
use statbridge_fetch::StatsFetcher;
use statbridge_metrics::{Registry, StatisticsSnapshot, StatsCollector};

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn exporter_for(url: &str) -> Router {
    let mut registry = Registry::new();
    registry
        .register(StatsCollector::new(StatsFetcher::new(url).unwrap()))
        .unwrap();
    build_router(Arc::new(registry))
}

async fn scrape(exporter: Router) -> (StatusCode, String) {
    let req = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let resp = exporter.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn scenario_a_snapshot() -> StatisticsSnapshot {
    StatisticsSnapshot {
        time: 1_700_000_000,
        go_version: "go1.21.4".into(),
        go_os: "linux".into(),
        go_arch: "amd64".into(),
        cpu_num: 4,
        goroutine_num: 12,
        gomaxprocs: 4,
        heap_inuse: 2048,
        heap_released: 1024,
        gc_per_second: 0.25,
        ..Default::default()
    }
}

fn golang_sample_lines(body: &str) -> Vec<&str> {
    body.lines()
        .filter(|l| l.starts_with("golang_"))
        .collect()
}

#[tokio::test]
async fn scenario_a_all_fields_present() {
    let payload = serde_json::to_string(&scenario_a_snapshot()).unwrap();
    let source = serve(Router::new().route(
        "/api/stats",
        get(move || {
            let payload = payload.clone();
            async move { payload }
        }),
    ))
    .await;

    let (status, body) = scrape(exporter_for(&format!("http://{source}/api/stats"))).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body.contains("golang_cpu_num 4\n"));
    assert!(body.contains("golang_goroutine_num 12\n"));
    assert!(body.contains("golang_gomaxproc 4\n"));
    assert!(body.contains("golang_heap_inuse 2048\n"));
    assert!(body.contains("golang_heap_released 1024\n"));
    assert!(body.contains("golang_gc_per_second 0.25\n"));
    assert!(body.contains("# TYPE golang_cpu_num gauge\n"));

    // One line per numeric field; identity strings are never emitted.
    assert_eq!(golang_sample_lines(&body).len(), 23);
    assert!(!body.contains("golang_version"));
    assert!(!body.contains("golang_os"));
    assert!(!body.contains("golang_arch"));
}

#[tokio::test]
async fn scenario_b_source_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = scrape(exporter_for(&format!("http://{addr}/api/stats"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(golang_sample_lines(&body).is_empty());
}

#[tokio::test]
async fn scenario_c_source_returns_500() {
    let source = serve(Router::new().route(
        "/api/stats",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal error") }),
    ))
    .await;

    let (status, body) = scrape(exporter_for(&format!("http://{source}/api/stats"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(golang_sample_lines(&body).is_empty());
}

#[tokio::test]
async fn scenario_d_source_returns_garbage() {
    let source = serve(Router::new().route("/api/stats", get(|| async { "not json" }))).await;

    let (status, body) = scrape(exporter_for(&format!("http://{source}/api/stats"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(golang_sample_lines(&body).is_empty());
}

#[tokio::test]
async fn recovers_on_next_scrape() {
    use std::sync::atomic::{AtomicBool, Ordering};

    let healthy = Arc::new(AtomicBool::new(false));
    let payload = serde_json::to_string(&scenario_a_snapshot()).unwrap();
    let flag = healthy.clone();
    let source = serve(Router::new().route(
        "/api/stats",
        get(move || {
            let payload = payload.clone();
            let ok = flag.load(Ordering::SeqCst);
            async move {
                if ok {
                    (StatusCode::OK, payload)
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, String::new())
                }
            }
        }),
    ))
    .await;

    let exporter = exporter_for(&format!("http://{source}/api/stats"));

    let (_, body) = scrape(exporter.clone()).await;
    assert!(golang_sample_lines(&body).is_empty());

    healthy.store(true, Ordering::SeqCst);
    let (_, body) = scrape(exporter).await;
    assert_eq!(golang_sample_lines(&body).len(), 23);
}

#[tokio::test]
async fn exporter_scrapes_itself() {
    // Bind first so the fetcher can point at the exporter's own address.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let exporter = exporter_for(&format!("http://{addr}/api/stats"));
    tokio::spawn(async move {
        axum::serve(listener, exporter).await.unwrap();
    });

    let metrics = StatsFetcher::new(&format!("http://{addr}/metrics")).unwrap();
    let body = metrics.fetch().await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();

    assert_eq!(golang_sample_lines(&body).len(), 23);
    assert!(body.contains("golang_cpu_num "));
    assert!(body.contains("golang_gc_num 0\n"));
}
