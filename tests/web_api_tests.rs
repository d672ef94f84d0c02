use activity_exporter::{AppState, ExporterConfig, router};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tower::ServiceExt;

fn app(idle: Duration) -> (Router, AppState) {
    let state = AppState::new(&ExporterConfig::default().idle_timeout(idle)).unwrap();
    (router(state.clone()), state)
}

fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn report(script: &str, file: &str) -> JsonValue {
    json!({
        "script_name": script,
        "file_name": file,
        "rows": 25,
        "processing_time": 0.75,
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn scrape(app: &Router) -> String {
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    body
}

fn sample(text: &str, family: &str, script: &str) -> Option<f64> {
    text.lines()
        .filter(|line| line.starts_with(&format!("{family}{{")))
        .find(|line| line.contains(&format!("script_name=\"{script}\"")))
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}

#[tokio::test]
async fn track_file_updates_counters() {
    let (app, _state) = app(Duration::from_secs(60));

    let (status, body) = send(&app, post_json("/track-file/", &report("ingest.py", "a.csv"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<JsonValue>(&body).unwrap(),
        json!({"message": "Metrics updated"})
    );
    send(&app, post_json("/track-file/", &report("ingest.py", "a.csv"))).await;

    let text = scrape(&app).await;
    assert_eq!(sample(&text, "files_processed_total", "ingest.py"), Some(2.0));
    assert_eq!(sample(&text, "rows_in_json_total", "ingest.py"), Some(50.0));
    assert_eq!(
        sample(&text, "file_processing_time_seconds_count", "ingest.py"),
        Some(2.0)
    );
    assert!(sample(&text, "file_upload_time", "ingest.py").unwrap() > 0.0);
}

#[tokio::test]
async fn metrics_endpoint_uses_prometheus_content_type() {
    let (app, _state) = app(Duration::from_secs(60));
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        prometheus::TEXT_FORMAT
    );
}

#[tokio::test(start_paused = true)]
async fn real_time_stats_counts_and_decays() {
    let (app, state) = app(Duration::from_secs(60));

    for expected in 1..=3 {
        let (status, body) =
            send(&app, post_json("/real-time-stats/", &report("ingest.py", "a.csv"))).await;
        assert_eq!(status, StatusCode::OK);
        let body: JsonValue = serde_json::from_str(&body).unwrap();
        assert_eq!(body["active"], json!(expected));
    }
    assert_eq!(
        sample(&scrape(&app).await, "active_file_processing", "ingest.py"),
        Some(3.0)
    );

    tokio::time::sleep(Duration::from_secs(61)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert!(state.tracker.snapshot("ingest.py").is_none());
    assert_eq!(
        sample(&scrape(&app).await, "active_file_processing", "ingest.py"),
        Some(0.0)
    );
}

#[tokio::test]
async fn invalid_report_is_rejected() {
    let (app, state) = app(Duration::from_secs(60));

    let (status, body) = send(&app, post_json("/real-time-stats/", &report("", "a.csv"))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], "input_error");
    assert!(state.tracker.table().is_empty());

    let mut negative = report("ingest.py", "a.csv");
    negative["processing_time"] = json!(-2.0);
    let (status, _) = send(&app, post_json("/track-file/", &negative)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(sample(&scrape(&app).await, "files_processed_total", "ingest.py"), None);
}

#[tokio::test]
async fn malformed_body_is_client_error() {
    let (app, _state) = app(Duration::from_secs(60));

    let missing_rows = json!({"script_name": "ingest.py", "file_name": "a.csv"});
    let (status, _) = send(&app, post_json("/track-file/", &missing_rows)).await;
    assert!(status.is_client_error());

    let request = Request::builder()
        .method("POST")
        .uri("/real-time-stats/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert!(status.is_client_error());
}
