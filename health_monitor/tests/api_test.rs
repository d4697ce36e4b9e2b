use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use health_monitor::{
    create_app, health::DependencyProbe, AppState, HealthMonitor, MonitorError, ProberSet,
    Resource, ResourceKind, ServerResponse,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn setup_app(probers: ProberSet, timeout_ms: u64) -> (Router, Arc<HealthMonitor>) {
    let monitor = Arc::new(HealthMonitor::new(probers, Duration::from_millis(timeout_ms)));
    let app = create_app(AppState::new(monitor.clone()));
    (app, monitor)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_with_nothing_registered() {
    let (app, _) = setup_app(ProberSet::simulated(Duration::ZERO), 500);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(body["message"], "Nothing to check");
    assert!(body.get("serviceResponses").is_none());
    assert!(body.get("failed").is_none());
}

#[tokio::test]
async fn test_register_then_check() {
    let (app, _) = setup_app(ProberSet::simulated(Duration::from_millis(10)), 1000);

    let (status, body) = send(
        &app,
        post_json(
            "/resources",
            serde_json::json!({"type": "serviceUrl", "name": "graphql", "handle": "uri", "critical": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["accepted"], true);

    let (status, _) = send(
        &app,
        post_json(
            "/resources",
            serde_json::json!({"type": "redisClient", "name": "sessions", "handle": "redis://localhost"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);

    let response: ServerResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.message, "Ok");
    assert_eq!(response.service_responses.len(), 2);
    assert_eq!(response.service_responses[0].resource, "graphql");
    assert_eq!(response.service_responses[1].resource, "sessions");
    assert!(response.failed.is_none());
}

#[tokio::test]
async fn test_register_rejects_invalid_resources() {
    let (app, monitor) = setup_app(ProberSet::simulated(Duration::ZERO), 500);

    let (status, body) = send(
        &app,
        post_json("/resources", serde_json::json!({"type": "serviceUrl", "name": "graphql"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, body) = send(
        &app,
        post_json(
            "/resources",
            serde_json::json!({"type": "mongoClient", "name": "users", "handle": "mongodb://"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("mongoClient"));

    assert!(monitor.resources().is_empty());
}

#[tokio::test]
async fn test_register_rejects_malformed_bodies() {
    let (app, monitor) = setup_app(ProberSet::simulated(Duration::ZERO), 500);

    let (status, body) = send(
        &app,
        post_json(
            "/resources",
            serde_json::json!({"type": 5, "name": "graphql", "handle": "uri"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/resources")
        .header("content-type", "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/resources")
        .body(Body::from(r#"{"type":"serviceUrl","name":"graphql","handle":"uri"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    assert!(monitor.resources().is_empty());
}

#[tokio::test]
async fn test_list_resources() {
    let (app, monitor) = setup_app(ProberSet::simulated(Duration::ZERO), 500);
    monitor.register(&Resource::new("postgresPromiseClient", "orders", "pg")).unwrap();
    monitor.register(&Resource::new("serviceUrl", "graphql", "uri").critical()).unwrap();

    let (status, body) = send(&app, get("/resources")).await;
    assert_eq!(status, StatusCode::OK);

    let resources = body.as_array().unwrap();
    assert_eq!(resources.len(), 2);
    assert_eq!(resources[0]["type"], "serviceUrl");
    assert_eq!(resources[0]["name"], "graphql");
    assert_eq!(resources[0]["critical"], true);
    assert_eq!(resources[1]["type"], "postgresPromiseClient");
    assert_eq!(resources[1]["critical"], false);
}

#[tokio::test]
async fn test_critical_failure_maps_to_service_unavailable() {
    let probers = ProberSet::simulated(Duration::ZERO).with_prober(DependencyProbe::new(
        ResourceKind::ElasticsearchClient,
        |_, _| Err(MonitorError::Other(anyhow::anyhow!("cluster red"))),
    ));
    let (app, monitor) = setup_app(probers, 1000);
    monitor.register(&Resource::new("serviceUrl", "graphql", "uri")).unwrap();
    monitor.register(&Resource::new("elasticsearchClient", "catalog", "es").critical()).unwrap();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Fail in a critical resource service");
    assert_eq!(body["failed"], serde_json::json!(["catalog"]));
    assert_eq!(body["serviceResponses"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_timeout_maps_to_service_unavailable() {
    let (app, monitor) = setup_app(ProberSet::simulated(Duration::from_millis(500)), 50);
    monitor.register(&Resource::new("serviceUrl", "graphql", "uri")).unwrap();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Timed out while checking resources");
    assert!(body.get("serviceResponses").is_none());
}

#[tokio::test]
async fn test_liveness_and_root() {
    let (app, _) = setup_app(ProberSet::simulated(Duration::ZERO), 750);

    let (status, body) = send(&app, get("/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timeout_ms"], 750);
}
