use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use saferoute::config::Config;
use saferoute::server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt as _;

const CONFIG: &str = r#"
[[locations]]
name = "Dam Square, Amsterdam"
lat = 52.3731
lng = 4.8932

[[locations]]
name = "Amsterdam Centraal Station"
lat = 52.3791
lng = 4.9003

[[locations]]
name = "Rotterdam Centraal"
lat = 51.9249
lng = 4.4690

[[reports]]
location = { lat = 52.3731, lng = 4.8932 }
report_type = "unsafe_area"
severity = "high"
"#;

fn app() -> Router {
    let config = Config::parse(CONFIG, "test").unwrap();
    router(Arc::new(AppState::from_config(&config).unwrap()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn plans_routes_between_named_locations() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({
            "origin": "dam square",
            "destination": "Amsterdam Centraal Station",
            "mode": "walking",
            "hour": 22
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"]["name"], "Dam Square, Amsterdam");
    assert_eq!(body["mode"], "WALKING");
    assert_eq!(body["hour"], 22);

    let routes = body["routes"].as_array().unwrap();
    assert_eq!(routes.len(), 3);
    assert_eq!(routes[0]["type"], "fastest");
    assert_eq!(routes[0]["description"], "Via main roads • Minimal traffic");
    assert_eq!(routes[1]["type"], "alternative");
    assert_eq!(routes[2]["type"], "safest");

    // the seeded high-severity report sits on the origin
    assert_eq!(routes[2]["name"], "Scenic");
    assert!(routes[2]["safetyScore"].as_i64().unwrap() < 75);
    assert_eq!(
        routes[2]["safetyAnalysis"]["nearbyReports"]
            .as_array()
            .unwrap()
            .len(),
        1
    );

    let geometry = &routes[0]["geometry"];
    assert_eq!(geometry["type"], "LineString");
    assert_eq!(geometry["coordinates"][0], json!([4.8932, 52.3731]));
    assert_eq!(geometry["bbox"].as_array().map(Vec::len), Some(4));
    assert!(routes[0]["distanceText"].as_str().unwrap().ends_with(" m"));
}

#[tokio::test]
async fn plans_routes_between_coordinates() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({
            "origin": { "lat": 52.3600, "lng": 4.8852, "name": "Museum" },
            "destination": { "lat": 52.3579, "lng": 4.8686 },
            "mode": "BICYCLING",
            "hour": 9
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origin"]["name"], "Museum");
    assert_eq!(body["destination"]["name"], "52.3579, 4.8686");
    assert_eq!(body["routes"][2]["name"], "Safest");
    assert_eq!(body["routes"][2]["safetyScore"], 75);
}

#[tokio::test]
async fn rejects_bad_route_requests() {
    let app = app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "destination": "Rotterdam" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "origin location is missing");

    let (status, _) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "origin": { "lat": 95.0, "lng": 4.0 }, "destination": "Rotterdam" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "origin": "Dam", "destination": "Eindhoven" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "origin": "Dam", "destination": "Rotterdam", "mode": "FLYING" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "origin": "Dam", "destination": "Rotterdam", "hour": 24 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/routes",
        Some(json!({ "origin": { "lat": "north", "lng": 4.0 }, "destination": "Rotterdam" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn searches_and_locates() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/locations?q=centraal", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/locations?q=ce", None).await;
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", "/api/locations/nearest?lat=51.93&lng=4.47", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Rotterdam Centraal");
}

#[tokio::test]
async fn report_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/reports",
        Some(json!({
            "location": { "lat": 52.3791, "lng": 4.9003 },
            "report_type": "well_lit",
            "description": "Bright station square"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["severity"], "medium");
    assert_eq!(created["upvotes"], 0);
    assert_eq!(created["status"], "active");
    let id = created["id"].as_str().unwrap().to_string();

    let (_, all) = send(&app, "GET", "/api/reports", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
    assert_eq!(all[0]["id"], id.as_str());

    let (_, lit) = send(&app, "GET", "/api/reports?type=well_lit", None).await;
    assert_eq!(lit.as_array().unwrap().len(), 1);

    let (status, upvoted) = send(&app, "POST", &format!("/api/reports/{id}/upvote"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(upvoted["upvotes"], 1);

    let (status, resolved) = send(
        &app,
        "PUT",
        &format!("/api/reports/{id}"),
        Some(json!({ "status": "resolved" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "resolved");

    let (status, _) = send(
        &app,
        "POST",
        "/api/reports/00000000-0000-0000-0000-000000000000/upvote",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_reports_with_bad_locations() {
    let app = app();
    let (status, _) = send(
        &app,
        "POST",
        "/api/reports",
        Some(json!({
            "location": { "lat": 12.0, "lng": 190.0 },
            "report_type": "harassment"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hexbins_cover_active_reports() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/hexbins", None).await;
    assert_eq!(status, StatusCode::OK);
    let bins = body.as_array().unwrap();
    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0]["issueWeight"], 3);
    assert_eq!(bins[0]["reports"], 1);

    let (status, _) = send(&app, "GET", "/api/hexbins?resolution=16", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
