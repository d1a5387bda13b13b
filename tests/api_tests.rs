mod common;

use actix_web::{test, web, App};
use footpath::config::Settings;
use footpath::server::{configure, AppState};
use serde_json::{json, Value};

fn state(name: &str) -> (web::Data<AppState>, common::TempDb) {
    let db = common::demo_db(name);
    let settings = Settings {
        db_path: db.path.clone(),
        seed: Some(99),
        ..Settings::default()
    };
    (web::Data::new(AppState::new(settings)), db)
}

#[actix_web::test]
async fn test_lines_and_stations() {
    let (data, _db) = state("lines");
    let app = test::init_service(App::new().app_data(data).configure(configure)).await;

    let req = test::TestRequest::get().uri("/lines").to_request();
    let lines: Value = test::call_and_read_body_json(&app, req).await;
    let labels: Vec<&str> = lines.as_array().unwrap().iter().map(|l| l["label"].as_str().unwrap()).collect();
    assert!(labels.contains(&"🟣 Purple Line"));

    let req = test::TestRequest::get().uri("/lines/Purple%20Line/stations?search=road").to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing["stations"], json!(["MG Road"]));
    assert_eq!(listing["search_fallback"], json!(false));

    let req = test::TestRequest::get().uri("/lines/Pink%20Line/stations").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_session_round_trip() {
    let (data, _db) = state("session");
    let app = test::init_service(App::new().app_data(data).configure(configure)).await;

    let req = test::TestRequest::post().uri("/routes/generate").set_json(json!({"seed": 5})).to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert!(report["total_routes"].as_u64().unwrap() > 0);

    let req = test::TestRequest::post().uri("/sessions").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();
    assert_eq!(created["stage"], json!("station_selection"));

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{}/station", id))
        .set_json(json!({"line": "Yellow Line", "station": "BTM Layout"}))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["stage"], json!("route_selection"));
    assert_eq!(summary["station_size"], json!("small"));

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{}/pair", id))
        .set_json(json!({"start": "Exit - Silk Board", "end": "Exit - Silk Board"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{}/pair", id))
        .set_json(json!({"start": "Entry A - Outer Ring Road", "end": "Platform 1 - Towards Bommasandra"}))
        .to_request();
    let pair: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pair["shortest"]["label"], json!("Route 1: Entry A → Platform 1"));

    let req = test::TestRequest::get().uri(&format!("/sessions/{}/results", id)).to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["refresh_ms"], json!(3000));
    assert_eq!(first["results"]["routes"].as_array().unwrap().len(), 4);

    let req = test::TestRequest::get().uri(&format!("/sessions/{}/results", id)).to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["results"]["routes"], second["results"]["routes"]);
    assert_eq!(first["results"]["best"], second["results"]["best"]);

    let req = test::TestRequest::get().uri("/counters").to_request();
    let counters: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(counters.as_array().unwrap().len(), 1);
    assert_eq!(counters[0]["count"], json!(1));
    assert_eq!(counters[0]["path"], first["results"]["best"]["label"]);

    let req = test::TestRequest::post().uri(&format!("/sessions/{}/restart", id)).to_request();
    let restarted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(restarted["stage"], json!("station_selection"));

    let req = test::TestRequest::get().uri(&format!("/sessions/{}/results", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    let req = test::TestRequest::delete().uri(&format!("/sessions/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let req = test::TestRequest::get().uri(&format!("/sessions/{}", id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_pair_without_routes_is_not_found() {
    // Routes were never generated for this DB.
    let (data, _db) = state("noroutes");
    let app = test::init_service(App::new().app_data(data).configure(configure)).await;

    let req = test::TestRequest::post().uri("/sessions").to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_u64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{}/station", id))
        .set_json(json!({"line": "Green Line", "station": "Jayanagar"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::post()
        .uri(&format!("/sessions/{}/pair", id))
        .set_json(json!({"start": "Entry - South End Circle", "end": "Platform - Towards Silk Institute"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["kind"], json!("not_found"));

    let req = test::TestRequest::get().uri(&format!("/sessions/{}", id)).to_request();
    let summary: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(summary["stage"], json!("route_selection"));
    assert_eq!(summary["shortest"], Value::Null);
}
