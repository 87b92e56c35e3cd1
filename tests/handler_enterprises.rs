mod common;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use axum_test::TestServer;
use openfoodweb::api::handlers::{
    bulk_update_enterprises_handler, create_enterprise_handler, delete_enterprise_handler,
    enterprise_handler, enterprise_list_handler, update_enterprise_handler,
};
use serde_json::{Value, json};

fn make_server() -> TestServer {
    let (state, _store) = common::create_test_state();
    let app = Router::new()
        .route(
            "/admin/enterprises",
            get(enterprise_list_handler).post(create_enterprise_handler),
        )
        .route(
            "/admin/enterprises/bulk_update",
            post(bulk_update_enterprises_handler),
        )
        .route(
            "/admin/enterprises/{id}",
            get(enterprise_handler)
                .patch(update_enterprise_handler)
                .delete(delete_enterprise_handler),
        )
        .with_state(state);
    TestServer::new(app).unwrap()
}

async fn create(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/admin/enterprises")
        .json(&json!({ "name": name, "is_primary_producer": true }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_create_and_get_enterprise() {
    let server = make_server();
    let id = create(&server, "Hill Farm").await;

    let response = server.get(&format!("/admin/enterprises/{id}")).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["name"], "Hill Farm");
    assert_eq!(json["is_primary_producer"], true);
    assert_eq!(json["is_distributor"], false);
    assert_eq!(json["is_active"], true);
}

#[tokio::test]
async fn test_create_enterprise_duplicate_name() {
    let server = make_server();
    create(&server, "Hill Farm").await;

    let response = server
        .post("/admin/enterprises")
        .json(&json!({ "name": "Hill Farm" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_update_enterprise() {
    let server = make_server();
    let id = create(&server, "Hill Farm").await;

    let response = server
        .patch(&format!("/admin/enterprises/{id}"))
        .json(&json!({ "is_distributor": true, "description": "Organic veg" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["is_distributor"], true);
    assert_eq!(json["description"], "Organic veg");
    assert_eq!(json["name"], "Hill Farm");
}

#[tokio::test]
async fn test_bulk_update_enterprises() {
    let server = make_server();
    let farm = create(&server, "Hill Farm").await;
    let coop = create(&server, "Valley Coop").await;

    let response = server
        .post("/admin/enterprises/bulk_update")
        .json(&json!({
            "enterprises": [
                { "id": farm, "is_active": false },
                { "id": coop, "name": "Valley Co-op", "is_distributor": true }
            ]
        }))
        .await;

    response.assert_status_ok();
    let items = response.json::<Value>()["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 2);

    let list = server.get("/admin/enterprises").await.json::<Value>();
    let by_id = |id: i64| {
        list["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["id"] == id)
            .cloned()
            .unwrap()
    };
    assert_eq!(by_id(farm)["is_active"], false);
    assert_eq!(by_id(coop)["name"], "Valley Co-op");
    assert_eq!(by_id(coop)["is_distributor"], true);
}

#[tokio::test]
async fn test_bulk_update_unknown_enterprise_changes_nothing() {
    let server = make_server();
    let farm = create(&server, "Hill Farm").await;

    let response = server
        .post("/admin/enterprises/bulk_update")
        .json(&json!({
            "enterprises": [
                { "id": farm, "is_active": false },
                { "id": 999, "is_active": false }
            ]
        }))
        .await;

    response.assert_status_not_found();

    let json = server
        .get(&format!("/admin/enterprises/{farm}"))
        .await
        .json::<Value>();
    assert_eq!(json["is_active"], true);
}

#[tokio::test]
async fn test_bulk_update_rejects_empty_batch() {
    let server = make_server();

    let response = server
        .post("/admin/enterprises/bulk_update")
        .json(&json!({ "enterprises": [] }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_bulk_update_rejects_duplicate_ids() {
    let server = make_server();
    let farm = create(&server, "Hill Farm").await;

    let response = server
        .post("/admin/enterprises/bulk_update")
        .json(&json!({
            "enterprises": [
                { "id": farm, "is_active": false },
                { "id": farm, "is_distributor": true }
            ]
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_delete_enterprise() {
    let server = make_server();
    let id = create(&server, "Hill Farm").await;

    server
        .delete(&format!("/admin/enterprises/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/admin/enterprises/{id}"))
        .await
        .assert_status_not_found();
}
