mod common;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, patch, post, put},
};
use axum_test::TestServer;
use openfoodweb::api::handlers::{
    admin_distributor_list_handler, bulk_update_distributors_handler, create_distributor_handler,
    delete_distributor_handler, distributor_handler, distributor_list_handler,
    distributor_products_handler, populate_handler, update_distributor_handler,
};
use openfoodweb::api::routes::admin_routes;
use openfoodweb::infrastructure::memory::MemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;

fn make_server() -> (TestServer, Arc<MemoryStore>) {
    let (state, store) = common::create_test_state();
    let app = Router::new()
        .route("/distributors", get(distributor_list_handler))
        .route("/distributors/{id}", get(distributor_handler))
        .route(
            "/distributors/{id}/products",
            get(distributor_products_handler),
        )
        .route("/orders/populate", put(populate_handler))
        .route(
            "/admin/distributors",
            get(admin_distributor_list_handler).post(create_distributor_handler),
        )
        .route(
            "/admin/distributors/bulk_update",
            post(bulk_update_distributors_handler),
        )
        .route(
            "/admin/distributors/{id}",
            patch(update_distributor_handler).delete(delete_distributor_handler),
        )
        .with_state(state);
    (TestServer::new(app).unwrap(), store)
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_distributor_success() {
    let (server, _store) = make_server();

    let response = server
        .post("/admin/distributors")
        .json(&json!({
            "name": "  Green Hub ",
            "email": "hub@example.com",
            "pickup_address": "12 Market St"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<Value>();
    assert_eq!(json["name"], "Green Hub");
    assert_eq!(json["is_active"], true);
    assert_eq!(json["pickup_address"], "12 Market St");
}

#[tokio::test]
async fn test_create_distributor_duplicate() {
    let (server, store) = make_server();
    common::create_test_distributor(&store, "Green Hub").await;

    let response = server
        .post("/admin/distributors")
        .json(&json!({ "name": "Green Hub" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_distributor_blank_name() {
    let (server, _store) = make_server();

    let response = server
        .post("/admin/distributors")
        .json(&json!({ "name": "   " }))
        .await;

    response.assert_status_bad_request();
}

// ─── LIST / GET ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_public_list_hides_inactive() {
    let (server, store) = make_server();
    let active = common::create_test_distributor(&store, "Active Hub").await;
    let inactive = common::create_test_distributor(&store, "Closed Hub").await;

    server
        .post("/admin/distributors/bulk_update")
        .json(&json!({ "ids": [inactive.id], "is_active": false }))
        .await
        .assert_status_ok();

    let public = server.get("/distributors").await.json::<Value>();
    let ids: Vec<i64> = public["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![active.id]);

    let admin = server.get("/admin/distributors").await.json::<Value>();
    assert_eq!(admin["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_admin_shows_inactive_distributor() {
    let (state, store) = common::create_test_state();
    let app = Router::new()
        .nest("/admin", admin_routes())
        .with_state(state);
    let server = TestServer::new(app).unwrap();
    let hub = common::create_test_distributor(&store, "Closed Hub").await;

    server
        .post("/admin/distributors/bulk_update")
        .json(&json!({ "ids": [hub.id], "is_active": false }))
        .await
        .assert_status_ok();

    let response = server.get(&format!("/admin/distributors/{}", hub.id)).await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["name"], "Closed Hub");
    assert_eq!(json["is_active"], false);

    server
        .get("/admin/distributors/999")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_get_distributor_not_found() {
    let (server, _store) = make_server();

    let response = server.get("/distributors/999").await;

    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_distributor_products() {
    let (server, store) = make_server();
    let d1 = common::create_test_distributor(&store, "Hub One").await;
    let d2 = common::create_test_distributor(&store, "Hub Two").await;
    let carrots = common::create_test_product(&store, "Carrots", &[d1.id]).await;
    common::create_test_product(&store, "Leeks", &[d2.id]).await;

    let response = server
        .get(&format!("/distributors/{}/products", d1.id))
        .await;

    response.assert_status_ok();
    let items = response.json::<Value>()["items"].clone();
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["id"], carrots.id);
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_distributor_clears_email() {
    let (server, _store) = make_server();

    let created = server
        .post("/admin/distributors")
        .json(&json!({ "name": "Green Hub", "email": "hub@example.com" }))
        .await
        .json::<Value>();
    let id = created["id"].as_i64().unwrap();

    let response = server
        .patch(&format!("/admin/distributors/{id}"))
        .json(&json!({ "email": null, "name": "Greener Hub" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert!(json["email"].is_null());
    assert_eq!(json["name"], "Greener Hub");
    assert_eq!(json["pickup_address"], created["pickup_address"]);
}

#[tokio::test]
async fn test_update_distributor_not_found() {
    let (server, _store) = make_server();

    let response = server
        .patch("/admin/distributors/999")
        .json(&json!({ "is_active": false }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_bulk_update_requires_ids() {
    let (server, _store) = make_server();

    let response = server
        .post("/admin/distributors/bulk_update")
        .json(&json!({ "ids": [], "is_active": false }))
        .await;

    response.assert_status_bad_request();
}

// ─── DELETE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_unused_distributor() {
    let (server, store) = make_server();
    let d1 = common::create_test_distributor(&store, "Hub One").await;

    server
        .delete(&format!("/admin/distributors/{}", d1.id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/distributors/{}", d1.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_distributor_with_orders_conflict() {
    let (server, store) = make_server();
    let d1 = common::create_test_distributor(&store, "Hub One").await;
    let p1 = common::create_test_product(&store, "Carrots", &[d1.id]).await;

    server
        .put("/orders/populate")
        .json(&json!({ "variants": { p1.id.to_string(): 1 }, "distributor_id": d1.id }))
        .await
        .assert_status_ok();

    let response = server
        .delete(&format!("/admin/distributors/{}", d1.id))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}
