mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn restaurant_crud_round_trip() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, created) = app
        .post(
            "/restaurants",
            Some(&admin),
            json!({
                "name": "Chez Nous",
                "location": "Riverside",
                "contact_number": "555-0101",
                "description": "French bistro"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = app.get(&format!("/restaurants/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Chez Nous");

    let (status, updated) = app
        .put(
            &format!("/restaurants/{id}"),
            Some(&admin),
            json!({ "location": "Hilltop" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "Hilltop");
    // Untouched fields survive a partial update.
    assert_eq!(updated["name"], "Chez Nous");

    let (status, _) = app.delete(&format!("/restaurants/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/restaurants/{id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_restaurant_names_conflict() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let payload = json!({
        "name": "Twins",
        "location": "North",
        "contact_number": "555-0102"
    });
    let (status, _) = app.post("/restaurants", Some(&admin), payload.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/restaurants", Some(&admin), payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn catalog_writes_require_admin() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (restaurant_id, branch_id, table_id) = app.seed_front_of_house(&admin).await;
    let (_, staff_token) = app.seed_staff("waiter", "staff").await;

    let (status, _) = app
        .post(
            "/restaurants",
            Some(&staff_token),
            json!({ "name": "Nope", "location": "X", "contact_number": "1" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .delete(&format!("/tables/{table_id}"), Some(&staff_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Reads are open to any authenticated caller.
    let (status, _) = app.get("/restaurants", Some(&staff_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/branches/{branch_id}"), Some(&staff_token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .get(&format!("/restaurants/{restaurant_id}/branches"), Some(&staff_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dependent_rows_block_deletion() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (restaurant_id, branch_id, table_id) = app.seed_front_of_house(&admin).await;
    let (menu_id, category_id, item_id) = app.seed_menu_item(&admin, restaurant_id).await;

    let (status, err) = app
        .delete(&format!("/restaurants/{restaurant_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
    assert!(err["message"].as_str().unwrap().contains("branches"));

    let (status, err) = app
        .delete(&format!("/branches/{branch_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");

    let (status, err) = app
        .delete(&format!("/categories/{category_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");
    assert!(err["message"].as_str().unwrap().contains("items"));

    let (status, err) = app.delete(&format!("/menus/{menu_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{err}");

    // Delete leaf-first and everything unblocks.
    let (status, _) = app
        .delete(
            &format!("/categories/{category_id}/items/{item_id}"),
            Some(&admin),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/categories/{category_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/menus/{menu_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.delete(&format!("/tables/{table_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/branches/{branch_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/restaurants/{restaurant_id}"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn nested_branch_routes_check_ownership() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (restaurant_id, branch_id, _) = app.seed_front_of_house(&admin).await;

    let (status, branch) = app
        .post(
            &format!("/restaurants/{restaurant_id}/branches"),
            Some(&admin),
            json!({ "address": "9 Dock Rd", "city": "Harborview" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{branch}");
    assert_eq!(branch["restaurant_id"], restaurant_id);

    let (status, list) = app
        .get(&format!("/restaurants/{restaurant_id}/branches"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    // A branch id under the wrong restaurant is not found.
    let (status, other) = app
        .post(
            "/restaurants",
            Some(&admin),
            json!({ "name": "Other Place", "location": "East", "contact_number": "555-0103" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let other_id = other["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/restaurants/{other_id}/branches/{branch_id}"),
            Some(&admin),
            json!({ "city": "Elsewhere" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, updated) = app
        .put(
            &format!("/restaurants/{restaurant_id}/branches/{branch_id}"),
            Some(&admin),
            json!({ "city": "Elsewhere" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["city"], "Elsewhere");
}

#[tokio::test]
async fn table_availability_is_server_owned() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, branch_id, _) = app.seed_front_of_house(&admin).await;

    // A client-supplied availability flag is ignored on create.
    let (status, table) = app
        .post(
            "/tables",
            Some(&admin),
            json!({
                "table_number": "T9",
                "seats": 6,
                "branch_id": branch_id,
                "is_available": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{table}");
    assert_eq!(table["is_available"], true);
    let table_id = table["id"].as_i64().unwrap();

    // And ignored on update.
    let (status, updated) = app
        .put(
            &format!("/tables/{table_id}"),
            Some(&admin),
            json!({ "seats": 8, "is_available": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["seats"], 8);
    assert_eq!(updated["is_available"], true);
}

#[tokio::test]
async fn creating_against_missing_parents_is_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/branches",
            Some(&admin),
            json!({ "address": "1 Void Ln", "city": "Nowhere", "restaurant_id": 42 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/menus",
            Some(&admin),
            json!({ "name": "Ghost", "price": "1.00", "restaurant_id": 42 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/categories",
            Some(&admin),
            json!({ "name": "Ghost", "menu_id": 42 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/tables",
            Some(&admin),
            json!({ "table_number": "T1", "seats": 2, "branch_id": 42 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_is_open() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
