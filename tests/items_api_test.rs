mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{response_json, text, TestApp};

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .map(|row| text(row, "name"))
        .collect()
}

#[tokio::test]
async fn total_amount_follows_base_and_discount() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;

    let response = app
        .request(
            Method::POST,
            "/api/items",
            Some(json!({
                "category_id": category["id"],
                "name": "Cola",
                "base_amount": 100,
                "discount": 20
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Item created successfully");
    assert_eq!(body["data"]["total_amount"].as_f64(), Some(80.0));
    let id = text(&body["data"], "id");

    let response = app
        .request(
            Method::PUT,
            &format!("/api/items/{id}"),
            Some(json!({ "discount": 30 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["message"], "Item updated successfully");
    assert_eq!(body["data"]["base_amount"].as_f64(), Some(100.0));
    assert_eq!(body["data"]["discount"].as_f64(), Some(30.0));
    assert_eq!(body["data"]["total_amount"].as_f64(), Some(70.0));

    let response = app
        .request(
            Method::PUT,
            &format!("/api/items/{id}"),
            Some(json!({ "base_amount": 150 })),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"]["total_amount"].as_f64(), Some(120.0));
}

#[tokio::test]
async fn create_item_defaults() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;

    let item = app
        .create_item(json!({
            "category_id": category["id"],
            "name": "Tap water",
            "base_amount": 0
        }))
        .await;

    assert_eq!(item["base_amount"].as_f64(), Some(0.0));
    assert_eq!(item["discount"].as_f64(), Some(0.0));
    assert_eq!(item["total_amount"].as_f64(), Some(0.0));
    assert_eq!(item["tax"].as_f64(), Some(0.0));
    assert_eq!(item["tax_applicability"], false);
    assert!(item["subcategory_id"].is_null());
}

#[tokio::test]
async fn create_item_requires_category_name_and_base_amount() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;

    for payload in [
        json!({ "name": "X" }),
        json!({ "category_id": category["id"], "name": "X" }),
        json!({ "category_id": category["id"], "base_amount": 5 }),
        json!({ "category_id": category["id"], "name": "X", "base_amount": null }),
        json!({ "category_id": "", "name": "X", "base_amount": 5 }),
    ] {
        let response = app.request(Method::POST, "/api/items", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await["error"],
            "Category ID, name, and base amount are required"
        );
    }

    let response = app.request(Method::GET, "/api/items", None).await;
    assert!(names(&response_json(response).await).is_empty());
}

#[tokio::test]
async fn create_item_with_unknown_category_is_a_store_rejection() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/items",
            Some(json!({
                "category_id": Uuid::new_v4(),
                "name": "Orphan",
                "base_amount": 10
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_json(response).await["error"].is_string());
}

#[tokio::test]
async fn missing_item_by_name_is_404() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/items/does-not-exist-name", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response_json(response).await["error"], "Item not found");
}

#[tokio::test]
async fn get_item_by_id_or_name_with_parent_names() {
    let app = TestApp::new().await;
    let (beverages, soda) = app.seed_beverages().await;
    let cola = app
        .create_item(json!({
            "category_id": beverages["id"],
            "subcategory_id": soda["id"],
            "name": "Coca-Cola",
            "base_amount": 3.5
        }))
        .await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/items/{}", text(&cola, "id")),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["name"], "Coca-Cola");
    assert_eq!(body["data"]["categories"], json!({ "name": "Beverages" }));
    assert_eq!(body["data"]["subcategories"], json!({ "name": "Soda" }));

    let response = app.request(Method::GET, "/api/items/Coca-Cola", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["data"]["id"], cola["id"]);
}

#[tokio::test]
async fn list_items_embeds_parent_names() {
    let app = TestApp::new().await;
    let (beverages, soda) = app.seed_beverages().await;
    app.create_item(json!({
        "category_id": beverages["id"],
        "subcategory_id": soda["id"],
        "name": "Cola",
        "base_amount": 3
    }))
    .await;
    app.create_item(json!({
        "category_id": beverages["id"],
        "name": "Water",
        "base_amount": 1
    }))
    .await;

    let response = app.request(Method::GET, "/api/items", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(names(&body), vec!["Water", "Cola"]);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows[0]["categories"]["name"], "Beverages");
    assert!(rows[0]["subcategories"].is_null());
    assert_eq!(rows[1]["subcategories"]["name"], "Soda");
}

#[tokio::test]
async fn list_items_by_category_and_subcategory() {
    let app = TestApp::new().await;
    let (beverages, soda) = app.seed_beverages().await;
    let food = app.create_category(json!({ "name": "Food" })).await;

    app.create_item(json!({
        "category_id": beverages["id"],
        "subcategory_id": soda["id"],
        "name": "Cola",
        "base_amount": 3
    }))
    .await;
    app.create_item(json!({
        "category_id": beverages["id"],
        "name": "Water",
        "base_amount": 1
    }))
    .await;
    app.create_item(json!({
        "category_id": food["id"],
        "name": "Burger",
        "base_amount": 9
    }))
    .await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/items/category/{}", text(&beverages, "id")),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&response_json(response).await), vec!["Water", "Cola"]);

    let response = app
        .request(
            Method::GET,
            &format!("/api/items/subcategory/{}", text(&soda, "id")),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(names(&body), vec!["Cola"]);
    assert_eq!(body["data"][0]["subcategories"]["name"], "Soda");

    let response = app
        .request(Method::GET, "/api/items/subcategory/not-a-uuid", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_is_a_case_insensitive_substring_match() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;
    for name in ["Coca-Cola", "COLA ZERO", "Lemonade", "100% Juice"] {
        app.create_item(json!({
            "category_id": category["id"],
            "name": name,
            "base_amount": 2
        }))
        .await;
    }

    let response = app
        .request(Method::GET, "/api/items/search?name=cola", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(names(&body), vec!["COLA ZERO", "Coca-Cola"]);
    assert_eq!(body["data"][0]["categories"]["name"], "Beverages");

    // Wildcards in the term are literal
    let response = app
        .request(Method::GET, "/api/items/search?name=%25", None)
        .await;
    assert_eq!(names(&response_json(response).await), vec!["100% Juice"]);

    let response = app
        .request(Method::GET, "/api/items/search?name=_", None)
        .await;
    assert!(names(&response_json(response).await).is_empty());
}

#[tokio::test]
async fn search_requires_a_term() {
    let app = TestApp::new().await;

    for uri in ["/api/items/search", "/api/items/search?name="] {
        let response = app.request(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response_json(response).await["error"],
            "Search name parameter is required"
        );
    }
}

#[tokio::test]
async fn update_missing_item_is_404() {
    let app = TestApp::new().await;

    for id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/items/{id}"),
                Some(json!({ "discount": 1 })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response_json(response).await["error"], "Item not found");
    }
}

#[tokio::test]
async fn item_update_is_idempotent_and_partial() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;
    let item = app
        .create_item(json!({
            "category_id": category["id"],
            "name": "Cola",
            "description": "Classic",
            "base_amount": 100,
            "discount": 20
        }))
        .await;
    let uri = format!("/api/items/{}", text(&item, "id"));
    let patch = json!({ "name": "Cola Classic", "tax": 5, "tax_applicability": true });

    let first = response_json(app.request(Method::PUT, &uri, Some(patch.clone())).await).await;
    let second = response_json(app.request(Method::PUT, &uri, Some(patch)).await).await;
    assert_eq!(first["data"], second["data"]);

    let data = &second["data"];
    assert_eq!(data["name"], "Cola Classic");
    assert_eq!(data["description"], "Classic");
    assert_eq!(data["total_amount"].as_f64(), Some(80.0));
    assert_eq!(data["category_id"], item["category_id"]);
}

#[tokio::test]
async fn explicit_null_on_required_fields_leaves_item_unchanged() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Beverages" })).await;
    let item = app
        .create_item(json!({
            "category_id": category["id"],
            "name": "Cola",
            "base_amount": 100,
            "discount": 20
        }))
        .await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/items/{}", text(&item, "id")),
            Some(json!({ "name": null, "base_amount": null, "discount": null, "tax": null })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &response_json(response).await["data"];
    assert_eq!(data["name"], "Cola");
    assert_eq!(data["base_amount"].as_f64(), Some(100.0));
    assert_eq!(data["discount"].as_f64(), Some(20.0));
    assert_eq!(data["total_amount"].as_f64(), Some(80.0));
}

#[tokio::test]
async fn search_matches_non_ascii_names() {
    let app = TestApp::new().await;
    let category = app.create_category(json!({ "name": "Desserts" })).await;
    app.create_item(json!({
        "category_id": category["id"],
        "name": "Éclair",
        "base_amount": 4
    }))
    .await;

    let response = app
        .request(Method::GET, "/api/items/search?name=%C3%89clair", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&response_json(response).await), vec!["Éclair"]);

    let response = app
        .request(Method::GET, "/api/items/search?name=CLAIR", None)
        .await;
    assert_eq!(names(&response_json(response).await), vec!["Éclair"]);
}

#[tokio::test]
async fn malformed_search_query_uses_error_envelope() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/items/search?name=a&name=b", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert!(body["error"].is_string());
    assert!(body["request_id"].is_string());
    assert!(body["timestamp"].is_string());
}
