//! End-to-end tests: start the real actix server on a free port, backed by
//! the in-memory store, and drive the `/api` surface over HTTP.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use bigdecimal::BigDecimal;
use market_service::domain::catalog::{Banner, Category, Product};
use market_service::infrastructure::InMemoryStore;
use market_service::{build_server, AppState};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind failed")
        .local_addr()
        .expect("addr failed")
        .port()
}

fn product(id: &str, name: &str, name_tr: &str, price: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        name_tr: name_tr.to_string(),
        description: format!("Fresh {}", name.to_lowercase()),
        description_tr: format!("Taze {}", name_tr.to_lowercase()),
        price: BigDecimal::from_str(price).expect("valid decimal"),
        original_price: None,
        category_id: "cat_fruits_vegetables".to_string(),
        image_url: format!("https://img.example/{id}.jpg"),
        unit: "kg".to_string(),
        stock: 100,
        is_featured: false,
        is_on_sale: false,
        discount_percent: None,
        rating: 4.5,
        review_count: 10,
    }
}

fn catalog() -> InMemoryStore {
    let category = Category {
        id: "cat_fruits_vegetables".to_string(),
        name: "Fruits & Vegetables".to_string(),
        name_tr: "Meyve & Sebze".to_string(),
        icon: "leaf".to_string(),
        image_url: "https://img.example/cat.jpg".to_string(),
        color: "#4CAF50".to_string(),
        product_count: 3,
    };
    let banner = Banner {
        id: "banner_3".to_string(),
        title: "Free Delivery".to_string(),
        subtitle: "On orders over 300 TL".to_string(),
        image_url: "https://img.example/banner.jpg".to_string(),
        background_color: "#FF5722".to_string(),
        link_type: "promo".to_string(),
        link_id: None,
    };
    let mut bananas = product("prod_2", "Bananas", "Muz", "44.90");
    bananas.is_featured = true;
    InMemoryStore::with_catalog(
        vec![category],
        vec![
            product("prod_1", "Fresh Tomatoes", "Taze Domates", "24.90"),
            bananas,
            product("prod_15", "Lamb Chops", "Kuzu Pirzola", "399.90"),
        ],
        vec![banner],
    )
}

struct TestApp {
    base: String,
    http: Client,
    store: Arc<InMemoryStore>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.http.get(self.url(path)).send().await.expect("GET failed");
        let status = resp.status();
        (status, resp.json().await.expect("JSON body"))
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = self.http.request(method, self.url(path));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.expect("request failed");
        let status = resp.status();
        (status, resp.json().await.expect("JSON body"))
    }

    async fn add(&self, session: &str, product_id: &str, quantity: i32) -> (StatusCode, Value) {
        self.send(
            reqwest::Method::POST,
            &format!("/cart/{session}/add"),
            Some(json!({ "product_id": product_id, "quantity": quantity })),
        )
        .await
    }

    async fn checkout(&self, session: &str) -> (StatusCode, Value) {
        self.send(
            reqwest::Method::POST,
            "/orders",
            Some(json!({
                "session_id": session,
                "delivery_address": {
                    "full_name": "Ayse Yilmaz",
                    "phone": "+90 555 000 0000",
                    "address": "Ataturk Cd. 12",
                    "city": "Istanbul",
                    "district": "Kadikoy"
                },
                "delivery_date": "2026-10-18",
                "delivery_time_slot": "10:00-12:00"
            })),
        )
        .await
    }
}

async fn spawn_app() -> TestApp {
    let store = Arc::new(catalog());
    let port = free_port();
    let server = build_server(AppState::in_memory(store.clone()), "127.0.0.1", port)
        .expect("Failed to bind the market service");
    tokio::spawn(server);

    let base = format!("http://127.0.0.1:{port}");
    let http = Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("client");
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while http.get(format!("{base}/api/")).send().await.is_err() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "server did not come up within 10s"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    TestApp { base, http, store }
}

fn decimal(v: &Value) -> BigDecimal {
    let amount = v.as_f64().expect("amount should be a JSON number");
    BigDecimal::from_str(&amount.to_string()).expect("valid decimal")
}

// ── Catalog ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn catalog_endpoints_serve_products_categories_and_banners() {
    let app = spawn_app().await;

    let (status, root) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(root["status"], "running");

    let (_, categories) = app.get("/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/categories/cat_nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, found) = app.get("/products?search=DOMATES").await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], "prod_1");

    let (_, featured) = app.get("/products?featured=true").await;
    assert_eq!(featured.as_array().unwrap().len(), 1);

    let (status, product) = app.get("/products/prod_2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&product["price"]), BigDecimal::from_str("44.90").unwrap());

    let (status, body) = app.get("/products/prod_404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (_, banners) = app.get("/banners").await;
    assert_eq!(banners[0]["id"], "banner_3");
}

// ── Cart ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_session_has_empty_cart() {
    let app = spawn_app().await;
    let (status, cart) = app.get("/cart/fresh-session").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart, json!({ "session_id": "fresh-session", "items": [], "products": [] }));
}

#[tokio::test]
async fn adding_twice_accumulates_quantity() {
    let app = spawn_app().await;

    let (status, body) = app.add("s1", "prod_1", 2).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item added to cart");

    let (_, body) = app.add("s1", "prod_1", 3).await;
    assert_eq!(body["cart"]["items"], json!([{ "product_id": "prod_1", "quantity": 5 }]));

    let (_, cart) = app.get("/cart/s1").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["products"][0]["id"], "prod_1");
}

#[tokio::test]
async fn add_defaults_quantity_to_one() {
    let app = spawn_app().await;
    let (status, body) = app
        .send(
            reqwest::Method::POST,
            "/cart/s1/add",
            Some(json!({ "product_id": "prod_2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn adding_unknown_product_is_404() {
    let app = spawn_app().await;
    let (status, body) = app.add("s1", "prod_999", 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn malformed_body_is_400() {
    let app = spawn_app().await;
    let (status, body) = app
        .send(
            reqwest::Method::POST,
            "/cart/s1/add",
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_rules() {
    let app = spawn_app().await;

    // No cart yet: every update is 404, whatever the quantity.
    for quantity in [0, 2] {
        let (status, _) = app
            .send(
                reqwest::Method::PUT,
                "/cart/s1/update",
                Some(json!({ "product_id": "prod_1", "quantity": quantity })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    app.add("s1", "prod_1", 4).await;

    let (status, body) = app
        .send(
            reqwest::Method::PUT,
            "/cart/s1/update",
            Some(json!({ "product_id": "prod_2", "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Item not in cart");

    let (status, body) = app
        .send(
            reqwest::Method::PUT,
            "/cart/s1/update",
            Some(json!({ "product_id": "prod_1", "quantity": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart updated");

    let (_, cart) = app.get("/cart/s1").await;
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn remove_is_idempotent_but_needs_a_cart() {
    let app = spawn_app().await;

    let (status, _) = app
        .send(reqwest::Method::DELETE, "/cart/ghost/remove/prod_1", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.add("s1", "prod_1", 1).await;
    for _ in 0..2 {
        let (status, body) = app
            .send(reqwest::Method::DELETE, "/cart/s1/remove/prod_1", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Item removed from cart");
    }
}

#[tokio::test]
async fn clear_always_succeeds() {
    let app = spawn_app().await;
    let (status, body) = app
        .send(reqwest::Method::DELETE, "/cart/never-seen/clear", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cart cleared");
}

#[tokio::test]
async fn removed_catalog_product_is_hidden_from_cart_display() {
    let app = spawn_app().await;
    app.add("s1", "prod_1", 1).await;
    app.add("s1", "prod_2", 1).await;
    app.store.delete_product("prod_1").expect("delete");

    let (_, cart) = app.get("/cart/s1").await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
    assert_eq!(cart["products"].as_array().unwrap().len(), 1);
    assert_eq!(cart["products"][0]["id"], "prod_2");
}

// ── Favorites ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_favorite_flips_membership() {
    let app = spawn_app().await;

    let (_, body) = app
        .send(reqwest::Method::POST, "/favorites/s1/toggle/prod_2", None)
        .await;
    assert_eq!(body["is_favorite"], true);

    let (_, favorites) = app.get("/favorites/s1").await;
    assert_eq!(favorites["product_ids"], json!(["prod_2"]));
    assert_eq!(favorites["products"][0]["id"], "prod_2");

    let (_, body) = app
        .send(reqwest::Method::POST, "/favorites/s1/toggle/prod_2", None)
        .await;
    assert_eq!(body["is_favorite"], false);

    let (status, _) = app
        .send(reqwest::Method::POST, "/favorites/s1/toggle/prod_999", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, empty) = app.get("/favorites/other").await;
    assert_eq!(empty, json!({ "session_id": "other", "product_ids": [], "products": [] }));
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn checkout_prices_order_and_empties_cart() {
    let app = spawn_app().await;
    app.add("s1", "prod_1", 2).await;

    let (status, order) = app.checkout("s1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(order["total"].is_number());
    assert!(order["items"][0]["price"].is_number());
    assert_eq!(decimal(&order["subtotal"]), BigDecimal::from_str("49.80").unwrap());
    assert_eq!(decimal(&order["delivery_fee"]), BigDecimal::from_str("14.90").unwrap());
    assert_eq!(decimal(&order["total"]), BigDecimal::from_str("64.70").unwrap());
    assert_eq!(order["status"], "confirmed");
    assert_eq!(order["payment_method"], "cash_on_delivery");
    assert_eq!(order["items"][0]["product_name_tr"], "Taze Domates");
    assert_eq!(order["items"][0]["quantity"], 2);

    let (_, cart) = app.get("/cart/s1").await;
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn checkout_over_threshold_is_free_delivery() {
    let app = spawn_app().await;
    app.add("s1", "prod_15", 1).await;

    let (_, order) = app.checkout("s1").await;
    assert_eq!(order["delivery_fee"].as_f64(), Some(0.0));
    assert_eq!(decimal(&order["total"]), BigDecimal::from_str("399.90").unwrap());
}

#[tokio::test]
async fn checkout_with_empty_cart_is_400() {
    let app = spawn_app().await;
    let (status, body) = app.checkout("nobody").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
}

#[tokio::test]
async fn orders_are_listed_newest_first_and_scoped_by_session() {
    let app = spawn_app().await;

    app.add("s_b", "prod_1", 1).await;
    let (_, first) = app.checkout("s_b").await;
    app.add("s_b", "prod_2", 1).await;
    let (_, second) = app.checkout("s_b").await;

    let (status, listed) = app.get("/orders/s_b").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, [second["id"].as_str().unwrap(), first["id"].as_str().unwrap()]);

    let order_id = first["id"].as_str().unwrap();
    let (status, order) = app.get(&format!("/orders/s_b/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["id"], first["id"]);

    let (status, body) = app.get(&format!("/orders/s_a/{order_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Order not found");

    let (_, other) = app.get("/orders/s_a").await;
    assert_eq!(other, json!([]));
}
