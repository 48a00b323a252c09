//! REST client against an in-process axum server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use till_core::{Product, Sale, SaleLineItem, Salesperson};
use till_remote::{RemoteError, RestClient};

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base: &str) -> RestClient {
    RestClient::new(base, Duration::from_secs(5), false).unwrap()
}

fn cola() -> Product {
    Product {
        id: "uuid-cola".into(),
        name: "Cola".into(),
        code: "BEV-001".into(),
        cost_price_cents: 80,
        retail_price_cents: 150,
        image_url: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_list_products_translates_casing() {
    let app = Router::new().route(
        "/api/products",
        get(|| async {
            Json(json!([
                {"productId": 1, "name": "Cola", "code": "BEV-001",
                 "costPrice": 0.8, "retailPrice": 1.5, "imageURL": null,
                 "creationDate": "2024-03-10T14:30:00Z", "updationDate": null},
                {"productId": 2, "name": "Chips", "code": "SNK-001",
                 "costPrice": 1, "retailPrice": 2.25,
                 "creationDate": "2024-03-11T09:00:00"}
            ]))
        }),
    );
    let base = serve(app).await;

    let products: Vec<Product> = client(&base).list().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, "1");
    assert_eq!(products[1].retail_price_cents, 225);
    assert_eq!(products[1].cost_price_cents, 100);
}

#[tokio::test]
async fn test_create_posts_wire_body_and_takes_server_id() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/products/add",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(("add".into(), body.clone()));
                let mut created = body;
                created["productId"] = json!(99);
                Json(created)
            }),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let created = client(&base).create(&cola()).await.unwrap();

    assert_eq!(created.id, "99");
    assert_eq!(created.code, "BEV-001");
    let seen = seen.lock().unwrap();
    let body = &seen[0].1;
    assert_eq!(body["productId"], json!("uuid-cola"));
    assert_eq!(body["retailPrice"], json!(1.5));
    assert!(body.get("retail_price_cents").is_none());
}

#[tokio::test]
async fn test_update_with_empty_response_echoes_record() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/api/sales/update/{id}",
            put(
                |State(seen): State<Seen>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((id, body));
                    StatusCode::NO_CONTENT
                },
            ),
        )
        .with_state(seen.clone());
    let base = serve(app).await;

    let mut line = SaleLineItem::from_product(&cola());
    line.quantity = 2;
    line.discount_bps = 1250;
    let sale = Sale {
        id: "s-1".into(),
        created_at: Utc::now(),
        updated_at: Some(Utc::now()),
        salesperson_id: "sp-1".into(),
        comments: Some("edited".into()),
        total_cents: line.amount().cents(),
        line_items: vec![line],
    };

    let updated = client(&base).update(&sale).await.unwrap();

    assert_eq!(updated, sale);
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "s-1");
    assert_eq!(seen[0].1["saleItems"][0]["discount"], json!(12.5));
    assert_eq!(seen[0].1["saleItems"][0]["quantity"], json!(2.0));
}

#[tokio::test]
async fn test_delete_not_found_maps_to_user_message() {
    let app = Router::new().route(
        "/api/salespersons/delete/{id}",
        delete(|Path(_id): Path<String>| async {
            (StatusCode::NOT_FOUND, Json(json!({"message": "no such salesperson"})))
        }),
    );
    let base = serve(app).await;

    let err = client(&base).delete::<Salesperson>("7").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.user_message(), "The requested resource was not found.");
}

#[tokio::test]
async fn test_server_message_is_surfaced_for_client_errors() {
    let app = Router::new().route(
        "/api/products/add",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"message": "Product code already exists"})),
            )
        }),
    );
    let base = serve(app).await;

    let err = client(&base).create(&cola()).await.unwrap_err();

    assert!(matches!(err, RemoteError::Status { status: 409, .. }));
    assert_eq!(err.user_message(), "Product code already exists");
}

#[tokio::test]
async fn test_server_error_has_generic_message() {
    let app = Router::new().route(
        "/api/sales",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(app).await;

    let err = client(&base).list::<Sale>().await.unwrap_err();

    assert_eq!(err.user_message(), "Internal server error. Please try again later.");
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api"))
        .list::<Product>()
        .await
        .unwrap_err();

    assert_eq!(
        err.user_message(),
        "Unable to connect to server. Please check your internet connection."
    );
}
