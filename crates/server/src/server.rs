use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{bank_accounts, collects, customers, deliverymen, loans, products, sales, transactions};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/sales", post(sales::sale_new).get(sales::list))
        .route(
            "/sales/{id}",
            get(sales::get)
                .patch(sales::update)
                .delete(sales::remove),
        )
        .route("/sales/{id}/settle", post(sales::settle))
        .route("/customers/{id}/settleAll", post(sales::settle_all))
        .route("/collects", post(collects::collect_new).get(collects::list))
        .route("/loans/{customer_id}", get(loans::get))
        .route("/products", post(products::product_new).get(products::list))
        .route(
            "/products/{id}/price",
            axum::routing::patch(products::update_price),
        )
        .route("/products/{id}/adjust", post(products::adjust_stock))
        .route("/products/{id}", axum::routing::delete(products::remove))
        .route(
            "/customers",
            post(customers::customer_new).get(customers::list),
        )
        .route("/customers/credit", get(customers::credit_list))
        .route(
            "/customers/{id}",
            get(customers::get)
                .patch(customers::rename)
                .delete(customers::remove),
        )
        .route(
            "/deliverymen",
            post(deliverymen::deliveryman_new).get(deliverymen::list),
        )
        .route(
            "/bankAccounts",
            post(bank_accounts::bank_account_new).get(bank_accounts::list),
        )
        .route("/deposits", post(transactions::deposit_new))
        .route("/transactions", get(transactions::list))
        .route(
            "/cashBalance/{deliveryman_id}",
            get(transactions::cash_balance),
        )
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    async fn test_router() -> Router {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        router(ServerState {
            engine: Arc::new(engine),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// POST a body and pull the created id out of the response.
    async fn create(app: &Router, uri: &str, body: Value) -> String {
        let response = app.clone().oneshot(post_json(uri, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn products_round_trip_over_http() {
        let app = test_router().await;

        let id = create(
            &app,
            "/products",
            json!({"name": "Garrafão 20L", "state": "FULL", "price_minor": 1200, "quantity": 10}),
        )
        .await;

        let response = app.clone().oneshot(get_req("/products")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let products = body["products"].as_array().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0]["id"].as_str().unwrap(), id);
        assert_eq!(products[0]["quantity"].as_i64().unwrap(), 10);
    }

    #[tokio::test]
    async fn deleting_an_unknown_product_is_404() {
        let app = test_router().await;

        let uri = format!("/products/{}", uuid::Uuid::new_v4());
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn sale_round_trip_over_http() {
        let app = test_router().await;

        let customer = create(&app, "/customers", json!({"name": "José da Silva"})).await;
        let deliveryman = create(&app, "/deliverymen", json!({"name": "Carlos"})).await;
        create(
            &app,
            "/products",
            json!({"name": "Garrafão 20L", "state": "FULL", "price_minor": 1200, "quantity": 10}),
        )
        .await;

        let sale = create(
            &app,
            "/sales",
            json!({
                "customer_id": customer,
                "deliveryman_id": deliveryman,
                "payment_method": "DINHEIRO",
                "occurred_at": "2026-03-20T10:00:00-03:00",
                "items": [
                    {"product": "Garrafão 20L", "state": "FULL", "quantity": 2, "unit_price_minor": 1200}
                ]
            }),
        )
        .await;

        let response = app
            .clone()
            .oneshot(get_req(&format!("/sales/{sale}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["total_minor"].as_i64().unwrap(), 2400);
        assert_eq!(body["kind"].as_str().unwrap(), "FULL");
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        // The cash from a DINHEIRO sale is now held by the deliveryman.
        let response = app
            .clone()
            .oneshot(get_req(&format!("/cashBalance/{deliveryman}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["balance_minor"].as_i64().unwrap(), 2400);
    }

    #[tokio::test]
    async fn overselling_maps_to_conflict() {
        let app = test_router().await;

        let customer = create(&app, "/customers", json!({"name": "José da Silva"})).await;
        let deliveryman = create(&app, "/deliverymen", json!({"name": "Carlos"})).await;
        create(
            &app,
            "/products",
            json!({"name": "Garrafão 20L", "state": "FULL", "price_minor": 1200, "quantity": 1}),
        )
        .await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/sales",
                json!({
                    "customer_id": customer,
                    "deliveryman_id": deliveryman,
                    "payment_method": "DINHEIRO",
                    "occurred_at": "2026-03-20T10:00:00-03:00",
                    "items": [
                        {"product": "Garrafão 20L", "state": "FULL", "quantity": 5, "unit_price_minor": 1200}
                    ]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn empty_item_lists_map_to_422() {
        let app = test_router().await;

        let customer = create(&app, "/customers", json!({"name": "José da Silva"})).await;
        let deliveryman = create(&app, "/deliverymen", json!({"name": "Carlos"})).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/sales",
                json!({
                    "customer_id": customer,
                    "deliveryman_id": deliveryman,
                    "payment_method": "DINHEIRO",
                    "occurred_at": "2026-03-20T10:00:00-03:00",
                    "items": []
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
