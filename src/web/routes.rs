use actix_web::middleware::DefaultHeaders;
use actix_web::{guard, web};

use super::errors::ApiError;
use super::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config())
        // Registered first so every path answers a preflight.
        .service(
            web::resource("/{tail:.*}")
                .guard(guard::Options())
                .to(handlers::preflight),
        )
        .route("/health", web::get().to(handlers::health))
        .route("/metrics", web::get().to(handlers::metrics))
        .service(
            web::scope("/api")
                .route("/product", web::get().to(handlers::list_products))
                .route("/product/{id}", web::get().to(handlers::get_product))
                .route("/order", web::post().to(handlers::place_order)),
        );
}

/// Permissive CORS headers on every response.
pub fn cors() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, api_key"))
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, App};
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::actors::{HealthCheckActor, HealthProbe};
    use crate::db::memory::{InMemoryCatalog, InMemoryOrderStore};
    use crate::domain::order::{EngineConfig, OrderPricingEngine};
    use crate::domain::promo::{DiscountEffect, InMemoryPromoValidator, Promotion};
    use crate::metrics::Metrics;
    use crate::web::auth::API_KEY_HEADER;
    use crate::web::AppState;

    const KEY: &str = "test-key";

    fn app_state() -> AppState {
        let catalog = Arc::new(InMemoryCatalog::seeded());
        let store = Arc::new(InMemoryOrderStore::new());
        let promos = Arc::new(InMemoryPromoValidator::new(vec![Promotion::active(
            "SAVE10",
            DiscountEffect::percent(dec!(10)).unwrap(),
        )]));
        let metrics = Arc::new(Metrics::new().unwrap());

        let probes: Vec<Arc<dyn HealthProbe>> = vec![catalog.clone(), store.clone(), promos.clone()];
        let health = HealthCheckActor::new(probes, metrics.clone(), Duration::from_secs(60)).start();

        AppState {
            engine: Arc::new(OrderPricingEngine::new(
                catalog.clone(),
                promos,
                store,
                EngineConfig::default(),
            )),
            catalog,
            metrics,
            health,
            api_key: Arc::from(KEY),
        }
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .wrap(cors())
                    .configure(configure),
            )
            .await
        };
    }

    fn order_request(body: Value) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/order")
            .insert_header((API_KEY_HEADER, KEY))
            .set_json(body)
    }

    #[actix_web::test]
    async fn test_list_products_with_pagination_headers() {
        let app = test_app!(app_state());

        let req = test::TestRequest::get()
            .uri("/api/product?page=2&perPage=3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("X-Total-Count").unwrap(), "7");
        let link = resp.headers().get("Link").unwrap().to_str().unwrap().to_string();
        assert!(link.contains("</api/product?page=3&perPage=3>; rel=\"next\""));
        assert!(link.contains("</api/product?page=3&perPage=3>; rel=\"last\""));

        let body: Vec<Value> = test::read_body_json(resp).await;
        let ids: Vec<&str> = body.iter().map(|p| p["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["21", "30", "31"]);
    }

    #[actix_web::test]
    async fn test_bad_page_query_is_bad_request() {
        let app = test_app!(app_state());

        let req = test::TestRequest::get().uri("/api/product?page=abc").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_get_product() {
        let app = test_app!(app_state());

        let req = test::TestRequest::get().uri("/api/product/10").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "Chicken Waffle");
        assert_eq!(body["price"], "9.99");

        let req = test::TestRequest::get().uri("/api/product/999").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not_found");
    }

    #[actix_web::test]
    async fn test_place_order_requires_api_key() {
        let app = test_app!(app_state());

        let req = test::TestRequest::post()
            .uri("/api/order")
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unauthorized");
    }

    #[actix_web::test]
    async fn test_place_order_with_coupon() {
        let state = app_state();
        let metrics = state.metrics.clone();
        let app = test_app!(state);

        let req = order_request(json!({
            "couponCode": "SAVE10",
            "items": [{"productId": "10", "quantity": 1}, {"productId": "10", "quantity": 1}]
        }))
        .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["pricing"]["subtotal"], "19.98");
        assert_eq!(body["pricing"]["discount"], "2.00");
        assert_eq!(body["pricing"]["total"], "17.98");
        assert_eq!(body["pricing"]["couponCode"], "SAVE10");
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["products"].as_array().unwrap().len(), 1);
        assert!(!body["id"].as_str().unwrap().is_empty());

        assert_eq!(metrics.orders_placed.get(), 1);
    }

    #[actix_web::test]
    async fn test_order_failures_map_to_statuses() {
        let state = app_state();
        let metrics = state.metrics.clone();
        let app = test_app!(state);

        let cases = [
            (
                json!({"items": [{"productId": "10", "quantity": 0}]}),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                json!({"items": []}),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                json!({"items": [{"productId": "999", "quantity": 1}]}),
                StatusCode::NOT_FOUND,
                "product_not_found",
            ),
            (
                json!({"couponCode": "NOPE", "items": [{"productId": "10", "quantity": 1}]}),
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_promo_code",
            ),
        ];

        for (payload, status, kind) in cases {
            let req = order_request(payload).to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), status);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], kind);
        }

        assert_eq!(metrics.orders_placed.get(), 0);
        assert_eq!(
            metrics.order_failures.with_label_values(&["validation_error"]).get(),
            2
        );
    }

    #[actix_web::test]
    async fn test_malformed_order_body() {
        let app = test_app!(app_state());

        let req = test::TestRequest::post()
            .uri("/api/order")
            .insert_header((API_KEY_HEADER, KEY))
            .set_payload(r#"{"items": "lots"}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "bad_request");
    }

    #[actix_web::test]
    async fn test_preflight_and_cors_headers() {
        let app = test_app!(app_state());

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/order")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), "*");
    }

    #[actix_web::test]
    async fn test_health_and_metrics() {
        let app = test_app!(app_state());
        tokio::time::sleep(Duration::from_millis(50)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["overallStatus"]["status"], "healthy");

        let req = test::TestRequest::get().uri("/metrics").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let text = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(text.contains("component_health_status{component=\"catalog\"} 2"));
    }
}
