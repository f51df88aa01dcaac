//! HTTP integration tests
//!
//! Each test boots the real router over the in-memory gateway, so the
//! full path (JSON extraction, validation, executor, envelope, status
//! mapping) is exercised without a MySQL instance. The rate-limited
//! login route is tested through a plain router because the governor
//! layer needs peer socket addresses that `TestServer` does not provide.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{routing::post, Router};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    use crate::auth::legacy::legacy_digest;
    use crate::error::GatewayError;
    use crate::handlers;
    use crate::report_router;
    use crate::test_utils::{sale_row, user_row, InMemoryGateway};
    use crate::AppState;

    fn server(gateway: Arc<InMemoryGateway>) -> TestServer {
        TestServer::new(report_router(AppState::new(gateway))).unwrap()
    }

    fn login_server(gateway: Arc<InMemoryGateway>) -> TestServer {
        let router = Router::new()
            .route("/auth/login", post(handlers::login))
            .with_state(AppState::new(gateway));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let server = server(Arc::new(InMemoryGateway::new()));

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn unknown_category_is_rejected_without_touching_the_gateway() {
        let gateway = Arc::new(InMemoryGateway::new());
        let server = server(gateway.clone());

        let response = server
            .post("/reports/sales")
            .json(&json!({"category": "no_such_report"}))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["data"][0]["kind"], "unknown_category");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn successful_report_gets_a_full_envelope() {
        let rows = vec![sale_row(json!({
            "hour": 9, "total_sales": 120.5, "transaction_count": 4,
        }))];
        let gateway = Arc::new(InMemoryGateway::new().with_rows(rows));
        let server = server(gateway);

        let response = server
            .post("/reports/sales")
            .json(&json!({"category": "today_hourly"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Sales report generated successfully.");
        assert_eq!(body["data"][0]["hour"], 9);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn inverted_date_range_is_a_validation_failure() {
        let gateway = Arc::new(InMemoryGateway::new());
        let server = server(gateway.clone());

        let response = server
            .post("/reports/sales")
            .json(&json!({
                "category": "rep",
                "fromdate": "2024-07-01",
                "todate": "2024-06-01",
            }))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["data"][0]["kind"], "invalid_range");
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn low_stock_passes_the_threshold_through() {
        let rows = vec![
            sale_row(json!({"id": 1, "description": "Cola", "stock_quantity": 3})),
            sale_row(json!({"id": 2, "description": "Juice", "stock_quantity": 7})),
        ];
        let gateway = Arc::new(InMemoryGateway::new().with_rows(rows));
        let server = server(gateway.clone());

        let response = server
            .post("/reports/inventory")
            .json(&json!({"category": "low_stock", "threshold": 8}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        let (sql, binds) = gateway.calls().remove(0);
        assert!(sql.contains("stock_quantity < ?"));
        assert_eq!(binds, vec![crate::domain::ports::BindValue::Int(8)]);
    }

    #[tokio::test]
    async fn gateway_failure_is_a_generic_execution_envelope() {
        let gateway = Arc::new(
            InMemoryGateway::new()
                .with_error(GatewayError::QueryFailed("table is gone".to_string())),
        );
        let server = server(gateway);

        let response = server
            .post("/reports/customers")
            .json(&json!({"category": "customer_list"}))
            .await;

        response.assert_status_internal_server_error();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "report could not be generated");
        // Underlying detail is logged, never echoed to the client.
        assert!(!body["message"].as_str().unwrap().contains("table is gone"));
    }

    #[tokio::test]
    async fn repeated_requests_agree_modulo_timestamp() {
        let row = sale_row(json!({"total_customers": 12, "total_receivables": 88.5}));
        let gateway = Arc::new(
            InMemoryGateway::new()
                .with_rows(vec![row.clone()])
                .with_rows(vec![row]),
        );
        let server = server(gateway);

        let body = json!({"category": "overview"});
        let first: Value = server.post("/reports/customers").json(&body).await.json();
        let second: Value = server.post("/reports/customers").json(&body).await.json();

        assert_eq!(first["success"], second["success"]);
        assert_eq!(first["data"], second["data"]);
        assert_eq!(first["message"], second["message"]);
    }

    #[tokio::test]
    async fn login_round_trip_returns_the_legacy_shape() {
        let gateway = Arc::new(InMemoryGateway::new().with_rows(vec![user_row(
            "clerk@example.com",
            &legacy_digest("correct-horse"),
        )]));
        let server = login_server(gateway);

        let response = server
            .post("/auth/login")
            .json(&json!({"email": "clerk@example.com", "password": "correct-horse"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["issuccess"], "True");
        assert_eq!(body["success"], 1);
        assert_eq!(body["userid"], 7);
        assert_eq!(body["loccode"], "HQ");
        assert_eq!(body["message"], "You have successfully logged in.");
    }

    #[tokio::test]
    async fn login_with_unknown_email_keeps_the_legacy_message() {
        let server = login_server(Arc::new(InMemoryGateway::new()));

        let response = server
            .post("/auth/login")
            .json(&json!({"email": "nobody@example.com", "password": "whatever"}))
            .await;

        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid Email Address!");
    }
}
