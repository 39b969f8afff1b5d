//! Router tests over in-memory ports

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use core_kernel::HealthCheckable;
use interface_api::dto::account::AccountResponse;
use interface_api::{create_router, AppState};
use test_utils::{
    AccountRequestBuilder, IdentityFixtures, ProductParameterBuilder, ServiceHarness,
    ServiceHarnessBuilder, StringFixtures,
};

fn app(harness: &ServiceHarness) -> Router {
    let health: Vec<Arc<dyn HealthCheckable>> = vec![
        harness.store.clone() as Arc<dyn HealthCheckable>,
        harness.clients.clone() as Arc<dyn HealthCheckable>,
        harness.cards.clone() as Arc<dyn HealthCheckable>,
    ];
    create_router(AppState::new(harness.service.clone(), health))
}

async fn send(app: Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

fn account_body(account_number: &str) -> Value {
    json!({
        "productCode": "PX",
        "accountNumber": account_number,
        "cardNumber": StringFixtures::card_number(),
        "cardCompany": StringFixtures::card_company(),
        "bankName": StringFixtures::bank_name(),
        "amountAvailable": "100.00",
        "openingDate": "2024-03-01",
        "client": {
            "identityDocumentType": "DNI",
            "identityDocumentNumber": "10000001"
        }
    })
}

async fn savings_harness(max_product: u64) -> ServiceHarness {
    ServiceHarnessBuilder::new()
        .with_parameter(ProductParameterBuilder::new().max_product(max_product).build())
        .build()
        .await
}

// ============= CREATE =============
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_returns_created_with_location() {
        let harness = savings_harness(1).await;

        let (status, headers, body) =
            send(app(&harness), Method::POST, "/v1/account", Some(account_body("191-1"))).await;

        assert_eq!(status, StatusCode::CREATED);
        let account: AccountResponse = serde_json::from_value(body).unwrap();
        let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, format!("/v1/account/{}", account.id.as_uuid()));
        assert_eq!(account.account_number, "191-1");
        assert!(account.active);
        assert_eq!(harness.store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_limit_reached_is_unprocessable() {
        let harness = savings_harness(1).await;
        send(app(&harness), Method::POST, "/v1/account", Some(account_body("191-1"))).await;

        let (status, _, body) =
            send(app(&harness), Method::POST, "/v1/account", Some(account_body("191-2"))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "max_accounts_exceeded");
        assert_eq!(body["class"], "business_rule");
    }

    #[tokio::test]
    async fn test_unknown_client_is_not_found() {
        let harness = ServiceHarnessBuilder::empty()
            .with_parameter(ProductParameterBuilder::new().build())
            .build()
            .await;

        let (status, _, body) =
            send(app(&harness), Method::POST, "/v1/account", Some(account_body("191-1"))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "client_not_found");
    }

    #[tokio::test]
    async fn test_registry_outage_is_service_unavailable() {
        let harness = savings_harness(1).await;
        harness.clients.fail_with_unavailable();

        let (status, _, body) =
            send(app(&harness), Method::POST, "/v1/account", Some(account_body("191-1"))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["class"], "operational");
        assert_eq!(harness.store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected_before_the_core() {
        let harness = savings_harness(1).await;
        let mut body = account_body("191-1");
        body["bankName"] = json!(" ");
        body["client"]["identityDocumentNumber"] = json!("");

        let (status, _, response) = send(app(&harness), Method::POST, "/v1/account", Some(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["error"], "validation_error");
        let details = response["details"].as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(harness.clients.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let harness = savings_harness(1).await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/account")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"productCode\":"))
            .unwrap();

        let response = app(&harness).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ============= UPDATE AND QUERIES =============
mod query_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_overwrites_existing_account() {
        let existing = AccountRequestBuilder::new().with_signers(2).build_account();
        let harness = ServiceHarnessBuilder::new().with_account(existing.clone()).build().await;

        let mut body = account_body(&existing.account_number);
        body["bankName"] = json!("Banco Norte");
        body["active"] = json!(false);

        let (status, headers, response) =
            send(app(&harness), Method::PUT, "/v1/account/updateByAccountNumber", Some(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(headers.contains_key(header::LOCATION));
        let account: AccountResponse = serde_json::from_value(response).unwrap();
        assert_eq!(account.id, existing.id);
        assert_eq!(account.bank_name, "Banco Norte");
        assert!(!account.active);
        assert!(account.signer.is_empty());
    }

    #[tokio::test]
    async fn test_update_of_unknown_number_is_not_found() {
        let harness = savings_harness(1).await;

        let (status, _, body) = send(
            app(&harness),
            Method::PUT,
            "/v1/account/updateByAccountNumber",
            Some(account_body("999-9")),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "account_not_found");
    }

    #[tokio::test]
    async fn test_lookups() {
        let account = AccountRequestBuilder::new().build_account();
        let harness = ServiceHarnessBuilder::new().with_account(account.clone()).build().await;

        let (status, _, body) = send(app(&harness), Method::GET, "/v1/account", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let path = format!("/v1/account/{}", account.id.as_uuid());
        let (status, _, body) = send(app(&harness), Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["accountNumber"], account.account_number);

        let path = format!("/v1/account/getByAccountNumber/{}", account.account_number);
        let (status, _, _) = send(app(&harness), Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) =
            send(app(&harness), Method::GET, "/v1/account/getByAccountNumber/000-0", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(app(&harness), Method::GET, "/v1/account/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_counts() {
        let primary = IdentityFixtures::primary_client();
        let harness = ServiceHarnessBuilder::new()
            .with_account(AccountRequestBuilder::new().with_account_number("191-1").build_account())
            .with_account(
                AccountRequestBuilder::new()
                    .with_account_number("191-2")
                    .with_product_code("CC")
                    .build_account(),
            )
            .build()
            .await;

        let path = format!(
            "/v1/account/countAccountByClient/{}/{}",
            primary.document_type, primary.document_number
        );
        let (status, _, body) = send(app(&harness), Method::GET, &path, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!(2));

        let path = format!(
            "/v1/account/countAccountByClientAndProduct/{}/{}/CC",
            primary.document_type, primary.document_number
        );
        let (_, _, body) = send(app(&harness), Method::GET, &path, None).await;
        assert_eq!(body, json!(1));

        let (_, _, body) =
            send(app(&harness), Method::GET, "/v1/account/countAccountByClient/DNI/20000002", None).await;
        assert_eq!(body, json!(0));
    }
}

// ============= HEALTH =============
mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let harness = savings_harness(1).await;
        let (status, headers, body) = send(app(&harness), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert!(headers.contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_readiness_reports_unhealthy_adapter() {
        let harness = savings_harness(1).await;

        let (status, _, body) = send(app(&harness), Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"].as_array().unwrap().len(), 3);

        harness.cards.fail_with_unavailable();
        let (status, _, body) = send(app(&harness), Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not_ready");
    }
}
