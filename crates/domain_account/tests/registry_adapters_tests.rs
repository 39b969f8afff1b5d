//! Tests for the REST registry adapters against a local axum server

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use core_kernel::{AdapterHealth, CircuitBreakerConfig, HealthCheckable, PortError};
use domain_account::{
    AccountError, AccountService, CardRegistryClient, CardRegistryPort, ClientDirectoryClient,
    ClientDirectoryPort, InMemoryAccountStore, ProductParameterClient, ProductParameterPort,
    RegistryConfig,
};
use test_utils::{AccountRequestBuilder, IdentityFixtures, ProductFixtures};

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn client_handler(
    State(hits): State<Hits>,
    Path((number, kind)): Path<(String, String)>,
) -> Response {
    hits.0.fetch_add(1, Ordering::SeqCst);
    match (number.as_str(), kind.as_str()) {
        ("10000001", "DNI") => Json(json!({
            "identityDocumentType": "DNI",
            "identityDocumentNumber": "10000001",
            "name": "Ana",
            "lastName": "Quispe",
            "birthday": "1990-07-14",
            "clientType": "PERSONAL",
            "clientProfile": "STANDARD"
        }))
        .into_response(),
        ("50000005", _) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        ("60000006", _) => StatusCode::OK.into_response(),
        ("70000007", _) => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            StatusCode::OK.into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn product_handler(Path((code, kind, profile)): Path<(String, String, String)>) -> Response {
    match (code.as_str(), kind.as_str(), profile.as_str()) {
        ("PX", "PERSONAL", "STANDARD") => Json(json!({
            "productCode": "PX",
            "maxProduct": 1,
            "minimumHolder": 0,
            "minimumSigner": 0,
            "accountRequired": false,
            "cardRequired": true
        }))
        .into_response(),
        _ => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn card_handler(Path((kind, number)): Path<(String, String)>) -> Response {
    match (kind.as_str(), number.as_str()) {
        ("DNI", "10000001") => Json(json!(2)).into_response(),
        _ => Json(json!(0)).into_response(),
    }
}

async fn spawn_registries(hits: Hits) -> String {
    let router = Router::new()
        .route("/v1/client/:number/:kind", get(client_handler))
        .route(
            "/v1/productParameter/getByCodeAndTypeAndProfile/:code/:kind/:profile",
            get(product_handler),
        )
        .route("/v1/card/countCardByClient/:kind/:number", get(card_handler))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base: &str, path: &str) -> RegistryConfig {
    RegistryConfig {
        base_url: format!("{}{}", base, path),
        timeout_secs: 1,
        circuit_breaker: None,
    }
}

// ============= CLIENT DIRECTORY =============
mod client_directory_tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_profile() {
        let base = spawn_registries(Hits::default()).await;
        let directory = ClientDirectoryClient::new(config(&base, "/v1/client")).unwrap();

        let profile = directory.resolve(&IdentityFixtures::primary_client()).await.unwrap();

        assert_eq!(profile.client_type, "PERSONAL");
        assert_eq!(profile.client_profile, "STANDARD");
        assert_eq!(profile.last_name.as_deref(), Some("Quispe"));
        assert_eq!(profile.identity, IdentityFixtures::primary_client());
    }

    #[tokio::test]
    async fn test_unknown_client_is_not_found() {
        let base = spawn_registries(Hits::default()).await;
        let directory = ClientDirectoryClient::new(config(&base, "/v1/client")).unwrap();

        let err = directory.resolve(&IdentityFixtures::dni("99999999")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_empty_body_is_not_found() {
        let base = spawn_registries(Hits::default()).await;
        let directory = ClientDirectoryClient::new(config(&base, "/v1/client")).unwrap();

        let err = directory.resolve(&IdentityFixtures::dni("60000006")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let base = spawn_registries(Hits::default()).await;
        let directory = ClientDirectoryClient::new(config(&base, "/v1/client")).unwrap();

        let err = directory.resolve(&IdentityFixtures::dni("50000005")).await.unwrap_err();
        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_slow_directory_times_out() {
        let base = spawn_registries(Hits::default()).await;
        let directory = ClientDirectoryClient::new(config(&base, "/v1/client")).unwrap();

        let err = directory.resolve(&IdentityFixtures::dni("70000007")).await.unwrap_err();
        assert!(matches!(err, PortError::Timeout { duration_ms: 1000, .. }));
    }

    #[tokio::test]
    async fn test_circuit_opens_after_repeated_failures() {
        let hits = Hits::default();
        let base = spawn_registries(hits.clone()).await;
        let directory = ClientDirectoryClient::new(RegistryConfig {
            circuit_breaker: Some(CircuitBreakerConfig {
                failure_threshold: 2,
                reset_timeout_secs: 60,
                success_threshold: 1,
            }),
            ..config(&base, "/v1/client")
        })
        .unwrap();
        let failing = IdentityFixtures::dni("50000005");

        for _ in 0..3 {
            let err = directory.resolve(&failing).await.unwrap_err();
            assert!(err.is_transient());
        }

        assert_eq!(hits.count(), 2);
        assert_eq!(directory.health_check().await.status, AdapterHealth::Degraded);
    }

    #[tokio::test]
    async fn test_not_found_does_not_trip_circuit() {
        let hits = Hits::default();
        let base = spawn_registries(hits.clone()).await;
        let directory = ClientDirectoryClient::new(RegistryConfig {
            circuit_breaker: Some(CircuitBreakerConfig {
                failure_threshold: 1,
                reset_timeout_secs: 60,
                success_threshold: 1,
            }),
            ..config(&base, "/v1/client")
        })
        .unwrap();

        for _ in 0..3 {
            let err = directory.resolve(&IdentityFixtures::dni("99999999")).await.unwrap_err();
            assert!(err.is_not_found());
        }
        assert_eq!(hits.count(), 3);
    }
}

// ============= PRODUCT PARAMETERS AND CARDS =============
mod registry_tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_product_parameter() {
        let base = spawn_registries(Hits::default()).await;
        let products = ProductParameterClient::new(config(&base, "/v1/productParameter")).unwrap();

        let parameter = products.resolve(&ProductFixtures::savings_key()).await.unwrap();

        assert_eq!(parameter.max_product, 1);
        assert!(parameter.card_required);
        assert!(!parameter.account_required);
    }

    #[tokio::test]
    async fn test_unconfigured_product_is_not_found() {
        let base = spawn_registries(Hits::default()).await;
        let products = ProductParameterClient::new(config(&base, "/v1/productParameter")).unwrap();
        let key = domain_account::ProductKey::new("PX", "BUSINESS", "VIP");

        assert!(products.resolve(&key).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_counts_cards() {
        let base = spawn_registries(Hits::default()).await;
        let cards = CardRegistryClient::new(config(&base, "/v1/card")).unwrap();

        assert_eq!(cards.count_by_client(&IdentityFixtures::primary_client()).await.unwrap(), 2);
        assert_eq!(cards.count_by_client(&IdentityFixtures::other_client()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_check_reports_reachability() {
        let base = spawn_registries(Hits::default()).await;
        let cards = CardRegistryClient::new(config(&base, "/v1/card")).unwrap();
        assert_eq!(cards.health_check().await.status, AdapterHealth::Healthy);

        // nothing listens on port 9
        let unreachable = CardRegistryClient::new(config("http://127.0.0.1:9", "/v1/card")).unwrap();
        assert_eq!(unreachable.health_check().await.status, AdapterHealth::Unhealthy);
    }
}

// ============= END TO END =============
mod service_over_http_tests {
    use super::*;

    fn service(base: &str) -> AccountService {
        AccountService::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(ClientDirectoryClient::new(config(base, "/v1/client")).unwrap()),
            Arc::new(ProductParameterClient::new(config(base, "/v1/productParameter")).unwrap()),
            Arc::new(CardRegistryClient::new(config(base, "/v1/card")).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_create_over_http() {
        let base = spawn_registries(Hits::default()).await;
        let service = service(&base);

        let account = service.create(AccountRequestBuilder::new().build()).await.unwrap();
        assert_eq!(account.product_code, ProductFixtures::SAVINGS);

        // second savings account exceeds maxProduct=1
        let second = service
            .create(AccountRequestBuilder::new().with_account_number("191-0000002").build())
            .await;
        assert!(matches!(second, Err(AccountError::MaxAccountsExceeded { max_product: 1, .. })));
    }

    #[tokio::test]
    async fn test_unknown_client_over_http() {
        let base = spawn_registries(Hits::default()).await;
        let service = service(&base);

        let result = service
            .create(AccountRequestBuilder::new().with_client(IdentityFixtures::dni("99999999")).build())
            .await;
        assert!(matches!(result, Err(AccountError::ClientNotFound(_))));
    }
}
