//! Card registry adapter
//!
//! `GET {base}/countCardByClient/{identityDocumentType}/{identityDocumentNumber}`
//! answers with a bare JSON integer.

use async_trait::async_trait;

use core_kernel::{ClientIdentity, CoreError, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use super::registry::{RegistryConfig, RegistryHttp};
use crate::ports::CardRegistryPort;

const ADAPTER_ID: &str = "card-registry";

/// REST client for the card registry
#[derive(Debug)]
pub struct CardRegistryClient {
    http: RegistryHttp,
}

impl CardRegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self, CoreError> {
        Ok(Self {
            http: RegistryHttp::new(ADAPTER_ID, &config)?,
        })
    }
}

impl DomainPort for CardRegistryClient {}

#[async_trait]
impl HealthCheckable for CardRegistryClient {
    async fn health_check(&self) -> HealthCheckResult {
        self.http.health_check().await
    }
}

#[async_trait]
impl CardRegistryPort for CardRegistryClient {
    async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError> {
        let segments = [
            "countCardByClient",
            client.document_type.as_str(),
            client.document_number.as_str(),
        ];
        self.http
            .get::<u64>("count_by_client", &segments, "CardCount", client)
            .await?
            .ok_or_else(|| PortError::Transformation {
                message: format!("empty card count for client {}", client),
            })
    }
}
