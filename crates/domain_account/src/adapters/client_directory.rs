//! Client directory adapter
//!
//! `GET {base}/{identityDocumentNumber}/{identityDocumentType}`

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use core_kernel::{ClientIdentity, CoreError, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use super::registry::{RegistryConfig, RegistryHttp};
use crate::client::ClientProfile;
use crate::ports::ClientDirectoryPort;

const ADAPTER_ID: &str = "client-directory";

/// Client record as returned by the directory
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClientResponse {
    name: Option<String>,
    last_name: Option<String>,
    business_name: Option<String>,
    email: Option<String>,
    phone_number: Option<String>,
    birthday: Option<NaiveDate>,
    client_type: Option<String>,
    client_profile: Option<String>,
}

impl ClientResponse {
    fn into_profile(self, identity: &ClientIdentity) -> Result<ClientProfile, PortError> {
        let (client_type, client_profile) = match (self.client_type, self.client_profile) {
            (Some(t), Some(p)) => (t, p),
            _ => {
                return Err(PortError::Transformation {
                    message: format!("client {} has no type or profile", identity),
                })
            }
        };

        Ok(ClientProfile {
            identity: identity.clone(),
            client_type,
            client_profile,
            name: self.name,
            last_name: self.last_name,
            business_name: self.business_name,
            email: self.email,
            phone_number: self.phone_number,
            birthday: self.birthday,
        })
    }
}

/// REST client for the client directory service
#[derive(Debug)]
pub struct ClientDirectoryClient {
    http: RegistryHttp,
}

impl ClientDirectoryClient {
    pub fn new(config: RegistryConfig) -> Result<Self, CoreError> {
        Ok(Self {
            http: RegistryHttp::new(ADAPTER_ID, &config)?,
        })
    }
}

impl DomainPort for ClientDirectoryClient {}

#[async_trait]
impl HealthCheckable for ClientDirectoryClient {
    async fn health_check(&self) -> HealthCheckResult {
        self.http.health_check().await
    }
}

#[async_trait]
impl ClientDirectoryPort for ClientDirectoryClient {
    async fn resolve(&self, identity: &ClientIdentity) -> Result<ClientProfile, PortError> {
        let segments = [identity.document_number.as_str(), identity.document_type.as_str()];
        self.http
            .get::<ClientResponse>("resolve", &segments, "Client", identity)
            .await?
            .ok_or_else(|| PortError::not_found("Client", identity))?
            .into_profile(identity)
    }
}
