//! Product parameter registry adapter
//!
//! `GET {base}/getByCodeAndTypeAndProfile/{code}/{clientType}/{clientProfile}`

use async_trait::async_trait;
use serde::Deserialize;

use core_kernel::{CoreError, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use super::registry::{RegistryConfig, RegistryHttp};
use crate::ports::ProductParameterPort;
use crate::product::{ProductKey, ProductParameter};

const ADAPTER_ID: &str = "product-parameter-registry";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductParameterResponse {
    max_product: Option<u64>,
    minimum_holder: Option<u32>,
    minimum_signer: Option<u32>,
    account_required: Option<bool>,
    card_required: Option<bool>,
}

impl ProductParameterResponse {
    /// Absent minimums count as zero and absent flags as not required;
    /// a parameter without `maxProduct` cannot be evaluated.
    fn into_parameter(self, key: &ProductKey) -> Result<ProductParameter, PortError> {
        let max_product = self.max_product.ok_or_else(|| PortError::Transformation {
            message: format!("product parameter {} has no maxProduct", key),
        })?;

        Ok(ProductParameter {
            key: key.clone(),
            max_product,
            minimum_holder: self.minimum_holder.unwrap_or(0),
            minimum_signer: self.minimum_signer.unwrap_or(0),
            account_required: self.account_required.unwrap_or(false),
            card_required: self.card_required.unwrap_or(false),
        })
    }
}

/// REST client for the product parameter registry
#[derive(Debug)]
pub struct ProductParameterClient {
    http: RegistryHttp,
}

impl ProductParameterClient {
    pub fn new(config: RegistryConfig) -> Result<Self, CoreError> {
        Ok(Self {
            http: RegistryHttp::new(ADAPTER_ID, &config)?,
        })
    }
}

impl DomainPort for ProductParameterClient {}

#[async_trait]
impl HealthCheckable for ProductParameterClient {
    async fn health_check(&self) -> HealthCheckResult {
        self.http.health_check().await
    }
}

#[async_trait]
impl ProductParameterPort for ProductParameterClient {
    async fn resolve(&self, key: &ProductKey) -> Result<ProductParameter, PortError> {
        let segments = [
            "getByCodeAndTypeAndProfile",
            key.product_code.as_str(),
            key.client_type.as_str(),
            key.client_profile.as_str(),
        ];
        self.http
            .get::<ProductParameterResponse>("resolve", &segments, "ProductParameter", key)
            .await?
            .ok_or_else(|| PortError::not_found("ProductParameter", key))?
            .into_parameter(key)
    }
}
