//! Product eligibility parameters

use serde::{Deserialize, Serialize};

/// Key identifying the rule set that applies to a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub product_code: String,
    pub client_type: String,
    pub client_profile: String,
}

impl ProductKey {
    pub fn new(
        product_code: impl Into<String>,
        client_type: impl Into<String>,
        client_profile: impl Into<String>,
    ) -> Self {
        Self {
            product_code: product_code.into(),
            client_type: client_type.into(),
            client_profile: client_profile.into(),
        }
    }
}

impl std::fmt::Display for ProductKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.product_code, self.client_type, self.client_profile)
    }
}

/// Eligibility rules for one (product code, client type, client profile)
///
/// Owned by the external product parameter registry; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductParameter {
    pub key: ProductKey,
    /// Maximum accounts of this product a client may hold
    pub max_product: u64,
    /// Minimum number of holders the request must name
    pub minimum_holder: u32,
    /// Minimum number of signers the request must name
    pub minimum_signer: u32,
    /// Client must already own at least one account
    pub account_required: bool,
    /// Client must already own at least one card
    pub card_required: bool,
}
