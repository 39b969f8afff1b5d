//! Account domain errors
//!
//! Every failed call surfaces exactly one of these. Business-rule rejections
//! are caused by the request itself and are final; operational failures come
//! from a dependency and may succeed if the caller retries.

use thiserror::Error;

use core_kernel::{ClientIdentity, PortError};

use crate::product::ProductKey;

/// Errors returned by the account service
#[derive(Debug, Error)]
pub enum AccountError {
    /// The client directory has no client with this identity
    #[error("Client not found: {0}")]
    ClientNotFound(ClientIdentity),

    /// No product parameter exists for the product and client classification
    #[error("Product not configured for client type: {0}")]
    ProductNotConfigured(ProductKey),

    /// The client already holds the maximum accounts of this product
    #[error("Max. accounts reached for product {product_code} (limit {max_product})")]
    MaxAccountsExceeded {
        product_code: String,
        max_product: u64,
    },

    /// Fewer holders than the product requires
    #[error("{required} holder(s) required")]
    InsufficientHolders { required: u32 },

    /// Fewer signers than the product requires
    #[error("{required} signer(s) required")]
    InsufficientSigners { required: u32 },

    /// The product requires the client to already own an account
    #[error("An existing account is required for this product")]
    AccountPrerequisiteMissing,

    /// The product requires the client to already own a card
    #[error("An existing card is required for this product")]
    CardPrerequisiteMissing,

    /// No account with this number exists
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// The store already holds another account with this number
    #[error("Duplicate account number: {0}")]
    DuplicateAccountNumber(String),

    /// A registry or the store failed; the caller may retry
    #[error("Transient failure during {operation}: {source}")]
    TransientRemoteFailure {
        operation: String,
        #[source]
        source: PortError,
    },
}

/// Coarse classification used to separate monitoring signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejection caused by the request or the client's situation
    BusinessRule,
    /// Failure of a dependency
    Operational,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::BusinessRule => "business_rule",
            ErrorClass::Operational => "operational",
        }
    }
}

impl AccountError {
    /// Creates a TransientRemoteFailure for the named operation
    pub fn transient(operation: impl Into<String>, source: PortError) -> Self {
        AccountError::TransientRemoteFailure {
            operation: operation.into(),
            source,
        }
    }

    /// Classifies the error for logging and metrics
    pub fn class(&self) -> ErrorClass {
        match self {
            AccountError::TransientRemoteFailure { .. } => ErrorClass::Operational,
            _ => ErrorClass::BusinessRule,
        }
    }

    /// Returns true if retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Operational
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::ClientNotFound(_) => "client_not_found",
            AccountError::ProductNotConfigured(_) => "product_not_configured",
            AccountError::MaxAccountsExceeded { .. } => "max_accounts_exceeded",
            AccountError::InsufficientHolders { .. } => "insufficient_holders",
            AccountError::InsufficientSigners { .. } => "insufficient_signers",
            AccountError::AccountPrerequisiteMissing => "account_prerequisite_missing",
            AccountError::CardPrerequisiteMissing => "card_prerequisite_missing",
            AccountError::AccountNotFound(_) => "account_not_found",
            AccountError::DuplicateAccountNumber(_) => "duplicate_account_number",
            AccountError::TransientRemoteFailure { .. } => "transient_remote_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(AccountError::CardPrerequisiteMissing.class(), ErrorClass::BusinessRule);
        assert_eq!(
            AccountError::DuplicateAccountNumber("001".into()).class(),
            ErrorClass::BusinessRule
        );

        let transient = AccountError::transient("count_cards", PortError::unavailable("card-registry"));
        assert_eq!(transient.class(), ErrorClass::Operational);
        assert!(transient.is_retryable());
        assert!(transient.to_string().contains("count_cards"));
    }

    #[test]
    fn test_holder_message_carries_minimum() {
        let error = AccountError::InsufficientHolders { required: 2 };
        assert_eq!(error.to_string(), "2 holder(s) required");
        assert_eq!(error.code(), "insufficient_holders");
    }
}
