//! Account domain services
//!
//! [`AccountService`] orchestrates account creation across the client
//! directory, the product parameter registry, the card registry, and the
//! account store. It owns no state of its own beyond the port handles.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use core_kernel::{AccountId, ClientIdentity, PortError};

use crate::account::{Account, AccountRequest};
use crate::client::ClientProfile;
use crate::eligibility::{
    count_sufficient, max_accounts_not_exceeded, prerequisite_satisfied, EligibilityCheck,
    EligibilityReport,
};
use crate::error::{AccountError, ErrorClass};
use crate::ports::{AccountStore, CardRegistryPort, ClientDirectoryPort, ProductParameterPort};
use crate::product::{ProductKey, ProductParameter};

/// Service for opening, updating, and querying accounts
///
/// # Creation
///
/// [`create`](Self::create) resolves the client, then the product rules for
/// the client's classification, then evaluates all five eligibility checks
/// concurrently. Every check runs to completion before the verdict is taken,
/// and the verdict always reports the first failing check in
/// [`EligibilityCheck::PRIORITY`] order. The account is saved only when every
/// check passes.
///
/// # Example
///
/// ```rust,ignore
/// let service = AccountService::new(store, directory, products, cards);
/// match service.create(request).await {
///     Ok(account) => println!("opened {}", account.id),
///     Err(e) if e.is_retryable() => println!("try again later: {}", e),
///     Err(e) => println!("rejected: {}", e),
/// }
/// ```
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    clients: Arc<dyn ClientDirectoryPort>,
    products: Arc<dyn ProductParameterPort>,
    cards: Arc<dyn CardRegistryPort>,
}

impl AccountService {
    /// Creates a new account service over the given ports
    pub fn new(
        store: Arc<dyn AccountStore>,
        clients: Arc<dyn ClientDirectoryPort>,
        products: Arc<dyn ProductParameterPort>,
        cards: Arc<dyn CardRegistryPort>,
    ) -> Self {
        Self {
            store,
            clients,
            products,
            cards,
        }
    }

    /// Opens a new account if the client is eligible for the product
    ///
    /// # Errors
    ///
    /// - `ClientNotFound` / `ProductNotConfigured` when resolution fails
    /// - one of the eligibility rejections, highest priority first
    /// - `DuplicateAccountNumber` when the store rejects the number
    /// - `TransientRemoteFailure` when any dependency fails
    #[instrument(
        skip(self, request),
        fields(
            client = %request.client,
            product_code = %request.product_code,
            account_number = %request.account_number
        )
    )]
    pub async fn create(&self, request: AccountRequest) -> Result<Account, AccountError> {
        let result = self.try_create(request).await;
        match &result {
            Ok(account) => info!(account_id = %account.id, "Account created"),
            Err(e) => log_failure("create", e),
        }
        result
    }

    async fn try_create(&self, request: AccountRequest) -> Result<Account, AccountError> {
        let profile = self.resolve_client(&request.client).await?;
        let parameter = self.resolve_product(&request.product_code, &profile).await?;

        let report = self.evaluate(&request, &parameter).await?;
        debug!(?report, "Eligibility evaluated");
        report.verdict(&parameter)?;

        self.persist(Account::open(request), "save_account").await
    }

    /// Runs the five checks concurrently and waits for all of them
    ///
    /// An error from any check fails the whole evaluation; the outcomes of the
    /// others are discarded.
    async fn evaluate(
        &self,
        request: &AccountRequest,
        parameter: &ProductParameter,
    ) -> Result<EligibilityReport, AccountError> {
        let client = &request.client;

        let (max_accounts, holders, signers, account_prerequisite, card_prerequisite) = tokio::join!(
            self.check_max_accounts(client, &request.product_code, parameter.max_product),
            async { Ok::<_, AccountError>(count_sufficient(request.holder_count(), parameter.minimum_holder)) },
            async { Ok::<_, AccountError>(count_sufficient(request.signer_count(), parameter.minimum_signer)) },
            self.check_account_prerequisite(client, parameter.account_required),
            self.check_card_prerequisite(client, parameter.card_required),
        );

        Ok(EligibilityReport {
            max_accounts: max_accounts?,
            holders: holders?,
            signers: signers?,
            account_prerequisite: account_prerequisite?,
            card_prerequisite: card_prerequisite?,
        })
    }

    async fn check_max_accounts(
        &self,
        client: &ClientIdentity,
        product_code: &str,
        max_product: u64,
    ) -> Result<bool, AccountError> {
        let existing = self
            .store
            .count_by_client_and_product(client, product_code)
            .await
            .map_err(|e| AccountError::transient(EligibilityCheck::MaxAccounts.name(), e))?;
        Ok(max_accounts_not_exceeded(existing, max_product))
    }

    async fn check_account_prerequisite(
        &self,
        client: &ClientIdentity,
        required: bool,
    ) -> Result<bool, AccountError> {
        if !required {
            return Ok(true);
        }
        let owned = self
            .store
            .count_by_client(client)
            .await
            .map_err(|e| AccountError::transient(EligibilityCheck::AccountPrerequisite.name(), e))?;
        Ok(prerequisite_satisfied(required, owned))
    }

    async fn check_card_prerequisite(
        &self,
        client: &ClientIdentity,
        required: bool,
    ) -> Result<bool, AccountError> {
        if !required {
            return Ok(true);
        }
        let owned = self
            .cards
            .count_by_client(client)
            .await
            .map_err(|e| AccountError::transient(EligibilityCheck::CardPrerequisite.name(), e))?;
        Ok(prerequisite_satisfied(required, owned))
    }

    async fn resolve_client(&self, identity: &ClientIdentity) -> Result<ClientProfile, AccountError> {
        self.clients.resolve(identity).await.map_err(|e| {
            if e.is_not_found() {
                AccountError::ClientNotFound(identity.clone())
            } else {
                AccountError::transient("resolve_client", e)
            }
        })
    }

    async fn resolve_product(
        &self,
        product_code: &str,
        profile: &ClientProfile,
    ) -> Result<ProductParameter, AccountError> {
        let key = ProductKey::new(product_code, &profile.client_type, &profile.client_profile);
        self.products.resolve(&key).await.map_err(|e| {
            if e.is_not_found() {
                AccountError::ProductNotConfigured(key.clone())
            } else {
                AccountError::transient("resolve_product", e)
            }
        })
    }

    async fn persist(&self, account: Account, operation: &str) -> Result<Account, AccountError> {
        let account_number = account.account_number.clone();
        self.store.save(account).await.map_err(|e| {
            if e.is_conflict() {
                AccountError::DuplicateAccountNumber(account_number)
            } else {
                AccountError::transient(operation, e)
            }
        })
    }

    /// Overwrites the account with the same account number
    ///
    /// Every field except the identity is replaced by the update's value.
    #[instrument(skip(self, update), fields(account_number = %update.account_number))]
    pub async fn update_by_account_number(&self, update: AccountRequest) -> Result<Account, AccountError> {
        let result = self.try_update(update).await;
        match &result {
            Ok(account) => info!(account_id = %account.id, "Account updated"),
            Err(e) => log_failure("update_by_account_number", e),
        }
        result
    }

    async fn try_update(&self, update: AccountRequest) -> Result<Account, AccountError> {
        let mut account = self
            .store
            .get_by_account_number(&update.account_number)
            .await
            .map_err(|e| AccountError::transient("get_account", e))?
            .ok_or_else(|| AccountError::AccountNotFound(update.account_number.clone()))?;

        account.apply_update(update);
        self.persist(account, "update_account").await
    }

    /// Lists every account
    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Account>, AccountError> {
        self.store
            .list()
            .await
            .map_err(|e| AccountError::transient("list_accounts", e))
    }

    /// Looks up an account by store identity
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AccountError> {
        self.store
            .get_by_id(id)
            .await
            .map_err(|e| AccountError::transient("get_account", e))
    }

    /// Looks up an account by account number
    #[instrument(skip(self))]
    pub async fn find_by_account_number(&self, account_number: &str) -> Result<Option<Account>, AccountError> {
        self.store
            .get_by_account_number(account_number)
            .await
            .map_err(|e| AccountError::transient("get_account", e))
    }

    /// Counts accounts whose primary client is `client`
    #[instrument(skip(self), fields(client = %client))]
    pub async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, AccountError> {
        self.store
            .count_by_client(client)
            .await
            .map_err(|e| AccountError::transient("count_accounts", e))
    }

    /// Counts accounts whose primary client is `client` under `product_code`
    #[instrument(skip(self), fields(client = %client))]
    pub async fn count_by_client_and_product(
        &self,
        client: &ClientIdentity,
        product_code: &str,
    ) -> Result<u64, AccountError> {
        self.store
            .count_by_client_and_product(client, product_code)
            .await
            .map_err(|e| AccountError::transient("count_accounts", e))
    }
}

fn log_failure(operation: &str, error: &AccountError) {
    match error {
        AccountError::TransientRemoteFailure { source, .. } => error!(
            operation,
            code = error.code(),
            class = ErrorClass::Operational.as_str(),
            cause = port_error_kind(source),
            "Dependency failure: {}",
            error
        ),
        _ => warn!(
            operation,
            code = error.code(),
            class = error.class().as_str(),
            "Request rejected: {}",
            error
        ),
    }
}

fn port_error_kind(error: &PortError) -> &'static str {
    match error {
        PortError::NotFound { .. } => "not_found",
        PortError::Validation { .. } => "validation",
        PortError::Conflict { .. } => "conflict",
        PortError::Connection { .. } => "connection",
        PortError::Timeout { .. } => "timeout",
        PortError::ServiceUnavailable { .. } => "unavailable",
        PortError::Transformation { .. } => "transformation",
        PortError::Internal { .. } => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn identity(number: &str) -> ClientIdentity {
        ClientIdentity::new("DNI", number).unwrap()
    }

    fn request() -> AccountRequest {
        AccountRequest {
            product_code: "PX".to_string(),
            account_number: "191-000001".to_string(),
            card_number: "4111111111111111".to_string(),
            card_company: "VISA".to_string(),
            bank_name: "Banco Central".to_string(),
            available_amount: Decimal::ZERO,
            opening_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            client: identity("10000001"),
            holders: None,
            signers: None,
            active: true,
        }
    }

    fn parameter() -> ProductParameter {
        ProductParameter {
            key: ProductKey::new("PX", "PERSONAL", "STANDARD"),
            max_product: 1,
            minimum_holder: 0,
            minimum_signer: 0,
            account_required: false,
            card_required: true,
        }
    }

    #[tokio::test]
    async fn test_required_card_missing_is_rejected() {
        let store = Arc::new(InMemoryAccountStore::new());
        let cards = Arc::new(MockCardRegistry::new());
        let service = AccountService::new(
            store.clone(),
            Arc::new(MockClientDirectory::new().with_client(ClientProfile::new(
                identity("10000001"),
                "PERSONAL",
                "STANDARD",
            ))),
            Arc::new(MockProductParameters::new().with_parameter(parameter())),
            cards.clone(),
        );

        let err = service.create(request()).await.unwrap_err();

        assert!(matches!(err, AccountError::CardPrerequisiteMissing));
        assert_eq!(cards.calls(), 1);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_port_error_kind() {
        assert_eq!(port_error_kind(&PortError::unavailable("x")), "unavailable");
        assert_eq!(port_error_kind(&PortError::conflict("x")), "conflict");
    }
}
