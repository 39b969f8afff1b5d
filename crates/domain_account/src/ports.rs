//! Account Domain Ports
//!
//! The account service depends on four collaborators, each behind a port
//! trait so the implementation can be swapped (PostgreSQL, REST registry,
//! in-memory mock):
//!
//! - [`AccountStore`]: persistent account records
//! - [`ClientDirectoryPort`]: identity document to client profile
//! - [`ProductParameterPort`]: product rules per client classification
//! - [`CardRegistryPort`]: cards owned by a client
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_account::{AccountService, ports::*};
//! use std::sync::Arc;
//!
//! let service = AccountService::new(
//!     Arc::new(PostgresAccountStore::new(pool)),
//!     Arc::new(ClientDirectoryClient::new(client_cfg)?),
//!     Arc::new(ProductParameterClient::new(product_cfg)?),
//!     Arc::new(CardRegistryClient::new(card_cfg)?),
//! );
//! ```
//!
//! Adapters are built once at startup and shared; none of them is rebuilt
//! per request.

use async_trait::async_trait;

use core_kernel::{AccountId, ClientIdentity, DomainPort, HealthCheckable, PortError};

use crate::account::Account;
use crate::client::ClientProfile;
use crate::product::{ProductKey, ProductParameter};

/// Persistent store of accounts
///
/// The store owns account-number uniqueness: `save` must fail with
/// `PortError::Conflict` when another account already uses the number.
#[async_trait]
pub trait AccountStore: DomainPort + HealthCheckable {
    /// Retrieves an account by store identity
    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, PortError>;

    /// Retrieves an account by its account number
    async fn get_by_account_number(&self, account_number: &str) -> Result<Option<Account>, PortError>;

    /// Counts accounts whose primary client is `client`
    async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError>;

    /// Counts accounts whose primary client is `client` under `product_code`
    async fn count_by_client_and_product(
        &self,
        client: &ClientIdentity,
        product_code: &str,
    ) -> Result<u64, PortError>;

    /// Inserts or replaces the account with the same id
    async fn save(&self, account: Account) -> Result<Account, PortError>;

    /// Lists every stored account
    async fn list(&self) -> Result<Vec<Account>, PortError>;
}

/// Remote client directory
#[async_trait]
pub trait ClientDirectoryPort: DomainPort + HealthCheckable {
    /// Resolves an identity document into a client profile
    ///
    /// Returns `PortError::NotFound` when the directory has no such client.
    async fn resolve(&self, identity: &ClientIdentity) -> Result<ClientProfile, PortError>;
}

/// Remote product parameter registry
#[async_trait]
pub trait ProductParameterPort: DomainPort + HealthCheckable {
    /// Resolves the rules for a product and client classification
    ///
    /// Returns `PortError::NotFound` when the triple is not configured.
    async fn resolve(&self, key: &ProductKey) -> Result<ProductParameter, PortError>;
}

/// Remote card registry
#[async_trait]
pub trait CardRegistryPort: DomainPort + HealthCheckable {
    /// Counts cards owned by the client
    async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError>;
}

/// In-memory implementations of the account ports for testing
///
/// Every mock counts its calls so tests can assert which collaborators were
/// reached, and can be told to fail with a transient error or to respond
/// after a delay.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Shared knobs for the mocks
    #[derive(Debug, Default)]
    struct Behaviour {
        calls: AtomicUsize,
        failing: AtomicBool,
        delay_ms: AtomicUsize,
    }

    impl Behaviour {
        async fn enter(&self, service: &str) -> Result<(), PortError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay as u64)).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(PortError::unavailable(service));
            }
            Ok(())
        }

        fn health(&self, adapter_id: &str) -> HealthCheckResult {
            let status = if self.failing.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };
            HealthCheckResult::new(adapter_id, status, 0, None)
        }
    }

    macro_rules! behaviour_controls {
        () => {
            /// Makes every subsequent call fail with a transient error
            pub fn fail_with_unavailable(&self) {
                self.behaviour.failing.store(true, Ordering::SeqCst);
            }

            /// Delays every subsequent call
            pub fn respond_after(&self, delay: Duration) {
                self.behaviour
                    .delay_ms
                    .store(delay.as_millis() as usize, Ordering::SeqCst);
            }

            /// Number of calls received so far
            pub fn calls(&self) -> usize {
                self.behaviour.calls.load(Ordering::SeqCst)
            }
        };
    }

    /// In-memory account store enforcing account-number uniqueness
    #[derive(Debug, Default)]
    pub struct InMemoryAccountStore {
        accounts: RwLock<HashMap<AccountId, Account>>,
        saves: AtomicUsize,
        behaviour: Behaviour,
    }

    impl InMemoryAccountStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store
        pub async fn with_accounts(accounts: Vec<Account>) -> Self {
            let store = Self::new();
            {
                let mut map = store.accounts.write().await;
                for account in accounts {
                    map.insert(account.id, account);
                }
            }
            store
        }

        /// Number of successful `save` calls
        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }

        /// Copy of the stored accounts, ordered by id
        pub async fn snapshot(&self) -> Vec<Account> {
            let mut accounts: Vec<_> = self.accounts.read().await.values().cloned().collect();
            accounts.sort_by_key(|a| a.id);
            accounts
        }

        behaviour_controls!();
    }

    impl DomainPort for InMemoryAccountStore {}

    #[async_trait]
    impl HealthCheckable for InMemoryAccountStore {
        async fn health_check(&self) -> HealthCheckResult {
            self.behaviour.health("in-memory-account-store")
        }
    }

    #[async_trait]
    impl AccountStore for InMemoryAccountStore {
        async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, PortError> {
            self.behaviour.enter("account-store").await?;
            Ok(self.accounts.read().await.get(&id).cloned())
        }

        async fn get_by_account_number(&self, account_number: &str) -> Result<Option<Account>, PortError> {
            self.behaviour.enter("account-store").await?;
            Ok(self
                .accounts
                .read()
                .await
                .values()
                .find(|a| a.account_number == account_number)
                .cloned())
        }

        async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError> {
            self.behaviour.enter("account-store").await?;
            Ok(self
                .accounts
                .read()
                .await
                .values()
                .filter(|a| a.client == *client)
                .count() as u64)
        }

        async fn count_by_client_and_product(
            &self,
            client: &ClientIdentity,
            product_code: &str,
        ) -> Result<u64, PortError> {
            self.behaviour.enter("account-store").await?;
            Ok(self
                .accounts
                .read()
                .await
                .values()
                .filter(|a| a.client == *client && a.product_code == product_code)
                .count() as u64)
        }

        async fn save(&self, account: Account) -> Result<Account, PortError> {
            self.behaviour.enter("account-store").await?;
            let mut accounts = self.accounts.write().await;

            let taken = accounts
                .values()
                .any(|a| a.account_number == account.account_number && a.id != account.id);
            if taken {
                return Err(PortError::conflict(format!(
                    "account number {} already exists",
                    account.account_number
                )));
            }

            accounts.insert(account.id, account.clone());
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(account)
        }

        async fn list(&self) -> Result<Vec<Account>, PortError> {
            self.behaviour.enter("account-store").await?;
            Ok(self.snapshot().await)
        }
    }

    /// Client directory backed by a map
    #[derive(Debug, Default)]
    pub struct MockClientDirectory {
        clients: HashMap<ClientIdentity, ClientProfile>,
        behaviour: Behaviour,
    }

    impl MockClientDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_client(mut self, profile: ClientProfile) -> Self {
            self.clients.insert(profile.identity.clone(), profile);
            self
        }

        behaviour_controls!();
    }

    impl DomainPort for MockClientDirectory {}

    #[async_trait]
    impl HealthCheckable for MockClientDirectory {
        async fn health_check(&self) -> HealthCheckResult {
            self.behaviour.health("mock-client-directory")
        }
    }

    #[async_trait]
    impl ClientDirectoryPort for MockClientDirectory {
        async fn resolve(&self, identity: &ClientIdentity) -> Result<ClientProfile, PortError> {
            self.behaviour.enter("client-directory").await?;
            self.clients
                .get(identity)
                .cloned()
                .ok_or_else(|| PortError::not_found("Client", identity))
        }
    }

    /// Product parameter registry backed by a map
    #[derive(Debug, Default)]
    pub struct MockProductParameters {
        parameters: HashMap<ProductKey, ProductParameter>,
        behaviour: Behaviour,
    }

    impl MockProductParameters {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_parameter(mut self, parameter: ProductParameter) -> Self {
            self.parameters.insert(parameter.key.clone(), parameter);
            self
        }

        behaviour_controls!();
    }

    impl DomainPort for MockProductParameters {}

    #[async_trait]
    impl HealthCheckable for MockProductParameters {
        async fn health_check(&self) -> HealthCheckResult {
            self.behaviour.health("mock-product-parameters")
        }
    }

    #[async_trait]
    impl ProductParameterPort for MockProductParameters {
        async fn resolve(&self, key: &ProductKey) -> Result<ProductParameter, PortError> {
            self.behaviour.enter("product-parameter-registry").await?;
            self.parameters
                .get(key)
                .cloned()
                .ok_or_else(|| PortError::not_found("ProductParameter", key))
        }
    }

    /// Card registry backed by a map of card counts
    #[derive(Debug, Default)]
    pub struct MockCardRegistry {
        cards: HashMap<ClientIdentity, u64>,
        behaviour: Behaviour,
    }

    impl MockCardRegistry {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_cards(mut self, client: ClientIdentity, count: u64) -> Self {
            self.cards.insert(client, count);
            self
        }

        behaviour_controls!();
    }

    impl DomainPort for MockCardRegistry {}

    #[async_trait]
    impl HealthCheckable for MockCardRegistry {
        async fn health_check(&self) -> HealthCheckResult {
            self.behaviour.health("mock-card-registry")
        }
    }

    #[async_trait]
    impl CardRegistryPort for MockCardRegistry {
        async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError> {
            self.behaviour.enter("card-registry").await?;
            Ok(self.cards.get(client).copied().unwrap_or(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::account::AccountRequest;

    fn identity(number: &str) -> ClientIdentity {
        ClientIdentity::new("DNI", number).unwrap()
    }

    fn account(number: &str, client: &str, product: &str) -> Account {
        Account::open(AccountRequest {
            product_code: product.to_string(),
            account_number: number.to_string(),
            card_number: "5500000000000004".to_string(),
            card_company: "MASTERCARD".to_string(),
            bank_name: "Banco Central".to_string(),
            available_amount: Decimal::ZERO,
            opening_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            client: identity(client),
            holders: None,
            signers: None,
            active: true,
        })
    }

    #[tokio::test]
    async fn test_store_counts() {
        let store = InMemoryAccountStore::with_accounts(vec![
            account("A-1", "111", "SAV"),
            account("A-2", "111", "CUR"),
            account("A-3", "222", "SAV"),
        ])
        .await;

        assert_eq!(store.count_by_client(&identity("111")).await.unwrap(), 2);
        assert_eq!(
            store.count_by_client_and_product(&identity("111"), "SAV").await.unwrap(),
            1
        );
        assert_eq!(store.count_by_client(&identity("999")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_number_from_other_id() {
        let store = InMemoryAccountStore::new();
        store.save(account("A-1", "111", "SAV")).await.unwrap();

        let err = store.save(account("A-1", "222", "SAV")).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_store_replaces_same_id() {
        let store = InMemoryAccountStore::new();
        let mut stored = store.save(account("A-1", "111", "SAV")).await.unwrap();

        stored.bank_name = "Banco Norte".to_string();
        store.save(stored.clone()).await.unwrap();

        let found = store.get_by_account_number("A-1").await.unwrap().unwrap();
        assert_eq!(found.bank_name, "Banco Norte");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_mock_reports_transient_error() {
        let cards = MockCardRegistry::new().with_cards(identity("111"), 1);
        cards.fail_with_unavailable();

        let err = cards.count_by_client(&identity("111")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(cards.calls(), 1);
        assert!(!cards.health_check().await.is_operational());
    }

    #[tokio::test]
    async fn test_directory_unknown_client_is_not_found() {
        let directory = MockClientDirectory::new();
        let err = directory.resolve(&identity("404")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
