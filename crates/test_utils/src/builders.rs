//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use std::sync::Arc;

use chrono::NaiveDate;
use core_kernel::ClientIdentity;
use domain_account::{
    Account, AccountRequest, AccountService, ClientProfile, InMemoryAccountStore, MockCardRegistry,
    MockClientDirectory, MockProductParameters, ProductKey, ProductParameter,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::{ClientFixtures, IdentityFixtures, ProductFixtures, StringFixtures, TemporalFixtures};

/// Builder for account creation and update requests
#[derive(Debug, Clone)]
pub struct AccountRequestBuilder {
    request: AccountRequest,
}

impl Default for AccountRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRequestBuilder {
    /// Savings request for the primary client with no holders or signers
    pub fn new() -> Self {
        Self {
            request: AccountRequest {
                product_code: ProductFixtures::SAVINGS.to_string(),
                account_number: StringFixtures::account_number().to_string(),
                card_number: StringFixtures::card_number().to_string(),
                card_company: StringFixtures::card_company().to_string(),
                bank_name: StringFixtures::bank_name().to_string(),
                available_amount: dec!(250.00),
                opening_date: TemporalFixtures::opening_date(),
                client: IdentityFixtures::primary_client(),
                holders: None,
                signers: None,
                active: true,
            },
        }
    }

    pub fn with_product_code(mut self, code: impl Into<String>) -> Self {
        self.request.product_code = code.into();
        self
    }

    pub fn with_account_number(mut self, number: impl Into<String>) -> Self {
        self.request.account_number = number.into();
        self
    }

    pub fn with_client(mut self, client: ClientIdentity) -> Self {
        self.request.client = client;
        self
    }

    pub fn with_bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.request.bank_name = bank_name.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.request.available_amount = amount;
        self
    }

    pub fn with_opening_date(mut self, date: NaiveDate) -> Self {
        self.request.opening_date = date;
        self
    }

    /// Adds `count` distinct holders
    pub fn with_holders(mut self, count: u32) -> Self {
        self.request.holders = Some((1..=count).map(IdentityFixtures::holder).collect());
        self
    }

    /// Adds `count` distinct signers
    pub fn with_signers(mut self, count: u32) -> Self {
        self.request.signers = Some((1..=count).map(IdentityFixtures::signer).collect());
        self
    }

    /// Supplies empty (rather than absent) holder and signer lists
    pub fn with_empty_lists(mut self) -> Self {
        self.request.holders = Some(Vec::new());
        self.request.signers = Some(Vec::new());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.request.active = false;
        self
    }

    pub fn build(self) -> AccountRequest {
        self.request
    }

    /// Builds a stored account directly, bypassing eligibility
    pub fn build_account(self) -> Account {
        Account::open(self.request)
    }
}

/// Builder for product parameters
///
/// Defaults to a permissive rule set: one account allowed, no holders or
/// signers required, no prerequisites.
#[derive(Debug, Clone)]
pub struct ProductParameterBuilder {
    parameter: ProductParameter,
}

impl Default for ProductParameterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductParameterBuilder {
    pub fn new() -> Self {
        Self::for_key(ProductFixtures::savings_key())
    }

    pub fn for_key(key: ProductKey) -> Self {
        Self {
            parameter: ProductParameter {
                key,
                max_product: 1,
                minimum_holder: 0,
                minimum_signer: 0,
                account_required: false,
                card_required: false,
            },
        }
    }

    pub fn max_product(mut self, max: u64) -> Self {
        self.parameter.max_product = max;
        self
    }

    pub fn minimum_holder(mut self, minimum: u32) -> Self {
        self.parameter.minimum_holder = minimum;
        self
    }

    pub fn minimum_signer(mut self, minimum: u32) -> Self {
        self.parameter.minimum_signer = minimum;
        self
    }

    pub fn account_required(mut self) -> Self {
        self.parameter.account_required = true;
        self
    }

    pub fn card_required(mut self) -> Self {
        self.parameter.card_required = true;
        self
    }

    pub fn build(self) -> ProductParameter {
        self.parameter
    }
}

/// An [`AccountService`] wired to in-memory ports, with handles kept for
/// inspection
pub struct ServiceHarness {
    pub service: AccountService,
    pub store: Arc<InMemoryAccountStore>,
    pub clients: Arc<MockClientDirectory>,
    pub products: Arc<MockProductParameters>,
    pub cards: Arc<MockCardRegistry>,
}

/// Builder for [`ServiceHarness`]
pub struct ServiceHarnessBuilder {
    accounts: Vec<Account>,
    clients: MockClientDirectory,
    products: MockProductParameters,
    cards: MockCardRegistry,
}

impl Default for ServiceHarnessBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceHarnessBuilder {
    /// Starts with the personal/standard primary client registered
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
            clients: MockClientDirectory::new().with_client(ClientFixtures::personal_standard()),
            products: MockProductParameters::new(),
            cards: MockCardRegistry::new(),
        }
    }

    /// Starts with no clients registered
    pub fn empty() -> Self {
        Self {
            clients: MockClientDirectory::new(),
            ..Self::new()
        }
    }

    pub fn with_client(mut self, profile: ClientProfile) -> Self {
        self.clients = self.clients.with_client(profile);
        self
    }

    pub fn with_parameter(mut self, parameter: ProductParameter) -> Self {
        self.products = self.products.with_parameter(parameter);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    pub fn with_cards(mut self, client: ClientIdentity, count: u64) -> Self {
        self.cards = self.cards.with_cards(client, count);
        self
    }

    pub async fn build(self) -> ServiceHarness {
        let store = Arc::new(InMemoryAccountStore::with_accounts(self.accounts).await);
        let clients = Arc::new(self.clients);
        let products = Arc::new(self.products);
        let cards = Arc::new(self.cards);

        let service = AccountService::new(store.clone(), clients.clone(), products.clone(), cards.clone());

        ServiceHarness {
            service,
            store,
            clients,
            products,
            cards,
        }
    }
}
