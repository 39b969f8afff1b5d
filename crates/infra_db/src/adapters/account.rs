//! PostgreSQL Account Store
//!
//! Implements the `AccountStore` port over [`AccountRepository`].
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresAccountStore;
//! use domain_account::AccountStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn AccountStore> = Arc::new(PostgresAccountStore::new(pool));
//! let count = store.count_by_client(&client).await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AccountId, AdapterHealth, ClientIdentity, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
use domain_account::{Account, AccountStore};

use crate::repositories::account::{
    AccountRecord, AccountRepository, NewAccount, NewParticipant, ParticipantRole,
};

const ADAPTER_ID: &str = "postgres-account-store";

/// PostgreSQL-backed implementation of the AccountStore port
///
/// Database errors are translated to `PortError`; a unique violation on the
/// account number surfaces as `PortError::Conflict`.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    repository: AccountRepository,
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AccountRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &AccountRepository {
        &self.repository
    }
}

impl DomainPort for PostgresAccountStore {}

#[async_trait]
impl HealthCheckable for PostgresAccountStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::new(ADAPTER_ID, AdapterHealth::Healthy, latency_ms, None),
            Err(e) => HealthCheckResult::new(
                ADAPTER_ID,
                AdapterHealth::Unhealthy,
                latency_ms,
                Some(format!("Database error: {}", e)),
            ),
        }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    #[instrument(skip(self), fields(account_id = %id))]
    async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, PortError> {
        let record = self.repository.get_by_id(*id.as_uuid()).await?;
        record.map(record_to_account).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_account_number(&self, account_number: &str) -> Result<Option<Account>, PortError> {
        let record = self.repository.get_by_account_number(account_number).await?;
        record.map(record_to_account).transpose()
    }

    async fn count_by_client(&self, client: &ClientIdentity) -> Result<u64, PortError> {
        let count = self
            .repository
            .count_by_client(&client.document_type, &client.document_number)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn count_by_client_and_product(
        &self,
        client: &ClientIdentity,
        product_code: &str,
    ) -> Result<u64, PortError> {
        let count = self
            .repository
            .count_by_client_and_product(&client.document_type, &client.document_number, product_code)
            .await?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self, account), fields(account_id = %account.id, account_number = %account.account_number))]
    async fn save(&self, account: Account) -> Result<Account, PortError> {
        debug!("Upserting account");
        self.repository.upsert(&account_to_row(&account)).await?;
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>, PortError> {
        self.repository
            .list()
            .await?
            .into_iter()
            .map(record_to_account)
            .collect()
    }
}

fn account_to_row(account: &Account) -> NewAccount {
    let participants = participants(ParticipantRole::Holder, &account.holders)
        .chain(participants(ParticipantRole::Signer, &account.signers))
        .collect();

    NewAccount {
        account_id: *account.id.as_uuid(),
        product_code: account.product_code.clone(),
        account_number: account.account_number.clone(),
        card_number: account.card_number.clone(),
        card_company: account.card_company.clone(),
        bank_name: account.bank_name.clone(),
        available_amount: account.available_amount,
        opening_date: account.opening_date,
        client_document_type: account.client.document_type.clone(),
        client_document_number: account.client.document_number.clone(),
        active: account.active,
        participants,
    }
}

fn participants(
    role: ParticipantRole,
    identities: &[ClientIdentity],
) -> impl Iterator<Item = NewParticipant> + '_ {
    identities.iter().enumerate().map(move |(position, identity)| NewParticipant {
        role,
        position: position as i32,
        document_type: identity.document_type.clone(),
        document_number: identity.document_number.clone(),
    })
}

fn record_to_account(record: AccountRecord) -> Result<Account, PortError> {
    let row = record.account;
    let mut holders = Vec::new();
    let mut signers = Vec::new();

    let mut participants = record.participants;
    participants.sort_by_key(|p| p.position);
    for participant in participants {
        let identity = ClientIdentity {
            document_type: participant.document_type,
            document_number: participant.document_number,
        };
        match participant.role {
            ParticipantRole::Holder => holders.push(identity),
            ParticipantRole::Signer => signers.push(identity),
        }
    }

    if row.client_document_type.is_empty() || row.client_document_number.is_empty() {
        return Err(PortError::Transformation {
            message: format!("account {} has a blank client identity", row.account_number),
        });
    }

    Ok(Account {
        id: AccountId::from_uuid(row.account_id),
        product_code: row.product_code,
        account_number: row.account_number,
        card_number: row.card_number,
        card_company: row.card_company,
        bank_name: row.bank_name,
        available_amount: row.available_amount,
        opening_date: row.opening_date,
        client: ClientIdentity {
            document_type: row.client_document_type,
            document_number: row.client_document_number,
        },
        holders,
        signers,
        active: row.active,
    })
}
