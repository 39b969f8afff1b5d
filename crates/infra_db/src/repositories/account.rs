//! Account repository implementation
//!
//! Accounts live in `accounts`; their holders and signers live in
//! `account_participants`, one row per identity, ordered by `position`.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DatabaseError;

const ACCOUNT_COLUMNS: &str = r#"
    account_id, product_code, account_number, card_number, card_company,
    bank_name, available_amount, opening_date, client_document_type,
    client_document_number, active, created_at, updated_at
"#;

/// Repository for account rows and their participants
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, account_id: Uuid) -> Result<Option<AccountRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE account_id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_one(row).await
    }

    pub async fn get_by_account_number(
        &self,
        account_number: &str,
    ) -> Result<Option<AccountRecord>, DatabaseError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts WHERE account_number = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        self.attach_one(row).await
    }

    /// Lists every account, oldest first
    pub async fn list(&self) -> Result<Vec<AccountRecord>, DatabaseError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {} FROM accounts ORDER BY created_at, account_id",
            ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.account_id).collect();
        let mut participants = self.participants_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|account| {
                let participants = participants.remove(&account.account_id).unwrap_or_default();
                AccountRecord { account, participants }
            })
            .collect())
    }

    pub async fn count_by_client(
        &self,
        document_type: &str,
        document_number: &str,
    ) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM accounts
            WHERE client_document_type = $1 AND client_document_number = $2
            "#,
        )
        .bind(document_type)
        .bind(document_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn count_by_client_and_product(
        &self,
        document_type: &str,
        document_number: &str,
        product_code: &str,
    ) -> Result<i64, DatabaseError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM accounts
            WHERE client_document_type = $1
              AND client_document_number = $2
              AND product_code = $3
            "#,
        )
        .bind(document_type)
        .bind(document_number)
        .bind(product_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Inserts the account or replaces the row with the same id
    ///
    /// The participant rows are rewritten in the same transaction. A different
    /// account already holding the number fails with `DuplicateEntry`.
    pub async fn upsert(&self, account: &NewAccount) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id, product_code, account_number, card_number, card_company,
                bank_name, available_amount, opening_date, client_document_type,
                client_document_number, active
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (account_id) DO UPDATE SET
                product_code = EXCLUDED.product_code,
                account_number = EXCLUDED.account_number,
                card_number = EXCLUDED.card_number,
                card_company = EXCLUDED.card_company,
                bank_name = EXCLUDED.bank_name,
                available_amount = EXCLUDED.available_amount,
                opening_date = EXCLUDED.opening_date,
                client_document_type = EXCLUDED.client_document_type,
                client_document_number = EXCLUDED.client_document_number,
                active = EXCLUDED.active,
                updated_at = now()
            "#,
        )
        .bind(account.account_id)
        .bind(&account.product_code)
        .bind(&account.account_number)
        .bind(&account.card_number)
        .bind(&account.card_company)
        .bind(&account.bank_name)
        .bind(account.available_amount)
        .bind(account.opening_date)
        .bind(&account.client_document_type)
        .bind(&account.client_document_number)
        .bind(account.active)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM account_participants WHERE account_id = $1")
            .bind(account.account_id)
            .execute(&mut *tx)
            .await?;

        for participant in &account.participants {
            sqlx::query(
                r#"
                INSERT INTO account_participants (
                    account_id, role, position, document_type, document_number
                ) VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(account.account_id)
            .bind(participant.role)
            .bind(participant.position)
            .bind(&participant.document_type)
            .bind(&participant.document_number)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn attach_one(&self, row: Option<AccountRow>) -> Result<Option<AccountRecord>, DatabaseError> {
        let Some(account) = row else {
            return Ok(None);
        };
        let participants = self
            .participants_for(&[account.account_id])
            .await?
            .remove(&account.account_id)
            .unwrap_or_default();
        Ok(Some(AccountRecord { account, participants }))
    }

    async fn participants_for(
        &self,
        account_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ParticipantRow>>, DatabaseError> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT account_id, role, position, document_type, document_number
            FROM account_participants
            WHERE account_id = ANY($1)
            ORDER BY account_id, role, position
            "#,
        )
        .bind(account_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<ParticipantRow>> = HashMap::new();
        for row in rows {
            grouped.entry(row.account_id).or_default().push(row);
        }
        Ok(grouped)
    }
}

/// Participant role on an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "participant_role", rename_all = "snake_case")]
pub enum ParticipantRole {
    /// Co-owner besides the primary client
    Holder,
    /// Authorized to operate the account
    Signer,
}

/// Database row for an account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub account_id: Uuid,
    pub product_code: String,
    pub account_number: String,
    pub card_number: String,
    pub card_company: String,
    pub bank_name: String,
    pub available_amount: Decimal,
    pub opening_date: NaiveDate,
    pub client_document_type: String,
    pub client_document_number: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a holder or signer
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub account_id: Uuid,
    pub role: ParticipantRole,
    pub position: i32,
    pub document_type: String,
    pub document_number: String,
}

/// An account row with its participants
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub account: AccountRow,
    pub participants: Vec<ParticipantRow>,
}

/// Data for inserting or replacing an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_id: Uuid,
    pub product_code: String,
    pub account_number: String,
    pub card_number: String,
    pub card_company: String,
    pub bank_name: String,
    pub available_amount: Decimal,
    pub opening_date: NaiveDate,
    pub client_document_type: String,
    pub client_document_number: String,
    pub active: bool,
    pub participants: Vec<NewParticipant>,
}

/// Data for one participant row
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub role: ParticipantRole,
    pub position: i32,
    pub document_type: String,
    pub document_number: String,
}
