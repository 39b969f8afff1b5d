//! Account aggregate
//!
//! An account is opened by [`AccountService::create`](crate::services::AccountService::create)
//! once every eligibility rule holds, and afterwards only changes through a
//! full overwrite keyed by its account number. Accounts are never deleted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{AccountId, ClientIdentity};

/// A financial account held by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Store identity, generated when the account is opened
    pub id: AccountId,
    /// Product the account was opened under
    pub product_code: String,
    /// Globally unique account number
    pub account_number: String,
    /// Card linked to the account
    pub card_number: String,
    /// Issuer of the linked card
    pub card_company: String,
    /// Bank holding the account
    pub bank_name: String,
    /// Balance available for operations
    pub available_amount: Decimal,
    /// Date the account was opened
    pub opening_date: NaiveDate,
    /// Primary client
    pub client: ClientIdentity,
    /// Co-owners besides the primary client
    pub holders: Vec<ClientIdentity>,
    /// People authorized to operate the account
    pub signers: Vec<ClientIdentity>,
    /// Whether the account is active
    pub active: bool,
}

/// Payload for opening an account or overwriting an existing one
///
/// Holder and signer lists are optional; an absent list is treated exactly
/// like an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRequest {
    pub product_code: String,
    pub account_number: String,
    pub card_number: String,
    pub card_company: String,
    pub bank_name: String,
    pub available_amount: Decimal,
    pub opening_date: NaiveDate,
    pub client: ClientIdentity,
    pub holders: Option<Vec<ClientIdentity>>,
    pub signers: Option<Vec<ClientIdentity>>,
    pub active: bool,
}

impl AccountRequest {
    /// Number of holders supplied, zero when the list is absent
    pub fn holder_count(&self) -> usize {
        self.holders.as_ref().map_or(0, Vec::len)
    }

    /// Number of signers supplied, zero when the list is absent
    pub fn signer_count(&self) -> usize {
        self.signers.as_ref().map_or(0, Vec::len)
    }
}

impl Account {
    /// Opens a new account from a request, generating its identity
    pub fn open(request: AccountRequest) -> Self {
        Self::with_id(AccountId::new_v7(), request)
    }

    /// Builds an account with a known identity
    pub fn with_id(id: AccountId, request: AccountRequest) -> Self {
        Self {
            id,
            product_code: request.product_code,
            account_number: request.account_number,
            card_number: request.card_number,
            card_company: request.card_company,
            bank_name: request.bank_name,
            available_amount: request.available_amount,
            opening_date: request.opening_date,
            client: request.client,
            holders: request.holders.unwrap_or_default(),
            signers: request.signers.unwrap_or_default(),
            active: request.active,
        }
    }

    /// Overwrites every field with the update's values, keeping the identity
    ///
    /// The overwrite is unconditional: an absent holder or signer list in the
    /// update clears the stored list.
    pub fn apply_update(&mut self, update: AccountRequest) {
        *self = Self::with_id(self.id, update);
    }
}
