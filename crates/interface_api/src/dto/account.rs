//! Account DTOs
//!
//! The JSON shape is camelCase; holders and signers travel as `holder` and
//! `signer` arrays of client identities.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{AccountId, ClientIdentity};
use domain_account::{Account, AccountRequest};

use crate::error::ApiError;

fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Identity document of a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub identity_document_type: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub identity_document_number: String,
}

impl ClientDto {
    fn into_identity(self) -> Result<ClientIdentity, ApiError> {
        ClientIdentity::new(self.identity_document_type, self.identity_document_number)
            .map_err(|e| ApiError::Validation(vec![e.to_string()]))
    }
}

impl From<ClientIdentity> for ClientDto {
    fn from(identity: ClientIdentity) -> Self {
        Self {
            identity_document_type: identity.document_type,
            identity_document_number: identity.document_number,
        }
    }
}

/// Body of `POST /v1/account` and `PUT /v1/account/updateByAccountNumber`
///
/// Missing text fields deserialize as empty strings so they surface as
/// validation errors rather than parse errors.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequestDto {
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub product_code: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub account_number: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub card_number: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub card_company: String,
    #[serde(default)]
    #[validate(custom(function = "non_blank"))]
    pub bank_name: String,
    /// Defaults to zero
    pub amount_available: Option<Decimal>,
    /// `yyyy-MM-dd`; defaults to the current UTC date
    pub opening_date: Option<NaiveDate>,
    #[validate(required, nested)]
    pub client: Option<ClientDto>,
    #[validate(nested)]
    pub holder: Option<Vec<ClientDto>>,
    #[validate(nested)]
    pub signer: Option<Vec<ClientDto>>,
    /// Defaults to true
    pub active: Option<bool>,
}

impl AccountRequestDto {
    /// Converts a validated body into the domain request
    pub fn into_request(self, today: NaiveDate) -> Result<AccountRequest, ApiError> {
        let client = self
            .client
            .ok_or_else(|| ApiError::Validation(vec!["client: required".to_string()]))?
            .into_identity()?;

        Ok(AccountRequest {
            product_code: self.product_code.trim().to_string(),
            account_number: self.account_number.trim().to_string(),
            card_number: self.card_number,
            card_company: self.card_company,
            bank_name: self.bank_name,
            available_amount: self.amount_available.unwrap_or(Decimal::ZERO),
            opening_date: self.opening_date.unwrap_or(today),
            client,
            holders: identities(self.holder)?,
            signers: identities(self.signer)?,
            active: self.active.unwrap_or(true),
        })
    }
}

fn identities(list: Option<Vec<ClientDto>>) -> Result<Option<Vec<ClientIdentity>>, ApiError> {
    list.map(|dtos| dtos.into_iter().map(ClientDto::into_identity).collect())
        .transpose()
}

/// Account as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub product_code: String,
    pub account_number: String,
    pub card_number: String,
    pub card_company: String,
    pub bank_name: String,
    pub amount_available: Decimal,
    pub opening_date: NaiveDate,
    pub client: ClientDto,
    pub holder: Vec<ClientDto>,
    pub signer: Vec<ClientDto>,
    pub active: bool,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            product_code: account.product_code,
            account_number: account.account_number,
            card_number: account.card_number,
            card_company: account.card_company,
            bank_name: account.bank_name,
            amount_available: account.available_amount,
            opening_date: account.opening_date,
            client: account.client.into(),
            holder: account.holders.into_iter().map(ClientDto::from).collect(),
            signer: account.signers.into_iter().map(ClientDto::from).collect(),
            active: account.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn body() -> serde_json::Value {
        json!({
            "productCode": "PX",
            "accountNumber": "191-0000001",
            "cardNumber": "4111111111111111",
            "cardCompany": "VISA",
            "bankName": "Banco Central",
            "client": {
                "identityDocumentType": "DNI",
                "identityDocumentNumber": "10000001"
            }
        })
    }

    #[test]
    fn test_absent_optionals_take_defaults() {
        let dto: AccountRequestDto = serde_json::from_value(body()).unwrap();
        dto.validate().unwrap();

        let request = dto.into_request(today()).unwrap();
        assert_eq!(request.available_amount, Decimal::ZERO);
        assert_eq!(request.opening_date, today());
        assert!(request.active);
        assert!(request.holders.is_none());
        assert!(request.signers.is_none());
    }

    #[test]
    fn test_lists_and_date_are_read() {
        let mut value = body();
        value["openingDate"] = json!("2023-01-15");
        value["amountAvailable"] = json!("250.75");
        value["active"] = json!(false);
        value["holder"] = json!([
            {"identityDocumentType": "DNI", "identityDocumentNumber": "30000001"}
        ]);
        value["signer"] = json!([]);

        let dto: AccountRequestDto = serde_json::from_value(value).unwrap();
        let request = dto.into_request(today()).unwrap();

        assert_eq!(request.opening_date, NaiveDate::from_ymd_opt(2023, 1, 15).unwrap());
        assert_eq!(request.available_amount, Decimal::new(25075, 2));
        assert!(!request.active);
        assert_eq!(request.holder_count(), 1);
        assert_eq!(request.signers, Some(vec![]));
    }

    #[test]
    fn test_blank_fields_fail_validation() {
        let mut value = body();
        value["bankName"] = json!("   ");
        value.as_object_mut().unwrap().remove("cardNumber");

        let dto: AccountRequestDto = serde_json::from_value(value).unwrap();
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("bank_name"));
        assert!(fields.contains_key("card_number"));
    }

    #[test]
    fn test_missing_client_fails_validation() {
        let mut value = body();
        value.as_object_mut().unwrap().remove("client");

        let dto: AccountRequestDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_holder_identity_fails_validation() {
        let mut value = body();
        value["holder"] = json!([
            {"identityDocumentType": "DNI", "identityDocumentNumber": ""}
        ]);

        let dto: AccountRequestDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_response_uses_camel_case() {
        let dto: AccountRequestDto = serde_json::from_value(body()).unwrap();
        let account = Account::open(dto.into_request(today()).unwrap());

        let value = serde_json::to_value(AccountResponse::from(account)).unwrap();
        assert_eq!(value["accountNumber"], "191-0000001");
        assert_eq!(value["openingDate"], "2024-05-20");
        assert_eq!(value["client"]["identityDocumentNumber"], "10000001");
        assert_eq!(value["holder"], json!([]));
    }
}
