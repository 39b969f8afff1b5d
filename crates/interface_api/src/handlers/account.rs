//! Account handlers

use std::str::FromStr;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use core_kernel::{AccountId, ClientIdentity};
use domain_account::Account;

use crate::dto::account::{AccountRequestDto, AccountResponse};
use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::AppState;

/// Lists every account
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.service.find_all().await?;
    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// Gets an account by store identity
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = AccountId::from_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid account id: {}", id)))?;

    state
        .service
        .find_by_id(id)
        .await?
        .map(|account| Json(account.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Account {} not found", id)))
}

/// Gets an account by account number
pub async fn get_by_account_number(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    state
        .service
        .find_by_account_number(&account_number)
        .await?
        .map(|account| Json(account.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Account {} not found", account_number)))
}

/// Opens an account after the eligibility checks pass
pub async fn create_account(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<AccountRequestDto>,
) -> Result<Response, ApiError> {
    let request = body.into_request(Utc::now().date_naive())?;
    let account = state.service.create(request).await?;
    Ok(created(account))
}

/// Overwrites the account with the body's account number
pub async fn update_by_account_number(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<AccountRequestDto>,
) -> Result<Response, ApiError> {
    let request = body.into_request(Utc::now().date_naive())?;
    let account = state.service.update_by_account_number(request).await?;
    Ok(created(account))
}

/// Counts the accounts a client holds as primary client
pub async fn count_by_client(
    State(state): State<AppState>,
    Path((document_type, document_number)): Path<(String, String)>,
) -> Result<Json<u64>, ApiError> {
    let client = identity(document_type, document_number)?;
    Ok(Json(state.service.count_by_client(&client).await?))
}

/// Counts the accounts a client holds under one product
pub async fn count_by_client_and_product(
    State(state): State<AppState>,
    Path((document_type, document_number, product_code)): Path<(String, String, String)>,
) -> Result<Json<u64>, ApiError> {
    let client = identity(document_type, document_number)?;
    Ok(Json(
        state
            .service
            .count_by_client_and_product(&client, &product_code)
            .await?,
    ))
}

fn identity(document_type: String, document_number: String) -> Result<ClientIdentity, ApiError> {
    ClientIdentity::new(document_type, document_number).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// 201 with a `Location` pointing at the account
fn created(account: Account) -> Response {
    let location = format!("/v1/account/{}", account.id.as_uuid());
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AccountResponse::from(account)),
    )
        .into_response()
}
