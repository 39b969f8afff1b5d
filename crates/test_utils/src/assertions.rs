//! Custom Test Assertions
//!
//! Provides assertion helpers for account results that give more
//! meaningful failure messages than `matches!` alone.

use domain_account::{Account, AccountError, AccountRequest, ErrorClass};

/// Asserts that the result is a business-rule rejection with the given code
///
/// # Panics
///
/// Panics if the result is `Ok`, an operational failure, or a different rejection
pub fn assert_rejected<T: std::fmt::Debug>(result: &Result<T, AccountError>, expected_code: &str) {
    match result {
        Ok(value) => panic!("Expected rejection '{}', got Ok({:?})", expected_code, value),
        Err(error) => {
            assert_eq!(
                error.class(),
                ErrorClass::BusinessRule,
                "Expected a business-rule rejection, got operational failure: {}",
                error
            );
            assert_eq!(
                error.code(),
                expected_code,
                "Expected rejection '{}', got '{}' ({})",
                expected_code,
                error.code(),
                error
            );
        }
    }
}

/// Asserts that the result is a retryable dependency failure
pub fn assert_transient<T: std::fmt::Debug>(result: &Result<T, AccountError>) {
    match result {
        Ok(value) => panic!("Expected transient failure, got Ok({:?})", value),
        Err(error) => assert!(
            error.is_retryable(),
            "Expected transient failure, got business rejection: {}",
            error
        ),
    }
}

/// Asserts that every request field was carried onto the account
pub fn assert_account_matches_request(account: &Account, request: &AccountRequest) {
    assert_eq!(account.product_code, request.product_code, "product code");
    assert_eq!(account.account_number, request.account_number, "account number");
    assert_eq!(account.card_number, request.card_number, "card number");
    assert_eq!(account.card_company, request.card_company, "card company");
    assert_eq!(account.bank_name, request.bank_name, "bank name");
    assert_eq!(account.available_amount, request.available_amount, "available amount");
    assert_eq!(account.opening_date, request.opening_date, "opening date");
    assert_eq!(account.client, request.client, "client");
    assert_eq!(
        account.holders,
        request.holders.clone().unwrap_or_default(),
        "holders"
    );
    assert_eq!(
        account.signers,
        request.signers.clone().unwrap_or_default(),
        "signers"
    );
    assert_eq!(account.active, request.active, "active");
}
