//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating account test data that
//! respects the shapes the service accepts.

use core_kernel::ClientIdentity;
use domain_account::{AccountRequest, EligibilityReport, ProductParameter};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::builders::AccountRequestBuilder;
use crate::fixtures::{IdentityFixtures, ProductFixtures};

/// Strategy for identity documents of common types
pub fn identity_strategy() -> impl Strategy<Value = ClientIdentity> {
    (prop_oneof![Just("DNI"), Just("CEX"), Just("RUC")], "[0-9]{8}").prop_map(|(kind, number)| {
        ClientIdentity {
            document_type: kind.to_string(),
            document_number: number,
        }
    })
}

/// Strategy for optional identity lists, including absent and empty
pub fn identity_list_strategy(max_len: usize) -> impl Strategy<Value = Option<Vec<ClientIdentity>>> {
    prop::option::of(prop::collection::vec(identity_strategy(), 0..=max_len))
}

/// Strategy for non-negative amounts with two decimal places
pub fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for savings requests of the primary client with varied lists
pub fn account_request_strategy() -> impl Strategy<Value = AccountRequest> {
    (
        identity_list_strategy(4),
        identity_list_strategy(4),
        amount_strategy(),
        "[0-9]{3}-[0-9]{7}",
        any::<bool>(),
    )
        .prop_map(|(holders, signers, amount, number, active)| {
            let mut request = AccountRequestBuilder::new()
                .with_client(IdentityFixtures::primary_client())
                .with_account_number(number)
                .with_amount(amount)
                .build();
            request.holders = holders;
            request.signers = signers;
            request.active = active;
            request
        })
}

/// Strategy for savings product parameters with small limits
pub fn product_parameter_strategy() -> impl Strategy<Value = ProductParameter> {
    (0u64..4, 0u32..4, 0u32..4, any::<bool>(), any::<bool>()).prop_map(
        |(max_product, minimum_holder, minimum_signer, account_required, card_required)| ProductParameter {
            key: ProductFixtures::savings_key(),
            max_product,
            minimum_holder,
            minimum_signer,
            account_required,
            card_required,
        },
    )
}

/// Strategy for arbitrary combinations of check outcomes
pub fn eligibility_report_strategy() -> impl Strategy<Value = EligibilityReport> {
    any::<[bool; 5]>().prop_map(|[max_accounts, holders, signers, account_prerequisite, card_prerequisite]| {
        EligibilityReport {
            max_accounts,
            holders,
            signers,
            account_prerequisite,
            card_prerequisite,
        }
    })
}
