//! Account-opening eligibility rules
//!
//! Five independent predicates decide whether an account may be opened. They
//! are evaluated together and then inspected in a fixed priority order, so the
//! rejection reported for a request never depends on which check finished
//! first.

use crate::error::AccountError;
use crate::product::ProductParameter;

/// One of the eligibility predicates, listed in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EligibilityCheck {
    /// Existing accounts for (client, product) stay below `max_product`
    MaxAccounts,
    /// Request names at least `minimum_holder` holders
    Holders,
    /// Request names at least `minimum_signer` signers
    Signers,
    /// Client already owns an account when the product requires one
    AccountPrerequisite,
    /// Client already owns a card when the product requires one
    CardPrerequisite,
}

impl EligibilityCheck {
    /// Order in which failing checks are reported
    pub const PRIORITY: [EligibilityCheck; 5] = [
        EligibilityCheck::MaxAccounts,
        EligibilityCheck::Holders,
        EligibilityCheck::Signers,
        EligibilityCheck::AccountPrerequisite,
        EligibilityCheck::CardPrerequisite,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EligibilityCheck::MaxAccounts => "max_accounts",
            EligibilityCheck::Holders => "holders",
            EligibilityCheck::Signers => "signers",
            EligibilityCheck::AccountPrerequisite => "account_prerequisite",
            EligibilityCheck::CardPrerequisite => "card_prerequisite",
        }
    }

    /// The rejection reported when this check fails
    pub fn violation(&self, parameter: &ProductParameter) -> AccountError {
        match self {
            EligibilityCheck::MaxAccounts => AccountError::MaxAccountsExceeded {
                product_code: parameter.key.product_code.clone(),
                max_product: parameter.max_product,
            },
            EligibilityCheck::Holders => AccountError::InsufficientHolders {
                required: parameter.minimum_holder,
            },
            EligibilityCheck::Signers => AccountError::InsufficientSigners {
                required: parameter.minimum_signer,
            },
            EligibilityCheck::AccountPrerequisite => AccountError::AccountPrerequisiteMissing,
            EligibilityCheck::CardPrerequisite => AccountError::CardPrerequisiteMissing,
        }
    }
}

impl std::fmt::Display for EligibilityCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of all five checks for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityReport {
    pub max_accounts: bool,
    pub holders: bool,
    pub signers: bool,
    pub account_prerequisite: bool,
    pub card_prerequisite: bool,
}

impl EligibilityReport {
    /// Returns whether the given check passed
    pub fn passed(&self, check: EligibilityCheck) -> bool {
        match check {
            EligibilityCheck::MaxAccounts => self.max_accounts,
            EligibilityCheck::Holders => self.holders,
            EligibilityCheck::Signers => self.signers,
            EligibilityCheck::AccountPrerequisite => self.account_prerequisite,
            EligibilityCheck::CardPrerequisite => self.card_prerequisite,
        }
    }

    /// First failing check in priority order
    pub fn first_failure(&self) -> Option<EligibilityCheck> {
        EligibilityCheck::PRIORITY
            .into_iter()
            .find(|check| !self.passed(*check))
    }

    /// The single error to report, if any check failed
    pub fn verdict(&self, parameter: &ProductParameter) -> Result<(), AccountError> {
        match self.first_failure() {
            Some(check) => Err(check.violation(parameter)),
            None => Ok(()),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.first_failure().is_none()
    }
}

pub fn max_accounts_not_exceeded(existing: u64, max_product: u64) -> bool {
    existing < max_product
}

pub fn count_sufficient(supplied: usize, minimum: u32) -> bool {
    supplied >= minimum as usize
}

/// A prerequisite holds when not required, or when the client owns at least one
pub fn prerequisite_satisfied(required: bool, owned: u64) -> bool {
    !required || owned > 0
}
