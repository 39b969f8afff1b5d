//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the account service. These fixtures
//! are consistent and predictable so tests can refer to them by name.

use chrono::NaiveDate;
use core_kernel::ClientIdentity;
use domain_account::{ClientProfile, ProductKey};

/// Fixture for client identity documents
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// Document type used by every fixture identity
    pub const DOCUMENT_TYPE: &'static str = "DNI";

    /// Primary client of most test requests
    pub fn primary_client() -> ClientIdentity {
        Self::dni("10000001")
    }

    /// A second client with no accounts in fresh stores
    pub fn other_client() -> ClientIdentity {
        Self::dni("20000002")
    }

    /// The n-th co-holder identity
    pub fn holder(n: u32) -> ClientIdentity {
        Self::dni(&format!("3{:07}", n))
    }

    /// The n-th signer identity
    pub fn signer(n: u32) -> ClientIdentity {
        Self::dni(&format!("4{:07}", n))
    }

    /// A national ID identity with the given number
    pub fn dni(number: &str) -> ClientIdentity {
        ClientIdentity {
            document_type: Self::DOCUMENT_TYPE.to_string(),
            document_number: number.to_string(),
        }
    }
}

/// Fixture for client classifications
pub struct ClientFixtures;

impl ClientFixtures {
    pub const PERSONAL: &'static str = "PERSONAL";
    pub const BUSINESS: &'static str = "BUSINESS";
    pub const STANDARD: &'static str = "STANDARD";
    pub const VIP: &'static str = "VIP";

    /// Personal/standard profile for the primary client
    pub fn personal_standard() -> ClientProfile {
        let mut profile = ClientProfile::new(
            IdentityFixtures::primary_client(),
            Self::PERSONAL,
            Self::STANDARD,
        );
        profile.name = Some("Ana".to_string());
        profile.last_name = Some("Quispe".to_string());
        profile.email = Some("ana.quispe@example.com".to_string());
        profile.birthday = NaiveDate::from_ymd_opt(1990, 7, 14);
        profile
    }

    /// Business/VIP profile for the given identity
    pub fn business_vip(identity: ClientIdentity) -> ClientProfile {
        let mut profile = ClientProfile::new(identity, Self::BUSINESS, Self::VIP);
        profile.business_name = Some("Andes Logistics SAC".to_string());
        profile
    }
}

/// Fixture for product codes and keys
pub struct ProductFixtures;

impl ProductFixtures {
    /// Savings product
    pub const SAVINGS: &'static str = "PX";
    /// Checking product
    pub const CHECKING: &'static str = "CC";

    /// Savings product for personal/standard clients
    pub fn savings_key() -> ProductKey {
        ProductKey::new(Self::SAVINGS, ClientFixtures::PERSONAL, ClientFixtures::STANDARD)
    }
}

/// Fixture for dates
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Standard opening date (Mar 1, 2024)
    pub fn opening_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }
}

/// Fixture for account attribute strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn account_number() -> &'static str {
        "191-0000001-0-01"
    }

    pub fn card_number() -> &'static str {
        "4111111111111111"
    }

    pub fn card_company() -> &'static str {
        "VISA"
    }

    pub fn bank_name() -> &'static str {
        "Banco Central"
    }
}
