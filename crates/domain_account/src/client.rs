//! Client profile as resolved from the client directory

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use core_kernel::ClientIdentity;

/// Client metadata needed to pick the applicable product rules
///
/// Profiles are fetched per request and never persisted by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub identity: ClientIdentity,
    /// Client type, e.g. "PERSONAL" or "BUSINESS"
    pub client_type: String,
    /// Profile classification within the type, e.g. "STANDARD" or "VIP"
    pub client_profile: String,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl ClientProfile {
    /// Creates a profile with only the classification fields set
    pub fn new(
        identity: ClientIdentity,
        client_type: impl Into<String>,
        client_profile: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            client_type: client_type.into(),
            client_profile: client_profile.into(),
            name: None,
            last_name: None,
            business_name: None,
            email: None,
            phone_number: None,
            birthday: None,
        }
    }
}
