//! Input shapes accepted by the lifecycle service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to open a new account
///
/// `balance` is accepted so existing clients can keep sending an opening
/// amount, but the service always opens accounts at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    pub account_holder_name: String,
    pub account_number: String,
    pub account_type: String,
    pub bank_name: String,
    pub branch_code: String,
    pub ifsc_code: String,
    pub currency: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub pan_number: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Partial update of an existing account
///
/// Every `Some` field overwrites the stored value; `None` leaves it alone.
/// Active and locked flags have dedicated transitions and are not here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub account_status: Option<String>,
    #[serde(default)]
    pub overdraft_allowed: Option<bool>,
    #[serde(default)]
    pub overdraft_limit: Option<Decimal>,
}

impl UpdateAccount {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.account_holder_name.is_none()
            && self.contact_email.is_none()
            && self.contact_phone.is_none()
            && self.address.is_none()
            && self.account_status.is_none()
            && self.overdraft_allowed.is_none()
            && self.overdraft_limit.is_none()
    }
}
