//! External projections of an account

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public, non-sensitive view of an account
///
/// Never carries KYC, security, audit or international fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub account_holder_name: String,
    pub masked_account_number: String,
    pub account_type: String,
    pub bank_name: String,
    pub currency: String,
    pub account_creation_date: NaiveDate,
    pub balance: Decimal,
    pub active: bool,
    pub branch_display_name: String,
    pub display_status: String,
}

/// Full internal view of an account (admin only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetails {
    pub id: Uuid,
    pub account_holder_name: String,
    pub account_number: String,
    pub account_type: String,
    pub bank_name: String,
    pub branch_code: String,
    pub ifsc_code: String,
    pub currency: String,
    pub account_creation_date: NaiveDate,
    pub active: bool,

    // Contact
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,
    pub balance: Decimal,

    // KYC
    pub pan_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    // Account management
    pub account_status: String,
    pub overdraft_allowed: bool,
    pub overdraft_limit: Decimal,

    // International
    pub swift_code: Option<String>,
    pub iban: Option<String>,

    // Audit
    pub last_transaction_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Security
    pub locked: bool,
    pub failed_login_attempts: u32,

    // Ownership
    pub user_id: Option<Uuid>,
}
