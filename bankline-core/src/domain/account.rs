//! Account domain model

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Status label given to every new account
pub const DEFAULT_ACCOUNT_STATUS: &str = "ACTIVE";

/// The two independent state axes of an account
///
/// A locked account can still be active; deposits require both
/// `active == true` and `locked == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub active: bool,
    pub locked: bool,
}

impl Default for AccountState {
    fn default() -> Self {
        Self {
            active: true,
            locked: false,
        }
    }
}

/// A bank account
///
/// Holder, routing and contact fields are free text and opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Assigned by the store on insert, never changed afterwards
    pub id: Uuid,
    pub account_holder_name: String,
    /// Unique among all live accounts
    pub account_number: String,
    pub account_type: String,
    pub bank_name: String,
    pub branch_code: String,
    /// Branch routing code (IFSC in India)
    pub ifsc_code: String,
    pub currency: String,
    pub account_creation_date: NaiveDate,
    pub balance: Decimal,
    #[serde(flatten)]
    pub state: AccountState,
    /// Informational label, independent of `state.active`
    pub account_status: String,

    // =========================================================================
    // Contact
    // =========================================================================
    pub contact_email: String,
    pub contact_phone: String,
    pub address: String,

    // =========================================================================
    // KYC (optional)
    // =========================================================================
    /// Tax identifier (PAN in India)
    pub pan_number: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,

    // =========================================================================
    // Overdraft
    // =========================================================================
    pub overdraft_allowed: bool,
    pub overdraft_limit: Decimal,

    // =========================================================================
    // International banking
    // =========================================================================
    pub swift_code: Option<String>,
    pub iban: Option<String>,

    // =========================================================================
    // Audit
    // =========================================================================
    pub last_transaction_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // =========================================================================
    // Security
    // =========================================================================
    pub failed_login_attempts: u32,

    /// Weak reference to the owning user; the core never follows it
    pub owner: Option<UserId>,
}

impl Account {
    /// Create an account with system defaults
    ///
    /// The id is a placeholder until the store assigns one on insert.
    pub fn new(
        account_holder_name: impl Into<String>,
        account_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            account_holder_name: account_holder_name.into(),
            account_number: account_number.into(),
            account_type: String::new(),
            bank_name: String::new(),
            branch_code: String::new(),
            ifsc_code: String::new(),
            currency: String::new(),
            account_creation_date: now.date_naive(),
            balance: Decimal::ZERO,
            state: AccountState::default(),
            account_status: DEFAULT_ACCOUNT_STATUS.to_string(),
            contact_email: String::new(),
            contact_phone: String::new(),
            address: String::new(),
            pan_number: None,
            nationality: None,
            date_of_birth: None,
            overdraft_allowed: false,
            overdraft_limit: Decimal::ZERO,
            swift_code: None,
            iban: None,
            last_transaction_at: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
            failed_login_attempts: 0,
            owner: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Lowest balance the record may hold
    pub fn balance_floor(&self) -> Decimal {
        if self.overdraft_allowed {
            -self.overdraft_limit
        } else {
            Decimal::ZERO
        }
    }

    /// Refresh `updated_at`, never moving it before `created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    /// Stamp a balance change: last transaction is recorded at start of day
    pub fn record_transaction(&mut self, now: DateTime<Utc>) {
        self.last_transaction_at = Some(start_of_day(now));
        self.touch(now);
    }

    /// Validate the record-level invariants
    pub fn validate(&self, today: NaiveDate) -> Result<(), &'static str> {
        if self.account_holder_name.trim().is_empty() {
            return Err("Account holder name is required");
        }
        if self.account_number.trim().is_empty() {
            return Err("Account number is required");
        }
        if self.overdraft_limit < Decimal::ZERO {
            return Err("Overdraft limit must be zero or positive");
        }
        if self.balance < self.balance_floor() {
            return Err("Balance cannot fall below the permitted floor");
        }
        if let Some(dob) = self.date_of_birth {
            if dob >= today {
                return Err("Date of birth must be in the past");
            }
        }
        if self.updated_at < self.created_at {
            return Err("Updated timestamp cannot precede creation");
        }
        Ok(())
    }
}

/// Midnight UTC of the day containing `now`
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
