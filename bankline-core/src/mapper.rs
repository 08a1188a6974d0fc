//! Projections between the account record and its external shapes
//!
//! Everything here is pure: no store access, no clock reads. Callers pass
//! `now` in so the service owns time.

use chrono::{DateTime, Utc};

use crate::domain::{Account, AccountDetails, AccountSummary, CreateAccount, UpdateAccount};

/// Prefix shown before the last four characters of an account number
const MASK_PREFIX: &str = "**** **** **** ";

/// Shown instead of numbers too short to mask
const UNKNOWN_MASK: &str = "****";

/// Mask all but the last four characters of an account number
pub fn mask_account_number(account_number: &str) -> String {
    let count = account_number.chars().count();
    if count < 4 {
        return UNKNOWN_MASK.to_string();
    }
    let last_four: String = account_number.chars().skip(count - 4).collect();
    format!("{}{}", MASK_PREFIX, last_four)
}

/// Public summary view
pub fn to_summary(account: &Account) -> AccountSummary {
    AccountSummary {
        id: account.id,
        account_holder_name: account.account_holder_name.clone(),
        masked_account_number: mask_account_number(&account.account_number),
        account_type: account.account_type.clone(),
        bank_name: account.bank_name.clone(),
        currency: account.currency.clone(),
        account_creation_date: account.account_creation_date,
        balance: account.balance,
        active: account.state.active,
        branch_display_name: account.branch_code.clone(),
        display_status: account.account_status.clone(),
    }
}

/// Full internal view
pub fn to_details(account: &Account) -> AccountDetails {
    AccountDetails {
        id: account.id,
        account_holder_name: account.account_holder_name.clone(),
        account_number: account.account_number.clone(),
        account_type: account.account_type.clone(),
        bank_name: account.bank_name.clone(),
        branch_code: account.branch_code.clone(),
        ifsc_code: account.ifsc_code.clone(),
        currency: account.currency.clone(),
        account_creation_date: account.account_creation_date,
        active: account.state.active,
        contact_email: account.contact_email.clone(),
        contact_phone: account.contact_phone.clone(),
        address: account.address.clone(),
        balance: account.balance,
        pan_number: account.pan_number.clone(),
        nationality: account.nationality.clone(),
        date_of_birth: account.date_of_birth,
        account_status: account.account_status.clone(),
        overdraft_allowed: account.overdraft_allowed,
        overdraft_limit: account.overdraft_limit,
        swift_code: account.swift_code.clone(),
        iban: account.iban.clone(),
        last_transaction_at: account.last_transaction_at,
        last_login_at: account.last_login_at,
        created_at: account.created_at,
        updated_at: account.updated_at,
        locked: account.state.locked,
        failed_login_attempts: account.failed_login_attempts,
        user_id: account.owner.map(|owner| owner.as_uuid()),
    }
}

/// Build a new record from a creation request
///
/// Only the creatable fields are copied. Status, flags, balance and
/// timestamps always come from the system defaults.
pub fn from_create_input(input: &CreateAccount, now: DateTime<Utc>) -> Account {
    let mut account = Account::new(
        input.account_holder_name.clone(),
        input.account_number.clone(),
        now,
    );
    account.account_type = input.account_type.clone();
    account.bank_name = input.bank_name.clone();
    account.branch_code = input.branch_code.clone();
    account.ifsc_code = input.ifsc_code.clone();
    account.currency = input.currency.clone();
    account.contact_email = input.contact_email.clone();
    account.contact_phone = input.contact_phone.clone();
    account.address = input.address.clone();
    account.pan_number = input.pan_number.clone();
    account.nationality = input.nationality.clone();
    account.date_of_birth = input.date_of_birth;
    account
}

/// Overwrite the fields present in `input` and refresh `updated_at`
pub fn apply_update(account: &mut Account, input: &UpdateAccount, now: DateTime<Utc>) {
    if let Some(name) = &input.account_holder_name {
        account.account_holder_name = name.clone();
    }
    if let Some(email) = &input.contact_email {
        account.contact_email = email.clone();
    }
    if let Some(phone) = &input.contact_phone {
        account.contact_phone = phone.clone();
    }
    if let Some(address) = &input.address {
        account.address = address.clone();
    }
    if let Some(status) = &input.account_status {
        account.account_status = status.clone();
    }
    if let Some(allowed) = input.overdraft_allowed {
        account.overdraft_allowed = allowed;
    }
    if let Some(limit) = input.overdraft_limit {
        account.overdraft_limit = limit;
    }
    account.touch(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn create_input() -> CreateAccount {
        CreateAccount {
            account_holder_name: "Alice".to_string(),
            account_number: "1234567890123456".to_string(),
            account_type: "SAVINGS".to_string(),
            bank_name: "First Bank".to_string(),
            branch_code: "BR-001".to_string(),
            ifsc_code: "FBNK0000001".to_string(),
            currency: "USD".to_string(),
            contact_email: "alice@example.com".to_string(),
            contact_phone: "5551234567".to_string(),
            address: "1 Main St".to_string(),
            balance: Some(Decimal::new(999, 0)),
            pan_number: Some("ABCDE1234F".to_string()),
            nationality: Some("US".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
    }

    #[test]
    fn test_mask_account_number() {
        assert_eq!(mask_account_number("1234567890123456"), "**** **** **** 3456");
        assert_eq!(mask_account_number("9876"), "**** **** **** 9876");
        assert_eq!(mask_account_number("987"), "****");
        assert_eq!(mask_account_number(""), "****");
    }

    #[test]
    fn test_mask_counts_characters_not_bytes() {
        assert_eq!(mask_account_number("ÅÄÖ12"), "**** **** **** ÄÖ12");
        assert_eq!(mask_account_number("ÅÄÖ"), "****");
    }

    #[test]
    fn test_from_create_input_applies_defaults() {
        let account = from_create_input(&create_input(), now());

        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.state.active);
        assert!(!account.state.locked);
        assert_eq!(account.account_status, "ACTIVE");
        assert_eq!(account.created_at, now());
        assert_eq!(account.updated_at, now());
        assert_eq!(account.account_creation_date, now().date_naive());
        assert!(!account.overdraft_allowed);
        assert!(account.owner.is_none());

        assert_eq!(account.account_holder_name, "Alice");
        assert_eq!(account.ifsc_code, "FBNK0000001");
        assert_eq!(account.pan_number.as_deref(), Some("ABCDE1234F"));
        assert_eq!(account.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 17));
    }

    #[test]
    fn test_summary_hides_sensitive_fields() {
        let mut account = from_create_input(&create_input(), now());
        account.id = Uuid::new_v4();

        let summary = to_summary(&account);
        assert_eq!(summary.id, account.id);
        assert_eq!(summary.masked_account_number, "**** **** **** 3456");
        assert_eq!(summary.branch_display_name, "BR-001");
        assert_eq!(summary.display_status, "ACTIVE");

        let json = serde_json::to_value(&summary).unwrap();
        for hidden in [
            "accountNumber",
            "panNumber",
            "iban",
            "swiftCode",
            "locked",
            "contactEmail",
        ] {
            assert!(json.get(hidden).is_none(), "{} leaked into summary", hidden);
        }
    }

    #[test]
    fn test_details_exposes_everything() {
        let mut account = from_create_input(&create_input(), now());
        let owner = Uuid::new_v4();
        account.owner = Some(UserId::new(owner));
        account.state.locked = true;
        account.failed_login_attempts = 2;

        let details = to_details(&account);
        assert_eq!(details.account_number, "1234567890123456");
        assert!(details.locked);
        assert!(details.active);
        assert_eq!(details.failed_login_attempts, 2);
        assert_eq!(details.user_id, Some(owner));
        assert_eq!(details.nationality.as_deref(), Some("US"));
    }

    #[test]
    fn test_details_without_owner() {
        let account = from_create_input(&create_input(), now());
        assert_eq!(to_details(&account).user_id, None);
    }

    #[test]
    fn test_apply_update_only_touches_present_fields() {
        let mut account = from_create_input(&create_input(), now());
        let later = now() + Duration::minutes(5);

        let update = UpdateAccount {
            contact_email: Some("alice@new.example.com".to_string()),
            account_status: Some("SUSPENDED".to_string()),
            overdraft_limit: Some(Decimal::new(250, 0)),
            ..Default::default()
        };
        apply_update(&mut account, &update, later);

        assert_eq!(account.contact_email, "alice@new.example.com");
        assert_eq!(account.account_status, "SUSPENDED");
        assert_eq!(account.overdraft_limit, Decimal::new(250, 0));
        assert_eq!(account.account_holder_name, "Alice");
        assert_eq!(account.contact_phone, "5551234567");
        assert!(account.state.active);
        assert_eq!(account.updated_at, later);
    }
}
