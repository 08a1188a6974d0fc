//! Structural validation of incoming requests
//!
//! Runs at the request boundary before the service is called. Checks are
//! made in field order and the first failure is returned as
//! `Error::Validation`.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{CreateAccount, UpdateAccount};

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE_PATTERN: &str = r"^\d{10}$";

fn matches(pattern: &str, value: &str) -> Result<bool> {
    let re = Regex::new(pattern).map_err(|e| Error::Internal(e.to_string()))?;
    Ok(re.is_match(value))
}

fn require(value: &str, message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(message));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<()> {
    if !matches(EMAIL_PATTERN, value)? {
        return Err(Error::validation("Invalid email format"));
    }
    Ok(())
}

fn check_phone(value: &str) -> Result<()> {
    if !matches(PHONE_PATTERN, value)? {
        return Err(Error::validation("Phone must be 10 digits"));
    }
    Ok(())
}

fn check_non_negative(value: Decimal, message: &str) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::validation(message));
    }
    Ok(())
}

/// Validate an account creation request
pub fn validate_create(input: &CreateAccount, today: NaiveDate) -> Result<()> {
    require(&input.account_holder_name, "Account Holder Name must not be blank")?;
    require(&input.account_number, "Account number is required")?;
    require(&input.account_type, "Account type is required")?;
    require(&input.bank_name, "Bank name is required")?;
    require(&input.branch_code, "Branch code is required")?;
    require(&input.ifsc_code, "IFSC code is required")?;
    require(&input.currency, "Currency is required")?;
    require(&input.contact_email, "Email cannot be blank")?;
    check_email(&input.contact_email)?;
    require(&input.contact_phone, "Phone cannot be blank")?;
    check_phone(&input.contact_phone)?;
    require(&input.address, "Address is required")?;
    if let Some(balance) = input.balance {
        check_non_negative(balance, "Balance must be zero or positive")?;
    }
    if let Some(dob) = input.date_of_birth {
        if dob >= today {
            return Err(Error::validation("Date of birth must be in the past"));
        }
    }
    Ok(())
}

/// Validate a partial update; only present fields are checked
pub fn validate_update(input: &UpdateAccount) -> Result<()> {
    if input.is_empty() {
        return Err(Error::validation("At least one field must be provided"));
    }
    if let Some(name) = &input.account_holder_name {
        require(name, "Account Holder Name must not be blank")?;
    }
    if let Some(email) = &input.contact_email {
        check_email(email)?;
    }
    if let Some(phone) = &input.contact_phone {
        check_phone(phone)?;
    }
    if let Some(limit) = input.overdraft_limit {
        check_non_negative(limit, "Overdraft limit must be zero or positive")?;
    }
    Ok(())
}

/// Validate a transaction amount supplied as text
///
/// Returns the parsed amount. Sign is left to the service, which owns the
/// `InvalidAmount` rule.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Amount is required"));
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| Error::validation(format!("Amount '{}' is not a number", trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid() -> CreateAccount {
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
            ..Default::default()
        }
    }

    fn message(result: Result<()>) -> String {
        match result {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_create() {
        assert!(validate_create(&valid(), today()).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        let mut input = valid();
        input.account_holder_name = String::new();
        input.contact_email = "nope".to_string();

        assert_eq!(
            message(validate_create(&input, today())),
            "Account Holder Name must not be blank"
        );
    }

    #[test]
    fn test_email_and_phone_format() {
        let mut input = valid();
        input.contact_email = "alice.example.com".to_string();
        assert_eq!(message(validate_create(&input, today())), "Invalid email format");

        let mut input = valid();
        input.contact_phone = "555-123-4567".to_string();
        assert_eq!(message(validate_create(&input, today())), "Phone must be 10 digits");

        input.contact_phone = "55512345678".to_string();
        assert!(validate_create(&input, today()).is_err());
    }

    #[test]
    fn test_birth_date_and_balance() {
        let mut input = valid();
        input.date_of_birth = Some(today());
        assert_eq!(
            message(validate_create(&input, today())),
            "Date of birth must be in the past"
        );

        let mut input = valid();
        input.balance = Some(Decimal::new(-1, 0));
        assert!(validate_create(&input, today()).is_err());

        input.balance = Some(Decimal::ZERO);
        assert!(validate_create(&input, today()).is_ok());
    }

    #[test]
    fn test_update_checks_present_fields_only() {
        let update = UpdateAccount {
            address: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_update(&update).is_ok());

        let update = UpdateAccount {
            contact_phone: Some("123".to_string()),
            ..Default::default()
        };
        assert_eq!(message(validate_update(&update)), "Phone must be 10 digits");

        let update = UpdateAccount {
            overdraft_limit: Some(Decimal::new(-5, 0)),
            ..Default::default()
        };
        assert_eq!(
            message(validate_update(&update)),
            "Overdraft limit must be zero or positive"
        );
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(validate_update(&UpdateAccount::default()).is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount("-3").unwrap(), Decimal::new(-3, 0));
        assert!(matches!(parse_amount(""), Err(Error::Validation(_))));
        assert!(matches!(parse_amount("ten"), Err(Error::Validation(_))));
    }
}
