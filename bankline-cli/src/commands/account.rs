//! Public account commands - open, view, deposit, withdraw

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;

use bankline_core::validation::{parse_amount, validate_create};
use bankline_core::{CreateAccount, OperationResult};

use super::{get_context, parse_id};
use crate::output;

/// Fields for `bl create`
///
/// Either pass every required flag, or `--file` with a JSON body in the
/// camelCase shape of an account creation request.
#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Read the request from a JSON file instead of flags
    #[arg(short, long, conflicts_with_all = ["holder_name", "account_number"])]
    pub file: Option<PathBuf>,
    /// Account holder's full name
    #[arg(long, required_unless_present = "file")]
    pub holder_name: Option<String>,
    /// Account number (must be unique)
    #[arg(long, required_unless_present = "file")]
    pub account_number: Option<String>,
    /// Account type, e.g. SAVINGS or CURRENT
    #[arg(long, required_unless_present = "file")]
    pub account_type: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub bank_name: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub branch_code: Option<String>,
    /// Branch routing code
    #[arg(long, required_unless_present = "file")]
    pub ifsc_code: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub currency: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub email: Option<String>,
    /// 10-digit phone number
    #[arg(long, required_unless_present = "file")]
    pub phone: Option<String>,
    #[arg(long, required_unless_present = "file")]
    pub address: Option<String>,
    /// Opening balance (accepted for compatibility; accounts always open at zero)
    #[arg(long)]
    pub balance: Option<String>,
    /// Tax identifier (PAN)
    #[arg(long)]
    pub pan: Option<String>,
    #[arg(long)]
    pub nationality: Option<String>,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub date_of_birth: Option<NaiveDate>,
}

impl CreateArgs {
    fn into_request(self) -> Result<CreateAccount> {
        if let Some(path) = self.file {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let request: CreateAccount = serde_json::from_str(&content).map_err(|e| {
                bankline_core::Error::validation(format!("Invalid request file: {}", e))
            })?;
            return Ok(request);
        }

        let balance = self.balance.as_deref().map(parse_amount).transpose()?;
        Ok(CreateAccount {
            account_holder_name: self.holder_name.unwrap_or_default(),
            account_number: self.account_number.unwrap_or_default(),
            account_type: self.account_type.unwrap_or_default(),
            bank_name: self.bank_name.unwrap_or_default(),
            branch_code: self.branch_code.unwrap_or_default(),
            ifsc_code: self.ifsc_code.unwrap_or_default(),
            currency: self.currency.unwrap_or_default(),
            contact_email: self.email.unwrap_or_default(),
            contact_phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            balance,
            pan_number: self.pan,
            nationality: self.nationality,
            date_of_birth: self.date_of_birth,
        })
    }
}

pub fn create(args: CreateArgs, json: bool) -> Result<()> {
    let request = args.into_request()?;
    validate_create(&request, Utc::now().date_naive())?;

    let ctx = get_context()?;
    let summary = ctx.account_service.create(&request)?;

    if json {
        return output::json(&OperationResult::ok(summary));
    }
    output::success("Account created successfully");
    output::summary(&summary);
    Ok(())
}

pub fn show(id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let ctx = get_context()?;
    let summary = ctx.account_service.get_summary(id)?;

    if json {
        return output::json(&OperationResult::ok(summary));
    }
    output::summary(&summary);
    Ok(())
}

pub fn list(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let summaries = ctx.account_service.list_summaries()?;

    if json {
        return output::json(&OperationResult::ok(summaries));
    }
    output::summaries(&summaries);
    Ok(())
}

pub fn deposit(id: &str, amount: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let amount = parse_amount(amount)?;
    let ctx = get_context()?;
    let summary = ctx.account_service.deposit(id, amount)?;

    if json {
        return output::json(&OperationResult::ok(summary));
    }
    output::success(&format!(
        "Deposited {} {}; balance is now {} {}",
        amount, summary.currency, summary.balance, summary.currency
    ));
    Ok(())
}

pub fn withdraw(id: &str, amount: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;
    let amount = parse_amount(amount)?;
    let ctx = get_context()?;
    let summary = ctx.account_service.withdraw(id, amount)?;

    if json {
        return output::json(&OperationResult::ok(summary));
    }
    output::success(&format!(
        "Withdrew {} {}; balance is now {} {}",
        amount, summary.currency, summary.balance, summary.currency
    ));
    Ok(())
}
