//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use serde::Serialize;

use bankline_core::{AccountDetails, AccountSummary};

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print any serializable value as pretty JSON
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn yes_no(flag: bool) -> String {
    if flag {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

fn or_dash(value: Option<impl ToString>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Key/value table for one public summary
pub fn summary(s: &AccountSummary) {
    let mut table = create_table();
    table.add_row(vec!["Id".to_string(), s.id.to_string()]);
    table.add_row(vec!["Holder".to_string(), s.account_holder_name.clone()]);
    table.add_row(vec!["Account".to_string(), s.masked_account_number.clone()]);
    table.add_row(vec!["Type".to_string(), s.account_type.clone()]);
    table.add_row(vec!["Bank".to_string(), s.bank_name.clone()]);
    table.add_row(vec!["Branch".to_string(), s.branch_display_name.clone()]);
    table.add_row(vec!["Opened".to_string(), s.account_creation_date.to_string()]);
    table.add_row(vec![
        "Balance".to_string(),
        format!("{} {}", s.balance, s.currency),
    ]);
    table.add_row(vec!["Active".to_string(), yes_no(s.active)]);
    table.add_row(vec!["Status".to_string(), s.display_status.clone()]);
    println!("{}", table);
}

/// One row per account
pub fn summaries(list: &[AccountSummary]) {
    if list.is_empty() {
        info("No accounts found.");
        return;
    }

    let mut table = create_table();
    table.set_header(vec![
        "Id", "Holder", "Account", "Type", "Bank", "Balance", "Active", "Status",
    ]);
    for s in list {
        table.add_row(vec![
            s.id.to_string(),
            s.account_holder_name.clone(),
            s.masked_account_number.clone(),
            s.account_type.clone(),
            s.bank_name.clone(),
            format!("{} {}", s.balance, s.currency),
            yes_no(s.active),
            s.display_status.clone(),
        ]);
    }
    println!("{}", table);
}

/// Key/value table for the full internal record
pub fn details(d: &AccountDetails) {
    let mut table = create_table();
    let rows: Vec<(&str, String)> = vec![
        ("Id", d.id.to_string()),
        ("Holder", d.account_holder_name.clone()),
        ("Account number", d.account_number.clone()),
        ("Type", d.account_type.clone()),
        ("Bank", d.bank_name.clone()),
        ("Branch code", d.branch_code.clone()),
        ("IFSC", d.ifsc_code.clone()),
        ("Currency", d.currency.clone()),
        ("Opened", d.account_creation_date.to_string()),
        ("Balance", d.balance.to_string()),
        ("Active", yes_no(d.active)),
        ("Locked", yes_no(d.locked)),
        ("Status", d.account_status.clone()),
        ("Email", d.contact_email.clone()),
        ("Phone", d.contact_phone.clone()),
        ("Address", d.address.clone()),
        ("PAN", or_dash(d.pan_number.as_ref())),
        ("Nationality", or_dash(d.nationality.as_ref())),
        ("Date of birth", or_dash(d.date_of_birth)),
        ("Overdraft", yes_no(d.overdraft_allowed)),
        ("Overdraft limit", d.overdraft_limit.to_string()),
        ("SWIFT", or_dash(d.swift_code.as_ref())),
        ("IBAN", or_dash(d.iban.as_ref())),
        ("Last transaction", or_dash(d.last_transaction_at.map(|t| t.to_rfc3339()))),
        ("Last login", or_dash(d.last_login_at.map(|t| t.to_rfc3339()))),
        ("Created", d.created_at.to_rfc3339()),
        ("Updated", d.updated_at.to_rfc3339()),
        ("Failed logins", d.failed_login_attempts.to_string()),
        ("Owner", or_dash(d.user_id)),
    ];
    for (key, value) in rows {
        table.add_row(vec![key.to_string(), value]);
    }
    println!("{}", table);
}

/// Compact table of full records
pub fn details_list(list: &[AccountDetails]) {
    if list.is_empty() {
        info("No accounts found.");
        return;
    }

    let mut table = create_table();
    table.set_header(vec![
        "Id", "Holder", "Account number", "Balance", "Active", "Locked", "Status", "Updated",
    ]);
    for d in list {
        table.add_row(vec![
            d.id.to_string(),
            d.account_holder_name.clone(),
            d.account_number.clone(),
            format!("{} {}", d.balance, d.currency),
            yes_no(d.active),
            yes_no(d.locked),
            d.account_status.clone(),
            d.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }
    println!("{}", table);
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
