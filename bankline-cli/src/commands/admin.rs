//! Admin commands - full records, updates, removal and state transitions

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;

use bankline_core::validation::{parse_amount, validate_update};
use bankline_core::{OperationResult, UpdateAccount};

use super::{acknowledge, get_context, parse_id, require_admin};
use crate::output;

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Show the full record of one account
    Details {
        /// Account id
        id: String,
    },
    /// List full records of all accounts
    List,
    /// Update contact, status or overdraft fields
    Update(UpdateArgs),
    /// Permanently delete an account
    Delete {
        /// Account id
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
    /// Lock an account (blocks deposits)
    Lock {
        /// Account id
        id: String,
    },
    /// Unlock a locked account
    Unlock {
        /// Account id
        id: String,
    },
    /// Mark an account active
    Activate {
        /// Account id
        id: String,
    },
    /// Mark an account inactive (blocks deposits)
    Deactivate {
        /// Account id
        id: String,
    },
}

impl AdminCommands {
    /// Name used in the event log
    pub fn name(&self) -> &'static str {
        match self {
            AdminCommands::Details { .. } => "admin details",
            AdminCommands::List => "admin list",
            AdminCommands::Update(_) => "admin update",
            AdminCommands::Delete { .. } => "admin delete",
            AdminCommands::Lock { .. } => "admin lock",
            AdminCommands::Unlock { .. } => "admin unlock",
            AdminCommands::Activate { .. } => "admin activate",
            AdminCommands::Deactivate { .. } => "admin deactivate",
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
    /// Account id
    pub id: String,
    #[arg(long)]
    pub holder_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// 10-digit phone number
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Free-text status label
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub overdraft_allowed: Option<bool>,
    #[arg(long)]
    pub overdraft_limit: Option<String>,
}

impl UpdateArgs {
    fn to_request(&self) -> Result<UpdateAccount> {
        Ok(UpdateAccount {
            account_holder_name: self.holder_name.clone(),
            contact_email: self.email.clone(),
            contact_phone: self.phone.clone(),
            address: self.address.clone(),
            account_status: self.status.clone(),
            overdraft_allowed: self.overdraft_allowed,
            overdraft_limit: self
                .overdraft_limit
                .as_deref()
                .map(parse_amount)
                .transpose()?,
        })
    }
}

pub fn run(command: AdminCommands, json: bool) -> Result<()> {
    require_admin()?;

    match command {
        AdminCommands::Details { id } => {
            let id = parse_id(&id)?;
            let ctx = get_context()?;
            let details = ctx.account_service.get_details(id)?;
            if json {
                return output::json(&OperationResult::ok(details));
            }
            output::details(&details);
        }
        AdminCommands::List => {
            let ctx = get_context()?;
            let all = ctx.account_service.list_details()?;
            if json {
                return output::json(&OperationResult::ok(all));
            }
            output::details_list(&all);
        }
        AdminCommands::Update(args) => {
            let id = parse_id(&args.id)?;
            let request = args.to_request()?;
            validate_update(&request)?;

            let ctx = get_context()?;
            let details = ctx.account_service.update(id, &request)?;
            if json {
                return output::json(&OperationResult::ok(details));
            }
            output::success("Account updated successfully");
            output::details(&details);
        }
        AdminCommands::Delete { id, force } => {
            let id = parse_id(&id)?;
            let ctx = get_context()?;

            if !force && !json {
                let summary = ctx.account_service.get_summary(id)?;
                output::warning(&format!(
                    "\nThis will permanently delete the account of {} ({}).",
                    summary.account_holder_name, summary.masked_account_number
                ));
                println!("{}\n", "This cannot be undone.".dimmed());

                if !Confirm::new()
                    .with_prompt("Are you sure?")
                    .default(false)
                    .interact()?
                {
                    println!("{}\n", "Cancelled".dimmed());
                    return Ok(());
                }
            }

            ctx.account_service.delete(id)?;
            acknowledge("Account deleted successfully", json)?;
        }
        AdminCommands::Lock { id } => {
            let id = parse_id(&id)?;
            get_context()?.account_service.lock(id)?;
            acknowledge("Account locked successfully", json)?;
        }
        AdminCommands::Unlock { id } => {
            let id = parse_id(&id)?;
            get_context()?.account_service.unlock(id)?;
            acknowledge("Account unlocked successfully", json)?;
        }
        AdminCommands::Activate { id } => {
            let id = parse_id(&id)?;
            get_context()?.account_service.set_active(id, true)?;
            acknowledge("Account activated successfully", json)?;
        }
        AdminCommands::Deactivate { id } => {
            let id = parse_id(&id)?;
            get_context()?.account_service.set_active(id, false)?;
            acknowledge("Account deactivated successfully", json)?;
        }
    }

    Ok(())
}
