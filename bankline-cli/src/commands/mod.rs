//! CLI command implementations

pub mod account;
pub mod admin;
pub mod logs;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use uuid::Uuid;

use bankline_core::config::Config;
use bankline_core::{ApiResponse, BanklineContext, EntryPoint, Error, LogEvent, LoggingService};

/// Role value that unlocks `bl admin`
const ADMIN_ROLE: &str = "admin";

/// Get the logging service for CLI operations
///
/// Returns None if logging is disabled or fails to initialize (shouldn't
/// block operations)
pub fn get_logger() -> Option<LoggingService> {
    let bankline_dir = get_bankline_dir().ok()?;
    std::fs::create_dir_all(&bankline_dir).ok()?;
    let config = Config::load(&bankline_dir).unwrap_or_default();
    if !config.event_log {
        return None;
    }
    LoggingService::new(&bankline_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the bankline directory from environment or default
pub fn get_bankline_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("BANKLINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".bankline"))
        .ok_or_else(|| anyhow!("Could not find home directory; set BANKLINE_DIR"))
}

/// Open the bankline context
pub fn get_context() -> Result<BanklineContext> {
    let bankline_dir = get_bankline_dir()?;

    std::fs::create_dir_all(&bankline_dir)
        .with_context(|| format!("Failed to create bankline directory: {:?}", bankline_dir))?;

    BanklineContext::new(&bankline_dir).context("Failed to initialize bankline context")
}

/// Admin commands need BANKLINE_ROLE=admin
pub fn require_admin() -> Result<()> {
    match std::env::var("BANKLINE_ROLE") {
        Ok(role) if role.eq_ignore_ascii_case(ADMIN_ROLE) => Ok(()),
        _ => Err(Error::Unauthorized(
            "admin role required (set BANKLINE_ROLE=admin)".to_string(),
        )
        .into()),
    }
}

/// Parse an account id argument
pub fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::validation(format!("Invalid account id: {}", raw)).into())
}

/// Recover the core error behind a command failure
///
/// Anything that is not a core error (I/O, database open failures) is
/// reported as internal.
pub fn into_core_error(err: anyhow::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(core) => core,
        Err(other) => Error::Internal(format!("{:#}", other)),
    }
}

/// Print a failure as a structured body (JSON) or a coloured line
pub fn report_error(err: &Error, json: bool) {
    if json {
        let body = ApiResponse::from_error(err);
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{}", text),
            Err(_) => eprintln!("{}", err),
        }
    } else {
        eprint!("{} ", format!("Error [{}]:", err.code()).red().bold());
        crate::output::error(&err.to_string());
    }
}

/// Print a success acknowledgement
pub fn acknowledge(message: &str, json: bool) -> Result<()> {
    if json {
        crate::output::json(&ApiResponse::ok(message))
    } else {
        crate::output::success(message);
        Ok(())
    }
}
