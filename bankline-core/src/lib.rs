//! Bankline Core - account lifecycle and balance management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Account, views, input shapes, errors)
//! - **ports**: Trait definitions for external dependencies (AccountStore)
//! - **services**: Business logic orchestration (AccountService, logging, migrations)
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod mapper;
pub mod migrations;
pub mod ports;
pub mod services;
pub mod validation;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbAccountStore;
use config::Config;

// Re-export commonly used types at crate root
pub use domain::result::{ApiResponse, Error, OperationResult, UnavailableReason};
pub use domain::{
    Account, AccountDetails, AccountState, AccountSummary, CreateAccount, UpdateAccount, UserId,
};
pub use services::{AccountService, EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};

/// Main context for Bankline operations
///
/// Holds the configuration, the account store, and the service built on it.
pub struct BanklineContext {
    pub config: Config,
    pub store: Arc<DuckDbAccountStore>,
    pub account_service: AccountService,
}

impl BanklineContext {
    /// Open the bankline directory: load settings, open the database and
    /// bring its schema up to date
    pub fn new(bankline_dir: &Path) -> Result<Self> {
        let config = Config::load(bankline_dir)?;

        let db_path = config.database_path(bankline_dir);
        let store = Arc::new(DuckDbAccountStore::new(&db_path)?);
        store.ensure_schema()?;

        let account_service =
            AccountService::new(Arc::clone(&store) as Arc<dyn ports::AccountStore>);

        Ok(Self {
            config,
            store,
            account_service,
        })
    }
}
