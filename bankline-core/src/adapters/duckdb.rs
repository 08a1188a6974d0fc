//! DuckDB account store

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use duckdb::{params, Connection, OptionalExt};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, AccountState, UserId};
use crate::ports::AccountStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Columns read back for every account, in `AccountRow` order
const ACCOUNT_COLUMNS: &str = "account_id, account_holder_name, account_number, account_type,
        bank_name, branch_code, ifsc_code, currency, account_creation_date::VARCHAR,
        balance, active, locked, account_status, contact_email, contact_phone, address,
        pan_number, nationality, date_of_birth::VARCHAR, overdraft_allowed, overdraft_limit,
        swift_code, iban, last_transaction_at, last_login_at, created_at, updated_at,
        failed_login_attempts, user_id";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// Check if an error message is a unique/primary key violation
fn is_duplicate_key_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("unique constraint")
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        let msg = err.to_string();
        if is_duplicate_key_error(&msg) {
            Error::DuplicateAccount
        } else {
            Error::Database(msg)
        }
    }
}

/// DuckDB-backed account store
pub struct DuckDbAccountStore {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbAccountStore {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff on file locking errors, which can
    /// occur when several processes open the same database at once.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[bankline] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// Open a throwaway in-memory database
    pub fn in_memory() -> anyhow::Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: None,
        })
    }

    fn try_open_connection(db_path: &Path) -> anyhow::Result<Connection> {
        // Extension autoloading off: cached extensions may fail code signing on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Ok(Connection::open_with_flags(db_path, config)?)
    }

    /// Path of the database file, `None` for in-memory stores
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    fn query_accounts(
        &self,
        where_clause: &str,
        params: &[&dyn duckdb::ToSql],
    ) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM sys_accounts {}", ACCOUNT_COLUMNS, where_clause);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, AccountRow::from_row)?
            .collect::<duckdb::Result<Vec<_>>>()?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }
}

impl AccountStore for DuckDbAccountStore {
    fn insert(&self, mut account: Account) -> Result<Account> {
        account.id = Uuid::new_v4();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_accounts (account_id, account_holder_name, account_number, account_type,
                                       bank_name, branch_code, ifsc_code, currency, account_creation_date,
                                       balance, active, locked, account_status, contact_email,
                                       contact_phone, address, pan_number, nationality, date_of_birth,
                                       overdraft_allowed, overdraft_limit, swift_code, iban,
                                       last_transaction_at, last_login_at, created_at, updated_at,
                                       failed_login_attempts, user_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?, ?,
                     CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                account.id.to_string(),
                account.account_holder_name,
                account.account_number,
                account.account_type,
                account.bank_name,
                account.branch_code,
                account.ifsc_code,
                account.currency,
                account.account_creation_date.to_string(),
                account.balance.to_string(),
                account.state.active,
                account.state.locked,
                account.account_status,
                account.contact_email,
                account.contact_phone,
                account.address,
                account.pan_number,
                account.nationality,
                account.date_of_birth.map(|d| d.to_string()),
                account.overdraft_allowed,
                account.overdraft_limit.to_string(),
                account.swift_code,
                account.iban,
                account.last_transaction_at.map(|t| t.to_rfc3339()),
                account.last_login_at.map(|t| t.to_rfc3339()),
                account.created_at.to_rfc3339(),
                account.updated_at.to_rfc3339(),
                i64::from(account.failed_login_attempts),
                account.owner.map(|o| o.to_string()),
            ],
        )?;
        Ok(account)
    }

    fn update(&self, account: &Account) -> Result<()> {
        // Identity and account number are immutable, so the indexed columns
        // are never rewritten here.
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE sys_accounts SET
                account_holder_name = ?, account_type = ?, bank_name = ?, branch_code = ?,
                ifsc_code = ?, currency = ?, account_creation_date = CAST(? AS DATE),
                balance = ?, active = ?, locked = ?, account_status = ?,
                contact_email = ?, contact_phone = ?, address = ?,
                pan_number = ?, nationality = ?, date_of_birth = CAST(? AS DATE),
                overdraft_allowed = ?, overdraft_limit = ?, swift_code = ?, iban = ?,
                last_transaction_at = ?, last_login_at = ?, created_at = ?, updated_at = ?,
                failed_login_attempts = ?, user_id = ?
             WHERE account_id = ?",
            params![
                account.account_holder_name,
                account.account_type,
                account.bank_name,
                account.branch_code,
                account.ifsc_code,
                account.currency,
                account.account_creation_date.to_string(),
                account.balance.to_string(),
                account.state.active,
                account.state.locked,
                account.account_status,
                account.contact_email,
                account.contact_phone,
                account.address,
                account.pan_number,
                account.nationality,
                account.date_of_birth.map(|d| d.to_string()),
                account.overdraft_allowed,
                account.overdraft_limit.to_string(),
                account.swift_code,
                account.iban,
                account.last_transaction_at.map(|t| t.to_rfc3339()),
                account.last_login_at.map(|t| t.to_rfc3339()),
                account.created_at.to_rfc3339(),
                account.updated_at.to_rfc3339(),
                i64::from(account.failed_login_attempts),
                account.owner.map(|o| o.to_string()),
                account.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(Error::not_found(account.id));
        }
        Ok(())
    }

    fn get(&self, id: Uuid) -> Result<Option<Account>> {
        let id = id.to_string();
        Ok(self
            .query_accounts("WHERE account_id = ?", &[&id])?
            .into_iter()
            .next())
    }

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<Account>> {
        let number = account_number.to_string();
        Ok(self
            .query_accounts("WHERE account_number = ?", &[&number])?
            .into_iter()
            .next())
    }

    fn list(&self) -> Result<Vec<Account>> {
        self.query_accounts("", &[])
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM sys_accounts WHERE account_id = ?",
            params![id.to_string()],
        )?;
        Ok(deleted > 0)
    }
}

impl DuckDbAccountStore {
    /// Number of stored accounts
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: Option<i64> = conn
            .query_row("SELECT COUNT(*) FROM sys_accounts", [], |row| row.get(0))
            .optional()?;
        Ok(count.unwrap_or(0))
    }
}

/// Raw column values, parsed into an `Account` outside the row callback
struct AccountRow {
    id: String,
    account_holder_name: String,
    account_number: String,
    account_type: String,
    bank_name: String,
    branch_code: String,
    ifsc_code: String,
    currency: String,
    account_creation_date: String,
    balance: String,
    active: bool,
    locked: bool,
    account_status: String,
    contact_email: String,
    contact_phone: String,
    address: String,
    pan_number: Option<String>,
    nationality: Option<String>,
    date_of_birth: Option<String>,
    overdraft_allowed: bool,
    overdraft_limit: String,
    swift_code: Option<String>,
    iban: Option<String>,
    last_transaction_at: Option<String>,
    last_login_at: Option<String>,
    created_at: String,
    updated_at: String,
    failed_login_attempts: i64,
    user_id: Option<String>,
}

impl AccountRow {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            account_holder_name: row.get(1)?,
            account_number: row.get(2)?,
            account_type: row.get(3)?,
            bank_name: row.get(4)?,
            branch_code: row.get(5)?,
            ifsc_code: row.get(6)?,
            currency: row.get(7)?,
            account_creation_date: row.get(8)?,
            balance: row.get(9)?,
            active: row.get(10)?,
            locked: row.get(11)?,
            account_status: row.get(12)?,
            contact_email: row.get(13)?,
            contact_phone: row.get(14)?,
            address: row.get(15)?,
            pan_number: row.get(16)?,
            nationality: row.get(17)?,
            date_of_birth: row.get(18)?,
            overdraft_allowed: row.get(19)?,
            overdraft_limit: row.get(20)?,
            swift_code: row.get(21)?,
            iban: row.get(22)?,
            last_transaction_at: row.get(23)?,
            last_login_at: row.get(24)?,
            created_at: row.get(25)?,
            updated_at: row.get(26)?,
            failed_login_attempts: row.get(27)?,
            user_id: row.get(28)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        Ok(Account {
            id: parse_uuid(&self.id)?,
            account_holder_name: self.account_holder_name,
            account_number: self.account_number,
            account_type: self.account_type,
            bank_name: self.bank_name,
            branch_code: self.branch_code,
            ifsc_code: self.ifsc_code,
            currency: self.currency,
            account_creation_date: parse_date(&self.account_creation_date)?,
            balance: parse_decimal(&self.balance)?,
            state: AccountState {
                active: self.active,
                locked: self.locked,
            },
            account_status: self.account_status,
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            address: self.address,
            pan_number: self.pan_number,
            nationality: self.nationality,
            date_of_birth: self.date_of_birth.as_deref().map(parse_date).transpose()?,
            overdraft_allowed: self.overdraft_allowed,
            overdraft_limit: parse_decimal(&self.overdraft_limit)?,
            swift_code: self.swift_code,
            iban: self.iban,
            last_transaction_at: self
                .last_transaction_at
                .as_deref()
                .map(parse_timestamp)
                .transpose()?,
            last_login_at: self.last_login_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            failed_login_attempts: u32::try_from(self.failed_login_attempts)
                .map_err(|_| Error::database("failed_login_attempts out of range"))?,
            owner: self
                .user_id
                .as_deref()
                .map(|s| parse_uuid(s).map(UserId::new))
                .transpose()?,
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| Error::database(format!("Invalid uuid '{}': {}", s, e)))
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    Decimal::from_str(s).map_err(|e| Error::database(format!("Invalid decimal '{}': {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::database(format!("Invalid date '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::database(format!("Invalid timestamp '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DuckDbAccountStore {
        let store = DuckDbAccountStore::in_memory().unwrap();
        store.ensure_schema().unwrap();
        store
    }

    fn account(number: &str) -> Account {
        let mut account = Account::new("Alice", number, Utc::now());
        account.account_type = "SAVINGS".to_string();
        account.currency = "USD".to_string();
        account.date_of_birth = NaiveDate::from_ymd_opt(1988, 2, 29);
        account.balance = Decimal::new(123_456, 2);
        account.overdraft_limit = Decimal::new(50, 1);
        account
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error(
            "The process cannot access the file because it is being used by another process"
        ));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }

    #[test]
    fn test_duplicate_key_errors() {
        assert!(is_duplicate_key_error(
            "Constraint Error: Duplicate key \"account_number: 1111\" violates unique constraint"
        ));
        assert!(!is_duplicate_key_error("Binder Error: column not found"));
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let store = store();
        let stored = store.insert(account("1111222233334444")).unwrap();

        let loaded = store.get(stored.id).unwrap().unwrap();
        assert_eq!(loaded.id, stored.id);
        assert_eq!(loaded.balance, Decimal::new(123_456, 2));
        assert_eq!(loaded.overdraft_limit, Decimal::new(50, 1));
        assert_eq!(loaded.date_of_birth, NaiveDate::from_ymd_opt(1988, 2, 29));
        assert_eq!(loaded.created_at, stored.created_at);
        assert_eq!(loaded.account_creation_date, stored.account_creation_date);
        assert!(loaded.state.active);
        assert!(loaded.owner.is_none());
    }

    #[test]
    fn test_unique_account_number() {
        let store = store();
        store.insert(account("1111")).unwrap();

        let result = store.insert(account("1111"));
        assert!(matches!(result, Err(Error::DuplicateAccount)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_update_and_find_by_number() {
        let store = store();
        let mut stored = store.insert(account("2222")).unwrap();

        stored.state.locked = true;
        stored.owner = Some(UserId::new(Uuid::new_v4()));
        stored.last_transaction_at = Some(Utc::now());
        store.update(&stored).unwrap();

        let loaded = store.find_by_account_number("2222").unwrap().unwrap();
        assert!(loaded.state.locked);
        assert_eq!(loaded.owner, stored.owner);
        assert_eq!(loaded.last_transaction_at, stored.last_transaction_at);
    }

    #[test]
    fn test_update_missing_row_is_not_found() {
        let store = store();
        let mut ghost = account("3333");
        ghost.id = Uuid::new_v4();
        assert!(matches!(store.update(&ghost), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let store = store();
        let stored = store.insert(account("4444")).unwrap();

        assert!(store.delete(stored.id).unwrap());
        assert!(!store.delete(stored.id).unwrap());
        assert!(store.list().unwrap().is_empty());
    }
}
