//! Account store port - persistence abstraction

use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::Account;

/// Durable mapping from account id to account record
///
/// Implementations must reject a second live account with the same
/// account number by returning `Error::DuplicateAccount`. The lifecycle
/// service serializes read-modify-write cycles per account id, so a store
/// only needs to make each single call atomic.
pub trait AccountStore: Send + Sync {
    /// Persist a new account under a freshly assigned id
    ///
    /// Whatever id the incoming record carries is ignored.
    fn insert(&self, account: Account) -> Result<Account>;

    /// Overwrite an existing account
    fn update(&self, account: &Account) -> Result<()>;

    /// Get account by id
    fn get(&self, id: Uuid) -> Result<Option<Account>>;

    /// Get account by its account number
    fn find_by_account_number(&self, account_number: &str) -> Result<Option<Account>>;

    /// Get all accounts, in no particular order
    fn list(&self) -> Result<Vec<Account>>;

    /// Remove an account permanently; returns whether it existed
    fn delete(&self, id: Uuid) -> Result<bool>;
}
