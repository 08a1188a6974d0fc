//! In-memory account store
//!
//! Used by unit tests and by embedders that do not need durability.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::Account;
use crate::ports::AccountStore;

#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn accounts(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Account>>> {
        self.accounts
            .lock()
            .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))
    }
}

impl AccountStore for InMemoryAccountStore {
    fn insert(&self, mut account: Account) -> Result<Account> {
        let mut accounts = self.accounts()?;
        if accounts
            .values()
            .any(|a| a.account_number == account.account_number)
        {
            return Err(Error::DuplicateAccount);
        }
        account.id = Uuid::new_v4();
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    fn update(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts()?;
        if accounts
            .values()
            .any(|a| a.id != account.id && a.account_number == account.account_number)
        {
            return Err(Error::DuplicateAccount);
        }
        match accounts.get_mut(&account.id) {
            Some(slot) => {
                *slot = account.clone();
                Ok(())
            }
            None => Err(Error::not_found(account.id)),
        }
    }

    fn get(&self, id: Uuid) -> Result<Option<Account>> {
        Ok(self.accounts()?.get(&id).cloned())
    }

    fn find_by_account_number(&self, account_number: &str) -> Result<Option<Account>> {
        Ok(self
            .accounts()?
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Account>> {
        Ok(self.accounts()?.values().cloned().collect())
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.accounts()?.remove(&id).is_some())
    }
}
