//! Account service - lifecycle and balance operations
//!
//! The only place that enforces account business rules. Every mutation is
//! a fetch-check-persist cycle run while holding that account's lock, so
//! concurrent deposits and withdrawals on one account never lose updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::{Error, Result, UnavailableReason};
use crate::domain::{Account, AccountDetails, AccountSummary, CreateAccount, UpdateAccount};
use crate::mapper;
use crate::ports::AccountStore;

/// Registry of per-account mutexes
///
/// Entries are created on first use. Operations on different accounts
/// never contend.
#[derive(Default)]
struct AccountLocks {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl AccountLocks {
    fn handle(&self, id: Uuid) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))?;
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    fn forget(&self, id: Uuid) {
        if let Ok(mut locks) = self.locks.lock() {
            locks.remove(&id);
        }
    }
}

/// Service for account lifecycle operations
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    locks: AccountLocks,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            locks: AccountLocks::default(),
        }
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn fetch(&self, id: Uuid) -> Result<Account> {
        self.store.get(id)?.ok_or_else(|| Error::not_found(id))
    }

    /// Run `f` on the current record while holding the account's lock,
    /// then persist the record if `f` succeeded
    ///
    /// Ids with no account behind them do not keep a registry entry.
    fn mutate<T>(&self, id: Uuid, f: impl FnOnce(&mut Account) -> Result<T>) -> Result<T> {
        let handle = self.locks.handle(id)?;
        let result = {
            let _guard = handle
                .lock()
                .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))?;

            self.fetch(id).and_then(|mut account| {
                let out = f(&mut account)?;
                self.check(&account)?;
                self.store.update(&account)?;
                Ok(out)
            })
        };

        if matches!(result, Err(Error::NotFound(_))) {
            self.locks.forget(id);
        }
        result
    }

    fn check(&self, account: &Account) -> Result<()> {
        account
            .validate(self.now().date_naive())
            .map_err(Error::validation)
    }

    // =========================================================================
    // Creation and reads
    // =========================================================================

    /// Open a new account with system defaults
    ///
    /// Status, lock state and balance from the caller are never honoured.
    pub fn create(&self, input: &CreateAccount) -> Result<AccountSummary> {
        let account = mapper::from_create_input(input, self.now());
        self.check(&account)?;

        if self
            .store
            .find_by_account_number(&account.account_number)?
            .is_some()
        {
            return Err(Error::DuplicateAccount);
        }

        let stored = self.store.insert(account)?;
        Ok(mapper::to_summary(&stored))
    }

    pub fn get_summary(&self, id: Uuid) -> Result<AccountSummary> {
        Ok(mapper::to_summary(&self.fetch(id)?))
    }

    pub fn get_details(&self, id: Uuid) -> Result<AccountDetails> {
        Ok(mapper::to_details(&self.fetch(id)?))
    }

    pub fn list_summaries(&self) -> Result<Vec<AccountSummary>> {
        Ok(self.store.list()?.iter().map(mapper::to_summary).collect())
    }

    pub fn list_details(&self) -> Result<Vec<AccountDetails>> {
        Ok(self.store.list()?.iter().map(mapper::to_details).collect())
    }

    // =========================================================================
    // Balance operations
    // =========================================================================

    /// Credit an account
    ///
    /// Requires a positive amount and an active, unlocked account.
    pub fn deposit(&self, id: Uuid, amount: Decimal) -> Result<AccountSummary> {
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_amount(
                "Deposit amount must be greater than zero.",
            ));
        }

        let now = self.now();
        self.mutate(id, |account| {
            if !account.is_active() {
                return Err(Error::AccountUnavailable(UnavailableReason::Inactive));
            }
            if account.is_locked() {
                return Err(Error::AccountUnavailable(UnavailableReason::Locked));
            }
            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or_else(|| Error::invalid_amount("Deposit would overflow the balance."))?;
            account.record_transaction(now);
            Ok(mapper::to_summary(account))
        })
    }

    /// Debit an account
    ///
    /// Only the current balance limits a withdrawal. Overdraft settings and
    /// the active/locked flags are not consulted.
    pub fn withdraw(&self, id: Uuid, amount: Decimal) -> Result<AccountSummary> {
        if amount <= Decimal::ZERO {
            return Err(Error::invalid_amount(
                "Withdrawal amount must be greater than zero.",
            ));
        }

        let now = self.now();
        self.mutate(id, |account| {
            if account.balance < amount {
                return Err(Error::InsufficientBalance);
            }
            account.balance = account
                .balance
                .checked_sub(amount)
                .ok_or_else(|| Error::invalid_amount("Withdrawal would overflow the balance."))?;
            account.record_transaction(now);
            Ok(mapper::to_summary(account))
        })
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Apply a partial update
    pub fn update(&self, id: Uuid, input: &UpdateAccount) -> Result<AccountDetails> {
        if let Some(limit) = input.overdraft_limit {
            if limit < Decimal::ZERO {
                return Err(Error::validation("Overdraft limit must be zero or positive"));
            }
        }

        let now = self.now();
        self.mutate(id, |account| {
            mapper::apply_update(account, input, now);
            Ok(mapper::to_details(account))
        })
    }

    /// Permanently remove an account
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let handle = self.locks.handle(id)?;
        let deleted = {
            let _guard = handle
                .lock()
                .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))?;
            self.store.delete(id)?
        };

        self.locks.forget(id);
        if !deleted {
            return Err(Error::not_found(id));
        }
        Ok(true)
    }

    pub fn lock(&self, id: Uuid) -> Result<()> {
        let now = self.now();
        self.mutate(id, |account| {
            if account.is_locked() {
                return Err(Error::AlreadyLocked);
            }
            account.state.locked = true;
            account.touch(now);
            Ok(())
        })
    }

    pub fn unlock(&self, id: Uuid) -> Result<()> {
        let now = self.now();
        self.mutate(id, |account| {
            if !account.is_locked() {
                return Err(Error::AlreadyUnlocked);
            }
            account.state.locked = false;
            account.touch(now);
            Ok(())
        })
    }

    /// Activate or deactivate; setting the current value is an error
    pub fn set_active(&self, id: Uuid, active: bool) -> Result<()> {
        let now = self.now();
        self.mutate(id, |account| {
            if account.is_active() == active {
                return Err(Error::NoOpState { active });
            }
            account.state.active = active;
            account.touch(now);
            Ok(())
        })
    }
}
