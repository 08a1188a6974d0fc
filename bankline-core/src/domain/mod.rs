//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
mod input;
mod user;
mod views;
pub mod result;

pub use account::{start_of_day, Account, AccountState, DEFAULT_ACCOUNT_STATUS};
pub use input::{CreateAccount, UpdateAccount};
pub use user::UserId;
pub use views::{AccountDetails, AccountSummary};
