//! Integration tests for bankline-core
//!
//! These tests run the account service against a real DuckDB file in a
//! temporary directory.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use rust_decimal::Decimal;
use tempfile::TempDir;
use uuid::Uuid;

use bankline_core::adapters::duckdb::DuckDbAccountStore;
use bankline_core::ports::AccountStore;
use bankline_core::{AccountService, BanklineContext, CreateAccount, Error, UpdateAccount};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_input(name: &str, number: &str) -> CreateAccount {
    CreateAccount {
        account_holder_name: name.to_string(),
        account_number: number.to_string(),
        account_type: "CURRENT".to_string(),
        bank_name: "Harbour Bank".to_string(),
        branch_code: "HB-042".to_string(),
        ifsc_code: "HRBR0000042".to_string(),
        currency: "EUR".to_string(),
        contact_email: format!("{}@example.com", name.to_lowercase()),
        contact_phone: "5550001111".to_string(),
        address: "42 Quay Road".to_string(),
        ..Default::default()
    }
}

/// Open a service over a fresh database file
fn create_test_service(temp_dir: &TempDir) -> AccountService {
    let db_path = temp_dir.path().join("test.duckdb");
    let store = DuckDbAccountStore::new(&db_path).expect("Failed to open store");
    store.ensure_schema().expect("Failed to initialize schema");
    AccountService::new(Arc::new(store))
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_full_lifecycle_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let service = create_test_service(&temp_dir);

    let summary = service
        .create(&create_input("Alice", "1234567890123456"))
        .unwrap();
    assert_eq!(summary.masked_account_number, "**** **** **** 3456");
    assert_eq!(summary.balance, Decimal::ZERO);
    let id = summary.id;

    assert_eq!(service.deposit(id, dec(100)).unwrap().balance, dec(100));
    assert_eq!(service.withdraw(id, dec(40)).unwrap().balance, dec(60));
    assert!(matches!(
        service.withdraw(id, dec(1000)),
        Err(Error::InsufficientBalance)
    ));

    service.lock(id).unwrap();
    assert!(matches!(
        service.deposit(id, dec(10)),
        Err(Error::AccountUnavailable(_))
    ));
    assert_eq!(service.get_summary(id).unwrap().balance, dec(60));

    service.unlock(id).unwrap();
    service.set_active(id, false).unwrap();
    assert!(matches!(
        service.set_active(id, false),
        Err(Error::NoOpState { active: false })
    ));

    assert!(service.delete(id).unwrap());
    assert!(matches!(service.get_summary(id), Err(Error::NotFound(_))));
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let id = {
        let service = create_test_service(&temp_dir);
        let id = service.create(&create_input("Bob", "9999000011112222")).unwrap().id;
        service.deposit(id, Decimal::new(12_345, 2)).unwrap();
        service.lock(id).unwrap();
        service
            .update(
                id,
                &UpdateAccount {
                    overdraft_allowed: Some(true),
                    overdraft_limit: Some(Decimal::new(2_500, 1)),
                    ..Default::default()
                },
            )
            .unwrap();
        id
    };

    let service = create_test_service(&temp_dir);
    let details = service.get_details(id).unwrap();
    assert_eq!(details.balance, Decimal::new(12_345, 2));
    assert!(details.locked);
    assert!(details.active);
    assert!(details.overdraft_allowed);
    assert_eq!(details.overdraft_limit, Decimal::new(2_500, 1));
    assert!(details.last_transaction_at.is_some());
    assert!(details.updated_at >= details.created_at);
}

#[test]
fn test_duplicate_number_rejected_by_service_and_store() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("dupes.duckdb");
    let store = Arc::new(DuckDbAccountStore::new(&db_path).unwrap());
    store.ensure_schema().unwrap();
    let service = AccountService::new(Arc::clone(&store) as Arc<dyn AccountStore>);

    service.create(&create_input("Carol", "5555")).unwrap();
    assert!(matches!(
        service.create(&create_input("Dave", "5555")),
        Err(Error::DuplicateAccount)
    ));

    // Bypassing the service still hits the unique constraint
    let raw = bankline_core::Account::new("Eve", "5555", chrono::Utc::now());
    assert!(matches!(store.insert(raw), Err(Error::DuplicateAccount)));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_not_found_on_duckdb() {
    let temp_dir = TempDir::new().unwrap();
    let service = create_test_service(&temp_dir);
    let ghost = Uuid::new_v4();

    assert!(matches!(service.delete(ghost), Err(Error::NotFound(_))));
    assert!(matches!(service.lock(ghost), Err(Error::NotFound(_))));
}

// ============================================================================
// Context
// ============================================================================

#[test]
fn test_context_uses_configured_database_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{ "app": { "databaseFile": "custom.duckdb" } }"#,
    )
    .unwrap();

    let ctx = BanklineContext::new(temp_dir.path()).unwrap();
    ctx.account_service
        .create(&create_input("Frank", "77778888"))
        .unwrap();

    assert!(temp_dir.path().join("custom.duckdb").exists());
    assert_eq!(ctx.account_service.list_summaries().unwrap().len(), 1);
}

#[test]
fn test_migrations_are_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.duckdb");

    let store = DuckDbAccountStore::new(&db_path).unwrap();
    let first = store.run_migrations().unwrap();
    assert!(!first.applied.is_empty());

    let second = store.run_migrations().unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.already_applied, first.applied.len());
}
