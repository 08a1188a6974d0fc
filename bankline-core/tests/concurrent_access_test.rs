//! Concurrent account access tests
//!
//! Many threads hammer the same account through one shared service. Every
//! balance change must land exactly once.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use rust_decimal::Decimal;
use tempfile::TempDir;

use bankline_core::adapters::duckdb::DuckDbAccountStore;
use bankline_core::{AccountService, CreateAccount, Error};

/// Number of concurrent threads for stress tests
const THREAD_COUNT: usize = 6;

/// Number of iterations per thread
const ITERATIONS_PER_THREAD: usize = 10;

fn create_service(temp_dir: &TempDir) -> Arc<AccountService> {
    let db_path = temp_dir.path().join("test_concurrent.duckdb");
    let store = DuckDbAccountStore::new(&db_path).unwrap();
    store.ensure_schema().unwrap();
    Arc::new(AccountService::new(Arc::new(store)))
}

fn create_input(number: &str) -> CreateAccount {
    CreateAccount {
        account_holder_name: "Shared".to_string(),
        account_number: number.to_string(),
        account_type: "SAVINGS".to_string(),
        bank_name: "Harbour Bank".to_string(),
        branch_code: "HB-001".to_string(),
        ifsc_code: "HRBR0000001".to_string(),
        currency: "USD".to_string(),
        contact_email: "shared@example.com".to_string(),
        contact_phone: "5550002222".to_string(),
        address: "1 Dock St".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_concurrent_deposits_sum_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let service = create_service(&temp_dir);
    let id = service.create(&create_input("1000200030004000")).unwrap().id;

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let service = Arc::clone(&service);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS_PER_THREAD {
                    service.deposit(id, Decimal::new(125, 2)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let expected = Decimal::new(125, 2) * Decimal::from(THREAD_COUNT * ITERATIONS_PER_THREAD);
    assert_eq!(service.get_summary(id).unwrap().balance, expected);
}

#[test]
fn test_concurrent_withdrawals_never_overdraw() {
    let temp_dir = TempDir::new().unwrap();
    let service = create_service(&temp_dir);
    let id = service.create(&create_input("5000600070008000")).unwrap().id;

    // Enough for exactly half of the attempts
    let attempts = THREAD_COUNT * ITERATIONS_PER_THREAD;
    service
        .deposit(id, Decimal::from(attempts / 2))
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));
    let refused_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let service = Arc::clone(&service);
            let success_count = Arc::clone(&success_count);
            let refused_count = Arc::clone(&refused_count);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ITERATIONS_PER_THREAD {
                    match service.withdraw(id, Decimal::ONE) {
                        Ok(_) => {
                            success_count.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(Error::InsufficientBalance) => {
                            refused_count.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    println!(
        "Withdrawals: {} succeeded, {} refused",
        success_count.load(Ordering::SeqCst),
        refused_count.load(Ordering::SeqCst)
    );
    assert_eq!(success_count.load(Ordering::SeqCst), attempts / 2);
    assert_eq!(refused_count.load(Ordering::SeqCst), attempts - attempts / 2);
    assert_eq!(service.get_summary(id).unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_concurrent_creates_with_same_number() {
    let temp_dir = TempDir::new().unwrap();
    let service = create_service(&temp_dir);

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let service = Arc::clone(&service);
            thread::spawn(move || {
                barrier.wait();
                service.create(&create_input("4444333322221111"))
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    let created = results.iter().filter(|r| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Err(Error::DuplicateAccount)))
        .count();

    assert_eq!(created, 1);
    assert_eq!(duplicates, THREAD_COUNT - 1);
    assert_eq!(service.list_summaries().unwrap().len(), 1);
}
