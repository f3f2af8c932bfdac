//! Benchmark suite for card operations
//!
//! Measures the validator and a full store round-trip using the divan
//! benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use card_vault::core::validator;
use card_vault::{CardRecord, CardService, ChargeConfig, ChargeService, JsonFileStore};
use chrono::NaiveDate;
use tempfile::TempDir;

fn main() {
    divan::main();
}

fn card(username: &str) -> CardRecord {
    CardRecord::new(
        username,
        "4532 0151 1283 0366",
        NaiveDate::from_ymd_opt(2040, 12, 31).expect("valid date"),
    )
}

/// Benchmark normalization plus Luhn checksum of a formatted number
#[divan::bench]
fn luhn_formatted_number() -> bool {
    validator::luhn_valid(&validator::normalize_number(divan::black_box(
        "4532 0151 1283 0366",
    )))
}

/// Benchmark a save followed by a load against stores of growing size
#[divan::bench(args = [10, 100, 1000])]
fn save_and_load(bencher: divan::Bencher, existing: usize) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let service = CardService::new(
        JsonFileStore::new(dir.path().join("cards.json")),
        ChargeService::simulated(&ChargeConfig::default()),
    );
    for i in 0..existing {
        service
            .save_for_user(&card(&format!("user-{}", i)))
            .expect("Seeding failed");
    }

    let record = card("bench-user");
    bencher.bench_local(|| {
        service.save_for_user(&record).expect("Save failed");
        service.load_for_user("bench-user").expect("Load failed")
    });
}
