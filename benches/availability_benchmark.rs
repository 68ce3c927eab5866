use car_rental::availability::{is_available_for_range, recompute_availability};
use car_rental::catalog::{seed_catalog, CatalogStore};
use car_rental::ledger::{BookingRecord, BookingStatus, CustomerProfile};
use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{thread_rng, Rng};

fn sample_customer() -> CustomerProfile {
    CustomerProfile {
        full_name: "Juan Dela Cruz".to_string(),
        email: "juan@example.com".to_string(),
        phone: "09171234567".to_string(),
        address: "123 Rizal St, Makati".to_string(),
        license_number: "N01-23-456789".to_string(),
        license_expiry: "2027-01-31".parse().unwrap(),
    }
}

// Build a ledger of `count` rentals spread across the fleet and a year of
// pickup dates.
fn build_ledger(count: usize) -> Vec<BookingRecord> {
    let mut rng = thread_rng();
    let base: NaiveDate = "2024-01-01".parse().unwrap();

    (0..count)
        .map(|i| {
            let pickup = base + Duration::days(rng.gen_range(0..365));
            let ret = pickup + Duration::days(rng.gen_range(1..=14));
            BookingRecord {
                confirmation_number: format!("CR-BENCH-{}", i),
                vehicle_id: rng.gen_range(1..=8),
                pickup_date: pickup,
                return_date: ret,
                pickup_location: "Makati Branch".to_string(),
                services: Vec::new(),
                total_cost: 6000,
                customer: sample_customer(),
                payment_method: "cash".to_string(),
                status: BookingStatus::Confirmed,
                created_at: Utc::now(),
            }
        })
        .collect()
}

pub fn availability_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("availability");

    for ledger_size in [100, 1_000, 10_000].iter() {
        let catalog = CatalogStore::new(seed_catalog());
        let ledger = build_ledger(*ledger_size);
        let as_of: NaiveDate = "2024-06-01".parse().unwrap();
        recompute_availability(&catalog, &[], as_of);

        group.bench_with_input(
            BenchmarkId::new("range_query", ledger_size),
            ledger_size,
            |b, _| {
                let mut rng = thread_rng();
                b.iter(|| {
                    let pickup = as_of + Duration::days(rng.gen_range(0..200));
                    let ret = pickup + Duration::days(rng.gen_range(1..=14));
                    black_box(is_available_for_range(
                        &catalog,
                        rng.gen_range(1..=8),
                        pickup,
                        ret,
                        &ledger,
                    ))
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("coarse_recompute", ledger_size),
            ledger_size,
            |b, _| {
                b.iter(|| {
                    recompute_availability(&catalog, black_box(&ledger), as_of);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, availability_benchmark);
criterion_main!(benches);
