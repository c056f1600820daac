//! Benchmarks for reservation pricing and report shaping
//!
//! Run with: cargo bench --package flota-api
//!
//! These benchmarks measure cost calculations and data transformations
//! (not database queries).

use chrono::{NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flota_api::dto::ReservationResponse;
use flota_core::models::{Reservation, ReservationWithRate};
use rust_decimal::Decimal;

/// Create a mock reservation for benchmarking
fn create_mock_reservation(i: i32, with_extras: bool) -> Reservation {
    let rental_date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    Reservation {
        id: i,
        reservation_number: 100_000 + i,
        customer_id: 1 + i % 40,
        vehicle_id: 1 + i % 12,
        rental_date,
        return_date: rental_date + chrono::Days::new(1 + (i % 9) as u64),
        rental_days: if i % 3 == 0 { Some(1 + i % 9) } else { None },
        // Every other booking falls back to the vehicle rate
        daily_rate: if i % 2 == 0 {
            Some(Decimal::new(10_000 + i64::from(i % 50) * 100, 2))
        } else {
            None
        },
        rate_type: None,
        insurance_vehicle: if with_extras {
            Some(Decimal::new(5_000, 2))
        } else {
            None
        },
        insurance_third_party: if with_extras {
            Some(Decimal::new(2_500, 2))
        } else {
            None
        },
        tax_amount: if with_extras {
            Some(Decimal::new(2_000, 2))
        } else {
            None
        },
        damage_description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Benchmark a single cost breakdown
fn bench_cost_breakdown(c: &mut Criterion) {
    let reservation = create_mock_reservation(1, true);
    let vehicle_rate = Some(Decimal::new(8_050, 2));

    c.bench_function("reservation_cost_breakdown", |b| {
        b.iter(|| {
            let _breakdown = black_box(&reservation).cost_breakdown(black_box(vehicle_rate));
        });
    });
}

/// Benchmark reservation to response conversion
fn bench_response_conversion(c: &mut Criterion) {
    let reservation = create_mock_reservation(1, true);

    c.bench_function("reservation_to_response_conversion", |b| {
        b.iter(|| {
            let _response = ReservationResponse::from(black_box(reservation.clone()));
        });
    });
}

/// Benchmark bulk conversion for list endpoints
fn bench_bulk_response_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("bulk_response_conversion");

    for size in [100, 1_000, 10_000].iter() {
        let reservations: Vec<Reservation> = (0..*size)
            .map(|i| create_mock_reservation(i, i % 2 == 0))
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _responses: Vec<ReservationResponse> = black_box(&reservations)
                    .iter()
                    .cloned()
                    .map(ReservationResponse::from)
                    .collect();
            });
        });
    }

    group.finish();
}

/// Benchmark the detailed monthly aggregation fold
fn bench_monthly_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("monthly_aggregation");

    for size in [100, 1_000, 10_000, 100_000].iter() {
        let entries: Vec<ReservationWithRate> = (0..*size)
            .map(|i| ReservationWithRate {
                reservation: create_mock_reservation(i, i % 4 != 0),
                vehicle_rate: Some(Decimal::new(9_000, 2)),
            })
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut base = Decimal::ZERO;
                let mut insurance = Decimal::ZERO;
                let mut tax = Decimal::ZERO;
                for entry in black_box(&entries) {
                    let breakdown = entry.cost_breakdown();
                    base += breakdown.base;
                    insurance += breakdown.insurance;
                    tax += breakdown.tax;
                }
                let _total = base + insurance + tax;
            });
        });
    }

    group.finish();
}

/// Benchmark JSON serialization of list responses
fn bench_json_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_serialization");

    for size in [10, 100, 1_000].iter() {
        let responses: Vec<ReservationResponse> = (0..*size)
            .map(|i| ReservationResponse::from(create_mock_reservation(i, true)))
            .collect();

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let _json = serde_json::to_string(black_box(&responses)).unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cost_breakdown,
    bench_response_conversion,
    bench_bulk_response_conversion,
    bench_monthly_aggregation,
    bench_json_serialization
);

criterion_main!(benches);
