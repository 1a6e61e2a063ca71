use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vela_nullables::NullTokenLedger;
use vela_staking::{RateSchedule, StakeLedger};
use vela_types::{AccountId, StakeAmount, Timestamp};

fn schedule_with_segments(n: usize) -> RateSchedule {
    let mut schedule = RateSchedule::new(100, Timestamp::new(0));
    for i in 1..n {
        schedule
            .set_rate(100 + i as u128, Timestamp::new(i as u64 * 1000))
            .unwrap();
    }
    schedule
}

fn bench_accrual_settlement(c: &mut Criterion) {
    let mut group = c.benchmark_group("accrual_settlement");
    let start = Timestamp::new(0);

    for segment_count in [1, 10, 100, 1000] {
        let schedule = schedule_with_segments(segment_count);
        let now = Timestamp::new(segment_count as u64 * 1000 + 500);

        group.bench_with_input(
            BenchmarkId::new("accrued_between", segment_count),
            &segment_count,
            |b, _| {
                b.iter(|| black_box(schedule.accrued_between(black_box(start), black_box(now))));
            },
        );
    }

    group.finish();
}

fn bench_deposit(c: &mut Criterion) {
    let user = AccountId::new("bench-user");

    c.bench_function("ledger_deposit", |b| {
        b.iter_batched(
            || StakeLedger::new(NullTokenLedger::new(), 100, Timestamp::new(0)),
            |mut ledger| {
                let _ = black_box(ledger.deposit(
                    &user,
                    StakeAmount::new(1_000),
                    Timestamp::new(10),
                ));
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_withdraw(c: &mut Criterion) {
    let user = AccountId::new("bench-user");

    c.bench_function("ledger_withdraw", |b| {
        b.iter_batched(
            || {
                let mut ledger = StakeLedger::new(NullTokenLedger::new(), 100, Timestamp::new(0));
                ledger
                    .deposit(&user, StakeAmount::new(1_000), Timestamp::new(0))
                    .unwrap();
                ledger
            },
            |mut ledger| {
                let _ = black_box(ledger.withdraw(&user, 0, Timestamp::new(10_000)));
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_rate_change(c: &mut Criterion) {
    c.bench_function("ledger_set_rate", |b| {
        b.iter_batched(
            || StakeLedger::new(NullTokenLedger::new(), 100, Timestamp::new(0)),
            |mut ledger| {
                for i in 1u64..=10 {
                    ledger
                        .set_rate(black_box(100 + i as u128), Timestamp::new(i * 1000))
                        .unwrap();
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_accrual_settlement,
    bench_deposit,
    bench_withdraw,
    bench_rate_change,
);
criterion_main!(benches);
