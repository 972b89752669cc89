use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use expense_core::ledger::{Ledger, MonthKey, SortKey, Transaction};

const CATEGORIES: [&str; 5] = ["Food", "Bills", "Transport", "Entertainment", "Other"];

fn busy_month(count: usize) -> (Ledger, MonthKey) {
    let month = MonthKey::new(2024, 3).expect("valid month");
    let mut ledger = Ledger::new();
    for i in 0..count {
        let day = (i % 28) as u32 + 1;
        let moment = NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|date| date.and_hms_opt((i % 24) as u32, (i % 60) as u32, 0))
            .expect("valid moment");
        let amount = ((i * 37) % 500) as f64 + 0.99;
        let txn = Transaction::at(moment, format!("Entry {i}"), amount, CATEGORIES[i % 5])
            .with_recurring(i % 10 == 0);
        ledger.add_transaction(month, txn).expect("valid transaction");
    }
    (ledger, month)
}

fn sorted_views(c: &mut Criterion) {
    let (ledger, month) = busy_month(2_000);
    for key in SortKey::ALL {
        c.bench_function(&format!("sorted_view_{}", key), |b| {
            b.iter(|| black_box(ledger.sorted_view(month, key).len()))
        });
    }
}

fn totals_and_rollover(c: &mut Criterion) {
    let (ledger, month) = busy_month(2_000);
    c.bench_function("month_total", |b| {
        b.iter(|| black_box(ledger.month_total(month)))
    });
    c.bench_function("rollover_to_next_month", |b| {
        b.iter_with_setup(
            || ledger.clone(),
            |mut copy| black_box(copy.rollover_to_next_month(month)),
        )
    });
}

criterion_group!(benches, sorted_views, totals_and_rollover);
criterion_main!(benches);
