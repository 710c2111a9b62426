//! Criterion benchmarks for the rolling-window calculator.
//!
//! Synthetic claim histories: many members with a few dozen ED and PCP
//! visits each, spread over three years.

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ct_common::{Event, EventType};
use ct_core::{rolling_counts, rolling_counts_parallel};

fn synthetic_events(members: u32, per_member: u32) -> Vec<Event> {
    let base = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let mut events = Vec::with_capacity((members * per_member) as usize);
    for m in 0..members {
        for i in 0..per_member {
            let x = (u64::from(m) * 31 + u64::from(i))
                .wrapping_mul(1_664_525)
                .wrapping_add(1_013_904_223);
            let day = base + Duration::days((x % 1_095) as i64);
            let kind = if i % 3 == 0 {
                EventType::PcpVisit
            } else {
                EventType::EdVisit
            };
            events.push(Event::new(format!("member-{m:06}"), kind, day, day));
        }
    }
    events
}

fn bench_rolling_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("rolling_window");
    for members in [1_000u32, 10_000] {
        let events = synthetic_events(members, 24);
        group.throughput(Throughput::Elements(events.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", members),
            &events,
            |b, events| b.iter(|| black_box(rolling_counts(black_box(events), 364).len())),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel_4", members),
            &events,
            |b, events| {
                b.iter(|| black_box(rolling_counts_parallel(black_box(events), 364, 4).len()))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_rolling_window);
criterion_main!(benches);
