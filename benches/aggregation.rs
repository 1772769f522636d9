//! Benchmarks for the ingestion buffer and the aggregation engine

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use service_pulse::aggregation::aggregate;
use service_pulse::buffer::EventBuffer;
use service_pulse::models::{AggregationQuery, MetricEvent, Severity, TimeRange};
use uuid::Uuid;

fn create_event(i: usize) -> MetricEvent {
    let services = ["checkout", "billing", "search", "auth", "catalog"];
    MetricEvent {
        id: Uuid::new_v4(),
        service_name: services[i % services.len()].to_string(),
        severity: if i % 17 == 0 {
            Severity::Critical
        } else {
            Severity::Low
        },
        timestamp: Utc::now() - Duration::seconds((i % 300) as i64),
        response_time_ms: (i % 250) as f64 + 1.0,
        status_code: if i % 11 == 0 { 500 } else { 200 },
        request_count: 1 + (i % 3) as u64,
        cpu_usage_pct: Some((i % 100) as f64),
        mem_usage_pct: None,
    }
}

fn bench_buffer_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_push");
    group.throughput(Throughput::Elements(1000));

    group.bench_function("push_1000_events", |b| {
        b.iter(|| {
            let buffer = EventBuffer::new(100_000);
            for i in 0..1000 {
                let _ = buffer.try_push(black_box(create_event(i)));
            }
        });
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [1_000usize, 10_000] {
        let events: Vec<MetricEvent> = (0..size).map(create_event).collect();
        let query = AggregationQuery {
            time_range: Some(TimeRange::Last10m),
            ..Default::default()
        };
        let now = Utc::now();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_function(format!("aggregate_{}_events", size), |b| {
            b.iter(|| aggregate(black_box(&events), black_box(&query), now));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_buffer_push, bench_aggregate);
criterion_main!(benches);
