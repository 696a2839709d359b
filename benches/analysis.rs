//! Benchmarks for rapport parsing and analysis.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench analysis -- parse`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use rapport::metrics;
use rapport::parser::{Parser, Platform, create_parser};
use rapport::scanner;

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_messenger_json(count: usize) -> String {
    let phrases = [
        "hej co tam u ciebie słychać?",
        "wszystko dobrze, jutro pojedziemy nad jezioro",
        "kocham cię i strasznie tęsknię wieczorami",
        "z jednej strony racja, z drugiej strony wątpię",
        "no dobra, to ustalimy szczegóły później",
    ];
    let mut messages = Vec::with_capacity(count);
    for i in (0..count).rev() {
        let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
        let timestamp = 1_700_000_000_000i64 + (i as i64 * 180_000);
        messages.push(format!(
            r#"{{"sender_name": "{}", "timestamp_ms": {}, "content": "{}"}}"#,
            sender,
            timestamp,
            phrases[i % phrases.len()]
        ));
    }
    format!(
        r#"{{"participants": [{{"name": "Ala"}}, {{"name": "Bartek"}}], "messages": [{}], "title": "Ala"}}"#,
        messages.join(",")
    )
}

fn generate_whatsapp_txt(count: usize) -> String {
    let mut lines = Vec::with_capacity(count);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
        let day = 1 + (i / 1440) % 28;
        let hour = (i / 60) % 24;
        let minute = i % 60;
        lines.push(format!(
            "{:02}.01.2024, {:02}:{:02} - {}: wiadomość numer {}",
            day, hour, minute, sender, i
        ));
    }
    lines.join("\n")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &count in &[1_000usize, 10_000] {
        let messenger = generate_messenger_json(count);
        group.throughput(Throughput::Bytes(messenger.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("messenger", count),
            &messenger,
            |b, input| {
                let parser = create_parser(Platform::Messenger);
                b.iter(|| parser.parse_str(black_box(input)).unwrap());
            },
        );

        let whatsapp = generate_whatsapp_txt(count);
        group.throughput(Throughput::Bytes(whatsapp.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("whatsapp", count),
            &whatsapp,
            |b, input| {
                let parser = create_parser(Platform::WhatsApp);
                b.iter(|| parser.parse_str(black_box(input)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");
    group.sample_size(20);

    for &count in &[1_000usize, 10_000] {
        let conv = create_parser(Platform::Messenger)
            .parse_str(&generate_messenger_json(count))
            .unwrap();
        group.bench_with_input(BenchmarkId::new("full", count), &conv, |b, conv| {
            b.iter(|| metrics::analyze(black_box(conv)));
        });
    }

    group.finish();
}

fn bench_deep_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_scan");
    group.sample_size(20);

    // The scanner has a 500 ms budget on a 50k corpus; keep an eye on it.
    let conv = create_parser(Platform::Messenger)
        .parse_str(&generate_messenger_json(50_000))
        .unwrap();
    group.bench_function("50k", |b| {
        b.iter(|| scanner::scan(black_box(&conv)));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_metrics, bench_deep_scan);
criterion_main!(benches);
