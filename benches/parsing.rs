//! Benchmarks for chatvault parsing and hashing.
//!
//! Run with: `cargo bench`
//! Run specific group: `cargo bench --bench parsing -- splitter`

use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chatvault::archive::hash_stream;
use chatvault::parsing::parse_block;
use chatvault::streaming::BlockSplitter;

// =============================================================================
// Test Data Generators
// =============================================================================

fn generate_transcript(count: usize) -> String {
    let mut lines = Vec::with_capacity(count * 2);
    for i in 0..count {
        let sender = if i % 2 == 0 { "Alice" } else { "Bob" };
        let hour = i % 12 + 1;
        let minute = i % 60;
        match i % 5 {
            // Attachment entry
            0 => lines.push(format!(
                "9/4/23, {hour}:{minute:02} - {sender}: IMG-{i:08}.jpg (file attached)"
            )),
            // Multi-line entry
            1 => lines.push(format!(
                "9/4/23, {hour}:{minute:02} - {sender}: first line {i}\nsecond line\nthird line"
            )),
            _ => lines.push(format!(
                "9/4/23, {hour}:{minute:02} - {sender}: message number {i}"
            )),
        }
    }
    lines.join("\n")
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitter");

    for count in [100, 1_000, 10_000] {
        let transcript = generate_transcript(count);
        group.throughput(Throughput::Bytes(transcript.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &transcript,
            |b, transcript| {
                b.iter(|| {
                    let blocks: Vec<_> = BlockSplitter::new(Cursor::new(transcript.as_bytes()))
                        .collect::<Result<_, _>>()
                        .unwrap();
                    black_box(blocks)
                });
            },
        );
    }

    group.finish();
}

fn bench_parse_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_pipeline");

    for count in [100, 1_000, 10_000] {
        let transcript = generate_transcript(count);
        group.throughput(Throughput::Bytes(transcript.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &transcript,
            |b, transcript| {
                b.iter(|| {
                    let entries: Vec<_> = BlockSplitter::new(Cursor::new(transcript.as_bytes()))
                        .map(|block| parse_block(&block.unwrap()).entry)
                        .collect();
                    black_box(entries)
                });
            },
        );
    }

    group.finish();
}

fn bench_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("hashing");

    for size in [16 * 1024, 256 * 1024, 4 * 1024 * 1024] {
        let data = vec![0xabu8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| black_box(hash_stream(&mut data.as_slice(), u64::MAX).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_splitter, bench_parse_pipeline, bench_hashing);
criterion_main!(benches);
