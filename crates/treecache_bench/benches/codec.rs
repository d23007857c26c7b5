//! Payload codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use treecache_bench::batch_payload;
use treecache_codec::{decode_base64, decode_entries, encode_base64, JsonCodec, PayloadCodec};
use treecache_testkit::Dinosaur;

/// Benchmark parsing payload text into documents.
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let codec = JsonCodec::new();

    for count in [1, 10, 100] {
        let payload = batch_payload(count);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &payload, |b, payload| {
            b.iter(|| {
                let doc = codec.parse(black_box(payload)).unwrap();
                black_box(doc);
            });
        });
    }

    group.finish();
}

/// Benchmark typed keyed-collection decoding.
fn bench_decode_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_entries");
    let codec = JsonCodec::new();

    for count in [10, 100] {
        let payload = batch_payload(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &payload, |b, payload| {
            b.iter(|| {
                let entries = decode_entries::<Dinosaur, _>(&codec, black_box(payload)).unwrap();
                black_box(entries);
            });
        });
    }

    group.finish();
}

/// Benchmark base64 leaves.
fn bench_base64(c: &mut Criterion) {
    let mut group = c.benchmark_group("base64");

    for size in [64, 4096] {
        let text = encode_base64(&vec![0xAB; size]);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                let bytes = decode_base64(black_box(text)).unwrap();
                black_box(bytes);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_decode_entries, bench_base64);
criterion_main!(benches);
