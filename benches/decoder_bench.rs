//! Performance benchmarks for FrameDecoder.
//!
//! A reader at 9600 baud delivers at most ~60 frames per second, so these
//! numbers mostly guard against accidental regressions in the hot loop.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench decoder_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use latch_core::TagIdentifier;
use latch_protocol::{FrameDecoder, encode_valid_frame};
use std::hint::black_box;

fn sample_tag() -> TagIdentifier {
    TagIdentifier::new([0x01, 0x04, 0xF5, 0xB5, 0x22])
}

/// Benchmark decoding a single well-formed frame.
fn bench_decode_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_single");
    group.throughput(Throughput::Elements(1));

    let wire = encode_valid_frame(&sample_tag());

    group.bench_function("decode_valid_frame", |b| {
        b.iter(|| {
            let mut decoder = FrameDecoder::new();
            let frame = black_box(&wire).iter().find_map(|&byte| decoder.push(byte));
            black_box(frame);
        });
    });

    group.finish();
}

/// Benchmark a stream of back-to-back frames with noise between them.
fn bench_decode_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_stream");

    for frames in [10usize, 100, 1000] {
        let mut wire = Vec::new();
        for i in 0..frames {
            wire.extend_from_slice(b"\r\n");
            wire.extend(encode_valid_frame(&TagIdentifier::new([i as u8, 0x04, 0xF5, 0xB5, 0x22])));
        }

        group.throughput(Throughput::Elements(frames as u64));
        group.bench_with_input(BenchmarkId::from_parameter(frames), &wire, |b, wire| {
            b.iter(|| {
                let mut decoder = FrameDecoder::new();
                let decoded = wire.iter().filter_map(|&byte| decoder.push(byte)).count();
                black_box(decoded);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode_single, bench_decode_stream);

criterion_main!(benches);
