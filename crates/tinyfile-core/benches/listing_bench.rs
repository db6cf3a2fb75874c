//! Criterion benchmarks for listing and header parsing.
//!
//! Run with:
//! ```bash
//! cargo bench --package tinyfile-core --bench listing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tinyfile_core::{encode_listing, parse_listing, DirectoryEntry, HeaderLine, ResponseHeaders};

fn make_entries(count: usize) -> Vec<DirectoryEntry> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                DirectoryEntry::new(format!("file_{i}.txt"), "", (i * 10).to_string())
            } else {
                DirectoryEntry::new(format!("image_{i}.png"), "image/png", (i * 1000).to_string())
            }
        })
        .collect()
}

/// Encodes a listing and returns only the entry block (no header, no terminator).
fn make_block(count: usize) -> Vec<u8> {
    let bytes = encode_listing(&make_entries(count));
    let start = bytes.iter().position(|&b| b == b'\n').map_or(0, |p| p + 1);
    bytes[start..bytes.len() - 2].to_vec()
}

fn bench_parse_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_listing");
    for count in [10usize, 1_000, 10_000] {
        let block = make_block(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &block, |b, block| {
            b.iter(|| parse_listing(black_box(block)))
        });
    }
    group.finish();
}

fn bench_response_headers(c: &mut Criterion) {
    let lines: [&[u8]; 4] = [b"TYPE image/png\n", b"X-EXTRA 1\n", b"SIZE 1048576\n", b"\n"];
    c.bench_function("response_headers", |b| {
        b.iter(|| {
            let mut headers = ResponseHeaders::new();
            for line in black_box(&lines) {
                if headers.feed(line).unwrap() == HeaderLine::End {
                    break;
                }
            }
            headers.finish().unwrap()
        })
    });
}

criterion_group!(benches, bench_parse_listing, bench_response_headers);
criterion_main!(benches);
