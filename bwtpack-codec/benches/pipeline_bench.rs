//! Throughput benchmarks for the bwtpack pipeline.
//!
//! Covers each transform stage on its own, whole-stream compression and
//! decompression across data patterns, and the effect of the BWT chunk size.

use bwtpack_codec::{CodecConfig, bwt, compress, decompress, huffman, mtf, rle};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

#[cfg(feature = "parallel")]
use bwtpack_codec::compress_parallel;

type PatternGenerator = fn(usize) -> Vec<u8>;

mod test_data {
    pub fn uniform(size: usize) -> Vec<u8> {
        vec![0xAA; size]
    }

    pub fn random(size: usize) -> Vec<u8> {
        let mut seed: u64 = 0x123456789ABCDEF0;
        (0..size)
            .map(|_| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
                (seed >> 32) as u8
            })
            .collect()
    }

    pub fn text_like(size: usize) -> Vec<u8> {
        let words: &[&[u8]] = &[
            b"the", b"quick", b"brown", b"fox", b"jumps", b"over", b"lazy", b"dog", b"and",
            b"runs", b"through", b"forest", b"near", b"river", b"under", b"blue", b"sky",
        ];
        let mut data = Vec::with_capacity(size);
        let mut seed = 42u32;
        while data.len() < size {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            data.extend_from_slice(words[(seed as usize) % words.len()]);
            data.push(b' ');
        }
        data.truncate(size);
        data
    }

    /// Short runs of a few symbols, the shape MTF output usually has.
    pub fn runs(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut seed = 7u32;
        while data.len() < size {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            let len = 1 + (seed >> 16) as usize % 40;
            data.extend(std::iter::repeat_n((seed >> 8) as u8 % 4, len));
        }
        data.truncate(size);
        data
    }
}

const PATTERNS: [(&str, PatternGenerator); 4] = [
    ("uniform", test_data::uniform),
    ("random", test_data::random),
    ("text", test_data::text_like),
    ("runs", test_data::runs),
];

const SIZE: usize = 256 * 1024;

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let data = test_data::text_like(SIZE);
    let config = CodecConfig::default();
    let (transformed, indices) = bwt::transform_block(&data, &config);
    let ranks = mtf::transform(&transformed);
    let tokens = rle::encode(&ranks);
    let (table, payload) = huffman::compress(&tokens).unwrap();

    group.throughput(Throughput::Bytes(SIZE as u64));
    group.bench_function("bwt_forward", |b| {
        b.iter(|| bwt::transform_block(black_box(&data), &config))
    });
    group.bench_function("bwt_inverse", |b| {
        b.iter(|| bwt::inverse_block(black_box(&transformed), &indices, &config).unwrap())
    });
    group.bench_function("mtf_forward", |b| {
        b.iter(|| mtf::transform(black_box(&transformed)))
    });
    group.bench_function("mtf_inverse", |b| {
        b.iter(|| mtf::inverse_transform(black_box(&ranks)))
    });
    group.bench_function("rle_encode", |b| b.iter(|| rle::encode(black_box(&ranks))));
    group.bench_function("rle_decode", |b| {
        b.iter(|| rle::decode(black_box(&tokens)).unwrap())
    });
    group.bench_function("huffman_encode", |b| {
        b.iter(|| huffman::compress(black_box(&tokens)).unwrap())
    });
    group.bench_function("huffman_decode", |b| {
        b.iter(|| huffman::decode(black_box(&payload), &table).unwrap())
    });

    group.finish();
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    let config = CodecConfig::default();

    for (name, generator) in PATTERNS {
        let data = generator(SIZE);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| compress(black_box(data), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    let config = CodecConfig::default();

    for (name, generator) in PATTERNS {
        let stream = compress(&generator(SIZE), &config).unwrap();
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &stream, |b, stream| {
            b.iter(|| decompress(black_box(stream), &config).unwrap())
        });
    }

    group.finish();
}

fn bench_chunk_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_size");
    group.sample_size(10);
    let data = test_data::text_like(SIZE);

    for chunk_size in [256, 1024, 4096, 16384] {
        let config = CodecConfig::default().with_chunk_size(chunk_size);
        group.throughput(Throughput::Bytes(SIZE as u64));
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &data, |b, data| {
            b.iter(|| compress(black_box(data), &config).unwrap())
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_parallel_vs_serial(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel_vs_serial");
    let config = CodecConfig::default();

    for (name, size) in [("1MB", 1024 * 1024), ("4MB", 4 * 1024 * 1024)] {
        let data = test_data::text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("serial", name), &data, |b, data| {
            b.iter(|| compress(black_box(data), &config).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("parallel", name), &data, |b, data| {
            b.iter(|| compress_parallel(black_box(data), &config).unwrap())
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
criterion_group!(
    benches,
    bench_stages,
    bench_compress,
    bench_decompress,
    bench_chunk_size,
    bench_parallel_vs_serial,
);

#[cfg(not(feature = "parallel"))]
criterion_group!(
    benches,
    bench_stages,
    bench_compress,
    bench_decompress,
    bench_chunk_size,
);

criterion_main!(benches);
