//! Benchmarks for hashing, the byte codec, Merkle growth and the PoW check

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use ledger_core::buf::{FixedBuf, Hash32};
use ledger_core::compucha::CompuchaChallenge;
use ledger_core::hash::{Blake3, HashFunction, Sha3};
use ledger_core::merkle::MerkleNode;
use ledger_core::number::*;
use ledger_core::reader::BufReader;
use ledger_core::writer::BufWriter;

fn bench_hashing(c: &mut Criterion) {
    let data = [0x42u8; 64];

    c.bench_function("blake3_double_hash", |b| {
        b.iter(|| black_box(Blake3::double_hash(black_box(&data))));
    });

    c.bench_function("sha3_double_hash", |b| {
        b.iter(|| black_box(Sha3::double_hash(black_box(&data))));
    });
}

fn bench_var_int(c: &mut Criterion) {
    let values = [7u64, 0x1234, 0x12345678, 0x123456789abc];

    c.bench_function("write_var_int", |b| {
        b.iter(|| {
            let mut writer = BufWriter::new();
            for value in values {
                writer.write_var_int(&U64::new(black_box(value)));
            }
            black_box(writer.to_buf());
        });
    });

    let mut writer = BufWriter::new();
    for value in values {
        writer.write_var_int(&U64::new(value));
    }
    let buf = writer.to_buf();

    c.bench_function("read_var_int", |b| {
        b.iter(|| {
            let mut reader = BufReader::new(black_box(&buf));
            while !reader.eof() {
                black_box(reader.read_var_int().unwrap());
            }
        });
    });
}

fn bench_merkle(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_add_leaves");
    for count in [16usize, 256, 1024] {
        let leaves: Vec<Hash32> = (0..count).map(|i| FixedBuf::alloc(i as u8))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &leaves,
                               |b, leaves| {
            b.iter(|| {
                black_box(MerkleNode::<Blake3>::empty().add_leaves(leaves)
                              .unwrap());
            });
        });
    }
    group.finish();

    let leaves: Vec<Hash32> = (0..1000).map(|i| FixedBuf::alloc(i as u8))
        .collect();
    let tree = MerkleNode::<Blake3>::from_leaf_hashes(&leaves);
    c.bench_function("merkle_update_leaf_at", |b| {
        b.iter(|| {
            black_box(tree.update_leaf_at(black_box(500), FixedBuf::alloc(0xff))
                          .unwrap());
        });
    });
}

fn bench_compucha(c: &mut Criterion) {
    let challenge = CompuchaChallenge::new(FixedBuf::alloc(0x42),
                                           U128::new(12345678));
    let target = U256::max();

    c.bench_function("compucha_is_target_valid", |b| {
        b.iter(|| black_box(challenge.is_target_valid(&target)));
    });
}

criterion_group!(
    benches,
    bench_hashing,
    bench_var_int,
    bench_merkle,
    bench_compucha
);
criterion_main!(benches);
