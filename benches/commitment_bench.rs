//! Commitment and inclusion benchmarks using Criterion
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use aligned_client::codec::{build_envelope, serialize};
use aligned_client::{Signature, SignerError};
use aligned_primitives::{
    verify_merkle_path, Hash256, MerkleTree, ProvingSystemId, VerificationData,
};

fn sample_data(proof_size: usize) -> VerificationData {
    VerificationData::new(
        ProvingSystemId::Sp1,
        vec![0xab; proof_size],
        "0x66f9664f97F2b50F62D13eA064982f936dE76657",
    )
    .with_pub_input(vec![0x01; 256])
    .with_vm_program_code(vec![0x7f; 64 * 1024])
}

fn bench_commitment(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment");

    for proof_size in [1024usize, 64 * 1024, 1024 * 1024].iter() {
        let data = sample_data(*proof_size);
        group.throughput(Throughput::Bytes(*proof_size as u64));
        group.bench_with_input(BenchmarkId::new("proof_bytes", proof_size), proof_size, |b, _| {
            b.iter(|| black_box(&data).commitment().unwrap())
        });
    }

    group.finish();
}

fn bench_merkle_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("merkle_verification");

    for batch_size in [2usize, 64, 1024].iter() {
        let commitments: Vec<_> = (0..*batch_size)
            .map(|i| {
                VerificationData::new(
                    ProvingSystemId::Groth16Bn254,
                    (i as u64).to_be_bytes().to_vec(),
                    "0x0000000000000000000000000000000000000000",
                )
                .commitment()
                .unwrap()
            })
            .collect();
        let tree = MerkleTree::from_commitments(&commitments).unwrap();
        let index = batch_size - 1;
        let path = tree.proof(index).unwrap().merkle_path;
        let root = tree.root();

        group.bench_with_input(BenchmarkId::new("batch", batch_size), batch_size, |b, _| {
            b.iter(|| {
                verify_merkle_path(
                    black_box(&path),
                    black_box(&root),
                    index,
                    black_box(&commitments[index]),
                )
            })
        });
    }

    group.finish();
}

fn bench_envelope(c: &mut Criterion) {
    let data = sample_data(16 * 1024);
    let signer = |payload: &Hash256| -> Result<Signature, SignerError> {
        Ok(Signature::new(payload.0, [0; 32], 27))
    };

    c.bench_function("envelope_serialize_16k", |b| {
        b.iter(|| {
            let message = build_envelope(black_box(&data), &signer).unwrap();
            serialize(&message).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_commitment,
    bench_merkle_verification,
    bench_envelope
);
criterion_main!(benches);
