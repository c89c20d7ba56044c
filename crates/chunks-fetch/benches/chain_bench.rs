use std::sync::Arc;

use chunks_fetch::core::ChainVerifier;
use chunks_fetch::{FixedPipeline, MemoryFace, Pipeline, PipelineEvent, PipelineOptions};
use chunks_packet::{Data, Name};
use chunks_verify::{FinalMarker, seal_chain, split_payload};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SEGMENT_SIZE: usize = 8 * 1024;

fn sealed(segments: usize) -> (Name, Vec<Data>) {
    let prefix: Name = "/bench/content/v=1".parse().unwrap();
    let payload = vec![0xA5u8; segments * SEGMENT_SIZE];
    let chain = seal_chain(&prefix, split_payload(&payload, SEGMENT_SIZE), FinalMarker::EverySegment);
    (prefix, chain)
}

fn bench_chain_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_verification");

    for segments in [16usize, 256] {
        let (_, chain) = sealed(segments);
        group.throughput(Throughput::Bytes((segments * SEGMENT_SIZE) as u64));

        group.bench_with_input(BenchmarkId::new("in_order", segments), &chain, |b, chain| {
            b.iter(|| {
                let mut verifier = ChainVerifier::new();
                for (n, data) in chain.iter().enumerate() {
                    black_box(verifier.submit(n as u64, data.clone()));
                }
            });
        });

        // everything but segment 0 is held, then released in one cascade
        group.bench_with_input(BenchmarkId::new("reversed", segments), &chain, |b, chain| {
            b.iter(|| {
                let mut verifier = ChainVerifier::new();
                for (n, data) in chain.iter().enumerate().rev() {
                    black_box(verifier.submit(n as u64, data.clone()));
                }
            });
        });
    }

    group.finish();
}

fn bench_pipeline_memory_face(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_memory_face");
    let rt = tokio::runtime::Runtime::new().unwrap();
    let (prefix, chain) = sealed(256);
    let face = Arc::new(MemoryFace::serving(chain));
    group.throughput(Throughput::Bytes((256 * SEGMENT_SIZE) as u64));

    for window in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::new("window", window), &window, |b, &window| {
            b.iter(|| {
                rt.block_on(async {
                    let options = PipelineOptions::default().window_size(window);
                    let (mut pipeline, mut events) =
                        FixedPipeline::new(Arc::clone(&face), prefix.clone(), options).unwrap();
                    pipeline.start();
                    while let Some(event) = events.recv().await {
                        if let PipelineEvent::Completed(summary) = event {
                            black_box(summary);
                        }
                    }
                });
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chain_verification, bench_pipeline_memory_face);
criterion_main!(benches);
