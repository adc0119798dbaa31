//! Piecewise resolution benchmarks
//!
//! Measures thread scaling of both resolution strategies on a fixed mask.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use piecewise::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn random_conds(condlen: usize, len: usize, device: &CpuDevice) -> CondList<CpuRuntime> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..condlen)
        .map(|_| {
            let flags: Vec<bool> = (0..len).map(|_| rng.random_bool(0.3)).collect();
            Tensor::<CpuRuntime>::from_bools(&flags, &[len], device)
        })
        .collect::<Vec<_>>()
        .into()
}

fn client_with(device: &CpuDevice, threads: usize, strategy: ResolveStrategy) -> CpuClient {
    CpuRuntime::default_client(device)
        .with_parallelism(ParallelismConfig::new(Some(threads), None).with_strategy(strategy))
}

// ---------------------------------------------------------------------------
// Thread scaling
// ---------------------------------------------------------------------------

fn bench_thread_scaling(c: &mut Criterion) {
    let device = CpuDevice::new();
    let len = 1 << 20;
    let condlen = 4;
    let x = Tensor::<CpuRuntime>::zeros(&[len], DType::F32, &device);
    let conds = random_conds(condlen, len, &device);
    let funcs = PiecewiseFn::values(&[1.0, 2.0, 3.0, 4.0, -1.0]);

    for (name, strategy) in [
        ("parallel_passes", ResolveStrategy::ParallelPasses),
        ("thread_barrier", ResolveStrategy::ThreadBarrier),
    ] {
        let mut group = c.benchmark_group(format!("piecewise_1m_{name}"));
        group.throughput(Throughput::Elements((len * condlen) as u64));

        for threads in [1, 2, 4, 8] {
            let client = client_with(&device, threads, strategy);
            group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
                b.iter(|| black_box(client.piecewise(&x, &conds, &funcs).unwrap()));
            });
        }

        group.finish();
    }
}

// ---------------------------------------------------------------------------
// Condition count
// ---------------------------------------------------------------------------

fn bench_condition_count(c: &mut Criterion) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    let len = 1 << 16;
    let x = Tensor::<CpuRuntime>::zeros(&[len], DType::F64, &device);

    let mut group = c.benchmark_group("piecewise_64k_condlen");
    for condlen in [1usize, 4, 16] {
        let conds = random_conds(condlen, len, &device);
        let funcs: Vec<PiecewiseFn> = (0..condlen).map(|c| PiecewiseFn::from(c as f64)).collect();
        group.throughput(Throughput::Elements((len * condlen) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(condlen), &condlen, |b, _| {
            b.iter(|| black_box(client.piecewise(&x, &conds, &funcs).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_thread_scaling, bench_condition_count);
criterion_main!(benches);
