//! Common test utilities
#![allow(dead_code)]

use piecewise::ops::{CondList, Condition};
use piecewise::runtime::Runtime;
use piecewise::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime, ParallelismConfig};
use piecewise::tensor::Tensor;

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// Create a CPU client with explicit thread count and chunk size
pub fn create_cpu_client_with(threads: usize, chunk: usize) -> (CpuClient, CpuDevice) {
    let (client, device) = create_cpu_client();
    let client = client.with_parallelism(ParallelismConfig::new(Some(threads), Some(chunk)));
    (client, device)
}

/// Build a condition list from host predicates evaluated over `x`
pub fn conds_from(x: &[f64], preds: &[fn(f64) -> bool]) -> CondList<CpuRuntime> {
    preds
        .iter()
        .map(|p| Condition::Flags(x.iter().map(|&v| p(v)).collect()))
        .collect::<Vec<_>>()
        .into()
}

/// Bool tensor condition with the given shape
pub fn bool_tensor(data: &[bool], shape: &[usize], device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::from_bools(data, shape, device)
}

/// Sequential reference: later true conditions override earlier ones
pub fn reference_piecewise(masks: &[Vec<bool>], funcs: &[f64], len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    if funcs.len() == masks.len() + 1 {
        out.fill(funcs[masks.len()]);
    }
    for (mask, &f) in masks.iter().zip(funcs) {
        for (o, &hit) in out.iter_mut().zip(mask) {
            if hit {
                *o = f;
            }
        }
    }
    out
}
