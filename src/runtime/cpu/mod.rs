//! CPU runtime implementation
//!
//! The CPU runtime uses 64-byte aligned heap allocations and runs kernels on a
//! rayon thread pool (with the `rayon` feature) configured per client through
//! [`ParallelismConfig`].

mod client;
pub(crate) mod helpers;
pub(crate) mod kernels;
mod runtime;

pub use crate::tensor::Tensor;
pub use client::{CpuClient, ParallelismConfig, ResolveStrategy};
pub use runtime::{CpuDevice, CpuRuntime};
