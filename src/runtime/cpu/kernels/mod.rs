//! CPU kernel implementations
//!
//! Low-level compute kernels for CPU operations. Kernels are generic over
//! `T: Element` and operate on host slices.

pub mod piecewise;

pub use piecewise::{piecewise_barrier_kernel, piecewise_kernel};
