//! # piecewise
//!
//! **Data-parallel piecewise function evaluation over dense tensors.**
//!
//! Given a domain tensor `x`, a list of conditions aligned to `x` and a list
//! of replacement values, [`PiecewiseOps::piecewise`](ops::PiecewiseOps::piecewise)
//! returns a tensor shaped like `x` where every element holds the value of
//! the last listed condition that is true there. An optional trailing value
//! acts as the "otherwise" default; without it unmatched elements are zero.
//!
//! Resolution runs one logical worker per `(condition, element)` pair. The
//! workers race a monotone per-element maximum of their linear index, meet at
//! a fence, and the single worker whose index won writes the output. No locks
//! and no compare-and-swap loops are involved.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use piecewise::prelude::*;
//!
//! let device = CpuDevice::new();
//! let client = CpuRuntime::default_client(&device);
//!
//! let x = Tensor::<CpuRuntime>::from_slice(&[0.0f64, 1.0, 2.0, 3.0], &[4], &device);
//! let below = Tensor::<CpuRuntime>::from_bools(&[true, true, false, false], &[4], &device);
//! let above = Tensor::<CpuRuntime>::from_bools(&[false, false, true, true], &[4], &device);
//!
//! let y = client.piecewise(&x, &vec![below, above].into(), &PiecewiseFn::values(&[10.0, 20.0]))?;
//! assert_eq!(y.to_vec::<f64>(), [10.0, 10.0, 20.0, 20.0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU backend
//! - `rayon` (default): Multi-threaded resolution passes
//! - `f16`: Half-precision floats (F16, BF16)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod dtype;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod tensor;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dtype::DType;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{CondList, Condition, PiecewiseFn, PiecewiseOps};
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::tensor::{Layout, Tensor};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime, ParallelismConfig, ResolveStrategy};
}

/// Default runtime based on enabled features
#[cfg(feature = "cpu")]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
