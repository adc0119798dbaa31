//! Tensor operations
//!
//! Operations are defined as traits implemented by each runtime's client,
//! which gives them access to the device and the client's parallelism
//! settings.
//!
//! ```text
//! RuntimeClient<R>
//!   └── implements PiecewiseOps<R>
//!         ├── piecewise         (tensor domain)
//!         └── piecewise_scalar  (scalar domain promoted to 0-d)
//! ```
//!
//! # Implementing Operations for a New Backend
//!
//! 1. Normalize inputs with [`common::normalize_piecewise`]; it validates the
//!    function list, aligns conditions and allocates the pre-filled output.
//! 2. Run a resolver over the plan's mask and values that keeps the
//!    "last listed true condition wins" rule.
//! 3. Return the plan's output tensor.

pub mod common;
#[cfg(feature = "cpu")]
pub(crate) mod cpu;
pub mod traits;

pub use traits::*;
