//! Operation traits.
//!
//! Trait definitions live here; implementations are in the backend-specific
//! modules (`cpu/`).

mod piecewise;

pub use piecewise::{CondList, Condition, PiecewiseFn, PiecewiseOps};
