//! Common utilities and validation logic shared across operation backends.

pub mod piecewise;

pub use piecewise::{PiecewisePlan, normalize_piecewise, reject_callables};
