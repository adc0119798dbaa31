//! Tensor types
//!
//! This module provides the core `Tensor` type, an n-dimensional array stored
//! on a compute device, together with its storage and layout.

mod core;
mod layout;
mod storage;

pub use core::Tensor;
pub use layout::{Layout, Shape};
pub use storage::Storage;
