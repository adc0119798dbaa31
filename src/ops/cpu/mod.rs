//! CPU implementation of tensor operations.
//!
//! This module contains the operation trait implementations for the CPU runtime.

pub mod piecewise;
