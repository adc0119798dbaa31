//! Piecewise evaluation trait and its input types.

use crate::dtype::DType;
use crate::error::Result;
use crate::ops::common::piecewise::reject_callables;
use crate::runtime::{Runtime, RuntimeClient};
use crate::tensor::Tensor;
use std::fmt;
use std::sync::Arc;

/// One condition of a piecewise specification
///
/// A condition is aligned to the domain before evaluation:
/// - `Scalar` applies to every element
/// - `Flags` is a flat row-major host mask with exactly `numel` entries
/// - `Tensor` must have the domain's shape, or hold a single element which
///   is broadcast. Any dtype is accepted; non-zero is true.
#[derive(Clone, Debug)]
pub enum Condition<R: Runtime> {
    /// Same truth value for every element
    Scalar(bool),
    /// Flat host mask in row-major order
    Flags(Vec<bool>),
    /// Device tensor read as non-zero = true
    Tensor(Tensor<R>),
}

impl<R: Runtime> From<bool> for Condition<R> {
    fn from(value: bool) -> Self {
        Self::Scalar(value)
    }
}

impl<R: Runtime> From<Vec<bool>> for Condition<R> {
    fn from(value: Vec<bool>) -> Self {
        Self::Flags(value)
    }
}

impl<R: Runtime> From<&[bool]> for Condition<R> {
    fn from(value: &[bool]) -> Self {
        Self::Flags(value.to_vec())
    }
}

impl<R: Runtime> From<Tensor<R>> for Condition<R> {
    fn from(value: Tensor<R>) -> Self {
        Self::Tensor(value)
    }
}

impl<R: Runtime> From<&Tensor<R>> for Condition<R> {
    fn from(value: &Tensor<R>) -> Self {
        Self::Tensor(value.clone())
    }
}

/// The full condition specification of a piecewise call
///
/// `Single` is wrapped as a one-row condition list; `Many` is stacked in
/// listed order, and later entries take precedence where several hold.
#[derive(Clone, Debug)]
pub enum CondList<R: Runtime> {
    /// Exactly one condition
    Single(Condition<R>),
    /// Conditions in evaluation order
    Many(Vec<Condition<R>>),
}

impl<R: Runtime> CondList<R> {
    /// Number of conditions (`condlen`)
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(conds) => conds.len(),
        }
    }

    /// True when no condition is listed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Conditions in listed order
    pub fn as_slice(&self) -> &[Condition<R>] {
        match self {
            Self::Single(cond) => std::slice::from_ref(cond),
            Self::Many(conds) => conds,
        }
    }
}

impl<R: Runtime> From<Condition<R>> for CondList<R> {
    fn from(value: Condition<R>) -> Self {
        Self::Single(value)
    }
}

impl<R: Runtime> From<Vec<Condition<R>>> for CondList<R> {
    fn from(value: Vec<Condition<R>>) -> Self {
        Self::Many(value)
    }
}

impl<R: Runtime> From<bool> for CondList<R> {
    fn from(value: bool) -> Self {
        Self::Single(Condition::Scalar(value))
    }
}

impl<R: Runtime> From<Vec<bool>> for CondList<R> {
    fn from(value: Vec<bool>) -> Self {
        Self::Single(Condition::Flags(value))
    }
}

impl<R: Runtime> From<Tensor<R>> for CondList<R> {
    fn from(value: Tensor<R>) -> Self {
        Self::Single(Condition::Tensor(value))
    }
}

impl<R: Runtime> From<Vec<Tensor<R>>> for CondList<R> {
    fn from(value: Vec<Tensor<R>>) -> Self {
        Self::Many(value.into_iter().map(Condition::Tensor).collect())
    }
}

/// One entry of the function list
///
/// Only `Value` entries can be evaluated. `Callable` exists so that callers
/// porting per-segment callables get a typed `UnsupportedCallable` error
/// instead of silently wrong results.
#[derive(Clone)]
pub enum PiecewiseFn {
    /// Precomputed replacement value, converted to the domain dtype
    Value(f64),
    /// Per-segment function (rejected)
    Callable(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl PiecewiseFn {
    /// Wrap a closure as a callable entry
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Build a function list from plain values
    pub fn values<T: Into<PiecewiseFn> + Copy>(values: &[T]) -> Vec<PiecewiseFn> {
        values.iter().map(|&v| v.into()).collect()
    }
}

impl fmt::Debug for PiecewiseFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

macro_rules! impl_piecewise_fn_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PiecewiseFn {
                fn from(value: $ty) -> Self {
                    Self::Value(value as f64)
                }
            }
        )*
    };
}

impl From<f64> for PiecewiseFn {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl_piecewise_fn_from!(f32, i64, i32, u32, u8);

/// Piecewise function evaluation
pub trait PiecewiseOps<R: Runtime> {
    /// Evaluate a piecewise-defined function over `x`
    ///
    /// For each element of `x`, the output takes the function value of the
    /// last listed condition that holds there. Where no condition holds the
    /// output is the otherwise value (when `funcs` has one more entry than
    /// `conds`) or zero.
    ///
    /// # Arguments
    ///
    /// * `x` - Domain tensor; defines the output shape and dtype
    /// * `conds` - `condlen` conditions aligned to `x`
    /// * `funcs` - `condlen` values, or `condlen + 1` with a trailing otherwise value
    ///
    /// # Errors
    ///
    /// - `UnsupportedCallable` if any entry of `funcs` is a callable
    /// - `ShapeMismatch` if a condition cannot be aligned to `x`
    /// - `ArityMismatch` if `funcs.len()` is neither `condlen` nor `condlen + 1`
    /// - `UnsupportedDType` for `Bool` domains
    ///
    /// # Example
    ///
    /// ```ignore
    /// let x = Tensor::<CpuRuntime>::from_slice(&[0.0f64, 1.0, 2.0, 3.0], &[4], &device);
    /// let lo = Tensor::<CpuRuntime>::from_bools(&[true, true, false, false], &[4], &device);
    /// let hi = Tensor::<CpuRuntime>::from_bools(&[false, false, true, true], &[4], &device);
    /// let y = client.piecewise(&x, &vec![lo, hi].into(), &PiecewiseFn::values(&[10.0, 20.0]))?;
    /// assert_eq!(y.to_vec::<f64>(), [10.0, 10.0, 20.0, 20.0]);
    /// ```
    fn piecewise(
        &self,
        x: &Tensor<R>,
        conds: &CondList<R>,
        funcs: &[PiecewiseFn],
    ) -> Result<Tensor<R>>;

    /// Evaluate over a scalar domain, promoted to a 0-d tensor of `dtype`
    fn piecewise_scalar(
        &self,
        x: f64,
        dtype: DType,
        conds: &CondList<R>,
        funcs: &[PiecewiseFn],
    ) -> Result<Tensor<R>>
    where
        Self: RuntimeClient<R>,
    {
        // Fail before building the 0-d domain, which can itself error.
        reject_callables(funcs)?;
        let x = Tensor::<R>::try_full_scalar(&[], dtype, x, self.device())?;
        self.piecewise(&x, conds, funcs)
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runtime::cpu::{CpuDevice, CpuRuntime};

    #[test]
    fn test_function_values_from_numbers() {
        let funcs = PiecewiseFn::values(&[2.5f64, -1.0]);
        assert!(matches!(funcs[0], PiecewiseFn::Value(v) if v == 2.5));
        assert!(matches!(funcs[1], PiecewiseFn::Value(v) if v == -1.0));
        assert!(matches!(PiecewiseFn::from(7i32), PiecewiseFn::Value(v) if v == 7.0));
        assert!(matches!(PiecewiseFn::from(255u8), PiecewiseFn::Value(v) if v == 255.0));
        assert_eq!(format!("{:?}", PiecewiseFn::callable(|x| x)), "Callable(..)");
    }

    #[test]
    fn test_cond_list_lengths() {
        let single: CondList<CpuRuntime> = true.into();
        assert_eq!(single.len(), 1);
        let many: CondList<CpuRuntime> = vec![Condition::Scalar(true), false.into()].into();
        assert_eq!(many.len(), 2);
        assert!(CondList::<CpuRuntime>::Many(Vec::new()).is_empty());
    }

    #[cfg(not(feature = "f16"))]
    #[test]
    fn test_scalar_domain_rejects_callable_before_building_domain() {
        let client = CpuRuntime::default_client(&CpuDevice::new());
        let funcs = vec![PiecewiseFn::callable(|x| x + 1.0)];
        // An F16 domain cannot be built without the feature; the callable is reported.
        let err = client
            .piecewise_scalar(1.0, DType::F16, &true.into(), &funcs)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedCallable));
    }
}
