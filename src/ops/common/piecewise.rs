//! Input normalization for piecewise evaluation, shared by all backends.

use crate::dtype::DType;
use crate::error::{Error, Result};
use crate::ops::traits::{CondList, Condition, PiecewiseFn};
use crate::runtime::Runtime;
use crate::tensor::Tensor;

/// Normalized piecewise inputs, ready for a resolver kernel
#[derive(Debug)]
pub struct PiecewisePlan<R: Runtime> {
    /// Number of conditions (mask rows)
    pub condlen: usize,
    /// Number of domain elements (mask columns)
    pub xsiz: usize,
    /// Row-major `(condlen, xsiz)` flags, 1 where the condition holds
    pub mask: Vec<u8>,
    /// One value per condition, otherwise value removed
    pub funcs: Vec<f64>,
    /// Trailing otherwise value, if one was supplied
    pub otherwise: Option<f64>,
    /// Output with the domain's shape and dtype, pre-filled with the
    /// otherwise value or zero
    pub output: Tensor<R>,
}

/// Extract plain values from a function list, rejecting callables
pub fn reject_callables(funcs: &[PiecewiseFn]) -> Result<Vec<f64>> {
    funcs
        .iter()
        .map(|f| match f {
            PiecewiseFn::Value(v) => Ok(*v),
            PiecewiseFn::Callable(_) => Err(Error::UnsupportedCallable),
        })
        .collect()
}

/// Append the flags of one condition, aligned to `shape`, onto `mask`
fn push_condition_flags<R: Runtime>(
    mask: &mut Vec<u8>,
    cond: &Condition<R>,
    shape: &[usize],
    xsiz: usize,
) -> Result<()> {
    match cond {
        Condition::Scalar(b) => mask.extend(std::iter::repeat_n(u8::from(*b), xsiz)),
        Condition::Flags(flags) => {
            if flags.len() != xsiz {
                return Err(Error::shape_mismatch(shape, &[flags.len()]));
            }
            mask.extend(flags.iter().map(|&b| u8::from(b)));
        }
        Condition::Tensor(t) => {
            if t.shape() == shape {
                mask.extend(t.to_flags()?);
            } else if t.numel() == 1 {
                let flag = t.to_flags()?[0];
                mask.extend(std::iter::repeat_n(flag, xsiz));
            } else {
                return Err(Error::shape_mismatch(shape, t.shape()));
            }
        }
    }
    Ok(())
}

/// Normalize caller inputs into a [`PiecewisePlan`]
///
/// Checks run in a fixed order: callables first, then condition alignment,
/// then arity. Nothing is allocated on the device until all checks pass.
pub fn normalize_piecewise<R: Runtime>(
    shape: &[usize],
    dtype: DType,
    conds: &CondList<R>,
    funcs: &[PiecewiseFn],
    device: &R::Device,
) -> Result<PiecewisePlan<R>> {
    let mut values = reject_callables(funcs)?;

    let xsiz: usize = shape.iter().product();
    let condlen = conds.len();
    let mut mask = Vec::with_capacity(condlen * xsiz);
    for cond in conds.as_slice() {
        push_condition_flags(&mut mask, cond, shape, xsiz)?;
    }

    let funclen = values.len();
    let otherwise = if funclen == condlen {
        None
    } else if funclen == condlen + 1 {
        values.pop()
    } else {
        return Err(Error::arity_mismatch(condlen, funclen));
    };

    let output = match otherwise {
        Some(v) => Tensor::<R>::try_full_scalar(shape, dtype, v, device)?,
        None => Tensor::<R>::try_zeros(shape, dtype, device)?,
    };

    tracing::debug!(
        condlen,
        xsiz,
        %dtype,
        otherwise = otherwise.is_some(),
        "normalized piecewise inputs"
    );

    Ok(PiecewisePlan {
        condlen,
        xsiz,
        mask,
        funcs: values,
        otherwise,
        output,
    })
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use crate::runtime::cpu::{CpuDevice, CpuRuntime};

    type Conds = CondList<CpuRuntime>;

    fn plan(shape: &[usize], conds: Conds, funcs: &[f64]) -> Result<PiecewisePlan<CpuRuntime>> {
        normalize_piecewise(
            shape,
            DType::F64,
            &conds,
            &PiecewiseFn::values(funcs),
            &CpuDevice::new(),
        )
    }

    #[test]
    fn test_scalar_condition_broadcasts() {
        let p = plan(&[2, 2], true.into(), &[1.0]).unwrap();
        assert_eq!(p.condlen, 1);
        assert_eq!(p.xsiz, 4);
        assert_eq!(p.mask, vec![1, 1, 1, 1]);
        assert_eq!(p.otherwise, None);
    }

    #[test]
    fn test_many_conditions_are_stacked() {
        let conds: Conds = vec![Condition::from(vec![true, false]), Condition::Scalar(false)].into();
        let p = plan(&[2], conds, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(p.mask, vec![1, 0, 0, 0]);
        assert_eq!(p.funcs, vec![1.0, 2.0]);
        assert_eq!(p.otherwise, Some(3.0));
        assert_eq!(p.output.to_vec::<f64>(), vec![3.0, 3.0]);
    }

    #[test]
    fn test_zero_fill_without_otherwise() {
        let p = plan(&[3], vec![false, true, false].into(), &[9.0]).unwrap();
        assert_eq!(p.output.to_vec::<f64>(), vec![0.0; 3]);
    }

    #[test]
    fn test_arity_mismatch() {
        let conds: Conds = vec![Condition::Scalar(true), Condition::Scalar(false)].into();
        let err = plan(&[1], conds, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                condlen: 2,
                funclen: 5
            }
        ));
    }

    #[test]
    fn test_callable_rejected_before_shape_checks() {
        // The flag vector is misaligned, but the callable wins.
        let conds: Conds = vec![false; 7].into();
        let funcs = vec![PiecewiseFn::callable(|x| x * 2.0)];
        let err =
            normalize_piecewise(&[2], DType::F64, &conds, &funcs, &CpuDevice::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCallable));
    }

    #[test]
    fn test_flags_length_must_match() {
        let err = plan(&[2, 2], vec![true, false].into(), &[1.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_tensor_condition_shapes() {
        let device = CpuDevice::new();
        let exact = Tensor::<CpuRuntime>::from_slice(&[0i32, 3, 0, -1], &[2, 2], &device);
        let p = plan(&[2, 2], exact.into(), &[1.0]).unwrap();
        assert_eq!(p.mask, vec![0, 1, 0, 1]);

        let single = Tensor::<CpuRuntime>::from_bools(&[true], &[1], &device);
        let p = plan(&[2, 2], single.into(), &[1.0]).unwrap();
        assert_eq!(p.mask, vec![1; 4]);

        let flat = Tensor::<CpuRuntime>::from_bools(&[true; 4], &[4], &device);
        let err = plan(&[2, 2], flat.into(), &[1.0]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_empty_condition_list() {
        let p = plan(&[2], Conds::Many(Vec::new()), &[4.0]).unwrap();
        assert_eq!(p.condlen, 0);
        assert!(p.mask.is_empty());
        assert_eq!(p.output.to_vec::<f64>(), vec![4.0, 4.0]);
    }
}
