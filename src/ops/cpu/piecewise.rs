//! CPU implementation of piecewise evaluation.

use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::ops::common::normalize_piecewise;
use crate::ops::traits::{CondList, PiecewiseFn, PiecewiseOps};
use crate::runtime::cpu::{
    CpuClient, CpuRuntime, ResolveStrategy,
    helpers::dispatch_dtype,
    kernels::{piecewise_barrier_kernel, piecewise_kernel},
};
use crate::tensor::Tensor;

impl CpuClient {
    /// Run the configured resolver over a host output slice
    fn resolve_piecewise<T: Element>(&self, mask: &[u8], funcs: &[T], out: &mut [T]) -> usize {
        let strategy = self.parallelism().strategy();
        tracing::trace!(?strategy, rows = funcs.len(), cols = out.len(), "piecewise resolve");

        match strategy {
            ResolveStrategy::ParallelPasses => {
                let min_len = self.rayon_min_len();
                self.install_parallelism(|| piecewise_kernel(mask, funcs, out, min_len))
            }
            ResolveStrategy::ThreadBarrier => {
                let workers = self.parallelism().worker_count();
                piecewise_barrier_kernel(mask, funcs, out, workers)
            }
        }
    }
}

/// Reject domain dtypes that have no CPU element type
fn check_piecewise_dtype(dtype: DType) -> Result<()> {
    dispatch_dtype!(dtype, _T => {}, "piecewise");
    Ok(())
}

/// PiecewiseOps implementation for CPU runtime.
impl PiecewiseOps<CpuRuntime> for CpuClient {
    fn piecewise(
        &self,
        x: &Tensor<CpuRuntime>,
        conds: &CondList<CpuRuntime>,
        funcs: &[PiecewiseFn],
    ) -> Result<Tensor<CpuRuntime>> {
        let dtype = x.dtype();
        check_piecewise_dtype(dtype)?;
        let plan = normalize_piecewise(x.shape(), dtype, conds, funcs, x.device())?;

        dispatch_dtype!(dtype, T => {
            if !plan.mask.is_empty() {
                let values: Vec<T> = plan.funcs.iter().map(|&v| T::from_f64(v)).collect();
                let out_ptr = plan.output.storage().ptr() as *mut T;
                debug_assert!(plan.output.storage().is_unique());
                debug_assert_eq!(plan.output.storage().len(), plan.xsiz);
                // SAFETY: the output was allocated by the normalizer for
                // `xsiz` elements of `T` (non-empty here, so non-null) and no
                // other handle to it exists until it is returned.
                let out = unsafe { std::slice::from_raw_parts_mut(out_ptr, plan.xsiz) };
                let written = self.resolve_piecewise(&plan.mask, &values, out);
                tracing::trace!(written, xsiz = plan.xsiz, "piecewise resolved");
            }
        }, "piecewise");

        Ok(plan.output)
    }
}
