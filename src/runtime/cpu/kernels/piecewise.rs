//! Piecewise resolution kernels
//!
//! One logical worker runs per linear index `i` of the `(condlen, xsiz)`
//! condition mask, with condition `c = i / xsiz` and element `e = i % xsiz`.
//!
//! ```text
//! phase 1  mask[i] set        -> winner[e] = max(winner[e], i)
//! -------  fence (all phase-1 updates visible) -------------------
//! phase 2  winner[e] == i     -> out[e] = funcs[c]
//! ```
//!
//! Row-major linear order is condition-major, so the largest true `i` for an
//! element belongs to the last listed true condition. `winner[e]` only ever
//! increases, which makes the phase-1 race benign, and after the fence
//! exactly one worker per element sees equality and writes. Elements with no
//! true condition keep `winner[e] == -1` and their pre-filled output.

use crate::dtype::Element;
use std::sync::Barrier;
use std::sync::atomic::{AtomicI64, Ordering};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Sentinel stored in the winner scratch before any condition is observed
pub const NO_WINNER: i64 = -1;

/// Allocate the per-element winner scratch, every slot at [`NO_WINNER`]
fn winner_scratch(xsiz: usize) -> Vec<AtomicI64> {
    (0..xsiz).map(|_| AtomicI64::new(NO_WINNER)).collect()
}

/// Phase 1 for worker `i`: raise `winner[e]` to `i` if the condition holds
#[inline]
fn record_candidate(mask: &[u8], winner: &[AtomicI64], xsiz: usize, i: usize) {
    if mask[i] != 0 {
        winner[i % xsiz].fetch_max(i as i64, Ordering::Relaxed);
    }
}

/// Phase 2 test for worker `i`: is it the designated writer of its element?
#[inline]
fn is_designated_writer(mask: &[u8], winner: &[AtomicI64], xsiz: usize, i: usize) -> bool {
    mask[i] != 0 && winner[i % xsiz].load(Ordering::Relaxed) == i as i64
}

#[inline]
fn check_contract<T>(mask: &[u8], funcs: &[T], out: &[T]) {
    debug_assert_eq!(
        mask.len(),
        funcs.len() * out.len(),
        "mask must hold condlen * xsiz flags"
    );
}

/// Resolve a piecewise function into `out`
///
/// - `mask`: `funcs.len() * out.len()` condition flags, row-major `[c][e]`
/// - `funcs`: one replacement value per condition
/// - `out`: pre-filled output (zero or the otherwise value)
/// - `min_len`: minimum linear indices per rayon task
///
/// Returns the number of elements that received a function value.
///
/// With the `rayon` feature the two phases are two parallel passes; the end
/// of the first `for_each` is the fence. Without it both phases run in order
/// on the calling thread.
pub fn piecewise_kernel<T: Element>(
    mask: &[u8],
    funcs: &[T],
    out: &mut [T],
    min_len: usize,
) -> usize {
    check_contract(mask, funcs, out);
    if mask.is_empty() {
        return 0;
    }

    let winner = winner_scratch(out.len());
    run_passes(mask, funcs, out, &winner, min_len)
}

#[cfg(feature = "rayon")]
fn run_passes<T: Element>(
    mask: &[u8],
    funcs: &[T],
    out: &mut [T],
    winner: &[AtomicI64],
    min_len: usize,
) -> usize {
    let xsiz = out.len();
    let total = mask.len();
    let min_len = min_len.max(1);

    (0..total)
        .into_par_iter()
        .with_min_len(min_len)
        .for_each(|i| record_candidate(mask, winner, xsiz, i));

    let out_addr = out.as_mut_ptr() as usize;
    (0..total)
        .into_par_iter()
        .with_min_len(min_len)
        .filter(|&i| is_designated_writer(mask, winner, xsiz, i))
        .map(|i| {
            // SAFETY: `i % xsiz < out.len()`, and only the single worker
            // whose index equals the settled winner writes that element.
            unsafe {
                *(out_addr as *mut T).add(i % xsiz) = funcs[i / xsiz];
            }
            1usize
        })
        .sum::<usize>()
}

#[cfg(not(feature = "rayon"))]
fn run_passes<T: Element>(
    mask: &[u8],
    funcs: &[T],
    out: &mut [T],
    winner: &[AtomicI64],
    _min_len: usize,
) -> usize {
    let xsiz = out.len();
    let total = mask.len();

    for i in 0..total {
        record_candidate(mask, winner, xsiz, i);
    }

    let mut written = 0usize;
    for i in 0..total {
        if is_designated_writer(mask, winner, xsiz, i) {
            out[i % xsiz] = funcs[i / xsiz];
            written += 1;
        }
    }
    written
}

/// Resolve a piecewise function using scoped threads and an explicit barrier
///
/// Worker `w` of `workers` owns linear indices `w, w + workers, ...`. Every
/// worker finishes its phase-1 candidacy updates, waits on a shared
/// [`Barrier`], then performs its phase-2 writes.
///
/// Returns the number of elements that received a function value.
pub fn piecewise_barrier_kernel<T: Element>(
    mask: &[u8],
    funcs: &[T],
    out: &mut [T],
    workers: usize,
) -> usize {
    check_contract(mask, funcs, out);
    let xsiz = out.len();
    let total = mask.len();
    if total == 0 {
        return 0;
    }

    let workers = workers.clamp(1, total);
    let winner = winner_scratch(xsiz);
    let barrier = Barrier::new(workers);
    let out_addr = out.as_mut_ptr() as usize;

    let winner = &winner;
    let barrier = &barrier;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                s.spawn(move || {
                    for i in (w..total).step_by(workers) {
                        record_candidate(mask, winner, xsiz, i);
                    }

                    barrier.wait();

                    let mut written = 0usize;
                    for i in (w..total).step_by(workers) {
                        if is_designated_writer(mask, winner, xsiz, i) {
                            // SAFETY: see `piecewise_kernel`; one writer per element.
                            unsafe {
                                *(out_addr as *mut T).add(i % xsiz) = funcs[i / xsiz];
                            }
                            written += 1;
                        }
                    }
                    written
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(n) => n,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .sum::<usize>()
    })
}
