//! Compile-time batch unrolling for the reduction kernels.

/// Applies `op` to every index in `start .. start + count`, `N` at a time.
///
/// Full groups of `N` are emitted as a flat burst: the inner loop has a
/// constant trip count, so it flattens into straight-line calls with no
/// per-index branching. Whatever is left after the full groups runs through
/// a short residual loop one index at a time.
///
/// Every call site in the kernels passes a `count` derived from a
/// const-generic row count, so both the group count and the residual length
/// fold to constants during monomorphization. The indices handed to `op`
/// are disjoint and cover the range exactly once; callers that write one
/// output slot per index therefore never overlap.
#[inline(always)]
pub fn unroll<const N: usize>(start: usize, count: usize, mut op: impl FnMut(usize)) {
    const { assert!(N > 0, "group size must be non-zero") };

    let full = count / N * N;
    let mut base = start;
    while base < start + full {
        for lane in 0..N {
            op(base + lane);
        }
        base += N;
    }
    for i in base..start + count {
        op(i);
    }
}
