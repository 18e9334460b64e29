//! Compile-time routing from (element type, column count) to a kernel.

use crate::kernels;

/// Ties an element type to the reduction kernel for a given column count.
///
/// There are exactly six implementations: f32 and f64 for each column count
/// in {2, 4, 8}. Any other `(type, C)` pair fails trait resolution, so an
/// unsupported shape is a build error and never a runtime branch.
pub trait ColKernel<const C: usize>: Copy {
    /// Runs the matching reduction kernel.
    ///
    /// # Safety
    ///
    /// Caller must ensure:
    /// - CPU supports AVX2 and FMA
    /// - `mat` points to `R * C` contiguous elements (no alignment required)
    /// - `input` points to `C` contiguous elements
    /// - `out` points to `R` writable elements, not overlapping `mat` or
    ///   `input`
    unsafe fn matvec<const R: usize>(mat: *const Self, input: *const Self, out: *mut Self);
}

impl ColKernel<2> for f32 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
        unsafe { kernels::matvec_f32_c2::<R>(mat, input, out) }
    }
}

impl ColKernel<4> for f32 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
        unsafe { kernels::matvec_f32_c4::<R>(mat, input, out) }
    }
}

impl ColKernel<8> for f32 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
        unsafe { kernels::matvec_f32_c8::<R>(mat, input, out) }
    }
}

impl ColKernel<2> for f64 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
        unsafe { kernels::matvec_f64_c2::<R>(mat, input, out) }
    }
}

impl ColKernel<4> for f64 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
        unsafe { kernels::matvec_f64_c4::<R>(mat, input, out) }
    }
}

impl ColKernel<8> for f64 {
    #[inline]
    unsafe fn matvec<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
        unsafe { kernels::matvec_f64_c8::<R>(mat, input, out) }
    }
}

/// Invokes the kernel for `(T, C)` with a compile-time row count.
///
/// # Safety
///
/// Same contract as [`ColKernel::matvec`].
#[inline]
pub unsafe fn dispatch<T: ColKernel<C>, const R: usize, const C: usize>(
    mat: *const T,
    input: *const T,
    out: *mut T,
) {
    unsafe { T::matvec::<R>(mat, input, out) }
}
