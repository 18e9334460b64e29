//! Fixed-shape SIMD matrix-vector multiplication.
//!
//! Small matrix-vector products (a handful of columns, up to ~128 rows) sit
//! in the hot inner loops of graphics and robotics transforms, and general
//! BLAS-style libraries leave a lot on the table at these sizes. This crate
//! hand-writes one AVX2 reduction kernel per (element width, column count)
//! pair, resolves the row split entirely at compile time, and validates the
//! whole family against nalgebra, ndarray and a naive scalar loop.
//!
//! ## Usage
//!
//! ```
//! use matvec::{FixedMatrix, FixedVector, multiply};
//!
//! let mat = FixedMatrix::<f32, 3, 4>::from_rows([
//!     [1.0, 0.0, 0.0, 0.0],
//!     [0.0, 1.0, 0.0, 0.0],
//!     [2.0, 2.0, 2.0, 2.0],
//! ]);
//! let input = FixedVector::from_array([1.0, 2.0, 3.0, 4.0]);
//! let mut out = FixedVector::zeros();
//!
//! multiply(&mat, &input, &mut out);
//! assert_eq!(out.as_slice(), &[1.0, 2.0, 20.0]);
//! ```
//!
//! ## What's inside
//!
//! - Six reduction kernels: f32/f64 × {2, 4, 8} columns, each batching
//!   multiple output rows per register operation with a horizontal-add tree
//!   and a ladder of narrower batches for the leftover rows
//! - A compile-time dispatcher: unsupported shapes fail the build, and the
//!   shape never branches at runtime
//! - A validation gate comparing every shape with rows 0..=128 against
//!   three references under a 4×epsilon bound

pub mod dispatch;
pub mod element;
pub mod kernels;
pub mod matrix;
pub mod report;
pub mod unroll;
pub mod validate;

pub use dispatch::ColKernel;
pub use element::Element;
pub use matrix::fixed::{FixedMatrix, FixedVector};
pub use matrix::naive::matvec_naive;

/// Matrix-vector multiply: `out = mat * input`.
///
/// The shape is fixed by the types, so there is nothing to check at
/// runtime: an unsupported column count or a mismatched buffer length is a
/// compile error. On x86_64 with AVX2 and FMA this runs the SIMD kernel for
/// `(T, C)`; anywhere else it falls back to the naive scalar loop.
///
/// `out` must not alias `mat` or `input`, which the borrow checker already
/// guarantees for these owned types.
pub fn multiply<T, const R: usize, const C: usize>(
    mat: &FixedMatrix<T, R, C>,
    input: &FixedVector<T, C>,
    out: &mut FixedVector<T, R>,
) where
    T: Element + ColKernel<C>,
{
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma") {
            unsafe {
                dispatch::dispatch::<T, R, C>(mat.as_ptr(), input.as_ptr(), out.as_mut_ptr())
            };
            return;
        }
    }

    matvec_naive(mat, input, out);
}
