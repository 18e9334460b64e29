//! Naive scalar matrix-vector product.

use crate::element::Element;
use crate::matrix::fixed::{FixedMatrix, FixedVector};

/// Textbook row-by-row dot product with left-to-right accumulation.
///
/// This is the scalar baseline the SIMD kernels are compared against. Its
/// summation order differs from the kernels' pairwise reduction trees, so
/// agreement is defined up to floating-point reassociation, not bit
/// equality.
pub fn matvec_naive<T: Element, const R: usize, const C: usize>(
    mat: &FixedMatrix<T, R, C>,
    input: &FixedVector<T, C>,
    out: &mut FixedVector<T, R>,
) {
    for i in 0..R {
        let mut acc = T::ZERO;
        for j in 0..C {
            acc += mat.get(i, j) * input[j];
        }
        out[i] = acc;
    }
}
