//! Reduction kernels for 8-column matrices.
//!
//! An 8-column f32 row fills a 256-bit register exactly, so the f32 kernel
//! multiplies whole rows in one operation and collapses them with a
//! horizontal-add tree. An 8-column f64 row spans two registers; the f64
//! kernel fuses the second half into the first with FMA before reducing.

use crate::unroll::unroll;

/// Computes `out[i] = dot(mat row i, input)` for an R×8 f32 matrix.
///
/// Bulk batches cover 4 rows at a time: four row products are collapsed to
/// four dot products by three `hadd` steps plus one cross-half add. The
/// tail runs a 2-row tree, then a 1-row tree.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA
/// - `mat` points to `R * 8` contiguous f32 values (no alignment required)
/// - `input` points to 8 contiguous f32 values
/// - `out` points to `R` writable f32 values, not overlapping `mat` or `input`
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f32_c8<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
    use std::arch::x86_64::*;

    let xv = _mm256_loadu_ps(input);

    // 4 rows at a time, at row 4*i
    let batch_4 = |i: usize| unsafe {
        let r1 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(32 * i)), xv); // a0..a7
        let r2 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(32 * i + 8)), xv); // b0..b7
        let r3 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(32 * i + 16)), xv); // c0..c7
        let r4 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(32 * i + 24)), xv); // d0..d7

        // a0+a1 | a2+a3 | b0+b1 | b2+b3 || a4+a5 | a6+a7 | b4+b5 | b6+b7
        let ab = _mm256_hadd_ps(r1, r2);
        // c0+c1 | c2+c3 | d0+d1 | d2+d3 || c4+c5 | c6+c7 | d4+d5 | d6+d7
        let cd = _mm256_hadd_ps(r3, r4);
        // a0..3 | b0..3 | c0..3 | d0..3 || a4..7 | b4..7 | c4..7 | d4..7
        let quad = _mm256_hadd_ps(ab, cd);

        // a0..7 | b0..7 | c0..7 | d0..7
        let sums = _mm_add_ps(
            _mm256_castps256_ps128(quad),
            _mm256_extractf128_ps::<1>(quad),
        );
        _mm_storeu_ps(out.add(4 * i), sums);
    };

    // 2 rows at a time, at row 2*i
    let batch_2 = |i: usize| unsafe {
        let r1 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i)), xv); // a0..a7
        let r2 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i + 8)), xv); // b0..b7

        // a0+a1 | a2+a3 | b0+b1 | b2+b3 || a4+a5 | a6+a7 | b4+b5 | b6+b7
        let ab = _mm256_hadd_ps(r1, r2);
        // a0+a1+a4+a5 | a2+a3+a6+a7 | b0+b1+b4+b5 | b2+b3+b6+b7
        let half = _mm_add_ps(_mm256_castps256_ps128(ab), _mm256_extractf128_ps::<1>(ab));
        // a0..7 | b0..7 | a0..7 | b0..7
        let pair = _mm_hadd_ps(half, half);

        out.add(2 * i).write(_mm_cvtss_f32(pair));
        out.add(2 * i + 1)
            .write(f32::from_bits(_mm_extract_ps::<1>(pair) as u32));
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        let r = _mm256_mul_ps(_mm256_loadu_ps(mat.add(8 * i)), xv); // a0..a7

        // a0+a4 | a1+a5 | a2+a6 | a3+a7
        let mut q = _mm_add_ps(_mm256_castps256_ps128(r), _mm256_extractf128_ps::<1>(r));
        // rotate the upper pair down and fold
        q = _mm_add_ps(q, _mm_permute_ps::<0x4E>(q));
        q = _mm_add_ps(q, _mm_movehdup_ps(q));
        out.add(i).write(_mm_cvtss_f32(q));
    };

    unroll::<1>(0, R / 4, batch_4);

    if R % 4 >= 2 {
        batch_2(R / 2 - 1);
    }
    if R % 2 == 1 {
        batch_1(R - 1);
    }
}

/// Computes `out[i] = dot(mat row i, input)` for an R×8 f64 matrix.
///
/// Each row spans two 256-bit loads; the upper half is fused into the lower
/// product with FMA before the `hadd` reduction. Bulk batches cover 2 rows,
/// the tail a single row via a narrow-register reduction.
///
/// # Safety
///
/// Same contract as [`matvec_f32_c8`], with f64 buffers.
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f64_c8<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
    use std::arch::x86_64::*;

    let x_lo = _mm256_loadu_pd(input);
    let x_hi = _mm256_loadu_pd(input.add(4));

    // 2 rows at a time, at row 2*i
    let batch_2 = |i: usize| unsafe {
        let a = _mm256_mul_pd(_mm256_loadu_pd(mat.add(16 * i)), x_lo);
        // a0+a4 | a1+a5 | a2+a6 | a3+a7 in one fused step
        let a = _mm256_fmadd_pd(_mm256_loadu_pd(mat.add(16 * i + 4)), x_hi, a);
        let b = _mm256_mul_pd(_mm256_loadu_pd(mat.add(16 * i + 8)), x_lo);
        let b = _mm256_fmadd_pd(_mm256_loadu_pd(mat.add(16 * i + 12)), x_hi, b);

        // a0145 | b0145 || a2367 | b2367
        let h = _mm256_hadd_pd(a, b);
        // a0..7 | b0..7
        let sums = _mm_add_pd(_mm256_castpd256_pd128(h), _mm256_extractf128_pd::<1>(h));
        _mm_storeu_pd(out.add(2 * i), sums);
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        let lo = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i)), x_lo); // a0..a3
        let hi = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i + 4)), x_hi); // a4..a7

        // a0+a4 | a1+a5 | a2+a6 | a3+a7
        let s = _mm256_add_pd(lo, hi);
        // a0+a2+a4+a6 | a1+a3+a5+a7
        let pair = _mm_add_pd(_mm256_castpd256_pd128(s), _mm256_extractf128_pd::<1>(s));
        out.add(i)
            .write(_mm_cvtsd_f64(_mm_add_sd(pair, _mm_unpackhi_pd(pair, pair))));
    };

    unroll::<1>(0, R / 2, batch_2);

    if R % 2 == 1 {
        batch_1(R - 1);
    }
}
