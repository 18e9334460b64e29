//! Reduction kernels for 4-column matrices.
//!
//! A 4-column row only fills half a wide register, so the input vector is
//! tiled twice across the register and two (f32) or one (f64) rows ride in
//! each load.

use crate::unroll::unroll;

/// Computes `out[i] = dot(mat row i, input)` for an R×4 f32 matrix.
///
/// The input is tiled twice across one 256-bit register, so each load
/// covers two rows and a 4-row bulk batch needs only two loads. Remainders
/// fall to the single-row scalar path.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA
/// - `mat` points to `R * 4` contiguous f32 values (no alignment required)
/// - `input` points to 4 contiguous f32 values
/// - `out` points to `R` writable f32 values, not overlapping `mat` or `input`
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f32_c4<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
    use std::arch::x86_64::*;

    // x0 x1 x2 x3 | x0 x1 x2 x3
    let xv = _mm256_loadu2_m128(input, input);

    // 4 rows at a time, at row 4*i
    let batch_4 = |i: usize| unsafe {
        let r1 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i)), xv); // a0 a1 a2 a3 | b0 b1 b2 b3
        let r2 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i + 8)), xv); // c0 c1 c2 c3 | d0 d1 d2 d3

        // a0+a1 | a2+a3 | c0+c1 | c2+c3 || b0+b1 | b2+b3 | d0+d1 | d2+d3
        let h = _mm256_hadd_ps(r1, r2);
        // a01 b01 c01 d01 | a23 b23 c23 d23
        let g = _mm256_permutevar8x32_ps(h, _mm256_setr_epi32(0, 4, 2, 6, 1, 5, 3, 7));
        let sums = _mm_add_ps(_mm256_castps256_ps128(g), _mm256_extractf128_ps::<1>(g));
        _mm_storeu_ps(out.add(4 * i), sums);
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        let r = _mm_mul_ps(_mm_loadu_ps(mat.add(4 * i)), _mm_loadu_ps(input)); // a0 a1 a2 a3

        // a0+a1 | _ | a2+a3 | _
        let s = _mm_add_ps(r, _mm_movehdup_ps(r));
        // lane 0 = a0+a1+a2+a3
        let s = _mm_add_ps(s, _mm_movehl_ps(s, s));
        out.add(i).write(_mm_cvtss_f32(s));
    };

    unroll::<1>(0, R / 4, batch_4);

    if R % 4 >= 2 {
        batch_1(R / 2 * 2 - 2);
        batch_1(R / 2 * 2 - 1);
    }
    if R % 2 == 1 {
        batch_1(R - 1);
    }
}

/// Computes `out[i] = dot(mat row i, input)` for an R×4 f64 matrix.
///
/// One 256-bit register holds exactly one row, so the bulk batch pairs two
/// rows through a single `hadd`; the tail reduces one row across halves.
///
/// # Safety
///
/// Same contract as [`matvec_f32_c4`], with f64 buffers.
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f64_c4<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
    use std::arch::x86_64::*;

    let xv = _mm256_loadu_pd(input);

    // 2 rows at a time, at row 2*i
    let batch_2 = |i: usize| unsafe {
        let a = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i)), xv); // a0 a1 a2 a3
        let b = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i + 4)), xv); // b0 b1 b2 b3

        // a0+a1 | b0+b1 || a2+a3 | b2+b3
        let h = _mm256_hadd_pd(a, b);
        // a0..3 | b0..3
        let sums = _mm_add_pd(_mm256_castpd256_pd128(h), _mm256_extractf128_pd::<1>(h));
        _mm_storeu_pd(out.add(2 * i), sums);
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        let r = _mm256_mul_pd(_mm256_loadu_pd(mat.add(4 * i)), xv); // a0 a1 a2 a3

        // a0+a2 | a1+a3
        let pair = _mm_add_pd(_mm256_castpd256_pd128(r), _mm256_extractf128_pd::<1>(r));
        out.add(i)
            .write(_mm_cvtsd_f64(_mm_add_sd(pair, _mm_unpackhi_pd(pair, pair))));
    };

    unroll::<1>(0, R / 2, batch_2);

    if R % 2 == 1 {
        batch_1(R - 1);
    }
}
