//! Reduction kernels for 2-column matrices.
//!
//! Two-element rows are small enough that a wide register carries four
//! (f32: eight) of them at once, so these kernels lean on deep batches and
//! a ladder of progressively narrower tails: 8, 4, 2, 1 rows for f32 and
//! 4, 2, 1 for f64.

use crate::unroll::unroll;

/// Computes `out[i] = dot(mat row i, input)` for an R×2 f32 matrix.
///
/// The input pair is tiled four times across a 256-bit register; the bulk
/// batch covers 8 rows with two loads. Tails step down through a 4-row
/// shuffle batch and a 2-row packed batch to a scalar final row.
///
/// # Safety
///
/// Caller must ensure:
/// - CPU supports AVX2 and FMA
/// - `mat` points to `R * 2` contiguous f32 values (no alignment required)
/// - `input` points to 2 contiguous f32 values
/// - `out` points to `R` writable f32 values, not overlapping `mat` or `input`
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f32_c2<const R: usize>(mat: *const f32, input: *const f32, out: *mut f32) {
    use std::arch::x86_64::*;

    let x0 = *input;
    let x1 = *input.add(1);
    // x0 x1 x0 x1 | x0 x1 x0 x1
    let xv = _mm256_setr_ps(x0, x1, x0, x1, x0, x1, x0, x1);
    // x0 x1 x0 x1
    let xpair = _mm256_castps256_ps128(xv);

    // 8 rows at a time, at row 8*i
    let batch_8 = |i: usize| unsafe {
        let r1 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i)), xv); // a0 a1 b0 b1 | c0 c1 d0 d1
        let r2 = _mm256_mul_ps(_mm256_loadu_ps(mat.add(16 * i + 8)), xv); // e0 e1 f0 f1 | g0 g1 h0 h1

        // a b e f | c d g h
        let h = _mm256_hadd_ps(r1, r2);
        // swap the middle 64-bit chunks: a b c d | e f g h
        let o = _mm256_castpd_ps(_mm256_permute4x64_pd::<0xD8>(_mm256_castps_pd(h)));
        _mm256_storeu_ps(out.add(8 * i), o);
    };

    // 4 rows at a time, at row 4*i
    let batch_4 = |i: usize| unsafe {
        let r = _mm256_mul_ps(_mm256_loadu_ps(mat.add(8 * i)), xv); // a0 a1 b0 b1 | c0 c1 d0 d1

        let lo = _mm256_castps256_ps128(r);
        let hi = _mm256_extractf128_ps::<1>(r);
        let even = _mm_shuffle_ps::<0x88>(lo, hi); // a0 b0 c0 d0
        let odd = _mm_shuffle_ps::<0xDD>(lo, hi); // a1 b1 c1 d1
        _mm_storeu_ps(out.add(4 * i), _mm_add_ps(even, odd));
    };

    // 2 rows at a time, at row 2*i
    let batch_2 = |i: usize| unsafe {
        let r = _mm_mul_ps(_mm_loadu_ps(mat.add(4 * i)), xpair); // a0 a1 b0 b1

        // a0+a1 | _ | b0+b1 | _
        let s = _mm_add_ps(r, _mm_movehdup_ps(r));
        out.add(2 * i).write(_mm_cvtss_f32(s));
        out.add(2 * i + 1)
            .write(f32::from_bits(_mm_extract_ps::<2>(s) as u32));
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        out.add(i).write(x0 * *mat.add(2 * i) + x1 * *mat.add(2 * i + 1));
    };

    unroll::<1>(0, R / 8, batch_8);

    if R % 8 >= 4 {
        batch_4(R / 4 - 1);
    }
    if R % 4 >= 2 {
        batch_2(R / 2 - 1);
    }
    if R % 2 == 1 {
        batch_1(R - 1);
    }
}

/// Computes `out[i] = dot(mat row i, input)` for an R×2 f64 matrix.
///
/// The input pair is tiled twice across a 256-bit register; the bulk batch
/// covers 4 rows. Shapes with a lone-row remainder below 12 rows skip the
/// 4-row batch entirely and run the 2-row packed kernel over the bulk
/// instead.
///
/// # Safety
///
/// Same contract as [`matvec_f32_c2`], with f64 buffers.
#[target_feature(enable = "avx2,fma")]
#[allow(unsafe_op_in_unsafe_fn)]
pub unsafe fn matvec_f64_c2<const R: usize>(mat: *const f64, input: *const f64, out: *mut f64) {
    use std::arch::x86_64::*;

    // x0 x1 | x0 x1
    let xv = _mm256_loadu2_m128d(input, input);
    // x0 x1
    let xpair = _mm256_castpd256_pd128(xv);

    // 4 rows at a time, at row 4*i
    let batch_4 = |i: usize| unsafe {
        let r12 = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i)), xv); // a0 a1 | b0 b1
        let r34 = _mm256_mul_pd(_mm256_loadu_pd(mat.add(8 * i + 4)), xv); // c0 c1 | d0 d1

        // a0+a1 | c0+c1 || b0+b1 | d0+d1
        let h = _mm256_hadd_pd(r12, r34);
        // a | b | c | d
        let o = _mm256_permute4x64_pd::<0xD8>(h);
        _mm256_storeu_pd(out.add(4 * i), o);
    };

    // 2 rows at a time, at row 2*i
    let batch_2 = |i: usize| unsafe {
        let r0 = _mm_mul_pd(_mm_loadu_pd(mat.add(4 * i)), xpair); // a0 a1
        out.add(2 * i)
            .write(_mm_cvtsd_f64(_mm_add_sd(r0, _mm_permute_pd::<1>(r0))));

        let r1 = _mm_mul_pd(_mm_loadu_pd(mat.add(4 * i + 2)), xpair); // b0 b1
        out.add(2 * i + 1)
            .write(_mm_cvtsd_f64(_mm_add_sd(r1, _mm_permute_pd::<1>(r1))));
    };

    // single row i
    let batch_1 = |i: usize| unsafe {
        let r = _mm_mul_pd(_mm_loadu_pd(mat.add(2 * i)), _mm_loadu_pd(input)); // a0 a1
        out.add(i)
            .write(_mm_cvtsd_f64(_mm_add_sd(r, _mm_unpackhi_pd(r, r))));
    };

    if R % 4 == 0 {
        unroll::<1>(0, R / 4, batch_4);
    } else if R % 4 == 1 && R < 12 {
        unroll::<1>(0, R / 2, batch_2);
    } else {
        unroll::<1>(0, R / 4, batch_4);
        if R % 4 >= 2 {
            batch_2(R / 2 - 1);
        }
    }
    if R % 2 == 1 {
        batch_1(R - 1);
    }
}
