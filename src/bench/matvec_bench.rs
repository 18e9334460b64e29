//! Criterion benchmarks for the fixed-shape matvec kernels.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use matvec::{FixedMatrix, FixedVector, matvec_naive, multiply};
use ndarray::linalg::general_mat_vec_mul;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

macro_rules! bench_shape {
    ($crit:expr, $t:ty, $r:literal, $c:literal) => {{
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mat = FixedMatrix::<$t, $r, $c>::random(&mut rng);
        let input = FixedVector::<$t, $c>::random(&mut rng);

        let mut out = FixedVector::<$t, $r>::zeros();
        $crit.bench_function(
            concat!("simd_", stringify!($t), "_", $r, "x", $c),
            |b| {
                b.iter(|| multiply(black_box(&mat), black_box(&input), black_box(&mut out)))
            },
        );

        let mut out_naive = FixedVector::<$t, $r>::zeros();
        $crit.bench_function(
            concat!("naive_", stringify!($t), "_", $r, "x", $c),
            |b| {
                b.iter(|| {
                    matvec_naive(black_box(&mat), black_box(&input), black_box(&mut out_naive))
                })
            },
        );

        let dm = nalgebra::DMatrix::<$t>::from_row_slice($r, $c, mat.as_flat());
        let dx = nalgebra::DVector::<$t>::from_column_slice(input.as_slice());
        let mut dy = nalgebra::DVector::<$t>::zeros($r);
        $crit.bench_function(
            concat!("nalgebra_", stringify!($t), "_", $r, "x", $c),
            |b| b.iter(|| dm.mul_to(black_box(&dx), black_box(&mut dy))),
        );

        let am = ndarray::Array2::<$t>::from_shape_vec(($r, $c), mat.as_flat().to_vec())
            .expect("matrix slice matches shape");
        let ax = ndarray::Array1::<$t>::from_vec(input.as_slice().to_vec());
        let mut ay = ndarray::Array1::<$t>::zeros($r);
        $crit.bench_function(
            concat!("ndarray_", stringify!($t), "_", $r, "x", $c),
            |b| {
                b.iter(|| {
                    general_mat_vec_mul(1.0, black_box(&am), black_box(&ax), 0.0, black_box(&mut ay))
                })
            },
        );
    }};
}

fn bench_f32(c: &mut Criterion) {
    bench_shape!(c, f32, 16, 2);
    bench_shape!(c, f32, 128, 2);
    bench_shape!(c, f32, 16, 4);
    bench_shape!(c, f32, 128, 4);
    bench_shape!(c, f32, 16, 8);
    bench_shape!(c, f32, 128, 8);
}

fn bench_f64(c: &mut Criterion) {
    bench_shape!(c, f64, 16, 2);
    bench_shape!(c, f64, 128, 2);
    bench_shape!(c, f64, 16, 4);
    bench_shape!(c, f64, 128, 4);
    bench_shape!(c, f64, 16, 8);
    bench_shape!(c, f64, 128, 8);
}

criterion_group!(benches, bench_f32, bench_f64);
criterion_main!(benches);
