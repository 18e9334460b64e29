//! Validation and benchmark runner for the fixed-shape matvec kernels.
//!
//! `matvec check` (the default) sweeps every supported shape against the
//! references and exits non-zero at the first epsilon-bound violation.
//! `matvec bench [name]` times the kernels against the naive loop, nalgebra
//! and ndarray, printing a console table and writing `bench_out/<name>.json`.

use anyhow::Result;
use matvec::report::{BenchRecord, BenchReport};
use matvec::{Element, FixedMatrix, FixedVector, matvec_naive, multiply, validate};
use ndarray::linalg::general_mat_vec_mul;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use std::path::Path;
use std::time::Instant;

const SEED: u64 = 0;
const WARMUP_ITERS: u64 = 1_000;
const TIMED_ITERS: u64 = 200_000;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("check") => run_check(),
        Some("bench") => run_bench(args.next().unwrap_or_else(|| "matvec".to_string())),
        Some(other) => {
            anyhow::bail!("unknown command {other:?}; usage: matvec [check | bench [name]]")
        }
    }
}

fn run_check() -> Result<()> {
    println!("=== Fixed-shape matvec validation ===\n");

    #[cfg(target_arch = "x86_64")]
    {
        let has_avx2 = is_x86_feature_detected!("avx2");
        let has_fma = is_x86_feature_detected!("fma");
        println!("CPU features: AVX2={}, FMA={}", has_avx2, has_fma);
        if !(has_avx2 && has_fma) {
            println!("SIMD kernels unavailable; validating the scalar fallback");
        }
        println!();
    }

    if !validate::run_full_sweep(SEED) {
        std::process::exit(1);
    }
    println!("\nall shapes pass");
    Ok(())
}

/// Times `f` after a warmup, returning average nanoseconds per call.
fn time_ns<F: FnMut()>(mut f: F) -> f64 {
    for _ in 0..WARMUP_ITERS {
        f();
    }
    let start = Instant::now();
    for _ in 0..TIMED_ITERS {
        f();
    }
    start.elapsed().as_nanos() as f64 / TIMED_ITERS as f64
}

macro_rules! bench_shape {
    ($t:ty, $r:expr, $c:expr, $report:ident) => {{
        let mut rng = ChaCha8Rng::seed_from_u64(SEED);
        let mat = FixedMatrix::<$t, { $r }, { $c }>::random(&mut rng);
        let input = FixedVector::<$t, { $c }>::random(&mut rng);

        let mut out = FixedVector::<$t, { $r }>::zeros();
        let ns_simd = time_ns(|| {
            multiply(black_box(&mat), black_box(&input), black_box(&mut out));
        });

        let mut out_naive = FixedVector::<$t, { $r }>::zeros();
        let ns_naive = time_ns(|| {
            matvec_naive(black_box(&mat), black_box(&input), black_box(&mut out_naive));
        });

        let dm = nalgebra::DMatrix::<$t>::from_row_slice($r, $c, mat.as_flat());
        let dx = nalgebra::DVector::<$t>::from_column_slice(input.as_slice());
        let mut dy = nalgebra::DVector::<$t>::zeros($r);
        let ns_nalgebra = time_ns(|| {
            dm.mul_to(black_box(&dx), black_box(&mut dy));
        });

        let am = ndarray::Array2::<$t>::from_shape_vec(($r, $c), mat.as_flat().to_vec())
            .expect("matrix slice matches shape");
        let ax = ndarray::Array1::<$t>::from_vec(input.as_slice().to_vec());
        let mut ay = ndarray::Array1::<$t>::zeros($r);
        let ns_ndarray = time_ns(|| {
            general_mat_vec_mul(1.0, black_box(&am), black_box(&ax), 0.0, black_box(&mut ay));
        });

        let bits = <$t as Element>::BITS;
        println!(
            "f{:<3} {:>4}x{:<2} {:>9.1} {:>9.1} {:>9.1} {:>9.1} {:>7.1}x",
            bits,
            $r,
            $c,
            ns_simd,
            ns_naive,
            ns_nalgebra,
            ns_ndarray,
            ns_naive / ns_simd
        );

        for (method, ns) in [
            ("simd", ns_simd),
            ("naive", ns_naive),
            ("nalgebra", ns_nalgebra),
            ("ndarray", ns_ndarray),
        ] {
            $report.push(BenchRecord {
                method,
                width_bits: bits,
                rows: $r,
                cols: $c,
                ns_per_iter: ns,
                iterations: TIMED_ITERS,
            });
        }
    }};
}

macro_rules! bench_col {
    ($t:ty, $c:expr, $report:ident) => {
        bench_shape!($t, 4, $c, $report);
        bench_shape!($t, 16, $c, $report);
        bench_shape!($t, 64, $c, $report);
        bench_shape!($t, 128, $c, $report);
    };
}

fn run_bench(name: String) -> Result<()> {
    println!("=== Fixed-shape matvec benchmark: {} ===\n", name);

    #[cfg(target_arch = "x86_64")]
    println!(
        "CPU features: AVX2={}, FMA={}\n",
        is_x86_feature_detected!("avx2"),
        is_x86_feature_detected!("fma")
    );

    println!(
        "{:<4} {:>7} {:>9} {:>9} {:>9} {:>9} {:>8}",
        "type", "shape", "simd", "naive", "nalgebra", "ndarray", "speedup"
    );
    println!("{}", "-".repeat(62));

    let mut report = BenchReport::new(name);

    bench_col!(f32, 2, report);
    bench_col!(f32, 4, report);
    bench_col!(f32, 8, report);
    bench_col!(f64, 2, report);
    bench_col!(f64, 4, report);
    bench_col!(f64, 8, report);

    println!("{}", "-".repeat(62));
    println!("times are ns per call; speedup is naive / simd");

    let path = report.save(Path::new("bench_out"))?;
    println!("wrote {}", path.display());
    Ok(())
}
