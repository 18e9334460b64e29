//! Correctness gate for the reduction kernels.
//!
//! Every supported shape is checked against three independent references:
//! the naive scalar loop, nalgebra and ndarray. The kernels reduce in
//! pairwise trees rather than left to right, so outputs are compared under
//! an absolute bound of 4× machine epsilon on the worst per-element
//! difference, not bit equality. Any shape exceeding the bound is a hard
//! failure: the sweep reports it and stops immediately.

use crate::dispatch::ColKernel;
use crate::element::Element;
use crate::matrix::fixed::{FixedMatrix, FixedVector};
use crate::matrix::naive::matvec_naive;
use crate::multiply;
use rand::SeedableRng;
use rand::distr::{Distribution, StandardUniform};
use rand_chacha::ChaCha8Rng;

/// Ground-truth matrix-vector products from the two reference libraries.
///
/// Implemented concretely per width; the references run on dynamically
/// sized types since they only provide expected values.
pub trait RefProd: Element {
    fn nalgebra_prod(mat: &[Self], input: &[Self], out: &mut [Self]);
    fn ndarray_prod(mat: &[Self], input: &[Self], out: &mut [Self]);
}

impl RefProd for f32 {
    fn nalgebra_prod(mat: &[f32], input: &[f32], out: &mut [f32]) {
        let m = nalgebra::DMatrix::from_row_slice(out.len(), input.len(), mat);
        let x = nalgebra::DVector::from_column_slice(input);
        out.copy_from_slice((m * x).as_slice());
    }

    fn ndarray_prod(mat: &[f32], input: &[f32], out: &mut [f32]) {
        let m = ndarray::ArrayView2::from_shape((out.len(), input.len()), mat)
            .expect("matrix slice matches shape");
        let y = m.dot(&ndarray::ArrayView1::from(input));
        out.copy_from_slice(y.as_slice().expect("product is contiguous"));
    }
}

impl RefProd for f64 {
    fn nalgebra_prod(mat: &[f64], input: &[f64], out: &mut [f64]) {
        let m = nalgebra::DMatrix::from_row_slice(out.len(), input.len(), mat);
        let x = nalgebra::DVector::from_column_slice(input);
        out.copy_from_slice((m * x).as_slice());
    }

    fn ndarray_prod(mat: &[f64], input: &[f64], out: &mut [f64]) {
        let m = ndarray::ArrayView2::from_shape((out.len(), input.len()), mat)
            .expect("matrix slice matches shape");
        let y = m.dot(&ndarray::ArrayView1::from(input));
        out.copy_from_slice(y.as_slice().expect("product is contiguous"));
    }
}

/// Outcome of checking one (width, rows, cols) shape.
#[derive(Clone, Debug)]
pub struct ShapeReport {
    pub width_bits: u32,
    pub rows: usize,
    pub cols: usize,
    /// Worst per-element absolute difference against each reference.
    pub err_naive: f64,
    pub err_nalgebra: f64,
    pub err_ndarray: f64,
    pub pass: bool,
    /// Kernel output and naive expectation, widened for reporting.
    pub out: Vec<f64>,
    pub expected: Vec<f64>,
}

/// Worst absolute per-element difference between two equal-length slices.
pub fn max_abs_diff<T: Element>(a: &[T], b: &[T]) -> T {
    let mut max = T::ZERO;
    for (x, y) in a.iter().zip(b) {
        let d = (*x - *y).abs();
        if d > max {
            max = d;
        }
    }
    max
}

/// Compares an already-computed kernel output against all three references
/// recomputed from `mat` and `input`.
pub fn compare_shape<T: RefProd, const R: usize, const C: usize>(
    mat: &FixedMatrix<T, R, C>,
    input: &FixedVector<T, C>,
    out: &FixedVector<T, R>,
) -> ShapeReport {
    let mut expected = FixedVector::<T, R>::zeros();
    matvec_naive(mat, input, &mut expected);

    let mut out_nalgebra = vec![T::ZERO; R];
    let mut out_ndarray = vec![T::ZERO; R];
    T::nalgebra_prod(mat.as_flat(), input.as_slice(), &mut out_nalgebra);
    T::ndarray_prod(mat.as_flat(), input.as_slice(), &mut out_ndarray);

    let err_naive = max_abs_diff(out.as_slice(), expected.as_slice()).to_f64();
    let err_nalgebra = max_abs_diff(out.as_slice(), &out_nalgebra).to_f64();
    let err_ndarray = max_abs_diff(out.as_slice(), &out_ndarray).to_f64();

    let tolerance = 4.0 * T::EPSILON.to_f64();
    let pass = err_naive <= tolerance && err_nalgebra <= tolerance && err_ndarray <= tolerance;

    ShapeReport {
        width_bits: T::BITS,
        rows: R,
        cols: C,
        err_naive,
        err_nalgebra,
        err_ndarray,
        pass,
        out: out.as_slice().iter().map(|v| v.to_f64()).collect(),
        expected: expected.as_slice().iter().map(|v| v.to_f64()).collect(),
    }
}

/// Generates seeded random data for one shape, runs the kernel, and
/// compares against the references.
pub fn check_shape<T, const R: usize, const C: usize>(seed: u64) -> ShapeReport
where
    T: RefProd + ColKernel<C>,
    StandardUniform: Distribution<T>,
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mat = FixedMatrix::<T, R, C>::random(&mut rng);
    let input = FixedVector::<T, C>::random(&mut rng);
    let mut out = FixedVector::<T, R>::zeros();

    multiply(&mat, &input, &mut out);
    compare_shape(&mat, &input, &out)
}

fn check_and_report<T, const R: usize, const C: usize>(seed: u64) -> bool
where
    T: RefProd + ColKernel<C>,
    StandardUniform: Distribution<T>,
{
    let report = check_shape::<T, R, C>(seed);
    print!(
        "testing [f{}][{:>4} x {}] : ",
        report.width_bits, report.rows, report.cols
    );
    if report.pass {
        println!("pass");
        return true;
    }
    println!("FAIL");
    println!("  max error vs naive    : {:e}", report.err_naive);
    println!("  max error vs nalgebra : {:e}", report.err_nalgebra);
    println!("  max error vs ndarray  : {:e}", report.err_ndarray);
    println!("  kernel : {:?}", report.out);
    println!("  naive  : {:?}", report.expected);
    false
}

macro_rules! check_rows_4 {
    ($t:ty, $c:expr, $r:expr, $seed:expr) => {
        if !check_and_report::<$t, { $r }, { $c }>($seed) {
            return false;
        }
        if !check_and_report::<$t, { $r + 1 }, { $c }>($seed) {
            return false;
        }
        if !check_and_report::<$t, { $r + 2 }, { $c }>($seed) {
            return false;
        }
        if !check_and_report::<$t, { $r + 3 }, { $c }>($seed) {
            return false;
        }
    };
}

macro_rules! check_rows_16 {
    ($t:ty, $c:expr, $r:expr, $seed:expr) => {
        check_rows_4!($t, $c, $r, $seed);
        check_rows_4!($t, $c, ($r + 4), $seed);
        check_rows_4!($t, $c, ($r + 8), $seed);
        check_rows_4!($t, $c, ($r + 12), $seed);
    };
}

macro_rules! check_rows_64 {
    ($t:ty, $c:expr, $r:expr, $seed:expr) => {
        check_rows_16!($t, $c, $r, $seed);
        check_rows_16!($t, $c, ($r + 16), $seed);
        check_rows_16!($t, $c, ($r + 32), $seed);
        check_rows_16!($t, $c, ($r + 48), $seed);
    };
}

macro_rules! check_rows_128 {
    ($t:ty, $c:expr, $seed:expr) => {
        check_rows_64!($t, $c, 0, $seed);
        check_rows_64!($t, $c, 64, $seed);
        // the ladder covers 0..=127; close the range at 128
        if !check_and_report::<$t, 128, { $c }>($seed) {
            return false;
        }
    };
}

/// Checks every supported shape: both widths, C in {2, 4, 8}, rows 0..=128.
///
/// Prints one line per shape and stops at the first failure, returning
/// `false` so the caller can exit non-zero. Deviation beyond the epsilon
/// bound means a defect in a reduction tree; continuing past it would only
/// bury the signal.
pub fn run_full_sweep(seed: u64) -> bool {
    check_rows_128!(f32, 2, seed);
    check_rows_128!(f32, 4, seed);
    check_rows_128!(f32, 8, seed);
    check_rows_128!(f64, 2, seed);
    check_rows_128!(f64, 4, seed);
    check_rows_128!(f64, 8, seed);
    true
}
