//! Element types the kernels are specialized for.

use std::ops::{Add, AddAssign, Mul, Sub};

/// The two floating-point widths the kernel family supports.
///
/// Everything the naive reference, the validation gate and the tests need
/// to stay generic over f32/f64 lives here: arithmetic, the machine epsilon
/// used for the error bound, and a widening conversion for reporting.
pub trait Element:
    Copy
    + PartialEq
    + PartialOrd
    + std::fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    /// Element width in bits, for report labels.
    const BITS: u32;
    const ZERO: Self;
    const NAN: Self;
    /// Machine epsilon for this width; the validation bound is 4× this.
    const EPSILON: Self;

    fn abs(self) -> Self;
    fn to_f64(self) -> f64;
}

impl Element for f32 {
    const BITS: u32 = 32;
    const ZERO: f32 = 0.0;
    const NAN: f32 = f32::NAN;
    const EPSILON: f32 = f32::EPSILON;

    fn abs(self) -> f32 {
        self.abs()
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Element for f64 {
    const BITS: u32 = 64;
    const ZERO: f64 = 0.0;
    const NAN: f64 = f64::NAN;
    const EPSILON: f64 = f64::EPSILON;

    fn abs(self) -> f64 {
        self.abs()
    }

    fn to_f64(self) -> f64 {
        self
    }
}
