//! Reference matrix/vector types and the scalar baseline.
//!
//! These provide the shapes the kernels operate on and the correctness
//! baseline they are validated against.

pub mod fixed;
pub mod naive;

pub use fixed::{FixedMatrix, FixedVector};
pub use naive::matvec_naive;
