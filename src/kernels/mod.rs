//! SIMD reduction kernels for fixed-shape matrix-vector products.
//!
//! One kernel per (element width, column count) pair, six in total. Each
//! kernel batches several output rows per register operation, collapses the
//! row products with a horizontal-add tree, and walks a ladder of smaller
//! batches for rows left over from the bulk, down to a single-row fallback.
//! The row count is a const generic, so the batch split is decided entirely
//! at compile time.
//!
//! Available kernels:
//! - `kernel_c2`: 2-column rows, f32 (8-row batches) and f64 (4-row batches)
//! - `kernel_c4`: 4-column rows, f32 (4-row batches) and f64 (2-row batches)
//! - `kernel_c8`: 8-column rows, f32 (4-row batches) and f64 (2-row batches,
//!   FMA across the two half-rows)

pub mod kernel_c2;
pub mod kernel_c4;
pub mod kernel_c8;

pub use kernel_c2::{matvec_f32_c2, matvec_f64_c2};
pub use kernel_c4::{matvec_f32_c4, matvec_f64_c4};
pub use kernel_c8::{matvec_f32_c8, matvec_f64_c8};
