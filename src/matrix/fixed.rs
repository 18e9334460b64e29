//! Fixed-shape matrix and vector types.
//!
//! Thin wrappers around plain arrays: row-major, contiguous, no padding.
//! The shape lives in the type, so a dimension mismatch is a compile error
//! rather than a runtime check.

use crate::element::Element;
use rand::Rng;
use rand::distr::{Distribution, StandardUniform};
use std::ops::{Index, IndexMut};

/// Dense R×C matrix with row-major storage and element (i, j) at flat
/// offset `i * C + j`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct FixedMatrix<T, const R: usize, const C: usize> {
    rows: [[T; C]; R],
}

impl<T: Element, const R: usize, const C: usize> FixedMatrix<T, R, C> {
    pub const fn from_rows(rows: [[T; C]; R]) -> Self {
        FixedMatrix { rows }
    }

    pub fn zeros() -> Self {
        FixedMatrix {
            rows: [[T::ZERO; C]; R],
        }
    }

    /// Fills every element from `rng` in row-major order.
    pub fn random<G: Rng>(rng: &mut G) -> Self
    where
        StandardUniform: Distribution<T>,
    {
        let mut mat = Self::zeros();
        for row in mat.rows.iter_mut() {
            for value in row.iter_mut() {
                *value = rng.random();
            }
        }
        mat
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.rows[i][j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.rows[i][j] = value;
    }

    /// The R*C elements as one contiguous row-major slice.
    #[inline]
    pub fn as_flat(&self) -> &[T] {
        self.rows.as_flattened()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.rows.as_ptr().cast()
    }
}

/// Contiguous vector of N elements.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(transparent)]
pub struct FixedVector<T, const N: usize> {
    data: [T; N],
}

impl<T: Element, const N: usize> FixedVector<T, N> {
    pub const fn from_array(data: [T; N]) -> Self {
        FixedVector { data }
    }

    pub fn zeros() -> Self {
        FixedVector {
            data: [T::ZERO; N],
        }
    }

    pub fn random<G: Rng>(rng: &mut G) -> Self
    where
        StandardUniform: Distribution<T>,
    {
        let mut vec = Self::zeros();
        for value in vec.data.iter_mut() {
            *value = rng.random();
        }
        vec
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.data.as_mut_ptr()
    }
}

impl<T, const N: usize> Index<usize> for FixedVector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for FixedVector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}
