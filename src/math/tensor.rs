use rand::prelude::*;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::ShapeError;

/// Extents of a three-axis tensor (width × height × depth).
///
/// Every extent is positive; deserialization goes through the same check
/// as `try_new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTdSize")]
pub struct TdSize {
    x: usize,
    y: usize,
    z: usize,
}

#[derive(Deserialize)]
struct RawTdSize {
    x: usize,
    y: usize,
    z: usize,
}

impl TryFrom<RawTdSize> for TdSize {
    type Error = ShapeError;

    fn try_from(raw: RawTdSize) -> Result<TdSize, ShapeError> {
        TdSize::try_new(raw.x, raw.y, raw.z)
    }
}

impl TdSize {
    /// Panics if any extent is zero.
    pub fn new(x: usize, y: usize, z: usize) -> TdSize {
        match TdSize::try_new(x, y, z) {
            Ok(size) => size,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_new(x: usize, y: usize, z: usize) -> Result<TdSize, ShapeError> {
        if x == 0 || y == 0 || z == 0 {
            return Err(ShapeError::ZeroExtent { x, y, z });
        }
        Ok(TdSize { x, y, z })
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn z(&self) -> usize {
        self.z
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.x * self.y * self.z
    }
}

impl fmt::Display for TdSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// Dense three-axis tensor addressed by `(x, y, z)`.
///
/// Storage is flat with `x` varying fastest, then `y`, then `z`. The data
/// length always equals `size().len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTensor")]
pub struct Tensor {
    size: TdSize,
    data: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTensor {
    size: TdSize,
    data: Vec<f64>,
}

impl TryFrom<RawTensor> for Tensor {
    type Error = ShapeError;

    fn try_from(raw: RawTensor) -> Result<Tensor, ShapeError> {
        Tensor::try_from_data(raw.size, raw.data)
    }
}

impl Tensor {
    pub fn zeros(size: TdSize) -> Tensor {
        Tensor {
            size,
            data: vec![0.0; size.len()],
        }
    }

    /// Wraps flat data laid out as `z*(x*y) + y*x + x`. Panics on a length mismatch.
    pub fn from_data(size: TdSize, data: Vec<f64>) -> Tensor {
        match Tensor::try_from_data(size, data) {
            Ok(t) => t,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_from_data(size: TdSize, data: Vec<f64>) -> Result<Tensor, ShapeError> {
        if data.len() != size.len() {
            return Err(ShapeError::DataLength { size, actual: data.len() });
        }
        Ok(Tensor { size, data })
    }

    pub fn size(&self) -> TdSize {
        self.size
    }

    /// Uniform values in [-1, 1).
    pub fn random(size: TdSize) -> Tensor {
        Tensor::random_with(size, &mut rand::thread_rng())
    }

    /// Same as `random` but drawing from a caller-supplied generator, so
    /// seeded runs are reproducible.
    pub fn random_with<R: Rng + ?Sized>(size: TdSize, rng: &mut R) -> Tensor {
        let data = (0..size.len()).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect();
        Tensor { size, data }
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        let s = self.size;
        if x >= s.x || y >= s.y || z >= s.z {
            panic!("index ({x}, {y}, {z}) out of bounds for tensor of size {s}");
        }
        z * (s.x * s.y) + y * s.x + x
    }

    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.data[self.offset(x, y, z)]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, f64> {
        self.data.iter_mut()
    }

    pub fn map<F>(&self, functor: F) -> Tensor
    where
        F: Fn(f64) -> f64,
    {
        Tensor {
            size: self.size,
            data: self.data.iter().map(|&v| functor(v)).collect(),
        }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl Index<(usize, usize, usize)> for Tensor {
    type Output = f64;

    fn index(&self, (x, y, z): (usize, usize, usize)) -> &f64 {
        &self.data[self.offset(x, y, z)]
    }
}

impl IndexMut<(usize, usize, usize)> for Tensor {
    fn index_mut(&mut self, (x, y, z): (usize, usize, usize)) -> &mut f64 {
        let i = self.offset(x, y, z);
        &mut self.data[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_x_fastest() {
        let size = TdSize::new(2, 3, 2);
        let t = Tensor::from_data(size, (0..12).map(|v| v as f64).collect());
        assert_eq!(t[(1, 0, 0)], 1.0);
        assert_eq!(t[(0, 1, 0)], 2.0);
        assert_eq!(t[(0, 0, 1)], 6.0);
        assert_eq!(t.get(1, 2, 1), 11.0);
    }

    #[test]
    #[should_panic]
    fn zero_extent_is_rejected() {
        TdSize::new(4, 0, 1);
    }

    #[test]
    #[should_panic]
    fn from_data_checks_length() {
        Tensor::from_data(TdSize::new(3, 1, 1), vec![1.0, 2.0]);
    }

    #[test]
    fn random_stays_in_unit_range() {
        let t = Tensor::random(TdSize::new(8, 4, 2));
        assert!(t.min() >= -1.0);
        assert!(t.max() < 1.0);
    }

    #[test]
    fn index_mut_writes_through() {
        let mut t = Tensor::zeros(TdSize::new(2, 2, 1));
        t[(1, 1, 0)] = 5.0;
        assert_eq!(t.as_slice(), &[0.0, 0.0, 0.0, 5.0]);
        assert_eq!(t.sum(), 5.0);
    }
}
