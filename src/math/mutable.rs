use std::ops::Deref;

use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// A matrix whose operations mutate it in place.
///
/// Dereferences to [`Matrix`], which serves as the immutable view; every
/// non-mutating operation of `Matrix` is therefore available too.
#[derive(Debug, Clone, PartialEq)]
pub struct MutableMatrix {
    inner: Matrix,
}

impl MutableMatrix {
    /// All-zero matrix; ShapeError if either dimension is 0.
    pub fn zeros(rows: usize, cols: usize) -> Result<MutableMatrix> {
        Ok(MutableMatrix { inner: Matrix::zeros(rows, cols)? })
    }

    pub(crate) fn zeroed(rows: usize, cols: usize) -> MutableMatrix {
        MutableMatrix { inner: Matrix::zeroed(rows, cols) }
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<&mut Self> {
        self.inner.check_index(i, j)?;
        self.inner.data_mut()[i][j] = value;
        Ok(self)
    }

    /// Unchecked write for loops whose bounds were validated up front.
    pub(crate) fn put(&mut self, i: usize, j: usize, value: f64) {
        self.inner.data_mut()[i][j] = value;
    }

    pub fn add_in_place(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.zip_in_place("add_in_place", rhs, |a, b| *a += b)
    }

    pub fn subtract_in_place(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.zip_in_place("subtract_in_place", rhs, |a, b| *a -= b)
    }

    pub fn scale_in_place(&mut self, factor: f64) -> &mut Self {
        self.map_in_place(|x| x * factor)
    }

    pub fn map_in_place<F>(&mut self, functor: F) -> &mut Self
    where
        F: Fn(f64) -> f64,
    {
        for row in self.inner.data_mut().iter_mut() {
            for x in row.iter_mut() {
                *x = functor(*x);
            }
        }
        self
    }

    pub fn fill(&mut self, value: f64) -> &mut Self {
        self.map_in_place(|_| value)
    }

    /// Replaces the contents with `values`, which must have the same shape.
    pub fn assign(&mut self, values: Matrix) -> Result<&mut Self> {
        self.inner.require_same_shape("assign", &values)?;
        self.inner = values;
        Ok(self)
    }

    pub fn as_matrix(&self) -> &Matrix {
        &self.inner
    }

    pub fn into_matrix(self) -> Matrix {
        self.inner
    }

    fn zip_in_place<F>(&mut self, op: &'static str, rhs: &Matrix, f: F) -> Result<&mut Self>
    where
        F: Fn(&mut f64, f64),
    {
        if self.inner.shape() != rhs.shape() {
            return Err(Error::shape(op, self.inner.shape(), rhs.shape()));
        }
        let (rows, cols) = rhs.shape();
        let data = self.inner.data_mut();
        for i in 0..rows {
            for j in 0..cols {
                f(&mut data[i][j], rhs.at(i, j));
            }
        }
        Ok(self)
    }
}

impl Deref for MutableMatrix {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.inner
    }
}

impl From<Matrix> for MutableMatrix {
    fn from(inner: Matrix) -> Self {
        MutableMatrix { inner }
    }
}

impl From<MutableMatrix> for Matrix {
    fn from(m: MutableMatrix) -> Self {
        m.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_place_operations_chain() {
        let mut m = MutableMatrix::zeros(2, 2).unwrap();
        m.set(0, 1, 2.0).unwrap();
        m.add_in_place(&Matrix::filled(2, 2, 1.0).unwrap())
            .unwrap()
            .scale_in_place(3.0)
            .map_in_place(|x| x - 1.0);
        assert_eq!(m.to_vec(), vec![2.0, 8.0, 2.0, 2.0]);
    }

    #[test]
    fn immutable_view_does_not_alias_copies() {
        let mut m = MutableMatrix::from(Matrix::identity(2).unwrap());
        let snapshot = m.transpose();
        m.set(0, 0, 5.0).unwrap();
        assert_eq!(snapshot.get(0, 0).unwrap(), 1.0);
        assert_eq!(m.get(0, 0).unwrap(), 5.0);
    }

    #[test]
    fn shape_and_index_checks() {
        let mut m = MutableMatrix::zeros(2, 3).unwrap();
        assert!(matches!(m.set(2, 0, 1.0), Err(Error::Index { .. })));
        assert!(matches!(m.add_in_place(&Matrix::zeros(3, 2).unwrap()), Err(Error::Shape { .. })));
        assert!(m.assign(Matrix::zeros(1, 1).unwrap()).is_err());
        assert!(m.assign(Matrix::filled(2, 3, 4.0).unwrap()).is_ok());
        assert_eq!(m.sum(), 24.0);
    }

    #[test]
    fn zeros_rejects_empty_dimensions() {
        assert!(matches!(MutableMatrix::zeros(3, 0), Err(Error::Shape { .. })));
    }
}
