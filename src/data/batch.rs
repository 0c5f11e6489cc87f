use crate::data::point::LabelledDataPoint;
use crate::error::{Error, Result};
use crate::math::matrix::Matrix;

/// Splits a stream of data points into batches of `batch_size`.
///
/// The last batch holds whatever remains and may be shorter; it is never
/// dropped. The underlying iterator is pulled lazily, one batch at a time.
pub struct Batches<I> {
    inner: I,
    batch_size: usize,
}

pub fn batches<I>(points: I, batch_size: usize) -> Result<Batches<I::IntoIter>>
where
    I: IntoIterator<Item = LabelledDataPoint>,
{
    if batch_size == 0 {
        return Err(Error::InvalidOptions("batch_size must be at least 1".into()));
    }
    Ok(Batches { inner: points.into_iter(), batch_size })
}

impl<I> Iterator for Batches<I>
where
    I: Iterator<Item = LabelledDataPoint>,
{
    type Item = Vec<LabelledDataPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<_> = self.inner.by_ref().take(self.batch_size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}

/// Stacks a batch into `(inputs, outputs)`, one data point per column.
pub fn to_matrices(batch: &[LabelledDataPoint]) -> Result<(Matrix, Matrix)> {
    let first = batch
        .first()
        .ok_or_else(|| Error::InvalidOptions("cannot stack an empty batch".into()))?;
    let inputs: Vec<Matrix> = batch.iter().map(|p| p.input.clone()).collect();
    let outputs: Vec<Matrix> = batch.iter().map(|p| p.output.clone()).collect();
    Ok((
        Matrix::from_columns(first.input.rows(), batch.len(), &inputs)?,
        Matrix::from_columns(first.output.rows(), batch.len(), &outputs)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<LabelledDataPoint> {
        (0..n)
            .map(|i| LabelledDataPoint::from_slices(&[i as f64, 1.0], &[i as f64]).unwrap())
            .collect()
    }

    #[test]
    fn remainder_batch_is_kept() {
        let sizes: Vec<usize> = batches(points(7), 3).unwrap().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn exact_division_has_no_empty_tail() {
        let sizes: Vec<usize> = batches(points(6), 2).unwrap().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![2, 2, 2]);
        assert_eq!(batches(Vec::<LabelledDataPoint>::new(), 4).unwrap().count(), 0);
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        assert!(matches!(batches(points(3), 0), Err(Error::InvalidOptions(_))));
    }

    #[test]
    fn stacking_puts_points_in_columns() {
        let (x, y) = to_matrices(&points(3)).unwrap();
        assert_eq!(x.shape(), (2, 3));
        assert_eq!(y.shape(), (1, 3));
        assert_eq!(x.get(0, 2).unwrap(), 2.0);
        assert!(to_matrices(&[]).is_err());
    }
}
