use crate::error::{Error, Result};

/// Dense row-major matrix of `f64` with dimensions fixed at construction.
///
/// Every operation returns a new matrix; nothing aliases the receiver's
/// storage. Use [`MutableMatrix`](super::mutable::MutableMatrix) for in-place
/// updates. A column is a matrix with `cols == 1`, a row one with `rows == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    /// Builds a matrix from an explicit grid, checking it against the
    /// declared dimensions.
    pub fn new(rows: usize, cols: usize, data: Vec<Vec<f64>>) -> Result<Matrix> {
        check_dimensions("new", rows, cols)?;
        if data.len() != rows {
            let found_cols = data.first().map_or(0, |r| r.len());
            return Err(Error::shape("new", (rows, cols), (data.len(), found_cols)));
        }
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(Error::shape("new", (rows, cols), (rows, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Builds a matrix from a grid, taking its dimensions from the grid itself.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |r| r.len());
        Matrix::new(rows, cols, data)
    }

    /// Stacks `row_list` (each a 1×`cols` matrix) into a `rows`×`cols` matrix.
    pub fn from_rows(rows: usize, cols: usize, row_list: &[Matrix]) -> Result<Matrix> {
        if row_list.len() != rows {
            return Err(Error::shape("from_rows", (rows, cols), (row_list.len(), cols)));
        }
        let mut data = Vec::with_capacity(rows);
        for row in row_list {
            if row.rows != 1 || row.cols != cols {
                return Err(Error::shape("from_rows", (1, cols), row.shape()));
            }
            data.push(row.data[0].clone());
        }
        Matrix::new(rows, cols, data)
    }

    /// Places `column_list` (each a `rows`×1 matrix) side by side.
    pub fn from_columns(rows: usize, cols: usize, column_list: &[Matrix]) -> Result<Matrix> {
        if column_list.len() != cols {
            return Err(Error::shape("from_columns", (rows, cols), (rows, column_list.len())));
        }
        if let Some(bad) = column_list.iter().find(|c| c.rows != rows || c.cols != 1) {
            return Err(Error::shape("from_columns", (rows, 1), bad.shape()));
        }
        let data = (0..rows)
            .map(|i| column_list.iter().map(|c| c.data[i][0]).collect())
            .collect();
        Matrix::new(rows, cols, data)
    }

    pub fn column(values: Vec<f64>) -> Result<Matrix> {
        let rows = values.len();
        Matrix::new(rows, 1, values.into_iter().map(|v| vec![v]).collect())
    }

    pub fn row(values: Vec<f64>) -> Result<Matrix> {
        let cols = values.len();
        Matrix::new(1, cols, vec![values])
    }

    /// All-zero matrix; ShapeError if either dimension is 0.
    pub fn zeros(rows: usize, cols: usize) -> Result<Matrix> {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Matrix> {
        check_dimensions("filled", rows, cols)?;
        Ok(Matrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        })
    }

    pub fn identity(n: usize) -> Result<Matrix> {
        check_dimensions("identity", n, n)?;
        let mut res = Matrix::zeroed(n, n);
        for i in 0..n {
            res.data[i][i] = 1.0;
        }
        Ok(res)
    }

    /// All-zero matrix for dimensions already known to be non-zero, such as
    /// those of an existing matrix or layer.
    pub(crate) fn zeroed(rows: usize, cols: usize) -> Matrix {
        debug_assert!(rows > 0 && cols > 0);
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_column(&self) -> bool {
        self.cols == 1
    }

    pub fn is_row(&self) -> bool {
        self.rows == 1
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_index(i, j)?;
        Ok(self.data[i][j])
    }

    /// Unchecked read for loops whose bounds were validated up front.
    pub(crate) fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i][j]
    }

    pub(crate) fn check_index(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.rows {
            return Err(Error::index("row", i, self.rows));
        }
        if j >= self.cols {
            return Err(Error::index("column", j, self.cols));
        }
        Ok(())
    }

    /// Copy of column `j` as a `rows`×1 matrix.
    pub fn column_at(&self, j: usize) -> Result<Matrix> {
        if j >= self.cols {
            return Err(Error::index("column", j, self.cols));
        }
        Ok(Matrix {
            rows: self.rows,
            cols: 1,
            data: self.data.iter().map(|row| vec![row[j]]).collect(),
        })
    }

    /// Copy of row `i` as a 1×`cols` matrix.
    pub fn row_at(&self, i: usize) -> Result<Matrix> {
        if i >= self.rows {
            return Err(Error::index("row", i, self.rows));
        }
        Ok(Matrix {
            rows: 1,
            cols: self.cols,
            data: vec![self.data[i].clone()],
        })
    }

    /// Row-major iterator over every value.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    /// Iterator over the values of column `j`; empty if `j` is out of range.
    pub fn column_values(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().filter_map(move |row| row.get(j).copied())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("add", rhs, |a, b| a + b)
    }

    pub fn subtract(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("subtract", rhs, |a, b| a - b)
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix> {
        self.zip_with("hadamard", rhs, |a, b| a * b)
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Matrix product `self · rhs`, shape `(self.rows, rhs.cols)`.
    pub fn multiply(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::shape("multiply", (self.cols, rhs.cols), rhs.shape()));
        }

        let mut res = Matrix::zeroed(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeroed(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Adds `column` to every column of `self`; used to broadcast a bias
    /// column over a batch of data-point columns.
    pub fn add_column_broadcast(&self, column: &Matrix) -> Result<Matrix> {
        if column.cols != 1 || column.rows != self.rows {
            return Err(Error::shape("add_column_broadcast", (self.rows, 1), column.shape()));
        }
        let mut res = self.clone();
        for (i, row) in res.data.iter_mut().enumerate() {
            let b = column.data[i][0];
            for x in row.iter_mut() {
                *x += b;
            }
        }
        Ok(res)
    }

    pub fn without_row(&self, i: usize) -> Result<Matrix> {
        if i >= self.rows {
            return Err(Error::index("row", i, self.rows));
        }
        if self.rows == 1 {
            return Err(Error::shape("without_row", (2, self.cols), self.shape()));
        }
        let data = self
            .data
            .iter()
            .enumerate()
            .filter(|(r, _)| *r != i)
            .map(|(_, row)| row.clone())
            .collect();
        Ok(Matrix { rows: self.rows - 1, cols: self.cols, data })
    }

    pub fn without_column(&self, j: usize) -> Result<Matrix> {
        if j >= self.cols {
            return Err(Error::index("column", j, self.cols));
        }
        if self.cols == 1 {
            return Err(Error::shape("without_column", (self.rows, 2), self.shape()));
        }
        let data = self
            .data
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(c, _)| *c != j)
                    .map(|(_, &x)| x)
                    .collect()
            })
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols - 1, data })
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    pub fn trace(&self) -> Result<f64> {
        self.require_square("trace")?;
        Ok((0..self.rows).map(|i| self.data[i][i]).sum())
    }

    /// Determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> Result<f64> {
        self.require_square("determinant")?;
        match self.rows {
            1 => Ok(self.data[0][0]),
            2 => Ok(self.data[0][0] * self.data[1][1] - self.data[0][1] * self.data[1][0]),
            _ => {
                let minor_rows = self.without_row(0)?;
                let mut det = 0.0;
                for j in 0..self.cols {
                    let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                    det += sign * self.data[0][j] * minor_rows.without_column(j)?.determinant()?;
                }
                Ok(det)
            }
        }
    }

    /// Largest absolute element-wise difference; handy for tolerance checks.
    pub fn max_abs_diff(&self, rhs: &Matrix) -> Result<f64> {
        Ok(self
            .zip_with("max_abs_diff", rhs, |a, b| (a - b).abs())?
            .iter()
            .fold(0.0, f64::max))
    }

    pub(crate) fn data_mut(&mut self) -> &mut Vec<Vec<f64>> {
        &mut self.data
    }

    pub(crate) fn require_same_shape(&self, op: &'static str, rhs: &Matrix) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(Error::shape(op, self.shape(), rhs.shape()));
        }
        Ok(())
    }

    fn require_square(&self, op: &'static str) -> Result<()> {
        if self.rows != self.cols {
            return Err(Error::shape(op, (self.rows, self.rows), self.shape()));
        }
        Ok(())
    }

    fn zip_with<F>(&self, op: &'static str, rhs: &Matrix, f: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.require_same_shape(op, rhs)?;
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }
}

/// Every matrix has at least one row and one column.
pub(crate) fn check_dimensions(op: &'static str, rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::shape(op, (rows.max(1), cols.max(1)), (rows, cols)));
    }
    Ok(())
}
