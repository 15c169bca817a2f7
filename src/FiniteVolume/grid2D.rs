use super::fv_error::FvError;
use nalgebra::{DMatrix, DVector};

/// Uniform rectangular grid of `nx × ny` cells.
///
/// Cell `(i, j)` has id `i + j*nx` and center `((i + 0.5) dx, (j + 0.5) dy)`.
/// The grid is immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    nx: usize,
    ny: usize,
    dx: f64,
    dy: f64,
}

impl Grid2D {
    pub fn new(nx: usize, ny: usize, dx: f64, dy: f64) -> Result<Self, FvError> {
        if nx == 0 || ny == 0 {
            return Err(FvError::InvalidGrid(format!(
                "cell counts must be positive, got nx = {}, ny = {}",
                nx, ny
            )));
        }
        if !(dx.is_finite() && dx > 0.0) || !(dy.is_finite() && dy > 0.0) {
            return Err(FvError::InvalidGrid(format!(
                "cell spacing must be positive, got dx = {}, dy = {}",
                dx, dy
            )));
        }
        if nx.checked_mul(ny).is_none() {
            return Err(FvError::InvalidGrid(format!(
                "{} x {} cells overflow the cell count",
                nx, ny
            )));
        }
        Ok(Self { nx, ny, dx, dy })
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn num_cells(&self) -> usize {
        self.nx * self.ny
    }

    /// physical extent of the domain (Lx, Ly)
    pub fn extents(&self) -> (f64, f64) {
        (self.nx as f64 * self.dx, self.ny as f64 * self.dy)
    }

    pub fn cell_id(&self, i: usize, j: usize) -> usize {
        i + j * self.nx
    }

    /// inverse of [`Grid2D::cell_id`]
    pub fn cell_index(&self, id: usize) -> (usize, usize) {
        (id % self.nx, id / self.nx)
    }

    pub fn cell_volume(&self) -> f64 {
        self.dx * self.dy
    }

    pub fn cell_volumes(&self) -> DVector<f64> {
        DVector::from_element(self.num_cells(), self.cell_volume())
    }

    /// Cell center coordinates as two parallel arrays `(x, y)`.
    pub fn cell_centers(&self) -> (DVector<f64>, DVector<f64>) {
        let n = self.num_cells();
        let x = DVector::from_fn(n, |id, _| {
            let (i, _) = self.cell_index(id);
            (i as f64 + 0.5) * self.dx
        });
        let y = DVector::from_fn(n, |id, _| {
            let (_, j) = self.cell_index(id);
            (j as f64 + 0.5) * self.dy
        });
        (x, y)
    }

    /// Lay out a per-cell vector as an `(nx, ny)` matrix: entry `(i, j)` is cell `i + j*nx`.
    pub fn reshape(&self, values: &DVector<f64>) -> Result<DMatrix<f64>, FvError> {
        if values.len() != self.num_cells() {
            return Err(FvError::DimensionMismatch {
                expected: self.num_cells(),
                found: values.len(),
            });
        }
        Ok(DMatrix::from_column_slice(
            self.nx,
            self.ny,
            values.as_slice(),
        ))
    }

    /// inverse of [`Grid2D::reshape`]
    pub fn flatten(&self, array: &DMatrix<f64>) -> Result<DVector<f64>, FvError> {
        if array.nrows() != self.nx || array.ncols() != self.ny {
            return Err(FvError::DimensionMismatch {
                expected: self.num_cells(),
                found: array.len(),
            });
        }
        Ok(DVector::from_vec(array.as_slice().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_grid_rejects_degenerate_sizes() {
        assert!(Grid2D::new(0, 3, 1.0, 1.0).is_err());
        assert!(Grid2D::new(3, 3, 0.0, 1.0).is_err());
        assert!(Grid2D::new(3, 3, 1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_grid_rejects_overflowing_cell_count() {
        assert!(matches!(
            Grid2D::new(usize::MAX, 2, 1.0, 1.0),
            Err(FvError::InvalidGrid(_))
        ));
        assert!(matches!(
            Grid2D::new(usize::MAX / 2 + 1, 2, 1.0, 1.0),
            Err(FvError::InvalidGrid(_))
        ));
        assert_eq!(Grid2D::new(usize::MAX, 1, 1.0, 1.0).unwrap().num_cells(), usize::MAX);
    }

    #[test]
    fn test_cell_centers_x_fastest() {
        let grid = Grid2D::new(3, 2, 1.0, 2.0).unwrap();
        let (x, y) = grid.cell_centers();
        assert_eq!(x.len(), 6);
        assert_relative_eq!(x[0], 0.5);
        assert_relative_eq!(x[1], 1.5);
        assert_relative_eq!(x[2], 2.5);
        assert_relative_eq!(x[3], 0.5);
        assert_relative_eq!(y[0], 1.0);
        assert_relative_eq!(y[3], 3.0);
        assert_eq!(grid.cell_index(4), (1, 1));
        assert_eq!(grid.cell_id(1, 1), 4);
    }

    #[test]
    fn test_reshape_flatten_round_trip() {
        let grid = Grid2D::new(4, 3, 1.0, 1.0).unwrap();
        let values = DVector::from_fn(12, |i, _| (i as f64).sin() * 1e3 + 0.1);
        let array = grid.reshape(&values).unwrap();
        assert_eq!(array.shape(), (4, 3));
        assert_eq!(array[(1, 2)], values[grid.cell_id(1, 2)]);
        let back = grid.flatten(&array).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_reshape_dimension_mismatch() {
        let grid = Grid2D::new(4, 3, 1.0, 1.0).unwrap();
        let values = DVector::from_element(11, 1.0);
        assert_eq!(
            grid.reshape(&values),
            Err(FvError::DimensionMismatch {
                expected: 12,
                found: 11
            })
        );
        let wrong = DMatrix::from_element(3, 4, 1.0);
        assert!(grid.flatten(&wrong).is_err());
    }
}
