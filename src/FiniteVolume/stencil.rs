use super::fv_error::FvError;
use super::grid2D::Grid2D;
use nalgebra::DVector;

/// Five-point linear system `L x = b` on a [`Grid2D`].
///
/// The operator is kept in "central + face difference" form
///
/// ```text
/// (L x)_i = central_i x_i + Σ_f g_f (x_i - x_nb(f))
/// ```
///
/// so that a uniform `x` sees an exactly zero face contribution. `g_f` is shared by the two
/// cells of an interior face; only east and north faces are stored.
#[derive(Debug, Clone)]
pub struct StencilSystem {
    pub nx: usize,
    pub ny: usize,
    pub central: DVector<f64>,
    /// coupling across the east face of each cell (zero on the last column)
    pub east: DVector<f64>,
    /// coupling across the north face of each cell (zero on the last row)
    pub north: DVector<f64>,
    pub rhs: DVector<f64>,
}

impl StencilSystem {
    pub fn zeros(grid: &Grid2D) -> Self {
        let n = grid.num_cells();
        Self {
            nx: grid.nx(),
            ny: grid.ny(),
            central: DVector::zeros(n),
            east: DVector::zeros(n),
            north: DVector::zeros(n),
            rhs: DVector::zeros(n),
        }
    }

    pub fn len(&self) -> usize {
        self.central.len()
    }

    pub fn is_empty(&self) -> bool {
        self.central.is_empty()
    }

    /// add `coeff` × (area / distance) to every interior face of the grid
    pub fn add_face_coupling(&mut self, grid: &Grid2D, coeff: f64) {
        let ew = grid.dy() / grid.dx();
        let ns = grid.dx() / grid.dy();
        for j in 0..self.ny {
            for i in 0..self.nx {
                let id = i + j * self.nx;
                if i + 1 < self.nx {
                    self.east[id] += coeff * ew;
                }
                if j + 1 < self.ny {
                    self.north[id] += coeff * ns;
                }
            }
        }
    }

    pub fn has_face_coupling(&self) -> bool {
        self.east.iter().chain(self.north.iter()).any(|g| *g != 0.0)
    }

    /// Face couplings of a cell as `(neighbour, g)` pairs, west, east, south, north.
    fn for_each_face(&self, id: usize, mut f: impl FnMut(usize, f64)) {
        let i = id % self.nx;
        let j = id / self.nx;
        if i > 0 {
            f(id - 1, self.east[id - 1]);
        }
        if i + 1 < self.nx {
            f(id + 1, self.east[id]);
        }
        if j > 0 {
            f(id - self.nx, self.north[id - self.nx]);
        }
        if j + 1 < self.ny {
            f(id + self.nx, self.north[id]);
        }
    }

    /// diagonal of L
    pub fn diagonal(&self) -> DVector<f64> {
        DVector::from_fn(self.len(), |id, _| {
            let mut d = self.central[id];
            self.for_each_face(id, |_, g| d += g);
            d
        })
    }

    pub fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(self.len(), |id, _| {
            let xi = x[id];
            let mut acc = self.central[id] * xi;
            self.for_each_face(id, |nb, g| acc += g * (xi - x[nb]));
            acc
        })
    }

    /// b - L x
    pub fn residual(&self, x: &DVector<f64>) -> DVector<f64> {
        &self.rhs - self.apply(x)
    }

    /// One in-place Gauss-Seidel sweep in cell order
    pub fn gauss_seidel_sweep(&self, x: &mut DVector<f64>) {
        for id in 0..self.len() {
            let mut diag = self.central[id];
            let mut off = 0.0;
            self.for_each_face(id, |nb, g| {
                diag += g;
                off += g * x[nb];
            });
            x[id] = (self.rhs[id] + off) / diag;
        }
    }

    pub fn check_finite(&self, what: &str) -> Result<(), FvError> {
        let finite = self
            .central
            .iter()
            .chain(self.east.iter())
            .chain(self.north.iter())
            .chain(self.rhs.iter())
            .all(|v| v.is_finite());
        if finite {
            Ok(())
        } else {
            Err(FvError::NonFiniteValue(format!(
                "coefficients of the equation for '{}'",
                what
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_state_has_zero_face_contribution() {
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.add_face_coupling(&grid, 0.7);
        system.central.fill(2.0);
        let x = DVector::from_element(9, 0.3);
        let lx = system.apply(&x);
        assert!(lx.iter().all(|v| *v == 2.0 * 0.3));
    }

    #[test]
    fn test_diagonal_counts_interior_faces() {
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.add_face_coupling(&grid, 1.0);
        let d = system.diagonal();
        assert_relative_eq!(d[0], 2.0);
        assert_relative_eq!(d[1], 3.0);
        assert_relative_eq!(d[4], 4.0);
        assert!(system.has_face_coupling());
    }

    #[test]
    fn test_operator_is_symmetric() {
        let grid = Grid2D::new(4, 3, 0.5, 2.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.add_face_coupling(&grid, 1.3);
        system.central.fill(0.1);
        let n = system.len();
        // column k of L is L e_k
        let columns: Vec<DVector<f64>> = (0..n)
            .map(|k| {
                let mut e = DVector::zeros(n);
                e[k] = 1.0;
                system.apply(&e)
            })
            .collect();
        for a in 0..n {
            for b in 0..n {
                assert_relative_eq!(columns[a][b], columns[b][a], epsilon = 1e-14);
            }
        }
    }
}
