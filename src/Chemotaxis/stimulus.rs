use super::chemotaxis_error::ChemotaxisError;
use crate::FiniteVolume::field_set::{FieldId, FieldSet};
use crate::FiniteVolume::grid2D::Grid2D;
use log::info;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Point source of attractant outside (or inside) the domain.
///
/// Its position is given in units of the domain length `L = nx*dx`, so the default `(0.5, 2.0)`
/// sits above the middle of the top edge of a square grid. The stimulus at a cell center at
/// distance `r` from the source is `L / r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointSource {
    pub x: f64,
    pub y: f64,
}

impl Default for PointSource {
    fn default() -> Self {
        Self { x: 0.5, y: 2.0 }
    }
}

impl PointSource {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// stimulus value in every cell of `grid`
    pub fn values(&self, grid: &Grid2D) -> Result<DVector<f64>, ChemotaxisError> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(ChemotaxisError::InvalidConfiguration(format!(
                "source position ({}, {}) is not finite",
                self.x, self.y
            )));
        }
        let length = grid.nx() as f64 * grid.dx();
        let (sx, sy) = (self.x * length, self.y * length);
        let (x, y) = grid.cell_centers();
        let distance = x.zip_map(&y, |xi, yi| ((xi - sx).powi(2) + (yi - sy).powi(2)).sqrt());
        if distance.iter().any(|d| *d == 0.0) {
            return Err(ChemotaxisError::InvalidConfiguration(format!(
                "source position ({}, {}) coincides with a cell center",
                sx, sy
            )));
        }
        Ok(distance.map(|d| length / d))
    }

    /// overwrite `field` with the stimulus gradient
    pub fn apply(&self, state: &mut FieldSet, field: FieldId) -> Result<(), ChemotaxisError> {
        let values = self.values(state.grid())?;
        info!(
            "stimulus applied: min {:.4}, max {:.4}",
            values.min(),
            values.max()
        );
        state.get_mut(field)?.set_values(&values)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_closed_form_inverse_distance() {
        let grid = Grid2D::new(4, 3, 0.5, 0.5).unwrap();
        let values = PointSource::default().values(&grid).unwrap();
        let length = 2.0;
        let (x, y) = grid.cell_centers();
        for i in 0..grid.num_cells() {
            let expected =
                length / ((x[i] - 0.5 * length).powi(2) + (y[i] - 2.0 * length).powi(2)).sqrt();
            assert_relative_eq!(values[i], expected, epsilon = 1e-14);
        }
        // the row closest to the source sees the strongest stimulus
        assert!(values[grid.cell_id(1, 2)] > values[grid.cell_id(1, 0)]);
    }

    #[test]
    fn test_source_on_cell_center_is_rejected() {
        let grid = Grid2D::new(2, 2, 1.0, 1.0).unwrap();
        let source = PointSource::new(0.25, 0.25);
        assert!(matches!(
            source.values(&grid),
            Err(ChemotaxisError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_apply_overwrites_only_the_target_field() {
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let mut state = FieldSet::new(grid);
        let other = state.add_variable("KM", 0.3, true).unwrap();
        let r = state.add_variable("R", 0.0, true).unwrap();
        PointSource::default().apply(&mut state, r).unwrap();
        assert!(state.value(r).iter().all(|v| *v > 0.0));
        assert!(state.value(other).iter().all(|v| *v == 0.3));
    }
}
