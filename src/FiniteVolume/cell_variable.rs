use super::fv_error::FvError;
use super::grid2D::Grid2D;
use nalgebra::{DMatrix, DVector};
use std::ops::{Index, IndexMut};

/// Initial value of a cell variable: the same number everywhere or one number per cell
#[derive(Debug, Clone, PartialEq)]
pub enum InitialValue {
    Uniform(f64),
    PerCell(DVector<f64>),
}

impl From<f64> for InitialValue {
    fn from(value: f64) -> Self {
        InitialValue::Uniform(value)
    }
}

impl From<DVector<f64>> for InitialValue {
    fn from(values: DVector<f64>) -> Self {
        InitialValue::PerCell(values)
    }
}

/// Scalar quantity stored at cell centers, with an optional snapshot of the previous time step.
///
/// The snapshot is only ever changed by [`CellVariable::update_old`]; solving an equation writes
/// the current value and leaves the snapshot alone.
#[derive(Debug, Clone, PartialEq)]
pub struct CellVariable {
    pub name: String,
    value: DVector<f64>,
    old: Option<DVector<f64>>,
}

impl CellVariable {
    pub fn new(
        name: &str,
        grid: &Grid2D,
        value: impl Into<InitialValue>,
        has_old: bool,
    ) -> Result<Self, FvError> {
        let n = grid.num_cells();
        let value = match value.into() {
            InitialValue::Uniform(v) => DVector::from_element(n, v),
            InitialValue::PerCell(values) => {
                if values.len() != n {
                    return Err(FvError::DimensionMismatch {
                        expected: n,
                        found: values.len(),
                    });
                }
                values
            }
        };
        let old = if has_old { Some(value.clone()) } else { None };
        Ok(Self {
            name: name.to_string(),
            value,
            old,
        })
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn has_old(&self) -> bool {
        self.old.is_some()
    }

    pub fn value(&self) -> &DVector<f64> {
        &self.value
    }

    /// Previous time step value. Variables created without history report their current value.
    pub fn old(&self) -> &DVector<f64> {
        self.old.as_ref().unwrap_or(&self.value)
    }

    /// Commit the current value as the previous time step value.
    pub fn update_old(&mut self) {
        if let Some(old) = self.old.as_mut() {
            old.copy_from(&self.value);
        }
    }

    /// Overwrite every cell. The old value is left untouched.
    pub fn set_values(&mut self, values: &DVector<f64>) -> Result<(), FvError> {
        if values.len() != self.value.len() {
            return Err(FvError::DimensionMismatch {
                expected: self.value.len(),
                found: values.len(),
            });
        }
        self.value.copy_from(values);
        Ok(())
    }

    pub fn fill(&mut self, value: f64) {
        self.value.fill(value);
    }

    /// volume weighted mean of the current value
    pub fn cell_volume_average(&self, grid: &Grid2D) -> f64 {
        volume_average(&self.value, &grid.cell_volumes())
    }

    pub fn min(&self) -> f64 {
        self.value.min()
    }

    pub fn max(&self) -> f64 {
        self.value.max()
    }

    pub fn reshape(&self, grid: &Grid2D) -> Result<DMatrix<f64>, FvError> {
        grid.reshape(&self.value)
    }
}

impl Index<usize> for CellVariable {
    type Output = f64;
    fn index(&self, cell: usize) -> &f64 {
        &self.value[cell]
    }
}

impl IndexMut<usize> for CellVariable {
    fn index_mut(&mut self, cell: usize) -> &mut f64 {
        &mut self.value[cell]
    }
}

/// Σ v_i V_i / Σ V_i
pub fn volume_average(values: &DVector<f64>, volumes: &DVector<f64>) -> f64 {
    values.dot(volumes) / volumes.sum()
}
