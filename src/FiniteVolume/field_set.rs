use super::cell_variable::{CellVariable, InitialValue, volume_average};
use super::fv_error::FvError;
use super::grid2D::Grid2D;
use nalgebra::DVector;

/// Handle of a variable inside a [`FieldSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The simulation state: a grid and every cell variable defined on it.
///
/// Equations never own variables; they refer to them through `FieldId` handles and read
/// them through the set when their coefficients are evaluated, so the caller keeps full
/// ownership of the state between phases.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    grid: Grid2D,
    volumes: DVector<f64>,
    variables: Vec<CellVariable>,
}

impl FieldSet {
    pub fn new(grid: Grid2D) -> Self {
        let volumes = grid.cell_volumes();
        Self {
            grid,
            volumes,
            variables: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    pub fn cell_volumes(&self) -> &DVector<f64> {
        &self.volumes
    }

    pub fn num_cells(&self) -> usize {
        self.grid.num_cells()
    }

    /// Create a variable on the grid and return its handle
    pub fn add_variable(
        &mut self,
        name: &str,
        value: impl Into<InitialValue>,
        has_old: bool,
    ) -> Result<FieldId, FvError> {
        let variable = CellVariable::new(name, &self.grid, value, has_old)?;
        self.variables.push(variable);
        Ok(FieldId(self.variables.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        id.0 < self.variables.len()
    }

    pub fn get(&self, id: FieldId) -> Result<&CellVariable, FvError> {
        self.variables
            .get(id.0)
            .ok_or_else(|| FvError::UnknownField(format!("#{}", id.0)))
    }

    pub fn get_mut(&mut self, id: FieldId) -> Result<&mut CellVariable, FvError> {
        self.variables
            .get_mut(id.0)
            .ok_or_else(|| FvError::UnknownField(format!("#{}", id.0)))
    }

    pub fn find(&self, name: &str) -> Result<FieldId, FvError> {
        self.variables
            .iter()
            .position(|var| var.name == name)
            .map(FieldId)
            .ok_or_else(|| FvError::UnknownField(name.to_string()))
    }

    /// Current value of a variable.
    ///
    /// # Panics
    /// Panics if the handle does not belong to this set. Coefficient expressions use this
    /// accessor; the solver checks every equation's handle before it evaluates anything.
    pub fn value(&self, id: FieldId) -> &DVector<f64> {
        self.variables[id.0].value()
    }

    pub fn variables(&self) -> impl Iterator<Item = &CellVariable> {
        self.variables.iter()
    }

    /// Commit every variable's current value as its previous value
    pub fn update_old_all(&mut self) {
        for var in self.variables.iter_mut() {
            var.update_old();
        }
    }

    /// volume weighted mean of a variable
    pub fn cell_volume_average(&self, id: FieldId) -> f64 {
        volume_average(self.value(id), &self.volumes)
    }

    /// volume weighted mean of any per-cell expression
    pub fn volume_average_of(&self, values: &DVector<f64>) -> f64 {
        volume_average(values, &self.volumes)
    }
}
