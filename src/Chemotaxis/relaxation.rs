use super::chemotaxis_error::ChemotaxisError;
use crate::FiniteVolume::field_set::{FieldId, FieldSet};
use crate::FiniteVolume::fv_error::FvError;
use crate::FiniteVolume::linear_solver::LinearSolverType;
use crate::FiniteVolume::terms::Equation;
use log::info;

/// Equations paired with the field each one solves, in solve order, plus the fields their
/// coefficients read
#[derive(Debug, Clone, Default)]
pub struct EquationSystem {
    entries: Vec<(FieldId, Equation)>,
    inputs: Vec<FieldId>,
}

impl EquationSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: FieldId, equation: Equation) {
        self.entries.push((field, equation));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(FieldId, Equation)> {
        self.entries.iter()
    }

    pub fn fields(&self) -> Vec<FieldId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// declare a field read by some coefficient without being solved for
    pub fn read(&mut self, field: FieldId) {
        if !self.inputs.contains(&field) {
            self.inputs.push(field);
        }
    }

    pub fn inputs(&self) -> &[FieldId] {
        &self.inputs
    }

    /// every solved and read field must belong to `state`
    pub fn check(&self, state: &FieldSet) -> Result<(), FvError> {
        for field in self.fields().iter().chain(self.inputs.iter()) {
            state.get(*field)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelaxationSettings {
    pub steps: usize,
    pub dt: f64,
    pub solver: LinearSolverType,
    /// progress is logged every `log_every` steps, 0 disables it
    pub log_every: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelaxationReport {
    pub steps: usize,
    pub dt: f64,
    pub linear_iterations: usize,
    pub max_residual: f64,
    pub unconverged_solves: usize,
}

/// Advance `state` by `settings.steps` time steps.
///
/// Each step snapshots every field first and then solves the equations one after another,
/// so an equation sees the fields updated earlier in the same step. There is no convergence
/// test: the loop always runs the requested number of steps, and zero steps leave the state
/// untouched.
pub fn relax(
    state: &mut FieldSet,
    system: &EquationSystem,
    settings: &RelaxationSettings,
) -> Result<RelaxationReport, ChemotaxisError> {
    settings
        .solver
        .validate()
        .map_err(ChemotaxisError::InvalidConfiguration)?;
    if !(settings.dt.is_finite() && settings.dt > 0.0) {
        return Err(ChemotaxisError::InvalidConfiguration(format!(
            "time step must be positive, got {}",
            settings.dt
        )));
    }
    system.check(state)?;

    let mut report = RelaxationReport {
        steps: 0,
        dt: settings.dt,
        ..Default::default()
    };
    for step in 1..=settings.steps {
        state.update_old_all();
        for (field, equation) in system.iter() {
            let solve = equation.solve(state, *field, settings.dt, &settings.solver)?;
            report.linear_iterations += solve.iterations;
            report.max_residual = report.max_residual.max(solve.residual_norm);
            if !solve.converged {
                report.unconverged_solves += 1;
            }
        }
        report.steps = step;
        if settings.log_every > 0 && step % settings.log_every == 0 {
            info!(
                "relaxation step {}/{}: {} linear iterations so far",
                step, settings.steps, report.linear_iterations
            );
        }
    }
    Ok(report)
}
