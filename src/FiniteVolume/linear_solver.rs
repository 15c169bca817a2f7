use super::fv_error::FvError;
use super::stencil::StencilSystem;
use log::warn;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Iterative solvers for the symmetric five-point systems produced by [`super::terms::Equation`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LinearSolverType {
    /// Jacobi preconditioned conjugate gradient
    PCG { tolerance: f64, max_iterations: usize },
    /// in-place Gauss-Seidel sweeps
    GaussSeidel { tolerance: f64, max_iterations: usize },
}

impl Default for LinearSolverType {
    fn default() -> Self {
        LinearSolverType::PCG {
            tolerance: 1e-10,
            max_iterations: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport {
    pub iterations: usize,
    /// ‖b - L x‖ at exit
    pub residual_norm: f64,
    pub converged: bool,
}

impl LinearSolverType {
    pub fn tolerance(&self) -> f64 {
        match self {
            LinearSolverType::PCG { tolerance, .. } => *tolerance,
            LinearSolverType::GaussSeidel { tolerance, .. } => *tolerance,
        }
    }

    pub fn max_iterations(&self) -> usize {
        match self {
            LinearSolverType::PCG { max_iterations, .. } => *max_iterations,
            LinearSolverType::GaussSeidel { max_iterations, .. } => *max_iterations,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let tolerance = self.tolerance();
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(format!("linear solver tolerance must be positive, got {}", tolerance));
        }
        if self.max_iterations() == 0 {
            return Err("linear solver needs at least one iteration".to_string());
        }
        Ok(())
    }

    /// Solve `system` starting from the values already in `x`.
    ///
    /// Running out of iterations is reported through [`SolveReport::converged`] and a warning;
    /// a non-finite residual is an error.
    pub fn solve(
        &self,
        system: &StencilSystem,
        x: &mut DVector<f64>,
    ) -> Result<SolveReport, FvError> {
        if x.len() != system.len() {
            return Err(FvError::DimensionMismatch {
                expected: system.len(),
                found: x.len(),
            });
        }
        let report = match self {
            LinearSolverType::PCG {
                tolerance,
                max_iterations,
            } => pcg(system, x, *tolerance, *max_iterations)?,
            LinearSolverType::GaussSeidel {
                tolerance,
                max_iterations,
            } => gauss_seidel(system, x, *tolerance, *max_iterations)?,
        };
        if !report.converged {
            warn!(
                "linear solver stopped after {} iterations, residual {:.3e}",
                report.iterations, report.residual_norm
            );
        }
        Ok(report)
    }
}

fn check_residual(norm: f64) -> Result<(), FvError> {
    if norm.is_finite() {
        Ok(())
    } else {
        Err(FvError::NonFiniteValue("linear solver residual".to_string()))
    }
}

fn pcg(
    system: &StencilSystem,
    x: &mut DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<SolveReport, FvError> {
    let target = tolerance * system.rhs.norm();
    let mut r = system.residual(x);
    let mut norm = r.norm();
    check_residual(norm)?;
    if norm == 0.0 || norm <= target {
        return Ok(SolveReport {
            iterations: 0,
            residual_norm: norm,
            converged: true,
        });
    }
    let inv_diag = system.diagonal().map(|d| if d != 0.0 { 1.0 / d } else { 1.0 });
    let mut z = r.component_mul(&inv_diag);
    let mut p = z.clone();
    let mut rz = r.dot(&z);
    let mut completed = 0;
    for iteration in 1..=max_iterations {
        let q = system.apply(&p);
        let pq = p.dot(&q);
        if pq == 0.0 {
            warn!("conjugate gradient breakdown after {} iterations", completed);
            break;
        }
        let alpha = rz / pq;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &q, 1.0);
        norm = r.norm();
        check_residual(norm)?;
        if norm <= target {
            return Ok(SolveReport {
                iterations: iteration,
                residual_norm: norm,
                converged: true,
            });
        }
        completed = iteration;
        z = r.component_mul(&inv_diag);
        let rz_new = r.dot(&z);
        let beta = rz_new / rz;
        rz = rz_new;
        p = &z + &p * beta;
    }
    Ok(SolveReport {
        iterations: completed,
        residual_norm: norm,
        converged: false,
    })
}

fn gauss_seidel(
    system: &StencilSystem,
    x: &mut DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> Result<SolveReport, FvError> {
    let target = tolerance * system.rhs.norm();
    let mut norm = system.residual(x).norm();
    check_residual(norm)?;
    if norm == 0.0 || norm <= target {
        return Ok(SolveReport {
            iterations: 0,
            residual_norm: norm,
            converged: true,
        });
    }
    for iteration in 1..=max_iterations {
        system.gauss_seidel_sweep(x);
        norm = system.residual(x).norm();
        check_residual(norm)?;
        if norm <= target {
            return Ok(SolveReport {
                iterations: iteration,
                residual_norm: norm,
                converged: true,
            });
        }
    }
    Ok(SolveReport {
        iterations: max_iterations,
        residual_norm: norm,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FiniteVolume::grid2D::Grid2D;
    use approx::assert_relative_eq;

    fn diffusion_system() -> StencilSystem {
        let grid = Grid2D::new(6, 5, 1.0, 1.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.add_face_coupling(&grid, 1.0);
        system.central.fill(0.5);
        system.rhs = DVector::from_fn(30, |i, _| (i as f64 * 0.37).cos());
        system
    }

    #[test]
    fn test_pcg_and_gauss_seidel_agree() {
        let system = diffusion_system();
        let mut x_pcg = DVector::zeros(30);
        let mut x_gs = DVector::zeros(30);
        let pcg = LinearSolverType::default();
        let gs = LinearSolverType::GaussSeidel {
            tolerance: 1e-12,
            max_iterations: 5000,
        };
        let r1 = pcg.solve(&system, &mut x_pcg).unwrap();
        let r2 = gs.solve(&system, &mut x_gs).unwrap();
        assert!(r1.converged);
        assert!(r2.converged);
        for i in 0..30 {
            assert_relative_eq!(x_pcg[i], x_gs[i], epsilon = 1e-8);
        }
        let residual = system.residual(&x_pcg).norm();
        assert!(residual <= 1e-8 * system.rhs.norm());
    }

    #[test]
    fn test_exact_initial_guess_takes_no_iterations() {
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.add_face_coupling(&grid, 2.0);
        system.central.fill(4.0);
        system.rhs.fill(4.0 * 0.3);
        let mut x = DVector::from_element(9, 0.3);
        let report = LinearSolverType::default().solve(&system, &mut x).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(report.residual_norm, 0.0);
        assert!(x.iter().all(|v| *v == 0.3));
    }

    #[test]
    fn test_iteration_cap_is_reported_not_failed() {
        let system = diffusion_system();
        let mut x = DVector::zeros(30);
        let solver = LinearSolverType::GaussSeidel {
            tolerance: 1e-14,
            max_iterations: 2,
        };
        let report = solver.solve(&system, &mut x).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 2);
    }

    #[test]
    fn test_pcg_breakdown_reports_completed_iterations() {
        // no coupling and a zero diagonal: the first search direction has p.Ap = 0
        let grid = Grid2D::new(3, 2, 1.0, 1.0).unwrap();
        let mut system = StencilSystem::zeros(&grid);
        system.rhs.fill(1.0);
        let mut x = DVector::zeros(6);
        let report = LinearSolverType::default().solve(&system, &mut x).unwrap();
        assert!(!report.converged);
        assert_eq!(report.iterations, 0);
        assert_relative_eq!(report.residual_norm, 6f64.sqrt(), epsilon = 1e-14);
        assert!(x.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_validate() {
        assert!(LinearSolverType::default().validate().is_ok());
        let bad = LinearSolverType::PCG {
            tolerance: 0.0,
            max_iterations: 10,
        };
        assert!(bad.validate().is_err());
        let bad = LinearSolverType::GaussSeidel {
            tolerance: 1e-8,
            max_iterations: 0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_serde_tagged_layout() {
        let json = r#"{"type":"GaussSeidel","tolerance":1e-6,"max_iterations":50}"#;
        let solver: LinearSolverType = serde_json::from_str(json).unwrap();
        assert_eq!(
            solver,
            LinearSolverType::GaussSeidel {
                tolerance: 1e-6,
                max_iterations: 50
            }
        );
    }
}
