//! Term algebra: equations are built as signed sums of terms,
//!
//! ```rust,ignore
//! let eq = TransientTerm::new() - ImplicitDiffusionTerm::new(1.0) - production + DependentSourceTerm::new(consumption);
//! eq.solve(&mut fields, var, dt, &LinearSolverType::default())?;
//! ```
//!
//! and read as "sum of terms = 0". Coefficients are evaluated against the field set at the
//! moment `solve` is called, so expressions built from other variables always see their
//! latest values.
use super::field_set::{FieldId, FieldSet};
use super::fv_error::FvError;
use super::linear_solver::{LinearSolverType, SolveReport};
use super::stencil::StencilSystem;
use log::debug;
use nalgebra::DVector;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::rc::Rc;

pub type CoeffFn = Rc<dyn Fn(&FieldSet) -> DVector<f64>>;

/// Coefficient of a term: a number or a per-cell expression over the field set
#[derive(Clone)]
pub enum Coefficient {
    Uniform(f64),
    Expression(CoeffFn),
}

impl Coefficient {
    pub fn expression(f: impl Fn(&FieldSet) -> DVector<f64> + 'static) -> Self {
        Coefficient::Expression(Rc::new(f))
    }

    pub fn evaluate(&self, fields: &FieldSet) -> Result<DVector<f64>, FvError> {
        let n = fields.num_cells();
        match self {
            Coefficient::Uniform(v) => Ok(DVector::from_element(n, *v)),
            Coefficient::Expression(f) => {
                let values = f(fields);
                if values.len() != n {
                    return Err(FvError::DimensionMismatch {
                        expected: n,
                        found: values.len(),
                    });
                }
                Ok(values)
            }
        }
    }
}

impl From<f64> for Coefficient {
    fn from(value: f64) -> Self {
        Coefficient::Uniform(value)
    }
}

impl fmt::Debug for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coefficient::Uniform(v) => write!(f, "Uniform({})", v),
            Coefficient::Expression(_) => write!(f, "Expression(..)"),
        }
    }
}

/// One contribution to an equation
#[derive(Debug, Clone)]
pub enum Term {
    /// c ∂φ/∂t
    Transient(f64),
    /// ∇·(D ∇φ) with a uniform diffusion coefficient
    ImplicitDiffusion(f64),
    /// explicit source s, integrated over the cell
    Source(Coefficient),
    /// implicit source s φ, linearized against the solved variable
    DependentSource(Coefficient),
}

pub struct TransientTerm;

impl TransientTerm {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Equation {
        Equation::from_term(Term::Transient(1.0))
    }

    pub fn with_coeff(coeff: f64) -> Equation {
        Equation::from_term(Term::Transient(coeff))
    }
}

pub struct ImplicitDiffusionTerm;

impl ImplicitDiffusionTerm {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(coeff: f64) -> Equation {
        Equation::from_term(Term::ImplicitDiffusion(coeff))
    }
}

pub struct SourceTerm;

impl SourceTerm {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(coeff: impl Into<Coefficient>) -> Equation {
        Equation::from_term(Term::Source(coeff.into()))
    }
}

pub struct DependentSourceTerm;

impl DependentSourceTerm {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(coeff: impl Into<Coefficient>) -> Equation {
        Equation::from_term(Term::DependentSource(coeff.into()))
    }
}

/// Signed sum of terms, equal to zero
#[derive(Debug, Clone, Default)]
pub struct Equation {
    pub terms: Vec<(f64, Term)>,
}

impl Equation {
    pub fn from_term(term: Term) -> Self {
        Self {
            terms: vec![(1.0, term)],
        }
    }

    /// Linearize the equation for `var` into a five-point system
    pub fn assemble(
        &self,
        fields: &FieldSet,
        var: FieldId,
        dt: f64,
    ) -> Result<StencilSystem, FvError> {
        let variable = fields.get(var)?;
        if !(dt.is_finite() && dt > 0.0) {
            return Err(FvError::NonFiniteValue(format!(
                "time step {} for '{}'",
                dt, variable.name
            )));
        }
        let grid = fields.grid();
        let volumes = fields.cell_volumes();
        let mut system = StencilSystem::zeros(grid);
        for (sign, term) in &self.terms {
            match term {
                Term::Transient(c) => {
                    let a = volumes * (sign * c / dt);
                    system.central += &a;
                    system.rhs += a.component_mul(variable.old());
                }
                Term::ImplicitDiffusion(d) => {
                    system.add_face_coupling(grid, -sign * d);
                }
                Term::Source(coeff) => {
                    let s = coeff.evaluate(fields)?;
                    system.rhs -= s.component_mul(volumes) * *sign;
                }
                Term::DependentSource(coeff) => {
                    let s = coeff.evaluate(fields)?;
                    system.central += s.component_mul(volumes) * *sign;
                }
            }
        }
        system.check_finite(&variable.name)?;
        Ok(system)
    }

    /// Advance `var` by one time step `dt`, using the other variables' current values.
    pub fn solve(
        &self,
        fields: &mut FieldSet,
        var: FieldId,
        dt: f64,
        solver: &LinearSolverType,
    ) -> Result<SolveReport, FvError> {
        let system = self.assemble(fields, var, dt)?;
        let variable = fields.get_mut(var)?;
        let mut x = variable.value().clone();
        let report = solver.solve(&system, &mut x)?;
        debug!(
            "solved '{}': {} iterations, residual {:.3e}",
            variable.name, report.iterations, report.residual_norm
        );
        variable.set_values(&x)?;
        Ok(report)
    }
}

impl Add for Equation {
    type Output = Equation;
    fn add(mut self, rhs: Equation) -> Equation {
        self.terms.extend(rhs.terms);
        self
    }
}

impl Sub for Equation {
    type Output = Equation;
    fn sub(self, rhs: Equation) -> Equation {
        self + (-rhs)
    }
}

impl Neg for Equation {
    type Output = Equation;
    fn neg(self) -> Equation {
        Equation {
            terms: self
                .terms
                .into_iter()
                .map(|(sign, term)| (-sign, term))
                .collect(),
        }
    }
}

/// Explicit source terms can be subtracted or added directly as coefficients
impl Sub<Coefficient> for Equation {
    type Output = Equation;
    fn sub(self, rhs: Coefficient) -> Equation {
        self - SourceTerm::new(rhs)
    }
}

impl Add<Coefficient> for Equation {
    type Output = Equation;
    fn add(self, rhs: Coefficient) -> Equation {
        self + SourceTerm::new(rhs)
    }
}
