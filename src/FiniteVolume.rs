//! # Finite Volume Module
//!
//! Minimal cell-centered finite-volume machinery for scalar reaction-diffusion equations on a
//! uniform rectangular grid. It provides exactly the services the chemotaxis model consumes:
//!
//! | Service | Structure | What it does |
//! |---------|-----------|--------------|
//! | Grid | [`grid2D::Grid2D`] | `nx × ny` cells, uniform spacing, cell centers and volumes |
//! | Field | [`cell_variable::CellVariable`] | one value per cell plus an optional "old" snapshot |
//! | State | [`field_set::FieldSet`] | owns the grid and all variables, addressed by `FieldId` |
//! | Terms | [`terms::Term`], [`terms::Equation`] | transient, implicit diffusion, explicit and implicit sources |
//! | Linear algebra | [`stencil::StencilSystem`], [`linear_solver::LinearSolverType`] | five-point systems, PCG and Gauss-Seidel |
//!
//! ## Discretization
//!
//! Every equation is written as a signed sum of terms equal to zero and linearized into
//! `L φ = b` for the field it is solved for:
//!
//! ```text
//! TransientTerm(c)          L_ii += c V/dt,   b_i += c V/dt φ_old
//! ImplicitDiffusionTerm(D)  Σ_f D A_f/d_f (φ_nb - φ_i)
//! explicit source s         s_i V
//! DependentSourceTerm(s)    L_ii += s_i V
//! ```
//!
//! Exterior faces carry no flux.
//!
//! ## Cell numbering
//! Cell `(i, j)` has id `i + j*nx`, so x is the fastest index. Reshaping into an `(nx, ny)`
//! `DMatrix` is a plain column-major view of the value vector.
#[allow(non_snake_case)]
pub mod grid2D;

pub mod cell_variable;
pub mod field_set;
pub mod fv_error;
pub mod linear_solver;
pub mod stencil;
pub mod terms;
