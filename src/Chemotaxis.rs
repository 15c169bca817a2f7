//! # Chemotaxis model
//!
//! Two-dimensional model of a cell membrane sensing an attractant gradient: a kinase (K) and a
//! phosphatase (T) shuttle between the cytosol (KC, TC) and the membrane (KM, TM), where they
//! convert the lipids P2 and P3 into each other. Only the lipids diffuse along the membrane.
//! The stimulus field R enhances kinase recruitment locally.
//!
//! ## Phases of a run
//!
//! | phase | what happens | entry point |
//! |---|---|---|
//! | setup | seven fields declared on the grid, six equations built | [`chemotaxis_model::ChemotaxisModel::setup`] |
//! | relaxation | fixed number of implicit steps from the uniform start | [`relaxation::relax`] |
//! | perturbation | R overwritten with the inverse-distance field of a point source | [`stimulus::PointSource::apply`] |
//! | relaxation | same loop, R kept fixed | [`relaxation::relax`] |
//! | output | PN/<PN>, KM/<KM>, TM/<TM> as `(nx, ny)` arrays, images, JSON | [`chemotaxis_output::ChemotaxisSnapshot`] |
//!
//! [`task::ChemotaxisTask`] strings the phases together from a [`task::TaskConfig`].
//!
//! ## Non-Obvious Features
//!
//! - Within one step the equations are solved in the order KM, TM, TC, P3, P2, KC and each one
//!   sees the fields already advanced earlier in that step.
//! - Volume averages inside the coefficients (`<KM>`, `<TM>`, `<PN>`, ...) are recomputed every
//!   time an equation is solved, never frozen at setup.
//! - The stimulus R is a field with history like the species, but it has no equation.
//! - Parameter cases come from a JSON table; a missing key is an error, there are no defaults.
pub mod chemotaxis_error;
pub mod chemotaxis_model;
pub mod chemotaxis_output;
mod chemotaxis_tests;
pub mod parameters;
pub mod relaxation;
pub mod stimulus;
pub mod task;
