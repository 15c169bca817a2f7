//! The six membrane/cytosol equations of the chemotaxis model.
//!
//! | field | production | consumption | diffusion |
//! |---|---|---|---|
//! | KM | `chiK (R+1)(1 - KC - <KM>)` | `lambdaK / (1 + PN/kappaK)` | - |
//! | TM | `chiT (1 - TC - <TM>)` | `lambdaT (KM + zetaT)` | - |
//! | TC | `lambdaT <TM KM>` | `lambdaTstar` | - |
//! | P3 | `chi3 KM (PIP2PITP/(1 + KM/kappa3) + zeta3PITP) + zeta3` | `lambda3 (TM + zeta3T)` | `diffusionCoeff` |
//! | P2 | `chi2 + lambda3 zeta3T P3` | `lambda2 (TM + zeta2T)` | `diffusionCoeff` |
//! | KC | `alphaKstar lambdaK <KM/(1 + PN/kappaK)>` | `lambdaKstar / (kappaKstar + KC)` | - |
//!
//! with `PN = P3 + P2`, `PIP2PITP = PN/(PN/kappam + <PN>/kappac + 1) + zetaPITP` and `<.>`
//! the cell-volume average. Every equation reads `dφ/dt = D ∇²φ + production - consumption φ`.
//! The coefficients are closures over field handles, evaluated each time an equation is solved.
use super::chemotaxis_error::ChemotaxisError;
use super::parameters::ChemotaxisParameters;
use super::relaxation::EquationSystem;
use crate::FiniteVolume::field_set::{FieldId, FieldSet};
use crate::FiniteVolume::grid2D::Grid2D;
use crate::FiniteVolume::terms::{
    Coefficient, DependentSourceTerm, Equation, ImplicitDiffusionTerm, TransientTerm,
};
use log::info;
use nalgebra::DVector;

/// Handles of the model fields inside the simulation state
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Species {
    pub KM: FieldId,
    pub KC: FieldId,
    pub TM: FieldId,
    pub TC: FieldId,
    pub P3: FieldId,
    pub P2: FieldId,
    pub R: FieldId,
}

impl Species {
    /// solved species in solve order
    pub fn solved(&self) -> [(&'static str, FieldId); 6] {
        [
            ("KM", self.KM),
            ("TM", self.TM),
            ("TC", self.TC),
            ("P3", self.P3),
            ("P2", self.P2),
            ("KC", self.KC),
        ]
    }

    pub fn all(&self) -> [(&'static str, FieldId); 7] {
        let [a, b, c, d, e, f] = self.solved();
        [a, b, c, d, e, f, ("R", self.R)]
    }
}

/// total phosphoinositide PN = P3 + P2
pub fn phosphoinositide(state: &FieldSet, species: &Species) -> DVector<f64> {
    state.value(species.P3) + state.value(species.P2)
}

#[derive(Debug, Clone)]
pub struct ChemotaxisModel {
    pub species: Species,
    pub system: EquationSystem,
    pub params: ChemotaxisParameters,
    pub shift: f64,
}

impl ChemotaxisModel {
    /// Declare the seven fields in `state` and build the equation system.
    ///
    /// The species start uniform at `shift` times their parameter value, the stimulus field R
    /// starts at `params.R` unshifted.
    pub fn setup(
        state: &mut FieldSet,
        params: &ChemotaxisParameters,
        shift: f64,
    ) -> Result<Self, ChemotaxisError> {
        params.validate()?;
        if !shift.is_finite() {
            return Err(ChemotaxisError::InvalidParameter {
                name: "shift".to_string(),
                value: shift,
            });
        }
        let species = Species {
            KM: state.add_variable("KM", params.KM * shift, true)?,
            KC: state.add_variable("KC", params.KC * shift, true)?,
            TM: state.add_variable("TM", params.TM * shift, true)?,
            TC: state.add_variable("TC", params.TC * shift, true)?,
            P3: state.add_variable("P3", params.P3 * shift, true)?,
            P2: state.add_variable("P2", params.P2 * shift, true)?,
            R: state.add_variable("R", params.R, true)?,
        };

        let mut system = EquationSystem::new();
        system.push(species.KM, km_equation(&species, params));
        system.push(species.TM, tm_equation(&species, params));
        system.push(species.TC, tc_equation(&species, params));
        system.push(species.P3, p3_equation(&species, params));
        system.push(species.P2, p2_equation(&species, params));
        system.push(species.KC, kc_equation(&species, params));
        for (_, id) in species.all() {
            system.read(id);
        }
        info!(
            "chemotaxis model set up on {}x{} cells, shift {}",
            state.grid().nx(),
            state.grid().ny(),
            shift
        );
        Ok(Self {
            species,
            system,
            params: params.clone(),
            shift,
        })
    }

    /// fresh state on `grid` together with the model built on it
    pub fn build(
        grid: Grid2D,
        params: &ChemotaxisParameters,
        shift: f64,
    ) -> Result<(FieldSet, Self), ChemotaxisError> {
        let mut state = FieldSet::new(grid);
        let model = Self::setup(&mut state, params, shift)?;
        Ok((state, model))
    }
}

#[allow(non_snake_case)]
fn km_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (KM, KC, R) = (s.KM, s.KC, s.R);
    let species = *s;
    let (chiK, lambdaK, kappaK) = (p.chiK, p.lambdaK, p.kappaK);
    let production = Coefficient::expression(move |f: &FieldSet| {
        let avg = f.cell_volume_average(KM);
        f.value(R)
            .add_scalar(1.0)
            .component_mul(&f.value(KC).map(|kc| 1.0 - kc - avg))
            * chiK
    });
    let consumption = Coefficient::expression(move |f: &FieldSet| {
        phosphoinositide(f, &species).map(|pn| lambdaK / (1.0 + pn / kappaK))
    });
    TransientTerm::new() - production + DependentSourceTerm::new(consumption)
}

#[allow(non_snake_case)]
fn tm_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (KM, TM, TC) = (s.KM, s.TM, s.TC);
    let (chiT, lambdaT, zetaT) = (p.chiT, p.lambdaT, p.zetaT);
    let production = Coefficient::expression(move |f: &FieldSet| {
        let avg = f.cell_volume_average(TM);
        f.value(TC).map(|tc| chiT * (1.0 - tc - avg))
    });
    let consumption =
        Coefficient::expression(move |f: &FieldSet| f.value(KM).map(|km| lambdaT * (km + zetaT)));
    TransientTerm::new() - production + DependentSourceTerm::new(consumption)
}

#[allow(non_snake_case)]
fn tc_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (KM, TM) = (s.KM, s.TM);
    let lambdaT = p.lambdaT;
    let production = Coefficient::expression(move |f: &FieldSet| {
        let avg = f.volume_average_of(&f.value(TM).component_mul(f.value(KM)));
        DVector::from_element(f.num_cells(), lambdaT * avg)
    });
    TransientTerm::new() - production + DependentSourceTerm::new(p.lambdaTstar)
}

#[allow(non_snake_case)]
fn p3_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (KM, TM) = (s.KM, s.TM);
    let species = *s;
    let (kappam, kappac, zetaPITP) = (p.kappam, p.kappac, p.zetaPITP);
    let (chi3, kappa3, zeta3PITP, zeta3) = (p.chi3, p.kappa3, p.zeta3PITP, p.zeta3);
    let (lambda3, zeta3T) = (p.lambda3, p.zeta3T);
    let production = Coefficient::expression(move |f: &FieldSet| {
        let pn = phosphoinositide(f, &species);
        let avg_pn = f.volume_average_of(&pn);
        let km = f.value(KM);
        DVector::from_fn(f.num_cells(), |i, _| {
            let pip2pitp = pn[i] / (pn[i] / kappam + avg_pn / kappac + 1.0) + zetaPITP;
            chi3 * km[i] * (pip2pitp / (1.0 + km[i] / kappa3) + zeta3PITP) + zeta3
        })
    });
    let consumption =
        Coefficient::expression(move |f: &FieldSet| f.value(TM).map(|tm| lambda3 * (tm + zeta3T)));
    TransientTerm::new() - ImplicitDiffusionTerm::new(p.diffusionCoeff) - production
        + DependentSourceTerm::new(consumption)
}

#[allow(non_snake_case)]
fn p2_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (TM, P3) = (s.TM, s.P3);
    let (chi2, lambda3, zeta3T) = (p.chi2, p.lambda3, p.zeta3T);
    let (lambda2, zeta2T) = (p.lambda2, p.zeta2T);
    let production =
        Coefficient::expression(move |f: &FieldSet| f.value(P3).map(|p3| chi2 + lambda3 * zeta3T * p3));
    let consumption =
        Coefficient::expression(move |f: &FieldSet| f.value(TM).map(|tm| lambda2 * (tm + zeta2T)));
    TransientTerm::new() - ImplicitDiffusionTerm::new(p.diffusionCoeff) - production
        + DependentSourceTerm::new(consumption)
}

#[allow(non_snake_case)]
fn kc_equation(s: &Species, p: &ChemotaxisParameters) -> Equation {
    let (KM, KC) = (s.KM, s.KC);
    let species = *s;
    let (alphaKstar, lambdaK, kappaK) = (p.alphaKstar, p.lambdaK, p.kappaK);
    let (lambdaKstar, kappaKstar) = (p.lambdaKstar, p.kappaKstar);
    let production = Coefficient::expression(move |f: &FieldSet| {
        let pn = phosphoinositide(f, &species);
        let released = f.value(KM).zip_map(&pn, |km, pn| km / (1.0 + pn / kappaK));
        let avg = f.volume_average_of(&released);
        DVector::from_element(f.num_cells(), alphaKstar * lambdaK * avg)
    });
    let consumption = Coefficient::expression(move |f: &FieldSet| {
        f.value(KC).map(|kc| lambdaKstar / (kappaKstar + kc))
    });
    TransientTerm::new() - production + DependentSourceTerm::new(consumption)
}
