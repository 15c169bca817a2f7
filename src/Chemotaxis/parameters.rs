use super::chemotaxis_error::ChemotaxisError;
use crate::Utils::load_from_file::{CaseMap, load_parameters_from_file, load_parameters_from_str};
use log::{info, warn};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// every key a parameter case must define
pub const REQUIRED_KEYS: [&str; 30] = [
    "KM",
    "KC",
    "TM",
    "TC",
    "P3",
    "P2",
    "R",
    "chiK",
    "lambdaK",
    "kappaK",
    "chiT",
    "lambdaT",
    "zetaT",
    "lambdaTstar",
    "kappam",
    "kappac",
    "zetaPITP",
    "lambda3",
    "zeta3T",
    "chi3",
    "kappa3",
    "zeta3PITP",
    "zeta3",
    "diffusionCoeff",
    "chi2",
    "lambda2",
    "zeta2T",
    "alphaKstar",
    "lambdaKstar",
    "kappaKstar",
];

/// keys used as denominators in the production/consumption expressions
const NONZERO_KEYS: [&str; 4] = ["kappaK", "kappam", "kappac", "kappa3"];

const BUILTIN_CASES: &str = include_str!("../../data/chemotaxis_cases.json");

/// Typed parameter set of the chemotaxis model.
/// The first seven entries are the initial values of the species and of the stimulus field,
/// the rest are rate constants, saturation constants and the diffusion coefficient of the
/// membrane lipids.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemotaxisParameters {
    pub KM: f64,
    pub KC: f64,
    pub TM: f64,
    pub TC: f64,
    pub P3: f64,
    pub P2: f64,
    pub R: f64,
    pub chiK: f64,
    pub lambdaK: f64,
    pub kappaK: f64,
    pub chiT: f64,
    pub lambdaT: f64,
    pub zetaT: f64,
    pub lambdaTstar: f64,
    pub kappam: f64,
    pub kappac: f64,
    pub zetaPITP: f64,
    pub lambda3: f64,
    pub zeta3T: f64,
    pub chi3: f64,
    pub kappa3: f64,
    pub zeta3PITP: f64,
    pub zeta3: f64,
    pub diffusionCoeff: f64,
    pub chi2: f64,
    pub lambda2: f64,
    pub zeta2T: f64,
    pub alphaKstar: f64,
    pub lambdaKstar: f64,
    pub kappaKstar: f64,
}

impl ChemotaxisParameters {
    pub fn from_hashmap(map: &HashMap<String, f64>) -> Result<Self, ChemotaxisError> {
        let get = |key: &str| -> Result<f64, ChemotaxisError> {
            map.get(key)
                .copied()
                .ok_or_else(|| ChemotaxisError::MissingParameter(key.to_string()))
        };
        let params = Self {
            KM: get("KM")?,
            KC: get("KC")?,
            TM: get("TM")?,
            TC: get("TC")?,
            P3: get("P3")?,
            P2: get("P2")?,
            R: get("R")?,
            chiK: get("chiK")?,
            lambdaK: get("lambdaK")?,
            kappaK: get("kappaK")?,
            chiT: get("chiT")?,
            lambdaT: get("lambdaT")?,
            zetaT: get("zetaT")?,
            lambdaTstar: get("lambdaTstar")?,
            kappam: get("kappam")?,
            kappac: get("kappac")?,
            zetaPITP: get("zetaPITP")?,
            lambda3: get("lambda3")?,
            zeta3T: get("zeta3T")?,
            chi3: get("chi3")?,
            kappa3: get("kappa3")?,
            zeta3PITP: get("zeta3PITP")?,
            zeta3: get("zeta3")?,
            diffusionCoeff: get("diffusionCoeff")?,
            chi2: get("chi2")?,
            lambda2: get("lambda2")?,
            zeta2T: get("zeta2T")?,
            alphaKstar: get("alphaKstar")?,
            lambdaKstar: get("lambdaKstar")?,
            kappaKstar: get("kappaKstar")?,
        };
        for key in map.keys() {
            if !REQUIRED_KEYS.contains(&key.as_str()) {
                warn!("parameter '{}' is not used by the model", key);
            }
        }
        params.validate()?;
        Ok(params)
    }

    /// (name, value) pairs in the order of [`REQUIRED_KEYS`]
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("KM", self.KM),
            ("KC", self.KC),
            ("TM", self.TM),
            ("TC", self.TC),
            ("P3", self.P3),
            ("P2", self.P2),
            ("R", self.R),
            ("chiK", self.chiK),
            ("lambdaK", self.lambdaK),
            ("kappaK", self.kappaK),
            ("chiT", self.chiT),
            ("lambdaT", self.lambdaT),
            ("zetaT", self.zetaT),
            ("lambdaTstar", self.lambdaTstar),
            ("kappam", self.kappam),
            ("kappac", self.kappac),
            ("zetaPITP", self.zetaPITP),
            ("lambda3", self.lambda3),
            ("zeta3T", self.zeta3T),
            ("chi3", self.chi3),
            ("kappa3", self.kappa3),
            ("zeta3PITP", self.zeta3PITP),
            ("zeta3", self.zeta3),
            ("diffusionCoeff", self.diffusionCoeff),
            ("chi2", self.chi2),
            ("lambda2", self.lambda2),
            ("zeta2T", self.zeta2T),
            ("alphaKstar", self.alphaKstar),
            ("lambdaKstar", self.lambdaKstar),
            ("kappaKstar", self.kappaKstar),
        ]
    }

    pub fn to_hashmap(&self) -> HashMap<String, f64> {
        self.entries()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ChemotaxisError> {
        for (name, value) in self.entries() {
            if !value.is_finite() || (NONZERO_KEYS.contains(&name) && value == 0.0) {
                return Err(ChemotaxisError::InvalidParameter {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn pretty_print(&self, case: &str) {
        let mut table = Table::new();
        table.add_row(row!["parameter", case]);
        for (name, value) in self.entries() {
            table.add_row(row![name, format!("{:.6}", value)]);
        }
        table.printstd();
    }
}

/// Named parameter cases, ordered by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTable {
    cases: CaseMap,
}

impl ParameterTable {
    pub fn new(cases: CaseMap) -> Self {
        Self { cases }
    }

    /// cases compiled into the binary
    pub fn builtin() -> Result<Self, ChemotaxisError> {
        let cases = load_parameters_from_str(BUILTIN_CASES, "built-in parameter cases")
            .map_err(ChemotaxisError::ParameterFile)?;
        Ok(Self { cases })
    }

    pub fn from_file(file_name: &str) -> Result<Self, ChemotaxisError> {
        let cases = load_parameters_from_file(file_name).map_err(ChemotaxisError::ParameterFile)?;
        Ok(Self { cases })
    }

    pub fn case_names(&self) -> Vec<&str> {
        self.cases.keys().map(|k| k.as_str()).collect()
    }

    pub fn contains(&self, case: &str) -> bool {
        self.cases.contains_key(case)
    }

    pub fn insert_case(&mut self, case: &str, values: HashMap<String, f64>) {
        self.cases.insert(case.to_string(), values);
    }

    pub fn select(&self, case: &str) -> Result<ChemotaxisParameters, ChemotaxisError> {
        let map = self
            .cases
            .get(case)
            .ok_or_else(|| ChemotaxisError::UnknownCase(case.to_string()))?;
        let params = ChemotaxisParameters::from_hashmap(map)?;
        info!("selected parameter case '{}'", case);
        Ok(params)
    }

    pub fn print_cases(&self) {
        let mut table = Table::new();
        table.add_row(row!["case", "keys", "diffusionCoeff"]);
        for (name, map) in &self.cases {
            let d = map
                .get("diffusionCoeff")
                .map(|v| format!("{}", v))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![name, map.len(), d]);
        }
        table.printstd();
    }
}
