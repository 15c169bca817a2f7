use super::chemotaxis_error::ChemotaxisError;
use super::chemotaxis_model::{Species, phosphoinositide};
use crate::FiniteVolume::field_set::FieldSet;
use crate::FiniteVolume::fv_error::FvError;
use log::info;
use nalgebra::{DMatrix, DVector};
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

/// `values / <values>` laid out as an `(nx, ny)` array
pub fn normalized_array(
    state: &FieldSet,
    values: &DVector<f64>,
) -> Result<DMatrix<f64>, ChemotaxisError> {
    let avg = state.volume_average_of(values);
    if !(avg.is_finite() && avg != 0.0) {
        return Err(FvError::NonFiniteValue(format!(
            "normalization by a volume average of {}",
            avg
        ))
        .into());
    }
    Ok(state.grid().reshape(&(values / avg))?)
}

/// The reduced output of a run: normalized PN, KM and TM plus the final volume averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemotaxisSnapshot {
    pub nx: usize,
    pub ny: usize,
    pub pn: DMatrix<f64>,
    pub km: DMatrix<f64>,
    pub tm: DMatrix<f64>,
    pub averages: BTreeMap<String, f64>,
}

impl ChemotaxisSnapshot {
    pub fn from_state(state: &FieldSet, species: &Species) -> Result<Self, ChemotaxisError> {
        let pn = phosphoinositide(state, species);
        let mut averages = BTreeMap::new();
        for (name, id) in species.all() {
            averages.insert(name.to_string(), state.cell_volume_average(id));
        }
        averages.insert("PN".to_string(), state.volume_average_of(&pn));
        Ok(Self {
            nx: state.grid().nx(),
            ny: state.grid().ny(),
            pn: normalized_array(state, &pn)?,
            km: normalized_array(state, state.value(species.KM))?,
            tm: normalized_array(state, state.value(species.TM))?,
            averages,
        })
    }

    /// (file stem, title, array) of every reduced quantity
    pub fn arrays(&self) -> [(&'static str, &'static str, &DMatrix<f64>); 3] {
        [
            ("PN", "PN / <PN>", &self.pn),
            ("KM", "KM / <KM>", &self.km),
            ("TM", "TM / <TM>", &self.tm),
        ]
    }

    pub fn save_result_json(&self, path: &str) -> Result<(), ChemotaxisError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!("result written to {}", path);
        Ok(())
    }

    pub fn load_result_json(path: &str) -> Result<Self, ChemotaxisError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

/// min, max and volume average of every model field
pub fn summary_table(state: &FieldSet, species: &Species, phase: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row![phase, "min", "max", "<.>"]);
    for (name, id) in species.all() {
        if let Ok(variable) = state.get(id) {
            table.add_row(row![
                name,
                format!("{:.6}", variable.min()),
                format!("{:.6}", variable.max()),
                format!("{:.6}", state.cell_volume_average(id))
            ]);
        }
    }
    table
}
