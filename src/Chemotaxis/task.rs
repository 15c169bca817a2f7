//! A complete chemotaxis run described by one JSON document.
//!
//! ```json
//! {
//!   "case": "case 2",
//!   "nx": 50, "ny": 50, "dx": 1.0, "dy": 1.0,
//!   "dt": 1.0, "relaxation_steps": 100, "perturbed_steps": 100,
//!   "linear_solver": { "type": "PCG", "tolerance": 1e-10, "max_iterations": 1000 },
//!   "output_dir": "results", "image_format": "png"
//! }
//! ```
//! Every key may be omitted and falls back to its default. The run relaxes the uniform start,
//! applies the point-source stimulus, relaxes again and writes the normalized PN, KM and TM maps
//! as images together with a `chemotaxis_result.json`.
use super::chemotaxis_error::ChemotaxisError;
use super::chemotaxis_model::ChemotaxisModel;
use super::chemotaxis_output::{ChemotaxisSnapshot, summary_table};
use super::parameters::{ChemotaxisParameters, ParameterTable};
use super::relaxation::{RelaxationReport, RelaxationSettings, relax};
use super::stimulus::PointSource;
use crate::FiniteVolume::field_set::FieldSet;
use crate::FiniteVolume::grid2D::Grid2D;
use crate::FiniteVolume::linear_solver::LinearSolverType;
use crate::Utils::grid_viewer::GridViewer;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const IMAGE_FORMATS: [&str; 3] = ["png", "svg", "bmp"];
pub const RESULT_FILE: &str = "chemotaxis_result.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// name of the parameter case
    pub case: String,
    /// parameter table to read instead of the built-in one
    pub parameters_file: Option<String>,
    pub nx: usize,
    pub ny: usize,
    pub dx: f64,
    pub dy: f64,
    /// multiplier applied to the initial species values
    pub shift: f64,
    pub dt: f64,
    pub relaxation_steps: usize,
    pub perturbed_steps: usize,
    /// source position in units of `nx*dx`
    pub source_x: f64,
    pub source_y: f64,
    pub linear_solver: LinearSolverType,
    pub output_dir: String,
    pub image_format: String,
    pub min_val: f64,
    pub max_val: f64,
    pub log_every: usize,
    pub pause_on_finish: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            case: "case 2".to_string(),
            parameters_file: None,
            nx: 50,
            ny: 50,
            dx: 1.0,
            dy: 1.0,
            shift: 1.0,
            dt: 1.0,
            relaxation_steps: 100,
            perturbed_steps: 100,
            source_x: 0.5,
            source_y: 2.0,
            linear_solver: LinearSolverType::default(),
            output_dir: ".".to_string(),
            image_format: "png".to_string(),
            min_val: 0.0,
            max_val: 2.0,
            log_every: 10,
            pause_on_finish: true,
        }
    }
}

impl TaskConfig {
    pub fn from_file(path: &str) -> Result<Self, ChemotaxisError> {
        let file = File::open(path)?;
        let config: TaskConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        info!("task configuration loaded from {}", path);
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<(), ChemotaxisError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ChemotaxisError> {
        let invalid = |msg: String| -> Result<(), ChemotaxisError> {
            Err(ChemotaxisError::InvalidConfiguration(msg))
        };
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return invalid(format!("dt must be positive, got {}", self.dt));
        }
        if !self.shift.is_finite() {
            return invalid(format!("shift must be finite, got {}", self.shift));
        }
        if !(self.min_val < self.max_val) {
            return invalid(format!(
                "display bounds must satisfy min_val < max_val, got {}..{}",
                self.min_val, self.max_val
            ));
        }
        if !IMAGE_FORMATS.contains(&self.image_format.as_str()) {
            return invalid(format!(
                "image format '{}' is not one of {:?}",
                self.image_format, IMAGE_FORMATS
            ));
        }
        self.linear_solver
            .validate()
            .map_err(ChemotaxisError::InvalidConfiguration)?;
        // grid sizes are checked by Grid2D::new
        Ok(())
    }

    pub fn grid(&self) -> Result<Grid2D, ChemotaxisError> {
        Ok(Grid2D::new(self.nx, self.ny, self.dx, self.dy)?)
    }

    pub fn source(&self) -> PointSource {
        PointSource::new(self.source_x, self.source_y)
    }

    pub fn parameter_table(&self) -> Result<ParameterTable, ChemotaxisError> {
        match &self.parameters_file {
            Some(path) => ParameterTable::from_file(path),
            None => ParameterTable::builtin(),
        }
    }

    fn settings(&self, steps: usize) -> RelaxationSettings {
        RelaxationSettings {
            steps,
            dt: self.dt,
            solver: self.linear_solver.clone(),
            log_every: self.log_every,
        }
    }
}

/// writes a config file with every key at its default value
pub fn create_template(path: &str) -> Result<(), ChemotaxisError> {
    TaskConfig::default().save(path)?;
    println!("template written to {}", path);
    Ok(())
}

pub struct ChemotaxisTask {
    pub config: TaskConfig,
    pub params: ChemotaxisParameters,
    pub state: FieldSet,
    pub model: ChemotaxisModel,
    pub reports: Vec<(String, RelaxationReport)>,
    pub viewers: Vec<GridViewer>,
    pub snapshot: Option<ChemotaxisSnapshot>,
}

impl ChemotaxisTask {
    pub fn new(config: TaskConfig) -> Result<Self, ChemotaxisError> {
        config.validate()?;
        let params = config.parameter_table()?.select(&config.case)?;
        let grid = config.grid()?;
        // fail before any solving when the source sits on a cell center
        config.source().values(&grid)?;
        let (state, model) = ChemotaxisModel::build(grid, &params, config.shift)?;
        Ok(Self {
            config,
            params,
            state,
            model,
            reports: Vec::new(),
            viewers: Vec::new(),
            snapshot: None,
        })
    }

    pub fn from_file(path: &str) -> Result<Self, ChemotaxisError> {
        Self::new(TaskConfig::from_file(path)?)
    }

    fn relax_phase(
        &mut self,
        phase: &str,
        steps: usize,
    ) -> Result<RelaxationReport, ChemotaxisError> {
        info!("{}: {} steps of dt = {}", phase, steps, self.config.dt);
        let report = relax(&mut self.state, &self.model.system, &self.config.settings(steps))?;
        info!(
            "{} done: {} linear iterations, {} unconverged solves",
            phase, report.linear_iterations, report.unconverged_solves
        );
        summary_table(&self.state, &self.model.species, phase).printstd();
        self.reports.push((phase.to_string(), report));
        Ok(report)
    }

    /// relax the uniform initial state
    pub fn relax_initial(&mut self) -> Result<RelaxationReport, ChemotaxisError> {
        self.relax_phase("relaxation", self.config.relaxation_steps)
    }

    /// overwrite the stimulus field with the point-source gradient
    pub fn perturb(&mut self) -> Result<(), ChemotaxisError> {
        self.config.source().apply(&mut self.state, self.model.species.R)
    }

    pub fn relax_perturbed(&mut self) -> Result<RelaxationReport, ChemotaxisError> {
        self.relax_phase("perturbed relaxation", self.config.perturbed_steps)
    }

    /// Reduce the current state to normalized arrays and show them in the viewers.
    /// The viewers are created on the first call and updated afterwards.
    pub fn reduce(&mut self) -> Result<&ChemotaxisSnapshot, ChemotaxisError> {
        let snapshot = ChemotaxisSnapshot::from_state(&self.state, &self.model.species)?;
        if self.viewers.is_empty() {
            let (lx, ly) = self.state.grid().extents();
            for (_, title, array) in snapshot.arrays() {
                let viewer =
                    GridViewer::new(array.clone(), self.config.min_val, self.config.max_val, title)
                        .with_extents(lx, ly);
                self.viewers.push(viewer);
            }
        } else {
            for (viewer, (_, _, array)) in self.viewers.iter_mut().zip(snapshot.arrays()) {
                viewer.update(array.clone())?;
            }
        }
        let snapshot = self.snapshot.insert(snapshot);
        Ok(&*snapshot)
    }

    /// all three phases without writing anything
    pub fn compute(&mut self) -> Result<ChemotaxisSnapshot, ChemotaxisError> {
        self.relax_initial()?;
        self.reduce()?;
        self.perturb()?;
        self.relax_perturbed()?;
        Ok(self.reduce()?.clone())
    }

    /// plot every viewer into the output directory; returns the written paths
    pub fn write_images(&self) -> Result<Vec<PathBuf>, ChemotaxisError> {
        let dir = Path::new(&self.config.output_dir);
        std::fs::create_dir_all(dir)?;
        let stems = ["PN", "KM", "TM"];
        let mut written = Vec::new();
        for (viewer, stem) in self.viewers.iter().zip(stems) {
            let path = dir.join(format!("{}.{}", stem, self.config.image_format));
            let path_str = path.to_string_lossy().to_string();
            viewer
                .plot(&path_str)
                .map_err(|e| ChemotaxisError::Plot(format!("{}: {}", path_str, e)))?;
            info!("image written to {}", path_str);
            written.push(path);
        }
        Ok(written)
    }

    /// the full run: compute, then write the images and the result JSON
    pub fn run(&mut self) -> Result<ChemotaxisSnapshot, ChemotaxisError> {
        self.params.pretty_print(&self.config.case);
        let snapshot = self.compute()?;
        self.write_images()?;
        let result_path = Path::new(&self.config.output_dir).join(RESULT_FILE);
        snapshot.save_result_json(&result_path.to_string_lossy())?;
        Ok(snapshot)
    }
}
