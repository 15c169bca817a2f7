#[cfg(test)]
mod tests {
    use crate::Chemotaxis::chemotaxis_error::ChemotaxisError;
    use crate::Chemotaxis::chemotaxis_model::ChemotaxisModel;
    use crate::Chemotaxis::parameters::{ChemotaxisParameters, ParameterTable};
    use crate::Chemotaxis::relaxation::{EquationSystem, RelaxationSettings, relax};
    use crate::Chemotaxis::stimulus::PointSource;
    use crate::Chemotaxis::chemotaxis_output::ChemotaxisSnapshot;
    use crate::Chemotaxis::task::{ChemotaxisTask, RESULT_FILE, TaskConfig, create_template};
    use crate::FiniteVolume::field_set::FieldSet;
    use crate::FiniteVolume::fv_error::FvError;
    use crate::FiniteVolume::grid2D::Grid2D;
    use crate::FiniteVolume::linear_solver::LinearSolverType;
    use crate::FiniteVolume::terms::{Coefficient, TransientTerm};
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn case(name: &str) -> ChemotaxisParameters {
        ParameterTable::builtin().unwrap().select(name).unwrap()
    }

    fn settings(steps: usize, dt: f64) -> RelaxationSettings {
        RelaxationSettings {
            steps,
            dt,
            solver: LinearSolverType::default(),
            log_every: 0,
        }
    }

    fn small_config() -> TaskConfig {
        TaskConfig {
            nx: 6,
            ny: 5,
            relaxation_steps: 5,
            perturbed_steps: 5,
            log_every: 0,
            ..TaskConfig::default()
        }
    }

    fn values_of(state: &FieldSet) -> Vec<Vec<f64>> {
        state
            .variables()
            .map(|v| v.value().iter().copied().collect())
            .collect()
    }

    #[test]
    fn test_setup_declares_seven_fields_in_solve_order() {
        let params = case("case 2");
        let grid = Grid2D::new(4, 4, 1.0, 1.0).unwrap();
        let (state, model) = ChemotaxisModel::build(grid, &params, 2.0).unwrap();
        assert_eq!(state.len(), 7);
        assert_eq!(model.system.len(), 6);
        let s = model.species;
        assert_eq!(model.system.fields(), vec![s.KM, s.TM, s.TC, s.P3, s.P2, s.KC]);
        // species are shifted, the stimulus is not
        assert!(state.value(s.KM).iter().all(|v| *v == params.KM * 2.0));
        assert!(state.value(s.P2).iter().all(|v| *v == params.P2 * 2.0));
        assert!(state.value(s.R).iter().all(|v| *v == params.R));
        for variable in state.variables() {
            assert!(variable.has_old());
        }
    }

    #[test]
    fn test_non_finite_shift_is_rejected() {
        let params = case("case 2");
        let grid = Grid2D::new(2, 2, 1.0, 1.0).unwrap();
        let result = ChemotaxisModel::build(grid, &params, f64::NAN);
        assert!(matches!(result, Err(ChemotaxisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_zero_steps_leave_state_untouched() {
        let params = case("case 1");
        let grid = Grid2D::new(5, 4, 1.0, 1.0).unwrap();
        let (mut state, model) = ChemotaxisModel::build(grid, &params, 1.0).unwrap();
        let before = state.clone();
        let report = relax(&mut state, &model.system, &settings(0, 1.0)).unwrap();
        assert_eq!(report.steps, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_quiescent_case_is_exactly_stationary() {
        let params = case("quiescent");
        let grid = Grid2D::new(2, 2, 1.0, 1.0).unwrap();
        let (mut state, model) = ChemotaxisModel::build(grid, &params, 1.0).unwrap();
        let before = values_of(&state);
        let report = relax(&mut state, &model.system, &settings(10, 1.0)).unwrap();
        assert_eq!(report.steps, 10);
        assert_eq!(report.linear_iterations, 0);
        assert_eq!(values_of(&state), before);
    }

    #[test]
    fn test_balanced_case_stays_at_its_initial_values() {
        for name in ["case 1", "case 2"] {
            let params = case(name);
            let grid = Grid2D::new(5, 5, 1.0, 1.0).unwrap();
            let (mut state, model) = ChemotaxisModel::build(grid, &params, 1.0).unwrap();
            relax(&mut state, &model.system, &settings(300, 0.1)).unwrap();
            let s = model.species;
            let expected = [
                (s.KM, params.KM),
                (s.KC, params.KC),
                (s.TM, params.TM),
                (s.TC, params.TC),
                (s.P3, params.P3),
                (s.P2, params.P2),
            ];
            for (id, value) in expected {
                for v in state.value(id).iter() {
                    assert_relative_eq!(*v, value, epsilon = 1e-2);
                }
            }
        }
    }

    #[test]
    fn test_relaxation_is_bit_reproducible() {
        let params = case("case 2");
        let run = || {
            let grid = Grid2D::new(6, 6, 1.0, 1.0).unwrap();
            let (mut state, model) = ChemotaxisModel::build(grid, &params, 1.0).unwrap();
            PointSource::default().apply(&mut state, model.species.R).unwrap();
            relax(&mut state, &model.system, &settings(20, 1.0)).unwrap();
            values_of(&state)
        };
        let first = run();
        let second = run();
        for (a, b) in first.iter().zip(second.iter()) {
            for (x, y) in a.iter().zip(b.iter()) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }

    #[test]
    fn test_stimulus_is_held_fixed_and_breaks_symmetry() {
        let params = case("case 2");
        let grid = Grid2D::new(6, 6, 1.0, 1.0).unwrap();
        let (mut state, model) = ChemotaxisModel::build(grid.clone(), &params, 1.0).unwrap();
        let stimulus = PointSource::default();
        stimulus.apply(&mut state, model.species.R).unwrap();
        relax(&mut state, &model.system, &settings(20, 1.0)).unwrap();

        let expected = stimulus.values(&grid).unwrap();
        assert_eq!(state.value(model.species.R), &expected);
        let km = state.value(model.species.KM);
        let spread = km.max() - km.min();
        assert!(spread > 0.0);
        assert!(km.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_unknown_field_in_system_is_rejected() {
        let params = case("case 2");
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let (_, model) = ChemotaxisModel::build(grid, &params, 1.0).unwrap();
        let mut empty = FieldSet::new(Grid2D::new(3, 3, 1.0, 1.0).unwrap());
        let result = relax(&mut empty, &model.system, &settings(1, 1.0));
        assert!(matches!(result, Err(ChemotaxisError::FiniteVolume(_))));
    }

    #[test]
    fn test_state_missing_a_coefficient_input_is_rejected() {
        let params = case("case 2");
        let grid = Grid2D::new(3, 3, 1.0, 1.0).unwrap();
        let (_, model) = ChemotaxisModel::build(grid.clone(), &params, 1.0).unwrap();
        assert_eq!(model.system.inputs().len(), 7);
        assert!(model.system.inputs().contains(&model.species.R));

        // six variables cover every solved handle, the stimulus handle is dangling
        let mut partial = FieldSet::new(grid);
        for name in ["KM", "KC", "TM", "TC", "P3", "P2"] {
            partial.add_variable(name, 1.0, true).unwrap();
        }
        let before = partial.clone();
        let result = relax(&mut partial, &model.system, &settings(1, 1.0));
        assert!(matches!(
            result,
            Err(ChemotaxisError::FiniteVolume(FvError::UnknownField(_)))
        ));
        assert_eq!(partial, before);
    }

    #[test]
    fn test_later_equation_sees_earlier_update_in_same_step() {
        let grid = Grid2D::new(1, 1, 1.0, 1.0).unwrap();
        let mut state = FieldSet::new(grid);
        let a = state.add_variable("a", 0.0, true).unwrap();
        let b = state.add_variable("b", 0.0, true).unwrap();
        let mut system = EquationSystem::new();
        system.push(a, TransientTerm::new() - Coefficient::from(1.0));
        system.push(
            b,
            TransientTerm::new() - Coefficient::expression(move |f: &FieldSet| f.value(a).clone()),
        );
        system.read(a);

        relax(&mut state, &system, &settings(1, 1.0)).unwrap();
        assert_relative_eq!(state.value(a)[0], 1.0, epsilon = 1e-12);
        // b grows by the new a, not by the a of the previous step
        assert_relative_eq!(state.value(b)[0], 1.0, epsilon = 1e-12);

        relax(&mut state, &system, &settings(1, 1.0)).unwrap();
        assert_relative_eq!(state.value(a)[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(state.value(b)[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_task_runs_all_phases() {
        let mut task = ChemotaxisTask::new(small_config()).unwrap();
        let snapshot = task.compute().unwrap();
        assert_eq!(task.reports.len(), 2);
        assert_eq!(task.reports[1].1.steps, 5);
        assert_eq!(task.viewers.len(), 3);
        assert_eq!(snapshot.pn.shape(), (6, 5));
        for (_, _, array) in snapshot.arrays() {
            assert_relative_eq!(array.mean(), 1.0, epsilon = 1e-10);
        }
        assert_eq!(task.viewers[1].array(), &snapshot.km);
    }

    #[test]
    fn test_task_run_writes_images_and_result() {
        for format in ["svg", "png"] {
            let dir = tempfile::tempdir().unwrap();
            let output_dir = dir.path().join("out");
            let config = TaskConfig {
                output_dir: output_dir.to_str().unwrap().to_string(),
                image_format: format.to_string(),
                ..small_config()
            };
            let mut task = ChemotaxisTask::new(config).unwrap();
            let snapshot = task.run().unwrap();
            for stem in ["PN", "KM", "TM"] {
                let path = output_dir.join(format!("{}.{}", stem, format));
                assert!(std::fs::metadata(&path).unwrap().len() > 0);
            }
            let result_path = output_dir.join(RESULT_FILE);
            let loaded =
                ChemotaxisSnapshot::load_result_json(result_path.to_str().unwrap()).unwrap();
            assert_eq!((loaded.nx, loaded.ny), (6, 5));
            assert_eq!(loaded.averages.len(), snapshot.averages.len());
            assert_relative_eq!(loaded.averages["PN"], snapshot.averages["PN"], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_task_errors() {
        let config = TaskConfig {
            case: "no such case".to_string(),
            ..small_config()
        };
        assert!(matches!(
            ChemotaxisTask::new(config),
            Err(ChemotaxisError::UnknownCase(_))
        ));

        // exactly on the center of cell (1, 0), L = 4
        let config = TaskConfig {
            nx: 4,
            ny: 4,
            source_x: 0.375,
            source_y: 0.125,
            ..small_config()
        };
        assert!(matches!(
            ChemotaxisTask::new(config),
            Err(ChemotaxisError::InvalidConfiguration(_))
        ));

        let config = TaskConfig {
            image_format: "pdf".to_string(),
            ..small_config()
        };
        assert!(matches!(
            ChemotaxisTask::new(config),
            Err(ChemotaxisError::InvalidConfiguration(_))
        ));

        let config = TaskConfig {
            nx: 0,
            ..small_config()
        };
        assert!(matches!(
            ChemotaxisTask::new(config),
            Err(ChemotaxisError::FiniteVolume(_))
        ));

        let config = TaskConfig {
            nx: usize::MAX,
            ny: 2,
            ..small_config()
        };
        assert!(matches!(
            ChemotaxisTask::new(config),
            Err(ChemotaxisError::FiniteVolume(FvError::InvalidGrid(_)))
        ));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "case": "case 1", "nx": 12, "linear_solver": { "type": "GaussSeidel", "tolerance": 1e-9, "max_iterations": 200 } }"#;
        let config: TaskConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.case, "case 1");
        assert_eq!(config.nx, 12);
        assert_eq!(config.ny, 50);
        assert_eq!(config.source_y, 2.0);
        assert_eq!(config.image_format, "png");
        assert!(config.pause_on_finish);
        assert_eq!(
            config.linear_solver,
            LinearSolverType::GaussSeidel {
                tolerance: 1e-9,
                max_iterations: 200
            }
        );
    }

    #[test]
    fn test_template_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.json");
        let path = path.to_str().unwrap();
        create_template(path).unwrap();
        let config = TaskConfig::from_file(path).unwrap();
        assert_eq!(config, TaskConfig::default());
    }

    #[test]
    fn test_task_with_parameter_file() {
        let mut params = case("case 2").to_hashmap();
        params.insert("R".to_string(), 0.0);
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "CASES").unwrap();
        writeln!(temp_file, "{}", serde_json::json!({ "lab case": params })).unwrap();
        let config = TaskConfig {
            case: "lab case".to_string(),
            parameters_file: Some(temp_file.path().to_str().unwrap().to_string()),
            ..small_config()
        };
        let task = ChemotaxisTask::new(config).unwrap();
        assert_eq!(task.params, case("case 2"));
    }
}
