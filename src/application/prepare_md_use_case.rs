// ============================================================
// Layer 2 — PrepareMdUseCase
// ============================================================
// Prepares a neural-network MD run on a trajectory:
//
//   Step 1: Load and validate the run config     (Layer 5 - md)
//   Step 2: Locate fold 0 splits and database    (Layer 6 - infra)
//   Step 3: Pick the first test configuration    (Layer 6 - infra)
//           as the starting structure
//   Step 4: Resolve and write the plan           (Layer 5 - md)
//
// The simulation itself is run by the MD engine from the
// written simulation_plan.json.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::errors::WorkflowError;
use crate::infra::{layout::DataLayout, split_store::SplitStore};
use crate::md::{
    config::MdRunConfig,
    plan::{PlanInputs, SimulationPlan},
};

/// Fold whose test set provides the starting structure
const START_FOLD: usize = 0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepareMdConfig {
    pub data_prefix:    PathBuf,
    pub trajectory_dir: String,
    pub config_path:    PathBuf,
}

impl Default for PrepareMdConfig {
    fn default() -> Self {
        Self {
            data_prefix:    PathBuf::from("data"),
            trajectory_dir: "MOTOR_MD_XTB/T300_1".to_string(),
            config_path:    PathBuf::from("conf/inference_config.json"),
        }
    }
}

pub struct PrepareMdUseCase {
    config: PrepareMdConfig,
}

impl PrepareMdUseCase {
    pub fn new(config: PrepareMdConfig) -> Self {
        Self { config }
    }

    /// Build the simulation plan and write it into the run directory.
    pub fn execute(&self) -> Result<SimulationPlan> {
        let cfg = &self.config;

        // ── Step 1: Run config ───────────────────────────────────────────────
        let run_cfg = MdRunConfig::load(&cfg.config_path)?;
        tracing::info!("Loaded config:\n{}", serde_json::to_string_pretty(&run_cfg)?);

        // ── Step 2: Inputs ───────────────────────────────────────────────────
        let layout = DataLayout::new(&cfg.data_prefix);
        tracing::debug!("data_prefix: {}", layout.prefix().display());
        tracing::debug!("Model path: {}", run_cfg.globals.model_path.display());
        tracing::debug!("MD workdir: {}", run_cfg.run.path.display());

        let store      = SplitStore::open(layout.splits_dir(&cfg.trajectory_dir));
        let split_file = store.inner_path(START_FOLD);
        if !split_file.is_file() {
            return Err(WorkflowError::not_found("split file", split_file).into());
        }

        let database = layout.simulation_db(&cfg.trajectory_dir);
        tracing::debug!("Path to database: {}", database.display());
        if !database.is_file() {
            return Err(WorkflowError::not_found("trajectory database", database).into());
        }

        // ── Step 3: Starting structure ───────────────────────────────────────
        let fold = store.read_inner(START_FOLD)?;
        let initial_structure = *fold.test_idx.first().ok_or_else(|| {
            WorkflowError::Validation(format!(
                "'{}' has no test configurations to start from",
                split_file.display()
            ))
        })?;

        // ── Step 4: Plan ─────────────────────────────────────────────────────
        let plan = SimulationPlan::build(
            &run_cfg,
            PlanInputs {
                trajectory_dir: &cfg.trajectory_dir,
                database:       &database,
                split_file:     &split_file,
                initial_structure,
            },
        );
        tracing::debug!("Time step (in atomic units): {}", plan.integrator.time_step_au);
        tracing::debug!("Time step (in fs): {}", plan.integrator.time_step_fs);

        let path = plan.write()?;
        tracing::info!(
            "Prepared simulation with {} steps from configuration {}; plan saved to {}",
            plan.n_steps,
            plan.initial_structure,
            path.display()
        );

        Ok(plan)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ase_db::write_test_database;
    use crate::domain::splits::{InnerSplit, OuterSplit};
    use crate::md::config::sample_config;
    use std::{fs, path::Path};
    use tempfile::tempdir;

    const TRAJ: &str = "MOTOR_MD_XTB/T300_1";

    fn write_config(root: &Path) -> PathBuf {
        let path = root.join("inference_config.json");
        let cfg  = sample_config(&root.join("md_runs"));
        fs::write(&path, serde_json::to_string(&cfg).unwrap()).unwrap();
        path
    }

    fn seed_inputs(root: &Path) {
        let layout = DataLayout::new(root);
        let store  = SplitStore::create(layout.splits_dir(TRAJ)).unwrap();
        let outer  = OuterSplit::for_dataset(50).unwrap();
        for split in outer.inner_splits() {
            store.write_inner(&split).unwrap();
        }

        let db = layout.simulation_db(TRAJ);
        fs::create_dir_all(db.parent().unwrap()).unwrap();
        write_test_database(&db, 50);
    }

    fn config(root: &Path) -> PrepareMdConfig {
        PrepareMdConfig {
            data_prefix:    root.to_path_buf(),
            trajectory_dir: TRAJ.to_string(),
            config_path:    write_config(root),
        }
    }

    #[test]
    fn test_plan_starts_from_first_test_configuration() {
        let dir = tempdir().unwrap();
        seed_inputs(dir.path());

        let plan = PrepareMdUseCase::new(config(dir.path())).execute().unwrap();
        assert_eq!(plan.initial_structure, 40);
        assert!(plan.split_file.ends_with("inner_splits_0.npz"));
        assert!(dir.path().join("md_runs/simulation_plan.json").is_file());
    }

    #[test]
    fn test_missing_split_file() {
        let dir = tempdir().unwrap();
        let err = PrepareMdUseCase::new(config(dir.path())).execute().unwrap_err();

        let kind = err.downcast_ref::<WorkflowError>().unwrap();
        assert!(kind.is_not_found());
        assert!(kind.to_string().contains("split file"));
    }

    #[test]
    fn test_missing_database() {
        let dir = tempdir().unwrap();
        seed_inputs(dir.path());
        fs::remove_file(DataLayout::new(dir.path()).simulation_db(TRAJ)).unwrap();

        let err = PrepareMdUseCase::new(config(dir.path())).execute().unwrap_err();
        let kind = err.downcast_ref::<WorkflowError>().unwrap();
        assert!(kind.to_string().contains("trajectory database"));
    }

    #[test]
    fn test_empty_test_set_is_rejected() {
        let dir = tempdir().unwrap();
        seed_inputs(dir.path());

        let store = SplitStore::open(DataLayout::new(dir.path()).splits_dir(TRAJ));
        store
            .write_inner(&InnerSplit {
                fold:      0,
                train_idx: vec![0, 1],
                val_idx:   vec![2],
                test_idx:  vec![],
            })
            .unwrap();

        let err = PrepareMdUseCase::new(config(dir.path())).execute().unwrap_err();
        assert!(err.downcast_ref::<WorkflowError>().unwrap().is_validation());
    }
}
