// ============================================================
// Layer 5 — Simulation Plan
// ============================================================
// Resolves an MdRunConfig into everything the external MD
// engine needs to start: which structure to begin from, how
// to initialise momenta, which calculator and integrator to
// build, and which simulation hooks to attach.
//
// The physics (neural-network potential, velocity Verlet,
// HDF5 logging) lives in the engine. This module only decides
// and records, then writes simulation_plan.json into the run
// directory.

use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::md::config::{Device, MdRunConfig, Precision};

/// Femtoseconds per atomic unit of time
pub const FS_PER_AU_TIME: f64 = 0.024188843265864;

pub const PLAN_FILE:       &str = "simulation_plan.json";
pub const TRAJECTORY_LOG:  &str = "simulation_schnet.hdf5";
pub const CHECKPOINT_FILE: &str = "simulation.chk";
pub const TENSORBOARD_DIR: &str = "logs";

/// Floating point precision of the HDF5 trajectory log
const LOG_PRECISION: u32 = 32;

/// Convert a time step from atomic time units to femtoseconds.
pub fn au_to_fs(time_step_au: f64) -> f64 {
    time_step_au * FS_PER_AU_TIME
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemPlan {
    pub n_replicas:          usize,
    pub position_unit_input: String,
}

/// Uniform momenta at the system temperature with the listed
/// collective motions removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializerPlan {
    pub temperature:            f64,
    pub remove_center_of_mass:  bool,
    pub remove_translation:     bool,
    pub remove_rotation:        bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborListPlan {
    pub cutoff:       f64,
    pub cutoff_shell: f64,
    pub backend:      String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorPlan {
    pub model_path:          PathBuf,
    pub force_key:           String,
    pub energy_key:          String,
    pub energy_unit:         String,
    pub position_unit:       String,
    pub required_properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorPlan {
    pub kind:         String,
    pub time_step_au: f64,
    pub time_step_fs: f64,
}

/// Data written to the trajectory log each time it fires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stream", rename_all = "snake_case")]
pub enum DataStream {
    Molecule { store_velocities: bool },
    Property { target_properties: Vec<String> },
}

/// Simulation hooks in the order they are attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "hook", rename_all = "snake_case")]
pub enum Hook {
    FileLogger {
        path:          PathBuf,
        buffer_size:   usize,
        every_n_steps: usize,
        precision:     u32,
        data_streams:  Vec<DataStream>,
    },
    Checkpoint {
        path:          PathBuf,
        every_n_steps: usize,
    },
    TensorboardLogger {
        log_dir:    PathBuf,
        properties: Vec<String>,
    },
}

/// Everything needed to start one MD run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationPlan {
    pub trajectory_dir:      String,
    pub database:            PathBuf,
    pub split_file:          PathBuf,
    pub initial_structure:   usize,
    pub workdir:             PathBuf,
    pub system:              SystemPlan,
    pub initializer:         InitializerPlan,
    pub neighbor_list:       NeighborListPlan,
    pub calculator:          CalculatorPlan,
    pub integrator:          IntegratorPlan,
    pub precision:           Precision,
    pub device:              Device,
    pub n_steps:             usize,
    pub hooks:               Vec<Hook>,
}

/// Where the plan's inputs come from
pub struct PlanInputs<'a> {
    pub trajectory_dir:    &'a str,
    pub database:          &'a Path,
    pub split_file:        &'a Path,
    pub initial_structure: usize,
}

impl SimulationPlan {
    /// Resolve `cfg` into a plan.
    pub fn build(cfg: &MdRunConfig, inputs: PlanInputs<'_>) -> Self {
        let workdir = cfg.run.path.clone();
        let units   = &cfg.model.units;

        Self {
            trajectory_dir:    inputs.trajectory_dir.to_string(),
            database:          inputs.database.to_path_buf(),
            split_file:        inputs.split_file.to_path_buf(),
            initial_structure: inputs.initial_structure,
            system: SystemPlan {
                n_replicas:          cfg.md.n_replicas,
                position_unit_input: units.length.clone(),
            },
            initializer: InitializerPlan {
                temperature:           cfg.md.system_temperature,
                remove_center_of_mass: true,
                remove_translation:    true,
                remove_rotation:       true,
            },
            neighbor_list: NeighborListPlan {
                cutoff:       cfg.model.neighborlist.cutoff,
                cutoff_shell: cfg.model.neighborlist.cutoff_shell,
                backend:      "ase".to_string(),
            },
            calculator: CalculatorPlan {
                model_path:          cfg.globals.model_path.clone(),
                force_key:           cfg.model.force_key.clone(),
                energy_key:          cfg.model.energy_key.clone(),
                energy_unit:         units.energy.clone(),
                position_unit:       units.length.clone(),
                required_properties: Vec::new(),
            },
            integrator: IntegratorPlan {
                kind:         "velocity_verlet".to_string(),
                time_step_au: cfg.md.time_step,
                time_step_fs: au_to_fs(cfg.md.time_step),
            },
            precision: cfg.md.precision,
            device:    cfg.md.device,
            n_steps:   cfg.md.n_steps,
            hooks:     build_hooks(cfg, &workdir),
            workdir,
        }
    }

    pub fn plan_path(&self) -> PathBuf {
        self.workdir.join(PLAN_FILE)
    }

    /// Create the run directory and write the plan into it.
    pub fn write(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.workdir).with_context(|| {
            format!("Cannot create MD workdir '{}'", self.workdir.display())
        })?;

        let path = self.plan_path();
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Cannot write simulation plan to '{}'", path.display()))?;
        Ok(path)
    }
}

fn build_hooks(cfg: &MdRunConfig, workdir: &Path) -> Vec<Hook> {
    let log = &cfg.logger;
    vec![
        Hook::FileLogger {
            path:          workdir.join(TRAJECTORY_LOG),
            buffer_size:   log.buffer_size,
            every_n_steps: log.log_every,
            precision:     LOG_PRECISION,
            data_streams:  vec![
                DataStream::Molecule { store_velocities: true },
                DataStream::Property { target_properties: vec![cfg.model.energy_key.clone()] },
            ],
        },
        Hook::Checkpoint {
            path:          workdir.join(CHECKPOINT_FILE),
            every_n_steps: log.checkpoint_every,
        },
        Hook::TensorboardLogger {
            log_dir:    workdir.join(TENSORBOARD_DIR),
            properties: log.tensorboard_props.clone(),
        },
    ]
}
