// ============================================================
// Layer 5 — MD Run Configuration
// ============================================================
// JSON description of one neural-network MD run. Sections:
//
//   globals  — trained model location
//   run      — working directory of the run
//   data     — loader settings for the trajectory database
//   md       — replicas, temperature, time step, steps, precision
//   model    — units, neighbour list and output keys of the model
//   logger   — file logger, checkpoint and tensorboard cadence
//
// Example:
//   {
//     "globals": { "model_path": "runs/best_model" },
//     "run":     { "path": "md_runs/T300_1" },
//     "data":    { "batch_size": 10, "num_workers": 4 },
//     "md":      { "n_replicas": 1, "system_temperature": 300.0,
//                  "time_step": 20.0, "n_steps": 10000,
//                  "precision": "float32", "device": "cpu" },
//     "model":   { "units": { "length": "Angstrom", "energy": "kcal/mol" },
//                  "neighborlist": { "cutoff": 5.0, "cutoff_shell": 2.0 },
//                  "force_key": "forces", "energy_key": "energy" },
//     "logger":  { "buffer_size": 100, "log_every": 1,
//                  "checkpoint_every": 100,
//                  "tensorboard_props": ["energy", "temperature"] }
//   }

use std::{fs, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::errors::WorkflowError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalsConfig {
    pub model_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size:  usize,
    #[serde(default)]
    pub num_workers: usize,
}

fn default_batch_size() -> usize {
    10
}

/// Floating point precision of the simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Float32,
    Float64,
}

/// Where the simulator runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Cuda,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdSection {
    pub n_replicas:         usize,
    /// Kelvin
    pub system_temperature: f64,
    /// Atomic time units
    pub time_step:          f64,
    pub n_steps:            usize,
    #[serde(default)]
    pub precision:          Precision,
    #[serde(default)]
    pub device:             Device,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelUnits {
    pub length: String,
    pub energy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborListConfig {
    pub cutoff:       f64,
    pub cutoff_shell: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub units:        ModelUnits,
    pub neighborlist: NeighborListConfig,
    pub force_key:    String,
    pub energy_key:   String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggerSection {
    pub buffer_size:       usize,
    pub log_every:         usize,
    pub checkpoint_every:  usize,
    #[serde(default)]
    pub tensorboard_props: Vec<String>,
}

/// Complete configuration of one MD run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdRunConfig {
    pub globals: GlobalsConfig,
    pub run:     RunConfig,
    pub data:    DataConfig,
    pub md:      MdSection,
    pub model:   ModelSection,
    pub logger:  LoggerSection,
}

impl MdRunConfig {
    /// Read and validate the JSON config at `path`.
    pub fn load(path: &Path) -> Result<Self, WorkflowError> {
        if !path.is_file() {
            return Err(WorkflowError::not_found("MD run config", path));
        }

        let json   = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json).map_err(|source| WorkflowError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values no simulator could run with.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        let invalid = |msg: &str| Err(WorkflowError::Validation(msg.to_string()));

        if self.md.n_replicas == 0 {
            return invalid("md.n_replicas must be at least 1");
        }
        if self.md.n_steps == 0 {
            return invalid("md.n_steps must be at least 1");
        }
        if !(self.md.time_step > 0.0) {
            return invalid("md.time_step must be positive");
        }
        if !(self.md.system_temperature >= 0.0) {
            return invalid("md.system_temperature must not be negative");
        }
        if !(self.model.neighborlist.cutoff > 0.0) {
            return invalid("model.neighborlist.cutoff must be positive");
        }
        if !(self.model.neighborlist.cutoff_shell >= 0.0) {
            return invalid("model.neighborlist.cutoff_shell must not be negative");
        }
        if self.logger.log_every == 0 || self.logger.checkpoint_every == 0 {
            return invalid("logger.log_every and logger.checkpoint_every must be at least 1");
        }
        if self.logger.buffer_size == 0 {
            return invalid("logger.buffer_size must be at least 1");
        }
        Ok(())
    }
}

/// A config with every field filled, for tests.
#[cfg(test)]
pub(crate) fn sample_config(run_dir: &Path) -> MdRunConfig {
    MdRunConfig {
        globals: GlobalsConfig { model_path: PathBuf::from("runs/best_model") },
        run:     RunConfig { path: run_dir.to_path_buf() },
        data:    DataConfig { batch_size: 10, num_workers: 2 },
        md: MdSection {
            n_replicas:         1,
            system_temperature: 300.0,
            time_step:          40.0,
            n_steps:            1000,
            precision:          Precision::Float32,
            device:             Device::Cpu,
        },
        model: ModelSection {
            units:        ModelUnits { length: "Angstrom".into(), energy: "kcal/mol".into() },
            neighborlist: NeighborListConfig { cutoff: 5.0, cutoff_shell: 2.0 },
            force_key:    "forces".into(),
            energy_key:   "energy".into(),
        },
        logger: LoggerSection {
            buffer_size:       100,
            log_every:         1,
            checkpoint_every:  100,
            tensorboard_props: vec!["energy".into(), "temperature".into()],
        },
    }
}
