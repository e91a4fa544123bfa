// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands and their flags:
//
//   create-splits  — outer/inner cross-validation splits
//   prepare-md     — MD run plan from a trained model
//   plot-energies  — energies over time of a Turbomole run
//
// Flag names keep underscores (`--trajectory_dir`) so existing
// job scripts keep working.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::application::{
    create_splits_use_case::CreateSplitsConfig,
    plot_energies_use_case::PlotEnergiesConfig,
    prepare_md_use_case::PrepareMdConfig,
};
use crate::domain::units::Units;

/// The top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate outer train/test and 5-fold inner train/val splits
    CreateSplits(CreateSplitsArgs),

    /// Resolve an MD run config into a simulation plan
    PrepareMd(PrepareMdArgs),

    /// Plot energies over time of a Turbomole MD trajectory
    PlotEnergies(PlotEnergiesArgs),
}

/// Unit system of the trajectory database, as spelled in its filename
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitsArg {
    #[value(name = "angstrom_kcal_per_mol_fs")]
    AngstromKcalPerMolFs,
    #[value(name = "angstrom_ev_fs")]
    AngstromEvFs,
    #[value(name = "bohr_hartree_aut")]
    BohrHartreeAut,
}

impl From<UnitsArg> for Units {
    fn from(u: UnitsArg) -> Self {
        match u {
            UnitsArg::AngstromKcalPerMolFs => Units::AngstromKcalPerMolFs,
            UnitsArg::AngstromEvFs         => Units::AngstromEvFs,
            UnitsArg::BohrHartreeAut       => Units::BohrHartreeAut,
        }
    }
}

/// Arguments for `create-splits`
#[derive(Args, Debug)]
pub struct CreateSplitsArgs {
    /// Directory containing the trajectory data generated by Turbomole
    #[arg(long = "trajectory_dir", default_value = "MOTOR_MD_XTB/T300_1")]
    pub trajectory_dir: String,

    /// Units for the input data
    #[arg(long, value_enum, default_value_t = UnitsArg::AngstromKcalPerMolFs)]
    pub units: UnitsArg,
}

impl CreateSplitsArgs {
    pub fn into_config(self, data_prefix: PathBuf) -> CreateSplitsConfig {
        CreateSplitsConfig {
            data_prefix,
            trajectory_dir: self.trajectory_dir,
            units:          self.units.into(),
        }
    }
}

/// Arguments for `prepare-md`
#[derive(Args, Debug)]
pub struct PrepareMdArgs {
    /// Directory containing the trajectory data generated by Turbomole
    #[arg(long = "trajectory_dir", default_value = "MOTOR_MD_XTB/T300_1")]
    pub trajectory_dir: String,

    /// JSON run configuration
    #[arg(long, default_value = "conf/inference_config.json")]
    pub config: PathBuf,
}

impl PrepareMdArgs {
    pub fn into_config(self, data_prefix: PathBuf) -> PrepareMdConfig {
        PrepareMdConfig {
            data_prefix,
            trajectory_dir: self.trajectory_dir,
            config_path:    self.config,
        }
    }
}

/// Arguments for `plot-energies`
#[derive(Args, Debug)]
pub struct PlotEnergiesArgs {
    /// Directory containing the trajectory data generated by Turbomole
    #[arg(long = "trajectory_dir", default_value = "PREPARE_12/GEO_100000/test")]
    pub trajectory_dir: String,

    /// Number of configurations to use. If negative, all available
    /// configurations are used.
    #[arg(long = "nr_of_configs", default_value_t = -1, allow_negative_numbers = true)]
    pub nr_of_configs: i64,

    /// Directory the HTML plot is written to
    #[arg(long = "plot_dir", default_value = "plots")]
    pub plot_dir: PathBuf,

    /// Local plotly.js bundle to embed, so the plot opens offline.
    /// Without it the page loads plotly.js from its CDN.
    #[arg(long = "plotly_js", env = "MD_PLOTLY_JS")]
    pub plotly_js: Option<PathBuf>,
}

impl PlotEnergiesArgs {
    pub fn into_config(self, data_prefix: PathBuf) -> PlotEnergiesConfig {
        PlotEnergiesConfig {
            data_prefix,
            trajectory_dir: self.trajectory_dir,
            nr_of_configs:  self.nr_of_configs,
            plot_dir:       self.plot_dir,
            plotly_js:      self.plotly_js,
        }
    }
}
