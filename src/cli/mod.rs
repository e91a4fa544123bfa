// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands each subcommand
// to its use case in Layer 2. Nothing here computes anything.
//
// Global flags:
//   --data-prefix  root of all trajectory data (env MD_DATA_PREFIX)
//   --log-level    verbosity when RUST_LOG is not set

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, CreateSplitsArgs, PlotEnergiesArgs, PrepareMdArgs};

use crate::infra::logging::LogLevel;

/// Command line of the MD workflow tools
#[derive(Parser, Debug)]
#[command(
    name = "md-schnet-workflow",
    version,
    about = "Cross-validation splits, MD run preparation and energy plots for SchNet MD workflows."
)]
pub struct Cli {
    /// Root directory of the trajectory data
    #[arg(long, global = true, env = "MD_DATA_PREFIX", default_value = "data")]
    pub data_prefix: PathBuf,

    /// Log verbosity (overridden by RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Debug)]
    pub log_level: LogLevel,

    /// The workflow to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        let data_prefix = self.data_prefix;
        match self.command {
            Commands::CreateSplits(args) => run_create_splits(args, data_prefix),
            Commands::PrepareMd(args)    => run_prepare_md(args, data_prefix),
            Commands::PlotEnergies(args) => run_plot_energies(args, data_prefix),
        }
    }
}

fn run_create_splits(args: CreateSplitsArgs, data_prefix: PathBuf) -> Result<()> {
    use crate::application::create_splits_use_case::CreateSplitsUseCase;

    tracing::info!(
        "Creating splits for '{}' ({})",
        args.trajectory_dir,
        crate::domain::units::Units::from(args.units)
    );

    let summary = CreateSplitsUseCase::new(args.into_config(data_prefix)).execute()?;
    println!(
        "Wrote outer split ({} train / {} test) and {} inner folds.",
        summary.outer_train,
        summary.outer_test,
        summary.folds.len()
    );
    Ok(())
}

fn run_prepare_md(args: PrepareMdArgs, data_prefix: PathBuf) -> Result<()> {
    use crate::application::prepare_md_use_case::PrepareMdUseCase;

    let plan = PrepareMdUseCase::new(args.into_config(data_prefix)).execute()?;
    println!("Simulation plan written to {}", plan.plan_path().display());
    Ok(())
}

fn run_plot_energies(args: PlotEnergiesArgs, data_prefix: PathBuf) -> Result<()> {
    use crate::application::plot_energies_use_case::PlotEnergiesUseCase;

    let path = PlotEnergiesUseCase::new(args.into_config(data_prefix)).execute()?;
    println!("Plot written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::units::Units;

    #[test]
    fn test_create_splits_defaults() {
        let cli = Cli::try_parse_from(["md-schnet-workflow", "create-splits"]).unwrap();
        match cli.command {
            Commands::CreateSplits(args) => {
                let cfg = args.into_config(PathBuf::from("/data"));
                assert_eq!(cfg.trajectory_dir, "MOTOR_MD_XTB/T300_1");
                assert_eq!(cfg.units, Units::AngstromKcalPerMolFs);
                assert_eq!(cfg.data_prefix, PathBuf::from("/data"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_underscore_flags_and_units() {
        let cli = Cli::try_parse_from([
            "md-schnet-workflow",
            "--data-prefix",
            "/scratch",
            "create-splits",
            "--trajectory_dir",
            "MOTOR_MD_XTB/T500_2",
            "--units",
            "bohr_hartree_aut",
        ])
        .unwrap();
        assert_eq!(cli.data_prefix, PathBuf::from("/scratch"));
        match cli.command {
            Commands::CreateSplits(args) => {
                assert_eq!(args.trajectory_dir, "MOTOR_MD_XTB/T500_2");
                assert_eq!(Units::from(args.units), Units::BohrHartreeAut);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_units_rejected() {
        let res = Cli::try_parse_from(["md-schnet-workflow", "create-splits", "--units", "nm_kj"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_negative_config_count() {
        let cli = Cli::try_parse_from([
            "md-schnet-workflow",
            "plot-energies",
            "--nr_of_configs",
            "-5",
        ])
        .unwrap();
        match cli.command {
            Commands::PlotEnergies(args) => {
                assert_eq!(args.nr_of_configs, -5);
                assert!(args.plotly_js.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_log_level_flag() {
        let cli = Cli::try_parse_from([
            "md-schnet-workflow",
            "prepare-md",
            "--log-level",
            "warn",
        ])
        .unwrap();
        assert_eq!(cli.log_level, LogLevel::Warn);
    }
}
