//! Tooling around machine-learned interatomic potentials for molecular
//! dynamics: reproducible cross-validation splits of trajectory data,
//! preparation of neural-network MD runs, and energy-over-time plots.

/// Command line parsing and dispatch
pub mod cli;
/// Use cases, one per workflow
pub mod application;
/// Units, split computation and core traits
pub mod domain;
/// Readers for trajectory databases and energy tables
pub mod data;
/// MD run configuration and simulation plans
pub mod md;
/// Paths, split archives, logging and plots
pub mod infra;

mod errors;

pub use errors::WorkflowError;
