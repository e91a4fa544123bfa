// ============================================================
// Layer 5 — MD Layer
// ============================================================
// Preparation of neural-network driven molecular dynamics.
// The simulation engine, the trained potential and the
// integrator are external; this layer turns a run config into
// a plan they can execute.
//
//   config.rs — MdRunConfig, loaded from JSON and validated
//   plan.rs   — SimulationPlan: structure, initializer,
//               calculator, integrator and hooks
//
// Reference: SchNetPack MD module (System, Simulator, hooks)

/// JSON run configuration
pub mod config;

/// Resolved simulation plan written to the run directory
pub mod plan;
