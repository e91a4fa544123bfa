// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per workflow. Each takes a plain config struct,
// coordinates the data, domain, md and infra layers, and
// returns anyhow::Result so failures carry their context up
// to the CLI.
//
// Rules for this layer:
//   - No split arithmetic here (that's Layer 3)
//   - No printing here (that's Layer 1)
//   - No file formats here (that's Layer 4 and 6)

// Outer/inner cross-validation split generation
pub mod create_splits_use_case;

// MD run preparation from a trained model and fold 0 splits
pub mod prepare_md_use_case;

// Energy-over-time plot of a Turbomole MD run
pub mod plot_energies_use_case;
