// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and rules of the workflow:
//
//   units.rs   — the three unit systems a trajectory is stored in
//   splits.rs  — outer/inner split computation and overlap checks
//   traits.rs  — abstractions the data layer implements
//
// Nothing in here touches the filesystem.

// Unit systems of the exported trajectory databases
pub mod units;

// Outer train/test and inner k-fold splits
pub mod splits;

// Core abstractions (traits) that other layers implement
pub mod traits;
