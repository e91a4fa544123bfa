// ============================================================
// Layer 4 — Data Readers
// ============================================================
// Readers for the files other tools produce:
//
//   ASE database (.db)  → AseDatabase      → configuration count
//   energies.txt        → load_energies    → EnergyRow per step
//   ex_energies         → load_state_energies → S0/S1/S2 per step
//
// Each reader returns NotFound for a missing file so the use
// cases can fail before touching any output.

/// Row counts from an ASE SQLite trajectory database
pub mod ase_db;

/// Turbomole energy and excitation energy tables
pub mod energies;
