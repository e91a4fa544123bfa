// ============================================================
// Layer 3 — Unit Systems
// ============================================================
// The trajectory database is exported once per unit system and
// the unit name is part of its filename:
//
//   md_trajectory_angstrom_kcal_per_mol_fs.db
//   md_trajectory_angstrom_ev_fs.db
//   md_trajectory_bohr_hartree_aut.db

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit system a trajectory database was exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    /// Ångström, kcal/mol, femtoseconds
    #[default]
    AngstromKcalPerMolFs,
    /// Ångström, eV, femtoseconds
    AngstromEvFs,
    /// Bohr, Hartree, atomic time units
    BohrHartreeAut,
}

impl Units {
    /// The name used in filenames and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::AngstromKcalPerMolFs => "angstrom_kcal_per_mol_fs",
            Units::AngstromEvFs         => "angstrom_ev_fs",
            Units::BohrHartreeAut       => "bohr_hartree_aut",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_name_matches_file_name() {
        for units in [Units::AngstromKcalPerMolFs, Units::AngstromEvFs, Units::BohrHartreeAut] {
            let json = serde_json::to_string(&units).unwrap();
            assert_eq!(json, format!("\"{}\"", units.as_str()));
        }
    }

    #[test]
    fn test_default_is_kcal() {
        assert_eq!(Units::default().to_string(), "angstrom_kcal_per_mol_fs");
    }
}
