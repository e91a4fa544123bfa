// ============================================================
// Layer 6 — Data Directory Layout
// ============================================================
// Every path the workflows read or write hangs off one data
// prefix:
//
//   {prefix}/{trajectory_dir}/md_trajectory_{units}.db
//   {prefix}/{trajectory_dir}/md_trajectory.db
//   {prefix}/{trajectory_dir}/energies.txt
//   {prefix}/{trajectory_dir}/ex_energies
//   {prefix}/splits/{trajectory_dir}/outer_splits.npz
//   {prefix}/splits/{trajectory_dir}/inner_splits_{k}.npz

use std::path::{Path, PathBuf};

use crate::domain::units::Units;

/// Resolves workflow paths below a data prefix.
#[derive(Debug, Clone)]
pub struct DataLayout {
    prefix: PathBuf,
}

impl DataLayout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Directory holding the raw data of one trajectory
    pub fn trajectory_dir(&self, trajectory_dir: &str) -> PathBuf {
        self.prefix.join(trajectory_dir)
    }

    /// Trajectory database exported in a specific unit system
    pub fn trajectory_db(&self, trajectory_dir: &str, units: Units) -> PathBuf {
        self.trajectory_dir(trajectory_dir)
            .join(format!("md_trajectory_{units}.db"))
    }

    /// Trajectory database used for MD runs
    pub fn simulation_db(&self, trajectory_dir: &str) -> PathBuf {
        self.trajectory_dir(trajectory_dir).join("md_trajectory.db")
    }

    /// Directory holding the split archives of one trajectory
    pub fn splits_dir(&self, trajectory_dir: &str) -> PathBuf {
        self.prefix.join("splits").join(trajectory_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = DataLayout::new("/data");
        assert_eq!(
            layout.trajectory_db("MOTOR_MD_XTB/T300_1", Units::AngstromEvFs),
            PathBuf::from("/data/MOTOR_MD_XTB/T300_1/md_trajectory_angstrom_ev_fs.db")
        );
        assert_eq!(
            layout.splits_dir("MOTOR_MD_XTB/T300_1"),
            PathBuf::from("/data/splits/MOTOR_MD_XTB/T300_1")
        );
        assert_eq!(
            layout.simulation_db("T300_1"),
            PathBuf::from("/data/T300_1/md_trajectory.db")
        );
    }
}
