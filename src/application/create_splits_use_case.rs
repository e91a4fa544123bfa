// ============================================================
// Layer 2 — CreateSplitsUseCase
// ============================================================
// Generates the cross-validation splits of one trajectory:
//
//   Step 1: Open the trajectory database       (Layer 4 - data)
//   Step 2: Count its configurations            (Layer 4 - data)
//   Step 3: Build and verify the outer split    (Layer 3 - domain)
//   Step 4: Write outer_splits.npz              (Layer 6 - infra)
//           (refuses to replace an existing one)
//   Step 5: For each of the 5 folds:
//           build, verify, write inner_splits_k (Layer 3 + 6)
//   Step 6: Write split_summary.json            (Layer 6 - infra)
//
// Any failure aborts the run. The outer archive is written
// before the folds, so a failure in Step 5 leaves it on disk
// next to an incomplete set of inner archives.
//
// Usage:
//   md-schnet-workflow create-splits \
//       --trajectory_dir MOTOR_MD_XTB/T300_1 --units angstrom_kcal_per_mol_fs

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::ase_db::AseDatabase;
use crate::domain::{
    splits::{OuterSplit, SPLIT_SEED},
    traits::ConfigurationSource,
    units::Units,
};
use crate::infra::{
    layout::DataLayout,
    split_store::{FoldSizes, SplitStore, SplitSummary},
};

/// Number of leading indices shown in debug logs
const LOG_HEAD: usize = 10;

// ─── Split Configuration ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSplitsConfig {
    pub data_prefix:    PathBuf,
    pub trajectory_dir: String,
    pub units:          Units,
}

impl Default for CreateSplitsConfig {
    fn default() -> Self {
        Self {
            data_prefix:    PathBuf::from("data"),
            trajectory_dir: "MOTOR_MD_XTB/T300_1".to_string(),
            units:          Units::default(),
        }
    }
}

// ─── CreateSplitsUseCase ─────────────────────────────────────────────────────
pub struct CreateSplitsUseCase {
    config: CreateSplitsConfig,
}

impl CreateSplitsUseCase {
    pub fn new(config: CreateSplitsConfig) -> Self {
        Self { config }
    }

    /// Generate the splits from the trajectory database on disk.
    pub fn execute(&self) -> Result<SplitSummary> {
        let cfg    = &self.config;
        let layout = DataLayout::new(&cfg.data_prefix);

        let store = SplitStore::create(layout.splits_dir(&cfg.trajectory_dir))?;

        // ── Step 1: Open the database ────────────────────────────────────────
        let db_path = layout.trajectory_db(&cfg.trajectory_dir, cfg.units);
        tracing::info!("Loading trajectory database '{}'", db_path.display());
        let database = AseDatabase::open(&db_path)?;

        self.execute_with(&database, &store)
    }

    /// Generate the splits for any configuration source into `store`.
    pub fn execute_with(
        &self,
        source: &impl ConfigurationSource,
        store:  &SplitStore,
    ) -> Result<SplitSummary> {
        // ── Step 2: Dataset size ─────────────────────────────────────────────
        let total = source.configuration_count()?;
        tracing::info!("Total length of dataset: {}", total);

        // ── Step 3: Outer split, 80% train / 20% test ───────────────────────
        let outer = OuterSplit::for_dataset(total)?;
        tracing::debug!("Outer train indices[:{}]: {:?}", LOG_HEAD, head(&outer.train));
        tracing::debug!("Outer test indices[:{}]: {:?}", LOG_HEAD, head(&outer.test));
        outer.verify()?;

        // ── Step 4: Persist the outer split ──────────────────────────────────
        let outer_path = store.write_outer(&outer)?;
        tracing::info!("Saved outer splits to: {}", outer_path.display());

        // ── Step 5: Inner folds, 80% train / 20% validation each ────────────
        let mut folds = Vec::new();
        for split in outer.inner_splits() {
            tracing::debug!(
                "Fold {}: {} train, {} val, {} test",
                split.fold,
                split.train_idx.len(),
                split.val_idx.len(),
                split.test_idx.len()
            );
            split.verify()?;

            let path = store.write_inner(&split)?;
            tracing::info!("Saved inner splits from fold {} to: {}", split.fold, path.display());

            folds.push(FoldSizes {
                fold:  split.fold,
                train: split.train_idx.len(),
                val:   split.val_idx.len(),
                test:  split.test_idx.len(),
            });
        }

        // ── Step 6: Summary ──────────────────────────────────────────────────
        let summary = SplitSummary {
            total_configurations: total,
            units:                self.config.units,
            seed:                 SPLIT_SEED,
            outer_train:          outer.train.len(),
            outer_test:           outer.test.len(),
            folds,
        };
        store.save_summary(&summary)?;

        Ok(summary)
    }
}

fn head(indices: &[usize]) -> &[usize] {
    &indices[..indices.len().min(LOG_HEAD)]
}
