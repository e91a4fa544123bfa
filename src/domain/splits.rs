// ============================================================
// Layer 3 — Cross-Validation Splits
// ============================================================
// Partitions the configuration indices [0, N) of a trajectory
// into a fixed outer train/test split and five inner
// train/validation folds carved from the outer train part:
//
//   [0 ............................. N)
//   |<------ outer train 80% ------>|<- test 20% ->|
//   |val0|val1|val2|val3|val4|       (fold k validates on val_k)
//
// Every fold re-uses the outer test indices unchanged so the
// held-out set stays fixed while validation rotates.
//
// Partitioning is contiguous and deterministic. SPLIT_SEED is
// recorded alongside the archives; none of the arithmetic here
// draws from it.
//
// When the outer train size is not a multiple of the fold
// width the last fold's validation slice stops at the end of
// the outer train indices and comes out short. Downstream runs
// already depend on those sizes, so it is reproduced as-is.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::WorkflowError;

/// Fraction of the dataset assigned to the outer train split
pub const OUTER_TRAIN_FRACTION: f64 = 0.8;

/// Fraction of the outer train split kept for training in each fold
pub const INNER_TRAIN_FRACTION: f64 = 0.8;

/// Number of inner cross-validation folds
pub const K_FOLDS: usize = 5;

/// Seed recorded with every generated split set
pub const SPLIT_SEED: u64 = 42;

/// Top-level train/test partition of the full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuterSplit {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// One cross-validation fold.
/// Field names match the keys of the persisted archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerSplit {
    pub fold:      usize,
    pub train_idx: Vec<usize>,
    pub val_idx:   Vec<usize>,
    pub test_idx:  Vec<usize>,
}

/// `floor(n * fraction)` with the same float arithmetic the
/// existing split files were produced with.
fn fraction_of(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction) as usize
}

impl OuterSplit {
    /// Build the outer split for a dataset of `total` configurations.
    ///
    /// train = [0, floor(0.8 * N)), test = [floor(0.8 * N), N)
    pub fn for_dataset(total: usize) -> Result<Self, WorkflowError> {
        if total == 0 {
            return Err(WorkflowError::Validation(
                "dataset contains no configurations".to_string(),
            ));
        }

        let train_count = fraction_of(total, OUTER_TRAIN_FRACTION);
        Ok(Self {
            train: (0..train_count).collect(),
            test:  (train_count..total).collect(),
        })
    }

    /// Verify that train and test share no index.
    pub fn verify(&self) -> Result<(), WorkflowError> {
        ensure_disjoint("train", &self.train, "test", &self.test)?;
        tracing::info!("No overlap between train and test indices!");
        Ok(())
    }

    /// Carve the inner folds out of the outer train indices.
    pub fn inner_splits(&self) -> Vec<InnerSplit> {
        let outer_train_count = self.train.len();
        let inner_train_count = fraction_of(outer_train_count, INNER_TRAIN_FRACTION);
        let inner_val_count   = outer_train_count - inner_train_count;

        (0..K_FOLDS)
            .map(|fold| {
                // Clamp like a sequence slice: the last fold may run short
                let start = (fold * inner_val_count).min(outer_train_count);
                let end   = ((fold + 1) * inner_val_count).min(outer_train_count);
                let val_idx = self.train[start..end].to_vec();

                // Order-preserving difference over the outer train sequence
                let excluded: HashSet<usize> = val_idx.iter().copied().collect();
                let train_idx = self
                    .train
                    .iter()
                    .copied()
                    .filter(|i| !excluded.contains(i))
                    .collect();

                InnerSplit {
                    fold,
                    train_idx,
                    val_idx,
                    test_idx: self.test.clone(),
                }
            })
            .collect()
    }
}

impl InnerSplit {
    /// Verify that train, validation and test are pairwise disjoint.
    pub fn verify(&self) -> Result<(), WorkflowError> {
        ensure_disjoint("train", &self.train_idx, "val", &self.val_idx)?;
        ensure_disjoint("train", &self.train_idx, "test", &self.test_idx)?;
        ensure_disjoint("val", &self.val_idx, "test", &self.test_idx)?;
        tracing::info!("No overlap between train, val and test indices!");
        Ok(())
    }
}

/// Fail with a `Validation` error naming the first shared index.
pub fn ensure_disjoint(
    a_name: &str,
    a:      &[usize],
    b_name: &str,
    b:      &[usize],
) -> Result<(), WorkflowError> {
    let a_set: HashSet<usize> = a.iter().copied().collect();
    match b.iter().find(|i| a_set.contains(i)) {
        Some(shared) => Err(WorkflowError::Validation(format!(
            "Overlap between {a_name} and {b_name} indices! (index {shared} is in both)"
        ))),
        None => Ok(()),
    }
}
