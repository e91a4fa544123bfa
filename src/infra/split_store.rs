// ============================================================
// Layer 6 — Split Archive Store
// ============================================================
// Persists split indices as NumPy .npz archives so the
// split-aware dataset loaders downstream can read them with
// `np.load(path)["train_idx"]`.
//
// Files per trajectory:
//   splits/{trajectory_dir}/
//     outer_splits.npz     ← keys: train, test
//     inner_splits_0.npz   ← keys: train_idx, val_idx, test_idx
//     ...
//     inner_splits_4.npz
//     split_summary.json   ← sizes, seed and units of the last run
//
// Arrays are stored as int64. The writer adds the `.npy`
// suffix to each member, so `train` is stored as `train.npy`
// exactly like `np.savez` does, and the reader strips it again.
//
// The outer archive is never overwritten: an existing file
// fails with AlreadyExists, both on the explicit check and on
// the create-new open. Inner archives are overwritten freely.

use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use ndarray::Array1;
use ndarray_npy::{NpzReader, NpzWriter, ReadNpzError, WriteNpzError};
use serde::{Deserialize, Serialize};

use crate::domain::splits::{InnerSplit, OuterSplit};
use crate::domain::units::Units;
use crate::errors::WorkflowError;

const OUTER_FILE:   &str = "outer_splits.npz";
const SUMMARY_FILE: &str = "split_summary.json";

/// Sizes of one persisted fold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSizes {
    pub fold:  usize,
    pub train: usize,
    pub val:   usize,
    pub test:  usize,
}

/// Record of one split generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub total_configurations: usize,
    pub units:                Units,
    pub seed:                 u64,
    pub outer_train:          usize,
    pub outer_test:           usize,
    pub folds:                Vec<FoldSizes>,
}

/// Reads and writes the split archives of one trajectory.
pub struct SplitStore {
    dir: PathBuf,
}

impl SplitStore {
    /// Open the store, creating the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, WorkflowError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Open an existing store for reading. The directory is not created.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn outer_path(&self) -> PathBuf {
        self.dir.join(OUTER_FILE)
    }

    pub fn inner_path(&self, fold: usize) -> PathBuf {
        self.dir.join(format!("inner_splits_{fold}.npz"))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    /// Fail with `AlreadyExists` if the outer archive is on disk.
    pub fn ensure_outer_absent(&self) -> Result<(), WorkflowError> {
        let path = self.outer_path();
        if path.exists() {
            return Err(already_exists(path));
        }
        Ok(())
    }

    /// Write `outer_splits.npz`. Never replaces an existing file.
    pub fn write_outer(&self, split: &OuterSplit) -> Result<PathBuf, WorkflowError> {
        self.ensure_outer_absent()?;

        let path = self.outer_path();
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(already_exists(path));
            }
            Err(e) => return Err(e.into()),
        };

        write_archive(&path, file, &[("train", &split.train), ("test", &split.test)])?;
        Ok(path)
    }

    /// Write `inner_splits_{fold}.npz`, replacing any previous file.
    pub fn write_inner(&self, split: &InnerSplit) -> Result<PathBuf, WorkflowError> {
        let path = self.inner_path(split.fold);
        let file = File::create(&path)?;

        write_archive(
            &path,
            file,
            &[
                ("train_idx", &split.train_idx),
                ("val_idx",   &split.val_idx),
                ("test_idx",  &split.test_idx),
            ],
        )?;
        Ok(path)
    }

    pub fn read_outer(&self) -> Result<OuterSplit, WorkflowError> {
        let path = self.outer_path();
        let mut npz = open_archive(&path)?;
        Ok(OuterSplit {
            train: read_indices(&path, &mut npz, "train")?,
            test:  read_indices(&path, &mut npz, "test")?,
        })
    }

    pub fn read_inner(&self, fold: usize) -> Result<InnerSplit, WorkflowError> {
        let path = self.inner_path(fold);
        let mut npz = open_archive(&path)?;
        Ok(InnerSplit {
            fold,
            train_idx: read_indices(&path, &mut npz, "train_idx")?,
            val_idx:   read_indices(&path, &mut npz, "val_idx")?,
            test_idx:  read_indices(&path, &mut npz, "test_idx")?,
        })
    }

    /// Save the run summary as pretty JSON next to the archives.
    pub fn save_summary(&self, summary: &SplitSummary) -> Result<()> {
        let path = self.summary_path();
        let json = serde_json::to_string_pretty(summary)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write split summary to '{}'", path.display()))?;

        tracing::debug!("Saved split summary to '{}'", path.display());
        Ok(())
    }

    #[cfg(test)]
    pub fn load_summary(&self) -> Result<SplitSummary> {
        let path = self.summary_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read split summary from '{}'. Have you run 'create-splits' first?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn already_exists(path: PathBuf) -> WorkflowError {
    tracing::error!(
        "Outer splits already exist at {}. Please remove it to create new splits.",
        path.display()
    );
    WorkflowError::AlreadyExists { path }
}

fn write_archive(
    path:   &Path,
    file:   File,
    arrays: &[(&str, &Vec<usize>)],
) -> Result<(), WorkflowError> {
    let wrap = |source: WriteNpzError| WorkflowError::ArchiveWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut npz = NpzWriter::new(file);
    for (key, indices) in arrays {
        let array = to_int64(indices)?;
        npz.add_array(*key, &array).map_err(wrap)?;
    }
    npz.finish().map_err(wrap)?;
    Ok(())
}

fn open_archive(path: &Path) -> Result<NpzReader<File>, WorkflowError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(WorkflowError::not_found("split file", path));
        }
        Err(e) => return Err(e.into()),
    };
    NpzReader::new(file).map_err(|source| read_error(path, source))
}

fn read_indices(
    path: &Path,
    npz:  &mut NpzReader<File>,
    key:  &str,
) -> Result<Vec<usize>, WorkflowError> {
    let array: Array1<i64> = npz
        .by_name(key)
        .map_err(|source| read_error(path, source))?;

    array
        .iter()
        .map(|&i| {
            usize::try_from(i).map_err(|_| {
                WorkflowError::Validation(format!(
                    "negative index {i} under '{key}' in '{}'",
                    path.display()
                ))
            })
        })
        .collect()
}

fn read_error(path: &Path, source: ReadNpzError) -> WorkflowError {
    WorkflowError::ArchiveRead {
        path: path.to_path_buf(),
        source,
    }
}

fn to_int64(indices: &[usize]) -> Result<Array1<i64>, WorkflowError> {
    let values = indices
        .iter()
        .map(|&i| i64::try_from(i))
        .collect::<Result<Vec<i64>, _>>()
        .map_err(|_| WorkflowError::Validation("index does not fit in int64".to_string()))?;
    Ok(Array1::from(values))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_outer() -> OuterSplit {
        OuterSplit {
            train: vec![0, 1, 2, 3],
            test:  vec![4],
        }
    }

    #[test]
    fn test_outer_write_then_read() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path().join("splits/T300_1")).unwrap();

        let path = store.write_outer(&sample_outer()).unwrap();
        assert!(path.ends_with("outer_splits.npz"));
        assert_eq!(store.read_outer().unwrap(), sample_outer());
    }

    #[test]
    fn test_outer_is_never_overwritten() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path()).unwrap();
        store.write_outer(&sample_outer()).unwrap();

        let other = OuterSplit { train: vec![0], test: vec![1] };
        let err   = store.write_outer(&other).unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.read_outer().unwrap(), sample_outer());
    }

    #[test]
    fn test_inner_is_overwritten() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path()).unwrap();
        fs::write(store.inner_path(2), b"stale").unwrap();

        let split = InnerSplit {
            fold:      2,
            train_idx: vec![0, 3],
            val_idx:   vec![1, 2],
            test_idx:  vec![4],
        };
        store.write_inner(&split).unwrap();
        assert_eq!(store.read_inner(2).unwrap(), split);
    }

    #[test]
    fn test_members_use_numpy_names() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path()).unwrap();
        store.write_outer(&sample_outer()).unwrap();

        let mut npz = NpzReader::new(File::open(store.outer_path()).unwrap()).unwrap();
        let mut names = npz.names().unwrap();
        names.sort();
        assert_eq!(names, vec!["test", "train"]);

        let train: Array1<i64> = npz.by_name("train").unwrap();
        assert_eq!(train.to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_raw_zip_entries_carry_a_single_npy_suffix() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path()).unwrap();
        let outer = OuterSplit::for_dataset(23).unwrap();
        store.write_outer(&outer).unwrap();
        store.write_inner(&outer.inner_splits()[4]).unwrap();

        // Zip entry names are stored verbatim in the local and central headers
        let contains = |haystack: &[u8], needle: &str| {
            haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
        };

        let outer_bytes = fs::read(store.outer_path()).unwrap();
        for key in ["train", "test"] {
            assert!(contains(&outer_bytes, &format!("{key}.npy")));
            assert!(!contains(&outer_bytes, &format!("{key}.npy.npy")));
        }

        let inner_bytes = fs::read(store.inner_path(4)).unwrap();
        for key in ["train_idx", "val_idx", "test_idx"] {
            assert!(contains(&inner_bytes, &format!("{key}.npy")));
            assert!(!contains(&inner_bytes, &format!("{key}.npy.npy")));
        }

        let fold = store.read_inner(4).unwrap();
        assert_eq!(fold.val_idx, vec![16, 17]);
        assert_eq!(fold.test_idx, (18..23).collect::<Vec<usize>>());
    }

    #[test]
    fn test_missing_archive_is_not_found() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::open(dir.path());
        assert!(store.read_inner(0).unwrap_err().is_not_found());
    }

    #[test]
    fn test_summary_roundtrip() {
        let dir   = tempdir().unwrap();
        let store = SplitStore::create(dir.path()).unwrap();
        let summary = SplitSummary {
            total_configurations: 5,
            units:                Units::BohrHartreeAut,
            seed:                 42,
            outer_train:          4,
            outer_test:           1,
            folds:                vec![FoldSizes { fold: 0, train: 3, val: 1, test: 1 }],
        };
        store.save_summary(&summary).unwrap();
        assert_eq!(store.load_summary().unwrap(), summary);
    }
}
