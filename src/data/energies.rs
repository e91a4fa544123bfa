// ============================================================
// Layer 4 — Energy Tables
// ============================================================
// Two plain-text tables written alongside a Turbomole MD run:
//
//   energies.txt   — produced by `log2egy > energies.txt`
//                    columns: t  E_kin  E_tot  E_pot  <unused>  T
//   ex_energies    — per-step excitation energies
//                    columns: S0  S1-S0  S2-S0
//
// Both are whitespace separated with comment lines. The
// excitation energies are stored relative to the ground state
// and are converted to absolute values here.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::WorkflowError;

/// One row of `energies.txt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRow {
    pub time:        f64,
    pub kinetic:     f64,
    pub total:       f64,
    pub potential:   f64,
    pub temperature: f64,
}

/// Absolute ground and first two excited state energies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateEnergies {
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
}

/// Parse the whitespace table at `path`. Everything from the first
/// of `comment_prefixes` to the end of a line is a comment, and lines
/// left empty are skipped.
/// Returns the parsed numeric rows together with their 1-based line numbers.
fn read_table(
    path:             &Path,
    what:             &str,
    comment_prefixes: &[char],
) -> Result<Vec<(usize, Vec<f64>)>, WorkflowError> {
    if !path.is_file() {
        return Err(WorkflowError::not_found(what, path));
    }

    let text = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let content = line.split(comment_prefixes).next().unwrap_or("");
        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        let values = trimmed
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| parse_error(path, i + 1, format!("not a number: {e}")))?;
        rows.push((i + 1, values));
    }

    Ok(rows)
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> WorkflowError {
    WorkflowError::Parse {
        path: PathBuf::from(path),
        line,
        reason: reason.into(),
    }
}

/// Load `energies.txt`, keeping columns 0, 1, 2, 3 and 5.
pub fn load_energies(path: &Path) -> Result<Vec<EnergyRow>, WorkflowError> {
    let table = read_table(path, "energies file (use `log2egy > energies.txt` to create it)", &['#'])?;

    table
        .into_iter()
        .map(|(line, v)| {
            if v.len() < 6 {
                return Err(parse_error(
                    path,
                    line,
                    format!("expected at least 6 columns, found {}", v.len()),
                ));
            }
            Ok(EnergyRow {
                time:        v[0],
                kinetic:     v[1],
                total:       v[2],
                potential:   v[3],
                temperature: v[5],
            })
        })
        .collect()
}

/// Load `ex_energies` and convert the relative excitation energies
/// (S0, S1-S0, S2-S0) into absolute state energies.
pub fn load_state_energies(path: &Path) -> Result<Vec<StateEnergies>, WorkflowError> {
    let table = read_table(path, "excitation energies file", &['#', '$'])?;

    table
        .into_iter()
        .map(|(line, v)| match v.as_slice() {
            [s0, d1, d2, ..] => Ok(StateEnergies {
                s0: *s0,
                s1: s0 + d1,
                s2: s0 + d2,
            }),
            _ => Err(parse_error(
                path,
                line,
                format!("expected 3 columns (S0, S1-S0, S2-S0), found {}", v.len()),
            )),
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::tempdir;

    #[test]
    fn test_energies_keep_selected_columns() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("energies.txt");
        fs::write(
            &path,
            "# t  E_kin  E_tot  E_pot  x  T\n\
             0.0  0.01  -10.5  -10.51  9.9  300.0\n\
             \n\
             1.0  0.02  -10.5  -10.52  9.9  301.5\n",
        )
        .unwrap();

        let rows = load_energies(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[1].time, 1.0);
        assert_relative_eq!(rows[1].potential, -10.52);
        assert_relative_eq!(rows[1].temperature, 301.5);
    }

    #[test]
    fn test_trailing_comments_are_ignored() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("energies.txt");
        fs::write(
            &path,
            "0.0  0.01  -10.5  -10.51  9.9  300.0  # step 0\n\
             1.0  0.02  -10.5  -10.52  9.9  301.5#restart\n",
        )
        .unwrap();

        let rows = load_energies(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_relative_eq!(rows[0].temperature, 300.0);
        assert_relative_eq!(rows[1].temperature, 301.5);

        let states = dir.path().join("ex_energies");
        fs::write(&states, "$ex_energies\n-100.0 0.25 0.5 # hop\n$end\n").unwrap();
        let states = load_state_energies(&states).unwrap();
        assert_eq!(states.len(), 1);
        assert_relative_eq!(states[0].s2, -99.5);
    }

    #[test]
    fn test_short_energy_row_reports_line() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("energies.txt");
        fs::write(&path, "0.0 0.1 0.2 0.3 0.4 0.5\n1.0 0.1 0.2\n").unwrap();

        match load_energies(&path).unwrap_err() {
            WorkflowError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_energies_mentions_log2egy() {
        let dir = tempdir().unwrap();
        let err = load_energies(&dir.path().join("energies.txt")).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("log2egy"));
    }

    #[test]
    fn test_excitations_become_absolute() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("ex_energies");
        fs::write(&path, "$ex_energies\n-100.0  0.25  0.5\n-100.5  0.3  0.45\n$end\n").unwrap();

        let states = load_state_energies(&path).unwrap();
        assert_eq!(states.len(), 2);
        assert_relative_eq!(states[0].s1, -99.75);
        assert_relative_eq!(states[1].s2, -100.05);
        assert_relative_eq!(states[1].s0, -100.5);
    }

    #[test]
    fn test_garbage_in_excitations_is_a_parse_error() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("ex_energies");
        fs::write(&path, "-100.0 abc 0.5\n").unwrap();

        assert!(matches!(
            load_state_energies(&path).unwrap_err(),
            WorkflowError::Parse { line: 1, .. }
        ));
    }
}
