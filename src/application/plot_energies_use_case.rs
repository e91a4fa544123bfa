// ============================================================
// Layer 2 — PlotEnergiesUseCase
// ============================================================
// Plots the energies of a Turbomole MD run over time:
//
//   Step 1: Load energies.txt       (t, E_kin, E_tot, E_pot, T)
//   Step 2: Load ex_energies        (S0, S1, S2, made absolute)
//   Step 3: Keep the first nr_of_configs rows (negative = all)
//   Step 4: Write energies_<trajectory>.html into the plot dir,
//           embedding a local plotly.js when one is given

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::energies::{load_energies, load_state_energies};
use crate::infra::layout::DataLayout;
use crate::infra::plot::{series_label, LineFigure, PlotlyScript, Series};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotEnergiesConfig {
    pub data_prefix:    PathBuf,
    pub trajectory_dir: String,
    /// Negative means every available configuration
    pub nr_of_configs:  i64,
    pub plot_dir:       PathBuf,
    /// Embedded into the page when set, otherwise plotly.js comes from its CDN
    pub plotly_js:      Option<PathBuf>,
}

impl Default for PlotEnergiesConfig {
    fn default() -> Self {
        Self {
            data_prefix:    PathBuf::from("data"),
            trajectory_dir: "PREPARE_12/GEO_100000/test".to_string(),
            nr_of_configs:  -1,
            plot_dir:       PathBuf::from("plots"),
            plotly_js:      None,
        }
    }
}

pub struct PlotEnergiesUseCase {
    config: PlotEnergiesConfig,
}

impl PlotEnergiesUseCase {
    pub fn new(config: PlotEnergiesConfig) -> Self {
        Self { config }
    }

    /// Build the figure and write it. Returns the HTML path.
    pub fn execute(&self) -> Result<PathBuf> {
        let cfg = &self.config;

        fs::create_dir_all(&cfg.plot_dir)
            .with_context(|| format!("Cannot create plot dir '{}'", cfg.plot_dir.display()))?;
        let run_dir = DataLayout::new(&cfg.data_prefix).trajectory_dir(&cfg.trajectory_dir);

        // ── Step 1: Energies ─────────────────────────────────────────────────
        let energies_path = run_dir.join("energies.txt");
        let energies = load_energies(&energies_path)?;
        tracing::info!(
            "Loaded energies from {}, shape: ({}, 5)",
            energies_path.display(),
            energies.len()
        );
        tracing::debug!("First 5 rows of energies: {:?}", &energies[..energies.len().min(5)]);

        // ── Step 2: Excited state energies ───────────────────────────────────
        let states_path = run_dir.join("ex_energies");
        let states = load_state_energies(&states_path)?;
        tracing::info!(
            "Loaded potential energies from {}, shape: ({}, 3)",
            states_path.display(),
            states.len()
        );

        // ── Step 3: Limit the number of configurations ───────────────────────
        let count = resolve_count(cfg.nr_of_configs, energies.len());
        if states.len() < count {
            tracing::warn!(
                "ex_energies has {} rows, fewer than the {} plotted configurations",
                states.len(),
                count
            );
        }
        let energies = &energies[..count];
        let states   = &states[..states.len().min(count)];

        // ── Step 4: Figure ───────────────────────────────────────────────────
        let columns: Vec<(&str, Vec<f64>)> = vec![
            ("E_kin",              energies.iter().map(|r| r.kinetic).collect()),
            ("E_tot",              energies.iter().map(|r| r.total).collect()),
            ("E_pot active state", energies.iter().map(|r| r.potential).collect()),
            ("T",                  energies.iter().map(|r| r.temperature).collect()),
            ("S0",                 states.iter().map(|s| s.s0).collect()),
            ("S1",                 states.iter().map(|s| s.s1).collect()),
            ("S2",                 states.iter().map(|s| s.s2).collect()),
        ];

        let figure = LineFigure {
            title:   format!("Energies over Time for {}", cfg.trajectory_dir),
            x_title: "Configuration Index".to_string(),
            y_title: "Energy [Hartree]".to_string(),
            x:       (0..count).collect(),
            series:  columns
                .into_iter()
                .map(|(key, values)| Series { name: series_label(key), values })
                .collect(),
        };

        let plotly = match &cfg.plotly_js {
            Some(bundle) => PlotlyScript::from_file(bundle)?,
            None         => PlotlyScript::Cdn,
        };

        let path = cfg.plot_dir.join(plot_file_name(&cfg.trajectory_dir));
        figure.write_html(&path, &plotly)?;
        tracing::info!("Plot saved to {}", path.display());

        Ok(path)
    }
}

/// `PREPARE_12/GEO_100000/test` → `energies_PREPARE_12_GEO_100000_test.html`
pub fn plot_file_name(trajectory_dir: &str) -> String {
    format!("energies_{}.html", trajectory_dir.replace('/', "_"))
}

/// Clamp the requested number of configurations to what is available.
fn resolve_count(requested: i64, available: usize) -> usize {
    match usize::try_from(requested) {
        Err(_) => {
            tracing::info!("Using all available configurations.");
            available
        }
        Ok(n) if n > available => {
            tracing::warn!(
                "Requested {} configurations, but only {} are available. Using all available configurations.",
                n,
                available
            );
            available
        }
        Ok(n) => n,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn seed_run(prefix: &Path, trajectory_dir: &str, rows: usize) {
        let run_dir = prefix.join(trajectory_dir);
        fs::create_dir_all(&run_dir).unwrap();

        let mut energies = String::from("# t E_kin E_tot E_pot x T\n");
        let mut states   = String::from("$ex_energies\n");
        for i in 0..rows {
            let t = i as f64;
            energies.push_str(&format!("{t} 0.01 -10.0 -10.01 0.0 {}\n", 300.0 + t));
            states.push_str(&format!("-10.0 0.1{i} 0.2{i}\n"));
        }
        fs::write(run_dir.join("energies.txt"), energies).unwrap();
        fs::write(run_dir.join("ex_energies"), states).unwrap();
    }

    fn config(prefix: &Path, nr_of_configs: i64) -> PlotEnergiesConfig {
        PlotEnergiesConfig {
            data_prefix:    prefix.to_path_buf(),
            trajectory_dir: "PREPARE_12/GEO_100000/test".to_string(),
            nr_of_configs,
            plot_dir:       prefix.join("plots"),
            plotly_js:      None,
        }
    }

    fn trace_lengths(html: &str) -> Vec<usize> {
        let start = html.find("const figure = ").unwrap() + "const figure = ".len();
        let end   = start + html[start..].find(";\n").unwrap();
        let fig: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
        fig["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["y"].as_array().unwrap().len())
            .collect()
    }

    #[test]
    fn test_file_name_flattens_directories() {
        assert_eq!(
            plot_file_name("PREPARE_12/GEO_100000/test"),
            "energies_PREPARE_12_GEO_100000_test.html"
        );
    }

    #[test]
    fn test_resolve_count() {
        assert_eq!(resolve_count(-1, 7), 7);
        assert_eq!(resolve_count(100, 7), 7);
        assert_eq!(resolve_count(3, 7), 3);
        assert_eq!(resolve_count(0, 7), 0);
    }

    #[test]
    fn test_plot_all_configurations() {
        let dir = tempdir().unwrap();
        seed_run(dir.path(), "PREPARE_12/GEO_100000/test", 6);

        let path = PlotEnergiesUseCase::new(config(dir.path(), -1)).execute().unwrap();
        assert!(path.ends_with("energies_PREPARE_12_GEO_100000_test.html"));

        let html = fs::read_to_string(&path).unwrap();
        assert_eq!(trace_lengths(&html), vec![6; 7]);
        assert!(html.contains("E pot active state"));
    }

    #[test]
    fn test_plot_truncates_to_requested() {
        let dir = tempdir().unwrap();
        seed_run(dir.path(), "PREPARE_12/GEO_100000/test", 6);

        let path = PlotEnergiesUseCase::new(config(dir.path(), 4)).execute().unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert_eq!(trace_lengths(&html), vec![4; 7]);
    }

    #[test]
    fn test_plot_embeds_local_plotly() {
        let dir = tempdir().unwrap();
        seed_run(dir.path(), "PREPARE_12/GEO_100000/test", 3);
        let bundle = dir.path().join("plotly.min.js");
        fs::write(&bundle, "window.Plotly = { offline: true };").unwrap();

        let mut cfg = config(dir.path(), -1);
        cfg.plotly_js = Some(bundle);
        let path = PlotEnergiesUseCase::new(cfg).execute().unwrap();

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("window.Plotly = { offline: true };"));
        assert!(!html.contains("cdn.plot.ly"));
        assert_eq!(trace_lengths(&html), vec![3; 7]);
    }

    #[test]
    fn test_missing_energies_is_not_found() {
        let dir = tempdir().unwrap();
        let err = PlotEnergiesUseCase::new(config(dir.path(), -1)).execute().unwrap_err();

        let kind = err.downcast_ref::<crate::errors::WorkflowError>().unwrap();
        assert!(kind.is_not_found());
    }
}
