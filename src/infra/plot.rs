// ============================================================
// Layer 6 — Interactive Line Plots
// ============================================================
// Writes an HTML page holding a plotly figure. The figure
// itself is plain JSON built with serde_json; the browser runs
// plotly.js and does the rendering. plotly.js is either linked
// from its CDN or embedded from a local copy, which makes the
// page work offline.
//
// One line trace per series, all sharing the same x values.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::errors::WorkflowError;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// How the page gets hold of plotly.js
#[derive(Debug, Clone)]
pub enum PlotlyScript {
    Cdn,
    /// Source of plotly.js, embedded into the page
    Inline(String),
}

impl PlotlyScript {
    /// Embed the plotly.js bundle at `path`.
    pub fn from_file(path: &Path) -> Result<Self, WorkflowError> {
        if !path.is_file() {
            return Err(WorkflowError::not_found("plotly.js bundle", path));
        }
        Ok(Self::Inline(fs::read_to_string(path)?))
    }

    fn tag(&self) -> String {
        match self {
            Self::Cdn            => format!("<script src=\"{PLOTLY_CDN}\"></script>"),
            Self::Inline(source) => {
                format!("<script>\n{}\n</script>", source.replace("</script", "<\\/script"))
            }
        }
    }
}

/// One named line of the figure
#[derive(Debug, Clone)]
pub struct Series {
    pub name:   String,
    pub values: Vec<f64>,
}

/// A line figure over a shared x axis
#[derive(Debug, Clone)]
pub struct LineFigure {
    pub title:   String,
    pub x_title: String,
    pub y_title: String,
    pub x:       Vec<usize>,
    pub series:  Vec<Series>,
}

impl LineFigure {
    /// The figure in plotly's `{data, layout}` form
    pub fn to_plotly(&self) -> Value {
        let data: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": s.name,
                    "x":    self.x,
                    "y":    s.values,
                })
            })
            .collect();

        json!({
            "data": data,
            "layout": {
                "updatemenus": [{
                    "active": 0,
                    "x": 0.0,
                    "y": 1.15,
                    "xanchor": "left",
                    "yanchor": "top",
                    "direction": "down",
                    "pad": {"r": 10, "t": 10},
                    "showactive": true,
                }],
                "title": {
                    "text": self.title,
                    "x": 0.5,
                    "xanchor": "center",
                },
                "xaxis": {"title": {"text": self.x_title}},
                "yaxis": {"title": {"text": self.y_title}},
            }
        })
    }

    /// Render the HTML page
    pub fn to_html(&self, plotly: &PlotlyScript) -> Result<String> {
        // `</` inside a script block would end it early
        let figure = serde_json::to_string(&self.to_plotly())?.replace("</", "<\\/");

        Ok(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>{title}</title>\n\
             {script}\n\
             </head>\n\
             <body>\n\
             <div id=\"figure\" style=\"width:100%;height:95vh;\"></div>\n\
             <script>\n\
             const figure = {figure};\n\
             Plotly.newPlot(\"figure\", figure.data, figure.layout);\n\
             </script>\n\
             </body>\n\
             </html>\n",
            title  = escape_html(&self.title),
            script = plotly.tag(),
        ))
    }

    /// Write the HTML page to `path`
    pub fn write_html(&self, path: &Path, plotly: &PlotlyScript) -> Result<()> {
        fs::write(path, self.to_html(plotly)?)
            .with_context(|| format!("Cannot write plot to '{}'", path.display()))
    }
}

/// `E_pot active state` → `E pot active state`, `E_KIN` → `E kin`
pub fn series_label(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None        => String::new(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
