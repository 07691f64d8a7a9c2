//! Output artifacts: a standalone interactive HTML document and, on request,
//! the same chart as a JSON snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use station_model::OutputOptions;
use tracing::info;

use crate::error::WriteError;
use crate::figure::ChartSpec;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Where the page loads plotly.js from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotlyScript<'a> {
    /// Link the pinned CDN build; the page needs network access.
    Cdn,
    /// Embed this bundle so the page works offline.
    Inline(&'a str),
}

/// Paths written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub html: PathBuf,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output: OutputOptions,
}

impl ArtifactWriter {
    pub fn new(output: OutputOptions) -> Self {
        Self { output }
    }

    /// Paths a write would produce.
    pub fn planned_paths(&self) -> ArtifactPaths {
        ArtifactPaths {
            html: self.output.html_path(),
            snapshot: self.output.snapshot.then(|| self.output.snapshot_path()),
        }
    }

    pub fn write(&self, chart: &ChartSpec) -> Result<ArtifactPaths, WriteError> {
        let paths = self.planned_paths();

        let bundle = match &self.output.plotly_js {
            Some(path) => Some(fs::read_to_string(path).map_err(|source| {
                WriteError::Bundle {
                    path: path.clone(),
                    source,
                }
            })?),
            None => None,
        };
        let script = bundle.as_deref().map_or(PlotlyScript::Cdn, PlotlyScript::Inline);

        let html = render_html(chart, script).map_err(|source| WriteError::Serialize {
            path: paths.html.clone(),
            source,
        })?;
        write_file(&paths.html, &html)?;
        info!(path = %paths.html.display(), bytes = html.len(), "chart document written");

        if let Some(snapshot) = &paths.snapshot {
            let json =
                serde_json::to_string_pretty(chart).map_err(|source| WriteError::Serialize {
                    path: snapshot.clone(),
                    source,
                })?;
            write_file(snapshot, &json)?;
            info!(path = %snapshot.display(), bytes = json.len(), "chart snapshot written");
        }

        Ok(paths)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), WriteError> {
    let io_error = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

/// Page that draws `chart` with plotly.js, linked or inlined per `script`.
pub fn render_html(
    chart: &ChartSpec,
    script: PlotlyScript<'_>,
) -> Result<String, serde_json::Error> {
    // `</` inside the inline script would end it early.
    let spec = serde_json::to_string(chart)?.replace("</", "<\\/");
    let plotly = match script {
        PlotlyScript::Cdn => format!(r#"<script src="{PLOTLY_CDN}" charset="utf-8"></script>"#),
        PlotlyScript::Inline(bundle) => {
            format!("<script>\n{}\n</script>", bundle.replace("</script", "<\\/script"))
        }
    };
    let title = escape_html(&chart.layout.title.text);
    let height = chart.layout.height;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
{plotly}
</head>
<body>
<div id="chart" style="width:100%;height:{height}px;"></div>
<script>
const spec = {spec};
Plotly.newPlot("chart", spec.data, spec.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
