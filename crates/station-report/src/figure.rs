//! Serializable chart document.
//!
//! Field names follow the plotly.js figure schema so the JSON can be handed
//! to `Plotly.newPlot` unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full chart: traces plus layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl ChartSpec {
    /// Traces drawn against one vertical axis (`"y"`, `"y2"`, ...).
    pub fn traces_on<'a>(&'a self, axis_ref: &'a str) -> impl Iterator<Item = &'a Trace> + 'a {
        self.data.iter().filter(move |trace| trace.yaxis == axis_ref)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<f64>,
    pub yaxis: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    pub hoverinfo: String,
    pub showlegend: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub traceorder: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
    pub range: [String; 2],
}

/// Shared time-of-day axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    #[serde(rename = "type")]
    pub kind: String,
    pub range: [String; 2],
    pub autorange: bool,
    pub tickformat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

/// One month's vertical axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    #[serde(rename = "type")]
    pub kind: String,
    pub anchor: String,
    pub domain: [f64; 2],
    pub side: String,
    pub mirror: bool,
    pub showline: bool,
    pub zeroline: bool,
    pub linecolor: String,
    pub tickfont: Font,
    pub title: Title,
    pub autorange: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub x: String,
    pub y: f64,
    pub xref: String,
    pub yref: String,
    pub text: String,
    pub showarrow: bool,
    pub xanchor: String,
    pub yanchor: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    pub template: String,
    pub margin: Margin,
    pub dragmode: String,
    pub hovermode: String,
    pub showlegend: bool,
    pub legend: Legend,
    pub xaxis: XAxis,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// `yaxis`, `yaxis2`, ... `yaxis12`, flattened into the layout object.
    #[serde(flatten)]
    pub yaxes: BTreeMap<String, YAxis>,
}

impl Layout {
    pub fn yaxis(&self, key: &str) -> Option<&YAxis> {
        self.yaxes.get(key)
    }
}
