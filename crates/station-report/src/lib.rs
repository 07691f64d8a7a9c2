//! Chart composition and output artifacts.
//!
//! - **figure**: serializable interactive-chart document (data + layout)
//! - **palette**: per-month colors
//! - **chart**: [`ChartComposer`], twelve stacked month panels
//! - **writer**: [`ArtifactWriter`], HTML document plus optional JSON snapshot

pub mod chart;
pub mod error;
pub mod figure;
pub mod palette;
pub mod writer;

pub use chart::{ChartComposer, TIME_AXIS_ANCHOR};
pub use error::WriteError;
pub use figure::{Annotation, ChartSpec, Layout, Trace, XAxis, YAxis};
pub use palette::{MONTH_COLORS, month_color, translucent};
pub use writer::{ArtifactPaths, ArtifactWriter, PlotlyScript, render_html};
