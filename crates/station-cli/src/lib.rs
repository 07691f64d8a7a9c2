//! Library side of the station plotter CLI: logging setup and the staged
//! pipeline, shared by the binary and the integration tests.

pub mod logging;
pub mod pipeline;
pub mod types;
