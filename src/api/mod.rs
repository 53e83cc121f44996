//! Output surfaces of the engine
//!
//! Map overlay geometry and the text, JSON, CSV and history formatters used
//! by the command-line front end.

pub mod formatting;
pub mod overlay;

pub use formatting::{
    CsvFormatter, EstimateFormatter, EstimateReport, HistoryFormatter, JsonFormatter,
    OutputFormat, TextFormatter,
};
pub use overlay::{build_overlay, BearingRay, Bounds, Overlay};
