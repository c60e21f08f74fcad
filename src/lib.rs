//! chart-marks: a headless, data-driven chart pipeline.
//!
//! Raw JSON datasets are normalized into `DataPoint`s, scales are derived
//! from their extents, and marks are built with a back-reference to the point
//! they encode. Marks become a backend-agnostic `RenderFrame` mounted on a
//! `DrawingSurface`, and a single delegated pointer overlay maps pointer
//! events back to data for tooltips.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, ChartDataset, ChartKind, ChartRenderer, RenderSession};
pub use error::{ChartError, ChartResult};
