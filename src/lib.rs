//! series-pipeline: framework-agnostic series data pipeline for charts.
//!
//! Model collections are mapped to coordinates, wrapped in identity-tracked
//! points and folded into per-dimension axis ranges once per chart update
//! pass. Rendering stays with the host, which receives points and hands
//! views back through [`render::ViewContext`].

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{CartesianChart, CartesianChartConfig, ChartSeries, ItemsSource, Series};
pub use error::{ChartError, ChartResult};
