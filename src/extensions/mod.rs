//! Contracts for host code observing the pipeline.

pub mod observers;

pub use observers::{PropertyChange, SeriesObserver, SeriesProperty};
