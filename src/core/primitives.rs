use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

/// Converts a decimal model value, failing the mapping when it has no `f64`
/// representation.
pub fn decimal_to_f64(value: Decimal, index: usize) -> ChartResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| ChartError::mapping(index, format!("{value} cannot be represented as f64")))
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}
