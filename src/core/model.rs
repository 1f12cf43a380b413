use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable identity of a model instance with reference semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelKey(usize);

impl ModelKey {
    #[must_use]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self(ptr.cast::<()>() as usize)
    }
}

/// Element type accepted by a series items source.
///
/// Models with reference semantics (`Rc<T>`, `Arc<T>`, or user handles)
/// report an identity so their points, and the views attached to them, follow
/// the instance across fetches. Value models return `None` and are matched by
/// position instead.
pub trait SeriesModel: Clone + 'static {
    fn identity(&self) -> Option<ModelKey> {
        None
    }
}

impl<T: 'static> SeriesModel for Rc<T> {
    fn identity(&self) -> Option<ModelKey> {
        Some(ModelKey::from_ptr(Rc::as_ptr(self)))
    }
}

impl<T: 'static> SeriesModel for Arc<T> {
    fn identity(&self) -> Option<ModelKey> {
        Some(ModelKey::from_ptr(Arc::as_ptr(self)))
    }
}

macro_rules! value_models {
    ($($ty:ty),* $(,)?) => {
        $(impl SeriesModel for $ty {})*
    };
}

value_models!(
    f64,
    f32,
    i32,
    i64,
    u32,
    Decimal,
    ObservableValue,
    ObservablePoint,
    WeightedPoint,
    DateTimePoint,
    FinancialPoint,
);

/// Scalar value plotted against its index; `None` leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservableValue {
    pub value: Option<f64>,
}

impl ObservableValue {
    #[must_use]
    pub fn new(value: impl Into<Option<f64>>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservablePoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl ObservablePoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

impl WeightedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateTimePoint {
    pub time: DateTime<Utc>,
    pub value: Option<f64>,
}

impl DateTimePoint {
    #[must_use]
    pub fn new(time: DateTime<Utc>, value: impl Into<Option<f64>>) -> Self {
        Self {
            time,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialPoint {
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl FinancialPoint {
    #[must_use]
    pub fn new(time: DateTime<Utc>, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }
}
