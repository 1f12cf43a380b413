use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

use crate::core::DataRange;

/// N-dimensional numeric position of a model on the chart.
///
/// Implementations decide how their scalar components fold into a
/// [`DataRange`]; the default folds component `i` into dimension `i`.
pub trait Coordinate: Clone + std::fmt::Debug + 'static {
    /// Number of range dimensions this coordinate contributes to.
    const DIMENSIONS: usize;

    /// Scalar components in dimension order.
    fn components(&self) -> SmallVec<[f64; 4]>;

    /// Gap marker: empty coordinates produce points but never widen ranges.
    fn is_empty(&self) -> bool {
        false
    }

    fn fold_into(&self, range: &mut DataRange) {
        if self.is_empty() {
            return;
        }
        for (dimension, value) in self.components().into_iter().enumerate() {
            range.fold(dimension, value);
        }
    }
}

/// Secondary (x) and primary (y) values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCoordinate {
    pub secondary: f64,
    pub primary: f64,
}

impl PointCoordinate {
    #[must_use]
    pub const fn new(secondary: f64, primary: f64) -> Self {
        Self { secondary, primary }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            secondary: f64::NAN,
            primary: f64::NAN,
        }
    }
}

impl Coordinate for PointCoordinate {
    const DIMENSIONS: usize = 2;

    fn components(&self) -> SmallVec<[f64; 4]> {
        smallvec![self.secondary, self.primary]
    }

    fn is_empty(&self) -> bool {
        self.secondary.is_nan() || self.primary.is_nan()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedCoordinate {
    pub secondary: f64,
    pub primary: f64,
    pub tertiary: f64,
}

impl WeightedCoordinate {
    #[must_use]
    pub const fn new(secondary: f64, primary: f64, tertiary: f64) -> Self {
        Self {
            secondary,
            primary,
            tertiary,
        }
    }
}

impl Coordinate for WeightedCoordinate {
    const DIMENSIONS: usize = 3;

    fn components(&self) -> SmallVec<[f64; 4]> {
        smallvec![self.secondary, self.primary, self.tertiary]
    }

    fn is_empty(&self) -> bool {
        self.secondary.is_nan() || self.primary.is_nan()
    }
}

/// Open/high/low/close sample positioned at `secondary`.
///
/// All four prices land in the primary dimension so axis ranges cover the
/// full wick of every bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialCoordinate {
    pub secondary: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl FinancialCoordinate {
    #[must_use]
    pub const fn new(secondary: f64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            secondary,
            open,
            high,
            low,
            close,
        }
    }
}

impl Coordinate for FinancialCoordinate {
    const DIMENSIONS: usize = 2;

    fn components(&self) -> SmallVec<[f64; 4]> {
        smallvec![self.secondary, self.open, self.high, self.low, self.close]
    }

    fn is_empty(&self) -> bool {
        self.secondary.is_nan()
    }

    fn fold_into(&self, range: &mut DataRange) {
        if self.is_empty() {
            return;
        }
        range.fold(0, self.secondary);
        for price in [self.high, self.low, self.open, self.close] {
            range.fold(1, price);
        }
    }
}
