use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Running `[min, max]` bounds of one dimension.
///
/// The identity element is `[+inf, -inf]`; folding any finite value into it
/// yields `[value, value]`. Non-finite values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Expands the bounds monotonically to include `value`.
    pub fn expand(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `true` while nothing has been folded in.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.min > self.max
    }

    /// `max - min`, or `0.0` for empty bounds.
    #[must_use]
    pub fn delta(self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max - self.min
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Per-dimension bounds accumulated by a fetch.
///
/// Dimension `0` is the secondary (x) axis, `1` the primary (y) axis and `2`
/// the tertiary (weight) axis when a coordinate carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    dimensions: SmallVec<[Bounds; 3]>,
}

impl DataRange {
    #[must_use]
    pub fn new(dimension_count: usize) -> Self {
        Self {
            dimensions: SmallVec::from_elem(Bounds::EMPTY, dimension_count),
        }
    }

    /// Re-seeds every dimension to the identity element.
    pub fn reset(&mut self) {
        for bounds in &mut self.dimensions {
            *bounds = Bounds::EMPTY;
        }
    }

    /// Folds `value` into `dimension`, growing the range if needed.
    pub fn fold(&mut self, dimension: usize, value: f64) {
        if dimension >= self.dimensions.len() {
            self.dimensions.resize(dimension + 1, Bounds::EMPTY);
        }
        self.dimensions[dimension].expand(value);
    }

    #[must_use]
    pub fn dimension(&self, dimension: usize) -> Bounds {
        self.dimensions
            .get(dimension)
            .copied()
            .unwrap_or(Bounds::EMPTY)
    }

    #[must_use]
    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    #[must_use]
    pub fn secondary(&self) -> Bounds {
        self.dimension(0)
    }

    #[must_use]
    pub fn primary(&self) -> Bounds {
        self.dimension(1)
    }

    #[must_use]
    pub fn tertiary(&self) -> Bounds {
        self.dimension(2)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.iter().all(|bounds| bounds.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = Bounds> + '_ {
        self.dimensions.iter().copied()
    }
}
