use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Location, Margin, Size};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentAxis {
    Horizontal,
    Vertical,
}

impl fmt::Display for AlignmentAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    /// Straddles the point.
    Centered,
    /// Ends `margin.left` to the left of the point.
    Left,
    /// Starts `margin.right` to the right of the point.
    Right,
    /// Straddles the midpoint between the point and the limit.
    Between,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlignment {
    Centered,
    /// Ends `margin.top` above the point.
    Top,
    /// Starts `margin.bottom` below the point.
    Bottom,
    Between,
}

impl FromStr for HorizontalAlignment {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "centered" | "center" => Ok(Self::Centered),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "between" => Ok(Self::Between),
            _ => Err(ChartError::InvalidAlignment {
                axis: AlignmentAxis::Horizontal,
                value: value.to_owned(),
            }),
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "centered" | "center" => Ok(Self::Centered),
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "between" => Ok(Self::Between),
            _ => Err(ChartError::InvalidAlignment {
                axis: AlignmentAxis::Vertical,
                value: value.to_owned(),
            }),
        }
    }
}

impl TryFrom<i32> for HorizontalAlignment {
    type Error = ChartError;

    fn try_from(raw: i32) -> ChartResult<Self> {
        match raw {
            0 => Ok(Self::Centered),
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            3 => Ok(Self::Between),
            _ => Err(ChartError::InvalidAlignment {
                axis: AlignmentAxis::Horizontal,
                value: raw.to_string(),
            }),
        }
    }
}

impl TryFrom<i32> for VerticalAlignment {
    type Error = ChartError;

    fn try_from(raw: i32) -> ChartResult<Self> {
        match raw {
            0 => Ok(Self::Centered),
            1 => Ok(Self::Top),
            2 => Ok(Self::Bottom),
            3 => Ok(Self::Between),
            _ => Err(ChartError::InvalidAlignment {
                axis: AlignmentAxis::Vertical,
                value: raw.to_string(),
            }),
        }
    }
}

/// Rotation and alignment of a label relative to its point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelLayout {
    /// Clockwise rotation in degrees.
    pub rotation_degrees: f64,
    pub horizontal: HorizontalAlignment,
    pub vertical: VerticalAlignment,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            horizontal: HorizontalAlignment::Centered,
            vertical: VerticalAlignment::Centered,
        }
    }
}

impl LabelLayout {
    #[must_use]
    pub fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            rotation_degrees: 0.0,
            horizontal,
            vertical,
        }
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation_degrees: f64) -> Self {
        self.rotation_degrees = rotation_degrees;
        self
    }
}

/// Extents of a `size` box once rotated by `rotation_degrees`.
#[must_use]
pub fn rotated_extent(size: Size, rotation_degrees: f64) -> Size {
    let radians = rotation_degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    Size::new(
        cos * size.width + sin * size.height,
        cos * size.height + sin * size.width,
    )
}

/// Top-left corner of a label of `label_size` placed around `point`.
///
/// `limit` is the far end used by the `Between` alignments, typically the
/// axis crossing the point's bar or the previous point.
#[must_use]
pub fn place_label(
    point: Location,
    margin: Margin,
    limit: Location,
    label_size: Size,
    layout: LabelLayout,
) -> Location {
    let extent = rotated_extent(label_size, layout.rotation_degrees);
    let (w, h) = (extent.width, extent.height);

    let x = match layout.horizontal {
        HorizontalAlignment::Centered => point.x - w * 0.5,
        HorizontalAlignment::Left => point.x - margin.left - w,
        HorizontalAlignment::Right => point.x + margin.right,
        HorizontalAlignment::Between => (point.x + limit.x) * 0.5 - w * 0.5,
    };
    let y = match layout.vertical {
        VerticalAlignment::Centered => point.y - h * 0.5,
        VerticalAlignment::Top => point.y - margin.top - h,
        VerticalAlignment::Bottom => point.y + margin.bottom,
        VerticalAlignment::Between => (point.y + limit.y) * 0.5 - h * 0.5,
    };

    Location::new(x, y)
}

/// Same as [`place_label`] but with alignments still in their raw textual
/// form, as read from host configuration.
pub fn place_label_from_config(
    point: Location,
    margin: Margin,
    limit: Location,
    label_size: Size,
    rotation_degrees: f64,
    horizontal: &str,
    vertical: &str,
) -> ChartResult<Location> {
    let layout = LabelLayout {
        rotation_degrees,
        horizontal: horizontal.parse()?,
        vertical: vertical.parse()?,
    };
    Ok(place_label(point, margin, limit, label_size, layout))
}
