use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{HorizontalAlignment, LabelLayout, VerticalAlignment};
use crate::error::{ChartError, ChartResult};
use crate::render::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Circle,
    Square,
    Diamond,
    Triangle,
    Cross,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
    pub bold: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_owned(),
            size_px: 12.0,
            bold: false,
        }
    }
}

/// Where data labels sit relative to their point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLabelsPosition {
    Top,
    Bottom,
    Left,
    Right,
    Middle,
    /// Halfway between the point and the series pivot.
    Between,
}

impl DataLabelsPosition {
    /// Alignment pair fed to [`crate::core::place_label`].
    #[must_use]
    pub fn alignments(self) -> (HorizontalAlignment, VerticalAlignment) {
        match self {
            Self::Top => (HorizontalAlignment::Centered, VerticalAlignment::Top),
            Self::Bottom => (HorizontalAlignment::Centered, VerticalAlignment::Bottom),
            Self::Left => (HorizontalAlignment::Left, VerticalAlignment::Centered),
            Self::Right => (HorizontalAlignment::Right, VerticalAlignment::Centered),
            Self::Middle => (HorizontalAlignment::Centered, VerticalAlignment::Centered),
            Self::Between => (HorizontalAlignment::Between, VerticalAlignment::Between),
        }
    }
}

impl FromStr for DataLabelsPosition {
    type Err = ChartError;

    fn from_str(value: &str) -> ChartResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "middle" => Ok(Self::Middle),
            "between" => Ok(Self::Between),
            _ => Err(ChartError::InvalidPosition {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLabelsConfig {
    #[serde(default)]
    pub visible: bool,
    #[serde(default = "default_data_labels_position")]
    pub position: DataLabelsPosition,
    #[serde(default)]
    pub rotation_degrees: f64,
    #[serde(default)]
    pub font: FontSpec,
}

impl Default for DataLabelsConfig {
    fn default() -> Self {
        Self {
            visible: false,
            position: default_data_labels_position(),
            rotation_degrees: 0.0,
            font: FontSpec::default(),
        }
    }
}

impl DataLabelsConfig {
    #[must_use]
    pub fn layout(&self) -> LabelLayout {
        let (horizontal, vertical) = self.position.alignments();
        LabelLayout::new(horizontal, vertical).with_rotation(self.rotation_degrees)
    }
}

/// Visual and placement settings of a series.
///
/// Serializable so hosts can persist series setup next to their own state.
/// `stroke`/`fill` left as `None` are drawn from the chart palette on the
/// first fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub scales_x_at: usize,
    #[serde(default)]
    pub scales_y_at: usize,
    #[serde(default)]
    pub stroke: Option<Color>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default = "default_stroke_thickness")]
    pub stroke_thickness: f64,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default = "default_fill_opacity")]
    pub default_fill_opacity: f64,
    #[serde(default = "default_geometry")]
    pub geometry: GeometryKind,
    #[serde(default = "default_geometry_size")]
    pub geometry_size: f64,
    #[serde(default)]
    pub data_labels: DataLabelsConfig,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            name: None,
            visible: default_visible(),
            z_index: 0,
            scales_x_at: 0,
            scales_y_at: 0,
            stroke: None,
            fill: None,
            stroke_thickness: default_stroke_thickness(),
            font: FontSpec::default(),
            default_fill_opacity: default_fill_opacity(),
            geometry: default_geometry(),
            geometry_size: default_geometry_size(),
            data_labels: DataLabelsConfig::default(),
        }
    }
}

impl SeriesConfig {
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the x/y axis indices this series scales against.
    #[must_use]
    pub fn with_axes(mut self, scales_x_at: usize, scales_y_at: usize) -> Self {
        self.scales_x_at = scales_x_at;
        self.scales_y_at = scales_y_at;
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn with_default_fill_opacity(mut self, opacity: f64) -> Self {
        self.default_fill_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: GeometryKind, size: f64) -> Self {
        self.geometry = geometry;
        self.geometry_size = size;
        self
    }

    #[must_use]
    pub fn with_data_labels(mut self, data_labels: DataLabelsConfig) -> Self {
        self.data_labels = data_labels;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.default_fill_opacity.is_finite()
            || !(0.0..=1.0).contains(&self.default_fill_opacity)
        {
            return Err(ChartError::InvalidData(
                "default fill opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        for (value, name) in [
            (self.stroke_thickness, "stroke_thickness"),
            (self.geometry_size, "geometry_size"),
            (self.font.size_px, "font.size_px"),
            (self.data_labels.font.size_px, "data_labels.font.size_px"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "series config `{name}` must be finite and >= 0"
                )));
            }
        }
        if let Some(stroke) = self.stroke {
            stroke.validate()?;
        }
        if let Some(fill) = self.fill {
            fill.validate()?;
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ChartError::InvalidData(format!("failed to serialize series config: {err}"))
        })
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            ChartError::InvalidData(format!("failed to parse series config: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

fn default_visible() -> bool {
    true
}

fn default_stroke_thickness() -> f64 {
    2.0
}

fn default_fill_opacity() -> f64 {
    0.5
}

fn default_geometry() -> GeometryKind {
    GeometryKind::Circle
}

fn default_geometry_size() -> f64 {
    12.0
}

fn default_data_labels_position() -> DataLabelsPosition {
    DataLabelsPosition::Top
}
