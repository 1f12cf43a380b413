use serde::{Deserialize, Serialize};

use crate::core::SeriesId;

/// Mutable series field that raised a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesProperty {
    Name,
    Visible,
    ZIndex,
    ScalesXAt,
    ScalesYAt,
    Stroke,
    Fill,
    StrokeThickness,
    Font,
    DefaultFillOpacity,
    Geometry,
    DataLabels,
    ItemsSource,
    Mapper,
    PointBuilder,
}

impl SeriesProperty {
    /// Field name as exposed to data-binding hosts.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Visible => "visible",
            Self::ZIndex => "z_index",
            Self::ScalesXAt => "scales_x_at",
            Self::ScalesYAt => "scales_y_at",
            Self::Stroke => "stroke",
            Self::Fill => "fill",
            Self::StrokeThickness => "stroke_thickness",
            Self::Font => "font",
            Self::DefaultFillOpacity => "default_fill_opacity",
            Self::Geometry => "geometry",
            Self::DataLabels => "data_labels",
            Self::ItemsSource => "items_source",
            Self::Mapper => "mapper",
            Self::PointBuilder => "point_builder",
        }
    }
}

/// Raised after a series field was assigned. Carries no payload; observers
/// read the new value from the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    pub series: SeriesId,
    pub property: SeriesProperty,
}

/// Hook for data-binding hosts.
///
/// Observers are notified synchronously on the thread mutating the series.
pub trait SeriesObserver {
    fn id(&self) -> &str;
    fn on_property_changed(&mut self, change: PropertyChange);
}
