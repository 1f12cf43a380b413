pub mod bounds;
pub mod coordinate;
pub mod factory;
pub mod label_placement;
pub mod mapper;
pub mod model;
pub mod point;
pub mod primitives;
pub mod tracker;
pub mod types;

pub use bounds::{Bounds, DataRange};
pub use coordinate::{Coordinate, FinancialCoordinate, PointCoordinate, WeightedCoordinate};
pub use factory::{DataFactory, DefaultViewModel, FetchArgs, FetchOutput, PointBuilder};
pub use label_placement::{
    AlignmentAxis, HorizontalAlignment, LabelLayout, VerticalAlignment, place_label,
    place_label_from_config, rotated_extent,
};
pub use mapper::{Mapper, MapperRegistry, MapperRegistryBuilder};
pub use model::{
    DateTimePoint, FinancialPoint, ModelKey, ObservablePoint, ObservableValue, SeriesModel,
    WeightedPoint,
};
pub use point::{
    ChartPoint, HoverArea, PackedPoint, PointKey, PointSlot, SelectionMode, select_points,
};
pub use tracker::{ByValTracker, TrackerOutcome, TrackerPass};
pub use types::{ChartId, Location, Margin, SeriesId, Size, UpdateToken};
