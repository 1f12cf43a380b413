mod cartesian_chart;
mod chart_context;
mod items_source;
mod observer_registry;
mod series;
mod series_config;
mod series_variants;

pub use cartesian_chart::{CartesianChart, CartesianChartConfig, FetchErrorPolicy, UpdateSummary};
pub use chart_context::{ChartContext, ChartState, ColorPalette};
pub use items_source::{
    Capability, CollectionChange, IndexedSource, ItemsSource, ModelSource, ObservableCollection,
    RangeSource, SourceCapabilities,
};
pub use observer_registry::ObserverRegistry;
pub use series::{FetchState, Series, SeriesPoints};
pub use series_config::{
    DataLabelsConfig, DataLabelsPosition, FontSpec, GeometryKind, SeriesConfig,
};
pub use series_variants::{
    ChartSeries, ColumnSeries, HoveredPoint, LineSeries, ScatterSeries, SeriesKind,
};
