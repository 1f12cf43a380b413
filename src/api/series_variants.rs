use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    Bounds, ChartId, Coordinate, DataRange, Location, MapperRegistry, PointCoordinate, PointKey,
    SelectionMode, SeriesId, SeriesModel, select_points,
};
use crate::error::{ChartError, ChartResult};
use crate::render::ViewContext;

use super::{ChartContext, Series, SeriesConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Column,
    Scatter,
    Custom,
}

/// Type-erased point projection returned across heterogeneous series.
#[derive(Debug, Clone)]
pub struct HoveredPoint<V> {
    pub series: SeriesId,
    pub chart: ChartId,
    pub key: PointKey,
    pub index: usize,
    pub coordinate: SmallVec<[f64; 4]>,
    pub view: Option<Rc<V>>,
}

/// Series as seen by a chart that owns several of them.
///
/// Every concrete series must provide [`ChartSeries::dispose`]; the provided
/// body fails with [`ChartError::Unimplemented`].
pub trait ChartSeries<V> {
    fn id(&self) -> SeriesId;

    fn kind(&self) -> SeriesKind;

    fn config(&self) -> &SeriesConfig;

    /// Fetches for the chart's current pass and returns the point count.
    fn fetch(&mut self, chart: &mut dyn ChartContext) -> ChartResult<usize>;

    /// Range used for axis scaling after the last fetch.
    fn data_range(&self) -> DataRange;

    fn hovered_points(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<HoveredPoint<V>>>;

    /// Releases retained visuals through `context` when the chart drops the
    /// series.
    fn dispose(&mut self, context: &mut dyn ViewContext<V>) -> ChartResult<()> {
        let _ = context;
        Err(ChartError::Unimplemented {
            operation: "dispose",
            series: self.id(),
        })
    }
}

fn hovered_points<M, C, VM, V>(
    series: &Series<M, C, VM, V>,
    mode: SelectionMode,
    dimensions: &[f64],
) -> ChartResult<Vec<HoveredPoint<V>>>
where
    C: Coordinate,
{
    Ok(select_points(&series.points()[..], mode, dimensions)?
        .into_iter()
        .map(|point| HoveredPoint {
            series: point.series(),
            chart: point.chart(),
            key: point.key(),
            index: point.index(),
            coordinate: point.coordinate().components(),
            view: point.view(),
        })
        .collect())
}

macro_rules! series_variant_accessors {
    () => {
        #[must_use]
        pub fn series(&self) -> &Series<M, C, Location, V> {
            &self.series
        }

        pub fn series_mut(&mut self) -> &mut Series<M, C, Location, V> {
            &mut self.series
        }
    };
}

/// Points joined by a (optionally smoothed) line.
#[derive(Debug)]
pub struct LineSeries<M, C = PointCoordinate, V = ()> {
    series: Series<M, C, Location, V>,
    line_smoothness: f64,
}

impl<M, C, V> LineSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    #[must_use]
    pub fn new(registry: Rc<MapperRegistry>, config: SeriesConfig) -> Self {
        Self {
            series: Series::with_config(registry, config),
            line_smoothness: 0.65,
        }
    }

    series_variant_accessors!();

    #[must_use]
    pub fn line_smoothness(&self) -> f64 {
        self.line_smoothness
    }

    /// `0` draws straight segments, `1` the smoothest curve.
    pub fn set_line_smoothness(&mut self, smoothness: f64) -> ChartResult<()> {
        if !smoothness.is_finite() || !(0.0..=1.0).contains(&smoothness) {
            return Err(ChartError::InvalidData(
                "line smoothness must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.line_smoothness = smoothness;
        Ok(())
    }
}

impl<M, C, V> ChartSeries<V> for LineSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    fn id(&self) -> SeriesId {
        self.series.id()
    }

    fn kind(&self) -> SeriesKind {
        SeriesKind::Line
    }

    fn config(&self) -> &SeriesConfig {
        self.series.config()
    }

    fn fetch(&mut self, chart: &mut dyn ChartContext) -> ChartResult<usize> {
        Ok(self.series.fetch(chart)?.len())
    }

    fn data_range(&self) -> DataRange {
        DataRange::clone(self.series.data_range())
    }

    fn hovered_points(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<HoveredPoint<V>>> {
        hovered_points(&self.series, mode, dimensions)
    }

    fn dispose(&mut self, context: &mut dyn ViewContext<V>) -> ChartResult<()> {
        self.series.release_views(context)
    }
}

/// Bars growing from a pivot value on the primary axis.
#[derive(Debug)]
pub struct ColumnSeries<M, C = PointCoordinate, V = ()> {
    series: Series<M, C, Location, V>,
    pivot: f64,
    max_bar_width: f64,
}

impl<M, C, V> ColumnSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    #[must_use]
    pub fn new(registry: Rc<MapperRegistry>, config: SeriesConfig) -> Self {
        Self {
            series: Series::with_config(registry, config),
            pivot: 0.0,
            max_bar_width: 50.0,
        }
    }

    series_variant_accessors!();

    #[must_use]
    pub fn pivot(&self) -> f64 {
        self.pivot
    }

    pub fn set_pivot(&mut self, pivot: f64) -> ChartResult<()> {
        if !pivot.is_finite() {
            return Err(ChartError::InvalidData("pivot must be finite".to_owned()));
        }
        self.pivot = pivot;
        Ok(())
    }

    #[must_use]
    pub fn max_bar_width(&self) -> f64 {
        self.max_bar_width
    }

    pub fn set_max_bar_width(&mut self, width: f64) -> ChartResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::InvalidData(
                "max bar width must be finite and > 0".to_owned(),
            ));
        }
        self.max_bar_width = width;
        Ok(())
    }
}

impl<M, C, V> ChartSeries<V> for ColumnSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    fn id(&self) -> SeriesId {
        self.series.id()
    }

    fn kind(&self) -> SeriesKind {
        SeriesKind::Column
    }

    fn config(&self) -> &SeriesConfig {
        self.series.config()
    }

    fn fetch(&mut self, chart: &mut dyn ChartContext) -> ChartResult<usize> {
        Ok(self.series.fetch(chart)?.len())
    }

    /// Bars start at the pivot, so the primary range always includes it.
    fn data_range(&self) -> DataRange {
        let mut range = DataRange::clone(self.series.data_range());
        if !range.primary().is_empty() {
            range.fold(1, self.pivot);
        }
        range
    }

    fn hovered_points(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<HoveredPoint<V>>> {
        hovered_points(&self.series, mode, dimensions)
    }

    fn dispose(&mut self, context: &mut dyn ViewContext<V>) -> ChartResult<()> {
        self.series.release_views(context)
    }
}

/// Free-standing geometries; with a weighted coordinate the geometry size
/// follows the tertiary dimension.
#[derive(Debug)]
pub struct ScatterSeries<M, C = PointCoordinate, V = ()> {
    series: Series<M, C, Location, V>,
    min_geometry_size: f64,
}

impl<M, C, V> ScatterSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    #[must_use]
    pub fn new(registry: Rc<MapperRegistry>, config: SeriesConfig) -> Self {
        Self {
            series: Series::with_config(registry, config),
            min_geometry_size: 6.0,
        }
    }

    series_variant_accessors!();

    pub fn set_min_geometry_size(&mut self, size: f64) -> ChartResult<()> {
        if !size.is_finite() || size < 0.0 {
            return Err(ChartError::InvalidData(
                "min geometry size must be finite and >= 0".to_owned(),
            ));
        }
        self.min_geometry_size = size;
        Ok(())
    }

    /// Geometry size for a point of `weight`, interpolated between the
    /// minimum size and the configured geometry size over the fetched
    /// tertiary range. Unweighted series always use the configured size.
    #[must_use]
    pub fn geometry_size_for(&self, weight: f64) -> f64 {
        let max_size = self.series.config().geometry_size;
        let weights: Bounds = self.series.data_range().tertiary();
        if weights.is_empty() || !weight.is_finite() {
            return max_size;
        }
        let delta = weights.delta();
        if delta == 0.0 {
            return max_size;
        }
        let ratio = ((weight - weights.min) / delta).clamp(0.0, 1.0);
        self.min_geometry_size + ratio * (max_size - self.min_geometry_size)
    }
}

impl<M, C, V> ChartSeries<V> for ScatterSeries<M, C, V>
where
    M: SeriesModel,
    C: Coordinate,
    V: 'static,
{
    fn id(&self) -> SeriesId {
        self.series.id()
    }

    fn kind(&self) -> SeriesKind {
        SeriesKind::Scatter
    }

    fn config(&self) -> &SeriesConfig {
        self.series.config()
    }

    fn fetch(&mut self, chart: &mut dyn ChartContext) -> ChartResult<usize> {
        Ok(self.series.fetch(chart)?.len())
    }

    fn data_range(&self) -> DataRange {
        DataRange::clone(self.series.data_range())
    }

    fn hovered_points(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<HoveredPoint<V>>> {
        hovered_points(&self.series, mode, dimensions)
    }

    fn dispose(&mut self, context: &mut dyn ViewContext<V>) -> ChartResult<()> {
        self.series.release_views(context)
    }
}
