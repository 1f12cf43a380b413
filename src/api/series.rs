use std::any::type_name;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::core::{
    ByValTracker, ChartPoint, Coordinate, DataFactory, DataRange, DefaultViewModel, FetchArgs,
    Location, Mapper, MapperRegistry, PackedPoint, PointBuilder, PointSlot, SelectionMode,
    SeriesId, SeriesModel, UpdateToken, select_points,
};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{PropertyChange, SeriesObserver, SeriesProperty};
use crate::render::{Color, ViewContext};

use super::{ChartContext, DataLabelsConfig, FontSpec, GeometryKind, ItemsSource, ObserverRegistry};
use super::{SeriesConfig, SourceCapabilities};

/// Fetch lifecycle of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Unfetched,
    /// Points and range are valid for this update pass only.
    Fetched(UpdateToken),
}

/// Points produced by the last successful fetch, shared with readers.
pub type SeriesPoints<M, C, VM, V> = Rc<[ChartPoint<M, C, VM, V>]>;

/// A styled collection of plotted points derived from a model collection.
///
/// `M` is the model type, `C` the coordinate each model maps to, `VM` the
/// per-point view-model and `V` the host's view handle.
///
/// A series is driven by one update thread. It performs no locking; the items
/// source is copied once per fetch and a source that is mutably borrowed at
/// that moment fails the fetch instead of being read half-way.
pub struct Series<M, C, VM = Location, V = ()> {
    id: SeriesId,
    config: SeriesConfig,
    items_source: ItemsSource<M>,
    mapper: Option<Mapper<M, C>>,
    point_builder: Option<PointBuilder<M, C, VM>>,
    registry: Rc<MapperRegistry>,
    factory: DataFactory,
    tracker: ByValTracker<V>,
    points: SeriesPoints<M, C, VM, V>,
    data_range: Rc<DataRange>,
    state: FetchState,
    stale: Vec<Rc<PointSlot<V>>>,
    observers: ObserverRegistry,
}

impl<M, C, VM, V> std::fmt::Debug for Series<M, C, VM, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Series")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("items_source", &self.items_source)
            .field("points", &self.points.len())
            .field("state", &self.state)
            .finish()
    }
}

impl<M, C, VM, V> Series<M, C, VM, V>
where
    M: SeriesModel,
    C: Coordinate,
    VM: DefaultViewModel<C> + 'static,
    V: 'static,
{
    /// Creates a series resolving its default mapper from `registry`.
    #[must_use]
    pub fn new(registry: Rc<MapperRegistry>) -> Self {
        Self::with_config(registry, SeriesConfig::default())
    }

    #[must_use]
    pub fn with_config(registry: Rc<MapperRegistry>, config: SeriesConfig) -> Self {
        Self {
            id: SeriesId::next(),
            config,
            items_source: ItemsSource::Empty,
            mapper: None,
            point_builder: None,
            registry,
            factory: DataFactory,
            tracker: ByValTracker::new(),
            points: Rc::from(Vec::new()),
            data_range: Rc::new(DataRange::new(C::DIMENSIONS)),
            state: FetchState::Unfetched,
            stale: Vec::new(),
            observers: ObserverRegistry::default(),
        }
    }

    #[must_use]
    pub fn with_items_source(mut self, items_source: ItemsSource<M>) -> Self {
        self.items_source = items_source;
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: Mapper<M, C>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    #[must_use]
    pub fn with_point_builder(mut self, builder: PointBuilder<M, C, VM>) -> Self {
        self.point_builder = Some(builder);
        self
    }

    /// Recomputes points and data range for the chart's current update pass.
    ///
    /// Repeated calls within one pass return the cached points untouched.
    /// Unset stroke/fill are drawn from the chart palette before mapping.
    /// On a mapper or point-builder error the previous points, range and
    /// fetch state are kept and the error is returned as is.
    pub fn fetch(
        &mut self,
        chart: &mut dyn ChartContext,
    ) -> ChartResult<SeriesPoints<M, C, VM, V>> {
        let token = chart.update_token();
        if self.state == FetchState::Fetched(token) {
            trace!(series = %self.id, ?token, "fetch skipped: token already seen");
            return Ok(Rc::clone(&self.points));
        }

        self.assign_default_paints(chart);

        let mapper = self.resolve_mapper()?;
        let snapshot = self.items_source.snapshot()?;
        let output = self.factory.fetch(FetchArgs {
            series: self.id,
            chart: chart.chart_id(),
            snapshot: &snapshot,
            mapper: &mapper,
            point_builder: self.point_builder.as_ref(),
            tracker: &self.tracker,
        })?;

        // Slots without a view have nothing left for the host to release.
        let stale = self.tracker.commit(output.tracker);
        let stale_count = stale.len();
        self.stale
            .extend(stale.into_iter().filter(|slot| slot.view().is_some()));
        self.points = Rc::from(output.points);
        self.data_range = Rc::new(output.range);
        self.state = FetchState::Fetched(token);

        debug!(
            series = %self.id,
            ?token,
            points = self.points.len(),
            stale = stale_count,
            "series fetched"
        );
        Ok(Rc::clone(&self.points))
    }

    fn resolve_mapper(&self) -> ChartResult<Mapper<M, C>> {
        self.mapper
            .clone()
            .or_else(|| self.registry.resolve::<M, C>())
            .ok_or(ChartError::MissingMapper {
                model: type_name::<M>(),
                coordinate: type_name::<C>(),
            })
    }

    fn assign_default_paints(&mut self, chart: &mut dyn ChartContext) {
        let opacity = self.config.default_fill_opacity;
        match (self.config.stroke, self.config.fill) {
            (None, None) => {
                let base = chart.next_color();
                self.set_stroke(Some(base));
                self.set_fill(Some(base.with_opacity(opacity)));
            }
            (None, Some(_)) => {
                let stroke = chart.next_color();
                self.set_stroke(Some(stroke));
            }
            (Some(_), None) => {
                let fill = chart.next_color().with_opacity(opacity);
                self.set_fill(Some(fill));
            }
            (Some(_), Some(_)) => {}
        }
    }

    /// Points of the current pass whose hover area is triggered by
    /// `dimensions`, detached from the series.
    pub fn select_points_by_dimension(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<PackedPoint<M, C, VM, V>>>
    where
        VM: Clone,
    {
        Ok(select_points(&self.points[..], mode, dimensions)?
            .into_iter()
            .map(ChartPoint::pack)
            .collect())
    }

    /// Appends `item` to a source supporting indexed mutation.
    pub fn add(&mut self, item: M) -> ChartResult<()> {
        self.items_source
            .with_indexed("add", move |source| source.push(item))
    }

    /// Removes the first model equal to `item`. Returns whether one was found.
    pub fn remove(&mut self, item: &M) -> ChartResult<bool> {
        self.items_source
            .with_indexed("remove", |source| source.remove_item(item))
    }

    pub fn remove_at(&mut self, index: usize) -> ChartResult<Option<M>> {
        self.items_source
            .with_indexed("remove_at", |source| source.remove_at(index))
    }

    /// Appends `items` with a single range notification.
    pub fn add_range(&mut self, items: impl IntoIterator<Item = M>) -> ChartResult<()> {
        let items: Vec<M> = items.into_iter().collect();
        self.items_source
            .with_ranged("add_range", move |source| source.add_range(items))
    }

    /// Removes `items` with a single range notification; returns how many
    /// were found.
    pub fn remove_range(&mut self, items: &[M]) -> ChartResult<usize> {
        self.items_source
            .with_ranged("remove_range", |source| source.remove_range(items))
    }

    /// Replaces the items source. Nothing is re-fetched until the next pass.
    pub fn set_items_source(&mut self, items_source: ItemsSource<M>) {
        self.items_source = items_source;
        self.notify(SeriesProperty::ItemsSource);
    }

    /// Overrides the mapper. Already fetched points are not affected.
    pub fn set_mapper(&mut self, mapper: Option<Mapper<M, C>>) {
        self.mapper = mapper;
        self.notify(SeriesProperty::Mapper);
    }

    pub fn set_point_builder(&mut self, builder: Option<PointBuilder<M, C, VM>>) {
        self.point_builder = builder;
        self.notify(SeriesProperty::PointBuilder);
    }

    /// Detaches every view this series still references and hands it to
    /// `context`, then forgets all points.
    ///
    /// If `context` rejects a view, that view stays attached and every slot
    /// not yet released is kept, so calling this again resumes where it
    /// stopped. Series variants call this from their disposal logic.
    pub fn release_views(&mut self, context: &mut dyn ViewContext<V>) -> ChartResult<()> {
        let mut pending: Vec<Rc<PointSlot<V>>> = self.stale.drain(..).collect();
        pending.extend(self.tracker.clear());

        let mut released = 0_usize;
        for position in 0..pending.len() {
            let slot = &pending[position];
            let Some(view) = slot.detach_view() else {
                continue;
            };
            if let Err(err) = context.remove_view(self.id, slot.key(), Rc::clone(&view)) {
                slot.attach_view(view);
                self.stale = pending.split_off(position);
                warn!(
                    series = %self.id,
                    released,
                    pending = self.stale.len(),
                    "view release interrupted"
                );
                return Err(err);
            }
            released += 1;
        }
        self.points = Rc::from(Vec::new());
        self.data_range = Rc::new(DataRange::new(C::DIMENSIONS));
        self.state = FetchState::Unfetched;
        context.release_series(self.id)?;
        debug!(series = %self.id, released, "series views released");
        Ok(())
    }
}

impl<M, C, VM, V> Series<M, C, VM, V> {
    #[must_use]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    #[must_use]
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    #[must_use]
    pub fn points(&self) -> &SeriesPoints<M, C, VM, V> {
        &self.points
    }

    #[must_use]
    pub fn data_range(&self) -> &Rc<DataRange> {
        &self.data_range
    }

    #[must_use]
    pub fn fetch_state(&self) -> FetchState {
        self.state
    }

    #[must_use]
    pub fn items_source(&self) -> &ItemsSource<M> {
        &self.items_source
    }

    #[must_use]
    pub fn capabilities(&self) -> SourceCapabilities
    where
        M: Clone + 'static,
    {
        self.items_source.capabilities()
    }

    #[must_use]
    pub fn mapper(&self) -> Option<&Mapper<M, C>> {
        self.mapper.as_ref()
    }

    #[must_use]
    pub fn tracker(&self) -> &ByValTracker<V> {
        &self.tracker
    }

    /// Slots whose models left the source since they were last handed out,
    /// restricted to those that still hold a view.
    ///
    /// These accumulate across passes until taken here or released by
    /// [`Series::release_views`], and each one keeps its view alive.
    pub fn take_stale_points(&mut self) -> Vec<Rc<PointSlot<V>>> {
        std::mem::take(&mut self.stale)
    }

    pub fn register_observer(&mut self, observer: Box<dyn SeriesObserver>) -> ChartResult<()> {
        self.observers.register(observer)
    }

    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        self.observers.unregister(observer_id)
    }

    fn notify(&mut self, property: SeriesProperty) {
        self.observers.emit(PropertyChange {
            series: self.id,
            property,
        });
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.config.name = name;
        self.notify(SeriesProperty::Name);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.config.visible = visible;
        self.notify(SeriesProperty::Visible);
    }

    pub fn set_z_index(&mut self, z_index: i32) {
        self.config.z_index = z_index;
        self.notify(SeriesProperty::ZIndex);
    }

    pub fn set_scales_x_at(&mut self, axis: usize) {
        self.config.scales_x_at = axis;
        self.notify(SeriesProperty::ScalesXAt);
    }

    pub fn set_scales_y_at(&mut self, axis: usize) {
        self.config.scales_y_at = axis;
        self.notify(SeriesProperty::ScalesYAt);
    }

    pub fn set_stroke(&mut self, stroke: Option<Color>) {
        self.config.stroke = stroke;
        self.notify(SeriesProperty::Stroke);
    }

    pub fn set_fill(&mut self, fill: Option<Color>) {
        self.config.fill = fill;
        self.notify(SeriesProperty::Fill);
    }

    pub fn set_stroke_thickness(&mut self, thickness: f64) -> ChartResult<()> {
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(ChartError::InvalidData(
                "stroke thickness must be finite and >= 0".to_owned(),
            ));
        }
        self.config.stroke_thickness = thickness;
        self.notify(SeriesProperty::StrokeThickness);
        Ok(())
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.config.font = font;
        self.notify(SeriesProperty::Font);
    }

    pub fn set_default_fill_opacity(&mut self, opacity: f64) -> ChartResult<()> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(ChartError::InvalidData(
                "default fill opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        self.config.default_fill_opacity = opacity;
        self.notify(SeriesProperty::DefaultFillOpacity);
        Ok(())
    }

    pub fn set_geometry(&mut self, geometry: GeometryKind, size: f64) {
        self.config.geometry = geometry;
        self.config.geometry_size = size;
        self.notify(SeriesProperty::Geometry);
    }

    pub fn set_data_labels(&mut self, data_labels: DataLabelsConfig) {
        self.config.data_labels = data_labels;
        self.notify(SeriesProperty::DataLabels);
    }
}
