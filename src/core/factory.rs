use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::core::{
    ByValTracker, ChartId, ChartPoint, Coordinate, DataRange, HoverArea, Location, Mapper,
    SeriesId, SeriesModel, TrackerOutcome,
};
use crate::error::ChartResult;

/// View-model fallback used when a series has no point builder.
pub trait DefaultViewModel<C>: Sized {
    fn from_coordinate(coordinate: &C) -> Self;
}

impl<C> DefaultViewModel<C> for () {
    fn from_coordinate(_: &C) -> Self {}
}

impl<C: Coordinate> DefaultViewModel<C> for Location {
    fn from_coordinate(coordinate: &C) -> Self {
        coordinate_location(coordinate)
    }
}

/// First two coordinate components as a location; missing ones are NaN.
pub(crate) fn coordinate_location<C: Coordinate>(coordinate: &C) -> Location {
    let components = coordinate.components();
    Location::new(
        components.first().copied().unwrap_or(f64::NAN),
        components.get(1).copied().unwrap_or(f64::NAN),
    )
}

type BuildFn<M, C, VM> = dyn Fn(&M, &C, usize) -> ChartResult<VM>;

/// Builds the view-model of a point from its model and coordinate.
pub struct PointBuilder<M, C, VM> {
    build: Rc<BuildFn<M, C, VM>>,
}

impl<M, C, VM> Clone for PointBuilder<M, C, VM> {
    fn clone(&self) -> Self {
        Self {
            build: Rc::clone(&self.build),
        }
    }
}

impl<M, C, VM> fmt::Debug for PointBuilder<M, C, VM> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PointBuilder")
    }
}

impl<M: 'static, C: 'static, VM: 'static> PointBuilder<M, C, VM> {
    pub fn new(build: impl Fn(&M, &C, usize) -> VM + 'static) -> Self {
        Self {
            build: Rc::new(move |model, coordinate, index| Ok(build(model, coordinate, index))),
        }
    }

    pub fn try_new(build: impl Fn(&M, &C, usize) -> ChartResult<VM> + 'static) -> Self {
        Self {
            build: Rc::new(build),
        }
    }

    pub fn build(&self, model: &M, coordinate: &C, index: usize) -> ChartResult<VM> {
        (self.build)(model, coordinate, index)
    }
}

/// Inputs of one fetch. `snapshot` is a frozen copy of the items source.
#[derive(Debug)]
pub struct FetchArgs<'a, M, C, VM, V> {
    pub series: SeriesId,
    pub chart: ChartId,
    pub snapshot: &'a [M],
    pub mapper: &'a Mapper<M, C>,
    pub point_builder: Option<&'a PointBuilder<M, C, VM>>,
    pub tracker: &'a ByValTracker<V>,
}

/// Everything a fetch produced; applied by the series only on success.
#[derive(Debug)]
pub struct FetchOutput<M, C, VM, V> {
    pub points: Vec<ChartPoint<M, C, VM, V>>,
    pub range: DataRange,
    pub tracker: TrackerOutcome<V>,
}

/// Turns a model snapshot into points and folds their coordinates into a
/// fresh [`DataRange`].
///
/// The first mapper or point-builder error aborts the whole fetch; nothing
/// partial escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataFactory;

impl DataFactory {
    pub fn fetch<M, C, VM, V>(
        &self,
        args: FetchArgs<'_, M, C, VM, V>,
    ) -> ChartResult<FetchOutput<M, C, VM, V>>
    where
        M: SeriesModel,
        C: Coordinate,
        VM: DefaultViewModel<C> + 'static,
    {
        let mut range = DataRange::new(C::DIMENSIONS);
        let mut pass = args.tracker.begin();
        let mut points = Vec::with_capacity(args.snapshot.len());

        for (index, model) in args.snapshot.iter().enumerate() {
            let coordinate = args.mapper.map(model, index)?;
            let view_model = match args.point_builder {
                Some(builder) => builder.build(model, &coordinate, index)?,
                None => VM::from_coordinate(&coordinate),
            };
            coordinate.fold_into(&mut range);

            let slot = pass.claim(index, model.identity());
            trace!(index, key = ?slot.key(), "fetched point");
            points.push(ChartPoint {
                index,
                model: model.clone(),
                default_hover_area: HoverArea::at(coordinate_location(&coordinate)),
                coordinate,
                view_model,
                series: args.series,
                chart: args.chart,
                slot,
            });
        }

        Ok(FetchOutput {
            points,
            range,
            tracker: pass.finish(),
        })
    }
}
