use std::rc::Rc;

use crate::core::{PointKey, SeriesId};
use crate::error::ChartResult;

/// Host-side owner of retained visuals.
///
/// The pipeline never creates or destroys views itself; it hands them back
/// through this contract when a series is released.
pub trait ViewContext<V> {
    /// Tears down `view`, previously attached to the point `key` of `series`.
    fn remove_view(&mut self, series: SeriesId, key: PointKey, view: Rc<V>) -> ChartResult<()>;

    /// Called once per series after all of its point views were removed.
    fn release_series(&mut self, series: SeriesId) -> ChartResult<()> {
        let _ = series;
        Ok(())
    }
}

/// View context used by tests and headless hosts; it only counts removals.
#[derive(Debug, Default)]
pub struct NullViewContext {
    pub removed_views: usize,
    pub released_series: Vec<SeriesId>,
}

impl<V> ViewContext<V> for NullViewContext {
    fn remove_view(&mut self, _series: SeriesId, _key: PointKey, _view: Rc<V>) -> ChartResult<()> {
        self.removed_views += 1;
        Ok(())
    }

    fn release_series(&mut self, series: SeriesId) -> ChartResult<()> {
        self.released_series.push(series);
        Ok(())
    }
}
