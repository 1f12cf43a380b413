use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Bounds, ChartId, SelectionMode, SeriesId, UpdateToken};
use crate::error::{ChartError, ChartResult};
use crate::render::ViewContext;

use super::{ChartContext, ChartSeries, ChartState, ColorPalette, HoveredPoint};

/// What an update pass does when one series fails to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    /// Stop the pass and return the error; axis bounds keep their last values.
    #[default]
    Abort,
    /// Log the failure, leave that series on its last good points and go on.
    ///
    /// A skipped series does not contribute to the axis bounds of that pass.
    SkipSeries,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianChartConfig {
    #[serde(default)]
    pub palette: ColorPalette,
    #[serde(default)]
    pub fetch_error_policy: FetchErrorPolicy,
}

impl CartesianChartConfig {
    #[must_use]
    pub fn with_palette(mut self, palette: ColorPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_fetch_error_policy(mut self, policy: FetchErrorPolicy) -> Self {
        self.fetch_error_policy = policy;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.palette.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ChartError::InvalidData(format!("failed to serialize chart config: {err}"))
        })
    }

    pub fn from_json(json: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            ChartError::InvalidData(format!("failed to parse chart config: {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Outcome of one [`CartesianChart::update`] pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSummary {
    pub token: UpdateToken,
    /// Visible series fetched successfully, in registration order.
    pub fetched: Vec<SeriesId>,
    /// Total points across `fetched`.
    pub points: usize,
    /// Series whose fetch failed under [`FetchErrorPolicy::SkipSeries`].
    pub skipped: Vec<SeriesId>,
}

/// Chart model driving a set of series over shared x/y axes.
///
/// Each [`CartesianChart::update`] starts a new pass, fetches every visible
/// series once and folds their ranges into per-axis bounds, keyed by the
/// series' `scales_x_at` / `scales_y_at` indices.
pub struct CartesianChart<V = ()> {
    state: ChartState,
    fetch_error_policy: FetchErrorPolicy,
    series: Vec<Box<dyn ChartSeries<V>>>,
    x_bounds: IndexMap<usize, Bounds>,
    y_bounds: IndexMap<usize, Bounds>,
}

impl<V> std::fmt::Debug for CartesianChart<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartesianChart")
            .field("state", &self.state)
            .field("fetch_error_policy", &self.fetch_error_policy)
            .field("series", &self.series.len())
            .field("x_bounds", &self.x_bounds)
            .field("y_bounds", &self.y_bounds)
            .finish()
    }
}

impl<V> Default for CartesianChart<V> {
    fn default() -> Self {
        Self {
            state: ChartState::default(),
            fetch_error_policy: FetchErrorPolicy::default(),
            series: Vec::new(),
            x_bounds: IndexMap::new(),
            y_bounds: IndexMap::new(),
        }
    }
}

impl<V> CartesianChart<V> {
    pub fn new(config: CartesianChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            state: ChartState::new(config.palette),
            fetch_error_policy: config.fetch_error_policy,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn id(&self) -> ChartId {
        self.state.chart_id()
    }

    #[must_use]
    pub fn update_token(&self) -> UpdateToken {
        self.state.update_token()
    }

    #[must_use]
    pub fn fetch_error_policy(&self) -> FetchErrorPolicy {
        self.fetch_error_policy
    }

    pub fn set_fetch_error_policy(&mut self, policy: FetchErrorPolicy) {
        self.fetch_error_policy = policy;
    }

    /// Takes ownership of `series`; it is fetched from the next pass on.
    pub fn add_series(&mut self, series: Box<dyn ChartSeries<V>>) -> SeriesId {
        let id = series.id();
        self.series.push(series);
        debug!(chart = ?self.state.chart_id(), series = %id, "series added");
        id
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn series_ids(&self) -> impl Iterator<Item = SeriesId> + '_ {
        self.series.iter().map(|series| series.id())
    }

    #[must_use]
    pub fn series(&self, id: SeriesId) -> Option<&dyn ChartSeries<V>> {
        self.series
            .iter()
            .find(|series| series.id() == id)
            .map(|series| series.as_ref())
    }

    /// Disposes `id` through `context` and drops it from the chart.
    ///
    /// The series stays registered when its disposal fails.
    pub fn remove_series(
        &mut self,
        id: SeriesId,
        context: &mut dyn ViewContext<V>,
    ) -> ChartResult<()> {
        let position = self
            .series
            .iter()
            .position(|series| series.id() == id)
            .ok_or(ChartError::SeriesNotFound(id))?;
        self.series[position].dispose(context)?;
        self.series.remove(position);
        debug!(chart = ?self.state.chart_id(), series = %id, "series removed");
        Ok(())
    }

    /// Runs one update pass over every visible series.
    pub fn update(&mut self) -> ChartResult<UpdateSummary> {
        let token = self.state.begin_update_pass();
        let mut summary = UpdateSummary {
            token,
            fetched: Vec::new(),
            points: 0,
            skipped: Vec::new(),
        };
        let mut x_bounds: IndexMap<usize, Bounds> = IndexMap::new();
        let mut y_bounds: IndexMap<usize, Bounds> = IndexMap::new();

        for series in &mut self.series {
            if !series.config().visible {
                continue;
            }
            let count = match series.fetch(&mut self.state) {
                Ok(count) => count,
                Err(err) if self.fetch_error_policy == FetchErrorPolicy::SkipSeries => {
                    warn!(series = %series.id(), error = %err, "series fetch failed, skipped");
                    summary.skipped.push(series.id());
                    continue;
                }
                Err(err) => return Err(err),
            };
            summary.fetched.push(series.id());
            summary.points += count;

            let range = series.data_range();
            let config = series.config();
            let x = x_bounds.entry(config.scales_x_at).or_insert(Bounds::EMPTY);
            *x = x.merged(range.secondary());
            let y = y_bounds.entry(config.scales_y_at).or_insert(Bounds::EMPTY);
            *y = y.merged(range.primary());
        }

        self.x_bounds = x_bounds;
        self.y_bounds = y_bounds;
        debug!(
            chart = ?self.state.chart_id(),
            ?token,
            fetched = summary.fetched.len(),
            skipped = summary.skipped.len(),
            points = summary.points,
            "chart update pass finished"
        );
        Ok(summary)
    }

    /// Bounds of the x axis at `axis` after the last successful pass.
    #[must_use]
    pub fn x_bounds(&self, axis: usize) -> Option<Bounds> {
        self.x_bounds.get(&axis).copied()
    }

    #[must_use]
    pub fn y_bounds(&self, axis: usize) -> Option<Bounds> {
        self.y_bounds.get(&axis).copied()
    }

    /// Points triggered by `dimensions` across visible series, lowest
    /// `z_index` first; equal z-indices keep registration order.
    pub fn hovered_points(
        &self,
        mode: SelectionMode,
        dimensions: &[f64],
    ) -> ChartResult<Vec<HoveredPoint<V>>> {
        let mut visible: Vec<&dyn ChartSeries<V>> = self
            .series
            .iter()
            .map(|series| series.as_ref())
            .filter(|series| series.config().visible)
            .collect();
        visible.sort_by_key(|series| series.config().z_index);

        let mut hovered = Vec::new();
        for series in visible {
            hovered.extend(series.hovered_points(mode, dimensions)?);
        }
        Ok(hovered)
    }
}
