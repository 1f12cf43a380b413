use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{ChartId, Location, ModelKey, SeriesId};
use crate::error::{ChartError, ChartResult};

/// Stable point identity across fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointKey {
    /// The model's own reference identity.
    Model(ModelKey),
    /// Allocated by the tracker for value models (or repeated references).
    Synthetic(u64),
}

/// Region in which a point reacts to pointer or dimension queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HoverArea {
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Circle {
        center_x: f64,
        center_y: f64,
        radius: f64,
    },
}

/// How a dimension vector is tested against hover areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Both dimensions must fall inside the area.
    Contains,
    /// Only the first (secondary) dimension is compared.
    ContainsX,
    /// Only the second (primary) dimension is compared.
    ContainsY,
    /// The point whose area center is closest to the vector.
    Nearest,
}

impl SelectionMode {
    #[must_use]
    pub fn required_dimensions(self) -> usize {
        match self {
            Self::ContainsX => 1,
            Self::Contains | Self::ContainsY | Self::Nearest => 2,
        }
    }
}

impl HoverArea {
    /// Zero-sized area sitting on `location`.
    #[must_use]
    pub fn at(location: Location) -> Self {
        Self::Rectangle {
            x: location.x,
            y: location.y,
            width: 0.0,
            height: 0.0,
        }
    }

    #[must_use]
    pub fn center(self) -> Location {
        match self {
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => Location::new(x + width * 0.5, y + height * 0.5),
            Self::Circle {
                center_x, center_y, ..
            } => Location::new(center_x, center_y),
        }
    }

    /// Tests `dimensions` against the area. Containment is edge-inclusive.
    ///
    /// `Nearest` has no containment meaning on a single area and always
    /// matches; ranking happens across points.
    #[must_use]
    pub fn is_triggered_by(self, mode: SelectionMode, dimensions: &[f64]) -> bool {
        let (Some(&dx), dy) = (dimensions.first(), dimensions.get(1).copied()) else {
            return false;
        };
        match (self, mode) {
            (_, SelectionMode::Nearest) => true,
            (
                Self::Rectangle {
                    x,
                    y,
                    width,
                    height,
                },
                _,
            ) => {
                let in_x = dx >= x && dx <= x + width;
                let in_y = dy.is_some_and(|dy| dy >= y && dy <= y + height);
                match mode {
                    SelectionMode::ContainsX => in_x,
                    SelectionMode::ContainsY => in_y,
                    _ => in_x && in_y,
                }
            }
            (
                Self::Circle {
                    center_x,
                    center_y,
                    radius,
                },
                _,
            ) => match mode {
                SelectionMode::ContainsX => (dx - center_x).abs() <= radius,
                SelectionMode::ContainsY => dy.is_some_and(|dy| (dy - center_y).abs() <= radius),
                _ => dy.is_some_and(|dy| (dx - center_x).hypot(dy - center_y) <= radius),
            },
        }
    }

    #[must_use]
    pub fn distance_to(self, x: f64, y: f64) -> f64 {
        let center = self.center();
        (x - center.x).hypot(y - center.y)
    }
}

/// Mutable per-point state carried over when a point identity is reused.
///
/// Views and hover areas are assigned by the host after a fetch, so they live
/// behind interior mutability while the point itself stays immutable.
#[derive(Debug)]
pub struct PointSlot<V> {
    key: PointKey,
    view: RefCell<Option<Rc<V>>>,
    hover_area: Cell<Option<HoverArea>>,
}

impl<V> PointSlot<V> {
    #[must_use]
    pub fn new(key: PointKey) -> Self {
        Self {
            key,
            view: RefCell::new(None),
            hover_area: Cell::new(None),
        }
    }

    #[must_use]
    pub fn key(&self) -> PointKey {
        self.key
    }

    #[must_use]
    pub fn view(&self) -> Option<Rc<V>> {
        self.view.borrow().clone()
    }

    /// Associates `view`, returning the previously attached one.
    pub fn attach_view(&self, view: Rc<V>) -> Option<Rc<V>> {
        self.view.replace(Some(view))
    }

    pub fn detach_view(&self) -> Option<Rc<V>> {
        self.view.take()
    }

    #[must_use]
    pub fn hover_area(&self) -> Option<HoverArea> {
        self.hover_area.get()
    }

    pub fn set_hover_area(&self, area: HoverArea) {
        self.hover_area.set(Some(area));
    }
}

/// One plotted model produced by a fetch.
#[derive(Debug)]
pub struct ChartPoint<M, C, VM, V> {
    pub(crate) index: usize,
    pub(crate) model: M,
    pub(crate) coordinate: C,
    pub(crate) view_model: VM,
    pub(crate) series: SeriesId,
    pub(crate) chart: ChartId,
    pub(crate) slot: Rc<PointSlot<V>>,
    pub(crate) default_hover_area: HoverArea,
}

impl<M, C, VM, V> ChartPoint<M, C, VM, V> {
    #[must_use]
    pub fn key(&self) -> PointKey {
        self.slot.key()
    }

    /// Position of the model in the snapshot it was fetched from.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn coordinate(&self) -> &C {
        &self.coordinate
    }

    #[must_use]
    pub fn view_model(&self) -> &VM {
        &self.view_model
    }

    #[must_use]
    pub fn series(&self) -> SeriesId {
        self.series
    }

    #[must_use]
    pub fn chart(&self) -> ChartId {
        self.chart
    }

    #[must_use]
    pub fn slot(&self) -> &Rc<PointSlot<V>> {
        &self.slot
    }

    #[must_use]
    pub fn view(&self) -> Option<Rc<V>> {
        self.slot.view()
    }

    pub fn attach_view(&self, view: Rc<V>) -> Option<Rc<V>> {
        self.slot.attach_view(view)
    }

    /// Host-assigned hover area, or the coordinate-derived default.
    #[must_use]
    pub fn hover_area(&self) -> HoverArea {
        self.slot.hover_area().unwrap_or(self.default_hover_area)
    }

    pub fn set_hover_area(&self, area: HoverArea) {
        self.slot.set_hover_area(area);
    }
}

impl<M: Clone, C: Clone, VM: Clone, V> ChartPoint<M, C, VM, V> {
    #[must_use]
    pub fn pack(&self) -> PackedPoint<M, C, VM, V> {
        PackedPoint {
            key: self.key(),
            index: self.index,
            model: self.model.clone(),
            coordinate: self.coordinate.clone(),
            view_model: self.view_model.clone(),
            view: self.view(),
            series: self.series,
            chart: self.chart,
        }
    }
}

/// Detached projection of a point for tooltips and selection.
#[derive(Debug, Clone)]
pub struct PackedPoint<M, C, VM, V> {
    pub key: PointKey,
    pub index: usize,
    pub model: M,
    pub coordinate: C,
    pub view_model: VM,
    pub view: Option<Rc<V>>,
    pub series: SeriesId,
    pub chart: ChartId,
}

/// Filters `points` whose hover area is triggered by `dimensions`.
///
/// `Nearest` keeps the single closest point; ties resolve to the earliest.
pub fn select_points<'a, M, C, VM, V>(
    points: &'a [ChartPoint<M, C, VM, V>],
    mode: SelectionMode,
    dimensions: &[f64],
) -> ChartResult<Vec<&'a ChartPoint<M, C, VM, V>>> {
    let required = mode.required_dimensions();
    if dimensions.len() < required {
        return Err(ChartError::InvalidData(format!(
            "{mode:?} selection needs {required} dimensions, got {}",
            dimensions.len()
        )));
    }

    if mode == SelectionMode::Nearest {
        let (x, y) = (dimensions[0], dimensions[1]);
        let nearest = points
            .iter()
            .filter(|point| !point.hover_area().distance_to(x, y).is_nan())
            .min_by_key(|point| OrderedFloat(point.hover_area().distance_to(x, y)));
        return Ok(nearest.into_iter().collect());
    }

    Ok(points
        .iter()
        .filter(|point| point.hover_area().is_triggered_by(mode, dimensions))
        .collect())
}
