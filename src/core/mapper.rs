use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::core::{
    DateTimePoint, FinancialCoordinate, FinancialPoint, ObservablePoint, ObservableValue,
    PointCoordinate, WeightedCoordinate, WeightedPoint,
};
use crate::error::ChartResult;

type MapFn<M, C> = dyn Fn(&M, usize) -> ChartResult<C>;

/// Pure `(model, index) -> coordinate` function.
///
/// Mappers must not have side effects. A coordinate carrying NaN is passed
/// through untouched; filtering it is the consumer's job.
pub struct Mapper<M, C> {
    map: Rc<MapFn<M, C>>,
}

impl<M, C> Clone for Mapper<M, C> {
    fn clone(&self) -> Self {
        Self {
            map: Rc::clone(&self.map),
        }
    }
}

impl<M, C> fmt::Debug for Mapper<M, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper")
            .field("model", &type_name::<M>())
            .field("coordinate", &type_name::<C>())
            .finish()
    }
}

impl<M: 'static, C: 'static> Mapper<M, C> {
    /// Wraps an infallible mapping closure.
    pub fn new(map: impl Fn(&M, usize) -> C + 'static) -> Self {
        Self {
            map: Rc::new(move |model, index| Ok(map(model, index))),
        }
    }

    /// Wraps a mapping closure that may reject a model.
    pub fn try_new(map: impl Fn(&M, usize) -> ChartResult<C> + 'static) -> Self {
        Self { map: Rc::new(map) }
    }

    pub fn map(&self, model: &M, index: usize) -> ChartResult<C> {
        (self.map)(model, index)
    }

    /// Lifts a mapper over `T` to one over shared handles of `T`.
    #[must_use]
    pub fn shared_rc(&self) -> Mapper<Rc<M>, C> {
        let inner = self.clone();
        Mapper::try_new(move |model: &Rc<M>, index| inner.map(model, index))
    }

    #[must_use]
    pub fn shared_arc(&self) -> Mapper<Arc<M>, C> {
        let inner = self.clone();
        Mapper::try_new(move |model: &Arc<M>, index| inner.map(model, index))
    }
}

/// Default mappers keyed by `(model type, coordinate type)`.
///
/// Built once through [`MapperRegistryBuilder`] and read-only afterwards;
/// series hold it behind an `Rc` and consult it only when no explicit mapper
/// was configured.
pub struct MapperRegistry {
    mappers: IndexMap<(TypeId, TypeId), Box<dyn Any>>,
}

impl fmt::Debug for MapperRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("len", &self.mappers.len())
            .finish()
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::builder().with_defaults().build()
    }
}

impl MapperRegistry {
    #[must_use]
    pub fn builder() -> MapperRegistryBuilder {
        MapperRegistryBuilder {
            mappers: IndexMap::new(),
        }
    }

    /// Registry without any mapper; every series must configure its own.
    #[must_use]
    pub fn empty() -> Self {
        Self::builder().build()
    }

    #[must_use]
    pub fn resolve<M: 'static, C: 'static>(&self) -> Option<Mapper<M, C>> {
        self.mappers
            .get(&(TypeId::of::<M>(), TypeId::of::<C>()))
            .and_then(|entry| entry.downcast_ref::<Mapper<M, C>>())
            .cloned()
    }

    #[must_use]
    pub fn contains<M: 'static, C: 'static>(&self) -> bool {
        self.mappers
            .contains_key(&(TypeId::of::<M>(), TypeId::of::<C>()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

#[derive(Default)]
pub struct MapperRegistryBuilder {
    mappers: IndexMap<(TypeId, TypeId), Box<dyn Any>>,
}

impl MapperRegistryBuilder {
    /// Registers `mapper`, replacing any previous mapper for the same pair.
    #[must_use]
    pub fn register<M: 'static, C: 'static>(mut self, mapper: Mapper<M, C>) -> Self {
        debug!(
            model = type_name::<M>(),
            coordinate = type_name::<C>(),
            "register default mapper"
        );
        self.mappers
            .insert((TypeId::of::<M>(), TypeId::of::<C>()), Box::new(mapper));
        self
    }

    /// Registers `mapper` for `M`, `Rc<M>` and `Arc<M>`.
    #[must_use]
    pub fn register_shared<M: 'static, C: 'static>(self, mapper: Mapper<M, C>) -> Self {
        let rc = mapper.shared_rc();
        let arc = mapper.shared_arc();
        self.register(mapper).register(rc).register(arc)
    }

    /// Registers the built-in scalar and point models.
    ///
    /// Scalars map index to the secondary axis and value to the primary axis.
    #[must_use]
    pub fn with_defaults(self) -> Self {
        self.register_shared(Mapper::new(|value: &f64, index| {
            PointCoordinate::new(index as f64, *value)
        }))
        .register_shared(Mapper::new(|value: &f32, index| {
            PointCoordinate::new(index as f64, f64::from(*value))
        }))
        .register_shared(Mapper::new(|value: &i32, index| {
            PointCoordinate::new(index as f64, f64::from(*value))
        }))
        .register_shared(Mapper::new(|value: &i64, index| {
            PointCoordinate::new(index as f64, *value as f64)
        }))
        .register_shared(Mapper::new(|value: &u32, index| {
            PointCoordinate::new(index as f64, f64::from(*value))
        }))
        .register_shared(Mapper::try_new(|value: &Decimal, index| {
            Ok(PointCoordinate::new(
                index as f64,
                decimal_to_f64(*value, index)?,
            ))
        }))
        .register_shared(Mapper::new(|model: &ObservableValue, index| {
            model.value.map_or_else(PointCoordinate::empty, |value| {
                PointCoordinate::new(index as f64, value)
            })
        }))
        .register_shared(Mapper::new(|model: &ObservablePoint, _| {
            match (model.x, model.y) {
                (Some(x), Some(y)) => PointCoordinate::new(x, y),
                _ => PointCoordinate::empty(),
            }
        }))
        .register_shared(Mapper::new(|model: &WeightedPoint, _| {
            WeightedCoordinate::new(model.x, model.y, model.weight)
        }))
        .register_shared(Mapper::new(|model: &DateTimePoint, _| {
            model.value.map_or_else(PointCoordinate::empty, |value| {
                PointCoordinate::new(datetime_to_unix_seconds(model.time), value)
            })
        }))
        .register_shared(Mapper::new(|model: &FinancialPoint, _| {
            FinancialCoordinate::new(
                datetime_to_unix_seconds(model.time),
                model.open,
                model.high,
                model.low,
                model.close,
            )
        }))
    }

    #[must_use]
    pub fn build(self) -> MapperRegistry {
        MapperRegistry {
            mappers: self.mappers,
        }
    }
}
