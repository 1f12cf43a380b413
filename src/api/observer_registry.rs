use std::fmt;

use tracing::trace;

use crate::error::{ChartError, ChartResult};
use crate::extensions::{PropertyChange, SeriesObserver};

/// Observers attached to one series, dispatched in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn SeriesObserver>>,
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|observer| observer.id()))
            .finish()
    }
}

impl ObserverRegistry {
    /// Registers an observer with unique identifier.
    pub fn register(&mut self, observer: Box<dyn SeriesObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.contains(&observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn contains(&self, observer_id: &str) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn emit(&mut self, change: PropertyChange) {
        trace!(
            series = %change.series,
            property = change.property.name(),
            observers = self.observers.len(),
            "series property changed"
        );
        for observer in &mut self.observers {
            observer.on_property_changed(change);
        }
    }
}
