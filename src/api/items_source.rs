use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

/// Optional mutation support an items source may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    /// `add`, `remove`, `remove_at`.
    IndexedMutation,
    /// `add_range`, `remove_range` with a single change notification.
    RangeNotification,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexedMutation => f.write_str("indexed mutation"),
            Self::RangeNotification => f.write_str("range notification"),
        }
    }
}

/// Capabilities resolved once, when the source is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceCapabilities {
    pub indexed_mutation: bool,
    pub range_notification: bool,
}

impl SourceCapabilities {
    #[must_use]
    pub fn supports(self, capability: Capability) -> bool {
        match capability {
            Capability::IndexedMutation => self.indexed_mutation,
            Capability::RangeNotification => self.range_notification,
        }
    }
}

/// Ordered, iterable collection of models.
pub trait ModelSource<M> {
    /// Copies the current content; later mutations do not affect the copy.
    fn snapshot(&self) -> Vec<M>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait IndexedSource<M>: ModelSource<M> {
    fn push(&mut self, item: M);

    /// Removes the first item equal to `item`.
    fn remove_item(&mut self, item: &M) -> bool;

    fn remove_at(&mut self, index: usize) -> Option<M>;
}

pub trait RangeSource<M>: IndexedSource<M> {
    fn add_range(&mut self, items: Vec<M>);

    /// Removes the first occurrence of each of `items`; returns how many
    /// were found.
    fn remove_range(&mut self, items: &[M]) -> usize;
}

impl<M: Clone> ModelSource<M> for Vec<M> {
    fn snapshot(&self) -> Vec<M> {
        self.clone()
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl<M: Clone + PartialEq> IndexedSource<M> for Vec<M> {
    fn push(&mut self, item: M) {
        Vec::push(self, item);
    }

    fn remove_item(&mut self, item: &M) -> bool {
        match self.iter().position(|entry| entry == item) {
            Some(position) => {
                self.remove(position);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, index: usize) -> Option<M> {
        (index < Vec::len(self)).then(|| self.remove(index))
    }
}

/// Change raised by an [`ObservableCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionChange {
    Added { start: usize, count: usize },
    Removed { index: usize, count: usize },
    /// Content changed in a way not expressible as one contiguous span.
    Reset,
}

type ChangeHandler = Box<dyn FnMut(CollectionChange)>;

/// Vector that reports its mutations, including bulk range changes.
///
/// Handlers run while the collection is mutably borrowed and must not
/// access it.
pub struct ObservableCollection<M> {
    items: Vec<M>,
    handlers: Vec<(u64, ChangeHandler)>,
    next_handler_id: u64,
}

impl<M: fmt::Debug> fmt::Debug for ObservableCollection<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableCollection")
            .field("items", &self.items)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<M> Default for ObservableCollection<M> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<M> ObservableCollection<M> {
    #[must_use]
    pub fn new(items: Vec<M>) -> Self {
        Self {
            items,
            handlers: Vec::new(),
            next_handler_id: 0,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[M] {
        &self.items
    }

    /// Registers a change handler and returns its id.
    pub fn subscribe(&mut self, handler: impl FnMut(CollectionChange) + 'static) -> u64 {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn unsubscribe(&mut self, id: u64) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        before != self.handlers.len()
    }

    pub fn insert(&mut self, index: usize, item: M) -> ChartResult<()> {
        if index > self.items.len() {
            return Err(ChartError::InvalidData(format!(
                "insert index {index} is out of bounds for length {}",
                self.items.len()
            )));
        }
        self.items.insert(index, item);
        self.notify(CollectionChange::Added {
            start: index,
            count: 1,
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notify(CollectionChange::Reset);
    }

    fn notify(&mut self, change: CollectionChange) {
        trace!(?change, handlers = self.handlers.len(), "collection changed");
        for (_, handler) in &mut self.handlers {
            handler(change);
        }
    }
}

impl<M: Clone> ModelSource<M> for ObservableCollection<M> {
    fn snapshot(&self) -> Vec<M> {
        self.items.clone()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl<M: Clone + PartialEq> IndexedSource<M> for ObservableCollection<M> {
    fn push(&mut self, item: M) {
        self.items.push(item);
        self.notify(CollectionChange::Added {
            start: self.items.len() - 1,
            count: 1,
        });
    }

    fn remove_item(&mut self, item: &M) -> bool {
        let Some(index) = self.items.iter().position(|entry| entry == item) else {
            return false;
        };
        self.items.remove(index);
        self.notify(CollectionChange::Removed { index, count: 1 });
        true
    }

    fn remove_at(&mut self, index: usize) -> Option<M> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.notify(CollectionChange::Removed { index, count: 1 });
        Some(removed)
    }
}

impl<M: Clone + PartialEq> RangeSource<M> for ObservableCollection<M> {
    fn add_range(&mut self, items: Vec<M>) {
        if items.is_empty() {
            return;
        }
        let start = self.items.len();
        let count = items.len();
        self.items.extend(items);
        self.notify(CollectionChange::Added { start, count });
    }

    fn remove_range(&mut self, items: &[M]) -> usize {
        let mut removed = 0;
        for item in items {
            if let Some(index) = self.items.iter().position(|entry| entry == item) {
                self.items.remove(index);
                removed += 1;
            }
        }
        if removed > 0 {
            self.notify(CollectionChange::Reset);
        }
        removed
    }
}

/// Models bound to a series, tagged with the mutation support decided when
/// the source was wrapped.
pub enum ItemsSource<M> {
    Empty,
    ReadOnly(Rc<RefCell<dyn ModelSource<M>>>),
    Indexed(Rc<RefCell<dyn IndexedSource<M>>>),
    Ranged(Rc<RefCell<dyn RangeSource<M>>>),
}

impl<M> fmt::Debug for ItemsSource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Empty => "Empty",
            Self::ReadOnly(_) => "ReadOnly",
            Self::Indexed(_) => "Indexed",
            Self::Ranged(_) => "Ranged",
        };
        f.debug_tuple("ItemsSource").field(&kind).finish()
    }
}

impl<M> Clone for ItemsSource<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::ReadOnly(source) => Self::ReadOnly(Rc::clone(source)),
            Self::Indexed(source) => Self::Indexed(Rc::clone(source)),
            Self::Ranged(source) => Self::Ranged(Rc::clone(source)),
        }
    }
}

impl<M> Default for ItemsSource<M> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<M: Clone + 'static> ItemsSource<M> {
    /// Iteration-only source; list mutations through the series fail.
    pub fn read_only<S: ModelSource<M> + 'static>(source: Rc<RefCell<S>>) -> Self {
        Self::ReadOnly(source)
    }

    pub fn indexed<S: IndexedSource<M> + 'static>(source: Rc<RefCell<S>>) -> Self {
        Self::Indexed(source)
    }

    pub fn ranged<S: RangeSource<M> + 'static>(source: Rc<RefCell<S>>) -> Self {
        Self::Ranged(source)
    }

    /// Owned vector supporting indexed mutation.
    #[must_use]
    pub fn from_vec(items: Vec<M>) -> Self
    where
        M: PartialEq,
    {
        Self::Indexed(Rc::new(RefCell::new(items)))
    }

    #[must_use]
    pub fn capabilities(&self) -> SourceCapabilities {
        match self {
            Self::Empty | Self::ReadOnly(_) => SourceCapabilities::default(),
            Self::Indexed(_) => SourceCapabilities {
                indexed_mutation: true,
                range_notification: false,
            },
            Self::Ranged(_) => SourceCapabilities {
                indexed_mutation: true,
                range_notification: true,
            },
        }
    }

    /// Frozen copy of the current content.
    ///
    /// Fails instead of panicking when the host holds a mutable borrow of
    /// the source at call time.
    pub fn snapshot(&self) -> ChartResult<Vec<M>> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::ReadOnly(source) => Ok(source.try_borrow().map_err(busy)?.snapshot()),
            Self::Indexed(source) => Ok(source.try_borrow().map_err(busy)?.snapshot()),
            Self::Ranged(source) => Ok(source.try_borrow().map_err(busy)?.snapshot()),
        }
    }

    /// Current item count; `0` while the host holds a mutable borrow.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::ReadOnly(source) => source.try_borrow().map_or(0, |source| source.len()),
            Self::Indexed(source) => source.try_borrow().map_or(0, |source| source.len()),
            Self::Ranged(source) => source.try_borrow().map_or(0, |source| source.len()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn with_indexed<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut dyn IndexedSource<M>) -> T,
    ) -> ChartResult<T> {
        match self {
            Self::Indexed(source) => Ok(apply(&mut *source.try_borrow_mut().map_err(busy)?)),
            Self::Ranged(source) => Ok(apply(&mut *source.try_borrow_mut().map_err(busy)?)),
            Self::Empty | Self::ReadOnly(_) => {
                Err(missing_capability(operation, Capability::IndexedMutation))
            }
        }
    }

    pub(crate) fn with_ranged<T>(
        &self,
        operation: &'static str,
        apply: impl FnOnce(&mut dyn RangeSource<M>) -> T,
    ) -> ChartResult<T> {
        match self {
            Self::Ranged(source) => Ok(apply(&mut *source.try_borrow_mut().map_err(busy)?)),
            _ => Err(missing_capability(
                operation,
                Capability::RangeNotification,
            )),
        }
    }
}

fn busy<E>(_: E) -> ChartError {
    ChartError::InvalidData("items source is borrowed elsewhere".to_owned())
}

fn missing_capability(operation: &'static str, capability: Capability) -> ChartError {
    ChartError::MissingCapability {
        property: "items_source",
        operation,
        capability,
    }
}
