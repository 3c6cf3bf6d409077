//! Fine-grained reactive signals
//!
//! A minimal signal graph: values live in a slotmap, observers record which
//! signals they read while tracking, and writing a signal marks every observer
//! that read it dirty. Re-running dirty observers is left to the owner (see
//! [`Composer`](crate::Composer)).

use std::any::Any;
use std::marker::PhantomData;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

new_key_type! {
    /// Unique identifier for a signal
    pub struct SignalId;

    /// Unique identifier for an observer
    pub struct ObserverId;
}

/// Typed handle to a signal stored in a [`ReactiveGraph`].
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Signal<T> {
    pub fn id(&self) -> SignalId {
        self.id
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Signal").field(&self.id).finish()
    }
}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Signal<T> {}

struct SignalNode {
    value: Box<dyn Any + Send>,
    subscribers: SmallVec<[ObserverId; 4]>,
    version: u64,
}

#[derive(Default)]
struct ObserverNode {
    dependencies: SmallVec<[SignalId; 4]>,
    dirty: bool,
}

/// Signal storage plus dependency edges.
#[derive(Default)]
pub struct ReactiveGraph {
    signals: SlotMap<SignalId, SignalNode>,
    observers: SlotMap<ObserverId, ObserverNode>,
    tracking: SmallVec<[ObserverId; 2]>,
}

impl ReactiveGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a signal holding `value`.
    pub fn create_signal<T: Send + 'static>(&mut self, value: T) -> Signal<T> {
        let id = self.signals.insert(SignalNode {
            value: Box::new(value),
            subscribers: SmallVec::new(),
            version: 0,
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    /// Read a signal, recording a dependency for the observer being tracked.
    pub fn get<T: Clone + 'static>(&mut self, signal: Signal<T>) -> Option<T> {
        self.track(signal.id);
        self.peek(signal)
    }

    /// Read a signal without recording a dependency.
    pub fn peek<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>())
            .cloned()
    }

    /// Record that the observer being tracked depends on `id`.
    pub fn track(&mut self, id: SignalId) {
        let Some(&observer) = self.tracking.last() else {
            return;
        };
        let (Some(signal), Some(node)) = (self.signals.get_mut(id), self.observers.get_mut(observer))
        else {
            return;
        };
        if !node.dependencies.contains(&id) {
            node.dependencies.push(id);
        }
        if !signal.subscribers.contains(&observer) {
            signal.subscribers.push(observer);
        }
    }

    /// Replace a signal's value and mark its subscribers dirty.
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        let Some(node) = self.signals.get_mut(signal.id) else {
            return;
        };
        node.value = Box::new(value);
        node.version += 1;
        for &observer in &node.subscribers {
            if let Some(obs) = self.observers.get_mut(observer) {
                trace!(?observer, signal = ?signal.id, "observer marked dirty");
                obs.dirty = true;
            }
        }
    }

    /// Like [`set`](Self::set), but only when the value actually changes.
    ///
    /// Returns whether the signal was written.
    pub fn set_if_changed<T: PartialEq + Send + 'static>(
        &mut self,
        signal: Signal<T>,
        value: T,
    ) -> bool {
        let unchanged = self
            .signals
            .get(signal.id)
            .and_then(|node| node.value.downcast_ref::<T>())
            .is_some_and(|current| *current == value);
        if unchanged {
            return false;
        }
        self.set(signal, value);
        true
    }

    /// Number of writes a signal has seen.
    pub fn version<T>(&self, signal: Signal<T>) -> Option<u64> {
        self.signals.get(signal.id).map(|node| node.version)
    }

    pub fn dispose_signal<T>(&mut self, signal: Signal<T>) {
        let Some(node) = self.signals.remove(signal.id) else {
            return;
        };
        for observer in node.subscribers {
            if let Some(obs) = self.observers.get_mut(observer) {
                obs.dependencies.retain(|dep| *dep != signal.id);
            }
        }
    }

    pub fn create_observer(&mut self) -> ObserverId {
        self.observers.insert(ObserverNode::default())
    }

    /// Start a tracking epoch: old dependencies are dropped, the observer is
    /// clean, and tracked reads are attributed to it until
    /// [`end_tracking`](Self::end_tracking).
    pub fn begin_tracking(&mut self, observer: ObserverId) {
        let Some(node) = self.observers.get_mut(observer) else {
            return;
        };
        node.dirty = false;
        for dep in std::mem::take(&mut node.dependencies) {
            if let Some(signal) = self.signals.get_mut(dep) {
                signal.subscribers.retain(|s| *s != observer);
            }
        }
        self.tracking.push(observer);
    }

    pub fn end_tracking(&mut self, observer: ObserverId) {
        if let Some(pos) = self.tracking.iter().rposition(|o| *o == observer) {
            self.tracking.remove(pos);
        }
    }

    pub fn is_dirty(&self, observer: ObserverId) -> bool {
        self.observers.get(observer).is_some_and(|node| node.dirty)
    }

    /// Signals read during the observer's last tracking epoch.
    pub fn dependencies(&self, observer: ObserverId) -> &[SignalId] {
        self.observers
            .get(observer)
            .map(|node| node.dependencies.as_slice())
            .unwrap_or(&[])
    }

    pub fn dispose_observer(&mut self, observer: ObserverId) {
        let Some(node) = self.observers.remove(observer) else {
            return;
        };
        for dep in node.dependencies {
            if let Some(signal) = self.signals.get_mut(dep) {
                signal.subscribers.retain(|s| *s != observer);
            }
        }
        self.tracking.retain(|o| *o != observer);
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }
}
