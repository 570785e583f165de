//! Rebuild signalling between children and their card.
//!
//! A child asks to be replaced by emitting a [`RebuildSignal`] through its
//! [`RebuildEmitter`]. Signals queue up on the card's [`RebuildQueue`] and are
//! matched against [`RebuildListeners`], which deliver each registration at
//! most once.

use crate::config::WidgetConfig;
use crate::widget::InstanceId;
use htmlcard_core::alloc::HashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Name of the rebuild event, distinct from ordinary update notifications.
pub const REBUILD_EVENT: &str = "ll-rebuild";

/// Request from a child to be rebuilt in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildSignal {
    /// The child asking for replacement.
    pub source: InstanceId,
}

/// Pending rebuild signals of one card, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RebuildQueue {
    signals: Rc<RefCell<Vec<RebuildSignal>>>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, signal: RebuildSignal) {
        self.signals.borrow_mut().push(signal);
    }

    /// Take every pending signal.
    pub fn drain(&self) -> Vec<RebuildSignal> {
        std::mem::take(&mut *self.signals.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.signals.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.borrow().is_empty()
    }
}

/// Handle a child uses to emit its own rebuild signal.
#[derive(Debug, Clone)]
pub struct RebuildEmitter {
    source: InstanceId,
    queue: RebuildQueue,
}

impl RebuildEmitter {
    pub fn new(source: InstanceId, queue: RebuildQueue) -> Self {
        Self { source, queue }
    }

    /// The child this emitter belongs to.
    pub fn source(&self) -> InstanceId {
        self.source
    }

    pub fn emit(&self) {
        tracing::trace!("{} emitted by {}", REBUILD_EVENT, self.source);
        self.queue.push(RebuildSignal {
            source: self.source,
        });
    }
}

/// One-shot rebuild subscriptions, keyed by child.
///
/// Each entry remembers the configuration the child was built from. Taking an
/// entry is the delivery; a second signal for the same child finds nothing.
#[derive(Debug, Default)]
pub struct RebuildListeners {
    listeners: HashMap<InstanceId, WidgetConfig>,
}

impl RebuildListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, instance: InstanceId, config: WidgetConfig) {
        if self.listeners.insert(instance, config).is_some() {
            tracing::warn!("Replaced existing rebuild listener for {}", instance);
        }
    }

    /// Deliver a signal: remove and return the listener for `instance`.
    pub fn take(&mut self, instance: InstanceId) -> Option<WidgetConfig> {
        self.listeners.remove(&instance)
    }

    pub fn unsubscribe(&mut self, instance: InstanceId) -> bool {
        self.listeners.remove(&instance).is_some()
    }

    pub fn is_subscribed(&self, instance: InstanceId) -> bool {
        self.listeners.contains_key(&instance)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
