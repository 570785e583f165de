//! Child construction.
//!
//! [`WidgetFactory`] is the external capability that turns one configuration
//! into a widget. [`ChildWidgetFactory`] wraps it and finishes the wiring a
//! card needs: identity, context, attributes and the one-shot rebuild listener.

use crate::config::WidgetConfig;
use crate::context::Context;
use crate::error::{CardError, CardResult, WidgetError};
use crate::event::{RebuildEmitter, RebuildListeners, RebuildQueue, RebuildSignal};
use crate::registry::ChildSlot;
use crate::widget::{ChildWidget, InstanceId};
use std::rc::Rc;

/// Creates a live widget from its configuration.
pub trait WidgetFactory {
    fn create(&self, config: &WidgetConfig) -> Result<Box<dyn ChildWidget>, WidgetError>;
}

impl<F> WidgetFactory for F
where
    F: Fn(&WidgetConfig) -> Result<Box<dyn ChildWidget>, WidgetError>,
{
    fn create(&self, config: &WidgetConfig) -> Result<Box<dyn ChildWidget>, WidgetError> {
        self(config)
    }
}

/// Builds fully wired children for one card.
pub struct ChildWidgetFactory {
    source: Rc<dyn WidgetFactory>,
    queue: RebuildQueue,
    listeners: RebuildListeners,
    next_id: u64,
}

impl ChildWidgetFactory {
    pub fn new(source: Rc<dyn WidgetFactory>) -> Self {
        Self {
            source,
            queue: RebuildQueue::new(),
            listeners: RebuildListeners::new(),
            next_id: 0,
        }
    }

    /// The injected widget factory.
    pub fn source(&self) -> &Rc<dyn WidgetFactory> {
        &self.source
    }

    /// Queue receiving rebuild signals from this factory's children.
    pub fn queue(&self) -> &RebuildQueue {
        &self.queue
    }

    pub fn listeners(&self) -> &RebuildListeners {
        &self.listeners
    }

    /// Create and wire one child.
    ///
    /// A context rejection is logged and ignored; the child is still returned.
    pub fn build(
        &mut self,
        config: &WidgetConfig,
        context: Option<&Context>,
    ) -> CardResult<ChildSlot> {
        let mut widget =
            self.source
                .create(config)
                .map_err(|source| CardError::ChildInstantiation {
                    widget_type: config.widget_type().unwrap_or("<untyped>").to_string(),
                    source,
                })?;

        let id = InstanceId::from_raw(self.next_id);
        self.next_id += 1;

        if let Some(context) = context {
            if let Err(e) = widget.set_context(context) {
                tracing::warn!(
                    "Widget {} ({}) rejected the context at creation: {}",
                    id,
                    widget.debug_name(),
                    e
                );
            }
        }

        if let Some(attributes) = widget.as_attributes_mut() {
            if let Some(element_id) = config.element_id() {
                attributes.set_element_id(element_id);
            }
            if let Some(class_name) = config.class_name() {
                attributes.set_class_name(class_name);
            }
        }

        widget.connect_rebuild(RebuildEmitter::new(id, self.queue.clone()));
        self.listeners.subscribe(id, config.clone());

        tracing::debug!("Built child {} ({})", id, widget.debug_name());
        Ok(ChildSlot::new(id, widget))
    }

    /// Deliver `signal`, consuming its listener. `None` if already delivered
    /// or never registered.
    pub fn take_listener(&mut self, signal: RebuildSignal) -> Option<WidgetConfig> {
        self.listeners.take(signal.source)
    }

    /// Put a listener back after a failed replacement.
    pub fn rearm(&mut self, instance: InstanceId, config: WidgetConfig) {
        self.listeners.subscribe(instance, config);
    }

    /// Drop the listener of a child that is going away.
    pub fn release(&mut self, instance: InstanceId) {
        self.listeners.unsubscribe(instance);
    }

    pub fn drain_signals(&self) -> Vec<RebuildSignal> {
        self.queue.drain()
    }
}
