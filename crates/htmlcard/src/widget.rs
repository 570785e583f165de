//! Capability traits implemented by child widgets.
//!
//! Every child implements [`ChildWidget`]. Optional behaviour is exposed
//! through capability queries instead of type-name checks: a widget that can
//! carry an element id and class name returns itself from
//! [`ChildWidget::as_attributes_mut`].

use crate::context::Context;
use crate::element::Element;
use crate::error::WidgetError;
use crate::event::RebuildEmitter;
use std::any::Any;
use std::fmt;

/// Identity of a live child within one card.
///
/// Allocated by the card's factory and never reused, so a stale id can not
/// alias a newer child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Base trait for widgets hosted by a card.
pub trait ChildWidget: Any {
    /// Name for logs.
    fn debug_name(&self) -> &str {
        "ChildWidget"
    }

    /// Receive the shared context.
    ///
    /// Errors are isolated by the caller; returning one never stops delivery
    /// to sibling widgets.
    fn set_context(&mut self, context: &Context) -> Result<(), WidgetError>;

    /// Produce this widget's visual element.
    fn render(&self) -> Element;

    /// Hand the widget the emitter it uses to ask for its own replacement.
    fn connect_rebuild(&mut self, _emitter: RebuildEmitter) {}

    /// Called once the widget has been replaced and removed from its card.
    fn detached(&mut self) {}

    /// Handle queued work of the widget's own, such as rebuild requests of a
    /// nested card's children. Returns how many items were handled.
    fn process_pending(&mut self) -> Result<usize, WidgetError> {
        Ok(0)
    }

    /// Query if this widget accepts identity attributes.
    fn as_attributes(&self) -> Option<&dyn AttributeWidget> {
        None
    }

    /// Query if this widget accepts identity attributes (mutable).
    fn as_attributes_mut(&mut self) -> Option<&mut dyn AttributeWidget> {
        None
    }
}

/// Capability: widget carrying an element id and class name.
pub trait AttributeWidget: ChildWidget {
    fn element_id(&self) -> Option<&str>;

    fn set_element_id(&mut self, id: &str);

    fn class_name(&self) -> Option<&str>;

    fn set_class_name(&mut self, class_name: &str);
}
