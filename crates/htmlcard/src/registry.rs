//! Ordered collection of a card's live children.

use crate::config::WidgetConfig;
use crate::context::Context;
use crate::error::CardResult;
use crate::factory::ChildWidgetFactory;
use crate::widget::{ChildWidget, InstanceId};
use std::any::Any;
use std::fmt;

/// A live child and its identity.
pub struct ChildSlot {
    id: InstanceId,
    widget: Box<dyn ChildWidget>,
}

impl ChildSlot {
    pub fn new(id: InstanceId, widget: Box<dyn ChildWidget>) -> Self {
        Self { id, widget }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn widget(&self) -> &dyn ChildWidget {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> &mut dyn ChildWidget {
        self.widget.as_mut()
    }

    /// Borrow the widget as its concrete type.
    pub fn downcast_ref<T: ChildWidget>(&self) -> Option<&T> {
        let any: &dyn Any = self.widget.as_ref();
        any.downcast_ref()
    }
}

impl fmt::Debug for ChildSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSlot")
            .field("id", &self.id)
            .field("widget", &self.widget.debug_name())
            .finish()
    }
}

/// Outcome of [`ChildRegistry::replace`].
#[derive(Debug)]
pub enum Replacement {
    /// The child at `position` was swapped; `previous` has been detached.
    Replaced {
        position: usize,
        previous: ChildSlot,
        current: InstanceId,
    },
    /// The child is no longer present; nothing changed.
    Stale,
}

/// Children in configuration order.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    slots: Vec<ChildSlot>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one child per configuration, in order.
    ///
    /// On failure the listeners of children already built here are released
    /// and the error is returned; no partial registry is produced.
    pub fn initialize(
        factory: &mut ChildWidgetFactory,
        configs: &[WidgetConfig],
        context: Option<&Context>,
    ) -> CardResult<Self> {
        let mut slots = Vec::with_capacity(configs.len());
        for config in configs {
            match factory.build(config, context) {
                Ok(slot) => slots.push(slot),
                Err(e) => {
                    for slot in &slots {
                        factory.release(slot.id());
                    }
                    return Err(e);
                }
            }
        }
        Ok(Self { slots })
    }

    /// Swap the child `old` for a fresh one built from `config`.
    ///
    /// Every other slot keeps its position and instance.
    pub fn replace(
        &mut self,
        old: InstanceId,
        config: &WidgetConfig,
        factory: &mut ChildWidgetFactory,
        context: Option<&Context>,
    ) -> CardResult<Replacement> {
        let Some(position) = self.position(old) else {
            tracing::debug!("Ignoring rebuild of {}, no longer present", old);
            return Ok(Replacement::Stale);
        };

        let replacement = factory.build(config, context)?;
        let current = replacement.id();
        let mut previous = std::mem::replace(&mut self.slots[position], replacement);
        previous.widget_mut().detached();

        tracing::debug!("Replaced child {} with {} at {}", old, current, position);
        Ok(Replacement::Replaced {
            position,
            previous,
            current,
        })
    }

    pub fn position(&self, id: InstanceId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn get(&self, id: InstanceId) -> Option<&ChildSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.slots.iter().map(ChildSlot::id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChildSlot> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ChildSlot> {
        self.slots.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Detach every child and hand back their ids.
    pub(crate) fn detach_all(&mut self) -> Vec<InstanceId> {
        self.slots
            .drain(..)
            .map(|mut slot| {
                slot.widget.detached();
                slot.id
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ChildRegistry {
    type Item = &'a ChildSlot;
    type IntoIter = std::slice::Iter<'a, ChildSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
