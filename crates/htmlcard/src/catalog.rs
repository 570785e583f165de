//! Catalog of widget types known to a host.
//!
//! The catalog plays two roles. It is the list of custom cards a host offers
//! in its card picker, filled once at load time through
//! [`WidgetCatalog::register_card`]. It is also a [`WidgetFactory`] that
//! dispatches on a configuration's `type` tag, so cards built from it can nest
//! any registered type, including themselves.

use crate::config::WidgetConfig;
use crate::error::WidgetError;
use crate::factory::WidgetFactory;
use crate::widget::ChildWidget;
use htmlcard_core::alloc::HashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Prefix hosts put in front of custom card type tags.
pub const CUSTOM_PREFIX: &str = "custom:";

/// Entry shown in a host's card picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDescriptor {
    /// Stable type identifier, without [`CUSTOM_PREFIX`].
    pub card_type: String,
    pub name: String,
    pub description: String,
}

impl CardDescriptor {
    pub fn new(
        card_type: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            card_type: card_type.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// The tag configurations use to refer to this card.
    pub fn type_tag(&self) -> String {
        format!("{}{}", CUSTOM_PREFIX, self.card_type)
    }
}

/// Builds one widget type. Receives the catalog itself as a factory so
/// containers can build their own children.
pub type WidgetConstructor =
    Box<dyn Fn(&WidgetConfig, &Rc<dyn WidgetFactory>) -> Result<Box<dyn ChildWidget>, WidgetError>>;

/// Type-tag registry and dispatching factory.
pub struct WidgetCatalog {
    constructors: RefCell<HashMap<String, WidgetConstructor>>,
    custom_cards: RefCell<Vec<CardDescriptor>>,
    this: Weak<WidgetCatalog>,
}

impl WidgetCatalog {
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            constructors: RefCell::new(HashMap::new()),
            custom_cards: RefCell::new(Vec::new()),
            this: this.clone(),
        })
    }

    /// Register a built-in widget type under its bare tag.
    pub fn register_type<F>(&self, type_tag: impl Into<String>, constructor: F)
    where
        F: Fn(&WidgetConfig, &Rc<dyn WidgetFactory>) -> Result<Box<dyn ChildWidget>, WidgetError>
            + 'static,
    {
        let type_tag = type_tag.into();
        tracing::debug!("Registered widget type `{}`", type_tag);
        self.insert(type_tag, Box::new(constructor));
    }

    /// Advertise a custom card in the picker and make it buildable under
    /// `custom:<card_type>`.
    pub fn register_card<F>(&self, descriptor: CardDescriptor, constructor: F)
    where
        F: Fn(&WidgetConfig, &Rc<dyn WidgetFactory>) -> Result<Box<dyn ChildWidget>, WidgetError>
            + 'static,
    {
        tracing::info!(
            "Registered custom card `{}` ({})",
            descriptor.card_type,
            descriptor.name
        );
        self.insert(descriptor.type_tag(), Box::new(constructor));

        let mut cards = self.custom_cards.borrow_mut();
        match cards
            .iter_mut()
            .find(|card| card.card_type == descriptor.card_type)
        {
            Some(existing) => *existing = descriptor,
            None => cards.push(descriptor),
        }
    }

    /// Custom cards in registration order.
    pub fn custom_cards(&self) -> Vec<CardDescriptor> {
        self.custom_cards.borrow().clone()
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.constructors.borrow().contains_key(type_tag)
    }

    /// Number of buildable types.
    pub fn len(&self) -> usize {
        self.constructors.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.borrow().is_empty()
    }

    fn insert(&self, type_tag: String, constructor: WidgetConstructor) {
        if self
            .constructors
            .borrow_mut()
            .insert(type_tag.clone(), constructor)
            .is_some()
        {
            tracing::warn!("Widget type `{}` registered twice, keeping the newest", type_tag);
        }
    }
}

impl WidgetFactory for WidgetCatalog {
    fn create(&self, config: &WidgetConfig) -> Result<Box<dyn ChildWidget>, WidgetError> {
        let type_tag = config.widget_type().ok_or(WidgetError::MissingType)?;
        let factory: Rc<dyn WidgetFactory> = self
            .this
            .upgrade()
            .ok_or_else(|| WidgetError::Rejected("widget catalog was dropped".to_string()))?;

        let constructors = self.constructors.borrow();
        let constructor = constructors
            .get(type_tag)
            .ok_or_else(|| WidgetError::UnknownType(type_tag.to_string()))?;
        constructor(config, &factory)
    }
}

impl fmt::Debug for WidgetCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.constructors.borrow().keys().cloned().collect();
        types.sort();
        f.debug_struct("WidgetCatalog")
            .field("types", &types)
            .field("custom_cards", &self.custom_cards.borrow())
            .finish()
    }
}
