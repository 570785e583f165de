//! The HTML card container.

use crate::catalog::{CardDescriptor, WidgetCatalog};
use crate::config::{self, CardConfig};
use crate::context::{Context, ContextPropagator, Propagation};
use crate::element::Element;
use crate::error::{CardError, CardResult, WidgetError};
use crate::event::{RebuildEmitter, RebuildSignal};
use crate::factory::{ChildWidgetFactory, WidgetFactory};
use crate::registry::{ChildRegistry, Replacement};
use crate::render::{self, RenderOutput};
use crate::update::{CardState, UpdateFlags, should_render};
use crate::widget::{AttributeWidget, ChildWidget};
use serde_json::Value;
use std::rc::Rc;

/// Type identifier advertised to hosts.
pub const CARD_TYPE: &str = "generic-html-card";

/// Name shown in a host's card picker.
pub const CARD_NAME: &str = "Generic HTML Card";

pub const CARD_DESCRIPTION: &str =
    "Stacks child cards in one slot together with custom styles and scripts";

/// Container rendering a list of child widgets plus style and script resources.
///
/// # Lifecycle
///
/// 1. [`set_config`](Self::set_config) validates the configuration and builds
///    every child; the card becomes [`CardState::Ready`].
/// 2. The host assigns its state with [`set_context`](Self::set_context) and
///    runs [`perform_update`](Self::perform_update), which acts only when
///    something relevant changed: a new context reaches the children first,
///    then the card renders.
/// 3. Children that become invalid emit a rebuild signal; the host drains them
///    with [`process_rebuilds`](Self::process_rebuilds) and each one is
///    replaced in place.
///
/// # Example
///
/// ```
/// use htmlcard::{HtmlCard, WidgetCatalog};
/// use serde_json::json;
///
/// let catalog = WidgetCatalog::new();
/// HtmlCard::register(&catalog);
///
/// let mut card = HtmlCard::new(catalog.clone());
/// card.set_config(&json!({ "styles": ["h1 { margin: 0 }"], "cards": [] }))?;
///
/// let output = card.perform_update().expect("configuration renders");
/// assert_eq!(output.to_html(), "<style>h1 { margin: 0 }\n\n</style>");
/// # Ok::<(), htmlcard::CardError>(())
/// ```
pub struct HtmlCard {
    factory: ChildWidgetFactory,
    config: Option<CardConfig>,
    children: ChildRegistry,
    context: Option<Context>,
    propagator: ContextPropagator,
    pending: UpdateFlags,
    element_id: Option<String>,
    class_name: Option<String>,
    rebuild: Option<RebuildEmitter>,
}

impl HtmlCard {
    pub fn new(factory: Rc<dyn WidgetFactory>) -> Self {
        Self {
            factory: ChildWidgetFactory::new(factory),
            config: None,
            children: ChildRegistry::new(),
            context: None,
            propagator: ContextPropagator::new(),
            pending: UpdateFlags::NONE,
            element_id: None,
            class_name: None,
            rebuild: None,
        }
    }

    /// Picker entry for this card type.
    pub fn descriptor() -> CardDescriptor {
        CardDescriptor::new(CARD_TYPE, CARD_NAME, CARD_DESCRIPTION)
    }

    /// Advertise the card to `catalog` and make it buildable, nested
    /// included, under `custom:generic-html-card`.
    pub fn register(catalog: &WidgetCatalog) {
        catalog.register_card(Self::descriptor(), |config, factory| {
            let mut card = HtmlCard::new(factory.clone());
            card.set_config(config.value())?;
            Ok(Box::new(card) as Box<dyn ChildWidget>)
        });
    }

    /// Minimal valid configuration for "create default" tooling.
    pub fn stub_config() -> Value {
        config::stub_config()
    }

    pub fn state(&self) -> CardState {
        if self.config.is_some() {
            CardState::Ready
        } else {
            CardState::Uninitialized
        }
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    pub fn children(&self) -> &ChildRegistry {
        &self.children
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Changes waiting for the next [`perform_update`](Self::perform_update).
    pub fn pending(&self) -> UpdateFlags {
        self.pending
    }

    /// Number of context propagation passes so far.
    pub fn propagation_passes(&self) -> u64 {
        self.propagator.passes()
    }

    /// Apply a configuration and rebuild all children.
    ///
    /// On error nothing changes: the previous configuration and children (if
    /// any) stay in place.
    pub fn set_config(&mut self, value: &Value) -> CardResult<()> {
        let config = config::validate(Some(value))?;
        let children =
            ChildRegistry::initialize(&mut self.factory, &config.cards, self.context.as_ref())?;

        for id in self.children.detach_all() {
            self.factory.release(id);
        }
        self.children = children;
        self.propagator.observe(self.context.as_ref());
        self.pending |= UpdateFlags::CONFIG;

        tracing::debug!(
            "Configured `{}` with {} children",
            config.name(),
            self.children.len()
        );
        self.config = Some(config);
        Ok(())
    }

    /// Assign the host context. Reassigning the identical value is a no-op.
    pub fn set_context(&mut self, context: Option<Context>) {
        if Context::same(self.context.as_ref(), context.as_ref()) {
            return;
        }
        self.context = context;
        self.pending |= UpdateFlags::CONTEXT;
    }

    /// Note host changes. Only [`UpdateFlags::HOST`] bits are accepted;
    /// `CONFIG` and `CHILDREN` are raised by the card itself.
    pub fn request_update(&mut self, flags: UpdateFlags) {
        let ignored = flags - UpdateFlags::HOST;
        if !ignored.is_empty() {
            tracing::trace!("Ignoring card-internal update flags {:?}", ignored);
        }
        self.pending |= flags & UpdateFlags::HOST;
    }

    /// Run one update cycle over the pending changes.
    ///
    /// Returns the rendered output, or `None` when the update was suppressed.
    /// A changed context is forwarded to every child before rendering, so the
    /// output shows children holding the new context.
    pub fn perform_update(&mut self) -> Option<RenderOutput> {
        let flags = std::mem::take(&mut self.pending);
        let context_changed = self.propagator.needs_propagation(self.context.as_ref());

        if !should_render(self.state(), flags, context_changed) {
            tracing::trace!("Update suppressed ({:?}, {:?})", self.state(), flags);
            return None;
        }

        if flags.contains(UpdateFlags::CONTEXT) {
            self.propagate_context();
        }
        Some(self.render())
    }

    /// Render the current state. Does not touch children or pending changes,
    /// so repeated calls give equal output.
    pub fn render(&self) -> RenderOutput {
        match &self.config {
            Some(config) => render::render(config, &self.children),
            None => RenderOutput::default(),
        }
    }

    fn propagate_context(&mut self) -> Option<Propagation> {
        self.propagator
            .propagate(self.context.as_ref(), &mut self.children)
    }

    /// Handle one rebuild signal.
    ///
    /// Returns `Ok(true)` if a child was replaced and `Ok(false)` for a signal
    /// that was already handled or refers to a child that is gone. If the
    /// replacement can not be built the old child stays and may signal again.
    pub fn handle_rebuild(&mut self, signal: RebuildSignal) -> CardResult<bool> {
        let Some(config) = self.factory.take_listener(signal) else {
            tracing::debug!("Rebuild signal from {} already handled", signal.source);
            return Ok(false);
        };

        match self.children.replace(
            signal.source,
            &config,
            &mut self.factory,
            self.context.as_ref(),
        ) {
            Ok(Replacement::Replaced { .. }) => {
                self.pending |= UpdateFlags::CHILDREN;
                Ok(true)
            }
            Ok(Replacement::Stale) => Ok(false),
            Err(e) => {
                self.factory.rearm(signal.source, config);
                Err(e)
            }
        }
    }

    /// Handle every queued rebuild signal in arrival order, then let children
    /// handle their own queues.
    ///
    /// All signals are processed even if some fail; the first failure is
    /// returned afterwards.
    pub fn process_rebuilds(&mut self) -> CardResult<usize> {
        let mut handled = 0;
        let mut first_error = None;

        for signal in self.factory.drain_signals() {
            match self.handle_rebuild(signal) {
                Ok(true) => handled += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!("Failed to rebuild {}: {}", signal.source, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        let mut nested = 0;
        let mut nested_failed = false;
        for slot in self.children.iter_mut() {
            match slot.widget_mut().process_pending() {
                Ok(count) => nested += count,
                Err(source) => {
                    tracing::warn!("Widget {} failed its pending work: {}", slot.id(), source);
                    nested_failed = true;
                    first_error.get_or_insert(CardError::nested(slot.id(), source));
                }
            }
        }
        if nested > 0 || nested_failed {
            // A nested child may have changed, so this card's surface did too.
            self.pending |= UpdateFlags::CHILDREN;
            handled += nested;
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(handled),
        }
    }

    /// Ask the card's own parent to rebuild it. `false` when not nested.
    pub fn request_rebuild(&self) -> bool {
        match &self.rebuild {
            Some(emitter) => {
                emitter.emit();
                true
            }
            None => false,
        }
    }
}

impl ChildWidget for HtmlCard {
    fn debug_name(&self) -> &str {
        CARD_TYPE
    }

    fn set_context(&mut self, context: &Context) -> Result<(), WidgetError> {
        HtmlCard::set_context(self, Some(context.clone()));
        self.perform_update();
        Ok(())
    }

    fn render(&self) -> Element {
        let mut element = Element::new(CARD_TYPE);
        if let Some(id) = self.element_id() {
            element.set_attr("id", id);
        }
        if let Some(class_name) = self.class_name() {
            element.set_attr("class", class_name);
        }
        element.with_children(HtmlCard::render(self).to_elements())
    }

    fn connect_rebuild(&mut self, emitter: RebuildEmitter) {
        self.rebuild = Some(emitter);
    }

    fn detached(&mut self) {
        self.rebuild = None;
        let released = self.children.detach_all();
        for id in &released {
            self.factory.release(*id);
        }
        tracing::debug!("Nested card with {} children detached", released.len());
    }

    fn process_pending(&mut self) -> Result<usize, WidgetError> {
        self.process_rebuilds().map_err(WidgetError::from)
    }

    fn as_attributes(&self) -> Option<&dyn AttributeWidget> {
        Some(self)
    }

    fn as_attributes_mut(&mut self) -> Option<&mut dyn AttributeWidget> {
        Some(self)
    }
}

impl AttributeWidget for HtmlCard {
    /// The id applied by a parent, else the one in the card's own configuration.
    fn element_id(&self) -> Option<&str> {
        self.element_id
            .as_deref()
            .or_else(|| self.config.as_ref()?.id())
    }

    fn set_element_id(&mut self, id: &str) {
        self.element_id = Some(id.to_string());
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name
            .as_deref()
            .or_else(|| self.config.as_ref()?.class_name())
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = Some(class_name.to_string());
    }
}

