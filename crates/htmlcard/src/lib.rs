//! htmlcard - a container card for widget dashboards
//!
//! An [`HtmlCard`] renders a list of declaratively configured child widgets in
//! one slot:
//! - children are built through an injected [`WidgetFactory`]
//! - the host's shared [`Context`] is forwarded to every child, but only when
//!   it actually changed (by identity)
//! - a child can ask to be rebuilt; it is replaced in place while its
//!   siblings keep their instances
//! - `styles` entries are split into an inline `<style>` block and stylesheet
//!   links; `jss` entries become script references
//!
//! ## Quick Start
//!
//! ```rust
//! use htmlcard::{ChildWidget, Context, Element, HtmlCard, WidgetCatalog, WidgetError};
//! use serde_json::json;
//!
//! struct Label(String);
//!
//! impl ChildWidget for Label {
//!     fn set_context(&mut self, _context: &Context) -> Result<(), WidgetError> {
//!         Ok(())
//!     }
//!
//!     fn render(&self) -> Element {
//!         Element::new("p").with_text(self.0.clone())
//!     }
//! }
//!
//! let catalog = WidgetCatalog::new();
//! HtmlCard::register(&catalog);
//! catalog.register_type("label", |config, _| {
//!     let text = config.value()["text"].as_str().unwrap_or_default();
//!     Ok(Box::new(Label(text.to_string())) as Box<dyn ChildWidget>)
//! });
//!
//! let mut card = HtmlCard::new(catalog.clone());
//! card.set_config(&json!({
//!     "styles": ["p { color: red; }", "https://example.com/theme.css"],
//!     "cards": [{ "type": "label", "text": "Hello" }],
//! }))?;
//!
//! card.set_context(Some(Context::new("host state")));
//! let output = card.perform_update().expect("first update renders");
//! assert_eq!(output.children().len(), 1);
//! # Ok::<(), htmlcard::CardError>(())
//! ```

pub mod card;
pub mod catalog;
pub mod config;
pub mod context;
pub mod element;
pub mod error;
pub mod event;
pub mod factory;
pub mod registry;
pub mod render;
pub mod resources;
pub mod update;
pub mod widget;

pub use card::{CARD_NAME, CARD_TYPE, HtmlCard};
pub use catalog::{CardDescriptor, WidgetCatalog};
pub use config::{CardConfig, DEFAULT_NAME, WidgetConfig};
pub use context::{Context, ContextPropagator, Propagation};
pub use element::{Element, Node};
pub use error::{CardError, CardResult, WidgetError};
pub use event::{REBUILD_EVENT, RebuildEmitter, RebuildSignal};
pub use factory::{ChildWidgetFactory, WidgetFactory};
pub use registry::{ChildRegistry, ChildSlot, Replacement};
pub use render::{RenderNode, RenderOutput};
pub use resources::ClassifiedResources;
pub use update::{CardState, UpdateFlags};
pub use widget::{AttributeWidget, ChildWidget, InstanceId};
