//! Test utilities for htmlcard.
//!
//! Provides a [`MockFactory`] that builds [`MockWidget`]s and keeps a
//! [`MockProbe`] for every widget it creates, so tests can observe a child
//! after the card has taken ownership of it.
//!
//! # Example
//!
//! ```rust
//! use htmlcard::{Context, HtmlCard};
//! use htmlcard_test_utils::MockFactory;
//! use serde_json::json;
//!
//! let factory = MockFactory::new();
//! let mut card = HtmlCard::new(factory.clone());
//! card.set_config(&json!({ "cards": [{ "type": "A" }] })).unwrap();
//!
//! card.set_context(Some(Context::new(1u32)));
//! card.perform_update();
//!
//! assert_eq!(factory.probes()[0].context_assignments(), 1);
//! ```

pub mod mock_widget;

pub use mock_widget::*;
