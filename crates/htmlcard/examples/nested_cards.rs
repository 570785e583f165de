//! Nested HTML cards example.
//!
//! This example shows:
//! - Registering widget types and the HTML card in a catalog
//! - Configuring a card that nests another card
//! - Forwarding a shared context down the tree
//! - Rebuilding one child in place
//!
//! Run with `RUST_LOG=htmlcard=debug` to see the card's log output, and set
//! `HTMLCARD_PROFILE=1` to serve puffin scopes on port 8585.

use htmlcard::{ChildWidget, Context, Element, HtmlCard, WidgetCatalog, WidgetError};
use htmlcard_core::config::{Config, ProfilingMode};
use htmlcard_core::{logging, profiling};
use serde_json::json;

/// Host state shared with every widget.
#[derive(Debug)]
struct Weather {
    temperature: f32,
}

/// Widget showing the current temperature.
struct Thermometer {
    label: String,
    reading: Option<f32>,
}

impl ChildWidget for Thermometer {
    fn debug_name(&self) -> &str {
        "Thermometer"
    }

    fn set_context(&mut self, context: &Context) -> Result<(), WidgetError> {
        let weather = context
            .downcast_ref::<Weather>()
            .ok_or_else(|| WidgetError::Rejected("expected weather state".to_string()))?;
        self.reading = Some(weather.temperature);
        Ok(())
    }

    fn render(&self) -> Element {
        let text = match self.reading {
            Some(t) => format!("{}: {:.1}°C", self.label, t),
            None => format!("{}: --", self.label),
        };
        Element::new("div").with_attr("class", "thermometer").with_text(text)
    }
}

fn main() {
    let config = Config {
        profiling: if std::env::var_os("HTMLCARD_PROFILE").is_some() {
            ProfilingMode::WithWebServer
        } else {
            ProfilingMode::Off
        },
        ..Config::default()
    };
    logging::init_with(&config);
    profiling::init_profiling(config.profiling);

    let catalog = WidgetCatalog::new();
    HtmlCard::register(&catalog);

    catalog.register_type("thermometer", |config, _| {
        let label = config.value()["label"].as_str().unwrap_or("Temperature");
        Ok(Box::new(Thermometer {
            label: label.to_string(),
            reading: None,
        }) as Box<dyn ChildWidget>)
    });

    for descriptor in catalog.custom_cards() {
        println!("Card available: {} ({})", descriptor.name, descriptor.type_tag());
    }

    let mut card = HtmlCard::new(catalog.clone());
    let card_config = json!({
        "name": "Weather",
        "styles": [".thermometer { font-weight: bold; }", "https://cdn.example.com/weather.css"],
        "jss": ["https://cdn.example.com/weather.js"],
        "cards": [
            { "type": "thermometer", "label": "Outside" },
            {
                "type": "custom:generic-html-card",
                "id": "indoor",
                "className": "compact",
                "cards": [
                    { "type": "thermometer", "label": "Kitchen" },
                    { "type": "thermometer", "label": "Office" },
                ],
            },
        ],
    });

    if let Err(e) = card.set_config(&card_config) {
        eprintln!("Invalid card configuration: {}", e);
        return;
    }

    let first = Context::new(Weather { temperature: 18.5 });
    card.set_context(Some(first.clone()));
    profiling::new_frame();
    if let Some(output) = card.perform_update() {
        println!("\nFirst render:\n{}", output.to_html());
    }

    // Same state object again: the update is suppressed.
    card.set_context(Some(first));
    println!("\nIdentical context re-rendered: {}", card.perform_update().is_some());

    card.set_context(Some(Context::new(Weather { temperature: 21.0 })));
    if let Some(output) = card.perform_update() {
        println!("\nAfter context change:\n{}", output.to_html());
    }

    // Rebuild the nested card; the outside thermometer keeps its instance.
    let before = card.children().ids();
    if let Some(nested) = card
        .children()
        .iter()
        .nth(1)
        .and_then(|slot| slot.downcast_ref::<HtmlCard>())
    {
        nested.request_rebuild();
    }

    match card.process_rebuilds() {
        Ok(handled) => println!("\nRebuilt {} child(ren)", handled),
        Err(e) => eprintln!("Rebuild failed: {}", e),
    }
    println!("Children before: {:?}", before);
    println!("Children after:  {:?}", card.children().ids());

    if let Some(output) = card.perform_update() {
        println!("\nAfter rebuild:\n{}", output.to_html());
    }
}
