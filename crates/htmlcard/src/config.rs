//! Card configuration and its validation.
//!
//! The host hands the card a JSON value once per instance. [`validate`] checks
//! the shape and normalizes it into a [`CardConfig`]; nested widget entries are
//! kept as opaque [`WidgetConfig`] values for the widget factory to interpret.

use crate::error::{CardError, CardResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::borrow::Cow;

/// Display name applied when the configuration omits one.
pub const DEFAULT_NAME: &str = "Generic html";

/// One nested widget configuration.
///
/// Opaque to the card apart from the `type`, `id` and `className` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig(Value);

impl WidgetConfig {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw configuration value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The `type` tag used by factories to pick a constructor.
    pub fn widget_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    /// Element identifier to apply to attribute-capable widgets.
    pub fn element_id(&self) -> Option<&str> {
        self.str_field("id")
    }

    /// Class name to apply to attribute-capable widgets.
    pub fn class_name(&self) -> Option<&str> {
        self.str_field("className")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for WidgetConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Normalized card configuration.
///
/// Identity fields are kept exactly as the host wrote them, whatever their
/// JSON type; the accessors read them as text where the card needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig {
    /// The card's own type tag, as written by the host.
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub card_type: Option<Value>,

    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<Value>,

    /// Inline style text and stylesheet URLs, in order. Entries stay raw so
    /// that non-textual ones can be dropped at render time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<Vec<Value>>,

    /// Script URLs, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jss: Option<Vec<Value>>,

    /// Nested widget configurations. Anything but a list means no children.
    #[serde(default, deserialize_with = "cards_or_empty")]
    pub cards: Vec<WidgetConfig>,

    /// Any other host-supplied keys, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CardConfig {
    /// Display name; non-text names are shown in their JSON form.
    pub fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Value::String(name) => Cow::Borrowed(name),
            other => Cow::Owned(other.to_string()),
        }
    }

    pub fn card_type(&self) -> Option<&str> {
        self.card_type.as_ref()?.as_str()
    }

    /// Element identifier, when given as text.
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref()?.as_str()
    }

    /// Class name, when given as text.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_ref()?.as_str()
    }

    /// Validate and normalize a JSON value. See [`validate`].
    pub fn from_value(value: &Value) -> CardResult<Self> {
        validate(Some(value))
    }

    /// Serialize back into the host's JSON shape.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl TryFrom<Value> for CardConfig {
    type Error = CardError;

    fn try_from(value: Value) -> CardResult<Self> {
        validate(Some(&value))
    }
}

/// Check a candidate configuration and normalize it.
///
/// Fails with [`CardError::InvalidConfiguration`] when the value is absent
/// (`None` or `null`), is not an object, or carries a non-null `styles` or
/// `jss` that is not an array. Every other field is kept as supplied, apart
/// from [`DEFAULT_NAME`] being applied when no name was given.
pub fn validate(candidate: Option<&Value>) -> CardResult<CardConfig> {
    let value = match candidate {
        None | Some(Value::Null) => return Err(CardError::invalid("configuration is missing")),
        Some(value) => value,
    };

    let Some(object) = value.as_object() else {
        return Err(CardError::invalid(format!(
            "expected an object, found {}",
            kind_of(value)
        )));
    };

    for field in ["styles", "jss"] {
        match object.get(field) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(CardError::invalid(format!(
                    "`{}` must be a list, found {}",
                    field,
                    kind_of(other)
                )));
            }
        }
    }

    serde_json::from_value(value.clone()).map_err(|err| CardError::invalid(err.to_string()))
}

/// Minimal valid configuration offered by host tooling as a starting point.
pub fn stub_config() -> Value {
    json!({ "cards": [] })
}

fn default_name() -> Value {
    Value::String(DEFAULT_NAME.to_string())
}

fn name_or_default<'de, D>(deserializer: D) -> Result<Value, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.unwrap_or_else(default_name))
}

fn cards_or_empty<'de, D>(deserializer: D) -> Result<Vec<WidgetConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(entries.into_iter().map(WidgetConfig::new).collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            tracing::warn!("Ignoring `cards`: expected a list, found {}", kind_of(&other));
            Ok(Vec::new())
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
