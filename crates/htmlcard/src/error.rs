//! Error types for the card and its children.

use crate::widget::InstanceId;
use thiserror::Error;

/// Errors surfaced by [`HtmlCard`](crate::HtmlCard) operations.
#[derive(Debug, Error)]
pub enum CardError {
    /// The configuration is absent or has the wrong shape.
    ///
    /// The card refuses it and keeps whatever state it had before.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// What was wrong with the configuration.
        reason: String,
    },

    /// The widget factory failed to create a child.
    #[error("Failed to create child widget `{widget_type}`: {source}")]
    ChildInstantiation {
        /// Type tag of the entry that failed, or `<untyped>`.
        widget_type: String,
        #[source]
        source: WidgetError,
    },

    /// A child rejected the forwarded context.
    ///
    /// Never returned from a card operation; collected in
    /// [`Propagation::failures`](crate::context::Propagation) instead.
    #[error("Widget {instance} rejected the context: {source}")]
    ContextAssignment {
        instance: InstanceId,
        #[source]
        source: WidgetError,
    },

    /// A child failed while handling its own queued work.
    #[error("Widget {instance} failed its pending work: {source}")]
    PendingWork {
        instance: InstanceId,
        #[source]
        source: WidgetError,
    },
}

impl CardError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CardError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Unwrap a nested card's own error; other widget errors are tagged with
    /// the child they came from.
    pub(crate) fn nested(instance: InstanceId, source: WidgetError) -> Self {
        match source {
            WidgetError::Card(err) => *err,
            source => CardError::PendingWork { instance, source },
        }
    }

    /// Whether this is an [`CardError::InvalidConfiguration`].
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, CardError::InvalidConfiguration { .. })
    }
}

/// Errors reported by widgets and widget factories.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The widget configuration carries no `type` tag.
    #[error("widget configuration has no `type`")]
    MissingType,

    /// No constructor is registered for the type tag.
    #[error("unknown widget type `{0}`")]
    UnknownType(String),

    /// The widget refused an operation.
    #[error("{0}")]
    Rejected(String),

    /// A nested card failed.
    #[error(transparent)]
    Card(Box<CardError>),
}

impl From<CardError> for WidgetError {
    fn from(err: CardError) -> Self {
        WidgetError::Card(Box::new(err))
    }
}

/// Result type alias for card operations.
pub type CardResult<T> = Result<T, CardError>;
