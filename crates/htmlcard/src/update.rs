//! Update suppression.
//!
//! Hosts poke the card whenever their own state changes. Most of those pokes
//! are irrelevant; the rules here decide which ones lead to a render pass.

use bitflags::bitflags;

bitflags! {
    /// What changed since the last update cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct UpdateFlags: u8 {
        /// No changes
        const NONE     = 0b0000;

        /// A configuration was accepted and the children were rebuilt.
        const CONFIG   = 0b0001;

        /// The shared context was reassigned.
        const CONTEXT  = 0b0010;

        /// Some other host state changed. Never renders on its own.
        const EXTERNAL = 0b0100;

        /// A child was replaced after asking to be rebuilt.
        const CHILDREN = 0b1000;

        /// Flags a host may raise through `HtmlCard::request_update`.
        const HOST = Self::CONTEXT.bits() | Self::EXTERNAL.bits();
    }
}

/// Lifecycle of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardState {
    /// No configuration yet; every update is ignored.
    #[default]
    Uninitialized,
    /// Configured and holding its children.
    Ready,
}

impl CardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CardState::Ready)
    }
}

/// Whether pending `flags` warrant a render pass.
///
/// `context_changed` is the identity comparison of the current context with
/// the last observed one.
pub fn should_render(state: CardState, flags: UpdateFlags, context_changed: bool) -> bool {
    match state {
        CardState::Uninitialized => false,
        CardState::Ready => {
            flags.intersects(UpdateFlags::CONFIG | UpdateFlags::CHILDREN)
                || (flags.contains(UpdateFlags::CONTEXT) && context_changed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_ignores_everything() {
        let all = UpdateFlags::all();
        assert!(!should_render(CardState::Uninitialized, all, true));
    }

    #[test]
    fn test_config_always_renders_when_ready() {
        assert!(should_render(CardState::Ready, UpdateFlags::CONFIG, false));
    }

    #[test]
    fn test_replaced_child_renders() {
        assert!(should_render(CardState::Ready, UpdateFlags::CHILDREN, false));
    }

    #[test]
    fn test_context_renders_only_when_changed() {
        assert!(should_render(CardState::Ready, UpdateFlags::CONTEXT, true));
        assert!(!should_render(CardState::Ready, UpdateFlags::CONTEXT, false));
    }

    #[test]
    fn test_external_alone_never_renders() {
        assert!(!should_render(CardState::Ready, UpdateFlags::EXTERNAL, true));
        assert!(!should_render(CardState::Ready, UpdateFlags::NONE, true));
        assert!(should_render(
            CardState::Ready,
            UpdateFlags::EXTERNAL | UpdateFlags::CONTEXT,
            true
        ));
    }

    #[test]
    fn test_host_flags_exclude_card_internal_ones() {
        assert!(UpdateFlags::HOST.contains(UpdateFlags::CONTEXT | UpdateFlags::EXTERNAL));
        assert!(!UpdateFlags::HOST.intersects(UpdateFlags::CONFIG | UpdateFlags::CHILDREN));
    }

    #[test]
    fn test_default_state() {
        assert_eq!(CardState::default(), CardState::Uninitialized);
        assert!(!CardState::default().is_ready());
        assert!(UpdateFlags::default().is_empty());
    }
}
