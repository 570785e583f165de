//! Shared host context and its propagation to children.

use crate::error::CardError;
use crate::registry::ChildRegistry;
use htmlcard_core::profiling::profile_function;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

/// Opaque host state shared by a card and all of its children.
///
/// Cloning is cheap and keeps identity: two `Context`s are the same only if
/// they point at the same allocation. Values are never compared.
#[derive(Clone)]
pub struct Context(Rc<dyn Any>);

impl Context {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Wrap an existing shared value without copying it.
    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Self(value)
    }

    /// Borrow the value as `T` if that is what the host stored.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Identity comparison over optional contexts; two absent contexts match.
    pub fn same(a: Option<&Context>, b: Option<&Context>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Outcome of one propagation pass.
#[derive(Debug, Default)]
pub struct Propagation {
    /// Children that accepted the context.
    pub delivered: usize,
    /// Children that rejected it, as [`CardError::ContextAssignment`].
    pub failures: Vec<CardError>,
}

/// Pushes a changed context to every child, skipping unchanged ones.
#[derive(Debug, Default)]
pub struct ContextPropagator {
    observed: Option<Context>,
    passes: u64,
}

impl ContextPropagator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context most recently observed.
    pub fn observed(&self) -> Option<&Context> {
        self.observed.as_ref()
    }

    /// Number of propagation passes that actually ran.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Whether `next` differs by identity from the observed context.
    pub fn needs_propagation(&self, next: Option<&Context>) -> bool {
        !Context::same(self.observed.as_ref(), next)
    }

    /// Record `context` as observed without pushing it anywhere.
    ///
    /// Used when children already received it at construction.
    pub fn observe(&mut self, context: Option<&Context>) {
        self.observed = context.cloned();
    }

    /// Push `next` to all children in order.
    ///
    /// Returns `None` when `next` is the observed context. An absent context
    /// is recorded but not delivered.
    pub fn propagate(
        &mut self,
        next: Option<&Context>,
        children: &mut ChildRegistry,
    ) -> Option<Propagation> {
        profile_function!();
        if !self.needs_propagation(next) {
            tracing::trace!("Context unchanged, skipping propagation");
            return None;
        }
        self.observed = next.cloned();
        self.passes += 1;

        let mut report = Propagation::default();
        let Some(context) = next else {
            return Some(report);
        };

        for slot in children.iter_mut() {
            let instance = slot.id();
            match slot.widget_mut().set_context(context) {
                Ok(()) => report.delivered += 1,
                Err(source) => {
                    tracing::warn!("Widget {} rejected the context: {}", instance, source);
                    report
                        .failures
                        .push(CardError::ContextAssignment { instance, source });
                }
            }
        }

        tracing::debug!(
            "Propagated context to {} of {} children",
            report.delivered,
            children.len()
        );
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_not_value() {
        let a = Context::new(1u32);
        let b = Context::new(1u32);
        assert!(!a.ptr_eq(&b));
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_same_handles_absence() {
        let a = Context::new("state");
        assert!(Context::same(None, None));
        assert!(!Context::same(Some(&a), None));
        assert!(!Context::same(None, Some(&a)));
        assert!(Context::same(Some(&a), Some(&a.clone())));
    }

    #[test]
    fn test_from_rc_shares_allocation() {
        let shared = Rc::new(String::from("hass"));
        let a = Context::from_rc(shared.clone());
        let b = Context::from_rc(shared);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("hass"));
        assert!(a.downcast_ref::<u32>().is_none());
    }

    #[test]
    fn test_propagate_skips_identical() {
        let mut propagator = ContextPropagator::new();
        let mut children = ChildRegistry::new();
        let context = Context::new(5u8);

        assert!(propagator.propagate(Some(&context), &mut children).is_some());
        assert!(propagator.propagate(Some(&context.clone()), &mut children).is_none());
        assert_eq!(propagator.passes(), 1);
    }

    #[test]
    fn test_propagate_tolerates_absent_context() {
        let mut propagator = ContextPropagator::new();
        let mut children = ChildRegistry::new();

        assert!(propagator.propagate(None, &mut children).is_none());

        let context = Context::new(());
        propagator.propagate(Some(&context), &mut children);
        let report = propagator.propagate(None, &mut children).unwrap();
        assert_eq!(report.delivered, 0);
        assert!(propagator.observed().is_none());
    }
}
