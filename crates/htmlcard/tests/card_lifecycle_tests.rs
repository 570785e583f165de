//! Lifecycle tests for the HTML card: configuration, context propagation and
//! in-place rebuilds.

use htmlcard::{
    CardError, CardState, Context, HtmlCard, InstanceId, RebuildSignal, UpdateFlags,
};
use htmlcard_test_utils::{MockFactory, MockProbe};
use serde_json::{Value, json};
use std::rc::Rc;

fn card_with(factory: &Rc<MockFactory>, config: Value) -> HtmlCard {
    let mut card = HtmlCard::new(factory.clone());
    card.set_config(&config).expect("valid configuration");
    card
}

fn three_children(factory: &Rc<MockFactory>) -> HtmlCard {
    card_with(
        factory,
        json!({ "cards": [{ "type": "A" }, { "type": "B" }, { "type": "C" }] }),
    )
}

fn probe_at(factory: &MockFactory, card: &HtmlCard, position: usize) -> MockProbe {
    let id = card.children().ids()[position];
    factory.probe_for(id).expect("live child has a probe")
}

#[test]
fn test_starts_uninitialized_and_ignores_updates() {
    let factory = MockFactory::new();
    let mut card = HtmlCard::new(factory.clone());

    card.set_context(Some(Context::new(1u8)));
    card.request_update(UpdateFlags::EXTERNAL);

    assert_eq!(card.state(), CardState::Uninitialized);
    assert!(card.perform_update().is_none());
    assert!(card.render().is_empty());
    assert_eq!(factory.created(), 0);
}

#[test]
fn test_config_makes_card_ready_and_renders_once() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);

    assert_eq!(card.state(), CardState::Ready);
    assert_eq!(card.children().len(), 3);
    assert!(card.pending().contains(UpdateFlags::CONFIG));

    let output = card.perform_update().expect("configuration renders");
    assert_eq!(output.children(), card.children().ids());
    assert!(card.perform_update().is_none());
}

#[test]
fn test_children_built_in_configuration_order() {
    let factory = MockFactory::new();
    let card = three_children(&factory);

    let types: Vec<_> = card
        .children()
        .ids()
        .into_iter()
        .map(|id| factory.probe_for(id).unwrap().widget_type().to_string())
        .collect();
    assert_eq!(types, vec!["A", "B", "C"]);
}

#[test]
fn test_invalid_styles_create_no_children() {
    let factory = MockFactory::new();
    let mut card = HtmlCard::new(factory.clone());

    let err = card
        .set_config(&json!({ "styles": "not-an-array", "cards": [{ "type": "A" }] }))
        .unwrap_err();

    assert!(matches!(err, CardError::InvalidConfiguration { .. }));
    assert_eq!(factory.created(), 0);
    assert_eq!(card.state(), CardState::Uninitialized);
}

#[test]
fn test_missing_config_is_rejected() {
    let factory = MockFactory::new();
    let mut card = HtmlCard::new(factory.clone());
    assert!(card.set_config(&Value::Null).unwrap_err().is_invalid_configuration());
}

#[test]
fn test_invalid_reconfiguration_keeps_previous_state() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let before = card.children().ids();

    assert!(card.set_config(&json!({ "jss": "a.js" })).is_err());

    assert_eq!(card.children().ids(), before);
    assert_eq!(card.config().unwrap().cards.len(), 3);
}

#[test]
fn test_instantiation_failure_aborts_configuration() {
    let factory = MockFactory::new();
    factory.fail_type("B");
    let mut card = HtmlCard::new(factory.clone());

    let err = card
        .set_config(&json!({ "cards": [{ "type": "A" }, { "type": "B" }] }))
        .unwrap_err();

    assert!(matches!(
        err,
        CardError::ChildInstantiation { ref widget_type, .. } if widget_type == "B"
    ));
    assert_eq!(card.state(), CardState::Uninitialized);
    assert!(card.children().is_empty());
}

#[test]
fn test_reconfiguration_rebuilds_everything() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let old_probes = factory.probes();

    card.set_config(&json!({ "cards": [{ "type": "D" }] })).unwrap();

    assert_eq!(card.children().len(), 1);
    assert!(old_probes.iter().all(MockProbe::is_detached));

    // Old children can no longer trigger rebuilds.
    assert!(old_probes[0].request_rebuild());
    assert_eq!(card.process_rebuilds().unwrap(), 0);
    assert_eq!(card.children().len(), 1);
}

#[test]
fn test_context_assigned_at_creation() {
    let factory = MockFactory::new();
    let context = Context::new("hass");
    let mut card = HtmlCard::new(factory.clone());
    card.set_context(Some(context.clone()));
    card.set_config(&json!({ "cards": [{ "type": "A" }] })).unwrap();

    let probe = &factory.probes()[0];
    assert_eq!(probe.context_assignments(), 1);
    assert!(probe.last_context().unwrap().ptr_eq(&context));

    // Children already hold it; the first update only renders.
    assert!(card.perform_update().is_some());
    assert_eq!(probe.context_assignments(), 1);
}

#[test]
fn test_same_context_twice_propagates_once() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    let context = Context::new(42u32);
    card.set_context(Some(context.clone()));
    assert!(card.perform_update().is_some());

    card.set_context(Some(context.clone()));
    card.request_update(UpdateFlags::CONTEXT);
    assert!(card.perform_update().is_none());

    assert_eq!(card.propagation_passes(), 1);
    for probe in factory.probes() {
        assert_eq!(probe.context_assignments(), 1);
        assert!(probe.last_context().unwrap().ptr_eq(&context));
    }
}

#[test]
fn test_equal_but_distinct_context_propagates() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    card.set_context(Some(Context::new(1u32)));
    card.perform_update();
    card.set_context(Some(Context::new(1u32)));
    assert!(card.perform_update().is_some());

    assert_eq!(card.propagation_passes(), 2);
    assert_eq!(factory.probes()[0].context_assignments(), 2);
}

#[test]
fn test_context_change_and_back_is_suppressed() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let first = Context::new(1u8);
    card.set_context(Some(first.clone()));
    card.perform_update();

    card.set_context(Some(Context::new(2u8)));
    card.set_context(Some(first));
    assert!(card.perform_update().is_none());
    assert_eq!(card.propagation_passes(), 1);
}

#[test]
fn test_unrelated_updates_are_ignored() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    card.request_update(UpdateFlags::EXTERNAL);
    assert!(card.perform_update().is_none());
}

#[test]
fn test_absent_context_is_tolerated() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    let context = Context::new(());
    card.set_context(Some(context.clone()));
    card.perform_update();
    card.set_context(None);
    assert!(card.perform_update().is_some());

    // Absent context is not pushed; children keep the last one.
    let probe = &factory.probes()[0];
    assert_eq!(probe.context_assignments(), 1);
    assert!(probe.last_context().unwrap().ptr_eq(&context));
}

#[test]
fn test_context_failure_is_isolated() {
    let factory = MockFactory::new();
    factory.reject_context_for("B");
    let mut card = three_children(&factory);
    card.perform_update();

    card.set_context(Some(Context::new("state")));
    assert!(card.perform_update().is_some());

    let probes = factory.probes();
    assert_eq!(probes[0].context_assignments(), 1);
    assert_eq!(probes[1].context_assignments(), 0);
    assert_eq!(probes[2].context_assignments(), 1);
}

#[test]
fn test_rebuild_replaces_only_that_child() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let before = card.children().ids();
    let middle = probe_at(&factory, &card, 1);

    assert!(middle.request_rebuild());
    assert_eq!(card.process_rebuilds().unwrap(), 1);

    let after = card.children().ids();
    assert_eq!(after[0], before[0]);
    assert_ne!(after[1], before[1]);
    assert_eq!(after[2], before[2]);
    assert!(middle.is_detached());

    let replacement = probe_at(&factory, &card, 1);
    assert_eq!(replacement.widget_type(), "B");
    assert_eq!(factory.created(), 4);
    assert!(card.pending().contains(UpdateFlags::CHILDREN));
    assert!(card.perform_update().is_some());
}

#[test]
fn test_rebuild_gets_current_context() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let context = Context::new(7i64);
    card.set_context(Some(context.clone()));
    card.perform_update();

    probe_at(&factory, &card, 0).request_rebuild();
    card.process_rebuilds().unwrap();

    let replacement = probe_at(&factory, &card, 0);
    assert!(replacement.last_context().unwrap().ptr_eq(&context));
}

#[test]
fn test_rebuild_signal_delivered_at_most_once() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let first = probe_at(&factory, &card, 0);

    first.request_rebuild();
    first.request_rebuild();
    assert_eq!(card.process_rebuilds().unwrap(), 1);
    assert_eq!(factory.created(), 4);
}

#[test]
fn test_stale_rebuild_signal_is_a_no_op() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let before = card.children().ids();

    let handled = card
        .handle_rebuild(RebuildSignal {
            source: InstanceId::from_raw(1_000),
        })
        .unwrap();

    assert!(!handled);
    assert_eq!(card.children().ids(), before);
    assert_eq!(factory.created(), 3);
}

#[test]
fn test_replaced_child_signal_no_longer_counts() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let old = probe_at(&factory, &card, 2);
    old.request_rebuild();
    card.process_rebuilds().unwrap();
    let after = card.children().ids();

    old.request_rebuild();
    assert_eq!(card.process_rebuilds().unwrap(), 0);
    assert_eq!(card.children().ids(), after);
}

#[test]
fn test_failed_rebuild_keeps_child_and_can_retry() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let before = card.children().ids();
    let child = probe_at(&factory, &card, 1);

    factory.fail_type("B");
    child.request_rebuild();
    assert!(matches!(
        card.process_rebuilds(),
        Err(CardError::ChildInstantiation { .. })
    ));
    assert_eq!(card.children().ids(), before);
    assert!(!child.is_detached());

    factory.heal_type("B");
    child.request_rebuild();
    assert_eq!(card.process_rebuilds().unwrap(), 1);
    assert_ne!(card.children().ids()[1], before[1]);
}

#[test]
fn test_rebuild_errors_do_not_block_other_signals() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    let before = card.children().ids();

    factory.fail_type("A");
    probe_at(&factory, &card, 0).request_rebuild();
    probe_at(&factory, &card, 2).request_rebuild();

    assert!(card.process_rebuilds().is_err());
    let after = card.children().ids();
    assert_eq!(after[0], before[0]);
    assert_ne!(after[2], before[2]);
}

#[test]
fn test_attributes_applied_through_capability() {
    let factory = MockFactory::new();
    factory.with_attributes_for("custom:generic-html-card");
    let card = card_with(
        &factory,
        json!({ "cards": [
            { "type": "custom:generic-html-card", "id": "inner", "className": "wide" },
            { "type": "A", "id": "ignored", "className": "ignored" },
        ] }),
    );

    let nested = probe_at(&factory, &card, 0);
    assert_eq!(nested.element_id().as_deref(), Some("inner"));
    assert_eq!(nested.class_name().as_deref(), Some("wide"));

    let plain = probe_at(&factory, &card, 1);
    assert_eq!(plain.element_id(), None);
    assert_eq!(plain.class_name(), None);
}

#[test]
fn test_stub_config_is_accepted() {
    let factory = MockFactory::new();
    let mut card = HtmlCard::new(factory.clone());
    card.set_config(&HtmlCard::stub_config()).unwrap();

    assert_eq!(card.state(), CardState::Ready);
    assert!(card.children().is_empty());
    assert_eq!(card.config().unwrap().name(), htmlcard::DEFAULT_NAME);
}

#[test]
fn test_context_change_output_shows_new_context() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    card.set_context(Some(Context::new(1u32)));
    card.perform_update().unwrap();

    card.set_context(Some(Context::new(2u32)));
    let output = card.perform_update().unwrap();

    let html = output.to_html();
    assert_eq!(html.matches(r#"data-context-assignments="2""#).count(), 3);
    assert!(!html.contains(r#"data-context-assignments="1""#));
    assert_eq!(output, card.render());
}

#[test]
fn test_card_internal_flags_cannot_be_requested() {
    let factory = MockFactory::new();
    let mut card = three_children(&factory);
    card.perform_update();

    card.request_update(UpdateFlags::CONFIG | UpdateFlags::CHILDREN | UpdateFlags::EXTERNAL);

    assert_eq!(card.pending(), UpdateFlags::EXTERNAL);
    assert!(card.perform_update().is_none());
}

#[test]
fn test_non_text_identity_fields_are_accepted() {
    let factory = MockFactory::new();
    let mut card = HtmlCard::new(factory.clone());

    card.set_config(&json!({ "name": 5, "id": 7, "cards": [{ "type": "A" }] }))
        .unwrap();

    assert_eq!(card.state(), CardState::Ready);
    assert_eq!(card.children().len(), 1);
    let config = card.config().unwrap();
    assert_eq!(config.name(), "5");
    assert_eq!(config.id(), None);
}
