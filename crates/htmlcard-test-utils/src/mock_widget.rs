//! Mock widgets and factory that record what the card does to them.

use htmlcard::{
    AttributeWidget, ChildWidget, Context, Element, InstanceId, RebuildEmitter, WidgetConfig,
    WidgetError, WidgetFactory,
};
use htmlcard_core::alloc::HashSet;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Observation point shared between a [`MockWidget`] and the test.
#[derive(Debug, Default)]
pub struct ProbeState {
    serial: u64,
    widget_type: String,
    context_assignments: Cell<usize>,
    last_context: RefCell<Option<Context>>,
    element_id: RefCell<Option<String>>,
    class_name: RefCell<Option<String>>,
    emitter: RefCell<Option<RebuildEmitter>>,
    detached: Cell<bool>,
}

/// Cheap handle to a mock widget's recorded state.
#[derive(Debug, Clone)]
pub struct MockProbe(Rc<ProbeState>);

impl MockProbe {
    /// Creation order within the factory, starting at 0.
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    pub fn widget_type(&self) -> &str {
        &self.0.widget_type
    }

    pub fn context_assignments(&self) -> usize {
        self.0.context_assignments.get()
    }

    pub fn last_context(&self) -> Option<Context> {
        self.0.last_context.borrow().clone()
    }

    pub fn element_id(&self) -> Option<String> {
        self.0.element_id.borrow().clone()
    }

    pub fn class_name(&self) -> Option<String> {
        self.0.class_name.borrow().clone()
    }

    pub fn is_detached(&self) -> bool {
        self.0.detached.get()
    }

    /// The id the card assigned, once connected.
    pub fn instance_id(&self) -> Option<InstanceId> {
        self.0.emitter.borrow().as_ref().map(RebuildEmitter::source)
    }

    /// Emit a rebuild signal like an invalidated widget would.
    ///
    /// Returns `false` if the widget was never connected.
    pub fn request_rebuild(&self) -> bool {
        match self.0.emitter.borrow().as_ref() {
            Some(emitter) => {
                emitter.emit();
                true
            }
            None => false,
        }
    }
}

/// Widget that records context assignments, attributes and detachment.
///
/// Renders as `<mock-widget>` with its type and serial, plus the number of
/// contexts received once there is at least one.
#[derive(Debug)]
pub struct MockWidget {
    probe: MockProbe,
    element_id: Option<String>,
    class_name: Option<String>,
    rejects_context: bool,
    accepts_attributes: bool,
}

impl MockWidget {
    pub fn probe(&self) -> &MockProbe {
        &self.probe
    }
}

impl ChildWidget for MockWidget {
    fn debug_name(&self) -> &str {
        "MockWidget"
    }

    fn set_context(&mut self, context: &Context) -> Result<(), WidgetError> {
        if self.rejects_context {
            return Err(WidgetError::Rejected(format!(
                "{} does not take a context",
                self.probe.widget_type()
            )));
        }
        let state = &self.probe.0;
        state
            .context_assignments
            .set(state.context_assignments.get() + 1);
        *state.last_context.borrow_mut() = Some(context.clone());
        Ok(())
    }

    fn render(&self) -> Element {
        let mut element = Element::new("mock-widget")
            .with_attr("data-type", self.probe.widget_type())
            .with_attr("data-serial", self.probe.serial().to_string());
        let assignments = self.probe.context_assignments();
        if assignments > 0 {
            element.set_attr("data-context-assignments", assignments.to_string());
        }
        if let Some(id) = &self.element_id {
            element.set_attr("id", id.clone());
        }
        if let Some(class_name) = &self.class_name {
            element.set_attr("class", class_name.clone());
        }
        element
    }

    fn connect_rebuild(&mut self, emitter: RebuildEmitter) {
        *self.probe.0.emitter.borrow_mut() = Some(emitter);
    }

    fn detached(&mut self) {
        self.probe.0.detached.set(true);
    }

    fn as_attributes(&self) -> Option<&dyn AttributeWidget> {
        if self.accepts_attributes {
            Some(self)
        } else {
            None
        }
    }

    fn as_attributes_mut(&mut self) -> Option<&mut dyn AttributeWidget> {
        if self.accepts_attributes {
            Some(self)
        } else {
            None
        }
    }
}

impl AttributeWidget for MockWidget {
    fn element_id(&self) -> Option<&str> {
        self.element_id.as_deref()
    }

    fn set_element_id(&mut self, id: &str) {
        self.element_id = Some(id.to_string());
        *self.probe.0.element_id.borrow_mut() = self.element_id.clone();
    }

    fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = Some(class_name.to_string());
        *self.probe.0.class_name.borrow_mut() = self.class_name.clone();
    }
}

/// Factory building [`MockWidget`]s from a config's `type` tag.
#[derive(Debug, Default)]
pub struct MockFactory {
    probes: RefCell<Vec<MockProbe>>,
    failing: RefCell<HashSet<String>>,
    rejecting_context: RefCell<HashSet<String>>,
    attributed: RefCell<HashSet<String>>,
}

impl MockFactory {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Make creation of `widget_type` fail.
    pub fn fail_type(&self, widget_type: &str) {
        self.failing.borrow_mut().insert(widget_type.to_string());
    }

    /// Let creation of `widget_type` succeed again.
    pub fn heal_type(&self, widget_type: &str) {
        self.failing.borrow_mut().remove(widget_type);
    }

    /// Widgets of `widget_type` reject every context.
    pub fn reject_context_for(&self, widget_type: &str) {
        self.rejecting_context
            .borrow_mut()
            .insert(widget_type.to_string());
    }

    /// Widgets of `widget_type` expose the attribute capability.
    pub fn with_attributes_for(&self, widget_type: &str) {
        self.attributed.borrow_mut().insert(widget_type.to_string());
    }

    /// Every widget created so far, in creation order.
    pub fn probes(&self) -> Vec<MockProbe> {
        self.probes.borrow().clone()
    }

    pub fn created(&self) -> usize {
        self.probes.borrow().len()
    }

    /// Probe of the live widget with `instance` id.
    pub fn probe_for(&self, instance: InstanceId) -> Option<MockProbe> {
        self.probes
            .borrow()
            .iter()
            .find(|probe| probe.instance_id() == Some(instance))
            .cloned()
    }
}

impl WidgetFactory for MockFactory {
    fn create(&self, config: &WidgetConfig) -> Result<Box<dyn ChildWidget>, WidgetError> {
        let widget_type = config.widget_type().ok_or(WidgetError::MissingType)?;
        if self.failing.borrow().contains(widget_type) {
            return Err(WidgetError::UnknownType(widget_type.to_string()));
        }

        let probe = MockProbe(Rc::new(ProbeState {
            serial: self.probes.borrow().len() as u64,
            widget_type: widget_type.to_string(),
            ..ProbeState::default()
        }));
        self.probes.borrow_mut().push(probe.clone());

        Ok(Box::new(MockWidget {
            probe,
            element_id: None,
            class_name: None,
            rejects_context: self.rejecting_context.borrow().contains(widget_type),
            accepts_attributes: self.attributed.borrow().contains(widget_type),
        }))
    }
}
