//! Render pass composition.

use crate::config::CardConfig;
use crate::element::Element;
use crate::registry::ChildRegistry;
use crate::resources::{classify_styles, script_sources};
use crate::widget::InstanceId;
use htmlcard_core::profiling::profile_function;

/// One top-level entry of a card's rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    /// The concatenated inline style text.
    InlineStyle(String),
    /// External stylesheet URL.
    Stylesheet(String),
    /// External script URL.
    Script(String),
    /// A child's element.
    Child {
        instance: InstanceId,
        element: Element,
    },
}

impl RenderNode {
    /// The equivalent element.
    pub fn to_element(&self) -> Element {
        match self {
            RenderNode::InlineStyle(css) => Element::new("style").with_text(css.clone()),
            RenderNode::Stylesheet(href) => Element::new("link")
                .with_attr("type", "text/css")
                .with_attr("rel", "stylesheet")
                .with_attr("href", href.clone()),
            RenderNode::Script(src) => Element::new("script").with_attr("src", src.clone()),
            RenderNode::Child { element, .. } => element.clone(),
        }
    }
}

/// The full output of one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    nodes: Vec<RenderNode>,
}

impl RenderOutput {
    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            RenderNode::InlineStyle(css) => Some(css.as_str()),
            _ => None,
        })
    }

    pub fn stylesheets(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Stylesheet(href) => Some(href.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn scripts(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Script(src) => Some(src.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Children in render order.
    pub fn children(&self) -> Vec<InstanceId> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                RenderNode::Child { instance, .. } => Some(*instance),
                _ => None,
            })
            .collect()
    }

    pub fn to_elements(&self) -> Vec<Element> {
        self.nodes.iter().map(RenderNode::to_element).collect()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.to_element().write_html(&mut out);
        }
        out
    }
}

/// Compose the rendered surface: inline style, stylesheet links, scripts,
/// then children, each group in configuration order.
///
/// Reads state only; children are rendered, never rebuilt or reordered.
pub fn render(config: &CardConfig, children: &ChildRegistry) -> RenderOutput {
    profile_function!();
    let resources = classify_styles(config.styles.as_deref());
    let scripts = script_sources(config.jss.as_deref());

    let mut nodes = Vec::with_capacity(
        usize::from(resources.has_inline())
            + resources.stylesheets.len()
            + scripts.len()
            + children.len(),
    );

    if resources.has_inline() {
        nodes.push(RenderNode::InlineStyle(resources.inline_css));
    }
    nodes.extend(resources.stylesheets.into_iter().map(RenderNode::Stylesheet));
    nodes.extend(scripts.into_iter().map(|src| RenderNode::Script(src.to_string())));
    nodes.extend(children.iter().map(|slot| RenderNode::Child {
        instance: slot.id(),
        element: slot.widget().render(),
    }));

    RenderOutput { nodes }
}
