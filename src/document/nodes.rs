//! Construction helpers for `scraper` tree nodes.
//!
//! `scraper` exposes the parsed tree but no builder API, so new elements are
//! assembled from `html5ever` names and attributes. Attribute names are always
//! created in the null namespace, which is what the HTML parser produces for
//! ordinary attributes.

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::Node;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Qualified name of an HTML element.
pub fn element_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag))
}

/// Qualified name of an ordinary attribute.
pub fn attribute_name(name: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(name))
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: attribute_name(name),
        value: StrTendril::from_slice(value),
    }
}

/// A new HTML element node.
pub fn element(tag: &str, attrs: &[(&str, &str)]) -> Node {
    let attrs = attrs
        .iter()
        .map(|(name, value)| attribute(name, value))
        .collect();
    Node::Element(Element::new(element_name(tag), attrs))
}

/// A new text node.
pub fn text(content: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from_slice(content),
    })
}

/// Copy of `element` with attribute `name` set to `value`.
///
/// Elements cache their id and classes, so attributes are changed by
/// rebuilding the element rather than editing it in place. An existing
/// attribute keeps its position; a new one goes last.
pub fn with_attribute(element: &Element, name: &str, value: &str) -> Element {
    let mut replaced = false;
    let mut attrs: Vec<Attribute> = element
        .attrs()
        .map(|(existing, existing_value)| {
            if existing == name {
                replaced = true;
                attribute(existing, value)
            } else {
                attribute(existing, existing_value)
            }
        })
        .collect();
    if !replaced {
        attrs.push(attribute(name, value));
    }
    Element::new(element.name.clone(), attrs)
}
