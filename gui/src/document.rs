//! A small mutable HTML tree with stable element ids.
//!
//! Pages build their markup once at construction time and then mutate it in
//! place (attribute updates, child swaps) as bus events come in. Elements
//! live in a flat arena so ids stay stable across moves; a `Child::Raw`
//! variant lets a parent embed another page's already-serialized HTML
//! without needing to graft a foreign arena's nodes into its own.

use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
pub enum Child {
    Element(ElementId),
    /// Pre-serialized markup, opaque to this tree (e.g. another page's root).
    Raw(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Child>,
    /// True for void elements (e.g. `<input>`) that never get a closing tag.
    pub self_closing: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }
}

/// An arena of elements rooted at a single top-level node.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    elements: Vec<Element>,
    root: ElementId,
}

impl DocumentTree {
    pub fn new(root: Element) -> Self {
        Self {
            elements: vec![root],
            root: ElementId(0),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Allocate a new element in the arena, not yet attached to any parent.
    pub fn create(&mut self, element: Element) -> ElementId {
        self.elements.push(element);
        ElementId(self.elements.len() - 1)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.0)
    }

    pub fn append_child(&mut self, parent: ElementId, child: Child) {
        if let Some(el) = self.get_mut(parent) {
            el.children.push(child);
        }
    }

    pub fn detach_children(&mut self, parent: ElementId) -> Vec<Child> {
        self.get_mut(parent)
            .map(|el| std::mem::take(&mut el.children))
            .unwrap_or_default()
    }

    pub fn set_attribute(&mut self, id: ElementId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.get_mut(id) {
            el.attributes.insert(name.into(), value.into());
        }
    }

    pub fn merge_attributes(&mut self, id: ElementId, attrs: impl IntoIterator<Item = (String, String)>) {
        if let Some(el) = self.get_mut(id) {
            for (k, v) in attrs {
                el.attributes.insert(k, v);
            }
        }
    }

    /// Depth-first search by tag name, starting from `start`.
    pub fn find_by_tag(&self, start: ElementId, tag: &str) -> Option<ElementId> {
        let el = self.get(start)?;
        if el.tag == tag {
            return Some(start);
        }
        for child in &el.children {
            if let Child::Element(child_id) = child {
                if let Some(found) = self.find_by_tag(*child_id, tag) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Depth-first search by `id` attribute, starting from `start`.
    pub fn find_by_id(&self, start: ElementId, attr_id: &str) -> Option<ElementId> {
        let el = self.get(start)?;
        if el.attributes.get("id").map(|v| v.as_str()) == Some(attr_id) {
            return Some(start);
        }
        for child in &el.children {
            if let Child::Element(child_id) = child {
                if let Some(found) = self.find_by_id(*child_id, attr_id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Serialize `id` and everything beneath it (outerHTML).
    pub fn outer_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_outer(id, &mut out);
        out
    }

    /// Serialize only the children of `id` (innerHTML).
    pub fn inner_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        if let Some(el) = self.get(id) {
            for child in &el.children {
                self.write_child(child, &mut out);
            }
        }
        out
    }

    /// Serialize a single attribute's value, as used for attribute-scoped swaps.
    pub fn attribute(&self, id: ElementId, name: &str) -> Option<String> {
        self.get(id)?.attributes.get(name).cloned()
    }

    fn write_outer(&self, id: ElementId, out: &mut String) {
        let Some(el) = self.get(id) else { return };
        let _ = write!(out, "<{}", el.tag);
        for (k, v) in &el.attributes {
            let _ = write!(out, " {k}=\"{}\"", escape_attr(v));
        }
        if el.self_closing {
            out.push_str(" />");
            return;
        }
        out.push('>');
        for child in &el.children {
            self.write_child(child, out);
        }
        let _ = write!(out, "</{}>", el.tag);
    }

    fn write_child(&self, child: &Child, out: &mut String) {
        match child {
            Child::Element(id) => self.write_outer(*id, out),
            Child::Raw(html) => out.push_str(html),
        }
    }
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_html_round_trips_attributes_and_children() {
        let mut tree = DocumentTree::new(Element::new("div"));
        tree.set_attribute(tree.root(), "id", "root");
        let child = tree.create(Element::new("span"));
        tree.append_child(tree.root(), Child::Element(child));
        tree.append_child(child, Child::Raw("hello".into()));
        assert_eq!(tree.outer_html(tree.root()), "<div id=\"root\"><span>hello</span></div>");
    }

    #[test]
    fn find_by_id_searches_descendants() {
        let mut tree = DocumentTree::new(Element::new("div"));
        let child = tree.create(Element::new("span"));
        tree.set_attribute(child, "id", "target");
        tree.append_child(tree.root(), Child::Element(child));
        assert_eq!(tree.find_by_id(tree.root(), "target"), Some(child));
        assert_eq!(tree.find_by_id(tree.root(), "missing"), None);
    }

    #[test]
    fn inner_html_excludes_the_element_itself() {
        let mut tree = DocumentTree::new(Element::new("div"));
        tree.append_child(tree.root(), Child::Raw("<p>x</p>".into()));
        assert_eq!(tree.inner_html(tree.root()), "<p>x</p>");
    }
}
