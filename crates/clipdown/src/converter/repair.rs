//! Structural repair of list markup cut out of a live page.
//!
//! A partial selection routinely produces `<li>` elements whose `<ul>`/`<ol>`
//! was left outside the range. Every element that directly holds such orphans
//! gets one synthesized `<ul>`, appended as its last child, holding those
//! items in their original order. Other children keep their relative order.
//!
//! The tree is rebuilt bottom-up, so no node is ever shared between its old
//! and new position. Repair is total and idempotent.

use crate::dom::{Element, Node, TagKind};

/// Wrap orphaned list items, at every level of the tree.
///
/// A root that is itself a `ul`/`ol` is never wrapped and its items stay in
/// place; repair only continues inside those items.
pub fn repair(root: Element) -> Element {
    if root.is_container() {
        repair_container(root)
    } else {
        repair_element(root)
    }
}

/// Repair a non-list element: collect its orphaned items, then recurse.
///
/// Items are repaired the same way, so an `li` directly inside another `li`
/// ends up in a nested list.
fn repair_element(element: Element) -> Element {
    let Element { name, attrs, children } = element;

    let mut kept = Vec::with_capacity(children.len());
    let mut orphans = Vec::new();
    for child in children {
        match child {
            Node::Element(item) if item.kind() == TagKind::Item => orphans.push(Node::Element(repair_element(item))),
            Node::Element(child) if child.is_container() => kept.push(Node::Element(repair_container(child))),
            Node::Element(child) => kept.push(Node::Element(repair_element(child))),
            Node::Text(_) => kept.push(child),
        }
    }

    if !orphans.is_empty() {
        tracing::debug!(parent = %name, count = orphans.len(), "wrapping orphaned list items");
        kept.push(Node::Element(Element {
            name: "ul".to_string(),
            attrs: Default::default(),
            children: orphans,
        }));
    }

    Element {
        name,
        attrs,
        children: kept,
    }
}

/// A proper list keeps its direct children where they are.
fn repair_container(container: Element) -> Element {
    let Element { name, attrs, children } = container;
    let children = children
        .into_iter()
        .map(|child| match child {
            Node::Element(item) if item.kind() == TagKind::Item => Node::Element(repair_element(item)),
            Node::Element(nested) if nested.is_container() => Node::Element(repair_container(nested)),
            Node::Element(other) => Node::Element(repair_element(other)),
            Node::Text(_) => child,
        })
        .collect();
    Element { name, attrs, children }
}
