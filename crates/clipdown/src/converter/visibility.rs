//! Visibility filter: prunes nodes that should not reach the note.
//!
//! Hidden elements and non-content controls are removed together with their
//! subtrees. Text inputs and textareas that carry a value are replaced by a
//! text node holding that value, so form data survives as plain text.

use crate::dom::{Element, Node, TagKind};

/// Remove invisible nodes and flatten filled form controls into text.
pub fn filter(mut root: Element) -> Element {
    let mut pruned = 0usize;
    root.children = filter_children(root.children, &mut pruned);
    if pruned > 0 {
        tracing::debug!(pruned, "visibility filter removed nodes");
    }
    root
}

fn filter_children(children: Vec<Node>, pruned: &mut usize) -> Vec<Node> {
    let mut kept = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Node::Text(_) => kept.push(child),
            Node::Element(element) => match classify(&element) {
                Visibility::Hidden => *pruned += 1,
                Visibility::Value(value) => kept.push(Node::Text(value)),
                Visibility::Visible => {
                    let Element { name, attrs, children } = element;
                    kept.push(Node::Element(Element {
                        name,
                        attrs,
                        children: filter_children(children, pruned),
                    }));
                }
            },
        }
    }
    kept
}

enum Visibility {
    Hidden,
    /// A form control whose value replaces it.
    Value(String),
    Visible,
}

fn classify(element: &Element) -> Visibility {
    if is_hidden_by_markup(element) {
        return Visibility::Hidden;
    }

    match element.kind() {
        TagKind::NonContent => Visibility::Hidden,
        TagKind::Input => {
            let is_text = element.attr("type").is_none_or(|t| t.trim().eq_ignore_ascii_case("text"));
            match element.attr("value") {
                Some(value) if is_text && !value.is_empty() => Visibility::Value(value.to_string()),
                _ => Visibility::Hidden,
            }
        }
        TagKind::TextArea => {
            let value = element.text_content();
            if value.is_empty() {
                Visibility::Hidden
            } else {
                Visibility::Value(value)
            }
        }
        _ => Visibility::Visible,
    }
}

fn is_hidden_by_markup(element: &Element) -> bool {
    if element.attrs.contains_key("hidden") {
        return true;
    }
    if element.attr("aria-hidden").is_some_and(|v| v.trim().eq_ignore_ascii_case("true")) {
        return true;
    }
    element.attr("style").is_some_and(style_hides)
}

/// Inline style declaring `display: none` or `visibility: hidden`.
fn style_hides(style: &str) -> bool {
    style.split(';').any(|declaration| {
        let Some((property, value)) = declaration.split_once(':') else {
            return false;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim().to_ascii_lowercase();
        (property == "display" && value == "none") || (property == "visibility" && value == "hidden")
    })
}
