//! HTML serialization of the owned tree.

use super::{Element, Node};

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta" | "source" | "track" | "wbr"
    )
}

impl Element {
    /// Serialize this element and its subtree.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize_element(self, &mut out);
        out
    }

    /// Serialize only the children, like `innerHTML`.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize_children(&self.children, &mut out);
        out
    }
}

fn serialize_children(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Element(element) => serialize_element(element, out),
        }
    }
}

fn serialize_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attrs {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if is_void_element(&element.name) {
        return;
    }

    serialize_children(&element.children, out);
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}
