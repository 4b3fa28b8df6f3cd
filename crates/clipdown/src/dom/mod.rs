//! Owned node tree for clipped fragments.
//!
//! The pipeline works on a private copy of the selection: `tl` handles are
//! resolved once in [`parse`] and everything downstream (visibility filter,
//! list repair, rendering) operates on these plain owned values.

pub mod parse;
mod serialize;

use std::collections::BTreeMap;

pub use parse::parse_fragment;

/// A node in a clipped fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with tag name, attributes and children.
    Element(Element),
    /// Decoded text content.
    Text(String),
}

impl Node {
    /// Shorthand for a text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    /// The element, if this node is one.
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Element node. Tag and attribute names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Lowercase tag name.
    pub name: String,
    /// Attributes; valueless attributes map to an empty string.
    pub attrs: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

/// Handled tag classes.
///
/// Every branch the filter, the repair engine and the renderer take on a tag
/// goes through this enum; anything unrecognized is [`TagKind::Other`] and is
/// unwrapped (children kept, tag dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `ul` / `ol`
    List {
        /// `ol`
        ordered: bool,
    },
    /// `li`
    Item,
    /// `h1`..`h6`
    Heading(u8),
    /// `p`
    Paragraph,
    /// `br`
    LineBreak,
    /// `strong` / `b`
    Strong,
    /// `em` / `i`
    Emphasis,
    /// `code`, `kbd`, `samp`, `tt`
    Code,
    /// `pre`
    Preformatted,
    /// `a`
    Link,
    /// `del` / `s` / `strike`
    Strikethrough,
    /// `hr`
    Rule,
    /// Block wrappers that are unwrapped but start a new line.
    Block,
    /// `input`
    Input,
    /// `textarea`
    TextArea,
    /// Never content: scripts, styles and interactive controls.
    NonContent,
    /// Anything else.
    Other,
}

impl TagKind {
    /// Classify a lowercase tag name.
    pub fn of(name: &str) -> Self {
        match name {
            "ul" => Self::List { ordered: false },
            "ol" => Self::List { ordered: true },
            "li" => Self::Item,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "p" => Self::Paragraph,
            "br" => Self::LineBreak,
            "strong" | "b" => Self::Strong,
            "em" | "i" => Self::Emphasis,
            "code" | "kbd" | "samp" | "tt" => Self::Code,
            "pre" => Self::Preformatted,
            "a" => Self::Link,
            "del" | "s" | "strike" => Self::Strikethrough,
            "hr" => Self::Rule,
            "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav" | "blockquote"
            | "figure" | "figcaption" | "address" | "details" | "summary" | "table" | "thead" | "tbody"
            | "tfoot" | "tr" | "dl" | "dt" | "dd" | "fieldset" | "form" => Self::Block,
            "input" => Self::Input,
            "textarea" => Self::TextArea,
            "script" | "noscript" | "style" | "select" | "option" | "button" => Self::NonContent,
            _ => Self::Other,
        }
    }

    /// `ul` or `ol`.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::List { .. })
    }
}

impl Element {
    /// Empty element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Builder: append a child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Builder: append a text child.
    #[must_use]
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(Node::text(content))
    }

    /// Tag class of this element.
    pub fn kind(&self) -> TagKind {
        TagKind::of(&self.name)
    }

    /// True for `ul` / `ol`.
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Attribute value, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Direct element children.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Visit every descendant element in pre-order together with its parent.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element, &'a Element)) {
        for child in self.child_elements() {
            visit(child, self);
            child.walk(visit);
        }
    }

    /// All descendant elements named `name`, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |element, _| {
            if element.name == name {
                found.push(element);
            }
        });
        found
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}
