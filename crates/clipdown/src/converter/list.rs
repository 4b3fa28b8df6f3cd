//! List layout: nesting depth, indentation and ordinals.
//!
//! Each `ul`/`ol` is rendered item by item. An item's own text is its inline
//! content with every nested list left out; the nested lists are rendered
//! after it, one level deeper. An item with no text of its own is elided and
//! its nested lists take its place at the same depth. Indentation is two
//! spaces per level and never depends on source whitespace.

use crate::dom::{Element, Node, TagKind};

use super::main::{Context, LineBreak, SINGLE_LINE, render_inline};

const INDENT: &str = "  ";

/// Per-container rendering state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListContext {
    depth: usize,
    ordered: bool,
    start: i64,
}

impl ListContext {
    /// Context for an outermost list.
    pub(crate) fn root(list: &Element) -> Self {
        Self::at_depth(list, 0)
    }

    fn at_depth(list: &Element, depth: usize) -> Self {
        Self {
            depth,
            ordered: matches!(list.kind(), TagKind::List { ordered: true }),
            start: parse_start(list),
        }
    }
}

/// `start` attribute of an `ol`; anything that is not an integer means 1.
fn parse_start(list: &Element) -> i64 {
    list.attr("start")
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(1)
}

/// Render a `ul`/`ol` and everything nested in it.
///
/// Ordinals follow DOM position: every `li` consumes an index, including
/// empty ones that emit nothing.
pub(crate) fn render_list(list: &Element, cx: ListContext, output: &mut String) {
    let mut index = 0i64;
    for child in &list.children {
        match child {
            Node::Element(item) if item.kind() == TagKind::Item => {
                render_item(item, cx, cx.start.saturating_add(index), output);
                index += 1;
            }
            // A list placed directly in a list is read as nested in the previous item.
            Node::Element(nested) if nested.is_container() => {
                render_list(nested, ListContext::at_depth(nested, cx.depth + 1), output);
            }
            Node::Element(wrapper) => render_wrapper(wrapper, cx.depth, output),
            text => render_stray(std::slice::from_ref(text), cx.depth, output),
        }
    }
}

/// An `li` outside any list, rendered as a single top-level bullet.
pub(crate) fn render_orphan_item(item: &Element, output: &mut String) {
    let cx = ListContext {
        depth: 0,
        ordered: false,
        start: 1,
    };
    render_item(item, cx, 1, output);
}

fn render_item(item: &Element, cx: ListContext, ordinal: i64, output: &mut String) {
    let continuation = INDENT.repeat(cx.depth + 1);
    let own_text = render_inline(
        &item.children,
        Context {
            inline: true,
            skip_lists: true,
            line_break: LineBreak::Continuation(&continuation),
        },
    );
    let nested = nested_lists(item);

    if own_text.is_empty() {
        for list in nested {
            render_list(list, ListContext::at_depth(list, cx.depth), output);
        }
        return;
    }

    output.push_str(&INDENT.repeat(cx.depth));
    if cx.ordered {
        output.push_str(&format!("{ordinal}. "));
    } else {
        output.push_str("- ");
    }
    output.push_str(&own_text);
    output.push('\n');

    for list in nested {
        render_list(list, ListContext::at_depth(list, cx.depth + 1), output);
    }
}

/// Text sitting directly in a list becomes an indented line.
fn render_stray(nodes: &[Node], depth: usize, output: &mut String) {
    let text = render_inline(nodes, SINGLE_LINE);
    if text.is_empty() {
        return;
    }
    output.push_str(&INDENT.repeat(depth));
    output.push_str(&text);
    output.push('\n');
}

/// A non-item element directly in a list: its own text is a stray line and
/// the lists inside it are laid out like the nested lists of an item.
fn render_wrapper(wrapper: &Element, depth: usize, output: &mut String) {
    let own_text = render_inline(
        &wrapper.children,
        Context {
            skip_lists: true,
            ..SINGLE_LINE
        },
    );
    let nested_depth = if own_text.is_empty() {
        depth
    } else {
        output.push_str(&INDENT.repeat(depth));
        output.push_str(&own_text);
        output.push('\n');
        depth + 1
    };
    for list in nested_lists(wrapper) {
        render_list(list, ListContext::at_depth(list, nested_depth), output);
    }
}

/// Lists nested in an item: direct children and lists reached through
/// non-list wrappers, in document order.
fn nested_lists(item: &Element) -> Vec<&Element> {
    let mut found = Vec::new();
    collect_nested_lists(item, &mut found);
    found
}

fn collect_nested_lists<'a>(element: &'a Element, found: &mut Vec<&'a Element>) {
    for child in element.child_elements() {
        if child.is_container() {
            found.push(child);
        } else {
            collect_nested_lists(child, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::converter::convert;

    fn md(html: &str) -> String {
        convert(html).unwrap()
    }

    #[test]
    fn grocery_list() {
        let html = "<ol><li>Pay bills.</li><li>Wash car.</li><li>Get groceries.<ul><li>Bacon</li><li>Bread</li></ul></li><li>Prepare dinner.</li></ol>";
        assert_eq!(
            md(html),
            "1. Pay bills.\n2. Wash car.\n3. Get groceries.\n  - Bacon\n  - Bread\n4. Prepare dinner."
        );
    }

    #[test]
    fn three_levels_indent_by_two_spaces() {
        let lines: Vec<String> = md("<ul><li>a<ul><li>b<ul><li>c</li></ul></li></ul></li></ul>")
            .lines()
            .map(str::to_string)
            .collect();
        assert_eq!(lines, ["- a", "  - b", "    - c"]);
    }

    #[test]
    fn empty_wrapper_item_is_promoted() {
        assert_eq!(md("<ul><li><ul><li>X</li></ul></li></ul>"), "- X");
    }

    #[test]
    fn ordinals_follow_dom_position() {
        assert_eq!(md("<ol><li>a</li><li></li><li>b</li></ol>"), "1. a\n3. b");
    }

    #[test]
    fn start_attribute_offsets_numbering() {
        assert_eq!(md(r#"<ol start="5"><li>a</li><li>b</li></ol>"#), "5. a\n6. b");
        assert_eq!(md(r#"<ol start="x"><li>a</li></ol>"#), "1. a");
        assert_eq!(md(r#"<ol start="-1"><li>a</li><li>b</li></ol>"#), "-1. a\n0. b");
    }

    #[test]
    fn start_at_the_integer_limit_saturates() {
        assert_eq!(
            md(r#"<ol start="9223372036854775807"><li>a</li><li>b</li></ol>"#),
            "9223372036854775807. a\n9223372036854775807. b"
        );
    }

    #[test]
    fn nested_start_is_independent_of_parent() {
        let html = r#"<ol><li>a<ol start="10"><li>b</li><li>c</li></ol></li><li>d</li></ol>"#;
        assert_eq!(md(html), "1. a\n  10. b\n  11. c\n2. d");
    }

    #[test]
    fn several_nested_lists_under_an_item_with_text() {
        let html = "<ul><li>parent<ul><li>x</li></ul><ol><li>y</li></ol></li></ul>";
        assert_eq!(md(html), "- parent\n  - x\n  1. y");
    }

    #[test]
    fn several_nested_lists_under_an_empty_item() {
        let html = r#"<ol><li><ul><li>x</li></ul><ol start="3"><li>y</li></ol></li></ol>"#;
        assert_eq!(md(html), "- x\n3. y");
    }

    #[test]
    fn lists_inside_wrappers_still_nest() {
        let html = "<ul><li><p>Item</p><div><ul><li>sub</li></ul></div></li></ul>";
        assert_eq!(md(html), "- Item\n  - sub");
    }

    #[test]
    fn line_break_in_item_continues_under_the_bullet() {
        let html = "<ul><li>a<ul><li>line one<br>line two</li></ul></li></ul>";
        assert_eq!(md(html), "- a\n  - line one\n    line two");
    }

    #[test]
    fn item_text_keeps_inline_formatting() {
        let html = r#"<ul><li><b>Bold</b> and <a href="u">link</a></li></ul>"#;
        assert_eq!(md(html), "- **Bold** and [link](u)");
    }

    #[test]
    fn source_indentation_and_blank_items_are_ignored() {
        let html = "<ul>\n    <li>  one  </li>\n    <li> </li>\n        <li>two</li>\n</ul>";
        assert_eq!(md(html), "- one\n- two");
    }

    #[test]
    fn lists_are_separated_from_paragraphs() {
        assert_eq!(md("<p>Intro</p><ul><li>a</li></ul><p>Outro</p>"), "Intro\n\n- a\n\nOutro");
    }

    #[test]
    fn list_directly_inside_list_nests() {
        assert_eq!(md("<ul><li>a</li><ul><li>b</li></ul></ul>"), "- a\n  - b");
    }

    #[test]
    fn stray_text_in_a_list_gets_its_own_line() {
        assert_eq!(md("<ul><li>a</li>stray</ul>"), "- a\nstray");
    }

    #[test]
    fn repaired_items_inside_a_wrapper_in_a_list_keep_their_bullets() {
        assert_eq!(md("<ul><li>a</li><div><li>b</li><li>c</li></div></ul>"), "- a\n- b\n- c");
    }

    #[test]
    fn wrapper_text_in_a_list_precedes_its_items() {
        assert_eq!(md("<ul><li>a</li><div>Note<li>b</li></div></ul>"), "- a\nNote\n  - b");
    }
}
