//! Inline wrappers: emphasis markers, code spans and links.

use crate::dom::Element;

use super::main::{Context, LineBreak, render_inline};
use super::text::push_inline_text;

/// Wrap the rendered children of `element` in `marker`.
///
/// Whitespace at the edges of the element is moved outside the markers, so
/// `a<b> b </b>c` becomes `a **b** c`. An element without visible text emits
/// no markers at all.
pub(crate) fn push_wrapped(element: &Element, marker: &str, output: &mut String, ctx: Context<'_>) {
    let inner = render_inline(&element.children, ctx);
    let raw = element.text_content();

    if inner.is_empty() {
        if raw.chars().any(char::is_whitespace) {
            push_inline_text(output, " ");
        }
        return;
    }

    if raw.starts_with(char::is_whitespace) {
        push_inline_text(output, " ");
    }
    output.push_str(marker);
    output.push_str(&inner);
    output.push_str(marker);
    if raw.ends_with(char::is_whitespace) {
        push_inline_text(output, " ");
    }
}

/// Emit a code span, widening the fence when the code holds a backtick.
pub(crate) fn push_code_span(text: &str, output: &mut String) {
    let code = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if code.is_empty() {
        return;
    }
    if code.contains('`') {
        output.push_str("`` ");
        output.push_str(&code);
        output.push_str(" ``");
    } else {
        output.push('`');
        output.push_str(&code);
        output.push('`');
    }
}

/// Emit `[label](href)`, or just the label when there is no usable href.
pub(crate) fn push_link(element: &Element, output: &mut String, ctx: Context<'_>) {
    let label = render_inline(
        &element.children,
        Context {
            line_break: LineBreak::Space,
            ..ctx
        },
    );
    if label.is_empty() {
        if element.text_content().chars().any(char::is_whitespace) {
            push_inline_text(output, " ");
        }
        return;
    }

    match element.attr("href").map(str::trim).filter(|href| !href.is_empty()) {
        Some(href) => {
            output.push('[');
            output.push_str(&label);
            output.push_str("](");
            output.push_str(href);
            output.push(')');
        }
        None => output.push_str(&label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::convert;

    #[test]
    fn edge_whitespace_moves_outside_markers() {
        assert_eq!(convert("<p>x<em> y </em>z</p>").unwrap(), "x *y* z");
    }

    #[test]
    fn nested_wrappers_compose() {
        assert_eq!(
            convert("<p><strong>very <em>important</em></strong></p>").unwrap(),
            "**very *important***"
        );
    }

    #[test]
    fn code_span_with_backtick_uses_double_fence() {
        let mut out = String::new();
        push_code_span("let s = `x`;", &mut out);
        assert_eq!(out, "`` let s = `x`; ``");
    }

    #[test]
    fn code_span_collapses_whitespace_and_skips_empty() {
        let mut out = String::new();
        push_code_span("  a\n   b ", &mut out);
        push_code_span("   ", &mut out);
        assert_eq!(out, "`a b`");
    }

    #[test]
    fn link_labels_stay_on_one_line() {
        assert_eq!(
            convert(r#"<p><a href=" /docs ">first<br>second</a></p>"#).unwrap(),
            "[first second](/docs)"
        );
    }

    #[test]
    fn empty_href_keeps_only_the_label() {
        assert_eq!(convert(r#"<p><a href="">plain</a></p>"#).unwrap(), "plain");
    }

    #[test]
    fn links_without_label_are_dropped() {
        assert_eq!(convert(r#"<p>a<a href="https://x.test/"> </a>b</p>"#).unwrap(), "a b");
    }
}
