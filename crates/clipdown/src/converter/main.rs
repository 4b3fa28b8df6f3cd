//! Built-in Markdown renderer.
//!
//! Walks a filtered and repaired tree and emits Markdown for the subset of
//! elements that occur in clipped content: headings, paragraphs, emphasis,
//! code, links, line breaks, rules and lists. Unrecognized tags are unwrapped.
//! List layout lives in [`super::list`], inline wrappers in [`super::inline`].

use crate::dom::{Element, Node, TagKind};

use super::inline::{push_code_span, push_link, push_wrapped};
use super::list::{ListContext, render_list, render_orphan_item};
use super::text::{
    ensure_blank_line, ensure_line_start, postprocess, push_flow_text, push_inline_text, trim_trailing_whitespace,
};

/// How a `<br>` is written in the current context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineBreak<'a> {
    /// Plain newline.
    Newline,
    /// Newline followed by list continuation indentation.
    Continuation(&'a str),
    /// Single space; headings and link labels must stay on one line.
    Space,
}

/// Conversion context threaded through the tree walker.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Context<'a> {
    /// Inline-only output: no block separators, whitespace collapses.
    pub(crate) inline: bool,
    /// Leave out lists; they are rendered separately by the list renderer.
    pub(crate) skip_lists: bool,
    pub(crate) line_break: LineBreak<'a>,
}

const FLOW: Context<'static> = Context {
    inline: false,
    skip_lists: false,
    line_break: LineBreak::Newline,
};

pub(crate) const SINGLE_LINE: Context<'static> = Context {
    inline: true,
    skip_lists: false,
    line_break: LineBreak::Space,
};

/// Render a tree to Markdown.
///
/// The tree is expected to have gone through the visibility filter and list
/// repair; orphaned items that reach the renderer anyway are written as
/// single bullets.
pub fn render(root: &Element) -> String {
    let mut output = String::new();
    walk_children(&root.children, &mut output, FLOW);
    postprocess(&output)
}

pub(crate) fn walk_children(children: &[Node], output: &mut String, ctx: Context<'_>) {
    for child in children {
        walk_node(child, output, ctx);
    }
}

/// Render children inline into a fresh buffer, trimmed.
pub(crate) fn render_inline(children: &[Node], ctx: Context<'_>) -> String {
    let mut buffer = String::new();
    walk_children(children, &mut buffer, Context { inline: true, ..ctx });
    buffer.trim().to_string()
}

pub(crate) fn walk_node(node: &Node, output: &mut String, ctx: Context<'_>) {
    let element = match node {
        Node::Text(text) => {
            if ctx.inline {
                push_inline_text(output, text);
            } else {
                push_flow_text(output, text);
            }
            return;
        }
        Node::Element(element) => element,
    };

    match element.kind() {
        TagKind::List { .. } => {
            if ctx.skip_lists {
                return;
            }
            if ctx.inline {
                walk_children(&element.children, output, ctx);
                return;
            }
            ensure_blank_line(output);
            render_list(element, ListContext::root(element), output);
            ensure_blank_line(output);
        }

        TagKind::Item => {
            if ctx.inline {
                walk_children(&element.children, output, ctx);
                return;
            }
            ensure_line_start(output);
            render_orphan_item(element, output);
        }

        TagKind::Heading(level) => {
            let text = render_inline(&element.children, SINGLE_LINE);
            if ctx.inline {
                push_inline_text(output, &text);
                return;
            }
            if text.is_empty() {
                return;
            }
            ensure_blank_line(output);
            output.push_str(&"#".repeat(usize::from(level)));
            output.push(' ');
            output.push_str(&text);
            output.push_str("\n\n");
        }

        TagKind::Paragraph => {
            if ctx.inline {
                push_inline_text(output, " ");
                walk_children(&element.children, output, ctx);
                push_inline_text(output, " ");
                return;
            }
            let mut content = String::new();
            walk_children(&element.children, &mut content, ctx);
            let content = content.trim();
            if content.is_empty() {
                return;
            }
            ensure_blank_line(output);
            output.push_str(content);
            output.push_str("\n\n");
        }

        TagKind::LineBreak => match ctx.line_break {
            LineBreak::Newline => {
                trim_trailing_whitespace(output);
                output.push('\n');
            }
            LineBreak::Continuation(indent) => {
                trim_trailing_whitespace(output);
                output.push('\n');
                output.push_str(indent);
            }
            LineBreak::Space => push_inline_text(output, " "),
        },

        TagKind::Strong => push_wrapped(element, "**", output, ctx),
        TagKind::Emphasis => push_wrapped(element, "*", output, ctx),
        TagKind::Strikethrough => push_wrapped(element, "~~", output, ctx),
        TagKind::Code => push_code_span(&element.text_content(), output),
        TagKind::Link => push_link(element, output, ctx),

        TagKind::Preformatted => {
            let code = element.text_content();
            if ctx.inline {
                push_code_span(&code, output);
                return;
            }
            push_code_block(&code, output);
        }

        TagKind::Rule => {
            if ctx.inline {
                return;
            }
            ensure_blank_line(output);
            output.push_str("---\n\n");
        }

        TagKind::Block => {
            if ctx.inline {
                push_inline_text(output, " ");
                walk_children(&element.children, output, ctx);
                push_inline_text(output, " ");
                return;
            }
            ensure_line_start(output);
            walk_children(&element.children, output, ctx);
            ensure_line_start(output);
        }

        // Form controls are flattened by the visibility filter; scripts and
        // controls never carry note content.
        TagKind::Input | TagKind::TextArea | TagKind::NonContent => {}

        TagKind::Other => walk_children(&element.children, output, ctx),
    }
}

fn push_code_block(code: &str, output: &mut String) {
    let code = code.strip_prefix('\n').unwrap_or(code).trim_end();
    if code.trim().is_empty() {
        return;
    }
    let fence = if code.contains("```") { "~~~" } else { "```" };
    ensure_blank_line(output);
    output.push_str(fence);
    output.push('\n');
    output.push_str(code);
    output.push('\n');
    output.push_str(fence);
    output.push_str("\n\n");
}
