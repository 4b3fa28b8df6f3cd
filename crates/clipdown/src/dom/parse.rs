//! Fragment parsing on top of `tl`, with html5ever as the repair path.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Element, Node};
use crate::error::{ClipError, Result};

static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("script/style pattern is valid")
});
static LI_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<li[\s>/]").expect("li open pattern is valid"));
static LI_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</li\s*>").expect("li close pattern is valid"));
// Custom elements must have a hyphen in their tag name, not in attributes.
static CUSTOM_ELEMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?[a-z][a-z0-9]*-[a-z0-9-]*[\s/>]").expect("custom element pattern is valid"));

/// Name of the synthetic element that holds a parsed fragment.
pub const FRAGMENT_ROOT: &str = "div";

/// Parse an HTML fragment into an owned tree under a synthetic `div` root.
///
/// Script and style bodies are cut before parsing so that markup-like text
/// inside them cannot confuse the tokenizer. Fragments whose `<li>` tags are
/// left open rely on implied end tags, which `tl` does not implement; those
/// and fragments using custom elements are normalized through html5ever
/// first, as is anything `tl` rejects.
pub fn parse_fragment(html: &str) -> Result<Element> {
    let stripped = strip_script_and_style_tags(html);

    if has_unclosed_list_items(&stripped) || CUSTOM_ELEMENT.is_match(&stripped) {
        if let Some(repaired) = repair_with_html5ever(&stripped) {
            tracing::debug!("normalized fragment with html5ever");
            return parse_with_tl(&repaired);
        }
    }

    match parse_with_tl(&stripped) {
        Ok(root) => Ok(root),
        Err(err) => {
            tracing::debug!(error = %err, "tl rejected fragment, retrying through html5ever");
            let repaired = repair_with_html5ever(&stripped)
                .ok_or_else(|| ClipError::Parse("Failed to parse HTML".to_string()))?;
            parse_with_tl(&repaired)
        }
    }
}

/// True when the fragment contains at least one markup tag.
pub fn looks_like_markup(input: &str) -> bool {
    static TAG: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<(?:[A-Za-z][A-Za-z0-9-]*|/[A-Za-z]|!--)").expect("tag pattern is valid"));
    TAG.is_match(input)
}

fn strip_script_and_style_tags(html: &str) -> Cow<'_, str> {
    SCRIPT_OR_STYLE.replace_all(html, "")
}

fn has_unclosed_list_items(html: &str) -> bool {
    LI_OPEN.find_iter(html).count() > LI_CLOSE.find_iter(html).count()
}

fn parse_with_tl(html: &str) -> Result<Element> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|err| ClipError::Parse(format!("Failed to parse HTML: {err:?}")))?;
    let parser = dom.parser();

    let mut root = Element::new(FRAGMENT_ROOT);
    for handle in dom.children() {
        convert_node(*handle, parser, &mut root.children);
    }
    Ok(root)
}

fn convert_node(handle: tl::NodeHandle, parser: &tl::Parser, out: &mut Vec<Node>) {
    let Some(node) = handle.get(parser) else {
        return;
    };

    match node {
        tl::Node::Raw(bytes) => {
            let raw = bytes.as_utf8_str();
            if !raw.is_empty() {
                out.push(Node::Text(html_escape::decode_html_entities(&raw).into_owned()));
            }
        }
        tl::Node::Comment(_) => {}
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            if is_metadata_tag(&name) {
                return;
            }

            let mut element = Element::new(name);
            for (key, value) in tag.attributes().iter() {
                let value = value
                    .map(|v| html_escape::decode_html_entities(&v).into_owned())
                    .unwrap_or_default();
                element.attrs.insert(key.to_ascii_lowercase(), value);
            }

            let children = tag.children();
            for child_handle in children.top().iter() {
                convert_node(*child_handle, parser, &mut element.children);
            }

            // Document wrappers from html5ever normalization carry no content of their own.
            if matches!(element.name.as_str(), "html" | "body") {
                out.extend(element.children);
            } else {
                out.push(Node::Element(element));
            }
        }
    }
}

fn is_metadata_tag(name: &str) -> bool {
    matches!(name, "head" | "title" | "meta" | "link" | "base" | "template" | "!doctype")
}

/// Try to repair HTML using html5ever parser.
///
/// Returns Some(repaired_html) if repair was successful, None otherwise.
fn repair_with_html5ever(input: &str) -> Option<String> {
    use html5ever::serialize::{SerializeOpts, serialize};
    use html5ever::tendril::TendrilSink;
    use markup5ever_rcdom::{RcDom, SerializableHandle};

    let dom = html5ever::parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut input.as_bytes())
        .ok()?;

    let mut buf = Vec::with_capacity(input.len());
    let handle = SerializableHandle::from(dom.document);
    serialize(&mut buf, &handle, SerializeOpts::default()).ok()?;
    String::from_utf8(buf).ok()
}
