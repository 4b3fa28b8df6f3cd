//! HTML fragment to Markdown conversion.
//!
//! Three stages run in order on an owned tree:
//!
//! 1. [`filter`] drops hidden and non-content nodes,
//! 2. [`repair`] wraps orphaned `<li>` elements in a `<ul>`,
//! 3. [`render`] writes Markdown with list nesting made explicit.

mod inline;
mod list;
mod main;
pub mod repair;
mod text;
pub mod visibility;

pub use main::render;
pub use repair::repair;
pub use visibility::filter;

use crate::dom::{Element, parse_fragment};
use crate::error::Result;

/// Filter and repair a parsed fragment.
pub fn prepare(root: Element) -> Element {
    repair(filter(root))
}

/// Convert an HTML fragment to Markdown with the built-in renderer.
///
/// # Errors
///
/// Returns [`crate::ClipError::Parse`] when neither parser accepts the input.
pub fn convert(html: &str) -> Result<String> {
    let root = prepare(parse_fragment(html)?);
    Ok(render(&root))
}
