#![allow(clippy::module_name_repetitions)]
//! Clip HTML selections into Markdown notes.
//!
//! A selection cut out of a live page is rarely well-formed: list items lose
//! their `<ul>`/`<ol>`, hidden nodes come along, form controls carry state
//! that only exists in the page. `clipdown` parses such a fragment, prunes
//! what is not visible, repairs orphaned list items and renders Markdown in
//! which list nesting and numbering are explicit.
//!
//! ```
//! let markdown = clipdown::convert("<li>Milk</li><li>Eggs</li><p>Shopping</p>").unwrap();
//! assert_eq!(markdown, "Shopping\n\n- Milk\n- Eggs");
//! ```
//!
//! [`Clipper`] runs the full pipeline, optionally with a richer renderer in
//! front of the built-in one, and [`notes::NoteClient`] delivers the result
//! to a local note service.

pub mod clip;
pub mod converter;
pub mod dom;
pub mod error;
pub mod notes;
pub mod settings;
pub mod title;

pub use clip::{ClipOptions, ClipRequest, ClipResult, Clipper, MarkdownRenderer};
#[cfg(feature = "rich")]
pub use clip::HtmlToMarkdownRenderer;
pub use converter::{convert, filter, render, repair};
pub use error::{ClipError, DeliveryError, RenderError, Result};
pub use settings::Settings;
pub use title::derive_title;
