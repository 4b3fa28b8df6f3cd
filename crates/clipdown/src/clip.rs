//! The clip pipeline: selection in, Markdown note content out.
//!
//! A clip parses the selected fragment, drops invisible nodes, repairs
//! orphaned list items and renders Markdown. An optional richer renderer can
//! be placed in front of the built-in one; it runs on a worker thread with a
//! deadline and any failure falls back to the built-in renderer.

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::converter::{prepare, render};
use crate::dom::Element;
use crate::dom::parse::{looks_like_markup, parse_fragment};
use crate::error::{ClipError, RenderError, Result};
use crate::title::derive_title;

/// Default deadline for a richer renderer.
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(5);

/// A selection to clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipRequest {
    /// Selected HTML fragment.
    pub html: String,
    /// Plain-text selection, used when the HTML has no usable content.
    pub text: Option<String>,
    /// URL of the page the selection came from.
    pub page_url: String,
    /// Title of the page the selection came from.
    pub page_title: String,
}

impl ClipRequest {
    /// Request for an HTML fragment with no page information.
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Self::default()
        }
    }

    /// Builder: plain-text selection.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: source page URL and title.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.page_url = url.into();
        self.page_title = title.into();
        self
    }
}

/// Output of one clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipResult {
    /// Rendered Markdown.
    pub markdown: String,
    /// Repaired HTML, before rendering.
    pub html: String,
    /// Plain-text projection of the repaired fragment.
    pub text: String,
    /// Note title derived from the Markdown.
    pub title: String,
    /// Source page URL.
    pub url: String,
    /// Source page title.
    pub source: String,
}

/// A Markdown renderer that may be tried before the built-in one.
pub trait MarkdownRenderer: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &str;

    /// Render repaired HTML to Markdown.
    ///
    /// # Errors
    ///
    /// Any error makes the pipeline fall back to the built-in renderer.
    fn render(&self, html: &str) -> std::result::Result<String, RenderError>;
}

/// Pipeline options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipOptions {
    /// Deadline for the richer renderer.
    pub render_timeout: Duration,
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            render_timeout: DEFAULT_RENDER_TIMEOUT,
        }
    }
}

/// Runs clips. Cheap to clone; holds no per-clip state.
#[derive(Clone, Default)]
pub struct Clipper {
    options: ClipOptions,
    rich: Option<Arc<dyn MarkdownRenderer>>,
}

impl std::fmt::Debug for Clipper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipper")
            .field("options", &self.options)
            .field("rich", &self.rich.as_ref().map(|renderer| renderer.name()))
            .finish()
    }
}

impl Clipper {
    /// Clipper with the built-in renderer only.
    pub fn new(options: ClipOptions) -> Self {
        Self { options, rich: None }
    }

    /// Builder: try `renderer` before the built-in renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn MarkdownRenderer>) -> Self {
        self.rich = Some(renderer);
        self
    }

    /// Builder: use `html-to-markdown-rs` as the richer renderer.
    #[cfg(feature = "rich")]
    #[must_use]
    pub fn with_rich_renderer(self) -> Self {
        self.with_renderer(Arc::new(HtmlToMarkdownRenderer))
    }

    /// Clip a selection.
    ///
    /// Input without any markup is taken as plain text and returned trimmed.
    /// When the fragment has no visible text after filtering, the plain-text
    /// selection is used instead.
    ///
    /// # Errors
    ///
    /// [`ClipError::EmptySelection`] when neither the HTML nor the text
    /// selection has content; [`ClipError::Parse`] when the HTML cannot be
    /// parsed and there is no text selection to fall back to.
    pub fn clip(&self, request: &ClipRequest) -> Result<ClipResult> {
        let html = request.html.trim();
        if html.is_empty() {
            tracing::debug!("no HTML selection, using text fallback");
            return Self::clip_text(request);
        }
        if !looks_like_markup(html) {
            return Ok(finish(request, html.to_string(), html.to_string(), html.to_string()));
        }

        let root = match parse_fragment(html) {
            Ok(root) => prepare(root),
            Err(err) if has_text(request) => {
                tracing::warn!(error = %err, "could not parse selection, using text fallback");
                return Self::clip_text(request);
            }
            Err(err) => return Err(err),
        };

        let text = root.text_content();
        if text.trim().is_empty() {
            tracing::debug!("selection has no visible text, using text fallback");
            return Self::clip_text(request);
        }

        let repaired = root.inner_html();
        let mut markdown = self.render_with_fallback(&repaired, &root);
        if markdown.is_empty() {
            markdown = text.trim().to_string();
        }
        tracing::debug!(html_len = repaired.len(), markdown_len = markdown.len(), "clip converted");
        Ok(finish(request, markdown, repaired, text))
    }

    /// Render repaired HTML, preferring the richer renderer when one is set.
    ///
    /// The built-in renderer runs whenever the richer one times out, fails,
    /// panics or returns blank output.
    pub fn render_with_fallback(&self, html: &str, root: &Element) -> String {
        if let Some(renderer) = &self.rich {
            match run_with_deadline(Arc::clone(renderer), html, self.options.render_timeout) {
                Ok(markdown) => {
                    tracing::debug!(renderer = renderer.name(), "rich renderer succeeded");
                    return markdown;
                }
                Err(err) => {
                    tracing::warn!(renderer = renderer.name(), error = %err, "using built-in renderer");
                }
            }
        }
        render(root)
    }

    fn clip_text(request: &ClipRequest) -> Result<ClipResult> {
        let text = request.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            return Err(ClipError::EmptySelection);
        }
        Ok(finish(request, text.to_string(), text.to_string(), text.to_string()))
    }
}

fn finish(request: &ClipRequest, markdown: String, html: String, text: String) -> ClipResult {
    ClipResult {
        title: derive_title(&markdown, &request.page_title),
        markdown,
        html,
        text,
        url: request.page_url.clone(),
        source: request.page_title.clone(),
    }
}

fn has_text(request: &ClipRequest) -> bool {
    request.text.as_deref().is_some_and(|text| !text.trim().is_empty())
}

fn run_with_deadline(
    renderer: Arc<dyn MarkdownRenderer>,
    html: &str,
    timeout: Duration,
) -> std::result::Result<String, RenderError> {
    let (tx, rx) = mpsc::channel();
    let html = html.to_string();
    thread::Builder::new()
        .name("clipdown-render".to_owned())
        .spawn(move || {
            let _ = tx.send(renderer.render(&html));
        })
        .map_err(|err| RenderError::Failed(err.to_string()))?;

    // A panicking renderer drops the sender without sending.
    match rx.recv_timeout(timeout) {
        Ok(Ok(markdown)) if markdown.trim().is_empty() => Err(RenderError::Empty),
        Ok(Ok(markdown)) => Ok(markdown.trim().to_string()),
        Ok(Err(err)) => Err(err),
        Err(RecvTimeoutError::Timeout) => Err(RenderError::Timeout(timeout)),
        Err(RecvTimeoutError::Disconnected) => Err(RenderError::Panicked),
    }
}

/// `html-to-markdown-rs` as a richer renderer.
#[cfg(feature = "rich")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlToMarkdownRenderer;

#[cfg(feature = "rich")]
impl MarkdownRenderer for HtmlToMarkdownRenderer {
    fn name(&self) -> &str {
        "html-to-markdown-rs"
    }

    fn render(&self, html: &str) -> std::result::Result<String, RenderError> {
        html_to_markdown_rs::convert(html, None).map_err(|err| RenderError::Failed(err.to_string()))
    }
}
