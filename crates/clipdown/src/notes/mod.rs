//! Delivery of clips to a local note service.
//!
//! The service speaks the Joplin Web Clipper REST protocol on
//! `http://localhost:{port}`; every request carries the API token as a
//! `token` query parameter.

mod client;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

pub use client::NoteClient;

use crate::clip::ClipResult;

/// Body of a note-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    /// Note title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Target notebook id.
    pub parent_id: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub user_created_time: i64,
    /// Title of the source page.
    pub source: String,
    /// URL of the source page.
    pub source_url: String,
}

impl NewNote {
    /// Note for a finished clip.
    pub fn from_clip(clip: &ClipResult, notebook_id: &str, created_ms: i64) -> Self {
        Self {
            title: clip.title.clone(),
            body: clip.markdown.clone(),
            parent_id: notebook_id.to_string(),
            user_created_time: created_ms,
            source: clip.source.clone(),
            source_url: clip.url.clone(),
        }
    }
}

/// A notebook (folder) on the note service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notebook {
    /// Notebook id, used as `parent_id` for new notes.
    pub id: String,
    /// Display title.
    pub title: String,
}

/// Outcome of looking a notebook up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotebookMatch {
    /// Nothing matched.
    None,
    /// Exactly one candidate.
    Unique(Notebook),
    /// Several candidates; the caller has to choose.
    Ambiguous(Vec<Notebook>),
}

/// Classify search results. Several candidates are never narrowed down here.
pub fn resolve_notebook(mut candidates: Vec<Notebook>) -> NotebookMatch {
    match candidates.len() {
        0 => NotebookMatch::None,
        1 => NotebookMatch::Unique(candidates.remove(0)),
        _ => NotebookMatch::Ambiguous(candidates),
    }
}

/// Current time in milliseconds since the Unix epoch.
pub fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
