use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_complete::Shell;

/// Convert a clipped HTML selection to Markdown and optionally file it as a note
#[derive(Parser, Debug)]
#[command(name = "clipdown", version, about, long_about = None)]
#[command(after_help = "Examples:\n  \
    clipdown selection.html\n  \
    pbpaste | clipdown --source-url https://example.com/post --json\n  \
    clipdown selection.html --send --token $TOKEN --notebook 0123abcd\n  \
    clipdown --find-notebook Clips")]
pub struct Cli {
    /// Input HTML file (use "-" or omit for stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// URL of the page the selection came from
    #[arg(long, value_name = "URL", default_value = "")]
    pub source_url: String,

    /// Title of the page the selection came from; also the fallback note title
    #[arg(long, value_name = "TITLE", default_value = "")]
    pub source_title: String,

    /// Plain-text selection, used when the HTML has no visible content
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Print the full clip result as JSON instead of Markdown
    #[arg(long)]
    pub json: bool,

    /// Create a note from the clip
    #[arg(long)]
    pub send: bool,

    /// Check that the note service is reachable, then exit
    #[arg(long, conflicts_with_all = ["send", "find_notebook", "input"])]
    pub ping: bool,

    /// Look notebooks up by name and print their ids, then exit
    #[arg(long, value_name = "NAME", conflicts_with_all = ["send", "input"])]
    pub find_notebook: Option<String>,

    /// Note service port
    #[arg(long, value_name = "PORT", env = "CLIPDOWN_PORT")]
    pub port: Option<String>,

    /// Note service API token
    #[arg(long, value_name = "TOKEN", env = "CLIPDOWN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Id of the notebook that receives new notes
    #[arg(long, value_name = "ID", env = "CLIPDOWN_NOTEBOOK")]
    pub notebook: Option<String>,

    /// Settings file (default: <config dir>/clipdown/settings.toml)
    #[arg(long, value_name = "FILE", env = "CLIPDOWN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Markdown renderer; "rich" falls back to the built-in one on failure
    #[arg(long, value_enum, default_value_t = RendererChoice::Builtin)]
    pub renderer: RendererChoice,

    /// Deadline for the rich renderer, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5000, value_parser = clap::value_parser!(u64).range(1..))]
    pub render_timeout_ms: u64,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    pub generate_completion: Option<Shell>,

    /// Generate man page
    #[arg(long)]
    pub generate_man: bool,
}

/// Markdown renderer selection.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererChoice {
    /// List-aware built-in renderer
    Builtin,
    /// html-to-markdown-rs, with the built-in renderer as fallback
    Rich,
}
