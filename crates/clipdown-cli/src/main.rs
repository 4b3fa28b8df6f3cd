//! `clipdown` command-line interface.

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clipdown::notes::{NewNote, NoteClient, NotebookMatch, epoch_ms, resolve_notebook};
use clipdown::settings::SettingsOverrides;
use clipdown::{ClipOptions, ClipRequest, Clipper, Settings};
use tracing_subscriber::EnvFilter;

use cli::{Cli, RendererChoice};

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.generate_completion {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "clipdown", &mut io::stdout());
        return;
    }

    if cli.generate_man {
        let man = clap_mangen::Man::new(Cli::command());
        if let Err(e) = man.render(&mut io::stdout()) {
            eprintln!("Error generating man page: {e}");
            std::process::exit(1);
        }
        return;
    }

    init_tracing(cli.debug);

    if let Err(message) = run(&cli) {
        eprintln!("Error: {message}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("clipdown=debug,clipdown_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    if cli.ping {
        return ping(&note_client(&load_settings(cli)?)?);
    }
    if let Some(name) = &cli.find_notebook {
        return find_notebook(&note_client(&load_settings(cli)?)?, name);
    }

    let html = read_input(cli.input.as_deref())?;
    let mut request = ClipRequest::new(html).with_page(&cli.source_url, &cli.source_title);
    if let Some(text) = &cli.text {
        request = request.with_text(text);
    }

    let result = build_clipper(cli)?.clip(&request).map_err(|e| e.to_string())?;

    let rendered = if cli.json {
        serde_json::to_string_pretty(&result).map_err(|e| format!("Failed to serialize clip: {e}"))?
    } else {
        result.markdown.clone()
    };
    write_output(cli.output.as_deref(), &rendered)?;

    if cli.send {
        let settings = load_settings(cli)?;
        let client = note_client(&settings)?;
        let note = NewNote::from_clip(&result, &settings.notebook_id, epoch_ms());
        let created = client.create_note(&note).map_err(|e| e.to_string())?;
        let id = created.get("id").and_then(|id| id.as_str()).unwrap_or("?");
        let notebook = notebook_name(&client, &settings.notebook_id);
        eprintln!("Clipped \"{}\" to notebook {notebook} (note {id})", result.title);
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let settings = Settings::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    Ok(settings.override_with(SettingsOverrides {
        port: cli.port.clone(),
        token: cli.token.clone(),
        notebook_id: cli.notebook.clone(),
    }))
}

fn note_client(settings: &Settings) -> Result<NoteClient, String> {
    NoteClient::new(settings).map_err(|e| e.to_string())
}

fn build_clipper(cli: &Cli) -> Result<Clipper, String> {
    let clipper = Clipper::new(ClipOptions {
        render_timeout: Duration::from_millis(cli.render_timeout_ms),
    });
    match cli.renderer {
        RendererChoice::Builtin => Ok(clipper),
        #[cfg(feature = "rich")]
        RendererChoice::Rich => Ok(clipper.with_rich_renderer()),
        #[cfg(not(feature = "rich"))]
        RendererChoice::Rich => Err("the rich renderer is not available; rebuild with --features rich".to_string()),
    }
}

/// Title of the target notebook for display, or its id when the lookup fails.
fn notebook_name(client: &NoteClient, id: &str) -> String {
    match client.notebook(id) {
        Ok(notebook) if !notebook.title.is_empty() => notebook.title,
        Ok(_) => id.to_string(),
        Err(e) => {
            tracing::warn!(notebook = id, error = %e, "could not look up notebook");
            id.to_string()
        }
    }
}

fn ping(client: &NoteClient) -> Result<(), String> {
    client.ping().map_err(|e| format!("Connection failed: {e}"))?;
    match client.list_notebooks() {
        Ok(notebooks) => println!("Connection successful! Found {} notebook(s).", notebooks.len()),
        Err(e) => {
            tracing::warn!(error = %e, "could not list notebooks");
            println!("Connection successful! The note service is running.");
        }
    }
    Ok(())
}

fn find_notebook(client: &NoteClient, name: &str) -> Result<(), String> {
    let candidates = client.search_notebooks(name).map_err(|e| format!("Search failed: {e}"))?;
    match resolve_notebook(candidates) {
        NotebookMatch::None => Err(format!("No notebook matches '{name}'")),
        NotebookMatch::Unique(notebook) => {
            println!("{}\t{}", notebook.id, notebook.title);
            Ok(())
        }
        NotebookMatch::Ambiguous(notebooks) => {
            for notebook in &notebooks {
                println!("{}\t{}", notebook.id, notebook.title);
            }
            Err(format!(
                "{} notebooks match '{name}'; pick one id and pass it with --notebook",
                notebooks.len()
            ))
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).map_err(|e| format!("Error reading file '{}': {e}", path.display()))
        }
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("Error reading stdin: {e}"))?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<(), String> {
    let mut content = content.to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }

    match path {
        Some(path) => {
            fs::write(path, content).map_err(|e| format!("Error writing file '{}': {e}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("Error writing stdout: {e}"))
        }
    }
}
