//! `tobj` entrypoint: find a textobject in a file and print it.
//!
//! ```text
//! tobj notes.txt --line 3 --col 7 --id ')' --ai i
//! tobj notes.txt --line 3 --col 7 --id q --goto right
//! ```
//!
//! Lines and columns on the command line are 1-indexed. On success the region
//! (`line:col-line:col`) is printed followed by the selected text; `--goto`
//! prints the new cursor instead. A miss prints the not-found message.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{move_cursor, select_textobject};
use core_config::{Config, load_from};
use core_state::EditorState;
use core_text::{Buffer, Position};
use core_textobject::{AiType, SearchOptions, Side};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tobj", version, about = "Find textobjects in a file")]
struct Args {
    /// File to search (UTF-8 text).
    pub path: PathBuf,
    /// Cursor line (1-indexed).
    #[arg(long, default_value_t = 1)]
    pub line: usize,
    /// Cursor column in bytes (1-indexed).
    #[arg(long, default_value_t = 1)]
    pub col: usize,
    /// Textobject id, e.g. `)`, `q`, `t`.
    #[arg(long)]
    pub id: char,
    /// `a` (around) or `i` (inside).
    #[arg(long, default_value = "a")]
    pub ai: String,
    #[arg(long)]
    pub n_times: Option<usize>,
    #[arg(long)]
    pub n_lines: Option<usize>,
    /// One of cover, cover_or_next, cover_or_prev, cover_or_nearest.
    #[arg(long)]
    pub search_method: Option<String>,
    /// Move the cursor to the `left` or `right` edge instead of selecting.
    #[arg(long)]
    pub goto: Option<String>,
    /// Optional configuration file path (overrides discovery of `tobj.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join("tobj.log");
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, "tobj.log");
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }

    fn load_editor_state(args: &Args) -> Result<(EditorState, Config)> {
        let content = std::fs::read_to_string(&args.path)
            .with_context(|| format!("cannot read {}", args.path.display()))?;
        let name = args
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("file");
        tracing::debug!(target: "io", file = %args.path.display(), size_bytes = content.len(), "file_read_ok");

        let mut state = EditorState::new(Buffer::from_str(name, &content)?);
        state.file_name = Some(args.path.clone());
        state.set_cursor(Position::new(args.line.saturating_sub(1), args.col.saturating_sub(1)));

        let config = load_from(args.config.clone())?;
        Ok((state, config))
    }
}

fn search_options(args: &Args) -> Result<SearchOptions> {
    let opts = SearchOptions {
        n_lines: args.n_lines,
        n_times: args.n_times,
        ..Default::default()
    };
    Ok(match &args.search_method {
        Some(m) => opts.with_search_method_str(m)?,
        None => opts,
    })
}

fn run(args: &Args) -> Result<()> {
    let ai_type: AiType = args.ai.parse()?;
    let side = args.goto.as_deref().map(str::parse::<Side>).transpose()?;
    let opts = search_options(args)?;
    let (mut state, config) = AppStartup::load_editor_state(args)?;
    info!(
        target: "runtime.startup",
        path = %args.path.display(),
        config_override = args.config.is_some(),
        id = %args.id,
        "bootstrap_complete"
    );

    let found = match side {
        Some(side) => move_cursor(&mut state, &config, side, args.id, ai_type, &opts)?,
        None => select_textobject(&mut state, &config, args.id, ai_type, &opts)?,
    };

    match found {
        Some(_) if side.is_some() => {
            println!("cursor {}:{}", state.cursor.line + 1, state.cursor.byte + 1);
        }
        Some(region) => {
            println!("{region}");
            if let Some(span) = state.selection() {
                println!("{}", span.text(&state.buffer));
            }
        }
        None => {
            if let Some(notice) = state.take_notice() {
                println!("{}", notice.text);
            }
        }
    }
    Ok(())
}

fn main() {
    let mut startup = AppStartup::new();
    if let Err(e) = startup.configure_logging() {
        eprintln!("(textobject) {e:#}");
    }
    AppStartup::install_panic_hook();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        tracing::error!(target: "runtime", error = %e, "run_failed");
        eprintln!("(textobject) {e:#}");
        drop(startup);
        std::process::exit(1);
    }
}
