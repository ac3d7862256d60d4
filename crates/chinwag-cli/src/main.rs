//! chinwag CLI: terminal chatbot for the Gemini generateContent API

use clap::{Parser, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chinwag_engine::{Config, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use chinwag_tui::Theme;

/// Terminal chatbot with a single conversation pane
#[derive(Parser)]
#[command(name = "chinwag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the completion service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model to request completions from
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// API key (falls back to the GEMINI_API_KEY environment variable)
    #[arg(long)]
    api_key: Option<String>,

    /// Color theme
    #[arg(long, value_enum, default_value_t = ThemeChoice::Mocha)]
    theme: ThemeChoice,

    /// Append debug logs to this file (the terminal stays clean)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeChoice {
    Mocha,
    Latte,
    HighContrast,
}

impl ThemeChoice {
    fn theme(self) -> Theme {
        match self {
            ThemeChoice::Mocha => Theme::mocha(),
            ThemeChoice::Latte => Theme::latte(),
            ThemeChoice::HighContrast => Theme::high_contrast(),
        }
    }
}

/// Set up logging to the given file.
///
/// The returned guard must stay alive for the whole run so buffered log
/// lines are flushed on exit.
fn init_logging(path: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = path.file_name().unwrap_or_else(|| OsStr::new("chinwag.log"));

    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "chinwag=debug,chinwag_engine=debug,chinwag_tui=debug",
                )
            }),
        )
        .init();
    guard
}

fn main() {
    let cli = Cli::parse();

    // Keep the logging guard alive until the TUI exits
    let _log_guard = cli.log_file.as_deref().map(init_logging);

    let api_key = match cli.api_key.or_else(|| std::env::var("GEMINI_API_KEY").ok()) {
        Some(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: no API key given; pass --api-key or set GEMINI_API_KEY");
            std::process::exit(1);
        }
    };

    let config = Config {
        endpoint: cli.endpoint,
        model: cli.model,
        api_key,
    };
    let theme = cli.theme.theme();

    tracing::info!(version = chinwag_tui::tui_version(), "starting chinwag");

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    if let Err(e) = rt.block_on(chinwag_tui::run_tui(config, theme)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
