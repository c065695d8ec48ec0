use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use factcheck_lib::app_state::AppState;
use factcheck_lib::{check_failed_message, load_settings, shell, view, DOTENV_FILE};
use fcb_ai::gemini::{ensure_supported_model, GeminiClient};
use fcb_core::error::AppError;
use fcb_core::settings::Settings;
use fcb_core::store::SqliteRecordStore;

/// Verify claims with a Gemini model and web search.
#[derive(Parser)]
#[command(name = "factcheck", version, about, long_about = None)]
struct Cli {
    /// Subcommand (if not provided, starts the interactive shell)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fact-check one claim and print the full result
    Check {
        /// The claim to verify
        claim: String,
    },
    /// List stored fact-checks, oldest first
    History,
    /// Show one stored fact-check in full
    Show {
        /// Position in the history list (starting at 1)
        n: usize,
    },
    /// Delete every stored fact-check
    Clear,
    /// Check that the configured model is reachable
    Health,
    /// Interactive session (default)
    Shell,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn health(settings: &Settings) -> Result<(), AppError> {
    ensure_supported_model(&settings.llm_model)?;
    let client = GeminiClient::new(
        &settings.gemini_base_url,
        settings.gemini_api_key.as_deref().unwrap_or_default(),
    )?;
    client.health_check(&settings.llm_model)?;
    println!("Gemini reachable at {} (model {})", client.base_url(), settings.llm_model);
    Ok(())
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = load_settings(Some(Path::new(DOTENV_FILE)))?;
    let store = SqliteRecordStore::new(settings.db_path.clone());
    store.init()?;
    let mut app = AppState::new(settings, store);

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Check { claim } => {
            let result = app
                .submit_claim(&claim)
                .map_err(|e| AppError::new("CHECK_FAILED", check_failed_message(&e)))?;
            print!("{}", view::render_detail(result));
        }
        Commands::History => print!("{}", view::render_history(app.history())),
        Commands::Show { n } => {
            let index = n.checked_sub(1).ok_or_else(|| {
                AppError::new("HISTORY_INDEX_OUT_OF_RANGE", "History positions start at 1")
            })?;
            let result = app.select(index)?;
            print!("{}", view::render_detail(result));
        }
        Commands::Clear => {
            let removed = app.clear_history()?;
            println!("Cleared {removed} fact-check(s).");
        }
        Commands::Health => health(app.settings())?,
        Commands::Shell => {
            let stdin = io::stdin();
            shell::run(&mut app, stdin.lock(), io::stdout())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.code == "CHECK_FAILED" => {
            eprintln!("{}", e.message);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(code = %e.code, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
