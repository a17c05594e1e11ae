use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tensorgate::check::{error_body, run_check, Check};
use tensorgate::input::read_json_file;
use tensorgate::ValidationLimits;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Validate tensor search request bodies
#[derive(Parser, Debug)]
#[command(name = "tensorgate")]
#[command(about = "Validate and normalize tensor search request bodies", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add-documents body: {documents, mappings?, non_tensor_fields?, index_settings?}
    Documents { file: PathBuf },
    /// Mappings object
    Mappings { file: PathBuf },
    /// Index settings, autofilled from the defaults
    Settings { file: PathBuf },
    /// Search context
    SearchContext { file: PathBuf },
    /// Score modifiers
    ScoreModifiers { file: PathBuf },
    /// Delete-documents request
    Delete { file: PathBuf },
    /// Index name as a JSON string
    IndexName { file: PathBuf },
}

impl Command {
    fn into_parts(self) -> (Check, PathBuf) {
        match self {
            Command::Documents { file } => (Check::Documents, file),
            Command::Mappings { file } => (Check::Mappings, file),
            Command::Settings { file } => (Check::Settings, file),
            Command::SearchContext { file } => (Check::SearchContext, file),
            Command::ScoreModifiers { file } => (Check::ScoreModifiers, file),
            Command::Delete { file } => (Check::Delete, file),
            Command::IndexName { file } => (Check::IndexName, file),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let limits = ValidationLimits::from_env()?;

    let (check, file) = args.command.into_parts();
    info!("Checking {} from {:?}", check, file);
    let body = read_json_file(&file)?;

    let (output, failed) = match run_check(check, &body, &limits) {
        Ok(value) => {
            let failed = value.get("errors").and_then(|e| e.as_bool()).unwrap_or(false);
            (value, failed)
        }
        Err(e) => (error_body(&e), true),
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    if failed {
        anyhow::bail!("{} check failed", check);
    }
    Ok(())
}
