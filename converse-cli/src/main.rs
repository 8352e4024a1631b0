//! Converse CLI - chat with a local Ollama server.
//!
//! `converse` (or `converse chat`) starts the REPL; `converse agent <PROMPT>`
//! runs the single-shot agent once and prints the reply.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use converse::agent::run_single_shot;
use converse::chat::{ChatSession, SessionOutcome};
use converse::transport::OllamaTransport;
use converse_cli::config::{AppConfig, load_config, load_config_from};
use converse_cli::error::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Converse - talk to a local Ollama model
#[derive(Parser)]
#[command(name = "converse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "CONVERSE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default)
    Chat(ChatArgs),

    /// Send one prompt through the single-node agent graph
    Agent(AgentArgs),
}

/// Options shared by both commands.
#[derive(Args, Default)]
struct ServerArgs {
    /// Model to use (overrides config and `OLLAMA_MODEL`)
    #[arg(short, long)]
    model: Option<String>,

    /// Server base URL (overrides config and `OLLAMA_BASE_URL`)
    #[arg(long)]
    base_url: Option<String>,
}

/// Arguments for the chat command
#[derive(Args, Default)]
struct ChatArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Input that ends the session (case-insensitive)
    #[arg(short, long)]
    quit_word: Option<String>,
}

/// Arguments for the agent command
#[derive(Args)]
struct AgentArgs {
    #[command(flatten)]
    server: ServerArgs,

    /// Prompt seeded as the only user message
    prompt: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Logs go to stderr so they never interleave with the REPL on stdout.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "converse={level},converse_cli={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command.unwrap_or_else(|| Commands::Chat(ChatArgs::default())) {
        Commands::Chat(args) => cmd_chat(args, cli.config).await,
        Commands::Agent(args) => cmd_agent(args, cli.config).await,
    }
}

/// Load the file, then apply environment and flag overrides.
async fn resolve_config(path: Option<PathBuf>, server: ServerArgs) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(&path).await?,
        None => load_config().await?,
    };
    Ok(config
        .with_env_overrides()
        .with_overrides(server.base_url, server.model))
}

/// Start interactive chat.
///
/// Returns success in every path, including an unreachable server.
async fn cmd_chat(args: ChatArgs, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = resolve_config(config_path, args.server).await?;
    let mut options = config.chat_options();
    if let Some(word) = args.quit_word {
        options = options.quit_word(word);
    }

    println!("Starting the AI assistant ({})...", config.server.model);

    let transport = OllamaTransport::new(config.transport_config())?;
    let mut session = ChatSession::new(transport, options);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let outcome = session.run(stdin, &mut stdout).await?;

    match outcome {
        SessionOutcome::ServerUnavailable => tracing::info!("exiting, server unavailable"),
        SessionOutcome::Finished | SessionOutcome::InputClosed => tracing::info!(
            messages = session.conversation().len(),
            "chat ended"
        ),
    }
    Ok(ExitCode::SUCCESS)
}

/// Run the single-shot agent.
///
/// A failed run is returned as an error and ends with a failure exit code.
async fn cmd_agent(args: AgentArgs, config_path: Option<PathBuf>) -> Result<ExitCode> {
    let config = resolve_config(config_path, args.server).await?;
    let transport = OllamaTransport::new(config.transport_config())?;

    let state = run_single_shot(transport, args.prompt).await?;

    println!("{}", state.reply().unwrap_or_default());
    Ok(ExitCode::SUCCESS)
}
