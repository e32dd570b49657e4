//! taxmate CLI: Command-line chat client for the TaxMate tax assistant

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use taxmate_core::{AssistantClient, ChatSession, Config, ConfigError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal chat client for the TaxMate tax assistant
#[derive(Parser)]
#[command(name = "taxmate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chat service endpoint, overriding the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Color theme: mocha, latte, or high-contrast
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Ask one question and print the reply
    Ask {
        /// The question to send
        question: String,

        /// Output the full exchange as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        None | Some(Commands::Tui) => {
            // Default: open TUI. Logging stays off so nothing writes to the
            // alternate screen.
            let config = load_config_or_exit(&cli);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(taxmate_tui::run_tui(&config)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { question, json }) => {
            init_logging();
            let config = load_config_or_exit(&cli);
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(cmd_ask(&config, question, *json));
        }
        Some(Commands::Init { force }) => {
            init_logging();
            // Init never reads the existing file, so a corrupt config can
            // still be replaced.
            let config = apply_overrides(Config::default(), &cli);
            cmd_init(cli.config.as_deref(), &config, *force);
        }
    }
}

/// Initialize logging for headless commands.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taxmate_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Apply `--endpoint` and `--theme` flags on top of a loaded config.
fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    config
}

fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let path = cli.config.clone().or_else(Config::default_path);
    let config = match &path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    Ok(apply_overrides(config, cli))
}

fn load_config_or_exit(cli: &Cli) -> Config {
    match load_config(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Run one question/reply round trip and print the result.
///
/// Failures surface the same fallback message the TUI shows; details go to
/// the log.
async fn cmd_ask(config: &Config, question: &str, json: bool) {
    let mut session = ChatSession::new();
    let Some(text) = session.submit(question) else {
        eprintln!("Error: the question is empty");
        std::process::exit(1);
    };

    let client = AssistantClient::new(&config.endpoint);
    let outcome = client.send(&text).await;
    session.settle(outcome);

    if json {
        let messages: Vec<_> = session
            .conversation()
            .messages()
            .iter()
            .map(|m| serde_json::json!({ "role": m.role.to_string(), "content": m.content }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&messages).expect("failed to serialize")
        );
        return;
    }

    if let Some(reply) = session.conversation().last() {
        println!("{}", reply.content);
    }
}

fn cmd_init(explicit_path: Option<&Path>, config: &Config, force: bool) {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => match Config::default_path() {
            Some(path) => path,
            None => {
                eprintln!("Error: no config directory available on this platform");
                std::process::exit(1);
            }
        },
    };

    if path.exists() && !force {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return;
    }

    match config.save(&path) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => {
            eprintln!("Failed to write config: {e}");
            std::process::exit(1);
        }
    }
}
