use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{LevelFilter, error, info, warn};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use reasoner::dispatch::{Dispatch, Extractor, ToolDispatcher};
use reasoner::llm::{LlmClient, OpenAiClient};
use reasoner::reasoning::{QueryOutcome, Reasoner};
use reasoner::tools::{ToolCategory, ToolRegistry};

const EXIT_COMMAND: &str = "exit";

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reasoner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("reasoner.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // Admit everything until the configured level is known
    let env = env_logger::Env::default().default_filter_or("trace");
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(target))
        .init();
    if std::env::var_os("RUST_LOG").is_none() {
        log::set_max_level(LevelFilter::Info);
    }

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Apply the config's `log_level` unless RUST_LOG already decided
fn apply_log_level(level: Option<&str>) {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let filter = parse_log_level(level).unwrap_or_else(|| {
        warn!("Unknown log_level {:?}, using info", level);
        LevelFilter::Info
    });
    log::set_max_level(filter);
}

/// `None` when `level` is set but not a level name
fn parse_log_level(level: Option<&str>) -> Option<LevelFilter> {
    match level {
        Some(level) => level.parse().ok(),
        None => Some(LevelFilter::Info),
    }
}

fn build_dispatcher(config: &Config) -> Result<ToolDispatcher> {
    let extractor = Extractor::new(config.extractor_options()).context("Failed to compile tool matchers")?;
    Ok(ToolDispatcher::new(ToolRegistry::standard(), extractor))
}

fn build_reasoner(config: &Config) -> Result<Reasoner<OpenAiClient>> {
    let client = OpenAiClient::new(config.llm.to_openai_config()).context("Failed to create LLM client")?;
    if !client.is_ready() {
        eyre::bail!("API key in {} is empty", config.llm.api_key_env);
    }
    info!("Using model {} at {}", config.llm.model, config.llm.base_url);
    Ok(Reasoner::new(client, build_dispatcher(config)?, config.reasoner_options()))
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        None | Some(Commands::Chat) => run_chat(config).await,
        Some(Commands::Ask { query, json }) => handle_ask_command(query, *json, config).await,
        Some(Commands::Tools) => handle_tools_command(),
        Some(Commands::Dispatch { text, query }) => handle_dispatch_command(text, query, config),
    }
}

async fn run_chat(config: &Config) -> Result<()> {
    let reasoner = build_reasoner(config)?;

    println!("{}", "Tool-Enhanced Reasoning System".bold());
    println!("Type '{}' to quit.\n", EXIT_COMMAND);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", "Enter your query: ".cyan());
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read query")?;
        let query = line.trim();

        if query.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        if query.is_empty() {
            continue;
        }

        match reasoner.process(query).await {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) => {
                error!("Query failed: {}", e);
                println!("{} {}", "Error:".red(), e);
            }
        }
    }

    log_usage(&reasoner);
    info!("Session ended");
    Ok(())
}

async fn handle_ask_command(query: &str, json: bool, config: &Config) -> Result<()> {
    info!("Answering single query: {}", query);
    let reasoner = build_reasoner(config)?;
    let outcome = reasoner.process(query).await.context("Query failed")?;
    log_usage(&reasoner);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome).context("Failed to encode outcome")?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn handle_tools_command() -> Result<()> {
    let registry = ToolRegistry::standard();
    for category in [ToolCategory::Math, ToolCategory::String] {
        println!("{}", format!("{}:", category).bold());
        for tool in registry.in_category(category) {
            println!("  {}  {}", tool.signature.green(), tool.description);
        }
    }
    Ok(())
}

fn handle_dispatch_command(text: &str, query: &str, config: &Config) -> Result<()> {
    info!("Offline dispatch over {} bytes", text.len());
    let dispatcher = build_dispatcher(config)?;

    match dispatcher.dispatch(text, query) {
        Dispatch::NoTool => println!("{}", "No tool call found.".yellow()),
        Dispatch::Executed { call, result } => {
            println!("{} {}", "Tool Call:".green(), call);
            if result.is_error() {
                println!("{} {}", "Tool Result:".red(), result);
            } else {
                println!("{} {}", "Tool Result:".green(), result);
            }
        }
    }
    Ok(())
}

fn log_usage(reasoner: &Reasoner<OpenAiClient>) {
    let usage = reasoner.client().total_usage();
    info!(
        "Token usage: {} prompt + {} completion = {}",
        usage.input_tokens,
        usage.output_tokens,
        usage.total()
    );
}

fn print_outcome(outcome: &QueryOutcome) {
    println!("\n{}\n", outcome);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(config.log_level.as_deref());

    info!("Starting with config from: {:?}", cli.config);

    // API key may live in .env
    dotenvy::dotenv().ok();

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
