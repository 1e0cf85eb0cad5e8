//! Calldash — voice-agent tool runtime.
//!
//! Usage:
//!   calldash init                 Write a default settings file
//!   calldash tools                List the tools built from the configuration
//!   calldash prompt               Print the assembled system prompt
//!   calldash blueprint            Print the full agent blueprint as JSON
//!   calldash call <tool> ...      Invoke one tool locally

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use calldash::agent::AgentBlueprint;
use calldash::config::{self, AgentSettings, Secrets};
use calldash::session::{
    ConsoleSession, JobShutdown, LiveKitRoomTerminator, SessionTerminator,
};
use calldash::store::ConfigService;
use calldash::tools::{ToolContext, ToolSet};

const CONFIG_FILE: &str = "calldash.toml";

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "calldash")]
#[command(version = "0.1.0")]
#[command(about = "Tool runtime for a voice conversational agent")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to calldash home directory (default: ~/.calldash).
    #[arg(long)]
    home: Option<String>,

    /// Log level (debug, info, warn, error). Defaults to the settings file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default settings file.
    Init {
        /// Overwrite an existing settings file.
        #[arg(long)]
        force: bool,
    },

    /// Load the configuration and list the tools it produces.
    Tools,

    /// Print the system prompt and session instruction.
    Prompt,

    /// Print the agent blueprint as JSON.
    Blueprint,

    /// Invoke a single tool and print its result.
    Call {
        /// Tool name.
        tool: String,

        /// Argument as key=value (repeatable).
        #[arg(long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// Arguments as a JSON object; --arg values take precedence.
        #[arg(long)]
        json: Option<String>,

        /// LiveKit room that end_call should delete.
        #[arg(long)]
        room: Option<String>,
    },
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a local .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Resolve home directory
    let home_dir = match &cli.home {
        Some(home) => PathBuf::from(shellexpand::tilde(home).into_owned()),
        None => config::default_home_dir(),
    };

    // Initialize logging
    let log_level = config::resolve_log_level(cli.log_level.as_deref(), &home_dir.join(CONFIG_FILE));
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init { force } => cmd_init(&home_dir, force),
        Commands::Tools => cmd_tools(&home_dir).await,
        Commands::Prompt => cmd_prompt(&home_dir).await,
        Commands::Blueprint => cmd_blueprint(&home_dir).await,
        Commands::Call {
            tool,
            args,
            json,
            room,
        } => cmd_call(&home_dir, &tool, args, json.as_deref(), room.as_deref()).await,
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_init(home_dir: &Path, force: bool) -> Result<()> {
    let config_path = home_dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "Settings already exist at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    config::save_config(&AgentSettings::default(), &config_path)
        .with_context(|| format!("Failed to write settings to {}", config_path.display()))?;

    println!(
        "{} Wrote default settings to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    println!("    Credentials are read from the environment (or a .env file), never from this file.");
    Ok(())
}

async fn cmd_tools(home_dir: &Path) -> Result<()> {
    let blueprint = assemble(home_dir, None).await?;
    let tools = &blueprint.tools;

    println!();
    println!("{}", "=== Agent Tools ===".bold());
    println!();
    for tool in tools.iter() {
        println!("  {}", tool.name().green().bold());
        for line in tool.description().lines() {
            println!("    {}", line);
        }
        println!();
    }

    if !tools.skipped().is_empty() {
        println!("  {}:", "Skipped".yellow().bold());
        for (name, reason) in tools.skipped() {
            println!("    {}: {}", name.yellow(), reason);
        }
        println!();
    }

    println!(
        "  {} loaded, {} skipped",
        tools.len(),
        tools.skipped().len()
    );
    Ok(())
}

async fn cmd_prompt(home_dir: &Path) -> Result<()> {
    let blueprint = assemble(home_dir, None).await?;

    println!("{}", "=== Instructions ===".bold());
    println!("{}", blueprint.instructions);
    println!();
    println!("{}", "=== Session Instruction ===".bold());
    println!("{}", blueprint.session_instruction);
    Ok(())
}

async fn cmd_blueprint(home_dir: &Path) -> Result<()> {
    let blueprint = assemble(home_dir, None).await?;
    let json = serde_json::to_string_pretty(&blueprint.view())
        .context("Failed to serialize blueprint")?;
    println!("{}", json);
    Ok(())
}

async fn cmd_call(
    home_dir: &Path,
    tool: &str,
    args: Vec<(String, String)>,
    json: Option<&str>,
    room: Option<&str>,
) -> Result<()> {
    let mut arguments = match json {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("Invalid --json value")? {
            Value::Object(map) => map,
            _ => bail!("--json must be a JSON object"),
        },
        None => Map::new(),
    };
    for (key, value) in args {
        arguments.insert(key, Value::String(value));
    }

    let blueprint = assemble(home_dir, room).await?;
    let tools: &ToolSet = &blueprint.tools;

    info!("Calling tool '{}'", tool);
    let result = tools
        .invoke(tool, &Value::Object(arguments))
        .await
        .with_context(|| format!("Failed to call tool '{}'", tool))?;

    println!("{}", result);
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load settings from the home directory with environment overrides applied.
fn bootstrap(home_dir: &Path) -> Result<(AgentSettings, Secrets)> {
    let config_path = home_dir.join(CONFIG_FILE);
    let mut settings = config::load_config(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;
    settings.apply_env();

    Ok((settings, Secrets::from_env()))
}

/// Pick how end_call ends the session: delete a LiveKit room when one is
/// named and LiveKit is configured, otherwise cancel the local job.
fn terminator_for(
    settings: &AgentSettings,
    secrets: &Secrets,
    room: Option<&str>,
) -> Arc<dyn SessionTerminator> {
    use secrecy::ExposeSecret;

    match (room, &secrets.livekit_api_secret) {
        (Some(room), Some(secret))
            if !settings.livekit.url.is_empty() && !settings.livekit.api_key.is_empty() =>
        {
            let terminator = LiveKitRoomTerminator::new(
                &settings.livekit.url,
                &settings.livekit.api_key,
                secret.expose_secret(),
                room,
            );
            info!("end_call will delete LiveKit room '{}'", terminator.room_name());
            Arc::new(terminator)
        }
        (Some(room), _) => {
            warn!(
                "LiveKit is not configured; end_call will not delete room '{}'",
                room
            );
            Arc::new(JobShutdown::default())
        }
        (None, _) => Arc::new(JobShutdown::default()),
    }
}

async fn assemble(home_dir: &Path, room: Option<&str>) -> Result<AgentBlueprint> {
    let (settings, secrets) = bootstrap(home_dir)?;

    let store = ConfigService::new(&settings.firestore, &secrets);
    let ctx = ToolContext::from_settings(
        &settings,
        &secrets,
        Arc::new(ConsoleSession),
        terminator_for(&settings, &secrets, room),
    )?;

    Ok(AgentBlueprint::assemble(&settings, &store, &ctx).await)
}
