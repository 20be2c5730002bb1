use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use radiant::{
    AgentRuntime, Notification, Settings, ToolRegistry, TurnRequest, build_fetcher,
    build_provider, build_runtime, build_tooling, render_error, render_reply,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "radiant")]
#[command(version)]
#[command(about = "Tool-calling chat agent for the console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (TOML); defaults to ./radiant.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, overrides `log_filter` from the settings.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single turn and print the reply.
    Ask {
        /// The user prompt.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,

        /// Override the configured system prompt.
        #[arg(long)]
        system: Option<String>,

        /// Send the prompt without tool schemas.
        #[arg(long)]
        no_tools: bool,
    },

    /// Interactive chat on stdin; monitor notifications are printed as they arrive.
    Chat,

    /// Print the tool schemas offered to the model as JSON.
    Tools,
}

/// Logs go to stderr. No `metrics` recorder is installed, so the metrics
/// hooks are no-ops in this binary; embedders install their own.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let settings = match &cli.config {
        Some(path) => {
            dotenvy::dotenv().ok();
            Settings::load_from(path, true)
        }
        None => Settings::load(),
    };
    settings.context("failed to load settings")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    init_tracing(cli.log_level.as_deref().unwrap_or(&settings.log_filter));

    let shutdown = CancellationToken::new();
    let fetcher = build_fetcher(&settings)?;

    // `None` runs the interactive chat.
    let single_turn = match cli.command {
        Commands::Tools => {
            let tooling = build_tooling(&settings, fetcher, shutdown.child_token())?;
            return cmd_tools(&tooling.registry);
        }
        Commands::Ask {
            prompt,
            system,
            no_tools,
        } => Some(turn_request(&prompt, system, no_tools)),
        Commands::Chat => None,
    };

    let provider = build_provider(&settings)?;
    let (runtime, notifications) =
        build_runtime(&settings, provider, fetcher, shutdown.child_token())?;

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, shutting down");
            signal_token.cancel();
        }
    });

    let result = match single_turn {
        Some(request) => cmd_ask(&runtime, request, &shutdown).await,
        None => cmd_chat(&runtime, notifications, &shutdown).await,
    };

    runtime.shutdown();
    result
}

fn turn_request(prompt: &[String], system: Option<String>, no_tools: bool) -> TurnRequest {
    let mut request = TurnRequest::new(prompt.join(" "));
    if let Some(system) = system {
        request = request.with_system_prompt(system);
    }
    if no_tools {
        request = request.without_tools();
    }
    request
}

async fn cmd_ask(
    runtime: &AgentRuntime,
    request: TurnRequest,
    shutdown: &CancellationToken,
) -> Result<()> {
    let context = runtime.console_context(format!("console-{}", std::process::id()));
    tokio::select! {
        reply = runtime.agent.run_turn(request, context) => match reply {
            Ok(reply) => println!("{}", render_reply(&reply)),
            Err(error) => {
                eprintln!("{}", render_error(&error));
                return Err(error).context("turn failed");
            }
        },
        _ = shutdown.cancelled() => eprintln!("cancelled"),
    }
    Ok(())
}

async fn cmd_chat(
    runtime: &AgentRuntime,
    mut notifications: mpsc::Receiver<Notification>,
    shutdown: &CancellationToken,
) -> Result<()> {
    let session_id = format!("console-{}", std::process::id());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"radiant chat, Ctrl-D or /quit to exit\n> ")
        .await?;
    stdout.flush().await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                if !line.is_empty() {
                    let context = runtime.console_context(session_id.as_str());
                    let output = tokio::select! {
                        reply = runtime.agent.run_turn(TurnRequest::new(line), context) => match reply {
                            Ok(reply) => render_reply(&reply),
                            Err(error) => render_error(&error),
                        },
                        _ = shutdown.cancelled() => break,
                    };
                    stdout.write_all(format!("{output}\n").as_bytes()).await?;
                }
                stdout.write_all(b"> ").await?;
                stdout.flush().await?;
            }
            Some(notification) = notifications.recv() => {
                stdout
                    .write_all(format!("\n{}\n> ", notification.message).as_bytes())
                    .await?;
                stdout.flush().await?;
            }
            _ = shutdown.cancelled() => break,
        }
    }

    Ok(())
}

fn cmd_tools(registry: &ToolRegistry) -> Result<()> {
    let schemas = registry
        .schemas()
        .into_iter()
        .map(|schema| {
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": schema.name,
                    "description": schema.description,
                    "parameters": schema.parameters,
                }
            })
        })
        .collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
