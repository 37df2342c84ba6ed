use anyhow::Result;
use clap::Parser;
use memlink::cli::{Cli, Commands};
use memlink::config::{BackendConfig, MemoryConfig, Settings};
use memlink::memory::Memory;
use memlink::{supply_memory, utils, ChatMessageHistory, Message, WindowMemory};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        utils::print_error(&format!("Error: {:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut ignored_settings_error = None;

    let (memory_config, level) = match Settings::new() {
        Ok(settings) => (settings.memory, settings.logging.level),
        // the command line names the backend, so a config file is optional
        Err(e) if cli.names_backend() => {
            ignored_settings_error = Some(e);
            (MemoryConfig::new(BackendConfig::Memory, ""), "info".to_string())
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "No memory backend configured ({}). Use --url or --workflow, or add config/default.toml",
                e
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level)),
        )
        .init();

    if let Some(e) = ignored_settings_error {
        tracing::warn!("[Settings] Ignoring configuration ({}); using command-line backend", e);
    }

    let config = cli.apply_overrides(memory_config, Settings::api_key());
    let memory = supply_memory(&config)?;

    match cli.command {
        Commands::Window { json } => handle_window(&memory, json).await,
        Commands::History => handle_history(&memory).await,
        Commands::Add { role, content } => {
            memory
                .chat_history()
                .add_message(Message::new(role.into(), content))
                .await;
            utils::print_success("Message submitted");
            Ok(())
        }
        Commands::Turn { input, output } => {
            memory.save_turn(input, output).await;
            utils::print_success("Turn submitted");
            Ok(())
        }
        Commands::Clear => {
            memory.clear().await;
            utils::print_success("Clear submitted");
            Ok(())
        }
    }
}

async fn handle_window(memory: &WindowMemory, json: bool) -> Result<()> {
    if json {
        let variables = memory.load_memory_variables().await;
        println!("{}", serde_json::to_string_pretty(&variables)?);
        return Ok(());
    }

    utils::print_header(&format!(
        "Context window (last {} messages)",
        memory.options().window_size
    ));
    utils::print_messages(&memory.window().await);
    Ok(())
}

async fn handle_history(memory: &WindowMemory) -> Result<()> {
    let messages = memory.chat_history().get_messages().await;
    utils::print_header(&format!("Stored history ({} messages)", messages.len()));
    utils::print_messages(&messages);
    Ok(())
}
