use std::{path::PathBuf, sync::Arc, time::Duration};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    docmill_agents::AgentRegistry,
    docmill_channel::HttpAgentChannel,
    docmill_chat::ChatService,
    docmill_config::DocmillConfig,
    docmill_pipeline::DocumentPipeline,
};

#[derive(Parser)]
#[command(name = "docmill", about = "docmill — document intelligence over remote agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Explicit config file (overrides discovery).
    #[arg(long, global = true, env = "DOCMILL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a text document through the extract/summarize/title pipeline.
    Process {
        /// Path to a plain-text file (or `-` for stdin).
        file: PathBuf,
    },
    /// Send a single chat message and print the reply.
    Chat {
        #[arg(short, long)]
        message: String,
    },
    /// Provision the stage agents and print their ids.
    Provision,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "docmill starting");

    let config = load_config(&cli)?;
    let channel = Arc::new(HttpAgentChannel::new(
        &config.channel.base_url,
        config.channel.api_key.clone(),
    )?);
    let registry = Arc::new(AgentRegistry::provision(channel.as_ref(), &config.agents).await?);
    let stage_timeout = Duration::from_secs(config.pipeline.stage_timeout_secs);

    match cli.command {
        Commands::Process { file } => {
            let raw = read_input(&file)?;
            let pipeline = DocumentPipeline::new(channel, registry, stage_timeout);
            let result = pipeline.run(&raw).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        },
        Commands::Chat { message } => {
            let chat = ChatService::new(channel, registry, stage_timeout);
            println!("{}", chat.respond(&message).await?);
        },
        Commands::Provision => {
            println!("chat      {}", registry.chat.id);
            println!("extract   {}", registry.extract.id);
            println!("summarize {}", registry.summarize.id);
            println!("title     {}", registry.title.id);
        },
    }

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<DocmillConfig> {
    match &cli.config {
        Some(path) => docmill_config::load_config(path),
        None => Ok(docmill_config::discover_and_load()),
    }
}

fn read_input(file: &PathBuf) -> anyhow::Result<String> {
    if file.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut raw)?;
        return Ok(raw);
    }
    std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", file.display()))
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}
