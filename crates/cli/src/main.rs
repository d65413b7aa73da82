mod bootstrap;

use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    courier_channels::{ConsolePlatform, MessagingPlatform, run_platforms},
    courier_config::CourierConfig,
    courier_sessions::SessionStore,
};

#[derive(Parser)]
#[command(name = "courier", about = "Courier — intent-routing chat bot")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Explicit config file (overrides discovery in the current dir).
    #[arg(long, global = true, env = "COURIER_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on all enabled platforms (default).
    Run,
    /// Dispatch a single message and print the reply.
    Send {
        #[arg(short, long, default_value = "cli")]
        user: String,
        #[arg(short, long)]
        message: String,
    },
    /// List registered capabilities.
    Capabilities,
    /// List loaded skills.
    Skills,
    /// Session management.
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// List users with a stored session.
    List,
    /// Print a user's conversation history.
    Show { user: String },
    /// Delete a user's stored session.
    Reset { user: String },
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

fn load_configuration(cli: &Cli) -> anyhow::Result<CourierConfig> {
    match &cli.config {
        Some(path) => Ok(courier_config::load_config(path)?),
        None => Ok(courier_config::discover_and_load(std::path::Path::new(
            ".",
        ))?),
    }
}

fn session_store(config: &CourierConfig) -> SessionStore {
    SessionStore::new(
        PathBuf::from(&config.sessions.storage_path),
        config.sessions.max_history,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "courier starting");

    let config = load_configuration(&cli)?;

    match cli.command {
        None | Some(Commands::Run) => {
            let runtime = bootstrap::build_runtime(&config)?;

            let mut platforms: Vec<Arc<dyn MessagingPlatform>> = Vec::new();
            if config.platforms.console.enabled {
                platforms.push(Arc::new(ConsolePlatform::new(
                    runtime.dispatcher.clone(),
                    "console",
                )));
            }
            run_platforms(platforms).await;
        },
        Some(Commands::Send { user, message }) => {
            let runtime = bootstrap::build_runtime(&config)?;
            let reply = runtime.dispatcher.handle_message(&user, &message).await;
            println!("{reply}");
        },
        Some(Commands::Capabilities) => {
            let runtime = bootstrap::build_runtime(&config)?;
            let registry = runtime
                .dispatcher
                .registry()
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            for (name, description) in registry.list() {
                println!("{name:<24} {description}");
            }
        },
        Some(Commands::Skills) => {
            let runtime = bootstrap::build_runtime(&config)?;
            let skills = runtime.skills.list();
            if skills.is_empty() {
                println!("No skills loaded.");
            }
            for (name, description) in skills {
                println!("{name:<24} {description}");
            }
        },
        Some(Commands::Sessions { action }) => match action {
            SessionAction::List => {
                for user in session_store(&config).list_users() {
                    println!("{user}");
                }
            },
            SessionAction::Show { user } => {
                let session = session_store(&config).load(&user).await?;
                if session.history.is_empty() {
                    println!("No history for {user}.");
                }
                for message in &session.history {
                    let role = match message.role {
                        courier_sessions::Role::User => "user",
                        courier_sessions::Role::Assistant => "assistant",
                    };
                    println!("[{role}] {}", message.content);
                }
            },
            SessionAction::Reset { user } => {
                session_store(&config).reset(&user).await?;
                println!("Session for {user} reset.");
            },
        },
    }

    Ok(())
}
