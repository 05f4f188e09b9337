use clap::{Parser, Subcommand};
use std::sync::Arc;

mod application;
mod domain;
mod infrastructure;

use application::messaging::CounterDispatcher;
use application::services::CounterService;
use domain::entities::{IncomingMessage, Sender};
use domain::traits::Host;
use infrastructure::adapters::console::ConsoleHost;
use infrastructure::config::Config;
use infrastructure::storage::JsonCounterStore;

#[derive(Parser)]
#[command(name = "tally-bot")]
#[command(
    about = "Keyword counter bot: /cnt add|del|list, matching messages count +1",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            run_bot(cli.config);
        }
        Commands::Version => {
            println!("tally-bot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
    }
}

fn run_bot(config_path: String) {
    // Load config
    let config = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    };

    tracing::info!("Starting tally-bot: {}", config.bot.name);

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let host = Arc::new(ConsoleHost::new(
            config.bot.name.clone(),
            config.resolve_data_dir(),
        ));
        let store = JsonCounterStore::new(host.data_dir());
        let service = CounterService::load(store).await;
        let dispatcher = CounterDispatcher::new(
            service,
            host.clone(),
            config.bot.prefix.clone(),
            config.reply_policy(),
        );
        run_console_bot(host, dispatcher).await;
    });
}

async fn run_console_bot(
    host: Arc<ConsoleHost>,
    dispatcher: CounterDispatcher<JsonCounterStore, ConsoleHost>,
) {
    let info = host.bot_info();
    tracing::info!("Bot started: {} (console mode)", info.name);
    println!("Type messages; /cnt add|del|list manages counters; /quit exits.");

    // Main loop (for console mode)
    loop {
        let Some(input) = host.read_line("> ").await else {
            break;
        };
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        let message = IncomingMessage::new("console", Sender::new("operator"), input);
        match dispatcher.handle(&message).await {
            Ok(Some(reply)) => {
                if let Err(e) = host.send_message(&message.chat_id, &reply).await {
                    tracing::error!("Failed to send message: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => {
                let _ = host
                    .send_message(&message.chat_id, &format!("Error: {}", e))
                    .await;
            }
        }
    }

    // One last save on the way out
    dispatcher.flush().await;
    tracing::info!("Counters flushed, bye");
}

fn init_config() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
}
