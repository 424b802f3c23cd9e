use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::{Result, WrapErr};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use safety_chat_cli::cli::chat::ChatContext;
use safety_chat_cli::config::{ChatConfig, ConfigOverrides};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    chat: ChatArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat(ChatArgs),
}

#[derive(clap::Args)]
struct ChatArgs {
    /// Send a single message, print the reply and exit
    #[arg(short, long)]
    input: Option<String>,

    /// Base URL of the chat server (defaults to $CHAT_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Greeting shown when the conversation starts (defaults to $CHAT_GREETING)
    #[arg(short, long)]
    greeting: Option<String>,

    /// Suggested question; repeat to offer several
    #[arg(short, long = "suggestion")]
    suggestions: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let args = match cli.command {
        Some(Commands::Chat(args)) => args,
        None => cli.chat,
    };

    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };

    // Logs go to stderr so they never land inside the conversation.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("Failed to set tracing subscriber")?;

    let config = ChatConfig::load(ConfigOverrides {
        endpoint: args.endpoint,
        greeting: args.greeting,
        suggestions: args.suggestions,
    })?;
    debug!("Loaded configuration: {:?}", config);

    let mut chat_context = ChatContext::new(Box::new(io::stdout()), config, args.input)?;
    chat_context.run().await
}
