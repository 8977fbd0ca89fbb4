//! Rollcall - Conversational HR assistant
//!
//! A chat front-end over HR REST endpoints: leave reports, attendance
//! rosters, and employee master data, with a language model deciding which
//! operation to run.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rollcall::agent::ConversationSession;
use rollcall::{Config, Dispatcher, HrClient, OpenAiModel, ToolRegistry};

/// Rollcall - Conversational assistant over HR data
#[derive(Parser)]
#[command(
    name = "rollcall",
    author,
    version,
    about = "Conversational assistant over HR data: leaves, attendance, employee lookup",
    long_about = r#"
Rollcall answers natural-language questions about HR data by letting a
language model pick from a fixed catalog of backend operations.

Operations:
  - Leave reports for an employee and date range
  - Employee master data (manager, email, designation, department)
  - Full-roster listing and name search
  - Daily attendance rosters

Configuration comes from the environment: HR_API_BASE_URL, HR_API_USERNAME,
HR_API_PASSWORD, HR_LEAVE_API_KEY, HR_EMPLOYEE_API_KEY,
HR_EMPLOYEE_DATASET_KEY, HR_ATTENDANCE_API_KEY, and OPENAI_API_KEY
(OPENAI_BASE_URL / OPENAI_MODEL optional).

Examples:
  rollcall                         Start the interactive console
  rollcall ask "leaves for MMT6765 in January 2024"
  rollcall tools                   Print the operation catalog
"#
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive console (default)
    #[command(alias = "console", alias = "repl")]
    Chat,

    /// Ask a single question and exit
    #[command(alias = "query")]
    Ask {
        /// The question to ask
        question: String,
    },

    /// Print the operation catalog the model selects from
    Tools,

    /// Display version information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (only when RUST_LOG is set)
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt::init();
    }

    let cli = Cli::parse();

    // Info needs no configuration
    if let Some(Commands::Info) = &cli.command {
        println!("Rollcall - Conversational HR assistant");
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = Config::from_env()?;
    let client = Arc::new(HrClient::new(config.backend));
    let registry = ToolRegistry::with_catalog(client);

    if let Some(Commands::Tools) = &cli.command {
        println!("Available operations:");
        for declaration in registry.declarations() {
            println!("  {} - {}", declaration.name, declaration.description);
        }
        return Ok(());
    }

    let model = Arc::new(OpenAiModel::new(config.model));
    let dispatcher =
        Dispatcher::new(model, registry).with_max_tool_rounds(config.max_tool_rounds);

    match cli.command {
        None | Some(Commands::Chat) => {
            rollcall::cli::console::run(dispatcher).await?;
        }

        Some(Commands::Ask { question }) => {
            let mut session = ConversationSession::new();
            let reply = dispatcher.handle_turn(&mut session, &question).await;
            println!("{}", reply);
        }

        Some(Commands::Tools) | Some(Commands::Info) => {
            // Handled early, before initialization
            unreachable!()
        }
    }

    Ok(())
}
