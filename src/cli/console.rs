use std::io::{self, Write};

use anyhow::Result;

use crate::agent::{ConversationSession, Dispatcher};

pub async fn run(dispatcher: Dispatcher) -> Result<()> {
    println!("Welcome to the Rollcall HR assistant");
    println!("Ask about leave reports, attendance, or employee information.");
    println!();
    println!("Example queries:");
    println!("  - Show me leaves for employee MMT6765 in January 2024");
    println!("  - Who is the manager of EMP001?");
    println!("  - Get the attendance report for MMT6765 from 2024-01-01 to 2024-01-31");
    println!("  - What is Sonali Garg's designation?");
    println!();
    println!("Type 'exit' to quit.");

    let mut session = ConversationSession::new();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break; // EOF
        }
        let input = input.trim();

        if input.is_empty() {
            println!("Ask me something about leave reports, attendance, or employee information.");
            continue;
        }

        if matches!(input.to_lowercase().as_str(), "exit" | "quit" | "bye") {
            break;
        }

        let reply = dispatcher.handle_turn(&mut session, input).await;
        println!("{}", reply);
    }

    println!("Goodbye!");
    Ok(())
}
