//! `dossier chat`: interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;

use dossier_core::message::Message;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::bootstrap;

pub async fn run(config_path: Option<&Path>, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = bootstrap::load_config(config_path)?;
    let runtime = bootstrap::build(config)?;
    let conversation = runtime.conversation;

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = conversation.run_turn(&msg, &[]).await?;
        eprint!("\r              \r");
        println!("{reply}");
        return Ok(());
    }

    println!();
    println!("  Dossier: chatting as {}", runtime.persona.name);
    println!();
    println!("  Provider:  {}", runtime.provider_name);
    println!("  Model:     {}", conversation.model());
    println!("  Notifier:  {}", runtime.notifier_name);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    // The greeting is part of the visible history, as in the web widget.
    let greeting = runtime.persona.greeting.clone();
    print_reply(&runtime.persona.name, &greeting);
    let mut history = vec![Message::assistant(greeting)];

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            prompt()?;
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        eprint!("  ...");
        match conversation.run_turn(input, &history).await {
            Ok(reply) => {
                eprint!("\r     \r");
                print_reply(&runtime.persona.name, &reply);
                history.push(Message::user(input));
                history.push(Message::assistant(reply));
            }
            Err(e) => {
                eprint!("\r     \r");
                tracing::warn!(error = %e, "Turn failed");
                eprintln!("  [Error] The model could not be reached. Try again in a moment.");
                println!();
            }
        }
        prompt()?;
    }

    println!();
    println!("  Goodbye!");
    println!();
    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("  You > ");
    std::io::stdout().flush()
}

fn print_reply(name: &str, reply: &str) {
    println!();
    for line in reply.lines() {
        println!("  {name} > {line}");
    }
    println!();
}
