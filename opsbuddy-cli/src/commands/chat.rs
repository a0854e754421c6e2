use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use opsbuddy_core::{ChatConfig, ChatEvent, ChatSession, Dispatcher, OpsBuddyConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::debug;

use crate::render::print_message;

const TYPING_INDICATOR: &str = "OpsBuddy is typing...";
const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

pub async fn handle_chat_command(config: &OpsBuddyConfig, no_delay: bool) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::from_config(config)?);
    let chat_config = if no_delay {
        ChatConfig {
            greeting: config.chat.greeting.clone(),
            mode: config.chat.mode,
            ..ChatConfig::instant()
        }
    } else {
        config.chat.clone()
    };

    debug!(
        mode = %config.chat.mode,
        no_delay,
        llm = config.has_llm_key(),
        "Starting chat session"
    );
    let mut session = ChatSession::new(dispatcher, chat_config);
    let mut events = session.subscribe();
    let time_format = config.display.time_format.as_str();

    println!("{}", "OpsBuddy".cyan().bold());
    println!(
        "{}",
        format!(
            "Mode: {}. Type 'exit' or 'quit' to leave.",
            session.dispatcher().mode()
        )
        .dimmed()
    );
    println!("{}", "═".repeat(60).dimmed());
    println!();

    for message in session.messages() {
        print_message(message, time_format);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&text.to_lowercase().as_str()) {
            break;
        }

        let (reply, _) = tokio::join!(session.send(text), show_typing(&mut events));
        if let Some(message) = reply {
            print_message(&message, time_format);
        }
    }

    println!("{}", "Goodbye!".dimmed());
    Ok(())
}

/// Shows the typing indicator for the duration of one send.
async fn show_typing(events: &mut broadcast::Receiver<ChatEvent>) {
    loop {
        match events.recv().await {
            Ok(ChatEvent::TypingStarted) => {
                print!("{}", TYPING_INDICATOR.dimmed());
                let _ = std::io::stdout().flush();
            }
            Ok(ChatEvent::TypingStopped) => {
                print!("\r{}\r", " ".repeat(TYPING_INDICATOR.len()));
                let _ = std::io::stdout().flush();
                break;
            }
            Ok(ChatEvent::MessageAppended(_)) => {}
            Err(broadcast::error::RecvError::Lagged(_)) => {}
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
