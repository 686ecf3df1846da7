//! Chat commands: the interactive assistant and saved conversations

use colored::Colorize;
use prettytable::{format, row, Table};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::api::{CallsumApi, ChatMessage, ConversationListItem, Role};
use crate::commands::AppContext;
use crate::error::{user_message, Result};
use crate::views::sidebar::time_ago;
use crate::views::{ChatPanel, ChatSettings};

/// A line typed at the chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Text for the assistant
    Message(String),
    /// `/new` -- start a fresh conversation
    New,
    /// `/history` -- list saved conversations
    History,
    /// `/load <id>` -- open a saved conversation
    Load(String),
    /// `/delete <id>` -- delete a saved conversation
    Delete(String),
    /// `/help`
    Help,
    /// `/exit` or `/quit`
    Exit,
    /// Blank line or a malformed command
    Nothing,
}

/// Parse one prompt line.
pub fn parse_chat_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatInput::Nothing;
    }
    if !trimmed.starts_with('/') {
        return ChatInput::Message(trimmed.to_string());
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    match (command.as_str(), arg) {
        ("/new", _) => ChatInput::New,
        ("/history", _) => ChatInput::History,
        ("/load", Some(id)) => ChatInput::Load(id.to_string()),
        ("/delete", Some(id)) => ChatInput::Delete(id.to_string()),
        ("/help", _) => ChatInput::Help,
        ("/exit", _) | ("/quit", _) => ChatInput::Exit,
        _ => ChatInput::Message(trimmed.to_string()),
    }
}

/// Run the interactive chat loop.
pub async fn run_chat(ctx: &AppContext) -> Result<()> {
    ctx.require_signed_in()?;

    let mut panel = ChatPanel::new(ChatSettings::from_config(&ctx.config));
    let mut rl = DefaultEditor::new()?;

    println!("{}", "CallSum chat".bold());
    println!("{}", "Type /help for commands, /exit to leave.".dimmed());
    println!();
    print_message(&panel.messages()[0]);

    if let Err(e) = panel.refresh_conversations(&ctx.api).await {
        tracing::warn!("Could not load saved conversations: {}", e);
    }

    loop {
        match rl.readline(&format!("{} ", "you>".cyan().bold())) {
            Ok(line) => {
                let input = parse_chat_input(&line);
                if input != ChatInput::Nothing {
                    let _ = rl.add_history_entry(line.trim());
                }
                let outcome = match input {
                    ChatInput::Nothing => continue,
                    ChatInput::Exit => break,
                    ChatInput::Help => {
                        print_help();
                        Ok(())
                    }
                    ChatInput::New => {
                        panel.new_conversation();
                        println!("{}", "Started a new conversation.".green());
                        print_message(&panel.messages()[0]);
                        Ok(())
                    }
                    ChatInput::History => panel
                        .refresh_conversations(&ctx.api)
                        .await
                        .map(|()| print_conversation_table(panel.conversations())),
                    ChatInput::Load(id) => {
                        let loaded = panel.load_conversation(&ctx.api, &id).await;
                        if loaded.is_ok() {
                            println!("{}", format!("Loaded conversation {}", id).green());
                            panel.messages().iter().for_each(print_message);
                        }
                        loaded
                    }
                    ChatInput::Delete(id) => {
                        let deleted = panel.delete_conversation(&ctx.api, &id).await;
                        if deleted.is_ok() {
                            println!("{}", format!("Deleted conversation {}", id).green());
                            if panel.conversation_id().is_none() {
                                print_message(&panel.messages()[0]);
                            }
                        }
                        deleted
                    }
                    ChatInput::Message(text) => {
                        let before = panel.messages().len();
                        let sent = panel.send(&ctx.api, &text).await;
                        // The user's own line is already on screen.
                        panel
                            .messages()
                            .iter()
                            .skip(before + 1)
                            .for_each(print_message);
                        sent
                    }
                };
                if let Err(e) = outcome {
                    eprintln!("{}", format!("Error: {}", user_message(&e)).red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    match message.role {
        Role::Assistant => println!("{} {}\n", "assistant>".magenta().bold(), message.content),
        Role::User => println!("{} {}\n", "you>".cyan().bold(), message.content),
    }
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /new           Start a new conversation");
    println!("  /history       List saved conversations");
    println!("  /load <id>     Open a saved conversation");
    println!("  /delete <id>   Delete a saved conversation");
    println!("  /help          Show this help");
    println!("  /exit          Leave the chat");
    println!();
}

fn print_conversation_table(conversations: &[ConversationListItem]) {
    if conversations.is_empty() {
        println!("{}", "No saved conversations found.".yellow());
        return;
    }

    let now = chrono::Utc::now();
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(row!["ID".bold(), "Title".bold(), "Messages".bold(), "Updated".bold()]);

    for item in conversations {
        let updated = item
            .updated_at
            .or(item.created_at)
            .map(|ts| time_ago(ts, now))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(row![item.id.cyan(), item.title, item.message_count, updated]);
    }

    println!();
    table.printstd();
    println!();
}

/// List saved conversations.
pub async fn list_history(ctx: &AppContext, limit: Option<u32>) -> Result<()> {
    ctx.require_signed_in()?;
    let limit = limit.unwrap_or(ctx.config.api.history_limit);
    let conversations = ctx.api.conversation_history(Some(limit)).await?;
    print_conversation_table(&conversations);
    if !conversations.is_empty() {
        println!(
            "Use {} to read one.",
            "callsum chat show <ID>".cyan()
        );
        println!();
    }
    Ok(())
}

/// Print one saved conversation.
pub async fn show_conversation(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.require_signed_in()?;
    let conversation = ctx.api.get_conversation(id).await?;
    println!("{}", conversation.title.bold());
    println!();
    conversation.messages.iter().for_each(print_message);
    Ok(())
}

/// Delete one saved conversation.
pub async fn delete_conversation(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.require_signed_in()?;
    ctx.api.delete_conversation(id).await?;
    println!("{}", format!("Deleted conversation {}", id).green());
    Ok(())
}
