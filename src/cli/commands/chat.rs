//! Interactive chat loop.

use std::io::Write;
use std::path::PathBuf;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::AppContext;
use crate::cli::{helpers, icons};

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Message(&'a str),
    History,
    Upload(Vec<PathBuf>),
    Doc(&'a str),
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    if !line.starts_with('/') {
        return ChatInput::Message(line);
    }

    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    match command {
        "/history" => ChatInput::History,
        "/upload" => ChatInput::Upload(rest.split_whitespace().map(PathBuf::from).collect()),
        "/doc" => ChatInput::Doc(rest),
        "/help" => ChatInput::Help,
        "/quit" | "/exit" => ChatInput::Quit,
        _ => ChatInput::Unknown(command),
    }
}

fn print_help() {
    println!("  {} /history          show the conversation so far", icons::bullet());
    println!("  {} /upload <file>... use documents as context", icons::bullet());
    println!("  {} /doc <question>   ask the uploaded documents", icons::bullet());
    println!("  {} /quit             leave the chat", icons::bullet());
}

pub async fn cmd_chat(ctx: &mut AppContext) -> anyhow::Result<()> {
    {
        let session = ctx.sessions.get(&ctx.session_id)?;
        println!(
            "{} Chatting with {} on {} ({} persona). Type /help for commands.",
            icons::info(),
            style(ctx.client.model()).bold(),
            session.provider.display_name(),
            session.persona
        );
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", icons::chat_prompt());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            ChatInput::Empty => continue,
            ChatInput::Quit => break,
            ChatInput::Help => print_help(),
            ChatInput::Unknown(command) => {
                println!("{} Unknown command {}", icons::warn(), command);
                print_help();
            }
            ChatInput::History => {
                let session = ctx.sessions.get(&ctx.session_id)?;
                if session.history.is_empty() {
                    println!("{}", style("(no messages yet)").dim());
                } else {
                    println!("{}", session.history.render_text());
                }
            }
            ChatInput::Upload(paths) => {
                let uploads = match helpers::load_uploads(&paths) {
                    Ok(uploads) => uploads,
                    Err(e) => {
                        println!("Error: {:#}", e);
                        continue;
                    }
                };
                let session = ctx.sessions.get_mut(&ctx.session_id)?;
                if let Err(e) = helpers::process_uploads(session, &ctx.extractor, uploads) {
                    println!("Error: {:#}", e);
                }
            }
            ChatInput::Doc(question) => {
                if question.is_empty() {
                    println!("{} Usage: /doc <question>", icons::warn());
                    continue;
                }
                let session = ctx.sessions.get(&ctx.session_id)?;
                match session.ask_documents(ctx.client.as_ref(), question).await {
                    Ok(answer) => println!("{}", answer.trim_end()),
                    Err(e) => println!("Error: {}", e),
                }
            }
            ChatInput::Message(message) => {
                let session = ctx.sessions.get_mut(&ctx.session_id)?;
                match session.send_message(ctx.client.as_ref(), message).await {
                    Ok(reply) => println!("{}", reply.trim_end()),
                    Err(e) => println!("Error: {}", e),
                }
            }
        }
    }

    Ok(())
}
