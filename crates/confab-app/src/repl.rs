//! Interactive chat loop on stdin/stdout.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use confab_ai::{ChatError, ConversationSession, GenerativeClient, Role};

pub async fn run(session: &ConversationSession, client: &dyn GenerativeClient) {
    print_history(session);
    println!("Type a message, /upload <path>, /clear, or /quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("you> ");
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            _ => break,
        };
        let line = line.trim();

        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("(conversation cleared)");
            }
            _ if line.starts_with("/upload") => {
                let path = line.trim_start_matches("/upload").trim();
                if path.is_empty() {
                    println!("usage: /upload <path>");
                    continue;
                }
                upload(session, client, path).await;
            }
            text => {
                prompt("ai> ");
                let result = session
                    .submit_with(client, text, &|fragment| {
                        print!("{fragment}");
                        let _ = std::io::stdout().flush();
                    })
                    .await;
                finish_turn(session, result.map(|_| ()));
            }
        }
    }
}

async fn upload(session: &ConversationSession, client: &dyn GenerativeClient, path: &str) {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            println!("could not read {path}: {e}");
            return;
        }
    };
    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    prompt("ai> ");
    let result = session.submit_file(client, &name, &content).await;
    if let Ok(reply) = &result {
        print!("{reply}");
    }
    finish_turn(session, result.map(|_| ()));
}

/// Close out a turn on screen. On failure the session has already
/// recovered the log; show the notice it appended.
fn finish_turn(session: &ConversationSession, result: Result<(), ChatError>) {
    match result {
        Ok(()) => println!(),
        Err(ChatError::Busy) => println!("(a reply is already streaming)"),
        Err(e) => {
            warn!("turn failed: {e}");
            println!();
            if let Some(notice) = session.messages().last() {
                println!("{}", notice.text());
            }
        }
    }
}

fn print_history(session: &ConversationSession) {
    let messages = session.messages();
    if messages.is_empty() {
        return;
    }
    println!("-- restored {} messages --", messages.len());
    for message in &messages {
        let who = match message.role {
            Role::User => "you",
            Role::Model => "ai",
        };
        println!("{who}> {}", message.text());
    }
}

fn prompt(text: &str) {
    print!("{text}");
    let _ = std::io::stdout().flush();
}
