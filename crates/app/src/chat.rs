use crate::render::{format_history, format_record};
use crate::services::Services;
use pdf_qa_core::{GateDecision, Session, UploadPermit};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Type a question, or one of:\n  \
/admin <password>  unlock one upload\n  \
/upload <path>     upload a PDF or a folder of PDFs\n  \
/history           show this session's questions\n  \
/clear             forget this session's questions\n  \
/quit              leave";

#[derive(Debug, PartialEq, Eq)]
enum ChatCommand<'a> {
    Empty,
    Ask(&'a str),
    Admin(&'a str),
    Upload(&'a str),
    History,
    Clear,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> ChatCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatCommand::Empty;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatCommand::Ask(line);
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    match name {
        "admin" => ChatCommand::Admin(argument),
        "upload" if !argument.is_empty() => ChatCommand::Upload(argument),
        "history" => ChatCommand::History,
        "clear" => ChatCommand::Clear,
        "help" => ChatCommand::Help,
        "quit" | "exit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(line),
    }
}

/// Runs the interactive loop until `/quit` or end of input. Failed questions
/// and uploads are printed and the loop keeps going.
pub async fn run(services: &Services, session: &mut Session) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut permit: Option<UploadPermit> = None;

    println!("{HELP}");
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            ChatCommand::Empty => {}
            ChatCommand::Quit => break,
            ChatCommand::Help => println!("{HELP}"),
            ChatCommand::Unknown(text) => println!("unknown command: {text}"),
            ChatCommand::History => print!("{}", format_history(&session.log)),
            ChatCommand::Clear => {
                session.log.clear();
                println!("history cleared");
            }
            ChatCommand::Admin(secret) => match services.gate.check(secret) {
                GateDecision::Granted(granted) => {
                    permit = Some(granted);
                    println!("upload unlocked; use /upload <path>");
                }
                GateDecision::Denied => println!("incorrect password"),
                GateDecision::Idle => {}
            },
            ChatCommand::Upload(path) => match permit.take() {
                Some(granted) => {
                    services.upload(granted, Path::new(path)).await;
                }
                None => println!("uploads are locked; enter /admin <password> first"),
            },
            ChatCommand::Ask(question) => {
                match services.answering.ask(session, question).await {
                    Ok(record) => print!("{}", format_record(session.log.len(), &record)),
                    Err(error) => println!("error while answering: {error}"),
                }
            }
        }
    }

    Ok(())
}
