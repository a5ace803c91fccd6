use anyhow::Result;
use clap::Parser;
use client_core::{board::BattleBoard, BattleSession, SessionEvent, DEFAULT_SERVER_URL};
use shared::protocol::VoteKind;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
struct Args {
    /// Poll server websocket endpoint.
    #[arg(long, env = "BATTLE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
}

#[derive(Debug, PartialEq)]
enum Command {
    Vote(VoteKind, usize),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "quit" | "q" => Some(Command::Quit),
        "move" | "m" => Some(Command::Vote(VoteKind::Move, parts.next()?.parse().ok()?)),
        "switch" | "s" => Some(Command::Vote(VoteKind::Switch, parts.next()?.parse().ok()?)),
        _ => None,
    }
}

fn print_board(board: &BattleBoard) {
    println!("-- moves --");
    for choice in &board.moves {
        println!(
            "  [{}] {}{}",
            choice.idx,
            choice.label.replace('\n', "  "),
            if choice.disabled { " (disabled)" } else { "" }
        );
    }
    println!("-- switch --");
    for choice in &board.switches {
        println!(
            "  [{}] {}{}",
            choice.idx,
            choice.label,
            if choice.disabled { " (disabled)" } else { "" }
        );
    }
    if !board.message.is_empty() {
        println!("{}", board.message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let (session, mut events) = BattleSession::open(&args.server_url);
    let mut board = BattleBoard::default();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            event = client_core::recv_event(&mut events) => {
                let Some(event) = event else { break };
                match event {
                    SessionEvent::Opened => {
                        println!("Connected to {}", args.server_url);
                        println!("Commands: move <idx> | switch <idx> | quit");
                    }
                    SessionEvent::Update(update) => {
                        board.apply(&update);
                        print_board(&board);
                    }
                    SessionEvent::ProtocolError(err) => {
                        tracing::warn!("ignoring unusable server frame: {err}");
                    }
                    SessionEvent::Closed { clean } => {
                        println!(
                            "Connection {}",
                            if clean { "closed" } else { "lost" }
                        );
                        break;
                    }
                }
            }
            line = stdin.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_command(line.trim()) {
                        Some(Command::Vote(kind, idx)) => {
                            if let Err(err) = session.send_vote(kind, idx).await {
                                tracing::warn!("vote not sent: {err}");
                            }
                        }
                        Some(Command::Quit) => session.close().await,
                        None => eprintln!("Commands: move <idx> | switch <idx> | quit"),
                    },
                    None => {
                        stdin_open = false;
                        session.close().await;
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_with_short_forms() {
        assert_eq!(parse_command("move 2"), Some(Command::Vote(VoteKind::Move, 2)));
        assert_eq!(parse_command("s 0"), Some(Command::Vote(VoteKind::Switch, 0)));
        assert_eq!(parse_command("quit"), Some(Command::Quit));
        assert_eq!(parse_command("move"), None);
        assert_eq!(parse_command("move x"), None);
        assert_eq!(parse_command(""), None);
    }
}
