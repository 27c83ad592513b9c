//! Local ordering REPL.
//!
//! Drives the session router from the terminal exactly as LINE events would.
//! Plain lines are sent as text messages; `/tap <data>` sends a postback and
//! `/<n>` taps option `n` of the last menu shown.

use std::io::Write;

use anyhow::Result;
use console::style;
use rustyline_async::{Readline, ReadlineEvent};

use tacoline_types::event::InboundEvent;
use tacoline_types::reply::{MenuOption, ReplyMessage};

use crate::state::ConcreteRouter;

/// Slash commands understood by the REPL.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Exit,
    /// Send a postback with the given data.
    Tap(String),
    /// Tap the numbered option of the last menu (1-based).
    Pick(usize),
    Unknown(String),
}

/// Parse `input` as a slash command; `None` for ordinary text.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    let rest = trimmed.strip_prefix('/')?;

    let (cmd, arg) = match rest.split_once(' ') {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (rest, ""),
    };

    if let Ok(n) = cmd.parse::<usize>() {
        return Some(ChatCommand::Pick(n));
    }

    match cmd.to_lowercase().as_str() {
        "help" | "h" | "?" => Some(ChatCommand::Help),
        "exit" | "quit" | "q" => Some(ChatCommand::Exit),
        "tap" if !arg.is_empty() => Some(ChatCommand::Tap(arg.to_string())),
        "tap" => Some(ChatCommand::Unknown("/tap requires postback data".to_string())),
        other => Some(ChatCommand::Unknown(format!("/{other}"))),
    }
}

/// Run the REPL until EOF or `/exit`.
pub async fn run(router: &ConcreteRouter, user: &str) -> Result<()> {
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut rl, mut out) = Readline::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    writeln!(out)?;
    writeln!(out, "  {} Tacoline chat as {}", style("🌮").bold(), style(user).cyan())?;
    writeln!(
        out,
        "  {}",
        style("Type a message, /tap <data> for a button, /help for commands.").dim()
    )?;
    writeln!(out)?;

    let mut last_options: Vec<MenuOption> = Vec::new();
    let mut turn: u64 = 0;

    loop {
        let line = match rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => line,
            Ok(ReadlineEvent::Interrupted) => {
                writeln!(out, "  {}", style("Press Ctrl+D or /exit to leave.").dim())?;
                continue;
            }
            Ok(ReadlineEvent::Eof) | Err(_) => {
                writeln!(out, "\n  {}", style("Session ended.").dim())?;
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(line.to_string());

        turn += 1;
        let token = format!("local-{turn}");
        let event = match parse(line) {
            None => InboundEvent::text(user, line, token),
            Some(ChatCommand::Tap(data)) => InboundEvent::postback(user, data, token),
            Some(ChatCommand::Pick(n)) => match n.checked_sub(1).and_then(|i| last_options.get(i)) {
                Some(option) => {
                    writeln!(out, "  {}", style(format!("[{}]", option.label)).dim())?;
                    InboundEvent::postback(user, option.data.clone(), token)
                }
                None => {
                    writeln!(out, "  {} No option {n} on the last menu.", style("?").yellow().bold())?;
                    continue;
                }
            },
            Some(ChatCommand::Help) => {
                print_help(&mut out)?;
                continue;
            }
            Some(ChatCommand::Exit) => {
                writeln!(out, "\n  {}", style("Session ended.").dim())?;
                break;
            }
            Some(ChatCommand::Unknown(msg)) => {
                writeln!(out, "  {} Unknown command: {}", style("?").yellow().bold(), style(msg).dim())?;
                continue;
            }
        };

        let replies = router.handle(&event);
        if let Some(options) = replies.iter().rev().find_map(|reply| match reply {
            ReplyMessage::Menu { options, .. } => Some(options.clone()),
            ReplyMessage::Text { .. } => None,
        }) {
            last_options = options;
        }
        print_replies(&mut out, &replies)?;
    }

    rl.flush()?;
    Ok(())
}

fn print_replies(out: &mut impl Write, replies: &[ReplyMessage]) -> std::io::Result<()> {
    writeln!(out)?;
    for reply in replies {
        match reply {
            ReplyMessage::Text { text } => {
                for line in text.lines() {
                    writeln!(out, "  {} {line}", style("│").cyan())?;
                }
            }
            ReplyMessage::Menu { title, options } => {
                for line in title.lines() {
                    writeln!(out, "  {} {}", style("│").cyan(), style(line).bold())?;
                }
                for (i, option) in options.iter().enumerate() {
                    writeln!(
                        out,
                        "  {}   {} {}  {}",
                        style("│").cyan(),
                        style(format!("/{}", i + 1)).yellow(),
                        option.label,
                        style(&option.data).dim()
                    )?;
                }
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Available commands:").bold())?;
    writeln!(out)?;
    writeln!(out, "  {}  Send a button tap with postback data", style("/tap <data>").cyan())?;
    writeln!(out, "  {}          Tap option n of the last menu", style("/<n>").cyan())?;
    writeln!(out, "  {}        Show this help message", style("/help").cyan())?;
    writeln!(out, "  {}        End the chat session", style("/exit").cyan())?;
    writeln!(out)
}
