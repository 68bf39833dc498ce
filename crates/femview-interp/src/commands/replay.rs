//! Text output, aliases, history capture and command-file replay.

use std::fmt::Write as _;
use std::path::Path;

use crate::commands::rest_text;
use crate::dispatch::Outcome;
use crate::error::{CommandError, Result};
use crate::history::ReplayStatus;
use crate::numeric::parse_positive;
use crate::session::Session;

pub fn echo(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let text = format!("{}\n", rest_text(tokens));
    session.write_text(&text);
    Ok(Outcome::quiet())
}

/// `alias` lists, `alias <name>` shows one, `alias <name> <tokens...>` defines.
pub fn alias(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    match tokens.len() {
        1 => {
            let mut text = String::new();
            if session.aliases.is_empty() {
                text.push_str("No aliases defined.\n");
            }
            for (name, replacement) in session.aliases.iter() {
                let _ = writeln!(text, "{name} = {}", replacement.join(" "));
            }
            session.write_text(&text);
        }
        2 => {
            let name = &tokens[1];
            let replacement = session
                .aliases
                .get(name)
                .ok_or_else(|| CommandError::invalid(format!("Alias \"{name}\" not defined.")))?
                .join(" ");
            session.write_text(&format!("{name} = {replacement}\n"));
        }
        _ => {
            session.aliases.define(tokens[1].clone(), tokens[2..].to_vec());
        }
    }
    Ok(Outcome::quiet())
}

/// `r`: run the previous command line again.
pub fn repeat(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    let line = session
        .last_command
        .clone()
        .ok_or_else(|| CommandError::invalid("No previous command."))?;
    session.parse_command(&line);
    Ok(Outcome::quiet().not_logged())
}

pub fn save_history(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    session.history.start_capture(Path::new(&tokens[1]))?;
    Ok(Outcome::quiet().not_logged())
}

pub fn end_history(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    if session.history.stop_capture()?.is_none() {
        session.inform("No history file is open.");
    }
    Ok(Outcome::quiet().not_logged())
}

pub fn output_history(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let path = Path::new(&tokens[1]);
    let written = session.history.write_ring(path)?;
    session.write_text(&format!("Wrote {written} commands to {}\n", path.display()));
    Ok(Outcome::quiet())
}

/// `rdhis` / `h <file> [<line>]`
pub fn read_history(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let start = match tokens.get(2) {
        Some(token) => parse_positive(token)?,
        None => 1,
    };
    let path = Path::new(&tokens[1]);
    if session.replay_file(path, start)? == ReplayStatus::Paused && !session.replay.is_replaying() {
        session.inform("Command file paused; use resume to continue.");
    }
    Ok(Outcome::quiet())
}

/// `loop <file>`: replay until the pass limit, a pause or a quit.
pub fn loop_file(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    if session.config.batch {
        return Err(CommandError::invalid("loop is disabled in batch mode."));
    }
    let path = Path::new(&tokens[1]);
    for pass in 0..session.config.loop_limit {
        let status = session.replay_file(path, 1)?;
        if status != ReplayStatus::Completed {
            tracing::info!(pass, ?status, "loop ended early");
            break;
        }
    }
    Ok(Outcome::quiet())
}

pub fn pause(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    if !session.replay.is_replaying() {
        session.inform("No command file is being replayed.");
        return Ok(Outcome::quiet());
    }
    session.replay.pausing = true;
    session.replay.resume = None;
    Ok(Outcome::quiet())
}

pub fn resume(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    let point = session
        .replay
        .resume
        .take()
        .ok_or_else(|| CommandError::invalid("No paused command file to resume."))?;
    session.replay_file(&point.path, point.next_line)?;
    Ok(Outcome::quiet())
}

/// `quit`, `exit`, `end`, `done`
pub fn quit(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.running = false;
    Ok(Outcome::quiet())
}
