//! Session construction and the batch and interactive drivers.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use femview_interp::{DispatchStats, Frontend, ReplayStatus, Session, SessionConfig};
use femview_model::BlockMesh;

use crate::config::Config;

pub const PROMPT: &str = "femview> ";

/// Build the block mesh from `[mesh]` and open a session on it.
pub fn build_session(config: &Config, session_config: SessionConfig, frontend: Box<dyn Frontend>) -> Result<Session> {
    let mesh = BlockMesh::new(config.mesh.clone()).context("invalid [mesh] configuration")?;
    tracing::debug!(batch = session_config.batch, "session opened");
    Ok(Session::new(Box::new(mesh), frontend, session_config))
}

/// Replay each script in turn. Stops early on `quit`.
///
/// # Errors
///
/// Fails when a script cannot be read.
pub fn run_scripts(session: &mut Session, scripts: &[PathBuf]) -> Result<DispatchStats> {
    for script in scripts {
        let status = session
            .replay_file(script, 1)
            .with_context(|| format!("failed to run script {}", script.display()))?;
        match status {
            ReplayStatus::Completed => {}
            ReplayStatus::Paused => {
                let next_line = session.replay_state().resume_point().map(|point| point.next_line);
                tracing::info!(script = %script.display(), ?next_line, "script paused");
            }
            ReplayStatus::Stopped => break,
        }
    }
    Ok(session.stats())
}

/// Read lines from `input` until end of input or `quit`, writing a prompt
/// before each one.
pub fn repl<R: BufRead, W: Write>(session: &mut Session, input: R, prompt: &mut W) -> Result<DispatchStats> {
    let mut lines = input.lines();
    while session.is_running() {
        write!(prompt, "{PROMPT}").context("failed to write prompt")?;
        prompt.flush().context("failed to write prompt")?;
        let Some(line) = lines.next() else {
            writeln!(prompt).context("failed to write prompt")?;
            break;
        };
        let line = line.context("failed to read input")?;
        session.parse_command(&line);
    }
    Ok(session.stats())
}
