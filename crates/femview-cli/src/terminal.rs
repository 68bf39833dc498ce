//! A [`Frontend`] for a plain terminal.
//!
//! Text goes to the output stream. Popups go to the diagnostic stream,
//! prefixed with their severity unless they are usage text. There is no display, so the
//! visual callbacks only log at debug level.

use std::io::{self, Stderr, Stdout, Write};

use femview_interp::{Frontend, Severity};
use femview_model::{RenderMode, ViewCenter};

pub struct TerminalFrontend<O, E> {
    out: O,
    err: E,
}

impl TerminalFrontend<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalFrontend<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }
}

impl<O: Write, E: Write> Frontend for TerminalFrontend<O, E> {
    fn popup(&mut self, severity: Severity, message: &str) {
        tracing::debug!(%severity, "{message}");
        // Usage text already names itself.
        let _ = match severity {
            Severity::Usage => writeln!(self.err, "{message}"),
            _ => writeln!(self.err, "{severity}: {message}"),
        };
        let _ = self.err.flush();
    }

    fn write_text(&mut self, text: &str) {
        if let Err(error) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::error!(%error, "failed to write command output");
        }
    }

    fn refresh(&mut self, mode: RenderMode) {
        tracing::debug!(?mode, "refresh");
    }

    fn recompute_normals(&mut self) {
        tracing::debug!("recompute normals");
    }

    fn center_view(&mut self, center: &ViewCenter) {
        tracing::debug!(?center, "center view");
    }

    fn load_result(&mut self, result: Option<&str>) {
        tracing::debug!(result = result.unwrap_or("none"), "load result");
    }
}
