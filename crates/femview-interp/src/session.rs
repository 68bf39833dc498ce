//! The interpreter session: analysis state plus everything that persists
//! between commands.

use std::path::Path;

use femview_model::{AnalysisState, MeshClass, MeshDb, Superclass};
use femview_traction::{MaterialSet, SampledSurface};

use crate::alias::AliasTable;
use crate::dispatch::{Outcome, command_table};
use crate::error::{CommandError, HistoryError, Result};
use crate::frontend::{Frontend, Severity};
use crate::history::{
    CommandFile, DEFAULT_HISTORY_CAPACITY, History, MAX_REPLAY_DEPTH, ReplayState, ReplayStatus, ResumePoint,
};
use crate::props::{PropertyKind, PropertyParser};
use crate::redraw;
use crate::token::{split_commands, tokenize};

/// Deepest nesting of commands dispatching commands (`r`, composites, replay).
pub const MAX_NESTING: usize = 64;

/// Session options, usually from the `[session]` configuration table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub history_capacity: usize,
    /// Passes made by `loop` before it gives up.
    pub loop_limit: usize,
    /// Batch sessions refuse `loop`.
    pub batch: bool,
    /// Write each command to the frontend before running it.
    pub echo: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            loop_limit: 1000,
            batch: false,
            echo: false,
        }
    }
}

/// Counts of dispatched commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub valid: usize,
    pub invalid: usize,
}

/// One interpreter session.
pub struct Session {
    pub(crate) state: AnalysisState,
    pub(crate) mesh: Box<dyn MeshDb>,
    pub(crate) frontend: Box<dyn Frontend>,
    pub(crate) config: SessionConfig,
    pub(crate) aliases: AliasTable,
    pub(crate) mtl: PropertyParser,
    pub(crate) surf: PropertyParser,
    pub(crate) surface: Option<SampledSurface>,
    pub(crate) traction_materials: MaterialSet,
    pub(crate) history: History,
    pub(crate) replay: ReplayState,
    pub(crate) last_command: Option<String>,
    pub(crate) running: bool,
    depth: usize,
    stats: DispatchStats,
}

impl Session {
    pub fn new(mesh: Box<dyn MeshDb>, frontend: Box<dyn Frontend>, config: SessionConfig) -> Self {
        let state = AnalysisState::for_mesh(mesh.as_ref());
        let traction_materials = MaterialSet::new(mesh.material_qty());
        let history = History::new(config.history_capacity);
        Self {
            state,
            mesh,
            frontend,
            config,
            aliases: AliasTable::new(),
            mtl: PropertyParser::new(PropertyKind::Material),
            surf: PropertyParser::new(PropertyKind::Surface),
            surface: None,
            traction_materials,
            history,
            replay: ReplayState::default(),
            last_command: None,
            running: true,
            depth: 0,
            stats: DispatchStats::default(),
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AnalysisState {
        &mut self.state
    }

    pub fn mesh(&self) -> &dyn MeshDb {
        self.mesh.as_ref()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn replay_state(&self) -> &ReplayState {
        &self.replay
    }

    pub fn surface(&self) -> Option<&SampledSurface> {
        self.surface.as_ref()
    }

    pub fn traction_materials(&self) -> &MaterialSet {
        &self.traction_materials
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// False once a `quit` has run.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run one input line. Returns `true` when every command on it was valid.
    pub fn parse_command(&mut self, line: &str) -> bool {
        let mut all_valid = true;
        for piece in split_commands(line) {
            all_valid &= self.run_piece(piece);
            if !self.running {
                break;
            }
        }
        all_valid
    }

    fn run_piece(&mut self, piece: &str) -> bool {
        let command = piece.trim();
        let mut tokens = match tokenize(command) {
            Ok(tokens) => tokens,
            Err(err) => return self.reject(&err.into()),
        };
        if tokens.is_empty() {
            return true;
        }
        if let Err(err) = self.aliases.substitute(&mut tokens) {
            return self.reject(&err.into());
        }
        if self.config.echo {
            self.frontend.write_text(&format!("{command}\n"));
        }
        tracing::debug!(command, "dispatching");

        let valid = match self.execute(&tokens) {
            Ok(outcome) => {
                if !outcome.unlogged
                    && let Err(err) = self.history.record(command)
                {
                    self.report(&err.into());
                }
                self.stats.valid += 1;
                true
            }
            Err(err) => self.reject(&err),
        };

        if tokens[0] != "r" {
            self.last_command = Some(command.to_string());
        }
        valid
    }

    fn reject(&mut self, err: &CommandError) -> bool {
        self.report(err);
        self.stats.invalid += 1;
        false
    }

    /// Look up, validate and run one tokenized command, then apply its
    /// redraw, renorm and result effects.
    pub fn execute(&mut self, tokens: &[String]) -> Result<Outcome> {
        let Some(keyword) = tokens.first() else {
            return Ok(Outcome::quiet());
        };
        let spec = command_table()
            .get(keyword)
            .ok_or_else(|| CommandError::invalid(format!("Command \"{keyword}\" unrecognized.")))?;
        if tokens.len() < spec.min_tokens {
            return Err(CommandError::Usage(spec.usage.to_string()));
        }
        if self.depth >= MAX_NESTING {
            return Err(CommandError::invalid(format!(
                "Commands nested more than {MAX_NESTING} deep; \"{keyword}\" ignored."
            )));
        }

        self.depth += 1;
        let result = (spec.handler)(self, tokens);
        self.depth -= 1;

        let outcome = result?;
        self.apply_outcome(&outcome);
        Ok(outcome)
    }

    /// Dispatch a synthetic command through [`Session::execute`].
    pub(crate) fn execute_words(&mut self, words: &[&str]) -> Result<Outcome> {
        let tokens: Vec<String> = words.iter().map(|w| (*w).to_string()).collect();
        self.execute(&tokens)
    }

    fn apply_outcome(&mut self, outcome: &Outcome) {
        if outcome.renorm {
            self.frontend.recompute_normals();
        }

        let mode = self.state.render_mode;
        let action = redraw::resolve(outcome.redraw, mode).gated(mode, self.state.refresh_enabled, self.state.vcent);
        if let Some(target) = action.switch_to {
            self.state.render_mode = target;
        }
        if action.center_view {
            self.frontend.center_view(&self.state.vcent);
        }
        if action.refresh {
            self.frontend.refresh(self.state.render_mode);
        }

        if outcome.result_mod {
            self.frontend.load_result(self.state.result.as_deref());
            if self.state.refresh_enabled {
                self.frontend.refresh(self.state.render_mode);
            }
        }
    }

    pub(crate) fn report(&mut self, err: &CommandError) {
        tracing::debug!(error = %err, "command rejected");
        self.frontend.popup(err.severity(), &err.to_string());
    }

    pub(crate) fn warn(&mut self, message: &str) {
        self.frontend.popup(Severity::Warning, message);
    }

    pub(crate) fn inform(&mut self, message: &str) {
        self.frontend.popup(Severity::Info, message);
    }

    pub(crate) fn write_text(&mut self, text: &str) {
        self.frontend.write_text(text);
    }

    /// The materials as a class, for identifier resolution.
    pub(crate) fn material_class(&self) -> MeshClass {
        self.mesh
            .classes()
            .iter()
            .find(|c| c.superclass() == Superclass::Material)
            .cloned()
            .unwrap_or_else(|| MeshClass::new("mat", "Materials", Superclass::Material, self.mesh.material_qty()))
    }

    /// Replay a command file from 1-based `start_line`.
    pub fn replay_file(&mut self, path: &Path, start_line: usize) -> Result<ReplayStatus> {
        if self.replay.depth >= MAX_REPLAY_DEPTH {
            return Err(HistoryError::TooDeep {
                limit: MAX_REPLAY_DEPTH,
            }
            .into());
        }
        let file = CommandFile::read(path)?;
        tracing::info!(path = %path.display(), start_line, "replaying command file");

        self.replay.depth += 1;
        let status = self.replay_lines(&file, start_line);
        self.replay.depth -= 1;
        if self.replay.depth == 0 {
            self.replay.pausing = false;
        }
        Ok(status)
    }

    fn replay_lines(&mut self, file: &CommandFile, start_line: usize) -> ReplayStatus {
        for (number, line) in file.commands_from(start_line) {
            self.parse_command(line);
            if !self.running {
                return ReplayStatus::Stopped;
            }
            if self.replay.pausing {
                // The innermost file is the one that resumes.
                if self.replay.resume.is_none() {
                    self.replay.resume = Some(ResumePoint {
                        path: file.path.clone(),
                        next_line: number + 1,
                    });
                    tracing::info!(path = %file.path.display(), next_line = number + 1, "replay paused");
                }
                return ReplayStatus::Paused;
            }
        }
        ReplayStatus::Completed
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("render_mode", &self.state.render_mode)
            .field("history", &self.history)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
