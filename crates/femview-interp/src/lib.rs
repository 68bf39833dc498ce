//! Command interpreter for the femview post-processor.
//!
//! A [`Session`] takes command lines, splits them on `;`, tokenizes each
//! piece, substitutes aliases and dispatches through the static command
//! table. Handlers mutate the analysis state and return an [`Outcome`] whose
//! redraw directive is resolved against the active render mode and carried
//! out through the [`Frontend`].
//!
//! ```ignore
//! let mesh = BlockMesh::new(BlockSpec::default())?;
//! let mut session = Session::new(Box::new(mesh), Box::new(Recorder::new()), SessionConfig::default());
//! session.parse_command("rx 30; show sz");
//! ```

pub mod alias;
pub mod commands;
pub mod dispatch;
pub mod error;
pub mod frontend;
pub mod history;
pub mod numeric;
pub mod props;
pub mod redraw;
pub mod session;
pub mod table;
pub mod token;

pub use alias::AliasTable;
pub use dispatch::{COMMANDS, CommandSpec, CommandTable, Handler, Outcome, command_table};
pub use error::{CommandError, HistoryError, Result, TokenizeError};
pub use frontend::{Frontend, FrontendEvent, Recorder, Severity};
pub use history::{CommandFile, History, MAX_REPLAY_DEPTH, ReplayState, ReplayStatus, ResumePoint};
pub use numeric::{IdentSpec, is_numeric_range_token, is_numeric_token, parse_mtl_range, parse_range};
pub use props::{PropertyKind, PropertyOutcome, PropertyParser, PropertyTargets};
pub use redraw::{RedrawAction, resolve};
pub use session::{DispatchStats, MAX_NESTING, Session, SessionConfig};
pub use token::{MAX_TOKENS, TOKEN_LENGTH, split_commands, tokenize};
