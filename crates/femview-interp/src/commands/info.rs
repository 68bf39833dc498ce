//! Informational commands: `info`, `tellpos`, `help`.

use std::fmt::Write as _;

use femview_model::{RenderMode, Superclass};
use femview_traction::format_g;

use crate::dispatch::{Outcome, command_table};
use crate::error::{CommandError, Result};
use crate::numeric::parse_i64;
use crate::session::Session;

fn time_text(session: &Session, state: usize) -> String {
    session.mesh.state_time(state).map_or_else(|| "n/a".to_string(), format_g)
}

pub fn info(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    let state = &session.state;
    let last = state.state_qty.saturating_sub(1);
    let mut text = String::new();
    let _ = writeln!(text, "*************** FEMVIEW INFO ***************");
    let _ = writeln!(text, "States:  {}", state.state_qty);
    let _ = writeln!(text, "Current state:  {}", state.state_index + 1);
    let _ = writeln!(text, "Start time:  {}", time_text(session, 0));
    let _ = writeln!(text, "End time:  {}", time_text(session, last));
    let _ = writeln!(text, "Current time:  {}", time_text(session, state.state_index));
    for class in session.mesh.classes() {
        let _ = writeln!(text, "{}:  {}", class.long_name(), class.qty());
    }
    let _ = writeln!(text, "Surfaces:  {}", session.mesh.surface_qty());
    let _ = writeln!(text, "Result:  {}", state.result.as_deref().unwrap_or("none"));
    let mode = match state.render_mode {
        RenderMode::Mesh => "mesh",
        RenderMode::Plot => "plot",
    };
    let _ = writeln!(text, "Render mode:  {mode}");
    let _ = writeln!(text, "Selected objects:  {}", state.selection.len());
    match &session.surface {
        Some(surface) => {
            let _ = writeln!(
                text,
                "Traction surface:  {} with {} points",
                surface.params.shape.keyword(),
                surface.len()
            );
        }
        None => {
            let _ = writeln!(text, "Traction surface:  none");
        }
    }
    session.write_text(&text);
    Ok(Outcome::quiet())
}

/// `tellpos <node>`
pub fn tell_position(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let label = parse_i64(&tokens[1])?;
    let position = session
        .mesh
        .classes()
        .iter()
        .find(|c| c.superclass() == Superclass::Node)
        .and_then(|class| class.index_of_label(label))
        .and_then(|node| session.mesh.node_position(node))
        .ok_or_else(|| CommandError::invalid(format!("Node {label} not found.")))?;
    let text = format!(
        "Node {label}:  {}, {}, {}\n",
        format_g(position.x),
        format_g(position.y),
        format_g(position.z)
    );
    session.write_text(&text);
    Ok(Outcome::quiet())
}

pub fn help(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    let mut text = String::new();
    for spec in command_table().iter() {
        let _ = writeln!(text, "{:<10}{}", spec.name, spec.summary);
    }
    session.write_text(&text);
    Ok(Outcome::quiet())
}
