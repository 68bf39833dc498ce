//! Result selection, time-history plots and state navigation.

use femview_model::RedrawDirective;

use crate::dispatch::Outcome;
use crate::error::{CommandError, Result};
use crate::numeric::{parse_f64, parse_positive};
use crate::session::Session;

fn known_result(session: &Session, name: &str) -> Result<()> {
    if session.mesh.result_names().iter().any(|r| r == name) {
        Ok(())
    } else {
        Err(CommandError::invalid(format!("Result \"{name}\" not found.")))
    }
}

pub fn show(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    known_result(session, &tokens[1])?;
    session.state.result = Some(tokens[1].clone());
    Ok(Outcome::new(RedrawDirective::BindingMeshVisual).with_result_mod())
}

/// `plot [<result> ...]`: without operands the shown result is plotted.
pub fn plot(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let requested: Vec<String> = if tokens.len() > 1 {
        for name in &tokens[1..] {
            known_result(session, name)?;
        }
        tokens[1..].to_vec()
    } else {
        session.state.result.iter().cloned().collect()
    };
    if requested.is_empty() && session.state.plot_results.is_empty() {
        return Err(CommandError::invalid("No result selected for plotting."));
    }
    for name in requested {
        if !session.state.plot_results.contains(&name) {
            session.state.plot_results.push(name);
        }
    }
    Ok(Outcome::new(RedrawDirective::BindingPlotVisual))
}

pub fn clear_plot(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.state.plot_results.clear();
    Ok(Outcome::new(RedrawDirective::NonbindingPlotVisual))
}

fn goto_state(session: &mut Session, index: usize) -> Outcome {
    session.state.state_index = index;
    tracing::debug!(state = index + 1, "state changed");
    Outcome::mesh().with_result_mod()
}

/// `state <n>`, 1-based.
pub fn state(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let n = parse_positive(&tokens[1])?;
    let qty = session.state.state_qty;
    if n > qty {
        return Err(CommandError::invalid(format!("State {n} out of range 1..{qty}.")));
    }
    Ok(goto_state(session, n - 1))
}

/// `n`, `p`, `f`, `l`. Stepping past either end stays put.
pub fn step_state(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let current = session.state.state_index;
    let last = session.state.state_qty.saturating_sub(1);
    let index = match tokens[0].as_str() {
        "n" => (current + 1).min(last),
        "p" => current.saturating_sub(1),
        "f" => 0,
        _ => last,
    };
    Ok(goto_state(session, index))
}

/// `time <t>`: the last state whose time does not exceed `t`, or the first
/// state when `t` precedes them all.
pub fn time(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let t = parse_f64(&tokens[1])?;
    let index = (0..session.state.state_qty)
        .take_while(|&i| session.mesh.state_time(i).is_some_and(|time| time <= t))
        .last()
        .unwrap_or(0);
    Ok(goto_state(session, index))
}
