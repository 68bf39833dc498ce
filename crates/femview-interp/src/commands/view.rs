//! View transform commands.

use femview_model::{Axis, RedrawDirective, Superclass, ViewCenter};
use nalgebra::Vector3;

use crate::dispatch::Outcome;
use crate::error::{CommandError, Result};
use crate::numeric::{parse_f64, parse_i64};
use crate::session::Session;

fn axis_of(keyword: &str) -> Result<Axis> {
    match keyword.chars().last() {
        Some('x') => Ok(Axis::X),
        Some('y') => Ok(Axis::Y),
        Some('z') => Ok(Axis::Z),
        _ => Err(CommandError::invalid(format!("No axis in \"{keyword}\"."))),
    }
}

fn positive_factor(token: &str) -> Result<f64> {
    let value = parse_f64(token)?;
    if value <= 0.0 {
        return Err(CommandError::invalid("Scale factors must be positive."));
    }
    Ok(value)
}

/// `rx`, `ry`, `rz`
pub fn rotate(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let axis = axis_of(&tokens[0])?;
    let degrees = parse_f64(&tokens[1])?;
    session.state.view.rotate(axis, degrees);
    Ok(Outcome::mesh())
}

/// `tx`, `ty`, `tz`
pub fn translate(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let axis = axis_of(&tokens[0])?;
    let distance = parse_f64(&tokens[1])?;
    session.state.view.translate(axis, distance);
    Ok(Outcome::mesh())
}

pub fn scale(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let factor = positive_factor(&tokens[1])?;
    session.state.view.scale = Vector3::repeat(factor);
    Ok(Outcome::mesh())
}

pub fn scale_axes(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let sx = positive_factor(&tokens[1])?;
    let sy = positive_factor(&tokens[2])?;
    let sz = positive_factor(&tokens[3])?;
    session.state.view.scale = Vector3::new(sx, sy, sz);
    Ok(Outcome::mesh())
}

/// Reset the view transform, then `vcent off`.
pub fn reset_view(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.state.view.reset();
    session.execute_words(&["vcent", "off"])?;
    Ok(Outcome::new(RedrawDirective::BindingMeshVisual))
}

pub fn view_center(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let center = match (tokens[1].as_str(), tokens.len()) {
        ("off", 2) => ViewCenter::Off,
        ("hi", 2) => {
            if session.state.hilite.is_none() {
                session.inform("No object is highlighted; the view centers once one is.");
            }
            ViewCenter::Hilite
        }
        ("n" | "node", 3) => {
            let label = parse_i64(&tokens[2])?;
            let node = session
                .mesh
                .classes()
                .iter()
                .find(|c| c.superclass() == Superclass::Node)
                .and_then(|class| class.index_of_label(label))
                .ok_or_else(|| CommandError::invalid("Invalid node specified for view center."))?;
            ViewCenter::Node(node)
        }
        (_, 4) => ViewCenter::Point(Vector3::new(
            parse_f64(&tokens[1])?,
            parse_f64(&tokens[2])?,
            parse_f64(&tokens[3])?,
        )),
        _ => return Err(CommandError::Usage("vcent off | hi | n <node> | <x> <y> <z>".to_string())),
    };
    session.state.vcent = center;
    Ok(Outcome::mesh())
}
