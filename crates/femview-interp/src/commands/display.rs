//! Display flags, render switches, title and result conversion.

use femview_model::{
    Conversion, DisplayFlag, InterpMode, MinMaxScope, Projection, RefFrame, RenderStyle, Shading, ShellSurface,
    StrainVariety,
};

use crate::commands::rest_text;
use crate::dispatch::Outcome;
use crate::error::Result;
use crate::numeric::parse_f64;
use crate::session::Session;

/// `on` / `off`
pub fn on_off(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let keyword = tokens[0].as_str();
    let on = keyword == "on";
    let mut outcome = Outcome::mesh();

    for word in &tokens[1..] {
        match word.as_str() {
            "all" => {
                for flag in DisplayFlag::ALL_GROUP {
                    session.execute_words(&[keyword, flag.keyword()])?;
                }
            }
            "refresh" => session.state.refresh_enabled = on,
            other => match other.parse::<DisplayFlag>() {
                Ok(flag) => {
                    session.state.set_flag(flag, on);
                    if flag == DisplayFlag::Rough {
                        outcome = outcome.with_renorm();
                    }
                }
                Err(_) => session.write_text(&format!("On/Off command unrecognized: {other}\n")),
            },
        }
    }
    Ok(outcome)
}

/// `switch` / `sw`
pub fn switch(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let mut outcome = Outcome::mesh();
    let switches = &mut session.state.switches;
    let mut unrecognized = Vec::new();

    for word in &tokens[1..] {
        match word.as_str() {
            "persp" => switches.projection = Projection::Perspective,
            "ortho" => switches.projection = Projection::Orthographic,
            "flat" | "smooth" => {
                switches.shading = if word == "flat" { Shading::Flat } else { Shading::Smooth };
                outcome = outcome.with_renorm();
            }
            "hidden" => switches.style = RenderStyle::Hidden,
            "solid" => switches.style = RenderStyle::Solid,
            "cloud" => switches.style = RenderStyle::Cloud,
            "none" => switches.style = RenderStyle::None,
            "noterp" | "interp" | "gterp" => {
                switches.interp = match word.as_str() {
                    "noterp" => InterpMode::NoInterp,
                    "interp" => InterpMode::RegInterp,
                    _ => InterpMode::GoodInterp,
                };
                outcome = outcome.with_result_mod();
            }
            "mstat" | "mglob" => {
                switches.minmax = if word == "mstat" {
                    MinMaxScope::State
                } else {
                    MinMaxScope::Global
                };
                outcome = outcome.with_result_mod();
            }
            "middle" | "inner" | "outer" => {
                switches.shell_surface = match word.as_str() {
                    "middle" => ShellSurface::Middle,
                    "inner" => ShellSurface::Inner,
                    _ => ShellSurface::Outer,
                };
                outcome = outcome.with_result_mod();
            }
            "rglob" | "rloc" => {
                switches.frame = if word == "rglob" { RefFrame::Global } else { RefFrame::Local };
                outcome = outcome.with_result_mod();
            }
            "infin" | "grn" | "alman" | "rate" => {
                let strain = match word.as_str() {
                    "infin" => StrainVariety::Infinitesimal,
                    "grn" => StrainVariety::GreenLagrange,
                    "alman" => StrainVariety::Almansi,
                    _ => StrainVariety::Rate,
                };
                if switches.strain != strain {
                    switches.strain = strain;
                    outcome = outcome.with_result_mod();
                }
            }
            other => unrecognized.push(other.to_string()),
        }
    }

    for word in unrecognized {
        session.write_text(&format!("Switch command unrecognized: {word}\n"));
    }
    Ok(outcome)
}

pub fn title(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    session.state.title = Some(rest_text(tokens));
    Ok(Outcome::mesh())
}

pub fn reset_title(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.state.title = None;
    Ok(Outcome::mesh())
}

/// `conv <scale> <offset>`: displayed value = scale * value + offset.
pub fn conversion(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let scale = parse_f64(&tokens[1])?;
    let offset = parse_f64(&tokens[2])?;
    session.state.conversion = Conversion { scale, offset };
    Ok(Outcome::mesh().with_result_mod())
}

pub fn clear_conversion(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.state.conversion = Conversion::default();
    Ok(Outcome::mesh().with_result_mod())
}
