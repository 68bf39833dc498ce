//! Visibility, enable, inclusion, property, selection and highlight commands.

use std::path::Path;

use comfy_table::{Cell, CellAlignment};
use femview_model::{ModelError, SpecifiedObject, Superclass};

use crate::commands::{Resolved, resolve_idents};
use crate::dispatch::Outcome;
use crate::error::{CommandError, Result};
use crate::history::CommandFile;
use crate::numeric::parse_i64;
use crate::props::{PropertyOutcome, PropertyTargets};
use crate::session::Session;
use crate::table::{align_column, styled_table};
use crate::token::tokenize;

/// Identifier operands resolved against one class.
struct Target {
    class: String,
    qty: usize,
    superclass: Superclass,
    resolved: Resolved,
}

fn unknown_class(word: &str) -> CommandError {
    CommandError::invalid(ModelError::UnknownClass(word.to_string()).to_string())
}

fn resolve_in_class(session: &Session, class_word: &str, ids: &[String]) -> Result<Target> {
    let class = session.mesh.resolve_class(class_word).ok_or_else(|| unknown_class(class_word))?;
    Ok(Target {
        class: class.name().to_string(),
        qty: class.qty(),
        superclass: class.superclass(),
        resolved: resolve_idents(class, ids),
    })
}

/// Resolve `[<class>] <ids>`, defaulting to materials when the first operand
/// names no class.
fn resolve_optional_class(session: &Session, operands: &[String], usage: &str) -> Result<Target> {
    let Some(first) = operands.first() else {
        return Err(CommandError::Usage(usage.to_string()));
    };
    if session.mesh.resolve_class(first).is_some() {
        if operands.len() < 2 {
            return Err(CommandError::Usage(usage.to_string()));
        }
        return resolve_in_class(session, first, &operands[1..]);
    }
    let class = session.material_class();
    Ok(Target {
        class: class.name().to_string(),
        qty: class.qty(),
        superclass: Superclass::Material,
        resolved: resolve_idents(&class, operands),
    })
}

fn report_warnings(session: &mut Session, warnings: &[String]) {
    for warning in warnings {
        session.warn(warning);
    }
}

fn set_bit(bits: &mut [bool], ident: usize, value: bool) {
    if let Some(bit) = bits.get_mut(ident) {
        *bit = value;
    }
}

/// `vis` / `invis [result] [<class>] <ids>`
pub fn visibility(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let hide = tokens[0] == "invis";
    let usage = if hide {
        "invis [result] [<class>] <ids>"
    } else {
        "vis [result] [<class>] <ids>"
    };
    let (results_only, operands) = match tokens[1].as_str() {
        "result" => (true, &tokens[2..]),
        _ => (false, &tokens[1..]),
    };
    let target = resolve_optional_class(session, operands, usage)?;
    report_warnings(session, &target.resolved.warnings);

    let state = &mut session.state;
    for &(ident, _) in &target.resolved.idents {
        if results_only {
            state.hidden_results.set(&target.class, target.qty, ident, hide);
        } else if target.superclass == Superclass::Material {
            set_bit(&mut state.hide_material, ident, hide);
        } else {
            state.hidden_objects.set(&target.class, target.qty, ident, hide);
        }
    }
    Ok(Outcome::mesh().with_renorm().with_result_mod())
}

/// `enable` / `disable [<class>] <ids>`
pub fn enable(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let disable = tokens[0] == "disable";
    let usage = if disable {
        "disable [<class>] <ids>"
    } else {
        "enable [<class>] <ids>"
    };
    let target = resolve_optional_class(session, &tokens[1..], usage)?;
    report_warnings(session, &target.resolved.warnings);

    let state = &mut session.state;
    for &(ident, _) in &target.resolved.idents {
        if target.superclass == Superclass::Material {
            set_bit(&mut state.disable_material, ident, disable);
        } else {
            state.disabled_objects.set(&target.class, target.qty, ident, disable);
        }
    }
    Ok(Outcome::mesh().with_result_mod())
}

/// `include` / `exclude <class> <ids>`
pub fn include(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let exclude = tokens[0] == "exclude";
    let target = resolve_in_class(session, &tokens[1], &tokens[2..])?;
    report_warnings(session, &target.resolved.warnings);
    for &(ident, _) in &target.resolved.idents {
        session
            .state
            .excluded_objects
            .set(&target.class, target.qty, ident, exclude);
    }
    Ok(Outcome::mesh().with_result_mod())
}

fn property_outcome(session: &mut Session, parsed: PropertyOutcome) -> Outcome {
    report_warnings(session, &parsed.warnings);
    let mut outcome = if parsed.redraw { Outcome::mesh() } else { Outcome::quiet() };
    outcome.renorm = parsed.renorm;
    outcome.result_mod = parsed.result_mod;
    outcome
}

/// `mtl ...`
pub fn material_props(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let state = &mut session.state;
    let mut targets = PropertyTargets {
        table: &mut state.materials,
        hide: &mut state.hide_material,
        disable: &mut state.disable_material,
    };
    let parsed = session.mtl.parse(&tokens[1..], &mut targets);
    Ok(property_outcome(session, parsed))
}

/// `surf ...`
pub fn surface_props(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let state = &mut session.state;
    let mut targets = PropertyTargets {
        table: &mut state.surfaces,
        hide: &mut state.hide_surface,
        disable: &mut state.disable_surface,
    };
    let parsed = session.surf.parse(&tokens[1..], &mut targets);
    Ok(property_outcome(session, parsed))
}

/// `select <class> <ids>` toggles membership; `select <file>` runs
/// `select <line>` for each line of the file.
pub fn select(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    if session.mesh.resolve_class(&tokens[1]).is_none() {
        if tokens.len() == 2 {
            return select_file(session, Path::new(&tokens[1]));
        }
        return Err(unknown_class(&tokens[1]));
    }
    if tokens.len() < 3 {
        return Err(CommandError::Usage("select <class> <ids> | select <file>".to_string()));
    }
    let target = resolve_in_class(session, &tokens[1], &tokens[2..])?;
    report_warnings(session, &target.resolved.warnings);
    for &(ident, label) in &target.resolved.idents {
        session.state.selection.toggle(&target.class, ident, label);
    }
    Ok(Outcome::mesh())
}

fn select_file(session: &mut Session, path: &Path) -> Result<Outcome> {
    let file = CommandFile::read(path)?;
    for (number, line) in file.commands_from(1) {
        let mut words = vec!["select".to_string()];
        let result = tokenize(line)
            .map_err(CommandError::from)
            .and_then(|tokens| {
                words.extend(tokens);
                session.execute(&words)
            });
        if let Err(err) = result {
            session.warn(&format!("{}:{number}: {err}", path.display()));
        }
    }
    Ok(Outcome::quiet())
}

/// `clrsel`, `clrsel <class>` or `clrsel <class> <ids>`
pub fn clear_selection(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    match tokens.len() {
        1 => session.state.selection.clear(),
        2 => {
            let class = session
                .mesh
                .resolve_class(&tokens[1])
                .ok_or_else(|| unknown_class(&tokens[1]))?
                .name()
                .to_string();
            session.state.selection.clear_class(&class);
        }
        _ => {
            let target = resolve_in_class(session, &tokens[1], &tokens[2..])?;
            report_warnings(session, &target.resolved.warnings);
            for &(ident, label) in &target.resolved.idents {
                if !session.state.selection.remove(&target.class, ident) {
                    session.inform(&format!("{} {label} not selected; request ignored.", target.class));
                }
            }
        }
    }
    Ok(Outcome::mesh())
}

pub fn tell_selection(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    if session.state.selection.is_empty() {
        session.write_text("No objects selected.\n");
        return Ok(Outcome::quiet());
    }
    let mut table = styled_table(&["Class", "Label"]);
    for object in session.state.selection.iter() {
        table.add_row(vec![Cell::new(&object.class), Cell::new(object.label)]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    let text = format!("{table}\n");
    session.write_text(&text);
    Ok(Outcome::quiet())
}

pub fn hilite(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let label = parse_i64(&tokens[2])?;
    let class = session.mesh.resolve_class(&tokens[1]).ok_or_else(|| unknown_class(&tokens[1]))?;
    let ident = class.index_of_label(label).ok_or_else(|| {
        CommandError::invalid(
            ModelError::InvalidLabel {
                class: class.name().to_string(),
                label,
            }
            .to_string(),
        )
    })?;
    session.state.hilite = Some(SpecifiedObject {
        class: class.name().to_string(),
        ident,
        label,
    });
    Ok(Outcome::mesh())
}

pub fn clear_hilite(session: &mut Session, _tokens: &[String]) -> Result<Outcome> {
    session.state.hilite = None;
    Ok(Outcome::mesh())
}
