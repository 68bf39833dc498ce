//! `surface` and `traction`.

use std::path::PathBuf;

use femview_traction::{
    MaterialSet, SurfaceParams, SurfaceShape, TractionError, auto_compute_n, auto_n_report, from_poly, generate,
    read_poly_file, surface_report, traction_area,
};
use nalgebra::Vector3;

use crate::dispatch::Outcome;
use crate::error::{CommandError, Result};
use crate::numeric::{parse_f64, parse_i64, parse_positive};
use crate::session::Session;

const SURFACE_USAGE: &str = "surface rect n px py pz vx vy vz a b\n\
     surface ring n px py pz vx vy vz delta_a delta_b\n\
     surface spot n px py pz vx vy vz delta\n\
     surface tube n px py pz vx vy vz delta_a h [delta_b]\n\
     surface poly <file>";

fn usage() -> CommandError {
    CommandError::Usage(SURFACE_USAGE.to_string())
}

fn vector_at(tokens: &[String], start: usize) -> Result<Vector3<f64>> {
    Ok(Vector3::new(
        parse_f64(&tokens[start])?,
        parse_f64(&tokens[start + 1])?,
        parse_f64(&tokens[start + 2])?,
    ))
}

/// Read the parameter table of a parametric surface command.
fn parametric(tokens: &[String]) -> Result<SurfaceParams> {
    let expected = match tokens[1].as_str() {
        "rect" | "ring" => 11..=11,
        "spot" => 10..=10,
        "tube" => 11..=12,
        _ => return Err(usage()),
    };
    if !expected.contains(&tokens.len()) {
        return Err(usage());
    }

    let n = parse_i64(&tokens[2])?;
    let n = usize::try_from(n).map_err(|_| usage())?;
    let p = vector_at(tokens, 3)?;
    let v = vector_at(tokens, 6)?;
    let shape = match tokens[1].as_str() {
        "rect" => SurfaceShape::Rect {
            a: parse_f64(&tokens[9])?,
            b: parse_f64(&tokens[10])?,
        },
        "ring" => SurfaceShape::Ring {
            delta_a: parse_f64(&tokens[9])?,
            delta_b: parse_f64(&tokens[10])?,
        },
        "spot" => SurfaceShape::Spot {
            delta: parse_f64(&tokens[9])?,
        },
        _ => {
            let delta_a = parse_f64(&tokens[9])?;
            let h = parse_f64(&tokens[10])?;
            let delta_b = match tokens.get(11) {
                Some(token) => parse_f64(token)?,
                None => delta_a,
            };
            SurfaceShape::Tube { delta_a, delta_b, h }
        }
    };
    Ok(SurfaceParams::new(shape, p, v, n)?)
}

/// `surface <shape> ...`: build the traction data table.
///
/// `n = 0` refines the density automatically against the traction
/// materials, or all materials when none are chosen yet.
pub fn surface(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    if tokens[1] == "poly" {
        if tokens.len() != 3 {
            return Err(usage());
        }
        let path = PathBuf::from(&tokens[2]);
        let poly = read_poly_file(&path)?;
        let params = SurfaceParams::new(SurfaceShape::Poly { path }, poly.centroid, Vector3::zeros(), 0)?;
        let surface = from_poly(&params, poly)?;
        let report = surface_report(&surface);
        session.surface = Some(surface);
        session.write_text(&report);
        return Ok(Outcome::quiet());
    }

    let params = parametric(tokens)?;
    let (surface, report) = if params.is_auto() {
        let materials = if session.traction_materials.is_empty() {
            MaterialSet::all(session.mesh.material_qty())
        } else {
            session.traction_materials.clone()
        };
        let mesh = session.mesh.as_ref();
        let auto = auto_compute_n(&params, |surface| traction_area(mesh, &mut surface.points, &materials))?;
        let report = auto_n_report(&auto);
        (auto.surface, report)
    } else {
        let surface = generate(&params, params.n)?;
        let report = surface_report(&surface);
        (surface, report)
    };
    tracing::info!(
        shape = surface.params.shape.keyword(),
        n = surface.params.n,
        points = surface.len(),
        "surface defined"
    );
    session.surface = Some(surface);
    session.write_text(&report);
    Ok(Outcome::quiet())
}

/// `traction all` or `traction <qty> <m1> ... <mqty>`
pub fn traction(session: &mut Session, tokens: &[String]) -> Result<Outcome> {
    let total = session.mesh.material_qty();
    let materials = if tokens[1] == "all" {
        MaterialSet::all(total)
    } else {
        let qty = parse_positive(&tokens[1])?;
        if tokens.len() != qty + 2 {
            return Err(CommandError::Usage(
                "traction all | traction <qty> <m1> ... <mqty>".to_string(),
            ));
        }
        let mut materials = MaterialSet::new(total);
        for token in &tokens[2..] {
            let m = parse_i64(token)?;
            let inserted = usize::try_from(m)
                .ok()
                .and_then(|m| m.checked_sub(1))
                .is_some_and(|index| materials.insert(index));
            if !inserted {
                session.warn(&format!("Material {m} out of range 1..{total}; skipped."));
            }
        }
        materials
    };
    if materials.is_empty() {
        return Err(CommandError::invalid("No materials selected for traction."));
    }

    let state = session.state.state_index;
    let interp = session.state.switches.interp;
    let surface = session.surface.as_mut().ok_or(TractionError::NoSurface)?;
    let resultants = femview_traction::traction(session.mesh.as_ref(), surface, &materials, state, interp)?;
    session.traction_materials = materials;
    session.write_text(&resultants.to_string());
    Ok(Outcome::quiet())
}
