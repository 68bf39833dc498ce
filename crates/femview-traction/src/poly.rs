//! Reader for explicit poly surface files.
//!
//! The first line holds the point count `n`. Each of the next `n` lines holds
//! `px py pz nx ny nz dA`, separated by any mix of spaces, tabs, commas and
//! semicolons. Blank lines are ignored.

use std::fs;
use std::path::Path;

use nalgebra::Vector3;

use crate::error::{Result, TractionError};
use crate::generate::TractionPoint;
use crate::surface::MAXIMUM_SURFACE_POINTS;

const FIELD_NAMES: [&str; 7] = ["px", "py", "pz", "nx", "ny", "nz", "dA"];

/// Points read from a poly file plus their area-weighted centroid.
#[derive(Debug, Clone)]
pub struct PolySurface {
    pub points: Vec<TractionPoint>,
    pub centroid: Vector3<f64>,
}

impl PolySurface {
    pub fn total_area(&self) -> f64 {
        self.points.iter().map(|p| p.area).sum()
    }
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(['\t', ' ', ',', ';', '\r']).filter(|f| !f.is_empty())
}

/// Read and parse a poly surface file.
pub fn read_poly_file(path: &Path) -> Result<PolySurface> {
    let text = fs::read_to_string(path).map_err(|source| TractionError::PolyRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_poly(path, &text)
}

/// Parse poly surface text; `path` is only used in error messages.
pub fn parse_poly(path: &Path, text: &str) -> Result<PolySurface> {
    let format_error = |line: usize, reason: String| TractionError::PolyFormat {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| format_error(1, "Invalid quantity of points OR quantity of points format.".to_string()))?;
    let mut header_fields = fields(header);
    let qty: i64 = match (header_fields.next(), header_fields.next()) {
        (Some(token), None) => token
            .parse()
            .map_err(|_| format_error(header_line, "Unable to convert n.".to_string()))?,
        _ => {
            return Err(format_error(
                header_line,
                "Invalid quantity of points OR quantity of points format.".to_string(),
            ));
        }
    };
    if qty <= 0 {
        return Err(format_error(header_line, "n MUST be > 0".to_string()));
    }
    let qty = usize::try_from(qty).unwrap_or(usize::MAX).min(MAXIMUM_SURFACE_POINTS);

    let mut points = Vec::with_capacity(qty);
    let mut weighted = Vector3::zeros();
    let mut total_area = 0.0;
    for (line_no, line) in lines.take(qty) {
        let tokens: Vec<&str> = fields(line).collect();
        if tokens.len() != FIELD_NAMES.len() {
            return Err(format_error(
                line_no,
                "Invalid quantity of data -- px py pz nx ny nz dA".to_string(),
            ));
        }
        let mut values = [0.0f64; 7];
        for ((value, token), name) in values.iter_mut().zip(&tokens).zip(FIELD_NAMES) {
            *value = token
                .parse()
                .map_err(|_| format_error(line_no, format!("Unable to convert {name}.")))?;
        }
        let point = Vector3::new(values[0], values[1], values[2]);
        let normal = Vector3::new(values[3], values[4], values[5]);
        let area = values[6];
        let Some(normal) = normal.try_normalize(1.0e-12) else {
            return Err(format_error(line_no, "normal must be non-zero".to_string()));
        };
        if area.is_nan() || area <= 0.0 {
            return Err(format_error(line_no, "dA MUST be > 0".to_string()));
        }
        weighted += point * area;
        total_area += area;
        points.push(TractionPoint {
            point,
            rst: Vector3::zeros(),
            normal,
            area,
            element: None,
        });
    }

    if points.len() < qty {
        return Err(format_error(
            text.lines().count(),
            format!("expected {qty} points, found {}", points.len()),
        ));
    }

    Ok(PolySurface {
        points,
        centroid: weighted / total_area,
    })
}
