//! Automatic selection of the surface density `n`.

use crate::error::{Result, TractionError};
use crate::generate::{SampledSurface, generate};
use crate::surface::{SurfaceParams, SurfaceShape};

pub const AUTO_N_START: usize = 40;
pub const AUTO_N_INCREMENT: usize = 10;
/// Relative change, in percent, below which the area has converged.
pub const AUTO_N_TOLERANCE: f64 = 1.0;
/// Refinement stops once a surface has more points than this.
pub const AUTO_N_POINT_LIMIT: usize = 1_000_000;

/// Result of [`auto_compute_n`].
#[derive(Debug, Clone)]
pub struct AutoN {
    pub n: usize,
    pub area: f64,
    /// Every `n` tried after the starting value, in order.
    pub trail: Vec<usize>,
    pub surface: SampledSurface,
}

/// Percent change between two successive areas.
///
/// Two zero areas count as converged: nothing of the surface lies in the
/// selected materials and refining cannot change that.
pub fn convergence_term(area: f64, prior: f64) -> f64 {
    let sum = (area + prior).abs();
    if sum == 0.0 {
        return 0.0;
    }
    200.0 * (area - prior).abs() / sum
}

/// Refine `n` from [`AUTO_N_START`] in steps of [`AUTO_N_INCREMENT`] until
/// the area measured by `measure` changes by at most [`AUTO_N_TOLERANCE`]
/// percent, or the point count passes [`AUTO_N_POINT_LIMIT`].
///
/// `measure` receives each regenerated surface and returns the area that
/// counts for convergence, normally the located area in selected materials.
pub fn auto_compute_n<F>(params: &SurfaceParams, mut measure: F) -> Result<AutoN>
where
    F: FnMut(&mut SampledSurface) -> Result<f64>,
{
    if matches!(params.shape, SurfaceShape::Poly { .. }) {
        return Err(TractionError::AutoNotSupported);
    }

    let mut n = AUTO_N_START;
    let mut surface = generate(params, n)?;
    let mut area = measure(&mut surface)?;
    let mut trail = Vec::new();

    loop {
        let prior = area;
        n += AUTO_N_INCREMENT;
        trail.push(n);
        surface = generate(params, n)?;
        area = measure(&mut surface)?;
        let term = convergence_term(area, prior);
        tracing::debug!(n, area, term, points = surface.len(), "auto n step");
        if term <= AUTO_N_TOLERANCE || surface.len() > AUTO_N_POINT_LIMIT {
            break;
        }
    }

    Ok(AutoN {
        n,
        area,
        trail,
        surface,
    })
}
