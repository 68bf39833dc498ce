//! Geometry generators: tessellate a surface into weighted sample points.
//!
//! Every generator returns points whose areas sum to the analytic area of the
//! requested shape, so sampling density never biases the integrated force.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector3;

use crate::error::{Result, TractionError};
use crate::poly::PolySurface;
use crate::surface::{SurfaceBasis, SurfaceParams, SurfaceShape};

/// Minimum number of points placed on any ring.
pub const MINIMUM_RING_POINTS: usize = 6;

/// Largest traction data table a generator will allocate.
pub const MAXIMUM_TABLE_POINTS: usize = 10_000_000;

/// One row of the traction data table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractionPoint {
    pub point: Vector3<f64>,
    /// Element-centered coordinates, valid once `element` is set.
    pub rst: Vector3<f64>,
    /// Unit normal.
    pub normal: Vector3<f64>,
    pub area: f64,
    /// Containing brick; `None` marks a null point excluded from integration.
    pub element: Option<usize>,
}

impl TractionPoint {
    fn new(point: Vector3<f64>, normal: Vector3<f64>, area: f64) -> Self {
        Self {
            point,
            rst: Vector3::zeros(),
            normal,
            area,
            element: None,
        }
    }
}

/// A generated surface: the parameters it came from, its frame, and its points.
#[derive(Debug, Clone)]
pub struct SampledSurface {
    pub params: SurfaceParams,
    pub basis: SurfaceBasis,
    pub points: Vec<TractionPoint>,
}

impl SampledSurface {
    /// Sum of every point's area, located or not.
    pub fn sampled_area(&self) -> f64 {
        self.points.iter().map(|p| p.area).sum()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Generate the traction data table for a parametric surface at density `n`.
///
/// The returned parameters carry the `n` actually used. Poly surfaces go
/// through [`from_poly`].
pub fn generate(params: &SurfaceParams, n: usize) -> Result<SampledSurface> {
    let n = n.max(1);
    let basis = SurfaceBasis::from_direction(&params.v)?;
    let points = match params.shape {
        SurfaceShape::Rect { a, b } => rect(&params.p, &basis, n, a, b)?,
        SurfaceShape::Ring { delta_a, delta_b } => ring(&params.p, &basis, n, delta_a, delta_b)?,
        SurfaceShape::Spot { delta } => spot(&params.p, &basis, n, delta)?,
        SurfaceShape::Tube { delta_a, delta_b, h } => tube(&params.p, &basis, n, delta_a, delta_b, h)?,
        SurfaceShape::Poly { .. } => return Err(TractionError::AutoNotSupported),
    };
    tracing::debug!(shape = params.shape.keyword(), n, points = points.len(), "generated surface");
    let mut params = params.clone();
    params.n = n;
    Ok(SampledSurface { params, basis, points })
}

/// Wrap the points of a poly file as a sampled surface.
///
/// `p` becomes the area-weighted centroid and the frame follows the first
/// point's normal.
pub fn from_poly(params: &SurfaceParams, poly: PolySurface) -> Result<SampledSurface> {
    let basis = SurfaceBasis::from_direction(&poly.points[0].normal)?;
    let mut params = params.clone();
    params.p = poly.centroid;
    params.v = basis.u0;
    params.n = poly.points.len();
    Ok(SampledSurface {
        params,
        basis,
        points: poly.points,
    })
}

fn too_many_points() -> TractionError {
    TractionError::TooManyPoints {
        limit: MAXIMUM_TABLE_POINTS,
    }
}

/// Round a non-negative point count, rejecting counts past the table limit.
fn round_count(x: f64) -> Result<usize> {
    let rounded = (x + 0.5).floor().max(0.0);
    if !rounded.is_finite() || rounded > MAXIMUM_TABLE_POINTS as f64 {
        return Err(too_many_points());
    }
    Ok(rounded as usize)
}

/// Running table size; fails once the total passes the limit.
fn add_points(total: usize, count: usize) -> Result<usize> {
    total
        .checked_add(count)
        .filter(|&sum| sum <= MAXIMUM_TABLE_POINTS)
        .ok_or_else(too_many_points)
}

fn rect(p: &Vector3<f64>, basis: &SurfaceBasis, n: usize, a: f64, b: f64) -> Result<Vec<TractionPoint>> {
    let dx = a.min(b) / n as f64;
    let qa = round_count(a / dx)?.max(1);
    let qb = round_count(b / dx)?.max(1);
    let total = qa
        .checked_mul(qb)
        .filter(|&total| total <= MAXIMUM_TABLE_POINTS)
        .ok_or_else(too_many_points)?;
    let step_a = a / qa as f64;
    let step_b = b / qb as f64;
    let area = a * b / total as f64;

    let mut points = Vec::with_capacity(total);
    for i in 0..qa {
        let x = -0.5 * a + (i as f64 + 0.5) * step_a;
        for j in 0..qb {
            let y = -0.5 * b + (j as f64 + 0.5) * step_b;
            points.push(TractionPoint::new(basis.place(p, x, y, 0.0), basis.u0, area));
        }
    }
    Ok(points)
}

/// Area-weighted centroid radius of the annulus `[r1, r2]`.
fn centroid_radius(r1: f64, r2: f64) -> f64 {
    (2.0 / 3.0) * (r2.powi(3) - r1.powi(3)) / (r2 * r2 - r1 * r1)
}

fn push_circle(
    points: &mut Vec<TractionPoint>,
    p: &Vector3<f64>,
    basis: &SurfaceBasis,
    radius: f64,
    count: usize,
    area: f64,
) {
    let d_theta = TAU / count as f64;
    for l in 0..count {
        let theta = l as f64 * d_theta;
        let (sin, cos) = theta.sin_cos();
        points.push(TractionPoint::new(
            basis.place(p, radius * cos, radius * sin, 0.0),
            basis.u0,
            area,
        ));
    }
}

fn ring(
    p: &Vector3<f64>,
    basis: &SurfaceBasis,
    n: usize,
    delta_a: f64,
    delta_b: f64,
) -> Result<Vec<TractionPoint>> {
    let width = (delta_b - delta_a) / n as f64;
    let mut annuli = Vec::with_capacity(n);
    let mut total = 0;
    for m in 0..n {
        let r1 = delta_a + m as f64 * width;
        let r2 = r1 + width;
        let radius = centroid_radius(r1, r2);
        let count = round_count(radius * TAU / width)?.max(MINIMUM_RING_POINTS);
        total = add_points(total, count)?;
        annuli.push((r1, r2, radius, count));
    }

    let mut points = Vec::with_capacity(total);
    for (r1, r2, radius, count) in annuli {
        let area = PI * (r2 * r2 - r1 * r1) / count as f64;
        push_circle(&mut points, p, basis, radius, count, area);
    }
    Ok(points)
}

/// Point count of a spot with `n` rings: `(3n^2 - 3n + 2) / 2`.
pub fn spot_point_qty(n: usize) -> usize {
    (3 * n * n - 3 * n + 2) / 2
}

fn spot(p: &Vector3<f64>, basis: &SurfaceBasis, n: usize, delta: f64) -> Result<Vec<TractionPoint>> {
    // Past this many rings the count overflows the table limit anyway.
    if n > 2 * MAXIMUM_TABLE_POINTS.isqrt() {
        return Err(too_many_points());
    }
    let qty = spot_point_qty(n);
    if qty > MAXIMUM_TABLE_POINTS {
        return Err(too_many_points());
    }
    let area = PI * delta * delta / qty as f64;
    // Outer radius of ring m encloses exactly the points of rings 0..=m.
    let boundary = |m: usize| -> f64 {
        if m + 1 == n {
            delta
        } else {
            (spot_point_qty(m + 1) as f64 / qty as f64).sqrt() * delta
        }
    };

    let mut points = Vec::with_capacity(qty);
    points.push(TractionPoint::new(*p, basis.u0, area));
    for m in 1..n {
        let radius = centroid_radius(boundary(m - 1), boundary(m));
        push_circle(&mut points, p, basis, radius, 3 * m, area);
    }
    Ok(points)
}

fn tube(
    p: &Vector3<f64>,
    basis: &SurfaceBasis,
    n: usize,
    delta_a: f64,
    delta_b: f64,
    h: f64,
) -> Result<Vec<TractionPoint>> {
    let band = h / n as f64;
    let taper = (delta_a - delta_b) / h;
    let gamma = taper.atan();
    let (sin_gamma, cos_gamma) = gamma.sin_cos();
    let slant = band / cos_gamma;

    let mut bands = Vec::with_capacity(n);
    let mut total = 0;
    for i in 0..n {
        let z = (i as f64 + 0.5) * band;
        let radius = delta_a - z * taper;
        let count = round_count(radius * TAU / band)?.max(MINIMUM_RING_POINTS);
        total = add_points(total, count)?;
        bands.push((z, radius, count));
    }

    let mut points = Vec::with_capacity(total);
    for (z, radius, count) in bands {
        let area = TAU * radius * slant / count as f64;
        let d_theta = TAU / count as f64;
        for j in 0..count {
            let (sin, cos) = (j as f64 * d_theta).sin_cos();
            let normal = basis.u1 * (cos_gamma * cos) + basis.u2 * (cos_gamma * sin) + basis.u0 * sin_gamma;
            points.push(TractionPoint::new(
                basis.place(p, radius * cos, radius * sin, z),
                normal,
                area,
            ));
        }
    }
    Ok(points)
}
