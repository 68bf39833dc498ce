//! Trilinear hexahedron shape functions and point inversion.
//!
//! Corner ordering follows the usual brick convention: corners 0..4 lie on
//! the `t = -1` face counter-clockwise from `(-1,-1)`, corners 4..8 repeat the
//! pattern on `t = +1`.

use nalgebra::{Matrix3, Vector3};

/// Newton iteration tolerance on each natural coordinate.
pub const INVERSION_TOLERANCE: f64 = 1.0e-5;

/// Maximum Newton steps when inverting the trilinear map.
pub const INVERSION_MAX_ITERATIONS: usize = 20;

/// Natural coordinates within this bound count as inside the element.
pub const INCLUSION_BOUND: f64 = 1.0001;

const CORNER_SIGNS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Evaluate the eight shape functions at `(r, s, t)`.
pub fn shape_fns_hex(r: f64, s: f64, t: f64) -> [f64; 8] {
    let mut h = [0.0; 8];
    for (value, sign) in h.iter_mut().zip(CORNER_SIGNS.iter()) {
        *value = 0.125 * (1.0 + sign[0] * r) * (1.0 + sign[1] * s) * (1.0 + sign[2] * t);
    }
    h
}

/// Partial derivatives of the shape functions, one row per natural axis.
pub fn shape_derivs_hex(r: f64, s: f64, t: f64) -> [[f64; 8]; 3] {
    let mut d = [[0.0; 8]; 3];
    for (i, sign) in CORNER_SIGNS.iter().enumerate() {
        let fr = 1.0 + sign[0] * r;
        let fs = 1.0 + sign[1] * s;
        let ft = 1.0 + sign[2] * t;
        d[0][i] = 0.125 * sign[0] * fs * ft;
        d[1][i] = 0.125 * sign[1] * fr * ft;
        d[2][i] = 0.125 * sign[2] * fr * fs;
    }
    d
}

/// Jacobian of the trilinear map, `jac[(row, col)] = d x_row / d xi_col`.
pub fn hex_jacobian(verts: &[Vector3<f64>; 8], derivs: &[[f64; 8]; 3]) -> Matrix3<f64> {
    let mut jac = Matrix3::zeros();
    for (i, vert) in verts.iter().enumerate() {
        for col in 0..3 {
            for row in 0..3 {
                jac[(row, col)] += vert[row] * derivs[col][i];
            }
        }
    }
    jac
}

/// Axis-aligned bounding box test used to skip the Newton solve.
pub fn pt_in_hex_bbox(verts: &[Vector3<f64>; 8], pt: &Vector3<f64>) -> bool {
    (0..3).all(|axis| {
        let (lo, hi) = verts.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v[axis]), hi.max(v[axis]))
        });
        pt[axis] >= lo && pt[axis] <= hi
    })
}

/// Outcome of inverting the trilinear map for one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HexInversion {
    /// The point lies inside; coordinates are clamped to `[-1, 1]`.
    Inside(Vector3<f64>),
    /// The iteration converged (or stopped) outside the element.
    Outside(Vector3<f64>),
    /// The Jacobian could not be inverted.
    Singular,
}

/// Compute the element-centered coordinates of `pt` inside a brick.
///
/// Newton iteration from the element center, stopping once every coordinate
/// update falls below [`INVERSION_TOLERANCE`] or after
/// [`INVERSION_MAX_ITERATIONS`] steps.
pub fn pt_in_hex(verts: &[Vector3<f64>; 8], pt: &Vector3<f64>) -> HexInversion {
    let mut xi = Vector3::zeros();
    for _ in 0..=INVERSION_MAX_ITERATIONS {
        let n = shape_fns_hex(xi[0], xi[1], xi[2]);
        let mapped = verts
            .iter()
            .zip(n.iter())
            .fold(Vector3::zeros(), |acc, (v, &w)| acc + v * w);
        let residual = pt - mapped;

        let jac = hex_jacobian(verts, &shape_derivs_hex(xi[0], xi[1], xi[2]));
        let Some(inv) = jac.try_inverse() else {
            return HexInversion::Singular;
        };
        let delta = inv * residual;
        xi += delta;

        if delta.iter().all(|d| d.abs() < INVERSION_TOLERANCE) {
            break;
        }
    }

    if xi.iter().all(|c| c.abs() <= INCLUSION_BOUND) {
        HexInversion::Inside(xi.map(|c| c.clamp(-1.0, 1.0)))
    } else {
        HexInversion::Outside(xi)
    }
}

/// Blend eight corner values with the shape functions at `rst`.
pub fn interpolate_hex<const N: usize>(corner_values: &[[f64; N]; 8], rst: &Vector3<f64>) -> [f64; N] {
    let h = shape_fns_hex(rst[0], rst[1], rst[2]);
    let mut out = [0.0; N];
    for (weight, values) in h.iter().zip(corner_values.iter()) {
        for (o, v) in out.iter_mut().zip(values.iter()) {
            *o += weight * v;
        }
    }
    out
}
