//! The surface parameter table and the local surface basis.

use std::fmt;
use std::path::PathBuf;

use nalgebra::Vector3;

use crate::error::{Result, TractionError};

/// Upper bound on the density parameter `n` of an explicit surface command.
pub const MAXIMUM_SURFACE_POINTS: usize = 333;

const NEAR_ZERO: f64 = 1.0e-12;

fn is_positive(x: f64) -> bool {
    x > 0.0
}

/// Shape-specific parameters of a sampling surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceShape {
    /// `a` by `b` rectangle centered on `p`, `a` along u1.
    Rect { a: f64, b: f64 },
    /// Flat annulus between two radii.
    Ring { delta_a: f64, delta_b: f64 },
    /// Filled disk.
    Spot { delta: f64 },
    /// Cylinder or cone wall, radius `delta_a` at `p` and `delta_b` at `p + h*u0`.
    Tube { delta_a: f64, delta_b: f64, h: f64 },
    /// Explicit points read from a file.
    Poly { path: PathBuf },
}

impl SurfaceShape {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Ring { .. } => "ring",
            Self::Spot { .. } => "spot",
            Self::Tube { .. } => "tube",
            Self::Poly { .. } => "poly",
        }
    }

    /// Check the geometric constraints of the shape.
    pub fn validate(&self) -> Result<()> {
        let fail = |parameter, constraint| Err(TractionError::InvalidParameter { parameter, constraint });
        match *self {
            Self::Rect { a, b } => {
                if !is_positive(a) {
                    return fail("a", "> 0");
                }
                if !is_positive(b) {
                    return fail("b", "> 0");
                }
            }
            Self::Ring { delta_a, delta_b } => {
                if !is_positive(delta_a) {
                    return fail("delta_a", "> 0");
                }
                if !is_positive(delta_b) {
                    return fail("delta_b", "> 0");
                }
                if !is_positive(delta_b - delta_a) {
                    return fail("delta_b", "> delta_a");
                }
            }
            Self::Spot { delta } => {
                if !is_positive(delta) {
                    return fail("delta", "> 0");
                }
            }
            Self::Tube { delta_a, delta_b, h } => {
                if !is_positive(delta_a) {
                    return fail("delta_a", "> 0");
                }
                if !is_positive(h) {
                    return fail("h", "> 0");
                }
                if delta_b.is_nan() || delta_b < 0.0 {
                    return fail("delta_b", ">= 0");
                }
            }
            Self::Poly { .. } => {}
        }
        Ok(())
    }

    /// Exact area of the shape; `None` for poly surfaces.
    pub fn analytic_area(&self) -> Option<f64> {
        use std::f64::consts::PI;
        match *self {
            Self::Rect { a, b } => Some(a * b),
            Self::Ring { delta_a, delta_b } => Some(PI * (delta_b * delta_b - delta_a * delta_a)),
            Self::Spot { delta } => Some(PI * delta * delta),
            Self::Tube { delta_a, delta_b, h } => {
                let slant = (h * h + (delta_a - delta_b).powi(2)).sqrt();
                Some(PI * (delta_a + delta_b) * slant)
            }
            Self::Poly { .. } => None,
        }
    }
}

/// The surface parameter table: one per session.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceParams {
    pub shape: SurfaceShape,
    /// Reference point; moments `Mp` are taken about it.
    pub p: Vector3<f64>,
    /// Surface normal direction (axis for tubes).
    pub v: Vector3<f64>,
    /// Density parameter; 0 requests automatic refinement.
    pub n: usize,
}

impl SurfaceParams {
    /// Build a parameter table, clamping `n` to [`MAXIMUM_SURFACE_POINTS`].
    pub fn new(shape: SurfaceShape, p: Vector3<f64>, v: Vector3<f64>, n: usize) -> Result<Self> {
        shape.validate()?;
        if v.norm() <= NEAR_ZERO && !matches!(shape, SurfaceShape::Poly { .. }) {
            return Err(TractionError::ZeroDirection);
        }
        Ok(Self {
            shape,
            p,
            v,
            n: n.min(MAXIMUM_SURFACE_POINTS),
        })
    }

    pub fn is_auto(&self) -> bool {
        self.n == 0
    }
}

impl fmt::Display for SurfaceParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} n={} p=({}, {}, {}) v=({}, {}, {})",
            self.shape.keyword(),
            self.n,
            self.p.x,
            self.p.y,
            self.p.z,
            self.v.x,
            self.v.y,
            self.v.z
        )?;
        match &self.shape {
            SurfaceShape::Rect { a, b } => write!(f, " a={a} b={b}"),
            SurfaceShape::Ring { delta_a, delta_b } => write!(f, " delta_a={delta_a} delta_b={delta_b}"),
            SurfaceShape::Spot { delta } => write!(f, " delta={delta}"),
            SurfaceShape::Tube { delta_a, delta_b, h } => {
                write!(f, " delta_a={delta_a} h={h} delta_b={delta_b}")
            }
            SurfaceShape::Poly { path } => write!(f, " file={}", path.display()),
        }
    }
}

/// Orthonormal surface frame: `u0` along the normal, `u1` and `u2` in plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBasis {
    pub u0: Vector3<f64>,
    pub u1: Vector3<f64>,
    pub u2: Vector3<f64>,
}

impl SurfaceBasis {
    /// Derive the frame from a direction vector.
    ///
    /// `u1` is built perpendicular to `u0` in the plane of the two smaller
    /// components' axes, chosen from the dominant component of `u0`, and
    /// `u2 = u0 x u1`.
    pub fn from_direction(v: &Vector3<f64>) -> Result<Self> {
        let magnitude = v.norm();
        if magnitude <= NEAR_ZERO {
            return Err(TractionError::ZeroDirection);
        }
        let u0 = v / magnitude;
        let (x, y, z) = (u0.x, u0.y, u0.z);
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

        let raw_u1 = if ax >= ay && ax >= az {
            if az <= NEAR_ZERO {
                Vector3::z()
            } else {
                Vector3::new(0.0, 1.0, -y / z)
            }
        } else if ay >= ax && ay >= az {
            if az <= NEAR_ZERO {
                Vector3::z()
            } else {
                Vector3::new(1.0, 0.0, -x / z)
            }
        } else if ay <= NEAR_ZERO {
            Vector3::y()
        } else {
            Vector3::new(1.0, -x / y, 0.0)
        };
        let u1 = raw_u1.normalize();
        let u2 = u0.cross(&u1);
        Ok(Self { u0, u1, u2 })
    }

    /// Components of a global vector in the surface frame.
    pub fn project(&self, w: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(self.u0.dot(w), self.u1.dot(w), self.u2.dot(w))
    }

    /// Global position of local offsets `(x, y, z)` along `(u1, u2, u0)`.
    pub fn place(&self, p: &Vector3<f64>, x: f64, y: f64, z: f64) -> Vector3<f64> {
        p + self.u1 * x + self.u2 * y + self.u0 * z
    }
}
