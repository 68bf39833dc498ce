//! Element location and traction force integration.

use femview_model::{InterpMode, MeshDb, Stress, Superclass, shape::interpolate_hex, stress_matrix};
use nalgebra::Vector3;

use crate::error::{Result, TractionError};
use crate::generate::{SampledSurface, TractionPoint};

/// Class name searched for the bricks a surface cuts through.
pub const TRACTION_CLASS: &str = "brick";

/// Bit-per-material set of materials taking part in integration (0-based).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialSet {
    bits: Vec<bool>,
}

impl MaterialSet {
    pub fn new(qty: usize) -> Self {
        Self { bits: vec![false; qty] }
    }

    pub fn all(qty: usize) -> Self {
        Self { bits: vec![true; qty] }
    }

    /// Add a material. Returns `false` when it is out of range.
    pub fn insert(&mut self, material: usize) -> bool {
        match self.bits.get_mut(material) {
            Some(bit) => {
                *bit = true;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, material: usize) -> bool {
        self.bits.get(material).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// 1-based material numbers, for reporting.
    pub fn labels(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(i + 1))
            .collect()
    }
}

fn brick_class<'a>(db: &'a dyn MeshDb) -> Result<&'a str> {
    match db.resolve_class(TRACTION_CLASS) {
        Some(class) if class.superclass() == Superclass::Brick => Ok(class.name()),
        _ => Err(TractionError::InvalidClass(TRACTION_CLASS.to_string())),
    }
}

/// Locate every sample point and null out those outside an eligible brick.
///
/// Returns the number of points left valid.
pub fn locate_points(db: &dyn MeshDb, points: &mut [TractionPoint], materials: &MaterialSet) -> Result<usize> {
    let class = brick_class(db)?;
    let mut valid = 0;
    for point in points.iter_mut() {
        point.element = None;
        let Some(location) = db.locate_point(class, &point.point) else {
            continue;
        };
        let eligible = db
            .brick_material(class, location.element)
            .is_some_and(|m| materials.contains(m));
        if eligible {
            point.element = Some(location.element);
            point.rst = location.rst;
            valid += 1;
        }
    }
    Ok(valid)
}

/// Area of the sample points lying in bricks of the selected materials.
pub fn traction_area(db: &dyn MeshDb, points: &mut [TractionPoint], materials: &MaterialSet) -> Result<f64> {
    locate_points(db, points, materials)?;
    Ok(points.iter().filter(|p| p.element.is_some()).map(|p| p.area).sum())
}

/// Average element-centered stress onto nodes over the incident bricks.
pub fn hex_to_nodal(db: &dyn MeshDb, class: &str, state: usize) -> Vec<Stress> {
    let mut sums = vec![[0.0; 6]; db.node_qty()];
    let mut counts = vec![0u32; db.node_qty()];
    let qty = db.class(class).map_or(0, |c| c.qty());
    for element in 0..qty {
        let (Some(nodes), Some(stress)) = (db.brick_nodes(class, element), db.brick_stress(class, state, element))
        else {
            continue;
        };
        for node in nodes {
            if let (Some(sum), Some(count)) = (sums.get_mut(node), counts.get_mut(node)) {
                for (s, v) in sum.iter_mut().zip(stress.iter()) {
                    *s += v;
                }
                *count += 1;
            }
        }
    }
    for (sum, &count) in sums.iter_mut().zip(counts.iter()) {
        if count > 0 {
            for s in sum.iter_mut() {
                *s /= f64::from(count);
            }
        }
    }
    sums
}

/// Force and moment resultants of one traction integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TractionResultants {
    /// Area of the points that contributed.
    pub area: f64,
    pub points_used: usize,
    /// Total force in the global frame.
    pub force: Vector3<f64>,
    /// Force in the surface frame `(u0, u1, u2)`.
    pub force_local: Vector3<f64>,
    /// Moment about the global origin.
    pub moment: Vector3<f64>,
    /// Moment about the surface reference point, in the surface frame.
    pub moment_local: Vector3<f64>,
}

/// Integrate `sigma . n dA` over a located surface.
///
/// Points are re-located against `materials` first; if none remain valid the
/// integration is abandoned with [`TractionError::NoValidPoints`].
pub fn traction(
    db: &dyn MeshDb,
    surface: &mut SampledSurface,
    materials: &MaterialSet,
    state: usize,
    interp: InterpMode,
) -> Result<TractionResultants> {
    let class = brick_class(db)?;
    let valid = locate_points(db, &mut surface.points, materials)?;
    if valid == 0 {
        return Err(TractionError::NoValidPoints);
    }

    let nodal = interp.is_nodal().then(|| hex_to_nodal(db, class, state));

    let p = surface.params.p;
    let mut area = 0.0;
    let mut force = Vector3::zeros();
    let mut moment = Vector3::zeros();
    let mut moment_p = Vector3::zeros();
    let mut used = 0;

    for point in &surface.points {
        let Some(element) = point.element else {
            continue;
        };
        let stress = match &nodal {
            Some(nodal) => {
                let Some(nodes) = db.brick_nodes(class, element) else {
                    continue;
                };
                let corner_stress = nodes.map(|n| nodal.get(n).copied().unwrap_or([0.0; 6]));
                interpolate_hex(&corner_stress, &point.rst)
            }
            None => match db.brick_stress(class, state, element) {
                Some(stress) => stress,
                None => continue,
            },
        };

        let f_hat = stress_matrix(&stress) * point.normal * point.area;
        force += f_hat;
        moment += point.point.cross(&f_hat);
        moment_p += (point.point - p).cross(&f_hat);
        area += point.area;
        used += 1;
    }

    tracing::info!(points = used, area, "traction integrated");

    Ok(TractionResultants {
        area,
        points_used: used,
        force,
        force_local: surface.basis.project(&force),
        moment,
        moment_local: surface.basis.project(&moment_p),
    })
}
