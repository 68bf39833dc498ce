//! Boundary to the mesh database.
//!
//! The interpreter and the traction engine never own mesh storage. They see
//! the database through [`MeshDb`], which mirrors the services a results
//! reader exposes: class lookup, label indirection, state times, brick
//! topology and element-centered stress.

use nalgebra::{Matrix3, Vector3};

use crate::class::{MeshClass, Superclass};
use crate::shape::{HexInversion, pt_in_hex, pt_in_hex_bbox};

/// Symmetric stress tensor stored as `[sxx, syy, szz, sxy, syz, szx]`.
pub type Stress = [f64; 6];

/// Expand a packed stress into its full 3x3 matrix.
pub fn stress_matrix(s: &Stress) -> Matrix3<f64> {
    Matrix3::new(
        s[0], s[3], s[5], //
        s[3], s[1], s[4], //
        s[5], s[4], s[2],
    )
}

/// Brick containing a point, with the point's element-centered coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLocation {
    pub element: usize,
    pub rst: Vector3<f64>,
}

/// Read-only services of a loaded mesh database.
pub trait MeshDb {
    /// Every mesh object class, in database order.
    fn classes(&self) -> &[MeshClass];

    /// Look up a class by its exact short name.
    fn class(&self, name: &str) -> Option<&MeshClass> {
        self.classes().iter().find(|c| c.name() == name)
    }

    /// Look up a class by name, falling back to the first class of a
    /// superclass keyword such as `h` or `brick`.
    fn resolve_class(&self, word: &str) -> Option<&MeshClass> {
        self.class(word).or_else(|| {
            let superclass = Superclass::from_keyword(word)?;
            self.classes().iter().find(|c| c.superclass() == superclass)
        })
    }

    fn material_qty(&self) -> usize;

    fn surface_qty(&self) -> usize;

    fn state_qty(&self) -> usize;

    fn state_time(&self, state: usize) -> Option<f64>;

    /// Names accepted by `show` and `plot`.
    fn result_names(&self) -> &[String];

    fn node_position(&self, node: usize) -> Option<Vector3<f64>>;

    fn node_qty(&self) -> usize;

    /// Corner nodes of a brick in shape-function order.
    fn brick_nodes(&self, class: &str, element: usize) -> Option<[usize; 8]>;

    /// 0-based material of a brick.
    fn brick_material(&self, class: &str, element: usize) -> Option<usize>;

    /// Element-centered stress of a brick at a state.
    fn brick_stress(&self, class: &str, state: usize, element: usize) -> Option<Stress>;

    /// Corner coordinates of a brick.
    fn brick_vertices(&self, class: &str, element: usize) -> Option<[Vector3<f64>; 8]> {
        let nodes = self.brick_nodes(class, element)?;
        let mut verts = [Vector3::zeros(); 8];
        for (vert, node) in verts.iter_mut().zip(nodes) {
            *vert = self.node_position(node)?;
        }
        Some(verts)
    }

    /// Find the brick of `class` containing `point`.
    ///
    /// The default walks every element, rejecting on the bounding box before
    /// inverting the trilinear map. Databases with spatial structure should
    /// override it.
    fn locate_point(&self, class: &str, point: &Vector3<f64>) -> Option<HexLocation> {
        let qty = self.class(class)?.qty();
        for element in 0..qty {
            let Some(verts) = self.brick_vertices(class, element) else {
                continue;
            };
            if !pt_in_hex_bbox(&verts, point) {
                continue;
            }
            match pt_in_hex(&verts, point) {
                HexInversion::Inside(rst) => return Some(HexLocation { element, rst }),
                HexInversion::Singular => {
                    tracing::warn!(class, element, "singular element skipped during point location");
                }
                HexInversion::Outside(_) => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_matrix_is_symmetric() {
        let m = stress_matrix(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m, m.transpose());
        assert_eq!(m[(0, 1)], 4.0);
        assert_eq!(m[(1, 2)], 5.0);
        assert_eq!(m[(2, 0)], 6.0);
    }
}
