//! Structured hexahedral block mesh.
//!
//! A box of `nx * ny * nz` bricks with materials layered along z and a stress
//! field that is piecewise constant per material, optionally with a linear
//! gradient in z, and scaled by state time. The CLI and the test suites run the
//! interpreter against it when no results database is attached.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::class::{MeshClass, Superclass};
use crate::error::{ModelError, Result};
use crate::mesh::{HexLocation, MeshDb, Stress};
use crate::shape::{HexInversion, pt_in_hex};

pub const BRICK_CLASS: &str = "brick";
pub const NODE_CLASS: &str = "node";
pub const SURFACE_CLASS: &str = "surface";
pub const MATERIAL_CLASS: &str = "mat";

const RESULT_NAMES: [&str; 6] = ["sx", "sy", "sz", "sxy", "syz", "szx"];

/// Serializable description of a block mesh, usually read from `[mesh]` in
/// the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSpec {
    /// Brick counts along x, y and z.
    pub dims: [usize; 3],
    pub origin: [f64; 3],
    /// Edge lengths of the whole block.
    pub extent: [f64; 3],
    /// Number of material layers stacked along z.
    pub materials: usize,
    pub states: usize,
    pub time_step: f64,
    /// Stress per material at unit time. Materials past the end reuse the
    /// last entry.
    pub stress: Vec<Stress>,
    /// Stress added per unit of brick-centroid z.
    pub gradient: Option<Stress>,
    /// Offset added to brick labels; `None` keeps identity labels.
    pub brick_label_offset: Option<i64>,
}

impl Default for BlockSpec {
    fn default() -> Self {
        Self {
            dims: [4, 4, 4],
            origin: [-1.0, -1.0, -1.0],
            extent: [2.0, 2.0, 2.0],
            materials: 2,
            states: 3,
            time_step: 1.0,
            stress: vec![[0.0, 0.0, -100.0, 0.0, 0.0, 0.0], [0.0, 0.0, -50.0, 0.0, 0.0, 0.0]],
            gradient: None,
            brick_label_offset: None,
        }
    }
}

/// In-memory structured brick mesh implementing [`MeshDb`].
#[derive(Debug, Clone)]
pub struct BlockMesh {
    spec: BlockSpec,
    spacing: Vector3<f64>,
    classes: Vec<MeshClass>,
    nodes: Vec<Vector3<f64>>,
    bricks: Vec<[usize; 8]>,
    brick_materials: Vec<usize>,
    state_times: Vec<f64>,
    result_names: Vec<String>,
}

impl BlockMesh {
    pub fn new(spec: BlockSpec) -> Result<Self> {
        let [nx, ny, nz] = spec.dims;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(ModelError::InvalidBlock("dims must all be positive".to_string()));
        }
        if spec.extent.iter().any(|&e| e <= 0.0 || !e.is_finite()) {
            return Err(ModelError::InvalidBlock("extent must be positive".to_string()));
        }
        if spec.materials == 0 || spec.materials > nz {
            return Err(ModelError::InvalidBlock(format!(
                "materials must lie in 1..={nz} (one layer per brick row at most)"
            )));
        }
        if spec.states == 0 {
            return Err(ModelError::InvalidBlock("at least one state is required".to_string()));
        }
        if spec.stress.is_empty() {
            return Err(ModelError::InvalidBlock("at least one stress tensor is required".to_string()));
        }

        let spacing = Vector3::new(
            spec.extent[0] / nx as f64,
            spec.extent[1] / ny as f64,
            spec.extent[2] / nz as f64,
        );
        let origin = Vector3::from(spec.origin);

        let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1) * (nz + 1));
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    nodes.push(origin + Vector3::new(i as f64, j as f64, k as f64).component_mul(&spacing));
                }
            }
        }

        let node_id = |i: usize, j: usize, k: usize| i + (nx + 1) * (j + (ny + 1) * k);
        let mut bricks = Vec::with_capacity(nx * ny * nz);
        let mut brick_materials = Vec::with_capacity(nx * ny * nz);
        for k in 0..nz {
            let material = k * spec.materials / nz;
            for j in 0..ny {
                for i in 0..nx {
                    bricks.push([
                        node_id(i, j, k),
                        node_id(i + 1, j, k),
                        node_id(i + 1, j + 1, k),
                        node_id(i, j + 1, k),
                        node_id(i, j, k + 1),
                        node_id(i + 1, j, k + 1),
                        node_id(i + 1, j + 1, k + 1),
                        node_id(i, j + 1, k + 1),
                    ]);
                    brick_materials.push(material);
                }
            }
        }

        let surface_facets = 2 * (nx * ny + ny * nz + nx * nz);
        let mut brick_class = MeshClass::new(BRICK_CLASS, "Bricks", Superclass::Brick, bricks.len());
        if let Some(offset) = spec.brick_label_offset {
            let labels = (0..bricks.len()).map(|i| offset + i as i64 + 1).collect();
            brick_class = brick_class.with_labels(labels)?;
        }
        let classes = vec![
            MeshClass::new(NODE_CLASS, "Nodes", Superclass::Node, nodes.len()),
            brick_class,
            MeshClass::new(SURFACE_CLASS, "Surface facets", Superclass::Surface, surface_facets),
            MeshClass::new(MATERIAL_CLASS, "Materials", Superclass::Material, spec.materials),
        ];

        let state_times = (1..=spec.states).map(|i| i as f64 * spec.time_step).collect();

        tracing::debug!(
            bricks = bricks.len(),
            nodes = nodes.len(),
            materials = spec.materials,
            "built block mesh"
        );

        Ok(Self {
            spec,
            spacing,
            classes,
            nodes,
            bricks,
            brick_materials,
            state_times,
            result_names: RESULT_NAMES.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    pub fn spec(&self) -> &BlockSpec {
        &self.spec
    }

    pub fn brick_qty(&self) -> usize {
        self.bricks.len()
    }

    fn brick_centroid_z(&self, element: usize) -> Option<f64> {
        let nodes = self.bricks.get(element)?;
        Some(nodes.iter().map(|&n| self.nodes[n][2]).sum::<f64>() / 8.0)
    }

    fn cell_of(&self, point: &Vector3<f64>) -> Option<[usize; 3]> {
        const SLOP: f64 = 1.0e-9;
        let mut cell = [0usize; 3];
        for axis in 0..3 {
            let n = self.spec.dims[axis];
            let f = (point[axis] - self.spec.origin[axis]) / self.spacing[axis];
            if !(-SLOP..=n as f64 + SLOP).contains(&f) {
                return None;
            }
            cell[axis] = (f.max(0.0).floor() as usize).min(n - 1);
        }
        Some(cell)
    }
}

impl MeshDb for BlockMesh {
    fn classes(&self) -> &[MeshClass] {
        &self.classes
    }

    fn material_qty(&self) -> usize {
        self.spec.materials
    }

    // One surface per block face.
    fn surface_qty(&self) -> usize {
        6
    }

    fn state_qty(&self) -> usize {
        self.state_times.len()
    }

    fn state_time(&self, state: usize) -> Option<f64> {
        self.state_times.get(state).copied()
    }

    fn result_names(&self) -> &[String] {
        &self.result_names
    }

    fn node_position(&self, node: usize) -> Option<Vector3<f64>> {
        self.nodes.get(node).copied()
    }

    fn node_qty(&self) -> usize {
        self.nodes.len()
    }

    fn brick_nodes(&self, class: &str, element: usize) -> Option<[usize; 8]> {
        if class != BRICK_CLASS {
            return None;
        }
        self.bricks.get(element).copied()
    }

    fn brick_material(&self, class: &str, element: usize) -> Option<usize> {
        if class != BRICK_CLASS {
            return None;
        }
        self.brick_materials.get(element).copied()
    }

    fn brick_stress(&self, class: &str, state: usize, element: usize) -> Option<Stress> {
        let material = self.brick_material(class, element)?;
        let time = self.state_time(state)?;
        let base = self.spec.stress.get(material).or_else(|| self.spec.stress.last())?;
        let mut stress = base.map(|s| s * time);
        if let Some(gradient) = &self.spec.gradient {
            let z = self.brick_centroid_z(element)?;
            for (s, g) in stress.iter_mut().zip(gradient.iter()) {
                *s += g * z * time;
            }
        }
        Some(stress)
    }

    fn locate_point(&self, class: &str, point: &Vector3<f64>) -> Option<HexLocation> {
        if class != BRICK_CLASS {
            return None;
        }
        let [i, j, k] = self.cell_of(point)?;
        let [nx, ny, _] = self.spec.dims;
        let element = i + nx * (j + ny * k);
        let verts = self.brick_vertices(class, element)?;
        match pt_in_hex(&verts, point) {
            HexInversion::Inside(rst) => Some(HexLocation { element, rst }),
            HexInversion::Outside(_) | HexInversion::Singular => None,
        }
    }
}
