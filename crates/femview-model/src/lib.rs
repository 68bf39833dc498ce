//! Analysis model for the femview post-processor.
//!
//! Holds the state commands mutate ([`AnalysisState`]), the selection set,
//! the material and surface property tables, and the boundary to the mesh
//! database ([`MeshDb`]). A structured [`BlockMesh`] implements that boundary
//! without a results file.

pub mod block;
pub mod class;
pub mod error;
pub mod mesh;
pub mod property;
pub mod render;
pub mod selection;
pub mod shape;
pub mod state;

pub use block::{BRICK_CLASS, BlockMesh, BlockSpec, MATERIAL_CLASS, NODE_CLASS, SURFACE_CLASS};
pub use class::{MeshClass, Superclass};
pub use error::{ModelError, Result};
pub use mesh::{HexLocation, MeshDb, Stress, stress_matrix};
pub use property::{ColorProperty, PropertySnapshot, PropertyTable};
pub use render::{RedrawDirective, RenderMode};
pub use selection::{SelectionSet, SpecifiedObject};
pub use state::{
    AnalysisState, Axis, Conversion, DisplayFlag, InterpMode, MinMaxScope, ObjectFlags, Projection, RefFrame,
    RenderStyle, RenderSwitches, Shading, ShellSurface, StrainVariety, ViewCenter, ViewTransform,
};
