//! Traction force engine.
//!
//! A surface command fills a [`SurfaceParams`] table. The generators in
//! [`generate`] turn it into weighted sample points, [`integrate`] locates
//! the points in the mesh and integrates `sigma . n dA`, and [`auto`] refines
//! the sampling density until the located area stops changing.

pub mod auto;
pub mod error;
pub mod generate;
pub mod integrate;
pub mod poly;
pub mod report;
pub mod surface;

pub use auto::{AutoN, auto_compute_n};
pub use error::{Result, TractionError};
pub use generate::{SampledSurface, TractionPoint, from_poly, generate, spot_point_qty};
pub use integrate::{MaterialSet, TRACTION_CLASS, TractionResultants, hex_to_nodal, locate_points, traction, traction_area};
pub use poly::{PolySurface, parse_poly, read_poly_file};
pub use report::{auto_n_report, format_g, surface_report};
pub use surface::{MAXIMUM_SURFACE_POINTS, SurfaceBasis, SurfaceParams, SurfaceShape};
