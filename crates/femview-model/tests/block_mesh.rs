//! Integration tests for the block mesh as a `MeshDb` and the state built
//! from it.

use femview_model::{
    AnalysisState, BRICK_CLASS, BlockMesh, BlockSpec, DisplayFlag, MeshDb, NODE_CLASS, RenderMode, Superclass,
    stress_matrix,
};
use nalgebra::Vector3;

fn spec_from_toml(text: &str) -> BlockSpec {
    toml::from_str(text).unwrap()
}

#[test]
fn test_partial_spec_keeps_defaults() {
    let spec = spec_from_toml(
        r#"
        dims = [2, 3, 4]
        materials = 4
        "#,
    );
    assert_eq!(spec.dims, [2, 3, 4]);
    assert_eq!(spec.materials, 4);
    assert_eq!(spec.states, BlockSpec::default().states);

    let mesh = BlockMesh::new(spec).unwrap();
    assert_eq!(mesh.brick_qty(), 24);
    assert_eq!(mesh.node_qty(), 3 * 4 * 5);
    assert_eq!(mesh.material_qty(), 4);
    // Materials beyond the stress table reuse its last entry.
    let top = mesh.brick_qty() - 1;
    assert_eq!(mesh.brick_stress(BRICK_CLASS, 0, top).unwrap()[2], -50.0);
}

#[test]
fn test_gradient_varies_stress_with_height() {
    let spec = spec_from_toml(
        r#"
        dims = [1, 1, 2]
        materials = 1
        stress = [[0.0, 0.0, -10.0, 0.0, 0.0, 0.0]]
        gradient = [0.0, 0.0, 4.0, 0.0, 0.0, 0.0]
        "#,
    );
    let mesh = BlockMesh::new(spec).unwrap();
    let lower = mesh.brick_stress(BRICK_CLASS, 0, 0).unwrap()[2];
    let upper = mesh.brick_stress(BRICK_CLASS, 0, 1).unwrap()[2];
    assert!((lower - (-10.0 - 2.0)).abs() < 1e-12);
    assert!((upper - (-10.0 + 2.0)).abs() < 1e-12);
}

#[test]
fn test_classes_resolve_by_superclass_keyword() {
    let mesh = BlockMesh::new(BlockSpec::default()).unwrap();
    let brick = mesh.resolve_class("h").unwrap();
    assert_eq!(brick.name(), BRICK_CLASS);
    assert_eq!(brick.superclass(), Superclass::Brick);
    assert_eq!(mesh.resolve_class("n").unwrap().name(), NODE_CLASS);
    assert!(mesh.resolve_class("beam").is_none());
}

#[test]
fn test_located_point_interpolates_corner_positions() {
    let mesh = BlockMesh::new(BlockSpec::default()).unwrap();
    let point = Vector3::new(0.1, -0.3, 0.7);
    let location = mesh.locate_point(BRICK_CLASS, &point).unwrap();
    let verts = mesh.brick_vertices(BRICK_CLASS, location.element).unwrap();
    let corners = verts.map(|v| [v.x, v.y, v.z]);
    let back = femview_model::shape::interpolate_hex(&corners, &location.rst);
    assert!((Vector3::from(back) - point).norm() < 1e-9);
}

#[test]
fn test_traction_vector_from_uniaxial_stress() {
    let mesh = BlockMesh::new(BlockSpec::default()).unwrap();
    let stress = mesh.brick_stress(BRICK_CLASS, 0, 0).unwrap();
    let t = stress_matrix(&stress) * Vector3::z();
    assert_eq!(t, Vector3::new(0.0, 0.0, -100.0));
}

#[test]
fn test_state_for_mesh_matches_database() {
    let mesh = BlockMesh::new(BlockSpec::default()).unwrap();
    let state = AnalysisState::for_mesh(&mesh);
    assert_eq!(state.material_qty(), 2);
    assert_eq!(state.surface_qty(), mesh.surface_qty());
    assert_eq!(state.state_qty, 3);
    assert_eq!(state.render_mode, RenderMode::Mesh);
    for flag in DisplayFlag::ALL_GROUP {
        assert!(state.flag(flag), "{flag} should start on");
    }
    assert!(!state.flag(DisplayFlag::Edges));
}
