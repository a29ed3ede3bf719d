use hedge_mesh::DebugInvariants;
use hedge_mesh::builder::MeshBuilder;
use hedge_mesh::mesh::Mesh;
use hedge_mesh::mesh_error::MeshError;
use hedge_mesh::topology::handle::{EdgeHandle, FaceHandle, VertexHandle};
use hedge_mesh::topology::validation::ValidationOptions;

fn two_triangles() -> (Mesh, FaceHandle, FaceHandle) {
    let mut mesh = Mesh::new();
    let mut builder = MeshBuilder::new(&mut mesh);
    let a = builder.add_triangle_at([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let shared = builder.mesh().face(a).root_edge().next().handle();
    let b = builder.extend_edge_at(shared, [1.0, -1.0, 0.0]);
    (mesh, a, b)
}

#[test]
fn built_meshes_validate() {
    let (mesh, a, b) = two_triangles();
    assert!(a.is_valid() && b.is_valid());
    assert_eq!(mesh.validate_invariants(), Ok(()));
    mesh.debug_assert_invariants();
}

#[test]
fn vertex_pointing_at_foreign_edge_is_reported() {
    let (mut mesh, a, b) = two_triangles();
    let v = mesh.face(a).root_edge().vertex().handle();
    let foreign = mesh.face(b).root_edge().handle();
    mesh.kernel_mut().vertex_mut(v).unwrap().edge = foreign;
    assert_eq!(
        mesh.validate_invariants(),
        Err(MeshError::VertexEdgeMismatch {
            vertex: v.offset(),
            edge: foreign.offset(),
        })
    );
    let mut opts = ValidationOptions::all();
    opts.check_vertex_edges = false;
    assert!(mesh.validate_with(opts).is_ok());
}

#[test]
fn face_with_extra_edge_in_its_set_is_reported() {
    let (mut mesh, a, b) = two_triangles();
    let stray = mesh.face(b).root_edge().next().handle();
    mesh.kernel_mut().face_mut(a).unwrap().edges.insert(stray);
    assert_eq!(
        mesh.validate_invariants(),
        Err(MeshError::FaceLoopLength {
            face: a.offset(),
            expected: 4,
            found: 3,
        })
    );
}

#[test]
fn face_with_dangling_root_is_reported() {
    let (mut mesh, a, _) = two_triangles();
    mesh.kernel_mut().face_mut(a).unwrap().root_edge = EdgeHandle::new(999);
    assert_eq!(
        mesh.validate_invariants(),
        Err(MeshError::FaceRootMissing { face: a.offset() })
    );
}

#[test]
fn stale_back_reference_is_reported() {
    let (mut mesh, a, _) = two_triangles();
    let point = mesh.face(a).root_edge().vertex().point().handle();
    mesh.kernel_mut()
        .point_mut(point)
        .unwrap()
        .vertices
        .insert(VertexHandle::with_generation(77, 1));
    assert_eq!(
        mesh.validate_invariants(),
        Err(MeshError::PointVertexStale {
            point: point.offset(),
            vertex: 77,
        })
    );
}

#[test]
fn only_selected_checks_run() {
    let (mut mesh, a, _) = two_triangles();
    mesh.kernel_mut().face_mut(a).unwrap().root_edge = EdgeHandle::new(999);
    let twins_only = ValidationOptions {
        check_twins: true,
        ..ValidationOptions::none()
    };
    assert!(mesh.validate_with(twins_only).is_ok());
}
