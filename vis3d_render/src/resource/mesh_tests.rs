/// Tests for Mesh resource
///
/// Validation rules applied before any data reaches the graphics device.

use super::*;

fn triangle() -> Mesh {
    Mesh::new("triangle")
        .with_vertices(vec![
            0.0, 0.0, 0.0, 1.0,
            1.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 1.0,
        ])
        .with_normals(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
        .with_faces(vec![0, 1, 2])
}

#[test]
fn test_new_mesh_is_unbound() {
    let mesh = Mesh::new("empty");
    assert_eq!(mesh.name, "empty");
    assert!(!mesh.is_bound());
    assert!(mesh.handle().is_none());
    assert_eq!(mesh.vertex_count(), 0);
}

#[test]
fn test_valid_triangle() {
    let mesh = triangle();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.size_bytes(), (12 + 9) * 4 + 3 * 2);
    assert_eq!(mesh.validate(ResourceKind::Mesh), Ok(()));
}

#[test]
fn test_empty_vertices_rejected() {
    let mesh = Mesh::new("empty").with_faces(vec![0, 1, 2]);
    assert_eq!(mesh.validate(ResourceKind::Mesh), Err("no vertex data".to_string()));
}

#[test]
fn test_partial_vertex_rejected() {
    let mut mesh = triangle();
    mesh.vertices.push(1.0);
    assert!(mesh.validate(ResourceKind::Mesh).unwrap_err().contains("multiple of 4"));
}

#[test]
fn test_normal_count_mismatch_rejected() {
    let mut mesh = triangle();
    mesh.normals.truncate(6);
    assert!(mesh.validate(ResourceKind::Mesh).unwrap_err().contains("normal"));
}

#[test]
fn test_glyphs_ignore_normals_but_need_tex_coords() {
    let mut mesh = triangle();
    mesh.normals.clear();
    mesh.normals.push(0.0);
    assert!(mesh.validate(ResourceKind::Glyphs).unwrap_err().contains("texture coordinates"));

    mesh.tex_coords = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    assert_eq!(mesh.validate(ResourceKind::Glyphs), Ok(()));
}

#[test]
fn test_tex_coord_count_mismatch_rejected() {
    let mesh = triangle().with_tex_coords(vec![0.0, 0.0]);
    assert!(mesh.validate(ResourceKind::Mesh).unwrap_err().contains("texture coordinate"));
}

#[test]
fn test_faces_must_form_triangles() {
    let mesh = triangle().with_faces(vec![0, 1]);
    assert!(mesh.validate(ResourceKind::Mesh).unwrap_err().contains("triangles"));

    let mesh = triangle().with_faces(Vec::new());
    assert_eq!(mesh.validate(ResourceKind::Mesh), Err("no face data".to_string()));
}

#[test]
fn test_face_index_out_of_range() {
    let mesh = triangle().with_faces(vec![0, 1, 3]);
    assert_eq!(
        mesh.validate(ResourceKind::Mesh),
        Err("face index 3 out of range for 3 vertices".to_string())
    );
}

#[test]
fn test_oversized_mesh_rejected() {
    let mesh = Mesh::new("huge")
        .with_vertices(vec![0.0; (MAX_VERTICES + 1) * VERTEX_SPAN])
        .with_faces(vec![0, 1, 2]);
    assert!(mesh.validate(ResourceKind::Mesh).unwrap_err().contains("exceeds"));
}

#[test]
fn test_release_cpu_data_empties_buffers() {
    let mut mesh = triangle();
    mesh.release_cpu_data();
    assert!(mesh.vertices.is_empty());
    assert!(mesh.normals.is_empty());
    assert!(mesh.faces.is_empty());
    assert_eq!(mesh.size_bytes(), 0);
}
