//! Integration tests for the render layer through the public API
//!
//! Drives `DeviceRenderer<MockGraphicsDevice>`, so no GPU is required.
//!
//! Run with: cargo test --test renderer_integration_tests

use vis3d_render::glam::{Mat4, Vec3};
use vis3d_render::vis3d::{DeviceRenderer, DrawDescriptor, Error, Renderer, RendererConfig, ResourceKind};
use vis3d_render::vis3d::device::{Attribute, MockGraphicsDevice, ShaderStage, UniformValue};
use vis3d_render::vis3d::render::RendererStats;
use vis3d_render::vis3d::resource::{Light, Material, Mesh, Rgb, Shader, Texture};

// ============================================================================
// TEST HELPERS
// ============================================================================

fn renderer() -> DeviceRenderer<MockGraphicsDevice> {
    let mut renderer = DeviceRenderer::new(MockGraphicsDevice::new(), RendererConfig::default());
    renderer.init().unwrap();
    renderer
}

fn lines(source: &[&str]) -> Vec<String> {
    source.iter().map(|line| line.to_string()).collect()
}

fn cube() -> Mesh {
    let mut vertices = Vec::new();
    for corner in 0..8u32 {
        let bit = |shift: u32| if corner & (1 << shift) != 0 { 1.0 } else { -1.0 };
        vertices.extend_from_slice(&[bit(0), bit(1), bit(2), 1.0]);
    }
    let normals = vertices
        .chunks(4)
        .flat_map(|v| {
            let n = Vec3::new(v[0], v[1], v[2]).normalize();
            [n.x, n.y, n.z]
        })
        .collect();
    Mesh::new("cube")
        .with_vertices(vertices)
        .with_normals(normals)
        .with_faces(vec![
            0, 1, 3, 0, 3, 2,
            4, 6, 7, 4, 7, 5,
            0, 4, 5, 0, 5, 1,
            2, 3, 7, 2, 7, 6,
            0, 2, 6, 0, 6, 4,
            1, 5, 7, 1, 7, 3,
        ])
}

fn banner() -> Mesh {
    Mesh::new("banner")
        .with_vertices(vec![
            0.0, 0.0, 0.0, 1.0,
            8.0, 0.0, 0.0, 1.0,
            8.0, 1.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 1.0,
        ])
        .with_tex_coords(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])
        .with_faces(vec![0, 1, 2, 0, 2, 3])
}

// ============================================================================
// SHADER BINDING
// ============================================================================

#[test]
fn test_integration_valid_shader_yields_handle() {
    let mut renderer = renderer();
    let mut shader = Shader::new(
        "header_and_body",
        lines(&["#version 150\n", "in vec4 in_v;\nuniform mat4 mvpm;\n", "void main() { gl_Position = mvpm * in_v; }\n"]),
        lines(&["#version 150\n", "out vec4 ffc;\nvoid main() { ffc = vec4(1.0); }\n"]),
    );

    let handle = renderer.bind_shader(&mut shader).unwrap();

    assert_eq!(shader.handle(), Some(handle));
    assert!(renderer.programs().contains(handle));
    assert_eq!(renderer.device().live_shader_count(), 0);
}

#[test]
fn test_integration_vertex_error_skips_fragment() {
    let mut renderer = renderer();
    let mut shader = Shader::new(
        "broken",
        lines(&["void main( {\n"]),
        lines(&["out vec4 ffc;\nvoid main() { ffc = vec4(1.0); }\n"]),
    );

    match renderer.bind_shader(&mut shader) {
        Err(Error::CompileError { stage: ShaderStage::Vertex, log }) => assert!(!log.is_empty()),
        other => panic!("expected vertex compile error, got {:?}", other),
    }
    assert_eq!(renderer.device().compiled_stages(), &[ShaderStage::Vertex]);
    assert!(!renderer.device().commands.iter().any(|c| c == "create_shader(Fragment)"));
    assert_eq!(renderer.device().live_shader_count(), 0);
    assert_eq!(renderer.device().live_program_count(), 0);
}

#[test]
fn test_integration_link_error_releases_both_stages() {
    let mut renderer = renderer();
    let mut shader = Shader::new(
        "mismatch",
        lines(&["in vec4 in_v;\nout vec3 v_n;\nvoid main() { v_n = in_v.xyz; }\n"]),
        lines(&["in vec2 t_uv;\nout vec4 ffc;\nvoid main() { ffc = vec4(t_uv, 0.0, 1.0); }\n"]),
    );

    assert!(matches!(renderer.bind_shader(&mut shader), Err(Error::LinkError { .. })));
    assert_eq!(renderer.device().deleted_shader_count(), 2);
    assert_eq!(renderer.device().live_shader_count(), 0);
}

// ============================================================================
// RESOURCE BINDING
// ============================================================================

#[test]
fn test_integration_mesh_rebind_is_consistent() {
    let mut renderer = renderer();
    let mut mesh = cube();
    let first = renderer.bind_model(&mut mesh).unwrap();
    let buffers = renderer.device().live_buffer_count();

    // Reload new data into the same resource object
    let reloaded = cube();
    mesh.vertices = reloaded.vertices;
    mesh.normals = reloaded.normals;
    mesh.faces = reloaded.faces;
    let second = renderer.bind_model(&mut mesh).unwrap();

    assert_eq!(first, second);
    assert_eq!(renderer.device().live_buffer_count(), buffers);
    assert_eq!(renderer.device().live_vertex_array_count(), 1);
}

#[test]
fn test_integration_failed_bind_reports_kind() {
    let mut renderer = renderer();
    let mut glyphs = banner();
    glyphs.tex_coords.clear();

    match renderer.bind_glyphs(&mut glyphs) {
        Err(Error::BindError { kind, .. }) => assert_eq!(kind, ResourceKind::Glyphs),
        other => panic!("expected bind error, got {:?}", other),
    }
    assert!(!glyphs.is_bound());
    assert_eq!(glyphs.vertex_count(), 4);
}

// ============================================================================
// FRAME RENDERING
// ============================================================================

#[test]
fn test_integration_texture_unit_three() {
    let mut renderer = renderer();
    let mut glyphs = banner();
    let mut font = Texture::new("font", 8, 8, vec![200; 256]);
    let mut shader = Shader::builtin("uva").unwrap();

    let mesh = renderer.bind_glyphs(&mut glyphs).unwrap();
    renderer.bind_texture(&mut font).unwrap();
    renderer.map_texture(3, &font).unwrap();
    let program = renderer.bind_shader(&mut shader).unwrap();

    let descriptor = DrawDescriptor::new(mesh, program).with_texture_unit(3);
    assert_eq!(renderer.render(&descriptor), Ok(()));

    let draw = renderer.device().draws().last().cloned().unwrap();
    assert_eq!(draw.active_unit, 3);
    assert_eq!(renderer.device().uniform_value(draw.program.unwrap(), "uv"), Some(UniformValue::Int(3)));
}

#[test]
fn test_integration_frame_through_trait_object() {
    let mut concrete = renderer();
    let renderer: &mut dyn Renderer = &mut concrete;

    renderer.color(0.0, 0.0, 0.2, 1.0);
    renderer.enable(Attribute::DepthTest, true);
    renderer.enable(Attribute::Cull, true);
    renderer.viewport(1280, 720).unwrap();

    let mut mesh = cube();
    let mut shader = Shader::builtin("gouraud").unwrap();
    let red = Material::new("red").with_diffuse(Rgb::new(1.0, 0.0, 0.0));
    let mesh_handle = renderer.bind_model(&mut mesh).unwrap();
    let program = renderer.bind_shader(&mut shader).unwrap();

    let projection = Mat4::perspective_rh_gl(1.0, 16.0 / 9.0, 0.1, 100.0);
    for frame in 0..3 {
        renderer.begin_frame();
        renderer.clear();
        for index in 0..4 {
            let model_view = Mat4::from_translation(Vec3::new(index as f32 * 3.0, 0.0, -10.0 - frame as f32));
            let descriptor = DrawDescriptor::new(mesh_handle, program)
                .with_transforms(model_view, projection * model_view)
                .with_light(Light::new(Vec3::new(0.0, 10.0, 0.0), Rgb::WHITE))
                .with_material(&red);
            renderer.render(&descriptor).unwrap();
        }
        assert_eq!(renderer.stats(), RendererStats { draw_calls: 4, triangles: 48 });
    }

    assert_eq!(concrete.device().clear_count(), 3);
    assert_eq!(concrete.device().draws().len(), 12);
}

// ============================================================================
// STATE CONTROL
// ============================================================================

#[test]
fn test_integration_blend_toggle_has_no_residue() {
    let mut toggled = renderer();
    let untouched = renderer();

    toggled.enable(Attribute::Blend, true);
    toggled.enable(Attribute::Blend, false);

    assert_eq!(toggled.state().state(), untouched.state().state());
    assert_eq!(
        toggled.device().is_enabled(Attribute::Blend),
        untouched.device().is_enabled(Attribute::Blend)
    );
    assert_eq!(toggled.device().blend_function(), untouched.device().blend_function());
}

#[test]
fn test_integration_viewport_rules() {
    let mut renderer = renderer();

    assert!(matches!(renderer.viewport(0, 600), Err(Error::ViewportError { width: 0, height: 600 })));
    assert_eq!(renderer.viewport(800, 600), Ok(()));
    let viewport_calls = renderer.device().commands.iter().filter(|c| c.starts_with("viewport(")).count();
    assert_eq!(renderer.viewport(800, 600), Ok(()));
    let repeated = renderer.device().commands.iter().filter(|c| c.starts_with("viewport(")).count();

    assert_eq!(viewport_calls, 1);
    assert_eq!(repeated, 1);
}
