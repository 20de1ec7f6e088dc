/// Unit tests for the shader program binder
///
/// Run against MockGraphicsDevice, whose compiler accepts balanced sources
/// with a main function and whose linker matches fragment inputs to vertex
/// outputs by name.

use super::*;
use crate::graphics_device::MockGraphicsDevice;

fn lines(source: &[&str]) -> Vec<String> {
    source.iter().map(|line| format!("{}\n", line)).collect()
}

fn vertex_source() -> Vec<String> {
    lines(&[
        "#version 150",
        "in      vec4  in_v;",
        "in      vec2  in_t;",
        "uniform mat4  mvpm;",
        "out     vec2  t_uv;",
        "void main() {",
        "   gl_Position = mvpm * in_v;",
        "   t_uv = in_t;",
        "}",
    ])
}

fn fragment_source() -> Vec<String> {
    lines(&[
        "#version 150",
        "in      vec2      t_uv;",
        "uniform sampler2D uv;",
        "out     vec4      ffc;",
        "void main() {",
        "   ffc = texture(uv, t_uv);",
        "}",
    ])
}

fn broken_vertex() -> Vec<String> {
    lines(&["#version 150", "void main() {", "   gl_Position = vec4(0.0;", "}"])
}

// ============================================================================
// bind_program
// ============================================================================

#[test]
fn test_bind_program_links_valid_sources() {
    let mut device = MockGraphicsDevice::new();
    let program = device.create_program().unwrap();
    let mut state = ProgramState::Uncompiled;

    let result = bind_program(&mut device, program, &vertex_source(), &fragment_source(), &mut state);

    assert_eq!(result, Ok(()));
    assert_eq!(state, ProgramState::Linked);
    assert!(device.program_link_status(program));
    // Intermediate shader objects are gone once the program linked
    assert_eq!(device.live_shader_count(), 0);
    assert_eq!(device.deleted_shader_count(), 2);
}

#[test]
fn test_vertex_error_never_creates_fragment_stage() {
    let mut device = MockGraphicsDevice::new();
    let program = device.create_program().unwrap();
    let mut state = ProgramState::Uncompiled;

    let result = bind_program(&mut device, program, &broken_vertex(), &fragment_source(), &mut state);

    match result {
        Err(Error::CompileError { stage, log }) => {
            assert_eq!(stage, ShaderStage::Vertex);
            assert!(!log.is_empty());
        }
        other => panic!("expected vertex compile error, got {:?}", other),
    }
    assert!(matches!(state, ProgramState::Failed(Error::CompileError { stage: ShaderStage::Vertex, .. })));
    assert_eq!(device.compiled_stages(), &[ShaderStage::Vertex]);
    assert!(!device.commands.iter().any(|c| c == "create_shader(Fragment)"));
    assert_eq!(device.live_shader_count(), 0);
}

#[test]
fn test_fragment_error_reports_fragment_stage() {
    let mut device = MockGraphicsDevice::new();
    let program = device.create_program().unwrap();
    let mut state = ProgramState::Uncompiled;
    let fragment = lines(&["out vec4 ffc;", "void main() { ffc = vec4(1.0); "]);

    let result = bind_program(&mut device, program, &vertex_source(), &fragment, &mut state);

    assert!(matches!(result, Err(Error::CompileError { stage: ShaderStage::Fragment, .. })));
    assert_eq!(device.compiled_stages(), &[ShaderStage::Vertex, ShaderStage::Fragment]);
    assert_eq!(device.live_shader_count(), 0);
}

#[test]
fn test_varying_mismatch_is_link_error_and_releases_shaders() {
    let mut device = MockGraphicsDevice::new();
    let program = device.create_program().unwrap();
    let mut state = ProgramState::Uncompiled;
    let fragment = lines(&[
        "in  vec4 v_c;",
        "out vec4 ffc;",
        "void main() {",
        "   ffc = v_c;",
        "}",
    ]);

    let result = bind_program(&mut device, program, &vertex_source(), &fragment, &mut state);

    match result {
        Err(Error::LinkError { log }) => assert!(log.contains("v_c")),
        other => panic!("expected link error, got {:?}", other),
    }
    assert!(matches!(state, ProgramState::Failed(Error::LinkError { .. })));
    assert_eq!(device.live_shader_count(), 0);
    assert_eq!(device.deleted_shader_count(), 2);
}

#[test]
fn test_scoped_shader_deletes_on_drop() {
    let mut device = MockGraphicsDevice::new();
    {
        let mut outer = ScopedShader::create(&mut device, ShaderStage::Vertex).unwrap();
        let inner = ScopedShader::create(&mut *outer, ShaderStage::Fragment).unwrap();
        assert_eq!(inner.live_shader_count(), 2);
    }
    assert_eq!(device.live_shader_count(), 0);
    assert_eq!(device.deleted_shader_count(), 2);
}

// ============================================================================
// ProgramBinder
// ============================================================================

#[test]
fn test_bind_shader_returns_usable_handle() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("textured", vertex_source(), fragment_source());

    let handle = binder.bind_shader(&mut device, &mut shader).unwrap();

    assert!(binder.contains(handle));
    assert_eq!(shader.handle(), Some(handle));
    assert!(shader.state().is_linked());
    let gpu = binder.get(handle).unwrap();
    assert!(gpu.samples_texture());
    assert_eq!(gpu.uniforms.len(), 2);
    assert_eq!(
        device.attrib_locations(gpu.program),
        vec![(0, "in_v".to_string()), (1, "in_n".to_string()), (2, "in_t".to_string())]
    );
}

#[test]
fn test_bind_shader_failure_leaves_no_program() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("broken", broken_vertex(), fragment_source());

    let result = binder.bind_shader(&mut device, &mut shader);

    assert!(matches!(result, Err(Error::CompileError { stage: ShaderStage::Vertex, .. })));
    assert!(!shader.is_bound());
    assert!(matches!(shader.state(), ProgramState::Failed(_)));
    assert!(binder.is_empty());
    assert_eq!(device.live_program_count(), 0);
}

#[test]
fn test_empty_stage_fails_before_device_calls() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("headless", Vec::new(), fragment_source());

    let result = binder.bind_shader(&mut device, &mut shader);

    assert!(matches!(result, Err(Error::CompileError { stage: ShaderStage::Vertex, .. })));
    assert!(device.commands.is_empty());
}

#[test]
fn test_missing_uniform_is_reported() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("textured", vertex_source(), fragment_source())
        .with_uniforms(["mvpm", "uv", "kd", "alpha"]);

    let result = binder.bind_shader(&mut device, &mut shader);

    assert_eq!(
        result,
        Err(Error::MissingUniforms {
            shader: "textured".to_string(),
            names: vec!["kd".to_string(), "alpha".to_string()],
        })
    );
    assert_eq!(device.live_program_count(), 0);
    assert!(!shader.is_bound());
}

#[test]
fn test_rebind_replaces_program() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("textured", vertex_source(), fragment_source());

    let first = binder.bind_shader(&mut device, &mut shader).unwrap();
    let old_program = binder.get(first).unwrap().program;
    let second = binder.bind_shader(&mut device, &mut shader).unwrap();

    assert_eq!(first, second);
    assert!(binder.contains(second));
    assert_ne!(binder.get(second).unwrap().program, old_program);
    assert_eq!(device.live_program_count(), 1);
}

#[test]
fn test_failed_reload_keeps_working_program() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("textured", vertex_source(), fragment_source());
    let handle = binder.bind_shader(&mut device, &mut shader).unwrap();
    let program = binder.get(handle).unwrap().program;

    shader.vertex = broken_vertex();
    let result = binder.bind_shader(&mut device, &mut shader);

    assert!(matches!(result, Err(Error::CompileError { stage: ShaderStage::Vertex, .. })));
    assert_eq!(shader.handle(), Some(handle));
    assert!(shader.state().is_linked());
    assert_eq!(binder.get(handle).unwrap().program, program);
    assert_eq!(device.live_program_count(), 1);
}

#[test]
fn test_release_invalidates_handle() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    let mut shader = Shader::new("textured", vertex_source(), fragment_source());
    let handle = binder.bind_shader(&mut device, &mut shader).unwrap();

    assert_eq!(binder.release(&mut device, &mut shader), Ok(()));
    assert!(!binder.contains(handle));
    assert!(!shader.is_bound());
    assert_eq!(shader.state(), &ProgramState::Uncompiled);
    assert_eq!(device.live_program_count(), 0);

    assert!(matches!(binder.release(&mut device, &mut shader), Err(Error::InvalidResource(_))));
}

#[test]
fn test_builtin_shaders_link_on_mock() {
    let mut device = MockGraphicsDevice::new();
    let mut binder = ProgramBinder::new();
    for name in crate::resource::shader_library::BUILTIN_NAMES {
        let mut shader = Shader::builtin(name).unwrap();
        assert!(binder.bind_shader(&mut device, &mut shader).is_ok(), "{}", name);
    }
    assert_eq!(binder.len(), 8);
    assert_eq!(device.live_shader_count(), 0);
}
