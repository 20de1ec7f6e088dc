//! Ready-made GLSL 150 shaders.
//!
//! Sources are kept one line per fragment; `Shader::builtin` terminates
//! each line before handing the shader out.

type Sources = (&'static [&'static str], &'static [&'static str]);

/// Vertex and fragment lines of a built-in shader
pub fn sources(name: &str) -> Option<Sources> {
    Some(match name {
        "flat" => (FLAT_VERTEX, COLOR_FRAGMENT),
        "flata" => (FLAT_VERTEX, COLOR_FADE_FRAGMENT),
        "gouraud" => (GOURAUD_VERTEX, COLOR_FRAGMENT),
        "phong" => (PHONG_VERTEX, COLOR_FRAGMENT),
        "uv" => (UV_VERTEX, UV_FRAGMENT),
        "uva" => (UV_VERTEX, UV_FADE_FRAGMENT),
        "uvra" => (UV_VERTEX, UV_ROTATE_FRAGMENT),
        "bb" => (BILLBOARD_VERTEX, UV_FRAGMENT),
        _ => return None,
    })
}

/// Names accepted by [`sources`]
pub const BUILTIN_NAMES: [&str; 8] = ["flat", "flata", "gouraud", "phong", "uv", "uva", "uvra", "bb"];

// ===== VERTEX STAGES =====

const FLAT_VERTEX: &[&str] = &[
    "#version 150",
    "in      vec4  in_v;",
    "uniform mat4  mvpm;",
    "uniform vec3  kd;",
    "uniform float alpha;",
    "out     vec4  v_c;",
    "void main() {",
    "   gl_Position = mvpm * in_v;",
    "   v_c = vec4(kd, alpha);",
    "}",
];

const GOURAUD_VERTEX: &[&str] = &[
    "#version 150",
    "in      vec4  in_v;",
    "in      vec3  in_n;",
    "uniform mat4  mvpm;",
    "uniform mat4  mvm;",
    "uniform mat3  nm;",
    "uniform vec4  l;",
    "uniform vec3  ld;",
    "uniform vec3  kd;",
    "uniform float alpha;",
    "out     vec4  v_c;",
    "void main() {",
    "   vec3 norm = normalize(nm * in_n);",
    "   vec4 eye = mvm * in_v;",
    "   vec3 s = normalize(vec3(l - eye));",
    "   vec3 colour = ld * kd * max(dot(s, norm), 0.0);",
    "   v_c = vec4(colour, alpha);",
    "   gl_Position = mvpm * in_v;",
    "}",
];

const PHONG_VERTEX: &[&str] = &[
    "#version 150",
    "in      vec4  in_v;",
    "in      vec3  in_n;",
    "uniform mat4  mvpm;",
    "uniform mat4  mvm;",
    "uniform mat3  nm;",
    "uniform vec4  l;",
    "uniform vec3  ld;",
    "uniform vec3  ka;",
    "uniform vec3  kd;",
    "uniform vec3  ks;",
    "uniform float alpha;",
    "out     vec4  v_c;",
    "void main() {",
    "   vec3 norm = normalize(nm * in_n);",
    "   vec4 eye = mvm * in_v;",
    "   vec3 s = normalize(vec3(l - eye));",
    "   vec3 v = normalize(-eye.xyz);",
    "   vec3 r = reflect(-s, norm);",
    "   float sDotN = max(dot(s, norm), 0.0);",
    "   vec3 diffuse = ld * kd * sDotN;",
    "   vec3 spec = vec3(0.0);",
    "   if (sDotN > 0.0)",
    "      spec = ks * pow(max(dot(r, v), 0.0), 3.0);",
    "   v_c = vec4(ka + diffuse + spec, alpha);",
    "   gl_Position = mvpm * in_v;",
    "}",
];

const UV_VERTEX: &[&str] = &[
    "#version 150",
    "in      vec4  in_v;",
    "in      vec2  in_t;",
    "uniform mat4  mvpm;",
    "out     vec2  t_uv;",
    "void main() {",
    "   gl_Position = mvpm * in_v;",
    "   t_uv = in_t;",
    "}",
];

// Keeps the textured quad facing the camera
const BILLBOARD_VERTEX: &[&str] = &[
    "#version 150",
    "in      vec4  in_v;",
    "in      vec2  in_t;",
    "uniform mat4  mvpm;",
    "uniform vec3  scale;",
    "out     vec2  t_uv;",
    "void main() {",
    "   mat4 bb = mvpm;",
    "   bb[0][0] = 1.0;",
    "   bb[2][0] = 0.0;",
    "   bb[0][1] = 0.0;",
    "   bb[1][1] = 1.0;",
    "   bb[2][1] = 0.0;",
    "   bb[0][2] = 0.0;",
    "   bb[2][2] = 1.0;",
    "   vec4 position = in_v;",
    "   position.xyz = position.xyz * scale;",
    "   gl_Position = bb * position;",
    "   t_uv = in_t;",
    "}",
];

// ===== FRAGMENT STAGES =====

const COLOR_FRAGMENT: &[&str] = &[
    "#version 150",
    "in  vec4 v_c;",
    "out vec4 ffc;",
    "void main() {",
    "   ffc = v_c;",
    "}",
];

const COLOR_FADE_FRAGMENT: &[&str] = &[
    "#version 150",
    "in      vec4  v_c;",
    "uniform float fd;",
    "out     vec4  ffc;",
    "float fade(float distance) {",
    "   float z = gl_FragCoord.z / gl_FragCoord.w / distance;",
    "   return 1.0 - clamp(z, 0.0, 1.0);",
    "}",
    "void main() {",
    "   ffc = v_c;",
    "   ffc.a = ffc.a * fade(fd);",
    "}",
];

const UV_FRAGMENT: &[&str] = &[
    "#version 150",
    "in      vec2      t_uv;",
    "uniform sampler2D uv;",
    "uniform float     alpha;",
    "out     vec4      ffc;",
    "void main() {",
    "   ffc = texture(uv, t_uv) * vec4(1.0, 1.0, 1.0, alpha);",
    "}",
];

const UV_FADE_FRAGMENT: &[&str] = &[
    "#version 150",
    "in      vec2      t_uv;",
    "uniform sampler2D uv;",
    "uniform float     fd;",
    "uniform float     alpha;",
    "out     vec4      ffc;",
    "float fade(float distance) {",
    "   float z = gl_FragCoord.z / gl_FragCoord.w / distance;",
    "   return 1.0 - clamp(z, 0.0, 1.0);",
    "}",
    "void main() {",
    "   ffc = texture(uv, t_uv);",
    "   ffc.a = ffc.a * fade(fd) * alpha;",
    "}",
];

const UV_ROTATE_FRAGMENT: &[&str] = &[
    "#version 150",
    "in      vec2      t_uv;",
    "uniform sampler2D uv;",
    "uniform float     fd;",
    "uniform float     time;",
    "uniform float     rs;",
    "uniform float     alpha;",
    "out     vec4      ffc;",
    "float fade(float distance) {",
    "   float z = gl_FragCoord.z / gl_FragCoord.w / distance;",
    "   return 1.0 - clamp(z, 0.0, 1.0);",
    "}",
    "void main() {",
    "   float sa = sin(time * rs);",
    "   float ca = cos(time * rs);",
    "   mat2 rot = mat2(ca, -sa, sa, ca);",
    "   ffc = texture(uv, ((t_uv - 0.5) * rot) + 0.5);",
    "   ffc.a = ffc.a * fade(fd) * alpha;",
    "}",
];
