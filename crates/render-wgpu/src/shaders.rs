//! WGSL base templates and the per-material chunks spliced into them.

use jellyscape_render::{
    InsertionPoint, Segment, ShaderChunks, ShaderError, ShaderTemplate, compose,
};

/// Frame-wide bindings shared by every scene pipeline (group 0).
const FRAME_BINDINGS: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    right: vec4<f32>,
    up: vec4<f32>,
};

struct Lights {
    ambient: vec4<f32>,
    key_dir: vec4<f32>,
    key_color: vec4<f32>,
    rim_dir: vec4<f32>,
    rim_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;
@group(0) @binding(1)
var<uniform> lights: Lights;
"#;

/// Lit, translucent mesh. Vertex `attrib.x` selects bell (0) or tentacle
/// (1), `attrib.y` runs 0..1 along the surface.
pub const MESH_TEMPLATE: ShaderTemplate = ShaderTemplate {
    name: "mesh",
    segments: &[
        Segment::Text(FRAME_BINDINGS),
        Segment::Text(
            r#"
struct Material {
    model: mat4x4<f32>,
    color: vec4<f32>,
    glow: vec4<f32>,
    // x: phase, y: pulse amplitude, z: tentacle length, w: bell radius
    params: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> material: Material;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) attrib: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) attrib: vec2<f32>,
};
"#,
        ),
        Segment::Slot(InsertionPoint::Common),
        Segment::Text(
            r#"
@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let phase = material.params.x;
    var pos = vertex.position;
    var normal = vertex.normal;
"#,
        ),
        Segment::Slot(InsertionPoint::BeginVertex),
        Segment::Text(
            r#"
    var world_pos = (material.model * vec4<f32>(pos, 1.0)).xyz;
"#,
        ),
        Segment::Slot(InsertionPoint::WorldVertex),
        Segment::Text(
            r#"
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(world_pos, 1.0);
    out.world_normal = normalize((material.model * vec4<f32>(normal, 0.0)).xyz);
    out.world_pos = world_pos;
    out.attrib = vertex.attrib;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let phase = material.params.x;
    let n = normalize(in.world_normal);
    let view_dir = normalize(camera.eye.xyz - in.world_pos);
    let key = max(dot(n, lights.key_dir.xyz), 0.0);
    var color = material.color;
    color = vec4<f32>(color.rgb * (lights.ambient.rgb + lights.key_color.rgb * key), color.a);
"#,
        ),
        Segment::Slot(InsertionPoint::ColorFragment),
        Segment::Text(
            r#"
    return color;
}
"#,
        ),
    ],
};

/// Camera-facing textured quads, six vertices per instance.
pub const SPRITE_TEMPLATE: ShaderTemplate = ShaderTemplate {
    name: "sprite",
    segments: &[
        Segment::Text(FRAME_BINDINGS),
        Segment::Text(
            r#"
struct Sprite {
    color: vec4<f32>,
    // x: phase, y: half height of the field
    params: vec4<f32>,
};

@group(1) @binding(0)
var<uniform> sprite: Sprite;
@group(1) @binding(1)
var sprite_texture: texture_2d<f32>;
@group(1) @binding(2)
var sprite_sampler: sampler;

struct InstanceInput {
    @location(0) center: vec3<f32>,
    @location(1) size: f32,
    @location(2) speed: f32,
    @location(3) offset: f32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) fade: f32,
};
"#,
        ),
        Segment::Slot(InsertionPoint::Common),
        Segment::Text(
            r#"
@vertex
fn vs_main(@builtin(vertex_index) index: u32, instance: InstanceInput) -> VertexOutput {
    let phase = sprite.params.x;
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[index];
    var pos = instance.center;
    var fade = 1.0;
"#,
        ),
        Segment::Slot(InsertionPoint::BeginVertex),
        Segment::Text(
            r#"
    var world_pos = pos + (camera.right.xyz * corner.x + camera.up.xyz * corner.y) * instance.size;
"#,
        ),
        Segment::Slot(InsertionPoint::WorldVertex),
        Segment::Text(
            r#"
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(world_pos, 1.0);
    out.uv = vec2<f32>(corner.x * 0.5 + 0.5, 0.5 - corner.y * 0.5);
    out.fade = fade;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var color = textureSample(sprite_texture, sprite_sampler, in.uv) * sprite.color;
"#,
        ),
        Segment::Slot(InsertionPoint::ColorFragment),
        Segment::Text(
            r#"
    return vec4<f32>(color.rgb * color.a * in.fade, color.a * in.fade);
}
"#,
        ),
    ],
};

/// Fullscreen triangle sampling the offscreen scene.
pub const POST_TEMPLATE: ShaderTemplate = ShaderTemplate {
    name: "post",
    segments: &[
        Segment::Text(
            r#"
struct Post {
    resolution: vec4<f32>,
    // x: time (s), y: vignette, z: grain
    params: vec4<f32>,
    tint: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> post: Post;
@group(0) @binding(1)
var scene_texture: texture_2d<f32>;
@group(0) @binding(2)
var scene_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let corner = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.clip_position = vec4<f32>(corner * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(corner.x, 1.0 - corner.y);
    return out;
}
"#,
        ),
        Segment::Slot(InsertionPoint::Common),
        Segment::Text(
            r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let time = post.params.x;
    var color = textureSample(scene_texture, scene_sampler, in.uv);
"#,
        ),
        Segment::Slot(InsertionPoint::ColorFragment),
        Segment::Text(
            r#"
    return color;
}
"#,
        ),
    ],
};

fn creature_chunks() -> ShaderChunks {
    ShaderChunks::new()
        .with(
            InsertionPoint::Common,
            r#"
fn bell_pulse(phase: f32) -> f32 {
    return 0.5 + 0.5 * sin(phase * 3.14159265);
}
"#,
        )
        .with(
            InsertionPoint::BeginVertex,
            r#"
    let pulse = bell_pulse(phase);
    if (vertex.attrib.x < 0.5) {
        let rim = clamp(1.0 - pos.y / (material.params.w * 0.8), 0.0, 1.0);
        let squeeze = 1.0 - material.params.y * pulse * rim;
        pos = vec3<f32>(pos.x * squeeze, pos.y + material.params.y * pulse * 0.3 * rim, pos.z * squeeze);
    } else {
        let along = vertex.attrib.y;
        let sway = sin(phase * 4.0 - along * 6.0 + pos.x * 3.0);
        let drift = cos(phase * 3.0 - along * 5.0 + pos.z * 3.0);
        pos = vec3<f32>(
            pos.x + sway * 0.25 * along,
            pos.y + pulse * 0.2 * along,
            pos.z + drift * 0.2 * along,
        );
    }
"#,
        )
        .with(InsertionPoint::WorldVertex, "")
        .with(
            InsertionPoint::ColorFragment,
            r#"
    let fresnel = pow(1.0 - abs(dot(n, view_dir)), 2.0);
    let rim_light = max(dot(n, lights.rim_dir.xyz), 0.0);
    let glow = material.glow.rgb * (fresnel + in.attrib.y * 0.6) * (0.6 + 0.4 * bell_pulse(phase));
    color = vec4<f32>(
        color.rgb + glow + lights.rim_color.rgb * rim_light * 0.3,
        clamp(color.a + fresnel * 0.4, 0.0, 1.0),
    );
"#,
        )
}

fn mote_chunks() -> ShaderChunks {
    ShaderChunks::new()
        .with(InsertionPoint::Common, "")
        .with(
            InsertionPoint::BeginVertex,
            r#"
    let t = phase * instance.speed + instance.offset;
    pos = pos + vec3<f32>(sin(t) * 0.3, cos(t * 0.7) * 0.2, sin(t * 0.5) * 0.3);
    fade = 0.6 + 0.4 * sin(t * 2.0);
"#,
        )
        .with(InsertionPoint::WorldVertex, "")
        .with(InsertionPoint::ColorFragment, "")
}

fn bubble_chunks() -> ShaderChunks {
    ShaderChunks::new()
        .with(InsertionPoint::Common, "")
        .with(
            InsertionPoint::BeginVertex,
            r#"
    let h = sprite.params.y;
    let rise = fract((pos.y + h + phase * instance.speed) / (2.0 * h));
    pos = vec3<f32>(pos.x + sin(phase * 2.0 + instance.offset) * 0.1, rise * 2.0 * h - h, pos.z);
    fade = smoothstep(0.0, 0.1, rise) * (1.0 - smoothstep(0.85, 1.0, rise));
"#,
        )
        .with(InsertionPoint::WorldVertex, "")
        .with(
            InsertionPoint::ColorFragment,
            r#"
    color = vec4<f32>(color.rgb, color.a * 0.8);
"#,
        )
}

fn post_chunks() -> ShaderChunks {
    ShaderChunks::new()
        .with(
            InsertionPoint::Common,
            r#"
fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}
"#,
        )
        .with(
            InsertionPoint::ColorFragment,
            r#"
    let centered = in.uv - vec2<f32>(0.5, 0.5);
    let vignette = 1.0 - post.params.y * dot(centered, centered) * 2.0;
    let grain = (hash(in.uv * post.resolution.xy + vec2<f32>(time * 61.0, time * 17.0)) - 0.5) * post.params.z;
    color = vec4<f32>(color.rgb * post.tint.rgb * vignette + vec3<f32>(grain), 1.0);
"#,
        )
}

pub fn creature_shader() -> Result<String, ShaderError> {
    compose(&MESH_TEMPLATE, &creature_chunks())
}

pub fn mote_shader() -> Result<String, ShaderError> {
    compose(&SPRITE_TEMPLATE, &mote_chunks())
}

pub fn bubble_shader() -> Result<String, ShaderError> {
    compose(&SPRITE_TEMPLATE, &bubble_chunks())
}

pub fn post_shader() -> Result<String, ShaderError> {
    compose(&POST_TEMPLATE, &post_chunks())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        for src in [creature_shader(), mote_shader(), bubble_shader(), post_shader()] {
            let src = src.unwrap();
            assert!(src.contains("fn vs_main"));
            assert!(src.contains("fn fs_main"));
        }
    }

    #[test]
    fn sprite_variants_share_the_base() {
        let motes = mote_shader().unwrap();
        let bubbles = bubble_shader().unwrap();
        assert!(motes.contains("var<uniform> sprite: Sprite"));
        assert!(bubbles.contains("var<uniform> sprite: Sprite"));
        assert!(bubbles.contains("let rise"));
        assert!(!motes.contains("let rise"));
    }

    #[test]
    fn creature_helper_precedes_vertex_stage() {
        let src = creature_shader().unwrap();
        assert!(src.find("fn bell_pulse").unwrap() < src.find("fn vs_main").unwrap());
    }

    #[test]
    fn post_template_has_no_vertex_slots() {
        let slots: Vec<_> = POST_TEMPLATE.slots().collect();
        assert_eq!(slots, vec![InsertionPoint::Common, InsertionPoint::ColorFragment]);
    }
}
