//! GLSL assembly for the variant shader stages.
//!
//! Every stage is stitched from a shared prelude (uniform block, sampler
//! bindings, macro aliases) plus the variant's blend body, the same way a
//! hand-written shader would be laid out. The uniform block declared here
//! must stay byte-compatible with `PlaneParams` in the effect crate's gpu
//! layer.

use crate::Transition;

const UNIFORM_BLOCK: &str = r"layout(std140, set = 0, binding = 0) uniform PlaneParams {
    mat4 _projection;
    mat4 _model;
    vec2 _offset;
    vec2 _uvOffset;
    float _time;
    float _mixValue;
    float _alpha;
} ubo;";

/// Builds the vertex stage for `transition`.
///
/// All variants share the deformation curve: the pointer-lag offset bends the
/// quad into an S along each axis, scaled by a half-sine over the opposite
/// UV axis. The per-variant part is only the UV stretch factor, which shifts
/// the interpolated UVs by the (display-normalised) offset.
pub fn vertex_source(transition: Transition) -> String {
    format!(
        r"#version 450
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;
layout(location = 0) out vec2 v_uv;

{UNIFORM_BLOCK}

#define uOffset ubo._offset
#define uUvOffset ubo._uvOffset

const float M_PI = 3.1415926535897932384626433832795;
const float UV_STRETCH = {stretch:.1};

vec3 deform(vec3 pos, vec2 uvCoord, vec2 offset) {{
    pos.x = pos.x + (sin(uvCoord.y * M_PI) * offset.x);
    pos.y = pos.y + (sin(uvCoord.x * M_PI) * offset.y);
    return pos;
}}

void main() {{
    v_uv = uv + (uUvOffset * UV_STRETCH);
    vec4 world = ubo._model * vec4(position, 1.0);
    world.xyz = deform(world.xyz, uv, uOffset);
    gl_Position = ubo._projection * world;
}}
",
        stretch = transition.uv_stretch(),
    )
}

/// Builds the fragment stage for `transition`: prelude, `#line 1`, the
/// variant blend body, then the footer that combines the blend with alpha.
///
/// Variants without a previous texture get a prelude without the second
/// sampler pair, so their pipeline binds exactly one texture.
pub fn fragment_source(transition: Transition) -> String {
    let prelude = fragment_prelude(transition.uses_previous_texture());
    let body = blend_body(transition);
    format!("{prelude}\n#line 1\n{body}{FRAGMENT_FOOTER}")
}

fn fragment_prelude(uses_previous: bool) -> String {
    let previous_bindings = if uses_previous {
        "layout(set = 1, binding = 2) uniform texture2D hover_previous_texture;\n\
         layout(set = 1, binding = 3) uniform sampler hover_previous_sampler;\n\
         #define uPreviousTexture sampler2D(hover_previous_texture, hover_previous_sampler)\n"
    } else {
        ""
    };
    format!(
        r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

{UNIFORM_BLOCK}

#define uUvOffset ubo._uvOffset
#define uTime ubo._time
#define uMixValue ubo._mixValue
#define uAlpha ubo._alpha

layout(set = 1, binding = 0) uniform texture2D hover_current_texture;
layout(set = 1, binding = 1) uniform sampler hover_current_sampler;
#define uCurrentTexture sampler2D(hover_current_texture, hover_current_sampler)
{previous_bindings}
#define texture2D texture
"
    )
}

const FRAGMENT_FOOTER: &str = r"
void main() {
    outColor = vec4(blend(v_uv), uAlpha);
}
";

fn blend_body(transition: Transition) -> &'static str {
    match transition {
        Transition::Perlin => PERLIN_BODY,
        Transition::FlyEye => FLY_EYE_BODY,
        Transition::GlitchDisplace => GLITCH_DISPLACE_BODY,
        Transition::SmoothFade => SMOOTH_FADE_BODY,
        Transition::RgbShift => RGB_SHIFT_BODY,
    }
}

// Threshold wipe over 2D value noise: the mix value sweeps a cutoff through
// the noise field and smoothstep widens the cut into a soft edge.
const PERLIN_BODY: &str = r"const float scale = 8.0;
const float blurryEdges = 0.01;
const float seed = 12.9898;

float random(vec2 co) {
    float a = seed;
    float b = 78.233;
    float c = 43758.5453;
    float dt = dot(co.xy, vec2(a, b));
    float sn = mod(dt, 3.14);
    return fract(sin(sn) * c);
}

float noise(in vec2 st) {
    vec2 i = floor(st);
    vec2 f = fract(st);

    float a = random(i);
    float b = random(i + vec2(1.0, 0.0));
    float c = random(i + vec2(0.0, 1.0));
    float d = random(i + vec2(1.0, 1.0));

    vec2 u = f * f * (3.0 - 2.0 * f);

    return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

vec3 blend(vec2 uv) {
    vec4 fromColor = texture2D(uPreviousTexture, uv);
    vec4 toColor = texture2D(uCurrentTexture, uv);
    float n = noise(uv * scale);

    float p = mix(-blurryEdges, 1.0 + blurryEdges, uMixValue);
    float q = smoothstep(p - blurryEdges, p + blurryEdges, n);

    return mix(fromColor.rgb, toColor.rgb, 1.0 - q);
}
";

// Faceted lens: a cos/sin cell displacement shrinks as the mix completes,
// while the outgoing image splits its channels for a chromatic fringe.
const FLY_EYE_BODY: &str = r"const float size = 0.05;
const float zoom = 20.0;
const float colorSeparation = 0.3;

vec3 blend(vec2 p) {
    float inv = 1.0 - uMixValue;
    vec2 disp = size * vec2(cos(zoom * p.x), sin(zoom * p.y));
    vec4 texTo = texture2D(uCurrentTexture, p + inv * disp);
    vec4 texFrom = vec4(
        texture2D(uPreviousTexture, p + uMixValue * disp * (1.0 - colorSeparation)).r,
        texture2D(uPreviousTexture, p + uMixValue * disp).g,
        texture2D(uPreviousTexture, p + uMixValue * disp * (1.0 + colorSeparation)).b,
        1.0);

    return vec3(texTo * uMixValue + texFrom * inv);
}
";

// Voronoi-driven displacement with an exponential ease; mid-transition both
// images collapse toward a doubled luminance gray before the final mix.
const GLITCH_DISPLACE_BODY: &str = r"float random(vec2 co) {
    float a = 12.9898;
    float b = 78.233;
    float c = 43758.5453;
    float dt = dot(co.xy, vec2(a, b));
    float sn = mod(dt, 3.14);
    return fract(sin(sn) * c);
}

float voronoi(in vec2 x) {
    vec2 p = floor(x);
    vec2 f = fract(x);
    float res = 8.0;
    for (float j = -1.0; j <= 1.0; j += 1.0) {
        for (float i = -1.0; i <= 1.0; i += 1.0) {
            vec2 b = vec2(i, j);
            vec2 r = b - f + random(p + b);
            float d = dot(r, r);
            res = min(res, d);
        }
    }
    return sqrt(res);
}

vec2 displace(vec4 tex, vec2 texCoord, float dotDepth, float textureDepth, float strength) {
    float b = voronoi(0.003 * texCoord + 2.0);
    float g = voronoi(0.2 * texCoord);
    float r = voronoi(texCoord - 1.0);
    vec4 dis = tex * dotDepth + 1.0 - tex * textureDepth;

    dis.x = dis.x - 1.0 + textureDepth * dotDepth;
    dis.y = dis.y - 1.0 + textureDepth * dotDepth;
    dis.x *= strength;
    dis.y *= strength;
    vec2 res_uv = texCoord;
    res_uv.x = res_uv.x + dis.x;
    res_uv.y = res_uv.y + dis.y;
    return res_uv;
}

float easeInOutExpo(float t) {
    if (t <= 0.0 || t >= 1.0) {
        return clamp(t, 0.0, 1.0);
    }
    if (t < 0.5) {
        return 0.5 * pow(2.0, (20.0 * t) - 10.0);
    }
    return 1.0 - 0.5 * pow(2.0, 10.0 - (t * 20.0));
}

float easeOutExpo(float t) {
    if (t >= 1.0) {
        return 1.0;
    }
    return 1.0 - pow(2.0, -10.0 * t);
}

vec3 blend(vec2 uv) {
    float strength = 4.0;
    vec2 p = uv.xy / vec2(strength).xy;

    vec4 color1 = texture2D(uPreviousTexture, uv);
    vec4 color2 = texture2D(uCurrentTexture, uv);

    vec2 disp = displace(color1, p, 0.33, 0.7, 1.0 - easeInOutExpo(uMixValue));
    vec2 disp2 = displace(color2, p, 0.33, 0.5, easeOutExpo(uMixValue));

    vec4 dColor1 = texture2D(uPreviousTexture, disp);
    vec4 dColor2 = texture2D(uCurrentTexture, disp2);

    float val = easeInOutExpo(uMixValue);

    vec3 gray = vec3(dot(min(dColor2, dColor1).rgb, vec3(0.299, 0.587, 0.114)));
    dColor2 = vec4(gray, 1.0) * 2.0;

    color1 = mix(color1, dColor2, smoothstep(0.0, 0.5, uMixValue));
    color2 = mix(color2, dColor1, smoothstep(1.0, 0.5, uMixValue));

    return mix(color1.rgb, color2.rgb, val);
}
";

// Plain cross-fade; both textures zoom slightly toward the centre and the
// vertex stage adds the offset-driven UV stretch.
const SMOOTH_FADE_BODY: &str = r"vec2 scaleUV(vec2 uv, float scale) {
    float center = 0.5;
    return ((uv - center) * scale) + center;
}

vec3 blend(vec2 uv) {
    vec3 newColor = texture2D(uCurrentTexture, scaleUV(uv, 0.8)).rgb;
    vec3 oldColor = texture2D(uPreviousTexture, scaleUV(uv, 0.8)).rgb;
    return mix(oldColor, newColor, uMixValue);
}
";

// Chromatic aberration from motion alone: the red channel samples shifted by
// the pointer-lag offset, normalised to texture space. No mix, no previous
// texture.
const RGB_SHIFT_BODY: &str = r"vec3 blend(vec2 uv) {
    float r = texture2D(uCurrentTexture, uv + uUvOffset).r;
    vec2 gb = texture2D(uCurrentTexture, uv).gb;
    return vec3(r, gb);
}
";
