//! Shading models: program text, uniform contract and CPU reference lighting.
//!
//! All models evaluate the same Phong-Blinn sum
//! `Σ ka·La + (kd·cosθ + ks·cosδ^shininess)·Le`; they differ in where the
//! per-light vectors are evaluated. Every model turns the normal towards the
//! viewer first, since several surfaces are one-sided.

use crate::error::SceneError;
use crate::math::{Matrix4, Point3, Vector3, Vector4};

use super::backend::{ProgramSource, RenderBackend, UniformValue};
use super::material::{Light, Material};
use super::state::RenderState;

/// Silhouette threshold of the NPR model on `|N·V|`.
pub const SILHOUETTE_THRESHOLD: f64 = 0.2;

/// `N·L` above which the NPR model uses full diffuse intensity.
pub const TOON_THRESHOLD: f64 = 0.5;

/// Diffuse level of the NPR model for `N·L` at or below the threshold.
pub const TOON_SHADOW: f64 = 0.5;

/// Where and how lighting is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingModel {
    /// Lighting summed per vertex and interpolated as a color.
    Gouraud,
    /// Lighting summed per pixel from interpolated vectors, texture-modulated.
    PhongBlinn,
    /// Two-level diffuse with a black silhouette band; uses the first light only.
    Npr,
}

/// Inputs for shading a single sample on the CPU.
#[derive(Debug, Clone, Copy)]
pub struct ShadeInput<'a> {
    /// World-space position of the sample.
    pub position: Point3,
    /// World-space normal (any length, any orientation).
    pub normal: Vector3,
    /// Eye position.
    pub eye: Point3,
    /// Lights, in order.
    pub lights: &'a [Light],
    /// Surface material.
    pub material: &'a Material,
    /// Sampled texture color; white when untextured.
    pub tex_color: Vector3,
}

/// Returns `n` flipped if needed so that it faces `view`.
#[must_use]
pub fn face_viewer(n: &Vector3, view: &Vector3) -> Vector3 {
    if n.dot(view) < 0.0 {
        -n
    } else {
        *n
    }
}

/// Lambertian cosine `max(N·L, 0)` for unit `n` and `l`.
#[must_use]
pub fn diffuse_term(n: &Vector3, l: &Vector3) -> f64 {
    n.dot(l).max(0.0)
}

/// Phong-Blinn radiance for unit normal `n` and unit view vector `v`.
///
/// `kd` and `ka` are passed separately so callers can modulate them by a texture.
#[must_use]
pub fn blinn_phong(
    n: &Vector3,
    v: &Vector3,
    frag: &Vector4,
    lights: &[Light],
    material: &Material,
    kd: &Vector3,
    ka: &Vector3,
) -> Vector3 {
    let mut radiance = Vector3::zeros();
    for light in lights {
        let l = light.vector_from(frag).normalize();
        let h = (l + v).normalize();
        let cost = diffuse_term(n, &l);
        let cosd = n.dot(&h).max(0.0);
        let reflected = kd * cost + material.ks * cosd.powf(material.shininess);
        radiance += ka.component_mul(&light.la) + reflected.component_mul(&light.le);
    }
    radiance
}

impl ShadingModel {
    /// Every shading model.
    pub const ALL: [ShadingModel; 3] = [Self::Gouraud, Self::PhongBlinn, Self::Npr];

    /// Program text for the backend, passed through verbatim.
    #[must_use]
    pub fn source(self) -> ProgramSource {
        let (vertex, fragment) = match self {
            Self::Gouraud => (GOURAUD_VS, GOURAUD_FS),
            Self::PhongBlinn => (PHONG_VS, PHONG_FS),
            Self::Npr => (NPR_VS, NPR_FS),
        };
        ProgramSource {
            vertex,
            fragment,
            output: "fragmentColor",
        }
    }

    /// Returns `true` if the model samples a diffuse texture.
    #[must_use]
    pub fn uses_texture(self) -> bool {
        !matches!(self, Self::Gouraud)
    }

    /// Uploads the model's uniforms from `state` to the current program.
    ///
    /// # Errors
    ///
    /// Returns an error if the NPR model gets no light, or a textured model no texture.
    pub fn bind(self, state: &RenderState<'_>, backend: &mut dyn RenderBackend) -> Result<(), SceneError> {
        backend.set_uniform("MVP", mat4(&state.mvp));
        backend.set_uniform("M", mat4(&state.m));
        backend.set_uniform("Minv", mat4(&state.m_inv));
        backend.set_uniform("wEye", vec3(&state.eye.coords));

        if self.uses_texture() {
            let texture = state.texture.ok_or(SceneError::MissingTexture)?;
            backend.set_uniform("diffuseTexture", UniformValue::Sampler { texture, unit: 0 });
        }

        match self {
            Self::Gouraud | Self::PhongBlinn => {
                set_material(backend, state.material, "material");
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                backend.set_uniform("nLights", UniformValue::Int(state.lights.len() as i32));
                for (i, light) in state.lights.iter().enumerate() {
                    set_light(backend, light, &format!("lights[{i}]"));
                }
            }
            Self::Npr => {
                let light = state.lights.first().ok_or(SceneError::NoLights)?;
                backend.set_uniform("wLightPos", vec4(&light.position));
            }
        }
        Ok(())
    }

    /// Shades one sample the way the model's program does.
    #[must_use]
    pub fn shade(self, input: &ShadeInput<'_>) -> Vector3 {
        let frag = input.position.coords.push(1.0);
        let v = (input.eye - input.position).normalize();
        let n = face_viewer(&input.normal.normalize(), &v);
        let material = input.material;

        match self {
            Self::Gouraud => blinn_phong(&n, &v, &frag, input.lights, material, &material.kd, &material.ka),
            Self::PhongBlinn => {
                let kd = material.kd.component_mul(&input.tex_color);
                let ka = material.ka.component_mul(&input.tex_color);
                blinn_phong(&n, &v, &frag, input.lights, material, &kd, &ka)
            }
            Self::Npr => {
                if n.dot(&v).abs() < SILHOUETTE_THRESHOLD {
                    return Vector3::zeros();
                }
                let Some(light) = input.lights.first() else {
                    return Vector3::zeros();
                };
                let l = light.vector_from(&frag).normalize();
                let level = if n.dot(&l) > TOON_THRESHOLD { 1.0 } else { TOON_SHADOW };
                input.tex_color * level
            }
        }
    }
}

fn set_material(backend: &mut dyn RenderBackend, material: &Material, name: &str) {
    backend.set_uniform(&format!("{name}.kd"), vec3(&material.kd));
    backend.set_uniform(&format!("{name}.ks"), vec3(&material.ks));
    backend.set_uniform(&format!("{name}.ka"), vec3(&material.ka));
    #[allow(clippy::cast_possible_truncation)]
    backend.set_uniform(&format!("{name}.shininess"), UniformValue::Float(material.shininess as f32));
}

fn set_light(backend: &mut dyn RenderBackend, light: &Light, name: &str) {
    backend.set_uniform(&format!("{name}.La"), vec3(&light.la));
    backend.set_uniform(&format!("{name}.Le"), vec3(&light.le));
    backend.set_uniform(&format!("{name}.wLightPos"), vec4(&light.position));
}

#[allow(clippy::cast_possible_truncation)]
fn vec3(v: &Vector3) -> UniformValue {
    UniformValue::Vec3([v.x as f32, v.y as f32, v.z as f32])
}

#[allow(clippy::cast_possible_truncation)]
fn vec4(v: &Vector4) -> UniformValue {
    UniformValue::Vec4([v.x as f32, v.y as f32, v.z as f32, v.w as f32])
}

#[allow(clippy::cast_possible_truncation)]
fn mat4(m: &Matrix4) -> UniformValue {
    let mut out = [0.0f32; 16];
    for (dst, src) in out.iter_mut().zip(m.as_slice()) {
        *dst = *src as f32;
    }
    UniformValue::Mat4(out)
}

// Matrices are uploaded column-major and applied as `M * v`. Normals are
// transformed by the inverse transpose, written `n * Minv`.

const GOURAUD_VS: &str = r"
#version 330
precision highp float;

struct Light {
    vec3 La, Le;
    vec4 wLightPos;
};

struct Material {
    vec3 kd, ks, ka;
    float shininess;
};

uniform mat4 MVP, M, Minv;
uniform Light[8] lights;
uniform int nLights;
uniform vec3 wEye;
uniform Material material;

layout(location = 0) in vec3 vtxPos;
layout(location = 1) in vec3 vtxNorm;

out vec3 radiance;

void main() {
    gl_Position = MVP * vec4(vtxPos, 1);
    vec4 wPos = M * vec4(vtxPos, 1);
    vec3 V = normalize(wEye * wPos.w - wPos.xyz);
    vec3 N = normalize((vec4(vtxNorm, 0) * Minv).xyz);
    if (dot(N, V) < 0) N = -N;

    radiance = vec3(0, 0, 0);
    for (int i = 0; i < nLights; i++) {
        vec3 L = normalize(lights[i].wLightPos.xyz * wPos.w - wPos.xyz * lights[i].wLightPos.w);
        vec3 H = normalize(L + V);
        float cost = max(dot(N, L), 0), cosd = max(dot(N, H), 0);
        radiance += material.ka * lights[i].La
                  + (material.kd * cost + material.ks * pow(cosd, material.shininess)) * lights[i].Le;
    }
}
";

const GOURAUD_FS: &str = r"
#version 330
precision highp float;

in vec3 radiance;
out vec4 fragmentColor;

void main() {
    fragmentColor = vec4(radiance, 1);
}
";

const PHONG_VS: &str = r"
#version 330
precision highp float;

struct Light {
    vec3 La, Le;
    vec4 wLightPos;
};

uniform mat4 MVP, M, Minv;
uniform Light[8] lights;
uniform int nLights;
uniform vec3 wEye;

layout(location = 0) in vec3 vtxPos;
layout(location = 1) in vec3 vtxNorm;
layout(location = 2) in vec2 vtxUV;

out vec3 wNormal;
out vec3 wView;
out vec3 wLight[8];
out vec2 texcoord;

void main() {
    gl_Position = MVP * vec4(vtxPos, 1);
    vec4 wPos = M * vec4(vtxPos, 1);
    for (int i = 0; i < nLights; i++) {
        wLight[i] = lights[i].wLightPos.xyz * wPos.w - wPos.xyz * lights[i].wLightPos.w;
    }
    wView = wEye * wPos.w - wPos.xyz;
    wNormal = (vec4(vtxNorm, 0) * Minv).xyz;
    texcoord = vtxUV;
}
";

const PHONG_FS: &str = r"
#version 330
precision highp float;

struct Light {
    vec3 La, Le;
    vec4 wLightPos;
};

struct Material {
    vec3 kd, ks, ka;
    float shininess;
};

uniform Material material;
uniform Light[8] lights;
uniform int nLights;
uniform sampler2D diffuseTexture;

in vec3 wNormal;
in vec3 wView;
in vec3 wLight[8];
in vec2 texcoord;

out vec4 fragmentColor;

void main() {
    vec3 N = normalize(wNormal);
    vec3 V = normalize(wView);
    if (dot(N, V) < 0) N = -N;
    vec3 texColor = texture(diffuseTexture, texcoord).rgb;
    vec3 ka = material.ka * texColor;
    vec3 kd = material.kd * texColor;

    vec3 radiance = vec3(0, 0, 0);
    for (int i = 0; i < nLights; i++) {
        vec3 L = normalize(wLight[i]);
        vec3 H = normalize(L + V);
        float cost = max(dot(N, L), 0), cosd = max(dot(N, H), 0);
        radiance += ka * lights[i].La
                  + (kd * cost + material.ks * pow(cosd, material.shininess)) * lights[i].Le;
    }
    fragmentColor = vec4(radiance, 1);
}
";

const NPR_VS: &str = r"
#version 330
precision highp float;

uniform mat4 MVP, M, Minv;
uniform vec4 wLightPos;
uniform vec3 wEye;

layout(location = 0) in vec3 vtxPos;
layout(location = 1) in vec3 vtxNorm;
layout(location = 2) in vec2 vtxUV;

out vec3 wNormal, wView, wLight;
out vec2 texcoord;

void main() {
    gl_Position = MVP * vec4(vtxPos, 1);
    vec4 wPos = M * vec4(vtxPos, 1);
    wLight = wLightPos.xyz * wPos.w - wPos.xyz * wLightPos.w;
    wView = wEye * wPos.w - wPos.xyz;
    wNormal = (vec4(vtxNorm, 0) * Minv).xyz;
    texcoord = vtxUV;
}
";

const NPR_FS: &str = r"
#version 330
precision highp float;

uniform sampler2D diffuseTexture;

in vec3 wNormal, wView, wLight;
in vec2 texcoord;
out vec4 fragmentColor;

void main() {
    vec3 N = normalize(wNormal), V = normalize(wView), L = normalize(wLight);
    if (dot(N, V) < 0) N = -N;
    float y = (dot(N, L) > 0.5) ? 1 : 0.5;
    if (abs(dot(N, V)) < 0.2) fragmentColor = vec4(0, 0, 0, 1);
    else fragmentColor = vec4(y * texture(diffuseTexture, texcoord).rgb, 1);
}
";
