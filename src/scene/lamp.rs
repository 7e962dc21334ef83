//! The articulated desk lamp scene.

use tracing::info;

use crate::error::{ResourceError, Result};
use crate::geometry::SurfaceKind;
use crate::math::transform::transform_point;
use crate::math::{Point3, Vector3};
use crate::render::{Camera, CheckerBoardTexture, Light, Material, RenderBackend, ShadingModel};

use super::object::{Object, ObjectId, ObjectTransform};
use super::registry::{ResourceRegistry, ShaderId};
use super::{Scene, SceneConfig};

const BASE_HEIGHT: f64 = -3.5;
const CAP_HEIGHT: f64 = -3.0;
const ARM1_AXIS: [f64; 3] = [0.3, 1.0, 0.3];
const ARM2_AXIS: [f64; 3] = [-0.5, 1.0, -0.5];
const SHADE_AXIS: [f64; 3] = [-0.3, 0.5, -0.1];
/// Bulb position in the shade's modeling space.
const BULB: [f64; 3] = [0.0, 0.6, 0.0];
const ORBIT_EYE: [f64; 3] = [8.0, 3.0, 8.0];
const ORBIT_LOOKAT: [f64; 3] = [0.0, 1.0, 0.0];

fn point(p: [f64; 3]) -> Point3 {
    Point3::from(p)
}

/// Named parts of the lamp, resolved when the scene is built.
#[derive(Debug, Clone, Copy)]
pub struct LampRig {
    pub floor: ObjectId,
    pub base: ObjectId,
    pub cap: ObjectId,
    pub joints: [ObjectId; 3],
    pub arms: [ObjectId; 2],
    pub shade: ObjectId,
    /// Index of the light carried by the shade.
    pub bulb: usize,
    /// One program per model, in [`ShadingModel::ALL`] order.
    pub shaders: [ShaderId; 3],
}

impl LampRig {
    /// Builds the lamp scene on `backend`.
    ///
    /// Resources created before a failure are released before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend resource cannot be created.
    pub fn build(backend: &mut dyn RenderBackend, config: &SceneConfig) -> Result<Scene> {
        let camera = Camera::new(
            Point3::new(10.0, 3.0, 10.0),
            point(ORBIT_LOOKAT),
            Vector3::y(),
            config.aspect(),
        );
        let mut scene = Scene::new(camera, lamp_lights(), config.clear_color)?;
        let (parts, shaders) = match Self::assemble(scene.registry_mut(), backend, config) {
            Ok(assembled) => assembled,
            Err(e) => {
                scene.release(backend);
                return Err(e);
            }
        };

        let [floor, base, cap, joint1, arm1, joint2, arm2, joint3, shade] =
            parts.map(|part| scene.add_object(part));
        let rig = Self {
            floor,
            base,
            cap,
            joints: [joint1, joint2, joint3],
            arms: [arm1, arm2],
            shade,
            bulb: 0,
            shaders,
        };
        rig.pose(&mut scene, 0.0)?;
        scene.set_rig(rig);
        info!(
            objects = scene.object_count(),
            lights = scene.lights().len(),
            resources = scene.registry().backend_resource_count(),
            "built lamp scene"
        );
        Ok(scene)
    }

    /// Creates the shared resources and returns the parts, bottom to top,
    /// with the program of every shading model.
    fn assemble(
        registry: &mut ResourceRegistry,
        backend: &mut dyn RenderBackend,
        config: &SceneConfig,
    ) -> Result<([Object; 9], [ShaderId; 3])> {
        let shaders = [
            registry.add_shader(backend, ShadingModel::Gouraud)?,
            registry.add_shader(backend, ShadingModel::PhongBlinn)?,
            registry.add_shader(backend, ShadingModel::Npr)?,
        ];
        let phong = shaders[1];

        let metal = registry.add_material(Material::new(
            Vector3::new(0.6, 0.4, 0.2),
            Vector3::new(4.0, 4.0, 4.0),
            Vector3::new(0.1, 0.1, 0.1),
            100.0,
        ));
        let shade_material = registry.add_material(Material::new(
            Vector3::new(0.8, 0.6, 0.4),
            Vector3::new(0.3, 0.3, 0.3),
            Vector3::new(0.2, 0.2, 0.2),
            30.0,
        ));

        let coarse = CheckerBoardTexture::new(4, 8)?;
        let fine = CheckerBoardTexture::new(15, 20)?;
        let coarse = registry.add_texture(backend, &coarse.image())?;
        let fine = registry.add_texture(backend, &fine.image())?;

        let params = config.tessellation;
        let mut mesh = |kind: SurfaceKind| registry.add_mesh(backend, kind.surface().as_ref(), params);
        let plane = mesh(SurfaceKind::Plane)?;
        let cylinder = mesh(SurfaceKind::Cylinder)?;
        let cap = mesh(SurfaceKind::CylinderCap)?;
        let sphere = mesh(SurfaceKind::Sphere)?;
        let paraboloid = mesh(SurfaceKind::Paraboloid)?;

        let part = |mesh, texture, scale: [f64; 3]| Object {
            mesh,
            material: metal,
            texture: Some(texture),
            shader: phong,
            transform: ObjectTransform::scaled(Vector3::from(scale)),
        };
        let joint = part(sphere, fine, [0.5, 0.5, 0.5]);
        let arm = part(cylinder, fine, [0.3, 2.0, 0.3]);
        let objects = [
            part(plane, coarse, [16.0, 16.0, 16.0]),
            part(cylinder, fine, [2.0, 0.5, 2.0]),
            part(cap, coarse, [2.01, 0.25, 2.01]),
            joint,
            arm,
            joint,
            arm,
            joint,
            Object {
                material: shade_material,
                ..part(paraboloid, fine, [2.0, 1.5, 2.0])
            },
        ];

        Ok((objects, shaders))
    }

    /// Program compiled for `model`.
    #[must_use]
    pub fn shader_for(&self, model: ShadingModel) -> ShaderId {
        match model {
            ShadingModel::Gouraud => self.shaders[0],
            ShadingModel::PhongBlinn => self.shaders[1],
            ShadingModel::Npr => self.shaders[2],
        }
    }

    /// Draws every lamp part, floor included, with `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if a part is missing from `scene`.
    pub fn set_shading(
        &self,
        scene: &mut Scene,
        model: ShadingModel,
    ) -> std::result::Result<(), ResourceError> {
        let shader = self.shader_for(model);
        for id in self.parts() {
            scene.object_mut(id)?.shader = shader;
        }
        Ok(())
    }

    /// Every part, bottom to top.
    #[must_use]
    pub fn parts(&self) -> [ObjectId; 9] {
        let [j1, j2, j3] = self.joints;
        let [a1, a2] = self.arms;
        [self.floor, self.base, self.cap, j1, a1, j2, a2, j3, self.shade]
    }

    /// Poses the lamp for absolute time `t`.
    ///
    /// Each joint sits at the tip of the part below it; the arms and the
    /// shade spin about fixed axes at one radian per second, and the camera
    /// orbits the lamp at half that rate.
    ///
    /// # Errors
    ///
    /// Returns an error if a part or the bulb light is missing from `scene`.
    pub fn pose(&self, scene: &mut Scene, t: f64) -> std::result::Result<(), ResourceError> {
        let origin = Point3::origin();
        let tip = Point3::new(0.0, 1.0, 0.0);

        set_pose(scene, self.floor, Vector3::y(), 0.0, &Point3::new(0.0, BASE_HEIGHT, 0.0))?;
        set_pose(scene, self.base, Vector3::y(), 0.0, &Point3::new(0.0, BASE_HEIGHT, 0.0))?;
        set_pose(scene, self.cap, Vector3::y(), 0.0, &Point3::new(0.0, CAP_HEIGHT, 0.0))?;

        let m = set_pose(scene, self.joints[0], Vector3::y(), 0.0, &Point3::new(0.0, CAP_HEIGHT, 0.0))?;
        let m = set_pose(scene, self.arms[0], Vector3::from(ARM1_AXIS), t, &transform_point(&m, &origin))?;
        let m = set_pose(scene, self.joints[1], Vector3::y(), 0.0, &transform_point(&m, &tip))?;
        let m = set_pose(scene, self.arms[1], Vector3::from(ARM2_AXIS), t, &transform_point(&m, &origin))?;
        let top = transform_point(&m, &tip);
        set_pose(scene, self.joints[2], Vector3::y(), 0.0, &top)?;
        let m = set_pose(scene, self.shade, Vector3::from(SHADE_AXIS), t, &top)?;

        let bulb = transform_point(&m, &point(BULB));
        let light = scene
            .lights_mut()
            .get_mut(self.bulb)
            .ok_or(ResourceError::NotFound("light"))?;
        light.position = bulb.coords.push(1.0);

        let angle = t / 2.0;
        let (sin, cos) = angle.sin_cos();
        let (eye, lookat) = (point(ORBIT_EYE), point(ORBIT_LOOKAT));
        let offset = eye - lookat;
        let camera = scene.camera_mut();
        camera.eye = Point3::new(
            offset.x * cos + offset.z * sin + lookat.x,
            eye.y,
            -offset.x * sin + offset.z * cos + lookat.z,
        );
        camera.lookat = lookat;
        Ok(())
    }
}

/// Three colored point lights; the first one becomes the bulb.
fn lamp_lights() -> Vec<Light> {
    vec![
        Light::point(
            Vector3::new(5.0, 5.0, 4.0),
            Vector3::new(0.1, 0.1, 1.0),
            Vector3::new(3.0, 0.0, 0.0),
        ),
        Light::point(
            Vector3::new(5.0, 10.0, 20.0),
            Vector3::new(0.2, 0.2, 0.2),
            Vector3::new(0.0, 3.0, 0.0),
        ),
        Light::point(
            Vector3::new(-5.0, 5.0, 5.0),
            Vector3::new(0.1, 0.1, 0.1),
            Vector3::new(0.0, 0.0, 3.0),
        ),
    ]
}

/// Sets an object's rotation and translation, returning its new model matrix.
fn set_pose(
    scene: &mut Scene,
    id: ObjectId,
    axis: Vector3,
    angle: f64,
    position: &Point3,
) -> std::result::Result<crate::math::Matrix4, ResourceError> {
    let object = scene.object_mut(id)?;
    object.transform.rotation_axis = axis;
    object.transform.rotation_angle = angle;
    object.transform.translation = position.coords;
    Ok(object.transform.model())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::render::{Command, RecordingBackend, UniformValue};
    use crate::tessellation::TessellationParams;

    fn small_config() -> SceneConfig {
        SceneConfig {
            tessellation: TessellationParams::new(4, 6),
            ..SceneConfig::default()
        }
    }

    #[test]
    fn build_creates_shared_resources_once() {
        let mut backend = RecordingBackend::new();
        let scene = LampRig::build(&mut backend, &small_config()).unwrap();
        assert_eq!(scene.object_count(), 9);
        assert_eq!(scene.lights().len(), 3);
        // 3 programs, 2 textures, 5 meshes.
        assert_eq!(backend.live_resources(), 10);
        assert!(scene.rig().is_some());
    }

    #[test]
    fn joints_follow_arm_tips() {
        let mut backend = RecordingBackend::new();
        let mut scene = LampRig::build(&mut backend, &small_config()).unwrap();
        let rig = scene.rig().unwrap();
        rig.pose(&mut scene, 1.7).unwrap();

        let arm = scene.object(rig.arms[0]).unwrap().transform;
        let joint = scene.object(rig.joints[1]).unwrap().transform;
        let tip = transform_point(&arm.model(), &Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(joint.translation, tip.coords, epsilon = 1e-12);
        assert_relative_eq!(arm.rotation_angle, 1.7);

        let first = scene.object(rig.joints[0]).unwrap().transform;
        assert_relative_eq!(first.translation, Vector3::new(0.0, CAP_HEIGHT, 0.0));
        assert_relative_eq!(arm.translation, first.translation, epsilon = 1e-12);
    }

    #[test]
    fn bulb_light_rides_on_the_shade() {
        let mut backend = RecordingBackend::new();
        let mut scene = LampRig::build(&mut backend, &small_config()).unwrap();
        let rig = scene.rig().unwrap();
        rig.pose(&mut scene, 0.9).unwrap();

        let shade = scene.object(rig.shade).unwrap().transform;
        let expected = transform_point(&shade.model(), &point(BULB));
        let light = scene.lights()[rig.bulb];
        assert_relative_eq!(light.position.xyz(), expected.coords, epsilon = 1e-12);
        assert_relative_eq!(light.position.w, 1.0);
    }

    #[test]
    fn camera_orbits_at_constant_height_and_radius() {
        let mut backend = RecordingBackend::new();
        let mut scene = LampRig::build(&mut backend, &small_config()).unwrap();
        let rig = scene.rig().unwrap();
        let lookat = point(ORBIT_LOOKAT);
        let radius = (point(ORBIT_EYE) - lookat).xz().norm();
        for t in [0.0, 0.5, 3.0, 10.0] {
            rig.pose(&mut scene, t).unwrap();
            let eye = scene.camera().eye;
            assert_relative_eq!(eye.y, 3.0);
            assert_relative_eq!((eye - lookat).xz().norm(), radius, epsilon = 1e-12);
        }
        rig.pose(&mut scene, 0.0).unwrap();
        assert_relative_eq!(scene.camera().eye, point(ORBIT_EYE), epsilon = 1e-12);
    }

    #[test]
    fn set_shading_switches_every_part_to_the_model_program() {
        let mut backend = RecordingBackend::new();
        let mut scene = LampRig::build(&mut backend, &small_config()).unwrap();
        let rig = scene.rig().unwrap();

        for model in ShadingModel::ALL {
            rig.set_shading(&mut scene, model).unwrap();
            let program = scene.registry().shader(rig.shader_for(model)).unwrap().program;
            assert_eq!(scene.registry().shader(rig.shader_for(model)).unwrap().model, model);

            backend.clear_commands();
            assert_eq!(scene.render(&mut backend).unwrap(), 9 * 4);
            let used: Vec<_> = backend
                .commands()
                .iter()
                .filter_map(|c| match c {
                    Command::UseProgram(p) => Some(*p),
                    _ => None,
                })
                .collect();
            assert_eq!(used.len(), 9);
            assert!(used.iter().all(|p| *p == program), "{model:?}");

            match model {
                ShadingModel::Gouraud | ShadingModel::PhongBlinn => {
                    assert_eq!(backend.uniform(program, "nLights"), Some(UniformValue::Int(3)));
                }
                ShadingModel::Npr => {
                    assert!(backend.uniform(program, "wLightPos").is_some());
                    assert_eq!(backend.uniform(program, "nLights"), None);
                }
            }
        }
    }

    #[test]
    fn failed_build_releases_partial_resources() {
        let mut backend = RecordingBackend::with_failing_programs();
        assert!(LampRig::build(&mut backend, &small_config()).is_err());
        assert_eq!(backend.live_resources(), 0);
    }
}
