pub mod animation;
pub mod config;
pub mod lamp;
pub mod object;
pub mod registry;

pub use animation::{FrameClock, SubSteps};
pub use config::SceneConfig;
pub use lamp::LampRig;
pub use object::{Object, ObjectId, ObjectTransform};
pub use registry::{MaterialId, MeshEntry, MeshId, ResourceRegistry, ShaderEntry, ShaderId, TextureKey};

use slotmap::SlotMap;
use tracing::trace;

use crate::error::{ResourceError, Result, SceneError};
use crate::render::{Camera, Light, RenderBackend, RenderState, MAX_LIGHTS};

/// Objects, lights and a camera, plus the resources they share.
///
/// Objects are drawn in insertion order. The number of objects and lights
/// only changes while building; animation mutates them in place.
#[derive(Debug)]
pub struct Scene {
    registry: ResourceRegistry,
    objects: SlotMap<ObjectId, Object>,
    order: Vec<ObjectId>,
    camera: Camera,
    lights: Vec<Light>,
    clear_color: [f32; 4],
    rig: Option<LampRig>,
}

impl Scene {
    /// Creates an empty scene with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if more than [`MAX_LIGHTS`] lights are given.
    pub fn new(camera: Camera, lights: Vec<Light>, clear_color: [f32; 4]) -> std::result::Result<Self, SceneError> {
        if lights.len() > MAX_LIGHTS {
            return Err(SceneError::TooManyLights {
                count: lights.len(),
                max: MAX_LIGHTS,
            });
        }
        Ok(Self {
            registry: ResourceRegistry::new(),
            objects: SlotMap::with_key(),
            order: Vec::new(),
            camera,
            lights,
            clear_color,
            rig: None,
        })
    }

    /// Builds the animated lamp scene described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend resource cannot be created.
    pub fn build(backend: &mut dyn RenderBackend, config: &SceneConfig) -> Result<Self> {
        LampRig::build(backend, config)
    }

    /// Appends an object; it is drawn after every object added before it.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = self.objects.insert(object);
        self.order.push(id);
        id
    }

    /// Returns the object, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the scene.
    pub fn object(&self, id: ObjectId) -> std::result::Result<&Object, ResourceError> {
        self.objects.get(id).ok_or(ResourceError::NotFound("object"))
    }

    /// Returns the object mutably, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the scene.
    pub fn object_mut(&mut self, id: ObjectId) -> std::result::Result<&mut Object, ResourceError> {
        self.objects.get_mut(id).ok_or(ResourceError::NotFound("object"))
    }

    /// Objects in draw order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &Object)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(*id).map(|o| (*id, o)))
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Lights, mutable in place but not resizable.
    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ResourceRegistry {
        &mut self.registry
    }

    /// The lamp rig driving [`animate`](Self::animate), if any.
    #[must_use]
    pub fn rig(&self) -> Option<LampRig> {
        self.rig
    }

    pub fn set_rig(&mut self, rig: LampRig) {
        self.rig = Some(rig);
    }

    /// Advances the animation over one sub-step `[t0, t1)`.
    ///
    /// The pose depends only on the end time, so sub-stepping never drifts.
    ///
    /// # Errors
    ///
    /// Returns an error if the rig refers to a missing object or light.
    pub fn animate(&mut self, t0: f64, t1: f64) -> Result<()> {
        trace!(t0, t1, "animate");
        if let Some(rig) = self.rig {
            rig.pose(self, t1)?;
        }
        Ok(())
    }

    /// Draws every object in insertion order, one draw call per strip.
    ///
    /// Returns the number of draw calls issued.
    ///
    /// # Errors
    ///
    /// Returns an error if an object refers to a missing resource or its
    /// shading model lacks a required light or texture.
    pub fn render(&self, backend: &mut dyn RenderBackend) -> Result<usize> {
        backend.begin_frame(self.clear_color);
        let mut draws = 0;
        for (_, object) in self.objects() {
            let mesh = self.registry.mesh(object.mesh)?;
            let material = self.registry.material(object.material)?;
            let shader = self.registry.shader(object.shader)?;
            let texture = object
                .texture
                .map(|key| self.registry.texture(key))
                .transpose()?;

            let state = RenderState::new(
                &self.camera,
                object.transform.model(),
                object.transform.inverse(),
                &self.lights,
                material,
                texture,
            );
            backend.use_program(shader.program);
            shader.model.bind(&state, backend)?;
            for strip in mesh.mesh.strips() {
                backend.draw_triangle_strip(mesh.buffer, strip.start, strip.len());
                draws += 1;
            }
        }
        trace!(draws, "rendered frame");
        Ok(draws)
    }

    /// Releases every backend resource held by the scene.
    pub fn release(self, backend: &mut dyn RenderBackend) {
        self.registry.release(backend);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::Sphere;
    use crate::math::{Point3, Vector3};
    use crate::render::{Command, Material, RecordingBackend, ShadingModel};
    use crate::tessellation::TessellationParams;

    fn camera() -> Camera {
        Camera::new(Point3::new(0.0, 0.0, 10.0), Point3::origin(), Vector3::y(), 1.0)
    }

    fn light() -> Light {
        Light::point(Vector3::new(0.0, 0.0, 5.0), Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn more_than_eight_lights_are_rejected() {
        assert!(Scene::new(camera(), vec![light(); MAX_LIGHTS], [0.0; 4]).is_ok());
        assert!(matches!(
            Scene::new(camera(), vec![light(); MAX_LIGHTS + 1], [0.0; 4]),
            Err(SceneError::TooManyLights { count: 9, max: 8 })
        ));
    }

    #[test]
    fn objects_are_drawn_in_insertion_order() {
        let mut backend = RecordingBackend::new();
        let mut scene = Scene::new(camera(), vec![light()], [0.0; 4]).unwrap();
        let registry = scene.registry_mut();
        let coarse = registry
            .add_mesh(&mut backend, &Sphere, TessellationParams::new(2, 3))
            .unwrap();
        let fine = registry
            .add_mesh(&mut backend, &Sphere, TessellationParams::new(5, 3))
            .unwrap();
        let material = registry.add_material(Material::new(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::zeros(),
            Vector3::zeros(),
            1.0,
        ));
        let shader = registry.add_shader(&mut backend, ShadingModel::Gouraud).unwrap();
        let coarse_buffer = registry.mesh(coarse).unwrap().buffer;
        let fine_buffer = registry.mesh(fine).unwrap().buffer;
        for mesh in [fine, coarse] {
            scene.add_object(Object {
                mesh,
                material,
                texture: None,
                shader,
                transform: ObjectTransform::default(),
            });
        }

        backend.clear_commands();
        assert_eq!(scene.render(&mut backend).unwrap(), 7);
        assert_eq!(backend.commands().first(), Some(&Command::BeginFrame([0.0; 4])));
        let buffers: Vec<_> = backend.draws().map(|(buffer, _, _)| buffer).collect();
        assert_eq!(buffers[..5], [fine_buffer; 5]);
        assert_eq!(buffers[5..], [coarse_buffer; 2]);
        assert!(backend.draws().all(|(_, _, count)| count == 8));
    }

    #[test]
    fn animate_without_rig_is_a_no_op() {
        let mut scene = Scene::new(camera(), vec![light()], [0.0; 4]).unwrap();
        scene.animate(0.0, 0.1).unwrap();
        assert_eq!(scene.camera().eye, Point3::new(0.0, 0.0, 10.0));
    }
}
