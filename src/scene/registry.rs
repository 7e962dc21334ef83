use slotmap::SlotMap;
use tracing::debug;

use crate::error::{ResourceError, Result};
use crate::geometry::surface::ParamSurface;
use crate::render::{
    BufferId, Material, ProgramId, RenderBackend, ShadingModel, TextureId, TextureImage,
};
use crate::tessellation::{StripMesh, TessellateSurface, TessellationParams};

slotmap::new_key_type! {
    /// Key of a tessellated mesh in the registry.
    pub struct MeshId;
}

slotmap::new_key_type! {
    /// Key of a material in the registry.
    pub struct MaterialId;
}

slotmap::new_key_type! {
    /// Key of a texture in the registry.
    pub struct TextureKey;
}

slotmap::new_key_type! {
    /// Key of a shading program in the registry.
    pub struct ShaderId;
}

/// A mesh together with the vertex buffer it was uploaded to.
#[derive(Debug, Clone)]
pub struct MeshEntry {
    pub mesh: StripMesh,
    pub buffer: BufferId,
}

/// A linked program and the shading model it implements.
#[derive(Debug, Clone, Copy)]
pub struct ShaderEntry {
    pub model: ShadingModel,
    pub program: ProgramId,
}

/// Owns every shared scene resource.
///
/// Objects refer to resources by key only, so the registry outlives all of
/// them. Backend resources are freed by [`release`](Self::release), which
/// consumes the registry and therefore runs at most once.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    meshes: SlotMap<MeshId, MeshEntry>,
    materials: SlotMap<MaterialId, Material>,
    textures: SlotMap<TextureKey, TextureId>,
    shaders: SlotMap<ShaderId, ShaderEntry>,
}

impl ResourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tessellates `surface` and uploads the mesh.
    ///
    /// # Errors
    ///
    /// Returns an error if tessellation fails or the buffer cannot be allocated.
    pub fn add_mesh(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: &dyn ParamSurface,
        params: TessellationParams,
    ) -> Result<MeshId> {
        let mesh = TessellateSurface::new(surface, params).execute()?;
        let buffer = backend.create_vertex_buffer(&mesh.vertices)?;
        Ok(self.meshes.insert(MeshEntry { mesh, buffer }))
    }

    /// Stores a material.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.insert(material)
    }

    /// Uploads a texture image.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot create the texture.
    pub fn add_texture(&mut self, backend: &mut dyn RenderBackend, image: &TextureImage) -> Result<TextureKey> {
        let texture = backend.create_texture(image)?;
        Ok(self.textures.insert(texture))
    }

    /// Compiles and links the program of a shading model.
    ///
    /// # Errors
    ///
    /// Returns an error if the program fails to compile or link.
    pub fn add_shader(&mut self, backend: &mut dyn RenderBackend, model: ShadingModel) -> Result<ShaderId> {
        let program = backend.create_program(&model.source())?;
        Ok(self.shaders.insert(ShaderEntry { model, program }))
    }

    /// Returns the mesh entry, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the registry.
    pub fn mesh(&self, id: MeshId) -> std::result::Result<&MeshEntry, ResourceError> {
        self.meshes.get(id).ok_or(ResourceError::NotFound("mesh"))
    }

    /// Returns the material, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the registry.
    pub fn material(&self, id: MaterialId) -> std::result::Result<&Material, ResourceError> {
        self.materials.get(id).ok_or(ResourceError::NotFound("material"))
    }

    /// Returns the backend texture, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the registry.
    pub fn texture(&self, id: TextureKey) -> std::result::Result<TextureId, ResourceError> {
        self.textures.get(id).copied().ok_or(ResourceError::NotFound("texture"))
    }

    /// Returns the shader entry, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not in the registry.
    pub fn shader(&self, id: ShaderId) -> std::result::Result<ShaderEntry, ResourceError> {
        self.shaders.get(id).copied().ok_or(ResourceError::NotFound("shader"))
    }

    /// Number of backend resources (buffers, textures, programs) held.
    #[must_use]
    pub fn backend_resource_count(&self) -> usize {
        self.meshes.len() + self.textures.len() + self.shaders.len()
    }

    /// Frees every backend resource exactly once.
    pub fn release(self, backend: &mut dyn RenderBackend) {
        debug!(
            meshes = self.meshes.len(),
            textures = self.textures.len(),
            shaders = self.shaders.len(),
            "releasing scene resources"
        );
        for (_, entry) in self.meshes {
            backend.delete_vertex_buffer(entry.buffer);
        }
        for (_, texture) in self.textures {
            backend.delete_texture(texture);
        }
        for (_, entry) in self.shaders {
            backend.delete_program(entry.program);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::surface::{Plane, Sphere};
    use crate::math::Vector3;
    use crate::render::{CheckerBoardTexture, RecordingBackend};

    #[test]
    fn resources_are_resolved_by_key() {
        let mut backend = RecordingBackend::new();
        let mut registry = ResourceRegistry::new();
        let mesh = registry
            .add_mesh(&mut backend, &Sphere, TessellationParams::new(4, 4))
            .unwrap();
        let material = registry.add_material(Material::new(
            Vector3::new(0.5, 0.5, 0.5),
            Vector3::zeros(),
            Vector3::zeros(),
            1.0,
        ));
        let shader = registry.add_shader(&mut backend, ShadingModel::Npr).unwrap();

        let entry = registry.mesh(mesh).unwrap();
        assert_eq!(backend.buffer(entry.buffer).map(<[_]>::len), Some(4 * 5 * 2));
        assert_eq!(registry.material(material).unwrap().kd.x, 0.5);
        assert_eq!(registry.shader(shader).unwrap().model, ShadingModel::Npr);
    }

    #[test]
    fn foreign_key_is_not_found() {
        let mut backend = RecordingBackend::new();
        let mut other = ResourceRegistry::new();
        let mesh = other
            .add_mesh(&mut backend, &Plane, TessellationParams::new(1, 1))
            .unwrap();
        let registry = ResourceRegistry::new();
        assert!(matches!(registry.mesh(mesh), Err(ResourceError::NotFound("mesh"))));
    }

    #[test]
    fn release_frees_each_backend_resource_once() {
        let mut backend = RecordingBackend::new();
        let mut registry = ResourceRegistry::new();
        registry
            .add_mesh(&mut backend, &Plane, TessellationParams::new(2, 2))
            .unwrap();
        let image = CheckerBoardTexture::new(4, 8).unwrap().image();
        registry.add_texture(&mut backend, &image).unwrap();
        registry.add_shader(&mut backend, ShadingModel::Gouraud).unwrap();
        assert_eq!(registry.backend_resource_count(), 3);
        assert_eq!(backend.live_resources(), 3);

        registry.release(&mut backend);
        assert_eq!(backend.live_resources(), 0);
        assert_eq!(backend.invalid_releases(), 0);
    }

    #[test]
    fn failed_upload_leaves_registry_unchanged() {
        let mut backend = RecordingBackend::with_failing_programs();
        let mut registry = ResourceRegistry::new();
        assert!(registry.add_shader(&mut backend, ShadingModel::PhongBlinn).is_err());
        assert_eq!(registry.backend_resource_count(), 0);
    }
}
