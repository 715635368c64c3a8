use std::collections::HashMap;

use crate::{
    rendering::{
        batches::FrameBatches,
        render_common::RenderCommon,
        render_geometry::{RenderGeometry, RenderLines},
        render_material::RenderMaterial,
        texture::GpuTexture,
    },
    scene_graph::{
        geometry::GeometryId, helpers::LineSetId, material::MaterialId, texture::TextureId,
        Material, Scene,
    },
};

/// GPU copies of scene geometry, materials, textures and line sets. Entries are created the
/// first time a frame draws them, and dropped together when the scene is replaced.
pub struct SceneResources {
    pub geometries: HashMap<GeometryId, RenderGeometry>,
    pub lines: HashMap<LineSetId, RenderLines>,
    pub materials: HashMap<MaterialId, RenderMaterial>,
    textures: HashMap<TextureId, GpuTexture>,

    white_texture: GpuTexture,
    sampler: wgpu::Sampler,
}

impl SceneResources {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Material sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            geometries: HashMap::new(),
            lines: HashMap::new(),
            materials: HashMap::new(),
            textures: HashMap::new(),
            white_texture: GpuTexture::white(device, queue),
            sampler,
        }
    }

    pub fn clear(&mut self) {
        self.geometries.clear();
        self.lines.clear();
        self.materials.clear();
        self.textures.clear();
    }

    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        common: &RenderCommon,
        scene: &Scene,
        batches: &FrameBatches,
    ) {
        for batch in &batches.meshes {
            if let Some(geometry) = scene.geometries.get(batch.geometry) {
                self.geometries
                    .entry(batch.geometry)
                    .or_insert_with(|| RenderGeometry::from_geometry(device, geometry));
            }

            let Some(material) = scene.materials.get(batch.material) else {
                continue;
            };

            let texture_id = resolve_map(scene, material);

            if let Some(render_material) = self.materials.get_mut(&batch.material) {
                if render_material.texture == texture_id {
                    render_material.update(queue, material);
                    continue;
                }
                log::debug!("Rebinding material {} to a new map", material.name);
            }

            let texture = texture_id.and_then(|id| scene.textures.get(id).map(|data| (id, data)));
            let map = match texture {
                Some((texture_id, data)) => Some((
                    texture_id,
                    &self
                        .textures
                        .entry(texture_id)
                        .or_insert_with(|| GpuTexture::from_data(device, queue, data))
                        .view,
                )),
                None => None,
            };

            let render_material = RenderMaterial::new(
                device,
                &common.material_bind_group_layout,
                material,
                map,
                &self.white_texture.view,
                &self.sampler,
            );
            self.materials.insert(batch.material, render_material);
        }

        for batch in &batches.lines {
            if let Some(line_set) = scene.line_sets.get(batch.line_set) {
                self.lines
                    .entry(batch.line_set)
                    .or_insert_with(|| RenderLines::from_line_set(device, line_set));
            }
        }
    }
}

/// The texture a material samples. A map pointing at a missing texture draws untextured.
fn resolve_map(scene: &Scene, material: &Material) -> Option<TextureId> {
    material.map.filter(|id| scene.textures.get(*id).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::Color, scene_graph::texture::TextureData};

    fn checker() -> TextureData {
        TextureData::checkerboard(4, 2, Color::WHITE, Color::BLACK)
    }

    #[test]
    fn map_changes_are_visible_to_the_cache() {
        let mut scene = Scene::new();
        let first = scene.add_texture(checker());
        let second = scene.add_texture(checker());
        let id = scene.add_material(Material::basic(0xffffff));

        let material = |scene: &Scene| scene.materials.get(id).cloned().unwrap();
        assert_eq!(resolve_map(&scene, &material(&scene)), None);

        scene.get_material_mut(id).unwrap().map = Some(first);
        assert_eq!(resolve_map(&scene, &material(&scene)), Some(first));

        scene.get_material_mut(id).unwrap().map = Some(second);
        assert_eq!(resolve_map(&scene, &material(&scene)), Some(second));
    }

    #[test]
    fn missing_texture_resolves_to_none() {
        let mut other = Scene::new();
        let foreign = other.add_texture(checker());

        let scene = Scene::new();
        let material = Material::basic(0xffffff).with_map(Some(foreign));
        assert_eq!(resolve_map(&scene, &material), None);
    }
}
