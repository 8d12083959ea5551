use anyhow::{Context, bail};

use crate::{
    data_structures::{
        model,
        scene_graph::{ContainerNode, SceneNode, to_scene_node},
        texture::Texture,
    },
    resources::texture::{diffuse_normal_layout, load_binary, load_texture},
};

/**
 * This module contains all logic for loading meshes and textures from external files.
 */
pub mod texture;

const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

/// Load a glTF / GLB file into a scene graph.
///
/// Every scene's root nodes end up below one root; a file with a single root
/// node returns that node directly.
pub async fn load_model_gltf(
    file_name: &str,
    id: u32,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Box<dyn SceneNode>> {
    let gltf_bytes = load_binary(file_name)
        .await
        .with_context(|| format!("cannot read {file_name}"))?;
    let gltf = parse_gltf(file_name, &gltf_bytes)?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf
                    .blob
                    .as_deref()
                    .with_context(|| format!("{file_name} references a missing binary chunk"))?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }

    // Load materials
    let layout = diffuse_normal_layout(device);
    let name = format!("{}.gltf", file_name);
    let mut materials = Vec::new();
    for material in gltf.materials() {
        let pbr = material.pbr_metallic_roughness();
        let diffuse_texture = match pbr.base_color_texture() {
            Some(info) => {
                load_image(info.texture().source().source(), &buffer_data, file_name, false, device, queue)
                    .await?
            }
            None => Texture::create_base_colour(pbr.base_color_factor(), device, queue),
        };
        let normal_texture = match material.normal_texture() {
            Some(normal) => {
                load_image(normal.texture().source().source(), &buffer_data, file_name, true, device, queue)
                    .await?
            }
            None => Texture::create_default_normal_map(device, queue),
        };
        materials.push(model::Material::new(
            device,
            &name,
            diffuse_texture,
            normal_texture,
            &layout,
        ));
    }
    if materials.is_empty() {
        log::warn!("{file_name} has no materials, falling back to plain white");
        materials.push(model::Material::new(
            device,
            &name,
            Texture::create_base_colour([1.0; 4], device, queue),
            Texture::create_default_normal_map(device, queue),
            &layout,
        ));
    }

    let mut models = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            models.push(to_scene_node(id, node, &buffer_data, device, &materials));
        }
    }

    let root_node: Box<dyn SceneNode> = match models.len() {
        0 => bail!("{file_name} contains no nodes"),
        1 => models.remove(0),
        _ => {
            let mut root_node = ContainerNode::new(1);
            root_node.children = models;
            Box::new(root_node)
        }
    };

    Ok(root_node)
}

/// Parse a glTF / GLB document.
///
/// Draco compressed meshes are rejected before validation so the error names
/// the extension instead of reporting an unsupported `extensionsRequired` entry.
pub fn parse_gltf(file_name: &str, bytes: &[u8]) -> anyhow::Result<gltf::Gltf> {
    let unchecked = gltf::Gltf::from_slice_without_validation(bytes)
        .with_context(|| format!("{file_name} is not a valid glTF file"))?;
    if unchecked.extensions_required().any(|ext| ext == DRACO_EXTENSION) {
        bail!("{file_name} uses {DRACO_EXTENSION}, re-export it without mesh compression");
    }
    gltf::Gltf::from_slice(bytes).with_context(|| format!("{file_name} is not a valid glTF file"))
}

async fn load_image(
    source: gltf::image::Source<'_>,
    buffer_data: &[Vec<u8>],
    file_name: &str,
    is_normal_map: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<Texture> {
    match source {
        gltf::image::Source::View { view, mime_type } => {
            let buffer = buffer_data
                .get(view.buffer().index())
                .with_context(|| format!("{file_name} references a missing buffer"))?;
            let bytes = buffer
                .get(view.offset()..view.offset() + view.length())
                .with_context(|| format!("image view out of bounds in {file_name}"))?;
            Texture::from_bytes(
                device,
                queue,
                bytes,
                file_name,
                mime_type.split('/').next_back(),
                is_normal_map,
            )
        }
        gltf::image::Source::Uri { uri, mime_type } => {
            let format = mime_type.and_then(|mt| mt.split('/').next_back());
            load_texture(uri, is_normal_map, device, queue, format).await
        }
    }
}
