//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`SceneNode`] trait and its two implementations: a
//! [`ContainerNode`] that only groups children (like the carousel ring or a glTF
//! node without a mesh) and a [`ModelNode`] that owns GPU meshes and an instance
//! buffer.

use std::ops::Range;

use log::warn;
use wgpu::{Device, util::DeviceExt};

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model,
    },
    render::Instanced,
};

/// Convert a glTF node (and its children) into scene nodes.
///
/// Nodes with a mesh become [`ModelNode`]s, the rest become [`ContainerNode`]s
/// so that the node hierarchy and its local transforms survive.
pub fn to_scene_node(
    id: u32,
    node: gltf::scene::Node,
    buf: &[Vec<u8>],
    device: &wgpu::Device,
    mats: &[model::Material],
) -> Box<dyn SceneNode> {
    let mut scene_node: Box<dyn SceneNode> = match node.mesh() {
        Some(mesh) => {
            let mut meshes = Vec::new();

            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| buf.get(buffer.index()).map(Vec::as_slice));

                let mut vertices: Vec<model::ModelVertex> = match reader.read_positions() {
                    Some(positions) => positions
                        .map(|position| model::ModelVertex {
                            position,
                            ..Default::default()
                        })
                        .collect(),
                    None => {
                        warn!(
                            "primitive {} of mesh {:?} has no positions and is skipped",
                            primitive.index(),
                            mesh.name()
                        );
                        continue;
                    }
                };
                if let Some(normals) = reader.read_normals() {
                    vertices
                        .iter_mut()
                        .zip(normals)
                        .for_each(|(vertex, normal)| vertex.normal = normal);
                }
                if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
                    vertices
                        .iter_mut()
                        .zip(tex_coords)
                        .for_each(|(vertex, tex_coord)| vertex.tex_coords = tex_coord);
                }
                if let Some(tangents) = reader.read_tangents() {
                    vertices.iter_mut().zip(tangents).for_each(|(vertex, tangent)| {
                        // GLTF represents tangents as vec4 where the 4th elem can be used to calculate the bitangent
                        let tangent: cgmath::Vector4<f32> = tangent.into();
                        vertex.tangent = tangent.truncate().into();
                        let normal: cgmath::Vector3<f32> = vertex.normal.into();
                        vertex.bitangent = (normal.cross(tangent.truncate()) * tangent.w).into();
                    });
                }

                let indices: Vec<u32> = match reader.read_indices() {
                    Some(indices) => indices.into_u32().collect(),
                    None => (0..vertices.len() as u32).collect(),
                };
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Vertex Buffer", mesh.name())),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });

                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Index Buffer", mesh.name())),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

                meshes.push(model::Mesh {
                    name: mesh.name().unwrap_or("unknown_mesh").to_string(),
                    vertex_buffer,
                    index_buffer,
                    num_elements: indices.len() as u32,
                    material: primitive.material().index().unwrap_or(0),
                });
            }
            // TODO: only hand the materials referenced by this mesh to the model
            let model = model::Model {
                meshes,
                materials: mats.to_vec(),
            };
            Box::new(ModelNode::from_model(1, id, device, model))
        }
        None => Box::new(ContainerNode::new(1)),
    };
    let (position, rotation, scale) = node.transform().decomposed();
    let instance = Instance {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    scene_node.set_local_transform(0, instance);
    for child in node.children() {
        let child_node = to_scene_node(id, child, buf, device, mats);
        scene_node.add_child(child_node);
    }

    scene_node
}

pub trait SceneNode {
    fn get_world_transforms(&self) -> Vec<Instance>;

    fn get_local_transform(&self, idx: usize) -> Option<Instance>;

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn set_local_transform(&mut self, idx: usize, instance: Instance);

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance));

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn write_to_buffers(&mut self, queue: &wgpu::Queue);

    /**
     * Multiple instances of a parent can be passed down to multiple instances of multiple children.
     * The argument `parents_world_transform` with a matching `range` size provides control over which instances are transformed.
     */
    fn update_world_transforms(&mut self, range: Range<usize>, parents_world_transform: &[Instance]);

    fn update_world_transform_all(&mut self);

    fn get_render(&self) -> Vec<Instanced<'_>>;
}

/// Shared by both node kinds: world = parent * local for the instances in
/// `range`, then recurse into the children.
fn propagate(
    instances: &mut [(Instance, Instance)],
    children: &mut [Box<dyn SceneNode>],
    range: Range<usize>,
    parents_world_transform: &[Instance],
) {
    if parents_world_transform.len() > instances.len() {
        warn!(
            "You tried to transform with len {}, but there are only {} instances to transform.",
            parents_world_transform.len(),
            instances.len()
        );
        return;
    }
    let Some(slots) = instances.get_mut(range.clone()) else {
        warn!(
            "You tried to transform range {}..{}, which is out of bounds for parent len {}.",
            range.start,
            range.end,
            instances.len(),
        );
        return;
    };
    let world_transforms = slots
        .iter_mut()
        .zip(parents_world_transform)
        .map(|((local, world), parent)| {
            *world = parent * &*local;
            world.clone()
        })
        .collect::<Vec<_>>();
    for child in children.iter_mut() {
        child.update_world_transforms(range.clone(), &world_transforms);
    }
}

fn identities(amount: usize) -> Vec<Instance> {
    (0..amount).map(|_| Instance::default()).collect()
}

pub struct ContainerNode {
    pub children: Vec<Box<dyn SceneNode>>,
    pub instances: Vec<(Instance, Instance)>,
}

impl ContainerNode {
    pub fn new(amount: usize) -> Self {
        let instances = (0..amount)
            .map(|_| (Instance::default(), Instance::default()))
            .collect();
        Self {
            instances,
            children: vec![],
        }
    }
}

impl SceneNode for ContainerNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn set_local_transform(&mut self, idx: usize, instance: Instance) {
        if let Some((local, _)) = self.instances.get_mut(idx) {
            *local = instance;
        }
    }

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        self.instances.iter_mut().for_each(|(local, _)| {
            mutation(local);
        });
    }

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(&mut self, range: Range<usize>, parents_world_transform: &[Instance]) {
        propagate(
            &mut self.instances,
            &mut self.children,
            range,
            parents_world_transform,
        );
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn update_world_transform_all(&mut self) {
        let range = 0..self.instances.len();
        self.update_world_transforms(range.clone(), &identities(range.len()));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instance_buffer: wgpu::Buffer,
    instances: Vec<(Instance, Instance)>,
    model: model::Model,
    id: u32,
}

impl ModelNode {
    pub fn from_model(amount: usize, id: u32, device: &Device, obj_model: model::Model) -> Self {
        let instances = (0..amount)
            .map(|_| (Instance::default(), Instance::default()))
            .collect::<Vec<_>>();

        let instance_data = instances
            .iter()
            .map(|(_, world)| world)
            .map(Instance::to_raw)
            .collect::<Vec<_>>();

        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Instance Buffer"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            children: vec![],
            instance_buffer,
            instances,
            model: obj_model,
            id,
        }
    }
}

impl SceneNode for ModelNode {
    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn set_local_transform(&mut self, idx: usize, instance: Instance) {
        if let Some((local, _)) = self.instances.get_mut(idx) {
            *local = instance;
        }
    }

    fn set_local_transform_all(&mut self, mutation: &mut dyn FnMut(&mut Instance)) {
        self.instances
            .iter_mut()
            .for_each(|(local, _)| mutation(local));
    }

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(&mut self, range: Range<usize>, parents_world_transform: &[Instance]) {
        propagate(
            &mut self.instances,
            &mut self.children,
            range,
            parents_world_transform,
        );
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    // The instance count never changes after loading, so the buffer is only rewritten.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        let raw_instances: Vec<InstanceRaw> = self
            .instances
            .iter()
            .map(|(_, world)| world.to_raw())
            .collect();
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&raw_instances),
        );
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn update_world_transform_all(&mut self) {
        let range = 0..self.instances.len();
        self.update_world_transforms(range.clone(), &identities(range.len()));
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: self.instances.len(),
                id: self.id,
            }])
            .collect()
    }
}
