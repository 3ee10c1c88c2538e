//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`SceneNode`] trait with its two node kinds ([`ContainerNode`]
//! for grouping, [`ModelNode`] for instanced models) and [`SceneGraph`], the
//! keyed container the scene inserts its nodes into.

use std::{fmt, ops::Range};

use log::warn;
use wgpu::{Device, util::DeviceExt};

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model,
    },
    render::{Instanced, Render},
};

pub trait SceneNode {
    fn get_world_transforms(&self) -> Vec<Instance>;

    fn get_local_transform(&self, idx: usize) -> Option<Instance>;

    fn set_local_transform(&mut self, idx: usize, instance: Instance);

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device);

    /**
     * Multiple instances of a parent can be passed down to multiple instances of multiple children.
     * The argument `parents_world_transform` with a matching `range` size provides control over which instances are transformed.
     */
    fn update_world_transforms(
        &mut self,
        range: Range<usize>,
        parents_world_transform: &Vec<Instance>,
    );

    fn update_world_transform_all(&mut self);

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize;

    fn get_render(&self) -> Vec<Instanced<'_>>;
}

impl fmt::Debug for dyn SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneNode")
            .field("instances", &self.get_world_transforms().len())
            .field("children", &self.get_children().len())
            .finish()
    }
}

fn propagate(
    instances: &mut [(Instance, Instance)],
    range: Range<usize>,
    parents_world_transform: &Vec<Instance>,
) -> Option<Vec<Instance>> {
    if parents_world_transform.len() > instances.len() {
        warn!(
            "You tried to transform with len {}, but there are only {} instances to transform.",
            parents_world_transform.len(),
            instances.len()
        );
        return None;
    }
    let len = instances.len();
    let Some(slice) = instances.get_mut(range.clone()) else {
        warn!(
            "You tried to transform range {}..{}, which is out of bounds for parent len {}.",
            range.start, range.end, len,
        );
        return None;
    };
    Some(
        slice
            .iter_mut()
            .zip(parents_world_transform.iter())
            .map(|((local, world), parent)| {
                *world = parent * &*local;
                world.clone()
            })
            .collect(),
    )
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

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(
        &mut self,
        range: Range<usize>,
        parents_world_transform: &Vec<Instance>,
    ) {
        let Some(world_transforms) = propagate(&mut self.instances, range.clone(), parents_world_transform)
        else {
            return;
        };
        for child in self.children.iter_mut() {
            child.update_world_transforms(range.clone(), &world_transforms);
        }
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn update_world_transform_all(&mut self) {
        let range = 0..self.instances.len();
        let default_instances = range.clone().map(|_| Instance::default()).collect();
        self.update_world_transforms(range, &default_instances);
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize {
        let len = instances.len();
        self.instances
            .extend(instances.into_iter().map(|instance| (instance.clone(), instance)));
        for child in &mut self.children {
            child.add_instances((0..len).map(|_| Instance::default()).collect());
        }
        self.instances.len()
    }
}

pub struct ModelNode {
    children: Vec<Box<dyn SceneNode>>,
    instance_buffer: wgpu::Buffer,
    instances: Vec<(Instance, Instance)>,
    buffer_size_needs_change: bool,
    model: model::Model,
}

impl ModelNode {
    pub fn from_model(amount: usize, device: &Device, model: model::Model) -> Self {
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
            model,
            buffer_size_needs_change: false,
        }
    }

    /// A single instance of `model` at `instance`, with world transforms and GPU buffer up to date.
    pub fn placed(
        device: &Device,
        queue: &wgpu::Queue,
        model: model::Model,
        instance: Instance,
    ) -> Self {
        let mut node = Self::from_model(1, device, model);
        node.set_local_transform(0, instance);
        node.update_world_transform_all();
        node.write_to_buffers(queue, device);
        node
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

    fn get_world_transforms(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|(_, world)| world)
            .cloned()
            .collect()
    }

    fn update_world_transforms(
        &mut self,
        range: Range<usize>,
        parents_world_transform: &Vec<Instance>,
    ) {
        let Some(world_transforms) = propagate(&mut self.instances, range.clone(), parents_world_transform)
        else {
            return;
        };
        for child in self.children.iter_mut() {
            child.update_world_transforms(range.clone(), &world_transforms);
        }
    }

    fn get_local_transform(&self, idx: usize) -> Option<Instance> {
        self.instances.get(idx).map(|(local, _)| local).cloned()
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        let raw_instances: Vec<InstanceRaw> = self
            .instances
            .iter()
            .map(|(_, world)| world.to_raw())
            .collect();
        if self.buffer_size_needs_change {
            self.instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(&raw_instances),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            self.buffer_size_needs_change = false;
        } else {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&raw_instances),
            );
        }
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue, device));
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn update_world_transform_all(&mut self) {
        let range = 0..self.instances.len();
        let default_instances = range.clone().map(|_| Instance::default()).collect();
        self.update_world_transforms(range, &default_instances);
    }

    fn get_render(&self) -> Vec<Instanced<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .chain([Instanced {
                instance: &self.instance_buffer,
                model: &self.model,
                amount: self.instances.len(),
            }])
            .collect()
    }

    fn add_instances(&mut self, instances: Vec<Instance>) -> usize {
        let len = instances.len();
        self.instances
            .extend(instances.into_iter().map(|instance| (instance.clone(), instance)));
        for child in &mut self.children {
            child.add_instances((0..len).map(|_| Instance::default()).collect());
        }
        self.buffer_size_needs_change = true;
        self.instances.len()
    }
}

/// Returned when a key is inserted a second time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scene node {0:?} was already inserted")]
pub struct AlreadyInserted(pub String);

/// Insertion-ordered nodes keyed by name.
///
/// Every key is inserted at most once and nodes are never removed, so the
/// graph only ever grows.
pub struct SceneGraph<N = Box<dyn SceneNode>> {
    nodes: Vec<(String, N)>,
}

impl<N> SceneGraph<N> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, node: N) -> Result<usize, AlreadyInserted> {
        let key = key.into();
        if self.contains(&key) {
            return Err(AlreadyInserted(key));
        }
        self.nodes.push((key, node));
        Ok(self.nodes.len())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.nodes.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&N> {
        self.nodes.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(k, _)| k.as_str())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter().map(|(_, n)| n)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N> Default for SceneGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph<Box<dyn SceneNode>> {
    /// Everything in the graph, split into opaque and translucent draws.
    pub fn render(&self) -> Render<'_> {
        let (translucent, opaque): (Vec<_>, Vec<_>) = self
            .nodes()
            .flat_map(|node| node.get_render())
            .partition(|instanced| instanced.model.is_translucent());
        Render::Composed(vec![Render::Defaults(opaque), Render::Transparents(translucent)])
    }
}
