//! The pass graph module holds the frame graph itself: the arenas of resources, nodes and passes, and every operation
//! that registers something in them.
//!
//! Compilation is implemented in [`compile`](crate::graph::compile), execution in [`record`](crate::graph::record).

use std::sync::Arc;

use anyhow::Result;

use crate::core::device::Device;
use crate::core::settings::GraphSettings;
use crate::graph::pass::{BoxedPassFn, DataPassExecutor, EmptyPassExecutor, Pass, PassBuilder};
use crate::graph::physical_resource::{PassResources, PhysicalResource, PhysicalResourceBindings};
use crate::graph::virtual_resource::{
    BufferHandle, Handle, NodeId, PassId, ResourceEntry, ResourceId, ResourceKind, ResourceNode, TextureHandle,
};
use crate::resource::desc::{BufferDesc, ResourceDesc, TextureDesc};

/// Frame graph, used to cull and schedule the GPU work of a single frame.
///
/// A frame graph is built, compiled and executed once, then discarded. Resources, nodes and passes are only ever
/// appended, compiling only computes derived scheduling data, and executing is the only step with side effects.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct FrameGraph<'cb, D: Device> {
    pub(crate) settings: GraphSettings,
    pub(crate) resources: Vec<ResourceEntry>,
    pub(crate) nodes: Vec<ResourceNode>,
    pub(crate) passes: Vec<Pass<'cb, D>>,
    pub(crate) aliases: Vec<(NodeId, NodeId)>,
    #[derivative(Debug = "ignore")]
    pub(crate) bindings: PhysicalResourceBindings<D>,
    pub(crate) compiled: bool,
}

impl<'cb, D: Device> Default for FrameGraph<'cb, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cb, D: Device> FrameGraph<'cb, D> {
    /// Create an empty frame graph with default settings.
    pub fn new() -> Self {
        Self::with_settings(GraphSettings::default())
    }

    /// Create an empty frame graph.
    pub fn with_settings(settings: GraphSettings) -> Self {
        Self {
            settings,
            resources: vec![],
            nodes: vec![],
            passes: vec![],
            aliases: vec![],
            bindings: PhysicalResourceBindings::new(),
            compiled: false,
        }
    }

    /// Get the settings this graph was created with.
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Add a pass to the graph.
    ///
    /// `setup` is called immediately with a [`PassBuilder`] for the new pass and a default-initialized data block.
    /// The data block is moved into the pass and handed to `execute` when the graph executes. A copy of the data block
    /// is returned, so later passes can refer to the handles it holds.
    /// # Panics
    /// * If adding this pass exceeds [`GraphSettings::max_passes`].
    /// * If `setup` violates any of the [`PassBuilder`] contracts.
    pub fn add_pass<T, S, E>(&mut self, name: impl Into<String>, setup: S, execute: E) -> T
    where
        T: Default + Clone + 'cb,
        S: FnOnce(&mut PassBuilder<'_, 'cb, D>, &mut T),
        E: FnMut(&T, &mut D::CommandContext, &PassResources<D>) -> Result<()> + 'cb, {
        let id = self.push_pass(name.into(), EmptyPassExecutor::new_boxed());
        let mut data = T::default();
        {
            let mut builder = PassBuilder::new(self, id);
            setup(&mut builder, &mut data);
        }
        let result = data.clone();
        self.passes[id.index()].execute = Box::new(DataPassExecutor {
            data,
            func: execute,
        });
        result
    }

    /// Add a pass that only reads `handle` and is never culled, marking it as an output of the frame.
    /// The pass is named `present <resource>`. Returns the id of the new pass.
    pub fn present<K: ResourceKind>(&mut self, handle: Handle<K>) -> PassId {
        let name = format!("present {}", self.resource_of(handle).name);
        let id = self.push_pass(name, EmptyPassExecutor::new_boxed());
        let mut builder = PassBuilder::new(self, id);
        builder.read(handle);
        builder.never_cull();
        id
    }

    /// Create a new transient texture outside of any pass.
    pub fn create_texture(&mut self, name: impl Into<String>, desc: TextureDesc) -> TextureHandle {
        Handle::new(self.push_resource(name.into(), ResourceDesc::Texture(desc), None))
    }

    /// Create a new transient buffer outside of any pass.
    pub fn create_buffer(&mut self, name: impl Into<String>, desc: BufferDesc) -> BufferHandle {
        Handle::new(self.push_resource(name.into(), ResourceDesc::Buffer(desc), None))
    }

    /// Import an externally owned texture. The graph never creates or destroys it, and every pass writing it is never culled.
    pub fn import_texture(&mut self, name: impl Into<String>, desc: TextureDesc, texture: Arc<D::Texture>) -> TextureHandle {
        Handle::new(self.push_resource(name.into(), ResourceDesc::Texture(desc), Some(PhysicalResource::Texture(texture))))
    }

    /// Import an externally owned buffer. The graph never creates or destroys it, and every pass writing it is never culled.
    pub fn import_buffer(&mut self, name: impl Into<String>, desc: BufferDesc, buffer: Arc<D::Buffer>) -> BufferHandle {
        Handle::new(self.push_resource(name.into(), ResourceDesc::Buffer(desc), Some(PhysicalResource::Buffer(buffer))))
    }

    /// Request that `to` is backed by the same physical resource as `from` when the graph is compiled.
    ///
    /// When compiling, every version of `to`'s resource is rerouted to `from`'s resource, every pass reading `from` also
    /// reads `to`, and the pass that produced `from` loses that write, so the producer of `to` takes over.
    /// # Panics
    /// If either handle is invalid.
    pub fn move_resource<K: ResourceKind>(&mut self, from: Handle<K>, to: Handle<K>) {
        let from = self.checked_node(from);
        let to = self.checked_node(to);
        self.aliases.push((from, to));
        self.compiled = false;
    }

    /// Whether the graph was compiled and not modified since.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Get a pass by id.
    pub fn pass(&self, id: PassId) -> &Pass<'cb, D> {
        &self.passes[id.index()]
    }

    /// Iterate over all passes in registration order.
    pub fn passes(&self) -> impl Iterator<Item = &Pass<'cb, D>> {
        self.passes.iter()
    }

    /// Find a pass by name.
    pub fn find_pass(&self, name: &str) -> Option<&Pass<'cb, D>> {
        self.passes.iter().find(|pass| pass.name == name)
    }

    /// Get a resource by id.
    pub fn resource(&self, id: ResourceId) -> &ResourceEntry {
        &self.resources[id.index()]
    }

    /// Iterate over all resources in creation order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.resources.iter()
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &ResourceNode {
        &self.nodes[id.index()]
    }

    /// Iterate over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    /// Get the resource a handle refers to.
    /// # Panics
    /// If the handle is invalid.
    pub fn resource_of<K: ResourceKind>(&self, handle: Handle<K>) -> &ResourceEntry {
        let node = self.checked_node(handle);
        &self.resources[self.nodes[node.index()].resource.index()]
    }

    /// Get the version a handle refers to.
    /// # Panics
    /// If the handle is invalid.
    pub fn version_of<K: ResourceKind>(&self, handle: Handle<K>) -> u32 {
        self.nodes[self.checked_node(handle).index()].version
    }

    /// Returns the total amount of passes in the graph.
    pub fn num_passes(&self) -> usize {
        self.passes.len()
    }

    pub(crate) fn checked_node<K: ResourceKind>(&self, handle: Handle<K>) -> NodeId {
        assert!(handle.is_valid(), "Use of an invalidated {:?} handle", K::TYPE);
        let node = handle.node();
        assert!(node.index() < self.nodes.len(), "{handle:?} does not belong to this frame graph");
        let resource = &self.resources[self.nodes[node.index()].resource.index()];
        assert_eq!(
            resource.resource_type(),
            K::TYPE,
            "{handle:?} refers to `{}`, which is not a {:?}",
            resource.name,
            K::TYPE
        );
        node
    }

    pub(crate) fn push_node(&mut self, resource: ResourceId, version: u32, writer: Option<PassId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ResourceNode {
            resource,
            version,
            writer,
            ref_count: 0,
        });
        id
    }

    fn push_resource(&mut self, name: String, desc: ResourceDesc, import: Option<PhysicalResource<D>>) -> NodeId {
        assert!(
            self.resources.len() < self.settings.max_resources,
            "Frame graph resource limit of {} exceeded while adding `{name}`",
            self.settings.max_resources
        );
        let id = ResourceId(self.resources.len() as u32);
        self.resources.push(ResourceEntry::new(id, name, desc, import.is_some()));
        if let Some(physical) = import {
            self.bindings.bind(id, physical);
        }
        self.compiled = false;
        self.push_node(id, 0, None)
    }

    fn push_pass(&mut self, name: String, execute: BoxedPassFn<'cb, D>) -> PassId {
        assert!(
            self.passes.len() < self.settings.max_passes,
            "Frame graph pass limit of {} exceeded while adding `{name}`",
            self.settings.max_passes
        );
        let id = PassId(self.passes.len() as u32);
        self.passes.push(Pass::new(id, name, execute));
        self.compiled = false;
        id
    }
}
