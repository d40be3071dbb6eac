//! This module mainly exposes the [`PassBuilder`] struct, the only way a pass declares what it does to the
//! [`FrameGraph`](crate::FrameGraph).
//!
//! For documentation on how to use the frame graph, refer to the [`graph`](crate::graph) module level documentation.
//! Each pass is registered with two closures. The setup closure runs immediately and uses the builder to declare reads,
//! writes and new transient resources, filling in a pass-local data block along the way. The execute closure runs
//! later, during [`FrameGraph::execute()`](crate::FrameGraph::execute), and receives that data block back together with
//! the device command context and a resolver for the physical resources.
//!
//! # Example
//!
//! A pass that downsamples an input texture into a new, half resolution texture.
//! ```ignore
//! use framegraph as fg;
//!
//! #[derive(Default, Clone)]
//! struct Downsample {
//!     input: fg::TextureHandle,
//!     output: fg::TextureHandle,
//! }
//!
//! let downsample = graph.add_pass(
//!     "downsample",
//!     |builder, data: &mut Downsample| {
//!         data.input = builder.read(scene_color);
//!         let mut output = builder.create_texture("half_res", fg::TextureDesc::new_2d(960, 540, fg::TextureFormat::Rgba16Float));
//!         data.output = builder.write(&mut output);
//!     },
//!     |data, cmd, resources| {
//!         let input = resources.texture(data.input)?;
//!         let output = resources.texture(data.output)?;
//!         cmd.blit(input, output);
//!         Ok(())
//!     },
//! );
//! ```
//! Since nothing reads `downsample.output` yet, compiling this graph culls the pass and never creates `half_res`.

use anyhow::Result;

use crate::core::device::Device;
use crate::graph::pass_graph::FrameGraph;
use crate::graph::physical_resource::PassResources;
use crate::graph::virtual_resource::{Handle, NodeId, PassId, ResourceId, ResourceKind, TextureHandle, BufferHandle};
use crate::resource::desc::{BufferDesc, TextureDesc};

/// Defines a pass executor that is called when the pass executes.
pub trait PassExecutor<D: Device> {
    /// Record this pass into the command context.
    fn execute(&mut self, cmd: &mut D::CommandContext, resources: &PassResources<D>) -> Result<()>;
}

impl<D, F> PassExecutor<D> for F
where
    D: Device,
    F: FnMut(&mut D::CommandContext, &PassResources<D>) -> Result<()>,
{
    /// Execute this pass by calling the given function.
    fn execute(&mut self, cmd: &mut D::CommandContext, resources: &PassResources<D>) -> Result<()> {
        self(cmd, resources)
    }
}

pub(crate) type BoxedPassFn<'cb, D> = Box<dyn PassExecutor<D> + 'cb>;

/// An empty pass executor that does nothing
pub struct EmptyPassExecutor;

impl EmptyPassExecutor {
    /// Creates an empty pass executor
    pub fn new() -> Self {
        Self {}
    }

    /// Create a new empty pass executor in a [`Box`]
    pub fn new_boxed() -> Box<Self> {
        Box::new(Self::new())
    }
}

impl Default for EmptyPassExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> PassExecutor<D> for EmptyPassExecutor {
    fn execute(&mut self, _cmd: &mut D::CommandContext, _resources: &PassResources<D>) -> Result<()> {
        Ok(())
    }
}

/// Executor owning the pass-local data block filled in by the setup closure.
pub(crate) struct DataPassExecutor<T, F> {
    pub(crate) data: T,
    pub(crate) func: F,
}

impl<D, T, F> PassExecutor<D> for DataPassExecutor<T, F>
where
    D: Device,
    F: FnMut(&T, &mut D::CommandContext, &PassResources<D>) -> Result<()>,
{
    fn execute(&mut self, cmd: &mut D::CommandContext, resources: &PassResources<D>) -> Result<()> {
        (self.func)(&self.data, cmd, resources)
    }
}

/// Represents one pass in a frame graph. Passes are created through [`FrameGraph::add_pass()`](crate::FrameGraph::add_pass).
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Pass<'cb, D: Device> {
    pub(crate) id: PassId,
    pub(crate) name: String,
    pub(crate) reads: Vec<NodeId>,
    pub(crate) writes: Vec<NodeId>,
    pub(crate) never_cull: bool,
    pub(crate) ref_count: u32,
    pub(crate) creates: Vec<ResourceId>,
    pub(crate) destroys: Vec<ResourceId>,
    #[derivative(Debug = "ignore")]
    pub(crate) execute: BoxedPassFn<'cb, D>,
}

impl<'cb, D: Device> Pass<'cb, D> {
    pub(crate) fn new(id: PassId, name: String, execute: BoxedPassFn<'cb, D>) -> Self {
        Self {
            id,
            name,
            reads: vec![],
            writes: vec![],
            never_cull: false,
            ref_count: 0,
            creates: vec![],
            destroys: vec![],
            execute,
        }
    }

    /// Get the pass name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pass id. This is also the position of the pass in the execution order.
    pub fn id(&self) -> PassId {
        self.id
    }

    /// Nodes this pass reads.
    pub fn reads(&self) -> &[NodeId] {
        &self.reads
    }

    /// Nodes this pass produces.
    pub fn writes(&self) -> &[NodeId] {
        &self.writes
    }

    /// Whether this pass always executes.
    pub fn is_never_cull(&self) -> bool {
        self.never_cull
    }

    /// Reference count after compiling. Passes with a reference count of zero are skipped.
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// Whether compiling removed this pass from execution.
    pub fn is_culled(&self) -> bool {
        self.ref_count == 0
    }

    /// Resources materialized right before this pass executes.
    pub fn creates(&self) -> &[ResourceId] {
        &self.creates
    }

    /// Resources released right after this pass executes.
    pub fn destroys(&self) -> &[ResourceId] {
        &self.destroys
    }

    pub(crate) fn reset_compile_state(&mut self) {
        self.ref_count = 0;
        self.creates.clear();
        self.destroys.clear();
    }
}

/// Used to declare the resources of a pass while it is being added to a [`FrameGraph`](crate::FrameGraph).
/// # Example
/// See the [`pass`](crate::graph::pass) module level documentation.
pub struct PassBuilder<'g, 'cb, D: Device> {
    graph: &'g mut FrameGraph<'cb, D>,
    pass: PassId,
}

impl<'g, 'cb, D: Device> PassBuilder<'g, 'cb, D> {
    pub(crate) fn new(graph: &'g mut FrameGraph<'cb, D>, pass: PassId) -> Self {
        Self {
            graph,
            pass,
        }
    }

    /// Get the id of the pass being built.
    pub fn id(&self) -> PassId {
        self.pass
    }

    /// Get the name of the pass being built.
    pub fn name(&self) -> &str {
        &self.graph.passes[self.pass.index()].name
    }

    /// Declare that this pass reads `handle`. Returns the same handle for convenience.
    /// # Panics
    /// * If the handle is invalid.
    /// * If the handle does not refer to the latest version of its resource.
    /// * If this pass already reads this exact version.
    pub fn read<K: ResourceKind>(&mut self, handle: Handle<K>) -> Handle<K> {
        let node = self.graph.checked_node(handle);
        let version = self.graph.nodes[node.index()].version;
        let resource = &self.graph.resources[self.graph.nodes[node.index()].resource.index()];
        assert_eq!(
            version, resource.version,
            "Stale read of `{}`: handle refers to version {}, but the resource is at version {}",
            resource.name, version, resource.version
        );

        let pass = &mut self.graph.passes[self.pass.index()];
        assert!(
            !pass.reads.contains(&node),
            "Pass `{}` declares a read of `{}` twice",
            pass.name,
            self.graph.resources[self.graph.nodes[node.index()].resource.index()].name
        );
        pass.reads.push(node);
        handle
    }

    /// Declare that this pass writes `handle`. The handle is invalidated, use the returned handle to refer to the
    /// result of this write from other passes.
    ///
    /// Writing an imported resource marks the pass as never-cull, since the write is observable outside the graph.
    /// # Panics
    /// * If the handle is invalid.
    /// * If the handle does not refer to the latest version of its resource.
    /// * If this pass already writes the same resource.
    pub fn write<K: ResourceKind>(&mut self, handle: &mut Handle<K>) -> Handle<K> {
        let node = self.graph.checked_node(*handle);
        let resource_id = self.graph.nodes[node.index()].resource;
        let version = self.graph.nodes[node.index()].version;
        let resource = &mut self.graph.resources[resource_id.index()];
        assert_eq!(
            version, resource.version,
            "Version mismatch writing `{}`: handle refers to version {}, but the resource is at version {}",
            resource.name, version, resource.version
        );

        let nodes = &self.graph.nodes;
        let pass = &mut self.graph.passes[self.pass.index()];
        assert!(
            !pass.writes.iter().any(|write| nodes[write.index()].resource == resource_id),
            "Pass `{}` declares a write to `{}` twice",
            pass.name,
            resource.name
        );

        if resource.imported {
            pass.never_cull = true;
        }
        resource.version += 1;
        let new_version = resource.version;
        handle.invalidate();
        let new_node = self.graph.push_node(resource_id, new_version, Some(self.pass));
        self.graph.passes[self.pass.index()].writes.push(new_node);
        Handle::new(new_node)
    }

    /// Create a new transient texture. The returned handle refers to its initial, undefined contents.
    pub fn create_texture(&mut self, name: impl Into<String>, desc: TextureDesc) -> TextureHandle {
        self.graph.create_texture(name, desc)
    }

    /// Create a new transient buffer. The returned handle refers to its initial, undefined contents.
    pub fn create_buffer(&mut self, name: impl Into<String>, desc: BufferDesc) -> BufferHandle {
        self.graph.create_buffer(name, desc)
    }

    /// Force this pass to always execute, even if nothing reads its outputs. Use this for passes with externally observable
    /// effects like presentation, UI or readbacks.
    pub fn never_cull(&mut self) -> &mut Self {
        self.graph.passes[self.pass.index()].never_cull = true;
        self
    }
}
