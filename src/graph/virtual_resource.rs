//! Virtual resources, their versioned nodes and the handles passes use to refer to them.
//!
//! All records live in append-only arenas owned by the [`FrameGraph`](crate::FrameGraph) and refer to each other
//! through plain indices. Every creation, import and write of a resource produces a new [`ResourceNode`] holding the
//! version of the resource at that point.

use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::graph::resource::ResourceType;
use crate::resource::desc::ResourceDesc;

/// Index of a [`ResourceEntry`] in a frame graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(pub(crate) u32);

/// Index of a [`ResourceNode`] in a frame graph.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// Index of a pass in a frame graph. Passes are numbered in registration order, which is also their execution order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassId(pub(crate) u32);

macro_rules! arena_index {
    ($name:ident) => {
        impl $name {
            pub(crate) fn index(&self) -> usize {
                self.0 as usize
            }

            /// Get the raw index.
            pub fn raw(&self) -> u32 {
                self.0
            }
        }
    };
}

arena_index!(ResourceId);
arena_index!(NodeId);
arena_index!(PassId);

impl NodeId {
    const INVALID: NodeId = NodeId(u32::MAX);
}

/// Compile-time resource kind of a [`Handle`].
pub trait ResourceKind {
    /// Runtime resource type matching this kind.
    const TYPE: ResourceType;
}

/// Marker for texture handles.
#[derive(Debug)]
pub enum Texture {}

/// Marker for buffer handles.
#[derive(Debug)]
pub enum Buffer {}

impl ResourceKind for Texture {
    const TYPE: ResourceType = ResourceType::Texture;
}

impl ResourceKind for Buffer {
    const TYPE: ResourceType = ResourceType::Buffer;
}

/// Handle to one version of a resource.
///
/// Handles are cheap to copy, and any copy can be read from as many passes as needed. Writing through a handle with
/// [`PassBuilder::write()`](crate::PassBuilder::write) invalidates it and returns a handle to the next version.
/// The default handle is invalid.
pub struct Handle<K: ResourceKind> {
    node: NodeId,
    _kind: PhantomData<fn() -> K>,
}

/// Handle to a texture version.
pub type TextureHandle = Handle<Texture>;
/// Handle to a buffer version.
pub type BufferHandle = Handle<Buffer>;

const_assert_eq!(std::mem::size_of::<TextureHandle>(), std::mem::size_of::<u32>());
assert_impl_all!(BufferHandle: Copy, Send, Sync);

impl<K: ResourceKind> Handle<K> {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            _kind: PhantomData,
        }
    }

    /// Returns an invalid handle.
    pub fn invalid() -> Self {
        Self::new(NodeId::INVALID)
    }

    /// Whether this handle can still be used.
    pub fn is_valid(&self) -> bool {
        self.node != NodeId::INVALID
    }

    /// The node this handle refers to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn invalidate(&mut self) {
        self.node = NodeId::INVALID;
    }
}

impl<K: ResourceKind> Default for Handle<K> {
    fn default() -> Self {
        Self::invalid()
    }
}

impl<K: ResourceKind> Clone for Handle<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ResourceKind> Copy for Handle<K> {}

impl<K: ResourceKind> PartialEq for Handle<K> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<K: ResourceKind> Eq for Handle<K> {}

impl<K: ResourceKind> Hash for Handle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<K: ResourceKind> Debug for Handle<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "{:?}Handle({})", K::TYPE, self.node.0)
        } else {
            write!(f, "{:?}Handle(invalid)", K::TYPE)
        }
    }
}

/// One logical resource tracked by the graph, independent of its physical backing.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub(crate) id: ResourceId,
    pub(crate) name: String,
    pub(crate) desc: ResourceDesc,
    pub(crate) imported: bool,
    pub(crate) version: u32,
    pub(crate) ref_count: u32,
    pub(crate) first_use: Option<PassId>,
    pub(crate) last_use: Option<PassId>,
}

impl ResourceEntry {
    pub(crate) fn new(id: ResourceId, name: String, desc: ResourceDesc, imported: bool) -> Self {
        Self {
            id,
            name,
            desc,
            imported,
            version: 0,
            ref_count: 0,
            first_use: None,
            last_use: None,
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &ResourceDesc {
        &self.desc
    }

    pub fn resource_type(&self) -> ResourceType {
        self.desc.resource_type()
    }

    /// Imported resources are owned outside the graph and never created or destroyed by it.
    pub fn is_imported(&self) -> bool {
        self.imported
    }

    /// Current version. Starts at zero and is incremented by every write.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Amount of references left after compiling. Zero means the resource is never materialized.
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }

    /// First pass using this resource after compiling.
    pub fn first_use(&self) -> Option<PassId> {
        self.first_use
    }

    /// Last pass using this resource after compiling.
    pub fn last_use(&self) -> Option<PassId> {
        self.last_use
    }

    pub(crate) fn reset_compile_state(&mut self) {
        self.ref_count = 0;
        self.first_use = None;
        self.last_use = None;
    }
}

/// Immutable snapshot of one version of a resource.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    pub(crate) resource: ResourceId,
    pub(crate) version: u32,
    pub(crate) writer: Option<PassId>,
    pub(crate) ref_count: u32,
}

impl ResourceNode {
    /// Resource this node is a version of. After compiling, this reflects alias resolution.
    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Pass that produced this version, or `None` for versions produced by creation or import.
    pub fn writer(&self) -> Option<PassId> {
        self.writer
    }

    /// Amount of live passes reading this node after compiling.
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }
}
