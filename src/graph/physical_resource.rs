use std::sync::Arc;

use anyhow::Result;

use crate::core::device::Device;
use crate::core::error::Error;
use crate::graph::resource::ResourceType;
use crate::graph::virtual_resource::{BufferHandle, Handle, NodeId, ResourceEntry, ResourceId, ResourceKind, ResourceNode, TextureHandle};

/// Describes any physical resource handle on the GPU.
pub enum PhysicalResource<D: Device> {
    Texture(Arc<D::Texture>),
    Buffer(Arc<D::Buffer>),
}

impl<D: Device> Clone for PhysicalResource<D> {
    fn clone(&self) -> Self {
        match self {
            PhysicalResource::Texture(texture) => PhysicalResource::Texture(texture.clone()),
            PhysicalResource::Buffer(buffer) => PhysicalResource::Buffer(buffer.clone()),
        }
    }
}

impl<D: Device> std::fmt::Debug for PhysicalResource<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicalResource::Texture(texture) => write!(f, "Texture({:p})", Arc::as_ptr(texture)),
            PhysicalResource::Buffer(buffer) => write!(f, "Buffer({:p})", Arc::as_ptr(buffer)),
        }
    }
}

impl<D: Device> PhysicalResource<D> {
    /// Get the resource type of this physical resource.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            PhysicalResource::Texture(_) => ResourceType::Texture,
            PhysicalResource::Buffer(_) => ResourceType::Buffer,
        }
    }

    /// Returns true if both refer to the exact same backing object.
    pub fn ptr_eq(&self, other: &PhysicalResource<D>) -> bool {
        match (self, other) {
            (PhysicalResource::Texture(lhs), PhysicalResource::Texture(rhs)) => Arc::ptr_eq(lhs, rhs),
            (PhysicalResource::Buffer(lhs), PhysicalResource::Buffer(rhs)) => Arc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }

    /// Get the texture, if this is a texture.
    pub fn texture(&self) -> Option<&Arc<D::Texture>> {
        match self {
            PhysicalResource::Texture(texture) => Some(texture),
            PhysicalResource::Buffer(_) => None,
        }
    }

    /// Get the buffer, if this is a buffer.
    pub fn buffer(&self) -> Option<&Arc<D::Buffer>> {
        match self {
            PhysicalResource::Texture(_) => None,
            PhysicalResource::Buffer(buffer) => Some(buffer),
        }
    }
}

/// Stores bindings from virtual resources to physical resources.
///
/// Imported resources are bound as soon as they are imported. Transient resources are bound right before their first
/// using pass executes and unbound right after their last using pass.
pub struct PhysicalResourceBindings<D: Device> {
    bindings: Vec<Option<PhysicalResource<D>>>,
}

impl<D: Device> Default for PhysicalResourceBindings<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> PhysicalResourceBindings<D> {
    /// Create a new physical resource binding map.
    pub fn new() -> Self {
        Self {
            bindings: vec![],
        }
    }

    /// Bind a physical resource to a virtual resource, replacing any previous binding.
    pub fn bind(&mut self, resource: ResourceId, physical: PhysicalResource<D>) {
        if self.bindings.len() <= resource.index() {
            self.bindings.resize_with(resource.index() + 1, || None);
        }
        self.bindings[resource.index()] = Some(physical);
    }

    /// Remove the binding of a virtual resource, returning the physical resource that was bound.
    pub fn unbind(&mut self, resource: ResourceId) -> Option<PhysicalResource<D>> {
        self.bindings.get_mut(resource.index()).and_then(Option::take)
    }

    /// Resolve a virtual resource to a physical resource. Returns `None` if nothing is bound.
    pub fn resolve(&self, resource: ResourceId) -> Option<&PhysicalResource<D>> {
        self.bindings.get(resource.index()).and_then(Option::as_ref)
    }

    /// Amount of virtual resources currently bound.
    pub fn num_bound(&self) -> usize {
        self.bindings.iter().filter(|binding| binding.is_some()).count()
    }
}

/// Resolver handed to a pass closure while it executes. Maps the handles the pass declared to physical resources.
pub struct PassResources<'a, D: Device> {
    pub(crate) pass: &'a str,
    pub(crate) reads: &'a [NodeId],
    pub(crate) writes: &'a [NodeId],
    pub(crate) nodes: &'a [ResourceNode],
    pub(crate) resources: &'a [ResourceEntry],
    pub(crate) bindings: &'a PhysicalResourceBindings<D>,
}

impl<'a, D: Device> PassResources<'a, D> {
    /// Name of the executing pass.
    pub fn pass_name(&self) -> &str {
        self.pass
    }

    /// Resolve a texture handle declared by this pass.
    /// # Errors
    /// * Fails if the pass did not declare the handle as read or write.
    /// * Fails if nothing is bound to the texture.
    /// # Panics
    /// If the handle is invalid.
    pub fn texture(&self, handle: TextureHandle) -> Result<&'a Arc<D::Texture>> {
        match self.resolve(handle)? {
            PhysicalResource::Texture(texture) => Ok(texture),
            physical => Err(self.type_mismatch(handle, physical).into()),
        }
    }

    /// Resolve a buffer handle declared by this pass.
    /// # Errors
    /// * Fails if the pass did not declare the handle as read or write.
    /// * Fails if nothing is bound to the buffer.
    /// # Panics
    /// If the handle is invalid.
    pub fn buffer(&self, handle: BufferHandle) -> Result<&'a Arc<D::Buffer>> {
        match self.resolve(handle)? {
            PhysicalResource::Buffer(buffer) => Ok(buffer),
            physical => Err(self.type_mismatch(handle, physical).into()),
        }
    }

    /// Resolve any handle declared by this pass to its physical resource.
    /// # Errors
    /// * Fails if the pass did not declare the handle as read or write.
    /// * Fails if nothing is bound to the resource.
    /// # Panics
    /// * If the handle is invalid.
    /// * If the handle was created by another frame graph.
    pub fn resolve<K: ResourceKind>(&self, handle: Handle<K>) -> Result<&'a PhysicalResource<D>> {
        assert!(handle.is_valid(), "Pass `{}` resolved an invalidated {:?} handle", self.pass, K::TYPE);
        let node = handle.node();
        assert!(node.index() < self.nodes.len(), "{handle:?} does not belong to this frame graph");
        let entry = self.entry(node);
        if !self.reads.contains(&node) && !self.writes.contains(&node) {
            return Err(Error::UndeclaredResource {
                pass: self.pass.to_owned(),
                resource: entry.name.clone(),
            }
            .into());
        }
        self.bindings
            .resolve(entry.id)
            .ok_or_else(|| Error::NoResourceBound(entry.name.clone()).into())
    }

    fn entry(&self, node: NodeId) -> &'a ResourceEntry {
        &self.resources[self.nodes[node.index()].resource.index()]
    }

    fn type_mismatch<K: ResourceKind>(&self, handle: Handle<K>, physical: &PhysicalResource<D>) -> Error {
        Error::ResourceTypeMismatch {
            name: self.entry(handle.node()).name.clone(),
            expected: K::TYPE,
            actual: physical.resource_type(),
        }
    }
}
