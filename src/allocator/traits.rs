use anyhow::Result;

use crate::core::device::Device;
use crate::graph::physical_resource::PhysicalResource;
use crate::resource::desc::ResourceDesc;

/// Source of physical resources for transient virtual resources.
///
/// The frame graph calls [`Allocator::acquire()`] right before the first pass using a transient resource executes, and
/// [`Allocator::release()`] right after the last one. Imported resources never pass through the allocator.
pub trait Allocator<D: Device> {
    /// Obtain a physical resource matching `desc`, either from a pool or newly created on `device`.
    /// The given name is used for debug logging and passed to the device.
    /// # Errors
    /// Any failure to create a new resource on the device.
    fn acquire(&mut self, device: &mut D, name: &str, desc: &ResourceDesc) -> Result<PhysicalResource<D>>;

    /// Return a physical resource that was previously acquired with `desc`.
    fn release(&mut self, desc: &ResourceDesc, resource: PhysicalResource<D>);
}
