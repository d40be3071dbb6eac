//! Contains the default pooled allocator, which is good for most needs.
//!
//! Released resources are kept in a free list. Every request is served from the first pooled resource with a
//! compatible descriptor, and only creates a new resource on the device if there is none.
//! Pooled resources are never destroyed automatically. Call [`DefaultAllocator::end_frame()`] once per frame, and
//! [`DefaultAllocator::trim()`] to drop resources that were not used for a while.

use std::sync::Arc;

use anyhow::Result;

use crate::allocator::traits::Allocator;
use crate::core::device::Device;
use crate::graph::physical_resource::PhysicalResource;
use crate::resource::desc::ResourceDesc;

/// Counters describing the state of a [`DefaultAllocator`].
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Resources created on the device over the lifetime of the allocator.
    pub created: usize,
    /// Requests served from the pool over the lifetime of the allocator.
    pub reused: usize,
    /// Resources currently handed out.
    pub in_use: usize,
    /// Resources currently waiting in the pool.
    pub pooled: usize,
}

struct PooledResource<D: Device> {
    desc: ResourceDesc,
    resource: PhysicalResource<D>,
    last_used: u64,
}

/// The default allocator. Pools released resources by descriptor compatibility.
///
/// The caller must make sure the GPU finished using a resource before it can be handed out again, by waiting on the
/// [`CompletionToken`](crate::CompletionToken) of the frame that released it before executing the next frame.
///
/// # Example
/// ```ignore
/// # use framegraph::*;
/// let mut allocator = DefaultAllocator::new();
/// let token = graph.execute(&mut device, &mut allocator)?;
/// device.wait(token)?;
/// allocator.end_frame();
/// // Drop anything that was not used for the last 3 frames.
/// allocator.trim(3);
/// ```
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct DefaultAllocator<D: Device> {
    #[derivative(Debug = "ignore")]
    free: Vec<PooledResource<D>>,
    frame: u64,
    stats: AllocatorStats,
}

impl<D: Device> Default for DefaultAllocator<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Device> DefaultAllocator<D> {
    /// Create a new allocator with an empty pool.
    pub fn new() -> Self {
        Self {
            free: vec![],
            frame: 0,
            stats: AllocatorStats::default(),
        }
    }

    /// Get the current allocator statistics.
    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            pooled: self.free.len(),
            ..self.stats
        }
    }

    /// Advance the frame counter used to track how long pooled resources have been idle.
    pub fn end_frame(&mut self) {
        self.frame += 1;
    }

    /// Drop every pooled resource that was not used in the last `max_idle_frames` frames.
    /// Returns the amount of resources dropped.
    pub fn trim(&mut self, max_idle_frames: u64) -> usize {
        let frame = self.frame;
        let before = self.free.len();
        self.free
            .retain(|pooled| frame.saturating_sub(pooled.last_used) <= max_idle_frames);
        let dropped = before - self.free.len();
        if dropped > 0 {
            debug!("Trimmed {dropped} idle pooled resources");
        }
        dropped
    }

    fn create(device: &mut D, name: &str, desc: &ResourceDesc) -> Result<PhysicalResource<D>> {
        Ok(match desc {
            ResourceDesc::Texture(desc) => PhysicalResource::Texture(Arc::new(device.create_texture(name, desc)?)),
            ResourceDesc::Buffer(desc) => PhysicalResource::Buffer(Arc::new(device.create_buffer(name, desc)?)),
        })
    }
}

impl<D: Device> Allocator<D> for DefaultAllocator<D> {
    fn acquire(&mut self, device: &mut D, name: &str, desc: &ResourceDesc) -> Result<PhysicalResource<D>> {
        let resource = match self.free.iter().position(|pooled| pooled.desc.is_compatible(desc)) {
            Some(index) => {
                self.stats.reused += 1;
                #[cfg(feature = "log-objects")]
                trace!("Reusing pooled resource for `{name}`");
                self.free.swap_remove(index).resource
            }
            None => {
                let resource = Self::create(device, name, desc)?;
                self.stats.created += 1;
                #[cfg(feature = "log-objects")]
                trace!("Created new resource for `{name}`");
                resource
            }
        };
        self.stats.in_use += 1;
        Ok(resource)
    }

    fn release(&mut self, desc: &ResourceDesc, resource: PhysicalResource<D>) {
        self.stats.in_use = self.stats.in_use.saturating_sub(1);
        self.free.push(PooledResource {
            desc: desc.clone(),
            resource,
            last_used: self.frame,
        });
    }
}
