//! Execution of a compiled frame graph.
//!
//! Passes are executed in registration order, skipping every culled pass. Around each pass the resources compiling
//! assigned to it are materialized through the [`Allocator`] right before the pass runs, and handed back to it
//! right after.

use anyhow::{Context, Result};

use crate::allocator::traits::Allocator;
use crate::core::device::Device;
use crate::core::error::Error;
use crate::graph::pass_graph::FrameGraph;
use crate::graph::physical_resource::{PassResources, PhysicalResourceBindings};
use crate::graph::virtual_resource::ResourceEntry;
use crate::sync::token::CompletionToken;

impl<'cb, D: Device> FrameGraph<'cb, D> {
    /// Execute the compiled graph on `device`, taking transient resources from `allocator`.
    ///
    /// All live passes are recorded into a single command context, which is submitted as one unit. The returned token
    /// completes once the GPU has finished the frame.
    /// # Errors
    /// * Fails with [`Error::GraphNotCompiled`] if the graph was not compiled, or modified after compiling.
    /// * Fails if the device fails to open, materialize or submit anything.
    /// * Fails if a pass closure returns an error. Remaining passes are skipped and the error names the pass.
    pub fn execute<A: Allocator<D>>(&mut self, device: &mut D, allocator: &mut A) -> Result<CompletionToken> {
        if !self.compiled {
            return Err(Error::GraphNotCompiled.into());
        }

        if let Some(dump) = self.settings.dump.take() {
            self.dump_graph_as(&dump.path, &dump.formats)?;
        }

        let mut cmd = device.begin_frame()?;
        if let Err(err) = self.execute_passes(device, allocator, &mut cmd) {
            self.release_bound(allocator);
            return Err(err);
        }

        if self.passes.iter().all(|pass| pass.is_culled()) {
            warn!("Executed a frame graph without any live passes");
        }

        device.submit(cmd)
    }

    fn execute_passes<A: Allocator<D>>(&mut self, device: &mut D, allocator: &mut A, cmd: &mut D::CommandContext) -> Result<()> {
        let FrameGraph {
            passes,
            nodes,
            resources,
            bindings,
            ..
        } = self;

        for pass in passes.iter_mut().filter(|pass| !pass.is_culled()) {
            for &id in &pass.creates {
                materialize(device, allocator, bindings, &resources[id.index()])
                    .with_context(|| format!("Failed to materialize resources for pass `{}`", pass.name))?;
            }

            let pass_resources = PassResources {
                pass: &pass.name,
                reads: &pass.reads,
                writes: &pass.writes,
                nodes: nodes.as_slice(),
                resources: resources.as_slice(),
                bindings: &*bindings,
            };
            pass.execute
                .execute(cmd, &pass_resources)
                .with_context(|| format!("Pass `{}` failed to execute", pass.name))?;

            for &id in &pass.destroys {
                release(allocator, bindings, &resources[id.index()]);
            }
        }

        Ok(())
    }

    /// Hand every transient resource that is still bound back to the allocator.
    fn release_bound<A: Allocator<D>>(&mut self, allocator: &mut A) {
        for resource in &self.resources {
            release(allocator, &mut self.bindings, resource);
        }
    }
}

fn materialize<D: Device, A: Allocator<D>>(
    device: &mut D,
    allocator: &mut A,
    bindings: &mut PhysicalResourceBindings<D>,
    resource: &ResourceEntry,
) -> Result<()> {
    if resource.imported {
        return Ok(());
    }
    let physical = allocator.acquire(device, &resource.name, &resource.desc)?;
    #[cfg(feature = "log-objects")]
    trace!("Materialized `{}` as {:?}", resource.name, physical);
    bindings.bind(resource.id, physical);
    Ok(())
}

fn release<D: Device, A: Allocator<D>>(allocator: &mut A, bindings: &mut PhysicalResourceBindings<D>, resource: &ResourceEntry) {
    if resource.imported {
        return;
    }
    if let Some(physical) = bindings.unbind(resource.id) {
        #[cfg(feature = "log-objects")]
        trace!("Released `{}` ({:?})", resource.name, physical);
        allocator.release(&resource.desc, physical);
    }
}
