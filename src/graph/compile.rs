//! Compilation of a frame graph.
//!
//! Compiling runs the following steps, each of them over the whole graph:
//! 1. Alias resolution. Every [`move_resource`](crate::FrameGraph::move_resource) request reroutes the resource
//!    identity of its target to its source.
//! 2. Seeding reference counts. A pass is referenced once per node it produces, plus once if it is never-cull.
//!    A node is referenced once per pass reading it.
//! 3. Culling. Nodes nobody reads release their producer. A pass that loses all references (or never had any) is
//!    dead, and releases everything it reads in turn. This runs until no more passes die.
//! 4. Resource reference counts. Every resource is referenced by the live readers of its nodes and by each write of a
//!    live pass.
//! 5. Lifetimes. Every referenced resource is created right before the first live pass using it, and destroyed right
//!    after the last one.
//!
//! All derived data is reset at the start of each compile, so compiling twice gives the same result.

use crate::core::device::Device;
use crate::graph::pass_graph::FrameGraph;
use crate::graph::virtual_resource::{NodeId, PassId};

impl<'cb, D: Device> FrameGraph<'cb, D> {
    /// Compile the graph, culling every pass and resource that does not contribute to an observable output and
    /// assigning creation and destruction of every remaining transient resource to a pass.
    pub fn compile(&mut self) {
        self.reset_compile_state();
        self.resolve_aliases();
        self.seed_ref_counts();
        self.cull_passes();
        self.accumulate_resource_ref_counts();
        self.assign_lifetimes();
        self.compiled = true;

        let culled = self.passes.iter().filter(|pass| pass.is_culled()).count();
        let alive = self.resources.iter().filter(|resource| resource.ref_count > 0).count();
        info!(
            "Compiled frame graph: {culled} of {} passes culled, {alive} of {} resources alive",
            self.passes.len(),
            self.resources.len()
        );
    }

    fn reset_compile_state(&mut self) {
        for pass in &mut self.passes {
            pass.reset_compile_state();
        }
        for node in &mut self.nodes {
            node.ref_count = 0;
        }
        for resource in &mut self.resources {
            resource.reset_compile_state();
        }
    }

    fn resolve_aliases(&mut self) {
        for &(from, to) in &self.aliases {
            let from_resource = self.nodes[from.index()].resource;
            let to_resource = self.nodes[to.index()].resource;
            if from_resource != to_resource {
                debug!(
                    "Aliasing `{}` onto `{}`",
                    self.resources[to_resource.index()].name,
                    self.resources[from_resource.index()].name
                );
                for node in self.nodes.iter_mut().filter(|node| node.resource == to_resource) {
                    node.resource = from_resource;
                }
            }

            for pass in &mut self.passes {
                if pass.reads.contains(&from) && !pass.reads.contains(&to) {
                    pass.reads.push(to);
                }
                let write_count = pass.writes.len();
                pass.writes.retain(|&write| write != from);
                if pass.writes.len() != write_count {
                    self.nodes[from.index()].writer = None;
                }
            }
        }
    }

    fn seed_ref_counts(&mut self) {
        for pass in &mut self.passes {
            pass.ref_count = pass.writes.len() as u32 + u32::from(pass.never_cull);
            for read in &pass.reads {
                self.nodes[read.index()].ref_count += 1;
            }
        }
    }

    fn cull_passes(&mut self) {
        let mut unreferenced: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.ref_count == 0)
            .map(|(index, _)| NodeId(index as u32))
            .collect();
        // Passes without writes that are not never-cull start out dead.
        let mut dead: Vec<PassId> = self
            .passes
            .iter()
            .filter(|pass| pass.ref_count == 0)
            .map(|pass| pass.id)
            .collect();

        loop {
            while let Some(id) = dead.pop() {
                let pass = &self.passes[id.index()];
                if self.settings.log_culled_passes {
                    debug!("Culling pass `{}`", pass.name);
                }
                for read in &pass.reads {
                    let node = &mut self.nodes[read.index()];
                    node.ref_count -= 1;
                    if node.ref_count == 0 {
                        unreferenced.push(*read);
                    }
                }
            }

            let Some(node) = unreferenced.pop() else {
                break;
            };
            let Some(writer) = self.nodes[node.index()].writer else {
                continue;
            };
            let pass = &mut self.passes[writer.index()];
            assert!(pass.ref_count > 0, "Pass `{}` released more often than it was referenced", pass.name);
            pass.ref_count -= 1;
            if pass.ref_count == 0 {
                dead.push(writer);
            }
        }
    }

    fn accumulate_resource_ref_counts(&mut self) {
        for node in &self.nodes {
            self.resources[node.resource.index()].ref_count += node.ref_count;
        }
        for pass in self.passes.iter().filter(|pass| !pass.is_culled()) {
            for write in &pass.writes {
                self.resources[self.nodes[write.index()].resource.index()].ref_count += 1;
            }
        }
    }

    fn assign_lifetimes(&mut self) {
        for pass in self.passes.iter().filter(|pass| !pass.is_culled()) {
            for node in pass.reads.iter().chain(pass.writes.iter()) {
                let resource = &mut self.resources[self.nodes[node.index()].resource.index()];
                if resource.first_use.is_none() {
                    resource.first_use = Some(pass.id);
                }
                resource.last_use = Some(pass.id);
            }
        }

        for resource in self.resources.iter().filter(|resource| resource.ref_count > 0) {
            let (Some(first), Some(last)) = (resource.first_use, resource.last_use) else {
                continue;
            };
            self.passes[first.index()].creates.push(resource.id);
            self.passes[last.index()].destroys.push(resource.id);
        }
    }
}
