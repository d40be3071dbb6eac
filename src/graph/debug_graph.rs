//! Debug export of a frame graph.
//!
//! A [`DebugGraph`] is a snapshot of a [`FrameGraph`] as a [`petgraph`] graph. Every pass and every resource version
//! is a vertex. Writes are edges from a pass to the version it produces, reads are edges from a version to the pass
//! reading it. Through the [`GraphViz`] trait the snapshot can be exported in `dot` format, colored by the result of
//! the last compile.
//!
//! # Example
//! ```ignore
//! graph.compile();
//! // Writes `frame.dot`, and `frame.svg` if the `debug-dump` feature is enabled.
//! graph.dump_graph("frame")?;
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::{EdgeReference, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Graph, Incoming};

use crate::core::device::Device;
use crate::core::error::Error;
use crate::core::settings::DumpFormat;
use crate::graph::pass_graph::FrameGraph;
use crate::graph::virtual_resource::{NodeId, PassId};

/// State of a vertex after compiling.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DebugState {
    /// Executed, or materialized.
    Alive,
    /// Removed by compiling.
    Culled,
    /// Owned outside of the graph.
    Imported,
}

/// Vertex of a [`DebugGraph`].
#[derive(Debug, Clone)]
pub enum DebugNode {
    Pass {
        id: PassId,
        name: String,
        ref_count: u32,
        never_cull: bool,
        state: DebugState,
    },
    Resource {
        id: NodeId,
        name: String,
        version: u32,
        ref_count: u32,
        state: DebugState,
    },
}

impl DebugNode {
    /// Compile state of this vertex.
    pub fn state(&self) -> DebugState {
        match self {
            DebugNode::Pass {
                state, ..
            } => *state,
            DebugNode::Resource {
                state, ..
            } => *state,
        }
    }
}

impl Display for DebugNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugNode::Pass {
                name,
                ref_count,
                ..
            } => write!(f, "{name} (refs: {ref_count})"),
            DebugNode::Resource {
                name,
                version,
                ref_count,
                ..
            } => write!(f, "{name} v{version} (refs: {ref_count})"),
        }
    }
}

/// Edge of a [`DebugGraph`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DebugEdge {
    /// Resource version to the pass reading it.
    Read,
    /// Pass to the resource version it produces.
    Write,
}

impl Display for DebugEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DebugEdge::Read => f.write_str("read"),
            DebugEdge::Write => f.write_str("write"),
        }
    }
}

/// Snapshot of a frame graph for visualization and verification.
#[derive(Debug, Clone)]
pub struct DebugGraph {
    graph: Graph<DebugNode, DebugEdge>,
    passes: Vec<NodeIndex>,
}

/// Trait that is implemented by graphs that can be exported to graphviz.
pub trait GraphViz {
    /// Get the string representation of this graph in `dot` format.
    fn dot(&self) -> Result<String>;
}

impl DebugGraph {
    /// Take a snapshot of a frame graph. Ref counts and states reflect the last compile.
    pub fn new<D: Device>(frame_graph: &FrameGraph<'_, D>) -> Self {
        let mut graph = Graph::new();
        let mut node_vertices = Vec::with_capacity(frame_graph.nodes.len());
        for (index, node) in frame_graph.nodes.iter().enumerate() {
            let resource = &frame_graph.resources[node.resource.index()];
            let produced = node
                .writer
                .map(|writer| !frame_graph.passes[writer.index()].is_culled())
                .unwrap_or(false);
            let state = if resource.imported {
                DebugState::Imported
            } else if node.ref_count > 0 || produced {
                DebugState::Alive
            } else {
                DebugState::Culled
            };
            node_vertices.push(graph.add_node(DebugNode::Resource {
                id: NodeId(index as u32),
                name: resource.name.clone(),
                version: node.version,
                ref_count: node.ref_count,
                state,
            }));
        }

        let mut passes = Vec::with_capacity(frame_graph.passes.len());
        for pass in &frame_graph.passes {
            let vertex = graph.add_node(DebugNode::Pass {
                id: pass.id,
                name: pass.name.clone(),
                ref_count: pass.ref_count,
                never_cull: pass.never_cull,
                state: if pass.is_culled() {
                    DebugState::Culled
                } else {
                    DebugState::Alive
                },
            });
            for read in &pass.reads {
                graph.add_edge(node_vertices[read.index()], vertex, DebugEdge::Read);
            }
            for write in &pass.writes {
                graph.add_edge(vertex, node_vertices[write.index()], DebugEdge::Write);
            }
            passes.push(vertex);
        }

        Self {
            graph,
            passes,
        }
    }

    /// Get the underlying petgraph graph.
    pub fn graph(&self) -> &Graph<DebugNode, DebugEdge> {
        &self.graph
    }

    /// Recompute which passes contribute to an output, independently of the reference counts computed while compiling.
    /// A pass is live if it is never-cull, or if it produces a version read by a live pass.
    /// Returns the live passes in execution order.
    pub fn live_passes(&self) -> Vec<PassId> {
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeIndex> = self
            .passes
            .iter()
            .copied()
            .filter(|vertex| {
                matches!(self.graph[*vertex], DebugNode::Pass {
                    never_cull: true,
                    ..
                })
            })
            .collect();

        while let Some(vertex) = stack.pop() {
            if !visited.insert(vertex) {
                continue;
            }
            stack.extend(self.graph.edges_directed(vertex, Incoming).map(|edge| edge.source()));
        }

        let mut live: Vec<PassId> = visited
            .into_iter()
            .filter_map(|vertex| match &self.graph[vertex] {
                DebugNode::Pass {
                    id, ..
                } => Some(*id),
                DebugNode::Resource {
                    ..
                } => None,
            })
            .collect();
        live.sort();
        live
    }

    /// Render this graph to an svg image.
    /// # Errors
    /// Fails with [`Error::RenderFailed`] if the exported `dot` source could not be laid out.
    #[cfg(feature = "debug-dump")]
    pub fn svg(&self) -> Result<String> {
        use layout::backends::svg::SVGWriter;
        use layout::gv;
        use layout::gv::GraphBuilder;

        let dot = self.dot()?;
        let mut parser = gv::DotParser::new(&dot);
        let parsed = parser.process().map_err(Error::RenderFailed)?;
        let mut svg = SVGWriter::new();
        let mut builder = GraphBuilder::new();
        builder.visit_graph(&parsed);
        let mut visual = builder.get();
        visual.do_it(false, false, false, &mut svg);
        Ok(svg.finalize())
    }

    fn get_edge_attributes(_: &Graph<DebugNode, DebugEdge>, _: EdgeReference<DebugEdge>) -> String {
        String::from("")
    }

    fn get_node_attributes(_: &Graph<DebugNode, DebugEdge>, node: (NodeIndex, &DebugNode)) -> String {
        match (node.1, node.1.state()) {
            (DebugNode::Pass {
                ..
            }, DebugState::Culled) => String::from("fillcolor = \"#bdbdbd\""),
            (DebugNode::Pass {
                ..
            }, _) => String::from("fillcolor = \"#5e6df7\""),
            (_, DebugState::Imported) => String::from("fillcolor = \"#f7c35e\" shape=box"),
            (_, DebugState::Alive) => String::from("fillcolor = \"#6cf75e\" shape=box"),
            (_, DebugState::Culled) => String::from("fillcolor = \"#f75e70\" shape=box"),
        }
    }
}

impl GraphViz for DebugGraph {
    fn dot(&self) -> Result<String> {
        Ok(format!(
            "{}",
            Dot::with_attr_getters(&self.graph, &[], &Self::get_edge_attributes, &Self::get_node_attributes)
        ))
    }
}

impl<'cb, D: Device> FrameGraph<'cb, D> {
    /// Take a [`DebugGraph`] snapshot of this graph.
    pub fn debug_graph(&self) -> DebugGraph {
        DebugGraph::new(self)
    }

    /// Write this graph to `<path>.dot`, and to `<path>.svg` if the `debug-dump` feature is enabled.
    /// # Errors
    /// See [`FrameGraph::dump_graph_as()`]
    pub fn dump_graph(&self, path: impl AsRef<Path>) -> Result<()> {
        self.dump_graph_as(
            path,
            &[
                DumpFormat::Dot,
                #[cfg(feature = "debug-dump")]
                DumpFormat::Svg,
            ],
        )
    }

    /// Write this graph in each of the given formats. Each format appends its own extension to `path`.
    /// # Errors
    /// * Fails with [`Error::DumpFailed`] if a file could not be written.
    /// * Fails with [`Error::RenderFailed`] if the svg could not be laid out.
    pub fn dump_graph_as(&self, path: impl AsRef<Path>, formats: &[DumpFormat]) -> Result<()> {
        let debug = self.debug_graph();
        for format in formats {
            let contents = match format {
                DumpFormat::Dot => debug.dot()?,
                #[cfg(feature = "debug-dump")]
                DumpFormat::Svg => debug.svg()?,
            };
            let target = with_appended_extension(path.as_ref(), format.extension());
            fs::write(&target, contents).map_err(|source| Error::DumpFailed {
                path: target.clone(),
                source,
            })?;
            info!("Dumped frame graph to {}", target.display());
        }
        Ok(())
    }
}

fn with_appended_extension(path: &Path, extension: &str) -> PathBuf {
    let mut file: OsString = path.as_os_str().to_owned();
    file.push(".");
    file.push(extension);
    PathBuf::from(file)
}
