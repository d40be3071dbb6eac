//! The frame graph system sequences all GPU work of a single frame. Each pass declares which resources it reads and
//! writes through versioned handles, without knowing about any other pass. The graph then works out which passes
//! actually contribute to the output of the frame, and how long each transient resource must physically exist.
//!
//! Every frame goes through the same steps:
//! 1. Register passes with [`FrameGraph::add_pass()`](crate::FrameGraph::add_pass). Their setup closures run immediately
//!    and declare resources through a [`PassBuilder`](crate::PassBuilder).
//! 2. Call [`FrameGraph::compile()`](crate::FrameGraph::compile). This culls every pass and resource that nothing
//!    observable depends on, see the [`compile`] module.
//! 3. Call [`FrameGraph::execute()`](crate::FrameGraph::execute). This runs the remaining passes in registration order,
//!    materializing transient resources right before their first use and releasing them right after their last.
//! 4. Drop the graph.
//!
//! Through the [`GraphViz`](crate::GraphViz) trait, it's possible to export a graphviz-compatible dot file of the
//! compiled graph.
//!
//! # Example
//!
//! ```ignore
//! use framegraph as fg;
//!
//! let mut graph = fg::FrameGraph::new();
//! let swapchain = graph.import_texture("swapchain", swapchain_desc, swapchain_image);
//!
//! #[derive(Default, Clone)]
//! struct Blit {
//!     target: fg::TextureHandle,
//! }
//!
//! let blit = graph.add_pass(
//!     "blit",
//!     |builder, data: &mut Blit| {
//!         let mut target = swapchain;
//!         data.target = builder.write(&mut target);
//!     },
//!     |data, cmd, resources| {
//!         cmd.clear(resources.texture(data.target)?);
//!         Ok(())
//!     },
//! );
//! graph.present(blit.target);
//! graph.compile();
//! let token = graph.execute(&mut device, &mut allocator)?;
//! ```
//!
//! For more complex passes, see the [`pass`] module documentation.

pub mod compile;
pub mod debug_graph;
pub mod pass;
pub mod pass_graph;
pub mod physical_resource;
pub mod record;
pub mod resource;
pub mod virtual_resource;
