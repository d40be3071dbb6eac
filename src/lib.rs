//! Per-frame render dependency graph.
//!
//! Rendering code registers independent passes. Each pass declares which logical resources it reads and writes
//! through versioned handles, and never needs to know about any other pass. Once all passes are registered the
//! graph is compiled, which
//! - discovers which passes and resources contribute to an observable output of the frame, and culls the rest,
//! - computes the exact window in which every transient resource has to physically exist,
//! - assigns resource creation and destruction to the first and last pass using them.
//!
//! Executing the graph then walks the surviving passes in registration order, materializes transient
//! resources through an [`Allocator`](crate::Allocator) right before they are first used, hands every pass closure
//! a resolver for its declared resources and returns them to the allocator right after their last use.
//!
//! # Example
//!
//! ```ignore
//! use framegraph as fg;
//!
//! let mut graph = fg::FrameGraph::<MyDevice>::new();
//! let backbuffer = graph.import_texture("backbuffer", swapchain_desc, swapchain_image);
//!
//! #[derive(Default, Clone)]
//! struct GBuffer {
//!     albedo: fg::TextureHandle,
//! }
//!
//! let gbuffer = graph.add_pass(
//!     "gbuffer",
//!     |builder, data: &mut GBuffer| {
//!         let mut albedo = builder.create_texture("albedo", fg::TextureDesc::new_2d(1920, 1080, fg::TextureFormat::Rgba8Unorm));
//!         data.albedo = builder.write(&mut albedo);
//!     },
//!     |data, cmd, resources| {
//!         let albedo = resources.texture(data.albedo)?;
//!         // record draw calls into `cmd` here.
//!         Ok(())
//!     },
//! );
//!
//! graph.add_pass(
//!     "composite",
//!     |builder, _: &mut ()| {
//!         let mut target = backbuffer;
//!         builder.read(gbuffer.albedo);
//!         builder.write(&mut target);
//!     },
//!     |_, _, _| Ok(()),
//! );
//!
//! graph.compile();
//! let token = graph.execute(&mut device, &mut allocator)?;
//! device.wait(token)?;
//! ```
//!
//! For further documentation, see
//! - [`graph`] for the pass builder, compilation and execution.
//! - [`allocator`] for transient resource pooling.
//! - [`resource`] for resource descriptors.
//! - [`core`] for the device interface, settings and errors.

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;
#[macro_use]
extern crate static_assertions;

pub mod prelude;
pub use crate::prelude::*;

pub mod allocator;
pub mod core;
pub mod graph;
pub mod resource;
pub mod sync;
