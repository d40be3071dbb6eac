pub use crate::core::device::Device;
pub use crate::core::error::Error;
pub use crate::core::settings::*;

pub use crate::sync::token::CompletionToken;

pub use crate::resource::desc::*;

pub use crate::allocator::default_allocator::{AllocatorStats, DefaultAllocator};
pub use crate::allocator::traits::Allocator;

pub use crate::graph::debug_graph::{DebugEdge, DebugGraph, DebugNode, DebugState, GraphViz};
pub use crate::graph::pass::{EmptyPassExecutor, Pass, PassBuilder, PassExecutor};
pub use crate::graph::pass_graph::FrameGraph;
pub use crate::graph::physical_resource::{PassResources, PhysicalResource, PhysicalResourceBindings};
pub use crate::graph::resource::ResourceType;
pub use crate::graph::virtual_resource::*;
