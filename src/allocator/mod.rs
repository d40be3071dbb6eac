//! The allocator module hands out the physical resources backing transient virtual resources.
//! <br>
//! <br>
//! # Allocator traits
//! These are defined in [`traits`], and can be implemented to supply a custom allocation strategy to
//! [`FrameGraph::execute()`](crate::FrameGraph::execute).
//! # Default allocator
//! A pooled allocator that recycles released resources for later requests with a compatible descriptor. For more
//! information check the [`default_allocator`] module documentation.

pub mod default_allocator;
pub mod traits;
