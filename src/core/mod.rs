//! The core module holds the interfaces the frame graph needs from the outside world, and the types shared by
//! every other module.
//!
//! - [`device`] defines the [`Device`](crate::Device) trait, the only way the graph talks to a GPU.
//! - [`error`] exposes the crate error type.
//! - [`settings`] holds graph construction parameters.

pub mod device;
pub mod error;
pub mod settings;
