//! Exposes the [`Device`] trait, implemented by graphics backends to drive a [`FrameGraph`](crate::FrameGraph).

use anyhow::Result;

use crate::resource::desc::{BufferDesc, TextureDesc};
use crate::sync::token::CompletionToken;

/// Interface to the GPU device a frame graph executes on.
///
/// The graph never records commands itself. It materializes transient resources through [`Device::create_texture`] and
/// [`Device::create_buffer`] (usually indirectly, through an [`Allocator`](crate::Allocator)), opens one command context per
/// frame, hands it to every pass closure in order and submits it as a single unit.
///
/// Concrete resources are destroyed by dropping them.
pub trait Device {
    /// Concrete texture object.
    type Texture;
    /// Concrete buffer object.
    type Buffer;
    /// Context passed to every pass closure while executing a frame, usually a command encoder.
    type CommandContext;

    /// Create a texture matching the given descriptor.
    /// # Errors
    /// Any device failure. The frame graph does not retry.
    fn create_texture(&mut self, name: &str, desc: &TextureDesc) -> Result<Self::Texture>;

    /// Create a buffer matching the given descriptor.
    /// # Errors
    /// Any device failure. The frame graph does not retry.
    fn create_buffer(&mut self, name: &str, desc: &BufferDesc) -> Result<Self::Buffer>;

    /// Open the command context all passes of a frame are recorded into.
    fn begin_frame(&mut self) -> Result<Self::CommandContext>;

    /// Submit everything recorded into `cmd` as one unit. The returned token can be queried for completion.
    fn submit(&mut self, cmd: Self::CommandContext) -> Result<CompletionToken>;

    /// Returns true if the work associated with `token` has finished on the GPU.
    fn is_complete(&self, token: CompletionToken) -> bool;

    /// Blocks until the work associated with `token` has finished on the GPU.
    fn wait(&self, token: CompletionToken) -> Result<()>;
}
