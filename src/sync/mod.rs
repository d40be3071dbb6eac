//! The sync module holds the CPU-GPU synchronization primitive the frame graph returns from execution.
//!
//! The graph itself performs no waiting. [`FrameGraph::execute()`](crate::FrameGraph::execute) submits the frame and
//! returns a [`CompletionToken`](token::CompletionToken); the caller must wait on it before transient resources pooled
//! by that frame are handed out to another frame.

pub mod token;
