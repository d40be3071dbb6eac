//! Exposes the frame graph error type

use std::path::PathBuf;

use thiserror::Error;

use crate::graph::resource::ResourceType;

/// Error type that the frame graph can return.
///
/// Note that mistakes in the way a graph is authored (reusing a stale handle, declaring the same read twice,
/// writing a resource with an outdated version) are not reported through this type. They are programmer errors
/// and abort through a panic as soon as they are detected.
#[derive(Error, Debug)]
pub enum Error {
    /// [`FrameGraph::execute()`](crate::FrameGraph::execute) was called before the graph was compiled, or the graph
    /// was modified after compiling.
    #[error("Frame graph must be compiled before it can be executed.")]
    GraphNotCompiled,
    /// A pass tried to resolve a resource it did not declare as read or write.
    #[error("Pass `{pass}` did not declare resource `{resource}`")]
    UndeclaredResource {
        /// Name of the pass
        pass: String,
        /// Name of the resource
        resource: String,
    },
    /// No physical resource was bound to a virtual resource at the time it was resolved.
    #[error("No resource bound to virtual resource `{0}`")]
    NoResourceBound(String),
    /// The resource was resolved as a different resource type than it was declared with.
    #[error("Resource `{name}` is a {actual:?}, not a {expected:?}")]
    ResourceTypeMismatch {
        /// Name of the resource
        name: String,
        /// Type requested by the caller
        expected: ResourceType,
        /// Declared type
        actual: ResourceType,
    },
    /// Writing the debug export failed.
    #[error("Failed to write frame graph dump to `{path}`")]
    DumpFailed {
        /// Target path
        path: PathBuf,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },
    /// The dot export could not be laid out for rendering.
    #[error("Failed to render frame graph dump: {0}")]
    RenderFailed(String),
}
