/// Type of a resource in the frame graph.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
pub enum ResourceType {
    /// Texture resource
    #[default]
    Texture,
    /// Buffer resource
    Buffer,
}
