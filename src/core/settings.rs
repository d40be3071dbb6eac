//! Exposes all structs needed to store frame graph construction parameters.

use std::path::PathBuf;

/// Output format of the debug export.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DumpFormat {
    /// Graphviz `dot` source.
    Dot,
    /// Scalable vector graphics, laid out from the `dot` source.
    #[cfg(feature = "debug-dump")]
    Svg,
}

impl DumpFormat {
    /// File extension used for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            DumpFormat::Dot => "dot",
            #[cfg(feature = "debug-dump")]
            DumpFormat::Svg => "svg",
        }
    }
}

/// One-shot request to write the graph to disk the next time it is executed.
#[derive(Debug, Clone)]
pub struct DumpSettings {
    /// Path without extension. Each requested format appends its own extension.
    pub path: PathBuf,
    /// Formats to write.
    pub formats: Vec<DumpFormat>,
}

/// Settings used to construct a [`FrameGraph`](crate::FrameGraph).
#[derive(Debug, Clone)]
pub struct GraphSettings {
    /// Maximum amount of passes in a single graph. Registering more passes is a fatal error.
    pub max_passes: usize,
    /// Maximum amount of resources (created and imported) in a single graph. Registering more is a fatal error.
    pub max_resources: usize,
    /// If set, the graph is dumped once when it is executed. The request is cleared afterwards.
    pub dump: Option<DumpSettings>,
    /// Log every culled pass at `debug` level while compiling.
    pub log_culled_passes: bool,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_passes: 256,
            max_resources: 1024,
            dump: None,
            log_culled_passes: true,
        }
    }
}

/// The settings builder is a convenience struct to easily create [`GraphSettings`].
///
/// For information about each of the fields, see [`GraphSettings`]
/// # Example
/// ```
/// # use framegraph::*;
/// let settings = GraphSettingsBuilder::new()
///     .max_passes(64)
///     .dump("frame_graph", [DumpFormat::Dot])
///     .build();
/// assert_eq!(settings.max_passes, 64);
/// ```
#[derive(Debug, Default)]
pub struct GraphSettingsBuilder {
    inner: GraphSettings,
}

impl GraphSettingsBuilder {
    /// Create a new settings builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum amount of passes.
    pub fn max_passes(mut self, count: usize) -> Self {
        self.inner.max_passes = count;
        self
    }

    /// Sets the maximum amount of resources.
    pub fn max_resources(mut self, count: usize) -> Self {
        self.inner.max_resources = count;
        self
    }

    /// Request a one-shot dump of the graph on the next execution.
    pub fn dump(mut self, path: impl Into<PathBuf>, formats: impl Into<Vec<DumpFormat>>) -> Self {
        self.inner.dump = Some(DumpSettings {
            path: path.into(),
            formats: formats.into(),
        });
        self
    }

    /// Whether to log culled passes.
    pub fn log_culled_passes(mut self, enabled: bool) -> Self {
        self.inner.log_culled_passes = enabled;
        self
    }

    /// Build the resulting settings.
    pub fn build(self) -> GraphSettings {
        self.inner
    }
}
