use bitflags::bitflags;

use crate::graph::resource::ResourceType;

/// Pixel format of a texture.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    #[default]
    Rgba8Unorm,
    Rgba8Srgb,
    Bgra8Unorm,
    Bgra8Srgb,
    Rgba16Float,
    Rgba32Float,
    Rg16Float,
    R32Float,
    R11G11B10Float,
    Depth32Float,
    Depth24Stencil8,
}

impl TextureFormat {
    /// Whether this is a depth (or depth-stencil) format.
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::Depth32Float | TextureFormat::Depth24Stencil8)
    }

    /// Size of a single texel in bytes.
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::Rgba8Unorm
            | TextureFormat::Rgba8Srgb
            | TextureFormat::Bgra8Unorm
            | TextureFormat::Bgra8Srgb
            | TextureFormat::Rg16Float
            | TextureFormat::R32Float
            | TextureFormat::R11G11B10Float
            | TextureFormat::Depth32Float
            | TextureFormat::Depth24Stencil8 => 4,
            TextureFormat::Rgba16Float => 8,
            TextureFormat::Rgba32Float => 16,
        }
    }
}

bitflags! {
    /// Ways a texture may be used by passes.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        const COPY_SRC = 1 << 0;
        const COPY_DST = 1 << 1;
        const SAMPLED = 1 << 2;
        const STORAGE = 1 << 3;
        const COLOR_ATTACHMENT = 1 << 4;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 5;
    }
}

bitflags! {
    /// Ways a buffer may be used by passes.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const COPY_SRC = 1 << 0;
        const COPY_DST = 1 << 1;
        const UNIFORM = 1 << 2;
        const STORAGE = 1 << 3;
        const INDEX = 1 << 4;
        const VERTEX = 1 << 5;
        const INDIRECT = 1 << 6;
    }
}

/// Clear color for color attachments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ClearColor {
    Float([f32; 4]),
    Int([i32; 4]),
    Uint([u32; 4]),
}

/// Clear values for depth-stencil attachments.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct ClearDepthStencil {
    pub depth: f32,
    pub stencil: u32,
}

/// Optimized clear value baked into a texture on creation.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub enum ClearValue {
    #[default]
    None,
    Color(ClearColor),
    DepthStencil(ClearDepthStencil),
}

/// The kind of a [`ClearValue`], ignoring the actual values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClearKind {
    None,
    Color,
    DepthStencil,
}

impl ClearValue {
    /// Get the kind of this clear value.
    pub fn kind(&self) -> ClearKind {
        match self {
            ClearValue::None => ClearKind::None,
            ClearValue::Color(_) => ClearKind::Color,
            ClearValue::DepthStencil(_) => ClearKind::DepthStencil,
        }
    }
}

/// Describes a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub sample_count: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub clear: ClearValue,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            depth: 1,
            mip_levels: 1,
            sample_count: 1,
            format: TextureFormat::default(),
            usage: TextureUsage::SAMPLED | TextureUsage::COLOR_ATTACHMENT,
            clear: ClearValue::None,
        }
    }
}

impl TextureDesc {
    /// Describe a single-sampled 2D texture without mips. Depth formats get a depth-stencil attachment usage,
    /// everything else a color attachment usage. Both can be sampled.
    pub fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        let attachment = if format.is_depth() {
            TextureUsage::DEPTH_STENCIL_ATTACHMENT
        } else {
            TextureUsage::COLOR_ATTACHMENT
        };
        Self {
            width,
            height,
            format,
            usage: TextureUsage::SAMPLED | attachment,
            ..Default::default()
        }
    }

    /// Set the amount of mip levels.
    pub fn mip_levels(mut self, levels: u32) -> Self {
        self.mip_levels = levels;
        self
    }

    /// Set the MSAA sample count.
    pub fn samples(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    /// Replace the usage flags.
    pub fn usage(mut self, usage: TextureUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Set the optimized clear value.
    pub fn clear(mut self, clear: ClearValue) -> Self {
        self.clear = clear;
        self
    }

    /// Size of the top mip level in bytes.
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.depth as u64 * self.format.bytes_per_pixel() as u64 * self.sample_count as u64
    }

    /// Structural equality used for pooling. The clear value only needs to match in kind.
    pub fn is_compatible(&self, other: &TextureDesc) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.depth == other.depth
            && self.format == other.format
            && self.mip_levels == other.mip_levels
            && self.sample_count == other.sample_count
            && self.usage == other.usage
            && self.clear.kind() == other.clear.kind()
    }
}

/// Describes a buffer.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct BufferDesc {
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferDesc {
    /// Describe a buffer of `size` bytes.
    pub fn new(size: u64, usage: BufferUsage) -> Self {
        Self {
            size,
            usage,
        }
    }

    /// Structural equality used for pooling.
    pub fn is_compatible(&self, other: &BufferDesc) -> bool {
        self == other
    }
}

/// Descriptor of any resource the graph tracks.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDesc {
    Texture(TextureDesc),
    Buffer(BufferDesc),
}

impl ResourceDesc {
    /// Get the resource type this descriptor describes.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceDesc::Texture(_) => ResourceType::Texture,
            ResourceDesc::Buffer(_) => ResourceType::Buffer,
        }
    }

    /// Returns true if a resource created from `self` can stand in for one created from `other`.
    pub fn is_compatible(&self, other: &ResourceDesc) -> bool {
        match (self, other) {
            (ResourceDesc::Texture(lhs), ResourceDesc::Texture(rhs)) => lhs.is_compatible(rhs),
            (ResourceDesc::Buffer(lhs), ResourceDesc::Buffer(rhs)) => lhs.is_compatible(rhs),
            _ => false,
        }
    }
}

impl From<TextureDesc> for ResourceDesc {
    fn from(value: TextureDesc) -> Self {
        ResourceDesc::Texture(value)
    }
}

impl From<BufferDesc> for ResourceDesc {
    fn from(value: BufferDesc) -> Self {
        ResourceDesc::Buffer(value)
    }
}
