//! Descriptors for the concrete resources a frame graph materializes.
//!
//! The graph does not interpret descriptors beyond comparing them. Two descriptors describe interchangeable
//! resources if [`ResourceDesc::is_compatible`](desc::ResourceDesc::is_compatible) holds, which is what the
//! [`DefaultAllocator`](crate::DefaultAllocator) uses to recycle pooled resources.

pub mod desc;
