use anyhow::Result;

use framegraph as fg;
use fg::{Allocator, AllocatorStats, BufferUsage, ClearColor, ClearValue, DefaultAllocator, ResourceDesc, TextureDesc, TextureFormat, TextureUsage};

use crate::framework::{buffer_desc, texture_desc, Graph, MockDevice};

mod framework;

#[derive(Default, Clone)]
struct Output {
    target: fg::TextureHandle,
}

#[test]
fn disjoint_lifetimes_share_backing_texture() -> Result<()> {
    framework::init_logging();
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::new();
    let mut graph = Graph::new();

    for name in ["first", "second"] {
        graph.add_pass(
            name,
            |builder, data: &mut Output| {
                let mut target = builder.create_texture(name, texture_desc());
                data.target = builder.write(&mut target);
                builder.never_cull();
            },
            move |data, cmd, resources| {
                let texture = resources.texture(data.target)?;
                cmd.push(format!("{name}:{}", texture.serial));
                Ok(())
            },
        );
    }
    graph.compile();
    graph.execute(&mut device, &mut allocator)?;

    // Both passes saw the exact same texture object, created for the first pass.
    assert_eq!(device.last_frame(), &["first:1", "second:1"]);
    assert_eq!(device.created, vec![String::from("first")]);
    assert_eq!(
        allocator.stats(),
        AllocatorStats {
            created: 1,
            reused: 1,
            in_use: 0,
            pooled: 1,
        }
    );
    Ok(())
}

#[test]
fn overlapping_lifetimes_get_distinct_textures() -> Result<()> {
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::new();
    let mut graph = Graph::new();

    let first = graph.add_pass(
        "first",
        |builder, data: &mut Output| {
            let mut target = builder.create_texture("a", texture_desc());
            data.target = builder.write(&mut target);
        },
        |_, _, _| Ok(()),
    );
    let input = first.target;
    graph.add_pass(
        "second",
        |builder, data: &mut Output| {
            builder.read(input);
            let mut target = builder.create_texture("b", texture_desc());
            data.target = builder.write(&mut target);
            builder.never_cull();
        },
        move |data, cmd, resources| {
            let a = resources.texture(input)?;
            let b = resources.texture(data.target)?;
            assert!(!std::sync::Arc::ptr_eq(a, b));
            cmd.push(format!("{}:{}", a.serial, b.serial));
            Ok(())
        },
    );
    graph.compile();
    graph.execute(&mut device, &mut allocator)?;

    assert_eq!(device.last_frame(), &["1:2"]);
    assert_eq!(allocator.stats().created, 2);
    Ok(())
}

#[test]
fn pool_reuses_identical_object() -> Result<()> {
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::<MockDevice>::new();
    let desc = ResourceDesc::from(texture_desc());

    let first = allocator.acquire(&mut device, "first", &desc)?;
    let kept = first.clone();
    allocator.release(&desc, first);
    let second = allocator.acquire(&mut device, "second", &desc)?;

    assert!(second.ptr_eq(&kept));
    assert_eq!(device.created.len(), 1);
    Ok(())
}

#[test]
fn incompatible_descriptors_are_not_reused() -> Result<()> {
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::<MockDevice>::new();

    let small = ResourceDesc::from(texture_desc());
    let large = ResourceDesc::from(TextureDesc::new_2d(128, 128, TextureFormat::Rgba8Unorm));
    let buffer = ResourceDesc::from(buffer_desc());

    let texture = allocator.acquire(&mut device, "small", &small)?;
    allocator.release(&small, texture);
    allocator.acquire(&mut device, "large", &large)?;
    allocator.acquire(&mut device, "buffer", &buffer)?;

    assert_eq!(device.created, vec!["small", "large", "buffer"]);
    assert_eq!(allocator.stats().pooled, 1);
    assert_eq!(allocator.stats().in_use, 2);
    Ok(())
}

#[test]
fn usage_flags_must_match_exactly() -> Result<()> {
    let sampled = texture_desc();
    assert!(sampled.usage.contains(TextureUsage::SAMPLED | TextureUsage::COLOR_ATTACHMENT));
    let storage = texture_desc().usage(sampled.usage | TextureUsage::STORAGE);
    assert!(!sampled.is_compatible(&storage));

    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::<MockDevice>::new();
    let uniform = ResourceDesc::from(fg::BufferDesc::new(256, BufferUsage::UNIFORM));
    let buffer = allocator.acquire(&mut device, "uniform", &uniform)?;
    allocator.release(&uniform, buffer);
    allocator.acquire(&mut device, "storage", &ResourceDesc::from(buffer_desc()))?;
    assert_eq!(allocator.stats().reused, 0);
    Ok(())
}

#[test]
fn clear_values_only_compare_by_kind() -> Result<()> {
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::<MockDevice>::new();

    let red = ResourceDesc::from(texture_desc().clear(ClearValue::Color(ClearColor::Float([1.0, 0.0, 0.0, 1.0]))));
    let black = ResourceDesc::from(texture_desc().clear(ClearValue::Color(ClearColor::Float([0.0, 0.0, 0.0, 1.0]))));
    let none = ResourceDesc::from(texture_desc());

    assert!(red.is_compatible(&black));
    assert!(!red.is_compatible(&none));

    let texture = allocator.acquire(&mut device, "red", &red)?;
    allocator.release(&red, texture);
    allocator.acquire(&mut device, "black", &black)?;
    assert_eq!(allocator.stats().reused, 1);
    Ok(())
}

#[test]
fn trim_drops_idle_resources() -> Result<()> {
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::<MockDevice>::new();
    let desc = ResourceDesc::from(buffer_desc());

    let buffer = allocator.acquire(&mut device, "buffer", &desc)?;
    allocator.release(&desc, buffer);

    allocator.end_frame();
    assert_eq!(allocator.trim(2), 0);
    allocator.end_frame();
    allocator.end_frame();
    assert_eq!(allocator.trim(2), 1);
    assert_eq!(allocator.stats().pooled, 0);

    allocator.acquire(&mut device, "buffer", &desc)?;
    assert_eq!(device.created.len(), 2);
    Ok(())
}
