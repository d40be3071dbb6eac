use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use framegraph as fg;
use fg::{DefaultAllocator, DumpFormat, GraphSettingsBuilder, GraphViz};

use crate::framework::{import_texture, record, texture_desc, Graph, MockDevice};

mod framework;

#[derive(Default, Clone)]
struct Output {
    target: fg::TextureHandle,
}

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("framegraph_{name}_{}", std::process::id()))
}

fn populate(graph: &mut Graph) {
    let backbuffer = import_texture(graph, "backbuffer");
    let scene = graph.add_pass(
        "scene",
        |builder, data: &mut Output| {
            let mut color = builder.create_texture("scene_color", texture_desc());
            data.target = builder.write(&mut color);
        },
        record("scene"),
    );
    graph.add_pass(
        "debug_overlay",
        |builder, data: &mut Output| {
            builder.read(scene.target);
            let mut overlay = builder.create_texture("overlay", texture_desc());
            data.target = builder.write(&mut overlay);
        },
        record("debug_overlay"),
    );
    graph.add_pass(
        "composite",
        |builder, data: &mut Output| {
            let mut target = backbuffer;
            builder.read(scene.target);
            data.target = builder.write(&mut target);
        },
        record("composite"),
    );
}

#[test]
fn dot_contains_passes_and_states() -> Result<()> {
    let mut graph = Graph::new();
    populate(&mut graph);
    graph.compile();

    let dot = graph.debug_graph().dot()?;
    assert!(dot.starts_with("digraph"));
    for name in ["scene", "debug_overlay", "composite", "scene_color", "backbuffer"] {
        assert!(dot.contains(name), "dot output is missing {name}");
    }
    // alive pass, culled pass, imported resource, alive resource, culled resource
    for color in ["#5e6df7", "#bdbdbd", "#f7c35e", "#6cf75e", "#f75e70"] {
        assert!(dot.contains(color), "dot output is missing {color}");
    }
    assert!(dot.contains("read"));
    assert!(dot.contains("write"));
    Ok(())
}

#[cfg(feature = "debug-dump")]
#[test]
fn svg_renders() -> Result<()> {
    let mut graph = Graph::new();
    populate(&mut graph);
    graph.compile();

    let svg = graph.debug_graph().svg()?;
    assert!(svg.contains("<svg"));
    Ok(())
}

#[test]
fn dump_graph_writes_files() -> Result<()> {
    let mut graph = Graph::new();
    populate(&mut graph);
    graph.compile();

    let path = scratch_path("dump");
    graph.dump_graph_as(&path, &[DumpFormat::Dot])?;
    let dot_path = path.with_extension("dot");
    let contents = fs::read_to_string(&dot_path)?;
    assert!(contents.contains("composite"));
    fs::remove_file(dot_path)?;
    Ok(())
}

#[test]
fn dump_request_is_one_shot() -> Result<()> {
    let path = scratch_path("one_shot");
    let settings = GraphSettingsBuilder::new().dump(&path, [DumpFormat::Dot]).build();
    let mut device = MockDevice::new();
    let mut allocator = DefaultAllocator::new();
    let mut graph = Graph::with_settings(settings);
    populate(&mut graph);
    graph.compile();

    graph.execute(&mut device, &mut allocator)?;
    assert!(graph.settings().dump.is_none());

    let dot_path = path.with_extension("dot");
    assert!(dot_path.exists());
    fs::remove_file(dot_path)?;
    assert_eq!(device.last_frame(), &["scene", "composite"]);
    Ok(())
}

#[test]
fn dump_to_missing_directory_fails() {
    let mut graph = Graph::new();
    populate(&mut graph);
    graph.compile();

    let path = scratch_path("missing").join("nested").join("graph");
    let err = graph.dump_graph_as(&path, &[DumpFormat::Dot]).unwrap_err();
    assert!(matches!(err.downcast_ref::<fg::Error>(), Some(fg::Error::DumpFailed { .. })));
}
