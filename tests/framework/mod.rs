#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{bail, ensure, Result};

use framegraph as fg;
use fg::{BufferDesc, CompletionToken, Device, FrameGraph, PassResources, TextureDesc, TextureFormat};

/// Texture created by the [`MockDevice`]. The serial uniquely identifies every texture the device ever created.
#[derive(Debug)]
pub struct MockTexture {
    pub name: String,
    pub desc: TextureDesc,
    pub serial: usize,
}

/// Buffer created by the [`MockDevice`].
#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub desc: BufferDesc,
    pub serial: usize,
}

/// Headless device for automated tests. Records every creation and submission instead of talking to a GPU.
/// Pass closures record into a plain list of strings.
#[derive(Debug, Default)]
pub struct MockDevice {
    /// Names passed to every successful create call, in order.
    pub created: Vec<String>,
    /// Every submitted command context, in order.
    pub submitted: Vec<Vec<String>>,
    /// Creating a resource with this name fails.
    pub fail_on: Option<String>,
    next_serial: usize,
    next_token: u64,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands recorded by the last submitted frame.
    pub fn last_frame(&self) -> &[String] {
        self.submitted.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn serial(&mut self, name: &str) -> Result<usize> {
        if self.fail_on.as_deref() == Some(name) {
            bail!("device lost while creating `{name}`");
        }
        self.created.push(name.to_owned());
        self.next_serial += 1;
        Ok(self.next_serial)
    }
}

impl Device for MockDevice {
    type Texture = MockTexture;
    type Buffer = MockBuffer;
    type CommandContext = Vec<String>;

    fn create_texture(&mut self, name: &str, desc: &TextureDesc) -> Result<MockTexture> {
        Ok(MockTexture {
            name: name.to_owned(),
            desc: desc.clone(),
            serial: self.serial(name)?,
        })
    }

    fn create_buffer(&mut self, name: &str, desc: &BufferDesc) -> Result<MockBuffer> {
        Ok(MockBuffer {
            name: name.to_owned(),
            desc: desc.clone(),
            serial: self.serial(name)?,
        })
    }

    fn begin_frame(&mut self) -> Result<Vec<String>> {
        Ok(vec![])
    }

    fn submit(&mut self, cmd: Vec<String>) -> Result<CompletionToken> {
        self.submitted.push(cmd);
        self.next_token += 1;
        Ok(CompletionToken(self.next_token))
    }

    fn is_complete(&self, token: CompletionToken) -> bool {
        token.value() <= self.next_token
    }

    fn wait(&self, token: CompletionToken) -> Result<()> {
        ensure!(self.is_complete(token), "waited on a token that was never submitted");
        Ok(())
    }
}

pub type Graph<'cb> = FrameGraph<'cb, MockDevice>;

/// Install a logger so `RUST_LOG` works in tests.
pub fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

pub fn texture_desc() -> TextureDesc {
    TextureDesc::new_2d(64, 64, TextureFormat::Rgba8Unorm)
}

pub fn buffer_desc() -> BufferDesc {
    BufferDesc::new(256, fg::BufferUsage::STORAGE)
}

/// Import a texture into the graph, owned by the test.
pub fn import_texture(graph: &mut Graph, name: &str) -> fg::TextureHandle {
    let texture = Arc::new(MockTexture {
        name: name.to_owned(),
        desc: texture_desc(),
        serial: 0,
    });
    graph.import_texture(name, texture_desc(), texture)
}

/// Execute function that records the name of the pass into the command context.
pub fn record<T>(name: &'static str) -> impl FnMut(&T, &mut Vec<String>, &PassResources<MockDevice>) -> Result<()> {
    move |_, cmd, _| {
        cmd.push(name.to_owned());
        Ok(())
    }
}
