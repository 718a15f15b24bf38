use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

/// The two layers shown on the canvas, bottom first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Drawing,
}

impl Layer {
    fn texture_name(&self) -> &'static str {
        match self {
            Layer::Background => "sketch_background",
            Layer::Drawing => "sketch_drawing",
        }
    }
}

struct CachedTexture {
    revision: u64,
    handle: TextureHandle,
}

/// One GPU texture per layer, re-uploaded only when the layer's revision changes
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<Layer, CachedTexture>,
    uploads: u64,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `layer` at `revision`. `generator` runs only on a cache miss.
    pub fn texture_for<F>(
        &mut self,
        ctx: &Context,
        layer: Layer,
        revision: u64,
        generator: F,
    ) -> TextureId
    where
        F: FnOnce() -> ColorImage,
    {
        if let Some(cached) = self.textures.get_mut(&layer) {
            if cached.revision != revision {
                cached.handle.set(generator(), TextureOptions::LINEAR);
                cached.revision = revision;
                self.uploads += 1;
            }
            return cached.handle.id();
        }

        let handle = ctx.load_texture(layer.texture_name(), generator(), TextureOptions::LINEAR);
        let id = handle.id();
        self.textures.insert(layer, CachedTexture { revision, handle });
        self.uploads += 1;
        log::debug!("Created texture for {:?} layer", layer);
        id
    }

    /// Drop every texture; they are recreated on next use
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Total number of image uploads performed so far
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}
