//! Decoded image cache and async image sources.

use crate::renderer::{RenderError, RenderResult};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tiny_skia::{IntSize, Pixmap};

/// Boxed future for image loading.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Where shape and background images come from.
///
/// `None` means the image is not available; the shape using it is simply
/// not drawn.
pub trait ImageSource {
    fn load(&self, src: &str) -> BoxFuture<'_, Option<Vec<u8>>>;
}

/// Images held in memory, keyed by source name.
#[derive(Debug, Default, Clone)]
pub struct MemoryImageSource {
    images: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, src: impl Into<String>, bytes: Vec<u8>) {
        self.images.insert(src.into(), bytes);
    }
}

impl ImageSource for MemoryImageSource {
    fn load(&self, src: &str) -> BoxFuture<'_, Option<Vec<u8>>> {
        let bytes = self.images.get(src).cloned();
        Box::pin(async move { bytes })
    }
}

/// Images read from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirImageSource {
    root: PathBuf,
}

impl DirImageSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ImageSource for DirImageSource {
    fn load(&self, src: &str) -> BoxFuture<'_, Option<Vec<u8>>> {
        let path = self.root.join(src.trim_start_matches('/'));
        Box::pin(async move {
            match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    log::warn!("Could not read image {}: {e}", path.display());
                    None
                }
            }
        })
    }
}

/// Decode PNG/JPEG bytes into a premultiplied pixmap.
pub fn decode_image(src: &str, bytes: &[u8]) -> RenderResult<Pixmap> {
    let decode_err = |message: String| RenderError::ImageDecode {
        src: src.to_string(),
        message,
    };
    let rgba = ::image::load_from_memory(bytes)
        .map_err(|e| decode_err(e.to_string()))?
        .to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut data = rgba.into_raw();
    for px in data.chunks_exact_mut(4) {
        let a = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| decode_err(format!("empty image {width}x{height}")))?;
    Pixmap::from_vec(data, size).ok_or_else(|| decode_err("pixel buffer size mismatch".into()))
}

/// Decoded images keyed by source name, so nothing is decoded per frame.
#[derive(Debug, Default)]
pub struct ImageCache {
    images: HashMap<String, Pixmap>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store `bytes` under `src`, replacing any previous image.
    pub fn insert_encoded(&mut self, src: &str, bytes: &[u8]) -> RenderResult<()> {
        let pixmap = decode_image(src, bytes)?;
        self.images.insert(src.to_string(), pixmap);
        Ok(())
    }

    pub fn get(&self, src: &str) -> Option<&Pixmap> {
        self.images.get(src)
    }

    pub fn contains(&self, src: &str) -> bool {
        self.images.contains_key(src)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
