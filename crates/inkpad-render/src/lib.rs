//! Inkpad Render Library
//!
//! CPU rasterization for Inkpad: the tiny-skia ink buffer and its PNG
//! snapshot codec, image loading, frame compositing, and the [`Sketchpad`]
//! that ties them to an [`inkpad_core::Canvas`].

pub mod images;
mod ink;
mod renderer;
mod sketchpad;

pub use images::{BoxFuture, DirImageSource, ImageCache, ImageSource, MemoryImageSource};
pub use ink::{PixmapRaster, PngCodec};
pub use renderer::{HANDLE_RADIUS, RenderError, RenderOptions, RenderResult, render};
pub use sketchpad::Sketchpad;

pub use tiny_skia::Pixmap;
