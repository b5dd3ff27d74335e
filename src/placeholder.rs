use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::{ImageFormat, Rgba, RgbaImage};

/// Card image size used by the grid.
pub const CARD_IMAGE_SIZE: (u32, u32) = (400, 300);

/// Path of the placeholder image for a given size.
pub fn placeholder_path(width: u32, height: u32) -> String {
    format!("/api/placeholder/{width}/{height}")
}

/// Parse `/api/placeholder/{width}/{height}` back into its dimensions.
pub fn parse_placeholder_path(path: &str) -> Option<(u32, u32)> {
    let rest = path.strip_prefix("/api/placeholder/")?;
    let (w, h) = rest.split_once('/')?;
    let (w, h) = (w.parse().ok()?, h.parse().ok()?);
    (w > 0 && h > 0).then_some((w, h))
}

/// Render a neutral placeholder: light grey with a diagonal cross.
pub fn render_placeholder(width: u32, height: u32) -> Result<Vec<u8>> {
    let background = Rgba([229, 231, 235, 255]);
    let stroke = Rgba([156, 163, 175, 255]);

    let img = RgbaImage::from_fn(width, height, |x, y| {
        // Distance of (x, y) from either diagonal, scaled to pixels.
        let fx = x as f32 / width as f32;
        let fy = y as f32 / height as f32;
        let d = (fx - fy).abs().min((fx + fy - 1.0).abs()) * width.min(height) as f32;
        if d < 1.0 { stroke } else { background }
    });

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("encoding placeholder PNG")?;
    Ok(bytes)
}

// ---------------------------------------------------------------------------
// Resolver: placeholder path → encoded PNG, rendered once per size
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PlaceholderCache {
    rendered: HashMap<(u32, u32), Arc<[u8]>>,
}

impl PlaceholderCache {
    /// PNG bytes for `path`, or `None` if the path is not a placeholder
    /// or rendering failed.
    pub fn resolve(&mut self, path: &str) -> Option<Arc<[u8]>> {
        let size = parse_placeholder_path(path)?;
        if let Some(bytes) = self.rendered.get(&size) {
            return Some(Arc::clone(bytes));
        }
        match render_placeholder(size.0, size.1) {
            Ok(bytes) => {
                let bytes: Arc<[u8]> = bytes.into();
                self.rendered.insert(size, Arc::clone(&bytes));
                Some(bytes)
            }
            Err(e) => {
                log::warn!("Failed to render placeholder {path}: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_template() {
        assert_eq!(placeholder_path(400, 300), "/api/placeholder/400/300");
        assert_eq!(parse_placeholder_path("/api/placeholder/400/300"), Some((400, 300)));
        assert_eq!(parse_placeholder_path("/api/placeholder/0/300"), None);
        assert_eq!(parse_placeholder_path("/img/400/300"), None);
        assert_eq!(parse_placeholder_path("/api/placeholder/400"), None);
    }

    #[test]
    fn rendered_png_has_requested_size() {
        let bytes = render_placeholder(40, 30).unwrap();
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn cache_renders_each_size_once() {
        let mut cache = PlaceholderCache::default();
        let a = cache.resolve("/api/placeholder/8/6").unwrap();
        let b = cache.resolve("/api/placeholder/8/6").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(cache.resolve("not-a-placeholder").is_none());
    }
}
