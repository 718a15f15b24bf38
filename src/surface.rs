//! Raster surfaces the sketchpad paints onto.
//!
//! A [`Surface`] is a fixed-size RGBA pixel grid with the handful of drawing operations the
//! sketchpad needs. [`PixelSurface`] is the in-memory implementation used for both the
//! background and the drawing layer; its pixels are straight (non-premultiplied) RGBA8.

use std::fmt;

use egui::{Color32, Pos2, Rect, vec2};
use image::RgbaImage;

use crate::error::{SketchError, SketchResult};

/// How a stroke combines with the pixels already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeMode {
    /// Paint the color over the existing pixels
    SourceOver,
    /// Remove existing pixels towards full transparency; the color is ignored
    DestinationOut,
}

/// Width, color and composite mode of a stroked line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: Color32,
    pub mode: CompositeMode,
}

/// An immutable full-resolution copy of a surface's pixels
#[derive(Clone, PartialEq)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Size of the captured pixel data in bytes
    pub fn byte_len(&self) -> usize {
        self.pixels.as_raw().len()
    }

    /// Straight RGBA value of one pixel. Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// A 2D raster the sketchpad draws onto.
///
/// Coordinates are in pixels with the origin at the top-left corner; pixel `(x, y)` covers the
/// square `[x, x + 1) × [y, y + 1)`, so a line along `y = 40` straddles rows 39 and 40.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// The rectangle covering the whole surface
    fn full_rect(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(self.width() as f32, self.height() as f32))
    }

    /// Resize the surface. All existing content is lost and every pixel becomes transparent.
    fn set_dimensions(&mut self, width: u32, height: u32);

    /// Paint `color` over every pixel whose center lies inside `rect`
    fn fill_rect(&mut self, rect: Rect, color: Color32);

    /// Reset every pixel whose center lies inside `rect` to transparent
    fn clear_rect(&mut self, rect: Rect);

    /// Stroke a straight segment with round caps
    fn stroke_line(&mut self, from: Pos2, to: Pos2, style: &LineStyle);

    /// Paint a filled circle
    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    /// Copy the current pixels out. Fails if the platform cannot hold another copy.
    fn capture(&self) -> SketchResult<Snapshot>;

    /// Write a snapshot's pixels back at the origin, replacing what is there
    fn restore(&mut self, snapshot: &Snapshot);
}

#[derive(Clone, Copy)]
enum Paint {
    Over([u8; 4]),
    Erase,
}

/// In-memory surface backed by an [`RgbaImage`]
#[derive(Clone)]
pub struct PixelSurface {
    image: RgbaImage,
    /// Largest snapshot (in bytes) `capture` will produce
    capture_limit: Option<usize>,
}

impl PixelSurface {
    /// A fully transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            capture_limit: None,
        }
    }

    pub fn with_capture_limit(mut self, limit: Option<usize>) -> Self {
        self.capture_limit = limit;
        self
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Straight RGBA value of one pixel. Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// True if every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.image.width() as usize, self.image.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.image.as_raw())
    }

    /// Pixel index range `(x0, y0, x1, y1)`, ends exclusive, of the pixels centered in `rect`
    fn pixel_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let clamp = |v: f32, max: u32| (v - 0.5).ceil().clamp(0.0, max as f32) as u32;
        let x0 = clamp(rect.min.x, self.width());
        let x1 = clamp(rect.max.x, self.width());
        let y0 = clamp(rect.min.y, self.height());
        let y1 = clamp(rect.max.y, self.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Apply `paint` to every pixel in `bounds`, weighted by the coverage at its center
    fn paint_coverage(&mut self, bounds: Rect, paint: Paint, coverage_at: impl Fn(Pos2) -> f32) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(bounds) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let coverage = coverage_at(Pos2::new(x as f32 + 0.5, y as f32 + 0.5));
                if coverage <= 0.0 {
                    continue;
                }
                let pixel = self.image.get_pixel_mut(x, y);
                pixel.0 = match paint {
                    Paint::Over(color) => blend_over(pixel.0, color, coverage),
                    Paint::Erase => erase(pixel.0, coverage),
                };
            }
        }
    }
}

impl fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelSurface")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("capture_limit", &self.capture_limit)
            .finish()
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let paint = Paint::Over(color.to_srgba_unmultiplied());
        self.paint_coverage(rect, paint, |_| 1.0);
    }

    fn clear_rect(&mut self, rect: Rect) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.get_pixel_mut(x, y).0 = [0; 4];
            }
        }
    }

    fn stroke_line(&mut self, from: Pos2, to: Pos2, style: &LineStyle) {
        let radius = style.width / 2.0;
        let bounds = Rect::from_two_pos(from, to).expand(radius + 1.0);
        let paint = match style.mode {
            CompositeMode::SourceOver => Paint::Over(style.color.to_srgba_unmultiplied()),
            CompositeMode::DestinationOut => Paint::Erase,
        };
        self.paint_coverage(bounds, paint, |p| {
            coverage(distance_to_segment(p, from, to), radius)
        });
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        let bounds = Rect::from_center_size(center, vec2(2.0 * radius + 2.0, 2.0 * radius + 2.0));
        let paint = Paint::Over(color.to_srgba_unmultiplied());
        self.paint_coverage(bounds, paint, |p| coverage(p.distance(center), radius));
    }

    fn capture(&self) -> SketchResult<Snapshot> {
        let bytes = self.image.as_raw().len();
        if let Some(limit) = self.capture_limit {
            if bytes > limit {
                return Err(SketchError::SnapshotTooLarge { bytes, limit });
            }
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| SketchError::SnapshotAlloc { bytes })?;
        buffer.extend_from_slice(self.image.as_raw());

        let pixels = RgbaImage::from_raw(self.width(), self.height(), buffer)
            .ok_or(SketchError::SnapshotAlloc { bytes })?;
        Ok(Snapshot { pixels })
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.pixels.dimensions() == self.image.dimensions() {
            self.image.copy_from_slice(snapshot.pixels.as_raw());
            return;
        }

        // Captured before a resize: write the overlapping region only.
        let width = self.width().min(snapshot.width());
        let height = self.height().min(snapshot.height());
        for y in 0..height {
            for x in 0..width {
                self.image.put_pixel(x, y, *snapshot.pixels.get_pixel(x, y));
            }
        }
    }
}

/// Anti-aliased coverage of a pixel whose center is `distance` from a shape of `radius`
fn coverage(distance: f32, radius: f32) -> f32 {
    (radius - distance + 0.5).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Straight-alpha "source-over" of `src`, scaled by `coverage`, onto `dst`
pub(crate) fn blend_over(dst: [u8; 4], src: [u8; 4], coverage: f32) -> [u8; 4] {
    let sa = src[3] as f32 / 255.0 * coverage;
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= f32::EPSILON {
        return [0; 4];
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    [
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// "destination-out": reduce alpha by `coverage`
fn erase(dst: [u8; 4], coverage: f32) -> [u8; 4] {
    let alpha = (dst[3] as f32 * (1.0 - coverage)).round().clamp(0.0, 255.0) as u8;
    if alpha == 0 {
        [0; 4]
    } else {
        [dst[0], dst[1], dst[2], alpha]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen(width: f32, color: Color32) -> LineStyle {
        LineStyle {
            width,
            color,
            mode: CompositeMode::SourceOver,
        }
    }

    fn eraser(width: f32) -> LineStyle {
        LineStyle {
            width,
            color: Color32::BLACK,
            mode: CompositeMode::DestinationOut,
        }
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let surface = PixelSurface::new(4, 3);
        assert_eq!(surface.size(), (4, 3));
        assert!(surface.is_blank());
    }

    #[test]
    fn test_vertical_line_coverage() {
        let mut surface = PixelSurface::new(40, 70);
        surface.stroke_line(Pos2::new(10.0, 10.0), Pos2::new(10.0, 50.0), &pen(5.0, Color32::BLACK));

        // Fully covered columns 8..=11, half-covered edges at 7 and 12.
        for x in 8..=11 {
            assert_eq!(surface.pixel(x, 30), [0, 0, 0, 255], "column {x}");
        }
        assert_eq!(surface.pixel(7, 30)[3], 128);
        assert_eq!(surface.pixel(12, 30)[3], 128);
        assert_eq!(surface.pixel(6, 30)[3], 0);
        assert_eq!(surface.pixel(13, 30)[3], 0);

        // Round caps extend half the width past each end point.
        assert_eq!(surface.pixel(9, 8)[3], 255);
        assert_eq!(surface.pixel(9, 51)[3], 255);
        assert_eq!(surface.pixel(9, 55)[3], 0);
        assert_eq!(surface.pixel(9, 4)[3], 0);
    }

    #[test]
    fn test_eraser_leaves_transparent_pixels() {
        let mut surface = PixelSurface::new(30, 30);
        surface.fill_rect(surface.full_rect(), Color32::RED);
        surface.stroke_line(Pos2::new(0.0, 15.0), Pos2::new(30.0, 15.0), &eraser(6.0));

        assert_eq!(surface.pixel(10, 15), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(10, 13), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(10, 2), [255, 0, 0, 255]);
    }

    #[test]
    fn test_eraser_ignores_color() {
        let mut surface = PixelSurface::new(10, 10);
        surface.fill_rect(surface.full_rect(), Color32::BLUE);
        let style = LineStyle {
            color: Color32::RED,
            ..eraser(4.0)
        };
        surface.stroke_line(Pos2::new(5.0, 0.0), Pos2::new(5.0, 10.0), &style);
        assert_eq!(surface.pixel(5, 5), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(0, 5), [0, 0, 255, 255]);
    }

    #[test]
    fn test_horizontal_hairline_straddles_rows() {
        let mut surface = PixelSurface::new(20, 60);
        surface.stroke_line(Pos2::new(0.0, 40.0), Pos2::new(20.0, 40.0), &pen(1.0, Color32::BLACK));
        assert_eq!(surface.pixel(10, 39)[3], 128);
        assert_eq!(surface.pixel(10, 40)[3], 128);
        assert_eq!(surface.pixel(10, 38)[3], 0);
        assert_eq!(surface.pixel(10, 41)[3], 0);
    }

    #[test]
    fn test_fill_and_clear_rect() {
        let mut surface = PixelSurface::new(10, 10);
        surface.fill_rect(Rect::from_min_max(Pos2::new(2.0, 2.0), Pos2::new(5.0, 4.0)), Color32::GREEN);
        assert_eq!(surface.pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(surface.pixel(4, 3), [0, 255, 0, 255]);
        assert_eq!(surface.pixel(5, 3), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(4, 4), [0, 0, 0, 0]);

        surface.clear_rect(surface.full_rect());
        assert!(surface.is_blank());
    }

    #[test]
    fn test_fill_circle() {
        let mut surface = PixelSurface::new(40, 40);
        surface.fill_circle(Pos2::new(20.0, 20.0), 2.0, Color32::BLACK);
        assert_eq!(surface.pixel(19, 19)[3], 255);
        assert_eq!(surface.pixel(20, 20)[3], 255);
        assert_eq!(surface.pixel(25, 20)[3], 0);
        assert_eq!(surface.pixel(20, 14)[3], 0);
    }

    #[test]
    fn test_capture_restore_is_exact() {
        let mut surface = PixelSurface::new(16, 16);
        let style = pen(3.0, Color32::from_rgba_unmultiplied(200, 100, 50, 180));
        surface.stroke_line(Pos2::new(1.0, 1.0), Pos2::new(14.0, 9.0), &style);
        let snapshot = surface.capture().unwrap();
        let before = surface.image().clone();

        surface.stroke_line(Pos2::new(0.0, 15.0), Pos2::new(15.0, 0.0), &pen(4.0, Color32::WHITE));
        assert_ne!(surface.image(), &before);

        surface.restore(&snapshot);
        assert_eq!(surface.image(), &before);
        assert_eq!(snapshot.byte_len(), 16 * 16 * 4);
    }

    #[test]
    fn test_capture_limit() {
        let surface = PixelSurface::new(10, 10).with_capture_limit(Some(399));
        match surface.capture() {
            Err(SketchError::SnapshotTooLarge { bytes, limit }) => {
                assert_eq!(bytes, 400);
                assert_eq!(limit, 399);
            }
            other => panic!("unexpected capture result: {other:?}"),
        }

        let surface = PixelSurface::new(10, 10).with_capture_limit(Some(400));
        assert!(surface.capture().is_ok());
    }

    #[test]
    fn test_restore_after_resize_is_clipped() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(surface.full_rect(), Color32::RED);
        let snapshot = surface.capture().unwrap();

        surface.set_dimensions(6, 2);
        assert!(surface.is_blank());
        surface.restore(&snapshot);

        assert_eq!(surface.pixel(3, 1), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(4, 1), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(5, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_blend_over_half_alpha() {
        let out = blend_over([100, 100, 100, 255], [200, 0, 0, 128], 1.0);
        assert_eq!(out, [150, 50, 50, 255]);
    }

    #[test]
    fn test_shapes_outside_surface_are_ignored() {
        let mut surface = PixelSurface::new(5, 5);
        surface.stroke_line(Pos2::new(-50.0, -50.0), Pos2::new(-40.0, -20.0), &pen(3.0, Color32::RED));
        surface.fill_circle(Pos2::new(100.0, 100.0), 2.0, Color32::RED);
        assert!(surface.is_blank());
    }
}
