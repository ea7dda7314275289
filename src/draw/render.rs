use crate::draw::model::{Color, Point, DEFAULT_PEN_WIDTH};
use crate::draw::surface::Surface;

pub const DEFAULT_BACKING_SCALE: u32 = 2;
/// Widest pen tip in backing pixels.
pub const MAX_BRUSH_WIDTH: u32 = 512;

/// Half-open pixel bounds `[min_x, max_x) x [min_y, max_y)` touched since the
/// last upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl DirtyRect {
    /// Bounds of a brush of radius `pad` dragged from `a` to `b`.
    fn around_segment(a: DevicePoint, b: DevicePoint, pad: i32) -> Self {
        Self {
            min_x: a.0.min(b.0).saturating_sub(pad),
            min_y: a.1.min(b.1).saturating_sub(pad),
            max_x: a.0.max(b.0).saturating_add(pad).saturating_add(1),
            max_y: a.1.max(b.1).saturating_add(pad).saturating_add(1),
        }
    }

    fn covering(width: u32, height: u32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: width as i32,
            max_y: height as i32,
        }
    }

    fn include(self, other: DirtyRect) -> DirtyRect {
        DirtyRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Intersection with a `width` x `height` buffer, `None` when empty.
    pub fn clipped(self, width: u32, height: u32) -> Option<DirtyRect> {
        let rect = DirtyRect {
            min_x: self.min_x.max(0),
            min_y: self.min_y.max(0),
            max_x: self.max_x.min(width as i32),
            max_y: self.max_y.min(height as i32),
        };
        (rect.max_x > rect.min_x && rect.max_y > rect.min_y).then_some(rect)
    }

    pub fn width(self) -> usize {
        (self.max_x - self.min_x).max(0) as usize
    }

    pub fn height(self) -> usize {
        (self.max_y - self.min_y).max(0) as usize
    }
}

type DevicePoint = (i32, i32);

#[derive(Debug, Clone)]
struct BrushMaskRow {
    dy: i32,
    min_dx: i32,
    max_dx: i32,
}

/// Round pen tip, one span per scanline.
#[derive(Debug, Clone)]
struct BrushMask {
    radius: i32,
    rows: Vec<BrushMaskRow>,
}

impl BrushMask {
    fn for_width(stroke_width: u32) -> Self {
        let radius = (stroke_width.min(MAX_BRUSH_WIDTH) / 2) as i32;
        let radius_sq = radius.saturating_mul(radius);
        let mut rows = Vec::with_capacity(radius.saturating_mul(2).saturating_add(1) as usize);
        for dy in -radius..=radius {
            let mut max_dx = radius;
            while max_dx >= 0 && max_dx.saturating_mul(max_dx).saturating_add(dy * dy) > radius_sq {
                max_dx -= 1;
            }
            if max_dx >= 0 {
                rows.push(BrushMaskRow {
                    dy,
                    min_dx: -max_dx,
                    max_dx,
                });
            }
        }
        Self { radius, rows }
    }
}

/// Fixed-size RGBA8 raster target.
///
/// The buffer holds `logical size * backing scale` pixels; every incoming
/// [`Point`] is in logical units and gets scaled on the way in. The pen is
/// round-capped and `pen_width` logical units wide.
///
/// `stroke()` paints the segments of the current path that have not been
/// painted yet. With opaque pens this is indistinguishable from repainting the
/// whole path each time.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    rgba: Vec<u8>,
    size: (u32, u32),
    scale: u32,
    background: Color,
    pen_color: Color,
    brush: BrushMask,
    segments: Vec<(DevicePoint, DevicePoint)>,
    painted: usize,
    cursor: Option<DevicePoint>,
    subpath_start: Option<DevicePoint>,
    dirty: Option<DirtyRect>,
    revision: u64,
}

impl RasterSurface {
    pub fn new(logical_size: (u32, u32), scale: u32, pen_width: f32) -> Self {
        let scale = scale.max(1);
        let size = (
            logical_size.0.saturating_mul(scale),
            logical_size.1.saturating_mul(scale),
        );
        let len = (size.0 as usize)
            .saturating_mul(size.1 as usize)
            .saturating_mul(4);
        let background = Color::TRANSPARENT;
        let mut rgba = vec![0; len];
        fill(&mut rgba, background);
        Self {
            rgba,
            size,
            scale,
            background,
            pen_color: Color::BLACK,
            brush: BrushMask::for_width(device_width(pen_width, scale)),
            segments: Vec::new(),
            painted: 0,
            cursor: None,
            subpath_start: None,
            dirty: None,
            revision: 0,
        }
    }

    pub fn with_default_pen(logical_size: (u32, u32)) -> Self {
        Self::new(logical_size, DEFAULT_BACKING_SCALE, DEFAULT_PEN_WIDTH)
    }

    pub fn set_pen_width(&mut self, pen_width: f32) {
        self.brush = BrushMask::for_width(device_width(pen_width, self.scale));
    }

    /// Backing-store size in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn logical_size(&self) -> (u32, u32) {
        (self.size.0 / self.scale, self.size.1 / self.scale)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// Bumped whenever pixels change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        let idx = ((y * self.size.0 + x) * 4) as usize;
        let px = self.rgba.get(idx..idx + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Pixel under a logical point.
    pub fn pixel_at(&self, point: Point) -> Option<Color> {
        let (x, y) = self.to_device(point);
        if x < 0 || y < 0 {
            return None;
        }
        self.pixel(x as u32, y as u32)
    }

    pub fn is_blank(&self) -> bool {
        let bg = self.background.to_rgba_array();
        self.rgba.chunks_exact(4).all(|px| px == bg)
    }

    /// Region touched since the last call, clamped to the buffer.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty
            .take()
            .and_then(|rect| rect.clipped(self.size.0, self.size.1))
    }

    fn to_device(&self, point: Point) -> DevicePoint {
        let scale = self.scale as f32;
        ((point.x * scale).round() as i32, (point.y * scale).round() as i32)
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        self.dirty = Some(match self.dirty {
            Some(existing) => existing.include(rect),
            None => rect,
        });
        self.revision = self.revision.wrapping_add(1);
    }

    fn paint_segment(&mut self, start: DevicePoint, end: DevicePoint) {
        let (mut x0, mut y0) = start;
        let (x1, y1) = end;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp((x0, y0));
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
        self.mark_dirty(DirtyRect::around_segment(start, end, self.brush.radius));
    }

    fn stamp(&mut self, center: DevicePoint) {
        let (width, height) = (self.size.0 as i32, self.size.1 as i32);
        let color = self.pen_color.to_rgba_array();
        for row in &self.brush.rows {
            let y = center.1 + row.dy;
            if y < 0 || y >= height {
                continue;
            }
            let x0 = (center.0 + row.min_dx).max(0);
            let x1 = (center.0 + row.max_dx).min(width - 1);
            if x0 > x1 {
                continue;
            }
            let row_base = (y as usize) * (width as usize) * 4;
            for x in x0..=x1 {
                let idx = row_base + (x as usize) * 4;
                self.rgba[idx..idx + 4].copy_from_slice(&color);
            }
        }
    }
}

impl Surface for RasterSurface {
    fn begin_path(&mut self) {
        self.segments.clear();
        self.painted = 0;
        self.cursor = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, point: Point) {
        let point = self.to_device(point);
        self.cursor = Some(point);
        self.subpath_start = Some(point);
    }

    fn line_to(&mut self, point: Point) {
        let point = self.to_device(point);
        match self.cursor {
            Some(from) => self.segments.push((from, point)),
            // line_to without a current point behaves as move_to
            None => self.subpath_start = Some(point),
        }
        self.cursor = Some(point);
    }

    fn stroke(&mut self) {
        let pending: Vec<_> = self.segments[self.painted..].to_vec();
        for (start, end) in pending {
            self.paint_segment(start, end);
        }
        self.painted = self.segments.len();
    }

    fn close_path(&mut self) {
        if let (Some(cursor), Some(start)) = (self.cursor, self.subpath_start) {
            if cursor != start {
                self.segments.push((cursor, start));
            }
            self.cursor = Some(start);
        }
    }

    fn clear(&mut self) {
        fill(&mut self.rgba, self.background);
        self.mark_dirty(DirtyRect::covering(self.size.0, self.size.1));
    }

    fn set_pen_color(&mut self, color: Color) {
        self.pen_color = color;
    }
}

fn device_width(pen_width: f32, scale: u32) -> u32 {
    let width = (pen_width.max(1.0) * scale as f32).round();
    if width.is_finite() {
        (width as u32).min(MAX_BRUSH_WIDTH)
    } else {
        MAX_BRUSH_WIDTH
    }
}

fn fill(pixels: &mut [u8], color: Color) {
    let color = color.to_rgba_array();
    for px in pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&color);
    }
}
