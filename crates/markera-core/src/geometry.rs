use serde::{Deserialize, Serialize};

/// Width and height in pixels. Display sizes are fractional; native page
/// sizes come straight from the document's MediaBox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A rectangle in display space: coordinates relative to the rendered page
/// view at the size it was rendered at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

/// A rectangle in native document space, rounded to whole pixels. This is
/// the unit the parsing backend works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Dimensions captured at the most recent successful page render: the
/// page's native pixel size and the size it is shown at on screen.
///
/// Zooming changes what is on screen but not these values; stored region
/// rectangles keep their meaning relative to the captured render size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageView {
    pub native: Size,
    pub rendered: Size,
}

impl PageView {
    pub fn scale_factor(&self) -> f64 {
        self.native.width / self.rendered.width
    }

    /// Map a display-space rectangle to native page pixels, rounding each
    /// component to the nearest integer.
    pub fn to_native(&self, rect: &Rect) -> PixelRect {
        let s = self.scale_factor();
        PixelRect {
            x: (rect.x * s).round() as i64,
            y: (rect.y * s).round() as i64,
            width: (rect.width * s).round() as i64,
            height: (rect.height * s).round() as i64,
        }
    }

    /// Inverse of [`to_native`](Self::to_native), within rounding error.
    pub fn to_display(&self, rect: &PixelRect) -> Rect {
        let s = self.scale_factor();
        Rect {
            x: rect.x as f64 / s,
            y: rect.y as f64 / s,
            width: rect.width as f64 / s,
            height: rect.height as f64 / s,
        }
    }
}

/// Clamp a dragged position so the rectangle stays inside the page.
///
/// The lower bound wins when the rectangle is wider or taller than the
/// page itself, pinning it to the top-left edge.
pub fn clamp_drag(rect: &Rect, x: f64, y: f64, bounds: Size) -> Rect {
    Rect {
        x: x.min(bounds.width - rect.width).max(0.0),
        y: y.min(bounds.height - rect.height).max(0.0),
        width: rect.width,
        height: rect.height,
    }
}

/// Clamp a resize result. Position is clamped against the requested size
/// first, then the size is capped so the rectangle cannot extend past the
/// page edge from the clamped position.
pub fn clamp_resize(x: f64, y: f64, width: f64, height: f64, bounds: Size) -> Rect {
    let nx = x.min(bounds.width - width).max(0.0);
    let ny = y.min(bounds.height - height).max(0.0);
    Rect {
        x: nx,
        y: ny,
        width: width.min(bounds.width - nx),
        height: height.min(bounds.height - ny),
    }
}
