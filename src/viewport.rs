use ratatui::layout::Rect;

use crate::point::ImageDimensions;

/// Display units covered by one terminal column
pub const DOTS_PER_COL: f64 = 10.0;
/// Display units covered by one terminal row (cells are roughly twice as tall as wide)
pub const DOTS_PER_ROW: f64 = 20.0;

/// Placement of an image inside a terminal area.
///
/// Maps between three spaces: terminal cells, display units (a fixed number
/// of units per cell) and the image's native pixels. The image is fitted
/// into the available area keeping its aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub image: ImageDimensions,
}

impl Viewport {
    /// Largest aspect-preserving placement of `image` inside `bounds`, centered.
    pub fn fit(bounds: Rect, image: ImageDimensions) -> Option<Self> {
        if bounds.width == 0 || bounds.height == 0 || image.width == 0 || image.height == 0 {
            return None;
        }
        let aspect = image.width() / image.height();
        let bounds_w = bounds.width as f64 * DOTS_PER_COL;
        let bounds_h = bounds.height as f64 * DOTS_PER_ROW;

        let (cols, rows) = if bounds_w / bounds_h > aspect {
            let cols = ((bounds_h * aspect) / DOTS_PER_COL).floor() as u16;
            (cols.clamp(1, bounds.width), bounds.height)
        } else {
            let rows = ((bounds_w / aspect) / DOTS_PER_ROW).floor() as u16;
            (bounds.width, rows.clamp(1, bounds.height))
        };

        let area = Rect {
            x: bounds.x + (bounds.width - cols) / 2,
            y: bounds.y + (bounds.height - rows) / 2,
            width: cols,
            height: rows,
        };
        Some(Self { area, image })
    }

    /// Display units per image pixel, per axis
    pub fn scale(&self) -> (f64, f64) {
        (
            self.area.width as f64 * DOTS_PER_COL / self.image.width(),
            self.area.height as f64 * DOTS_PER_ROW / self.image.height(),
        )
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.area.x
            && col < self.area.x + self.area.width
            && row >= self.area.y
            && row < self.area.y + self.area.height
    }

    /// Center of a terminal cell in display units, relative to the viewport origin
    pub fn cell_to_display(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        if !self.contains(col, row) {
            return None;
        }
        Some((
            ((col - self.area.x) as f64 + 0.5) * DOTS_PER_COL,
            ((row - self.area.y) as f64 + 0.5) * DOTS_PER_ROW,
        ))
    }

    /// Image pixel coordinates under the center of a terminal cell
    pub fn cell_to_image(&self, col: u16, row: u16) -> Option<(f64, f64)> {
        let (dx, dy) = self.cell_to_display(col, row)?;
        let (sx, sy) = self.scale();
        Some((dx / sx, dy / sy))
    }

    /// Terminal cell showing the given image pixel, clamped to the viewport
    pub fn image_to_cell(&self, x: f64, y: f64) -> (u16, u16) {
        let (sx, sy) = self.scale();
        let col = ((x * sx) / DOTS_PER_COL).floor().max(0.0) as u16;
        let row = ((y * sy) / DOTS_PER_ROW).floor().max(0.0) as u16;
        (
            self.area.x + col.min(self.area.width - 1),
            self.area.y + row.min(self.area.height - 1),
        )
    }
}
