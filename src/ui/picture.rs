use ratatui::{
    buffer::Buffer,
    style::{Color, Modifier, Style},
};

use crate::app::{MissFlash, Thumbnail};
use crate::point::Point;
use crate::viewport::Viewport;

pub const UNMARKED_COLOR: Color = Color::Black;
pub const ACTIVE_COLOR: Color = Color::Rgb(255, 102, 0);
pub const MARKED_COLOR: Color = Color::Rgb(0, 170, 0);
pub const MISS_COLOR: Color = Color::Rgb(255, 0, 0);
pub const CANVAS_COLOR: Color = Color::Rgb(248, 248, 248);

const UPPER_HALF_BLOCK: &str = "▀";

/// Paint the resampled image: each cell carries the upper pixel as foreground
/// and the lower pixel as background of a half block.
pub fn render_thumbnail(vp: &Viewport, thumb: &Thumbnail, buf: &mut Buffer) {
    for row in 0..vp.area.height {
        for col in 0..vp.area.width {
            let (x, y) = (col as u32, row as u32 * 2);
            if x >= thumb.pixels.width() || y + 1 >= thumb.pixels.height() {
                continue;
            }
            let top = thumb.pixels.get_pixel(x, y).0;
            let bottom = thumb.pixels.get_pixel(x, y + 1).0;
            if let Some(cell) = buf.cell_mut((vp.area.x + col, vp.area.y + row)) {
                cell.set_symbol(UPPER_HALF_BLOCK)
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}

/// Blank drawing surface the player marks on
pub fn render_canvas(vp: &Viewport, buf: &mut Buffer) {
    buf.set_style(vp.area, Style::default().bg(CANVAS_COLOR));
}

/// Crosshair glyph for a point: active points pulse between two glyphs
pub fn crosshair_style(point: &Point, tick: u64, dim: bool) -> (&'static str, Style) {
    let color = if point.is_marked {
        MARKED_COLOR
    } else if point.is_active {
        ACTIVE_COLOR
    } else {
        UNMARKED_COLOR
    };
    let symbol = if point.is_active && (tick / 3) % 2 == 0 {
        "✚"
    } else {
        "+"
    };
    let mut style = Style::default()
        .fg(color)
        .bg(Color::White)
        .add_modifier(Modifier::BOLD);
    if dim {
        style = style.add_modifier(Modifier::DIM);
    }
    (symbol, style)
}

pub fn render_points(vp: &Viewport, points: &[Point], tick: u64, dim: bool, buf: &mut Buffer) {
    for point in points {
        let (symbol, style) = crosshair_style(point, tick, dim);
        let (col, row) = vp.image_to_cell(point.x, point.y);
        if let Some(cell) = buf.cell_mut((col, row)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }
}

pub fn render_miss(vp: &Viewport, flash: &MissFlash, buf: &mut Buffer) {
    let (col, row) = vp.image_to_cell(flash.x, flash.y);
    if let Some(cell) = buf.cell_mut((col, row)) {
        cell.set_symbol("x").set_style(
            Style::default()
                .fg(MISS_COLOR)
                .bg(CANVAS_COLOR)
                .add_modifier(Modifier::BOLD),
        );
    }
}
