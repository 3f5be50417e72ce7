use serde::Serialize;
use std::fmt;

use crate::geometry::pixel_to_percent;

/// Sequential identifier; reference and marked points are numbered independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PointId {
    Reference(usize),
    Marked(usize),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Reference(n) => write!(f, "ref-{n}"),
            PointId::Marked(n) => write!(f, "marked-{n}"),
        }
    }
}

/// A position on the image in native pixels, with its percentage equivalent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: PointId,
    pub x: f64,
    pub y: f64,
    pub percent_x: f64,
    pub percent_y: f64,
    pub is_marked: bool,
    pub is_active: bool,
}

impl Point {
    pub fn reference(index: usize, x: f64, y: f64, dims: ImageDimensions) -> Self {
        Self::new(PointId::Reference(index), x, y, dims, false)
    }

    pub fn marked(index: usize, x: f64, y: f64, dims: ImageDimensions) -> Self {
        Self::new(PointId::Marked(index), x, y, dims, true)
    }

    fn new(id: PointId, x: f64, y: f64, dims: ImageDimensions, is_marked: bool) -> Self {
        let (percent_x, percent_y) = pixel_to_percent(x, y, dims.width(), dims.height());
        Self {
            id,
            x,
            y,
            percent_x,
            percent_y,
            is_marked,
            is_active: false,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Native pixel size of the loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> f64 {
        self.width as f64
    }

    pub fn height(&self) -> f64 {
        self.height as f64
    }
}
