//! Renderer-agnostic draw primitives.
//!
//! The layout engine only emits [`Primitive`]s with absolute coordinates. Painting them on an
//! actual surface is the job of a [`Renderer`].

use std::fmt;

/// Named colours used by the schematic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Color {
    Black,
    Blue,
    DarkBlue,
    Green,
    DarkGreen,
}

impl Color {
    /// RGB components, matching the conventional 16-colour palette.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Black => (0, 0, 0),
            Color::Blue => (0, 0, 255),
            Color::DarkBlue => (0, 0, 128),
            Color::Green => (0, 255, 0),
            Color::DarkGreen => (0, 128, 0),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.rgb();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

/// Outline style of a shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

/// Axis-aligned rectangle, `(x, y)` is the top-left corner.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// One shape or label request.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rectangle { rect: Rect, stroke: Stroke },
    /// Ellipse inscribed in `rect`.
    Ellipse { rect: Rect, stroke: Stroke },
    Line { x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke },
    /// Text with its top-left corner at `(x, y)`.
    Label { x: f64, y: f64, text: String, color: Color },
}

impl Primitive {
    pub fn is_rectangle(&self) -> bool {
        matches!(self, Primitive::Rectangle { .. })
    }

    pub fn is_ellipse(&self) -> bool {
        matches!(self, Primitive::Ellipse { .. })
    }

    pub fn is_line(&self) -> bool {
        matches!(self, Primitive::Line { .. })
    }

    /// Text of a label primitive.
    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::Label { text, .. } => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Rectangle { rect, stroke } => write!(
                f,
                "rect x={:.2} y={:.2} w={:.2} h={:.2} stroke={}/{}",
                rect.x, rect.y, rect.w, rect.h, stroke.color, stroke.width
            ),
            Primitive::Ellipse { rect, stroke } => write!(
                f,
                "ellipse x={:.2} y={:.2} w={:.2} h={:.2} stroke={}/{}",
                rect.x, rect.y, rect.w, rect.h, stroke.color, stroke.width
            ),
            Primitive::Line { x1, y1, x2, y2, stroke } => write!(
                f,
                "line ({:.2}, {:.2}) -> ({:.2}, {:.2}) stroke={}/{}",
                x1, y1, x2, y2, stroke.color, stroke.width
            ),
            Primitive::Label { x, y, text, color } => {
                write!(f, "label x={:.2} y={:.2} {:?} color={}", x, y, text, color)
            }
        }
    }
}

/// Paints primitives onto some surface.
///
/// Implementors provide one method per primitive kind; [`Renderer::draw`] dispatches.
pub trait Renderer {
    /// Called once before any primitive, with the canvas bounds.
    fn begin(&mut self, _bounds: Rect) {}

    fn rectangle(&mut self, rect: Rect, stroke: Stroke);
    fn ellipse(&mut self, rect: Rect, stroke: Stroke);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke: Stroke);
    fn label(&mut self, at: (f64, f64), text: &str, color: Color);

    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rectangle { rect, stroke } => self.rectangle(*rect, *stroke),
            Primitive::Ellipse { rect, stroke } => self.ellipse(*rect, *stroke),
            Primitive::Line { x1, y1, x2, y2, stroke } => self.line((*x1, *y1), (*x2, *y2), *stroke),
            Primitive::Label { x, y, text, color } => self.label((*x, *y), text, *color),
        }
    }
}
