/// One millimetre in PDF points (1/72 inch).
pub const MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
        }
    }
}

/// Axis-aligned rectangle in PDF user space: `y` is the bottom edge,
/// y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f32 = 0.01;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.top() <= self.top() + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` hex color. Panics on malformed input; only
    /// used with compile-time constants in the style sheet.
    pub fn hex(value: &str) -> Self {
        let raw = value.strip_prefix('#').unwrap_or(value);
        assert!(raw.len() == 6, "hex color must be 6 digits: {value}");
        let channel = |i: usize| {
            u8::from_str_radix(&raw[i..i + 2], 16).expect("hex color digit") as f32 / 255.0
        };
        Self {
            r: channel(0),
            g: channel(2),
            b: channel(4),
        }
    }
}
