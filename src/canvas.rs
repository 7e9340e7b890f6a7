//! Command-recording drawing surface. The renderer records one page at
//! a time; the PDF emitter later replays the commands into content
//! streams and widget annotations.

use crate::types::{Color, Rect, Size};

/// Visual styling for one fillable text field, resolved by the renderer
/// from the style sheet so the emitter stays style-agnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub tooltip: String,
    pub rect: Rect,
    pub multiline: bool,
    pub border_color: Color,
    pub background: Color,
    pub text_color: Color,
    pub font_size: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetFillColor(Color),
    SetStrokeColor(Color),
    SetLineWidth(f32),
    FillRect(Rect),
    StrokeRect(Rect),
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    SetFontSize(f32),
    DrawString {
        x: f32,
        y: f32,
        text: String,
    },
    DrawImage {
        rect: Rect,
        resource_id: String,
    },
    TextField(FieldSpec),
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    /// Widget annotations recorded on this page, in draw order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::TextField(spec) => Some(spec),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
    font_size: Option<f32>,
}

impl GraphicsState {
    fn fresh() -> Self {
        Self {
            fill_color: None,
            stroke_color: None,
            line_width: None,
            font_size: None,
        }
    }
}

pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::default(),
            state: GraphicsState::fresh(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color == Some(color) {
            return;
        }
        self.state.fill_color = Some(color);
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        if self.state.stroke_color == Some(color) {
            return;
        }
        self.state.stroke_color = Some(color);
        self.current.commands.push(Command::SetStrokeColor(color));
    }

    pub fn set_line_width(&mut self, width: f32) {
        let width = width.max(0.0);
        if self.state.line_width == Some(width) {
            return;
        }
        self.state.line_width = Some(width);
        self.current.commands.push(Command::SetLineWidth(width));
    }

    pub fn fill_rect(&mut self, rect: Rect) {
        self.current.commands.push(Command::FillRect(rect));
    }

    pub fn stroke_rect(&mut self, rect: Rect) {
        self.current.commands.push(Command::StrokeRect(rect));
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.current.commands.push(Command::Line { x1, y1, x2, y2 });
    }

    pub fn set_font_size(&mut self, size: f32) {
        if self.state.font_size == Some(size) {
            return;
        }
        self.state.font_size = Some(size);
        self.current.commands.push(Command::SetFontSize(size));
    }

    pub fn draw_string(&mut self, x: f32, y: f32, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn draw_image(&mut self, rect: Rect, resource_id: impl Into<String>) {
        self.current.commands.push(Command::DrawImage {
            rect,
            resource_id: resource_id.into(),
        });
    }

    pub fn text_field(&mut self, spec: FieldSpec) {
        self.current.commands.push(Command::TextField(spec));
    }

    /// Commits the current page and starts a fresh one. Graphics state
    /// does not carry across page boundaries.
    pub fn show_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.state = GraphicsState::fresh();
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}
