//! Domain types for building a deck and for reading one back.

use crate::color::Rgb;
use crate::units::Length;
use serde::{Deserialize, Serialize};

/// A presentation being built, in slide order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Page width.
    pub width: Length,

    /// Page height.
    pub height: Length,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck with the given page size.
    pub fn new(width: Length, height: Length) -> Self {
        Self {
            width,
            height,
            slides: Vec::new(),
        }
    }

    /// Append a slide.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}

/// A slide on the blank layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Solid background fill. `None` inherits the master background.
    pub background: Option<Rgb>,

    /// Text boxes in z-order.
    pub text_boxes: Vec<TextBox>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a solid background color.
    pub fn with_background(mut self, color: Rgb) -> Self {
        self.background = Some(color);
        self
    }

    pub fn add_text_box(&mut self, text_box: TextBox) {
        self.text_boxes.push(text_box);
    }
}

/// A positioned text frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,

    /// Wrap lines at the box width. When off, lines run past the box edge.
    /// In both modes the shape height auto-fits its text.
    pub word_wrap: bool,

    pub paragraphs: Vec<Paragraph>,
}

impl TextBox {
    /// Create an empty, non-wrapping text box.
    pub fn new(left: Length, top: Length, width: Length, height: Length) -> Self {
        Self {
            left,
            top,
            width,
            height,
            word_wrap: false,
            paragraphs: Vec::new(),
        }
    }

    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// DrawingML `algn` attribute value.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
            Self::Justify => "just",
        }
    }
}

/// Character formatting applied to a whole paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub size: Option<Length>,
    pub bold: bool,

    /// Text color. `None` uses the theme text color.
    pub color: Option<Rgb>,
}

/// A single paragraph of uniformly styled text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub font: Font,
    pub alignment: Option<Alignment>,
    pub space_before: Option<Length>,
    pub space_after: Option<Length>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// An empty paragraph, as left at the top of a fresh text frame.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Font size in points.
    pub fn size(mut self, points: f64) -> Self {
        self.font.size = Some(Length::pt(points));
        self
    }

    pub fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.font.color = Some(color);
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Space before the paragraph, in points.
    pub fn space_before(mut self, points: f64) -> Self {
        self.space_before = Some(Length::pt(points));
        self
    }

    /// Space after the paragraph, in points.
    pub fn space_after(mut self, points: f64) -> Self {
        self.space_after = Some(Length::pt(points));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A deck read back from a PPTX file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDeck {
    /// Original filename (without path).
    pub filename: String,

    /// Page size from `p:sldSz`, if present.
    pub slide_width: Option<Length>,
    pub slide_height: Option<Length>,

    /// Slides in presentation order.
    pub slides: Vec<ExtractedSlide>,
}

impl ExtractedDeck {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slide_width: None,
            slide_height: None,
            slides: Vec::new(),
        }
    }

    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }

    /// Get all non-empty text lines from all slides, flattened.
    pub fn all_lines(&self) -> Vec<&str> {
        self.slides
            .iter()
            .flat_map(|s| s.non_empty_lines())
            .collect()
    }
}

/// A single slide read back from a PPTX file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Solid background color, if the slide defines one.
    pub background: Option<Rgb>,

    /// One entry per paragraph, in reading order.
    pub lines: Vec<SlideText>,
}

impl ExtractedSlide {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            background: None,
            lines: Vec::new(),
        }
    }

    pub fn add_line_with_position(&mut self, text: impl Into<String>, y: f64, x: f64) {
        self.lines.push(SlideText::with_position(text, y, x));
    }

    /// Sort lines by position (top-to-bottom, then left-to-right).
    ///
    /// The sort is stable, so paragraphs of the same box keep their order.
    pub fn sort_by_position(&mut self) {
        self.lines.sort_by(|a, b| {
            let y_cmp = a
                .y_position
                .partial_cmp(&b.y_position)
                .unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x_position
                    .partial_cmp(&b.x_position)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });
    }

    /// Get non-empty text lines.
    pub fn non_empty_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Text of one paragraph, with the position of its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideText {
    pub text: String,

    /// Y position for ordering (top-to-bottom). None if unknown.
    pub y_position: Option<f64>,

    /// X position for ordering (left-to-right). None if unknown.
    pub x_position: Option<f64>,
}

impl SlideText {
    pub fn with_position(text: impl Into<String>, y: f64, x: f64) -> Self {
        Self {
            text: text.into(),
            y_position: Some(y),
            x_position: Some(x),
        }
    }
}
