//! Core types for the ChatSVTR deck generator: lengths, colors, the deck
//! model, and the literal content of the feature presentation.

pub mod color;
pub mod content;
pub mod error;
pub mod types;
pub mod units;

pub use color::Rgb;
pub use content::{chatsvtr_deck, OUTPUT_FILENAME, SLIDE_COUNT};
pub use error::{Error, Result};
pub use types::{
    Alignment, Deck, ExtractedDeck, ExtractedSlide, Font, Paragraph, Slide, SlideText, TextBox,
};
pub use units::Length;
