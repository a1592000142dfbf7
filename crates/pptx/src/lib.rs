//! PPTX (Office Open XML) backend for deck generation.
//!
//! Writes a [`deck_core::Deck`] as a .pptx package (a ZIP archive of XML
//! parts) and reads generated packages back for verification.

pub mod parser;
pub mod parts;
pub mod templates;
pub mod writer;

pub use parser::PptxParser;
pub use writer::PptxWriter;
