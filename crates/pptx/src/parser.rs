//! PPTX file parser, used to read generated decks back.

use deck_core::{Error, ExtractedDeck, ExtractedSlide, Length, Result, Rgb};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<ExtractedDeck> {
        let mut archive =
            ZipArchive::new(reader)
                .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = ExtractedDeck::new(filename);

        let presentation = self.read_file_from_archive(&mut archive, "ppt/presentation.xml")?;
        if let Some((width, height)) = self.get_slide_size(&presentation)? {
            deck.slide_width = Some(width);
            deck.slide_height = Some(height);
        }

        // Get the slide order from presentation.xml.rels
        let slide_order = self.get_slide_order(&mut archive)?;

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            deck.add_slide(slide);
        }

        log::debug!("Read {} slides from {}", deck.slides.len(), filename);
        Ok(deck)
    }

    /// Read `p:sldSz` from `presentation.xml`.
    fn get_slide_size(&self, xml_content: &str) -> Result<Option<(Length, Length)>> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldSz" =>
                {
                    let cx = int_attribute(e, b"cx");
                    let cy = int_attribute(e, b"cy");
                    return Ok(cx
                        .zip(cy)
                        .map(|(cx, cy)| (Length::from_emu(cx), Length::from_emu(cy))));
                }
                Ok(Event::Eof) => return Ok(None),
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing presentation: {}",
                        e
                    )));
                }
                _ => {}
            }
        }
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_path = "ppt/_rels/presentation.xml.rels";

        let rels_content = self.read_file_from_archive(archive, rels_path)?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Type" => {
                                rel_type = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Id" => {
                                id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    if rel_type.ends_with("/slide") {
                        let order_num =
                            extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = ExtractedSlide::new(slide_number);

        let (background, shapes) = self.extract_slide_content(&content);
        slide.background = background;

        for shape in shapes {
            for paragraph in shape.paragraphs {
                slide.add_line_with_position(paragraph, shape.y, shape.x);
            }
        }

        // Sort by position (top-to-bottom, left-to-right)
        slide.sort_by_position();

        Ok(slide)
    }

    /// Extract the solid background color and the text shapes of a slide.
    ///
    /// Whitespace inside `a:t` is significant, so text is not trimmed.
    fn extract_slide_content(&self, xml_content: &str) -> (Option<Rgb>, Vec<ShapeInfo>) {
        let mut shapes = Vec::new();
        let mut background = None;
        let mut reader = Reader::from_str(xml_content);

        let mut current_shape: Option<ShapeInfo> = None;
        let mut current_paragraph: Option<String> = None;
        let mut in_background = false;
        let mut in_text_body = false;
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"bg" => in_background = true,
                    b"sp" => current_shape = Some(ShapeInfo::default()),
                    b"off" => read_offset(e, current_shape.as_mut()),
                    b"txBody" => in_text_body = true,
                    b"p" if in_text_body => current_paragraph = Some(String::new()),
                    b"t" if current_paragraph.is_some() => in_text = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                    b"srgbClr" if in_background => {
                        background = string_attribute(e, b"val").and_then(|v| Rgb::from_hex(&v));
                    }
                    b"off" => read_offset(e, current_shape.as_mut()),
                    b"p" if in_text_body => {
                        if let Some(ref mut shape) = current_shape {
                            shape.paragraphs.push(String::new());
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_text {
                        if let Some(ref mut paragraph) = current_paragraph {
                            let text = e.unescape().unwrap_or_default();
                            paragraph.push_str(&text);
                        }
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"bg" => in_background = false,
                    b"sp" => {
                        if let Some(shape) = current_shape.take() {
                            if !shape.paragraphs.is_empty() {
                                shapes.push(shape);
                            }
                        }
                        in_text_body = false;
                        current_paragraph = None;
                    }
                    b"txBody" => in_text_body = false,
                    b"p" => {
                        if let (Some(paragraph), Some(shape)) =
                            (current_paragraph.take(), current_shape.as_mut())
                        {
                            shape.paragraphs.push(paragraph);
                        }
                    }
                    b"t" => in_text = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!(
                        "XML parsing error (stopping at position {}): {}",
                        reader.buffer_position(),
                        e
                    );
                    break;
                }
                _ => {}
            }
        }

        (background, shapes)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| {
                Error::PptxParseError(format!("Part not found in archive '{}': {}", path, e))
            })?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Paragraph texts and position of one shape.
#[derive(Debug, Default)]
struct ShapeInfo {
    paragraphs: Vec<String>,
    x: f64,
    y: f64,
}

/// Record the `a:off` position of the shape being read.
fn read_offset(e: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    if let Some(shape) = shape {
        if let Some(x) = int_attribute(e, b"x") {
            shape.x = x as f64;
        }
        if let Some(y) = int_attribute(e, b"y") {
            shape.y = y as f64;
        }
    }
}

fn string_attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn int_attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<i64> {
    string_attribute(e, key).and_then(|v| v.parse().ok())
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
