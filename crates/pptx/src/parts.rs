//! XML generation for the per-deck package parts.

use crate::templates::{
    content_type, part, rel, NS_CONTENT_TYPES, NS_RELATIONSHIPS, PML_NAMESPACES,
};
use deck_core::{Deck, Error, Font, Paragraph, Result, Rgb, Slide, TextBox};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// First `p:sldId` value; lower ids are reserved.
const FIRST_SLIDE_ID: usize = 256;

const SLIDE_MASTER_ID: &str = "2147483648";

/// A single entry of a `.rels` part.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
}

impl Relationship {
    pub fn new(index: usize, rel_type: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{}", index),
            rel_type,
            target: target.into(),
        }
    }
}

/// Document metadata written to `docProps`.
#[derive(Debug, Clone)]
pub struct DocumentProperties {
    pub title: String,
    pub creator: String,
    pub application: String,
}

impl Default for DocumentProperties {
    fn default() -> Self {
        Self {
            title: String::new(),
            creator: String::new(),
            application: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

/// Render one XML document with a standalone declaration.
fn render<F>(build: F) -> Result<String>
where
    F: FnOnce(&mut Writer<Vec<u8>>) -> quick_xml::Result<()>,
{
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_error)?;
    build(&mut writer).map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::XmlError(e.to_string()))
}

/// `[Content_Types].xml` for a deck with `slide_count` slides.
pub fn content_types_xml(slide_count: usize) -> Result<String> {
    let mut overrides = vec![
        (format!("/{}", part::PRESENTATION), content_type::PRESENTATION),
    ];
    for number in 1..=slide_count {
        overrides.push((format!("/{}", part::slide(number)), content_type::SLIDE));
    }
    overrides.extend([
        (format!("/{}", part::SLIDE_MASTER), content_type::SLIDE_MASTER),
        (format!("/{}", part::SLIDE_LAYOUT), content_type::SLIDE_LAYOUT),
        (format!("/{}", part::THEME), content_type::THEME),
        (format!("/{}", part::PRES_PROPS), content_type::PRES_PROPS),
        (format!("/{}", part::VIEW_PROPS), content_type::VIEW_PROPS),
        (format!("/{}", part::TABLE_STYLES), content_type::TABLE_STYLES),
        (format!("/{}", part::CORE_PROPERTIES), content_type::CORE_PROPERTIES),
        (format!("/{}", part::APP_PROPERTIES), content_type::EXTENDED_PROPERTIES),
    ]);

    render(|w| {
        w.create_element("Types")
            .with_attribute(("xmlns", NS_CONTENT_TYPES))
            .write_inner_content(|w| {
                w.create_element("Default")
                    .with_attribute(("Extension", "rels"))
                    .with_attribute(("ContentType", content_type::RELATIONSHIPS))
                    .write_empty()?;
                w.create_element("Default")
                    .with_attribute(("Extension", "xml"))
                    .with_attribute(("ContentType", content_type::XML))
                    .write_empty()?;
                for (name, ct) in &overrides {
                    w.create_element("Override")
                        .with_attribute(("PartName", name.as_str()))
                        .with_attribute(("ContentType", *ct))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// A `.rels` part.
pub fn relationships_xml(relationships: &[Relationship]) -> Result<String> {
    render(|w| {
        w.create_element("Relationships")
            .with_attribute(("xmlns", NS_RELATIONSHIPS))
            .write_inner_content(|w| {
                for r in relationships {
                    w.create_element("Relationship")
                        .with_attribute(("Id", r.id.as_str()))
                        .with_attribute(("Type", r.rel_type))
                        .with_attribute(("Target", r.target.as_str()))
                        .write_empty()?;
                }
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// Package-level relationships.
pub fn root_relationships() -> Vec<Relationship> {
    vec![
        Relationship::new(1, rel::OFFICE_DOCUMENT, part::PRESENTATION),
        Relationship::new(2, rel::CORE_PROPERTIES, part::CORE_PROPERTIES),
        Relationship::new(3, rel::EXTENDED_PROPERTIES, part::APP_PROPERTIES),
    ]
}

/// Relationships of `presentation.xml`: master, slides in order, then the
/// property parts and theme.
pub fn presentation_relationships(slide_count: usize) -> Vec<Relationship> {
    let mut rels = vec![Relationship::new(1, rel::SLIDE_MASTER, "slideMasters/slideMaster1.xml")];
    for number in 1..=slide_count {
        rels.push(Relationship::new(
            number + 1,
            rel::SLIDE,
            format!("slides/slide{}.xml", number),
        ));
    }
    let next = slide_count + 2;
    rels.extend([
        Relationship::new(next, rel::PRES_PROPS, "presProps.xml"),
        Relationship::new(next + 1, rel::VIEW_PROPS, "viewProps.xml"),
        Relationship::new(next + 2, rel::THEME, "theme/theme1.xml"),
        Relationship::new(next + 3, rel::TABLE_STYLES, "tableStyles.xml"),
    ]);
    rels
}

pub fn slide_relationships() -> Vec<Relationship> {
    vec![Relationship::new(1, rel::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml")]
}

pub fn slide_master_relationships() -> Vec<Relationship> {
    vec![
        Relationship::new(1, rel::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Relationship::new(2, rel::THEME, "../theme/theme1.xml"),
    ]
}

pub fn slide_layout_relationships() -> Vec<Relationship> {
    vec![Relationship::new(1, rel::SLIDE_MASTER, "../slideMasters/slideMaster1.xml")]
}

/// `ppt/presentation.xml`. Slide `n` is referenced through `rId{n+1}`.
pub fn presentation_xml(deck: &Deck) -> Result<String> {
    render(|w| {
        w.create_element("p:presentation")
            .with_attributes(PML_NAMESPACES)
            .with_attribute(("saveSubsetFonts", "1"))
            .write_inner_content(|w| {
                w.create_element("p:sldMasterIdLst").write_inner_content(|w| {
                    w.create_element("p:sldMasterId")
                        .with_attribute(("id", SLIDE_MASTER_ID))
                        .with_attribute(("r:id", "rId1"))
                        .write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;

                if !deck.slides.is_empty() {
                    w.create_element("p:sldIdLst").write_inner_content(|w| {
                        for index in 0..deck.slides.len() {
                            let id = (FIRST_SLIDE_ID + index).to_string();
                            w.create_element("p:sldId")
                                .with_attribute(("id", id.as_str()))
                                .with_attribute(("r:id", format!("rId{}", index + 2).as_str()))
                                .write_empty()?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
                }

                w.create_element("p:sldSz")
                    .with_attribute(("cx", deck.width.emu().to_string().as_str()))
                    .with_attribute(("cy", deck.height.emu().to_string().as_str()))
                    .write_empty()?;
                w.create_element("p:notesSz")
                    .with_attribute(("cx", "6858000"))
                    .with_attribute(("cy", "9144000"))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// `docProps/core.xml`. No timestamps are written, so output is stable
/// across runs.
pub fn core_properties_xml(props: &DocumentProperties) -> Result<String> {
    render(|w| {
        w.create_element("cp:coreProperties")
            .with_attribute((
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ))
            .with_attribute(("xmlns:dc", "http://purl.org/dc/elements/1.1/"))
            .with_attribute(("xmlns:dcterms", "http://purl.org/dc/terms/"))
            .with_attribute(("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"))
            .with_attribute(("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"))
            .write_inner_content(|w| {
                w.create_element("dc:title")
                    .write_text_content(BytesText::new(&props.title))?;
                w.create_element("dc:creator")
                    .write_text_content(BytesText::new(&props.creator))?;
                w.create_element("cp:lastModifiedBy")
                    .write_text_content(BytesText::new(&props.application))?;
                w.create_element("cp:revision")
                    .write_text_content(BytesText::new("1"))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// `docProps/app.xml`.
pub fn app_properties_xml(props: &DocumentProperties, slide_count: usize) -> Result<String> {
    render(|w| {
        w.create_element("Properties")
            .with_attribute((
                "xmlns",
                "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties",
            ))
            .with_attribute((
                "xmlns:vt",
                "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes",
            ))
            .write_inner_content(|w| {
                w.create_element("Application")
                    .write_text_content(BytesText::new(&props.application))?;
                w.create_element("Slides")
                    .write_text_content(BytesText::new(&slide_count.to_string()))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

/// `ppt/slides/slideN.xml`.
pub fn slide_xml(slide: &Slide) -> Result<String> {
    if let Some(idx) = slide.text_boxes.iter().position(|b| b.paragraphs.is_empty()) {
        return Err(Error::InvalidDeck(format!(
            "text box {} has no paragraphs",
            idx + 1
        )));
    }

    render(|w| {
        w.create_element("p:sld")
            .with_attributes(PML_NAMESPACES)
            .write_inner_content(|w| {
                w.create_element("p:cSld").write_inner_content(|w| {
                    if let Some(color) = slide.background {
                        write_background(w, color)?;
                    }
                    w.create_element("p:spTree").write_inner_content(|w| {
                        write_group_properties(w)?;
                        for (idx, text_box) in slide.text_boxes.iter().enumerate() {
                            // id 1 is the shape tree itself
                            write_text_box(w, text_box, idx + 2)?;
                        }
                        Ok::<(), quick_xml::Error>(())
                    })?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                w.create_element("p:clrMapOvr").write_inner_content(|w| {
                    w.create_element("a:masterClrMapping").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
                Ok::<(), quick_xml::Error>(())
            })?;
        Ok(())
    })
}

fn write_background<W: Write>(w: &mut Writer<W>, color: Rgb) -> quick_xml::Result<()> {
    w.create_element("p:bg").write_inner_content(|w| {
        w.create_element("p:bgPr").write_inner_content(|w| {
            write_solid_fill(w, color)?;
            w.create_element("a:effectLst").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_group_properties<W: Write>(w: &mut Writer<W>) -> quick_xml::Result<()> {
    w.create_element("p:nvGrpSpPr").write_inner_content(|w| {
        w.create_element("p:cNvPr")
            .with_attribute(("id", "1"))
            .with_attribute(("name", ""))
            .write_empty()?;
        w.create_element("p:cNvGrpSpPr").write_empty()?;
        w.create_element("p:nvPr").write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    w.create_element("p:grpSpPr").write_inner_content(|w| {
        w.create_element("a:xfrm").write_inner_content(|w| {
            for (tag, x, y) in [
                ("a:off", "x", "y"),
                ("a:ext", "cx", "cy"),
                ("a:chOff", "x", "y"),
                ("a:chExt", "cx", "cy"),
            ] {
                w.create_element(tag)
                    .with_attribute((x, "0"))
                    .with_attribute((y, "0"))
                    .write_empty()?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_text_box<W: Write>(
    w: &mut Writer<W>,
    text_box: &TextBox,
    shape_id: usize,
) -> quick_xml::Result<()> {
    w.create_element("p:sp").write_inner_content(|w| {
        w.create_element("p:nvSpPr").write_inner_content(|w| {
            w.create_element("p:cNvPr")
                .with_attribute(("id", shape_id.to_string().as_str()))
                .with_attribute(("name", format!("TextBox {}", shape_id - 1).as_str()))
                .write_empty()?;
            w.create_element("p:cNvSpPr")
                .with_attribute(("txBox", "1"))
                .write_empty()?;
            w.create_element("p:nvPr").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;

        w.create_element("p:spPr").write_inner_content(|w| {
            w.create_element("a:xfrm").write_inner_content(|w| {
                w.create_element("a:off")
                    .with_attribute(("x", text_box.left.emu().to_string().as_str()))
                    .with_attribute(("y", text_box.top.emu().to_string().as_str()))
                    .write_empty()?;
                w.create_element("a:ext")
                    .with_attribute(("cx", text_box.width.emu().to_string().as_str()))
                    .with_attribute(("cy", text_box.height.emu().to_string().as_str()))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
            w.create_element("a:prstGeom")
                .with_attribute(("prst", "rect"))
                .write_inner_content(|w| {
                    w.create_element("a:avLst").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
            w.create_element("a:noFill").write_empty()?;
            Ok::<(), quick_xml::Error>(())
        })?;

        w.create_element("p:txBody").write_inner_content(|w| {
            let wrap = if text_box.word_wrap { "square" } else { "none" };
            w.create_element("a:bodyPr")
                .with_attribute(("wrap", wrap))
                .with_attribute(("rtlCol", "0"))
                .write_inner_content(|w| {
                    w.create_element("a:spAutoFit").write_empty()?;
                    Ok::<(), quick_xml::Error>(())
                })?;
            w.create_element("a:lstStyle").write_empty()?;
            for paragraph in &text_box.paragraphs {
                write_paragraph(w, paragraph)?;
            }
            Ok::<(), quick_xml::Error>(())
        })?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_paragraph<W: Write>(w: &mut Writer<W>, paragraph: &Paragraph) -> quick_xml::Result<()> {
    w.create_element("a:p").write_inner_content(|w| {
        write_paragraph_properties(w, paragraph)?;
        if !paragraph.is_empty() {
            w.create_element("a:r").write_inner_content(|w| {
                write_run_properties(w, "a:rPr", &paragraph.font)?;
                w.create_element("a:t")
                    .write_text_content(BytesText::new(&paragraph.text))?;
                Ok::<(), quick_xml::Error>(())
            })?;
        }
        write_run_properties(w, "a:endParaRPr", &paragraph.font)?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_paragraph_properties<W: Write>(
    w: &mut Writer<W>,
    paragraph: &Paragraph,
) -> quick_xml::Result<()> {
    let spacing: Vec<(&str, i64)> = [
        ("a:spcBef", paragraph.space_before),
        ("a:spcAft", paragraph.space_after),
    ]
    .into_iter()
    .filter_map(|(tag, space)| space.map(|s| (tag, s.centipoints())))
    .collect();

    if paragraph.alignment.is_none() && spacing.is_empty() {
        return Ok(());
    }

    let mut element = w.create_element("a:pPr");
    if let Some(alignment) = paragraph.alignment {
        element = element.with_attribute(("algn", alignment.as_ooxml()));
    }
    if spacing.is_empty() {
        element.write_empty()?;
        return Ok(());
    }

    element.write_inner_content(|w| {
        for (tag, centipoints) in &spacing {
            w.create_element(*tag).write_inner_content(|w| {
                w.create_element("a:spcPts")
                    .with_attribute(("val", centipoints.to_string().as_str()))
                    .write_empty()?;
                Ok::<(), quick_xml::Error>(())
            })?;
        }
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}

fn write_run_properties<W: Write>(
    w: &mut Writer<W>,
    tag: &str,
    font: &Font,
) -> quick_xml::Result<()> {
    let mut element = w.create_element(tag).with_attribute(("lang", "zh-CN"));
    if let Some(size) = font.size {
        element = element.with_attribute(("sz", size.centipoints().to_string().as_str()));
    }
    if font.bold {
        element = element.with_attribute(("b", "1"));
    }
    element = element.with_attribute(("dirty", "0"));

    match font.color {
        Some(color) => {
            element.write_inner_content(|w| write_solid_fill(w, color))?;
        }
        None => {
            element.write_empty()?;
        }
    }
    Ok(())
}

fn write_solid_fill<W: Write>(w: &mut Writer<W>, color: Rgb) -> quick_xml::Result<()> {
    w.create_element("a:solidFill").write_inner_content(|w| {
        w.create_element("a:srgbClr")
            .with_attribute(("val", color.hex().as_str()))
            .write_empty()?;
        Ok::<(), quick_xml::Error>(())
    })?;
    Ok(())
}
