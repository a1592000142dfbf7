//! Fixed package parts and OPC identifiers.
//!
//! The master, the blank layout, the theme, and the three presentation
//! property parts are identical for every deck, so they ship as bundled
//! resources.

pub const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMasters/slideMaster1.xml");
pub const SLIDE_LAYOUT_XML: &str = include_str!("../resources/slideLayouts/slideLayout1.xml");
pub const THEME_XML: &str = include_str!("../resources/theme/theme1.xml");
pub const PRES_PROPS_XML: &str = include_str!("../resources/presProps.xml");
pub const VIEW_PROPS_XML: &str = include_str!("../resources/viewProps.xml");
pub const TABLE_STYLES_XML: &str = include_str!("../resources/tableStyles.xml");

/// Namespace declarations carried by every PresentationML root element.
pub const PML_NAMESPACES: [(&str, &str); 3] = [
    ("xmlns:a", "http://schemas.openxmlformats.org/drawingml/2006/main"),
    ("xmlns:r", "http://schemas.openxmlformats.org/officeDocument/2006/relationships"),
    ("xmlns:p", "http://schemas.openxmlformats.org/presentationml/2006/main"),
];

pub const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship types.
pub mod rel {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
}

/// Content types.
pub mod content_type {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// Part names inside the package.
pub mod part {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const CORE_PROPERTIES: &str = "docProps/core.xml";
    pub const APP_PROPERTIES: &str = "docProps/app.xml";
    pub const PRESENTATION: &str = "ppt/presentation.xml";
    pub const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";
    pub const SLIDE_MASTER: &str = "ppt/slideMasters/slideMaster1.xml";
    pub const SLIDE_MASTER_RELS: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";
    pub const SLIDE_LAYOUT: &str = "ppt/slideLayouts/slideLayout1.xml";
    pub const SLIDE_LAYOUT_RELS: &str = "ppt/slideLayouts/_rels/slideLayout1.xml.rels";
    pub const THEME: &str = "ppt/theme/theme1.xml";
    pub const PRES_PROPS: &str = "ppt/presProps.xml";
    pub const VIEW_PROPS: &str = "ppt/viewProps.xml";
    pub const TABLE_STYLES: &str = "ppt/tableStyles.xml";

    pub fn slide(number: usize) -> String {
        format!("ppt/slides/slide{}.xml", number)
    }

    pub fn slide_rels(number: usize) -> String {
        format!("ppt/slides/_rels/slide{}.xml.rels", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_are_xml() {
        for xml in [
            SLIDE_MASTER_XML,
            SLIDE_LAYOUT_XML,
            THEME_XML,
            PRES_PROPS_XML,
            VIEW_PROPS_XML,
            TABLE_STYLES_XML,
        ] {
            assert!(xml.starts_with("<?xml version=\"1.0\""));
        }
        assert!(SLIDE_MASTER_XML.contains(r#"r:id="rId1""#));
        assert!(SLIDE_LAYOUT_XML.contains(r#"type="blank""#));
    }

    #[test]
    fn test_slide_part_names() {
        assert_eq!(part::slide(3), "ppt/slides/slide3.xml");
        assert_eq!(part::slide_rels(10), "ppt/slides/_rels/slide10.xml.rels");
    }
}
