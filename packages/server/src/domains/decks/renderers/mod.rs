//! One renderer per binary export format.

pub mod docx;
pub mod pdf;
pub mod pptx;

use anyhow::Result;
use std::borrow::Cow;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::sections::Section;
use super::templates::DeckStyle;

pub use docx::{DocxRenderer, DOCX_CONTENT_TYPE};
pub use pdf::{PdfRenderer, PDF_CONTENT_TYPE};
pub use pptx::{PptxRenderer, PPTX_CONTENT_TYPE};

pub trait DeckRenderer: Send + Sync {
    /// Serialize the whole deck into memory.
    fn render(&self, sections: &[Section], style: &DeckStyle) -> Result<Vec<u8>>;

    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;
}

/// Characters XML 1.0 cannot carry are dropped, the rest escaped.
pub(crate) fn xml_text(text: &str) -> String {
    let allowed: Cow<'_, str> = if text.chars().any(is_forbidden_xml_char) {
        Cow::Owned(text.chars().filter(|c| !is_forbidden_xml_char(*c)).collect())
    } else {
        Cow::Borrowed(text)
    };
    quick_xml::escape::escape(allowed.as_ref()).into_owned()
}

fn is_forbidden_xml_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Write named parts into an in-memory OOXML package.
pub(crate) fn write_package(parts: &[(String, String)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
pub(crate) mod test_support {
    use quick_xml::events::Event;
    use quick_xml::Reader;
    use std::io::{Cursor, Read};

    /// Read one part of a zip package as text.
    pub fn read_part(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).ok()?;
        let mut file = archive.by_name(name).ok()?;
        let mut xml = String::new();
        file.read_to_string(&mut xml).ok()?;
        Some(xml)
    }

    /// Text of each `paragraph_tag` element, with the value of its
    /// `style_tag` `val` attribute when present.
    pub fn paragraphs(
        xml: &str,
        paragraph_tag: &[u8],
        text_tag: &[u8],
        style_tag: &[u8],
    ) -> Vec<(Option<String>, String)> {
        let mut reader = Reader::from_str(xml);
        let mut out = Vec::new();
        let mut current: Option<(Option<String>, String)> = None;
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.name().as_ref() == paragraph_tag => {
                    current = Some((None, String::new()));
                }
                Ok(Event::Start(e)) if e.name().as_ref() == text_tag => in_text = true,
                Ok(Event::End(e)) if e.name().as_ref() == text_tag => in_text = false,
                Ok(Event::Empty(e)) if e.name().as_ref() == style_tag => {
                    if let Some((style, _)) = current.as_mut() {
                        *style = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.local_name().as_ref() == b"val")
                            .map(|a| String::from_utf8_lossy(&a.value).into_owned());
                    }
                }
                Ok(Event::Text(t)) if in_text => {
                    if let Some((_, text)) = current.as_mut() {
                        text.push_str(&t.unescape().unwrap());
                    }
                }
                Ok(Event::End(e)) if e.name().as_ref() == paragraph_tag => {
                    if let Some(p) = current.take() {
                        out.push(p);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid xml: {}", e),
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_text_escapes_and_drops_control_chars() {
        assert_eq!(xml_text("A & B <c>"), "A &amp; B &lt;c&gt;");
        assert_eq!(xml_text("bell\u{7}tab\t"), "belltab\t");
    }

    #[test]
    fn test_write_package_round_trips_parts() {
        let bytes = write_package(&[("a/b.xml".to_string(), "<x/>".to_string())]).unwrap();
        assert_eq!(
            test_support::read_part(&bytes, "a/b.xml").as_deref(),
            Some("<x/>")
        );
    }
}
