//! WordprocessingML writer: a title followed by heading/body pairs.
//!
//! Documents keep a white page, so only the template font sizes carry over.

use anyhow::Result;

use super::{write_package, xml_text, DeckRenderer};
use crate::domains::decks::sections::Section;
use crate::domains::decks::templates::DeckStyle;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub struct DocxRenderer;

impl DeckRenderer for DocxRenderer {
    fn render(&self, sections: &[Section], style: &DeckStyle) -> Result<Vec<u8>> {
        let parts = vec![
            ("[Content_Types].xml".to_string(), content_types()),
            ("_rels/.rels".to_string(), root_rels()),
            ("word/_rels/document.xml.rels".to_string(), document_rels()),
            ("word/styles.xml".to_string(), styles(style)),
            ("word/document.xml".to_string(), document(sections)),
        ];
        write_package(&parts)
    }

    fn content_type(&self) -> &'static str {
        DOCX_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        "docx"
    }
}

fn content_types() -> String {
    format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#,
        XML_DECL
    )
}

fn root_rels() -> String {
    format!(
        r#"{}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#,
        XML_DECL
    )
}

fn document_rels() -> String {
    format!(
        r#"{}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#,
        XML_DECL
    )
}

/// Font sizes in WordprocessingML are half-points.
fn styles(style: &DeckStyle) -> String {
    let body = style.body_font_size * 2;
    let heading = style.heading_font_size * 2;
    let title = (style.heading_font_size + 8) * 2;

    format!(
        r#"{decl}<w:styles xmlns:w="{ns}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="{body}"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="120"/></w:pPr><w:rPr><w:sz w:val="{body}"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="8" w:space="4" w:color="auto"/></w:pBdr><w:spacing w:after="300"/></w:pPr><w:rPr><w:b/><w:sz w:val="{title}"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="360" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="{heading}"/></w:rPr></w:style></w:styles>"#,
        decl = XML_DECL,
        ns = W_NS,
        body = body,
        title = title,
        heading = heading
    )
}

fn paragraph(style_id: Option<&str>, text: &str) -> String {
    let props = style_id
        .map(|id| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, id))
        .unwrap_or_default();
    if text.is_empty() {
        format!("<w:p>{}</w:p>", props)
    } else {
        format!(
            r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            props,
            xml_text(text)
        )
    }
}

fn document(sections: &[Section]) -> String {
    let mut body = String::new();
    for (i, section) in sections.iter().enumerate() {
        let heading_style = if i == 0 { "Title" } else { "Heading1" };
        body.push_str(&paragraph(Some(heading_style), &section.title));
        for line in section.lines() {
            body.push_str(&paragraph(None, line));
        }
    }

    format!(
        r#"{}<w:document xmlns:w="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        XML_DECL, W_NS, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::decks::renderers::test_support::{paragraphs, read_part};

    fn sections() -> Vec<Section> {
        vec![
            Section {
                title: "Acme".into(),
                body: String::new(),
            },
            Section {
                title: "Website Headings".into(),
                body: "H1\nH2".into(),
            },
            Section {
                title: "Brand Colors".into(),
                body: "#FFFFFF".into(),
            },
        ]
    }

    /// Body text of the section under `heading`, lines joined with `\n`.
    fn section_body(paras: &[(Option<String>, String)], heading: &str) -> String {
        paras
            .iter()
            .skip_while(|(style, text)| !(style.is_some() && text == heading))
            .skip(1)
            .take_while(|(style, _)| style.is_none())
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_title_then_heading_pairs() {
        let style = DeckStyle::resolve(None, &[]);
        let bytes = DocxRenderer.render(&sections(), &style).unwrap();
        let xml = read_part(&bytes, "word/document.xml").unwrap();
        let paras = paragraphs(&xml, b"w:p", b"w:t", b"w:pStyle");

        assert_eq!(paras[0], (Some("Title".to_string()), "Acme".to_string()));
        let headings: Vec<&str> = paras
            .iter()
            .filter(|(style, _)| style.as_deref() == Some("Heading1"))
            .map(|(_, text)| text.as_str())
            .collect();
        assert_eq!(headings, vec!["Website Headings", "Brand Colors"]);
        assert_eq!(section_body(&paras, "Website Headings"), "H1\nH2");
    }

    #[test]
    fn test_styles_follow_template_sizes() {
        let style = DeckStyle::resolve(
            Some(&crate::domains::decks::models::TemplateSelector::Name("bold".into())),
            &[],
        );
        let bytes = DocxRenderer.render(&sections(), &style).unwrap();
        let styles = read_part(&bytes, "word/styles.xml").unwrap();
        assert!(styles.contains(r#"<w:sz w:val="36"/>"#));
        assert!(styles.contains(r#"<w:sz w:val="60"/>"#));
        assert!(read_part(&bytes, "word/_rels/document.xml.rels").is_some());
    }
}
