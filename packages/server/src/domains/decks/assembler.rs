use thiserror::Error;
use tracing::{debug, info};

use super::models::{DeckPayload, ExportFormat};
use super::renderers::{DeckRenderer, DocxRenderer, PdfRenderer, PptxRenderer};
use super::sections::build_sections;
use super::templates::DeckStyle;

pub const CLOUD_EXPORT_MESSAGE: &str = "Google Docs/Slides export requires Google API integration. Download DOCX/PPTX and upload to Google Docs/Slides manually.";

#[derive(Debug, Error)]
pub enum DeckError {
    /// Nothing in the payload would put text on a slide
    #[error("Missing required data for presentation generation")]
    Validation,

    #[error("Invalid export format")]
    UnsupportedFormat { format: String },

    /// A renderer failed; surfaced with its cause as details
    #[error("Failed to generate file")]
    Generation {
        format: ExportFormat,
        #[source]
        source: anyhow::Error,
    },
}

/// What a deck request produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckOutput {
    File {
        bytes: Vec<u8>,
        content_type: &'static str,
        filename: String,
    },
    /// Cloud formats are not rendered; the caller is told which file to
    /// download and upload by hand.
    CloudHint {
        message: &'static str,
        download_type: &'static str,
    },
}

/// `None` for Google formats, which are answered with a download hint.
fn renderer_for(format: ExportFormat) -> Option<Box<dyn DeckRenderer>> {
    match format {
        ExportFormat::Ppt => Some(Box::new(PptxRenderer)),
        ExportFormat::Pdf => Some(Box::new(PdfRenderer)),
        ExportFormat::Docx => Some(Box::new(DocxRenderer)),
        ExportFormat::Gdoc | ExportFormat::Gslides => None,
    }
}

/// Turn a deck request into a file (or a download hint for cloud formats).
///
/// CPU bound; callers on the async runtime should run it on a blocking thread.
pub fn assemble(payload: &DeckPayload) -> Result<DeckOutput, DeckError> {
    let format = payload.format()?;

    let Some(renderer) = renderer_for(format) else {
        let download_type = match format {
            ExportFormat::Gdoc => "docx",
            _ => "pptx",
        };
        debug!(format = %format, download_type, "Cloud export requested, returning hint");
        return Ok(DeckOutput::CloudHint {
            message: CLOUD_EXPORT_MESSAGE,
            download_type,
        });
    };

    if payload.lacks_content() {
        return Err(DeckError::Validation);
    }

    let sections = build_sections(payload);
    let style = DeckStyle::resolve(payload.selected_template.as_ref(), &payload.brand_colors);

    let bytes = renderer
        .render(&sections, &style)
        .map_err(|source| DeckError::Generation { format, source })?;

    info!(
        format = %format,
        sections = sections.len(),
        bytes = bytes.len(),
        "Deck generated"
    );

    Ok(DeckOutput::File {
        bytes,
        content_type: renderer.content_type(),
        filename: format!("presentation.{}", renderer.extension()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::decks::renderers::test_support::{paragraphs, read_part};
    use crate::domains::decks::renderers::{DOCX_CONTENT_TYPE, PDF_CONTENT_TYPE, PPTX_CONTENT_TYPE};
    use serde_json::json;

    fn payload(value: serde_json::Value) -> DeckPayload {
        serde_json::from_value(value).unwrap()
    }

    fn file(output: DeckOutput) -> (Vec<u8>, &'static str, String) {
        match output {
            DeckOutput::File {
                bytes,
                content_type,
                filename,
            } => (bytes, content_type, filename),
            other => panic!("expected a file, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_payload_fails_validation() {
        for format in ["ppt", "pdf", "docx"] {
            let err = assemble(&payload(json!({ "exportFormat": format }))).unwrap_err();
            assert!(matches!(err, DeckError::Validation), "format {}", format);
        }
    }

    #[test]
    fn test_blank_strings_do_not_count_as_content() {
        let err = assemble(&payload(json!({
            "companyName": "  ",
            "headings": [],
            "products": null,
            "exportFormat": "pdf"
        })))
        .unwrap_err();
        assert!(matches!(err, DeckError::Validation));
    }

    #[test]
    fn test_unknown_format_is_rejected_before_validation() {
        let err = assemble(&payload(json!({ "exportFormat": "odp" }))).unwrap_err();
        assert!(matches!(err, DeckError::UnsupportedFormat { ref format } if format == "odp"));
        assert_eq!(err.to_string(), "Invalid export format");
    }

    #[test]
    fn test_cloud_formats_return_hint_even_without_content() {
        let gdoc = assemble(&payload(json!({ "exportFormat": "gdoc" }))).unwrap();
        assert_eq!(
            gdoc,
            DeckOutput::CloudHint {
                message: CLOUD_EXPORT_MESSAGE,
                download_type: "docx"
            }
        );

        let gslides = assemble(&payload(json!({ "exportFormat": "gslides" }))).unwrap();
        assert!(matches!(
            gslides,
            DeckOutput::CloudHint {
                download_type: "pptx",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_format_defaults_to_pptx() {
        let (bytes, content_type, filename) =
            file(assemble(&payload(json!({ "companyName": "Acme" }))).unwrap());
        assert_eq!(content_type, PPTX_CONTENT_TYPE);
        assert_eq!(filename, "presentation.pptx");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_rgb_brand_color_becomes_slide_background() {
        let (bytes, _, _) = file(
            assemble(&payload(json!({
                "companyName": "Acme",
                "brandColors": ["rgb(10, 20, 30)"],
                "exportFormat": "ppt"
            })))
            .unwrap(),
        );
        let slide = read_part(&bytes, "ppt/slides/slide1.xml").unwrap();
        assert!(slide.contains(r#"<a:srgbClr val="0A141E"/>"#));
    }

    #[test]
    fn test_unreadable_brand_color_keeps_template_background() {
        let (bytes, _, _) = file(
            assemble(&payload(json!({
                "companyName": "Acme",
                "brandColors": ["not-a-color"],
                "selectedTemplate": "minimal",
                "exportFormat": "ppt"
            })))
            .unwrap(),
        );
        let slide = read_part(&bytes, "ppt/slides/slide1.xml").unwrap();
        assert!(slide.contains(r#"<a:srgbClr val="FFFFFF"/>"#));
    }

    #[test]
    fn test_every_format_carries_the_same_headings() {
        let request = |format: &str| {
            payload(json!({
                "companyName": "Acme",
                "headings": ["H1", "H2"],
                "exportFormat": format
            }))
        };

        let (pptx, _, _) = file(assemble(&request("ppt")).unwrap());
        let slides: Vec<String> = (1..=3)
            .filter_map(|i| read_part(&pptx, &format!("ppt/slides/slide{}.xml", i)))
            .collect();
        let headings_slide = slides
            .iter()
            .find(|xml| xml.contains("Website Headings"))
            .unwrap();
        let slide_paras = paragraphs(headings_slide, b"a:p", b"a:t", b"a:pPr");
        let slide_text: Vec<&str> = slide_paras.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(slide_text, vec!["Website Headings", "H1", "H2"]);

        let (docx, content_type, filename) = file(assemble(&request("docx")).unwrap());
        assert_eq!(content_type, DOCX_CONTENT_TYPE);
        assert_eq!(filename, "presentation.docx");
        let document = read_part(&docx, "word/document.xml").unwrap();
        let doc_paras = paragraphs(&document, b"w:p", b"w:t", b"w:pStyle");
        let after_heading: Vec<&str> = doc_paras
            .iter()
            .skip_while(|(_, t)| t != "Website Headings")
            .skip(1)
            .take_while(|(style, _)| style.is_none())
            .map(|(_, t)| t.as_str())
            .collect();
        assert_eq!(after_heading, vec!["H1", "H2"]);

        let (pdf, content_type, filename) = file(assemble(&request("pdf")).unwrap());
        assert_eq!(content_type, PDF_CONTENT_TYPE);
        assert_eq!(filename, "presentation.pdf");
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.contains("(Website Headings)"));
        assert!(text.contains("(H1)"));
        assert!(text.contains("(H2)"));
    }
}
