//! PDF writer built directly on the lopdf object model.
//!
//! Text uses the standard Helvetica faces with WinAnsi encoding, so no font
//! files are embedded. Streams are left uncompressed.

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::DeckRenderer;
use crate::domains::decks::sections::Section;
use crate::domains::decks::templates::{DeckStyle, Rgb};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// US Letter, in points
const PAGE_WIDTH: f32 = 612.0;
const PAGE_HEIGHT: f32 = 792.0;
const MARGIN: f32 = 54.0;
const LINE_SPACING: f32 = 1.4;
/// Average Helvetica advance width as a fraction of the font size
const AVG_CHAR_WIDTH: f32 = 0.5;

pub struct PdfRenderer;

impl DeckRenderer for PdfRenderer {
    fn render(&self, sections: &[Section], style: &DeckStyle) -> Result<Vec<u8>> {
        let pages = layout(sections, style);
        build_document(pages)
    }

    fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Content operations for each page, in order.
fn layout(sections: &[Section], style: &DeckStyle) -> Vec<Vec<Operation>> {
    let heading = style.heading_font_size as f32;
    let body = style.body_font_size as f32;
    let body_leading = body * LINE_SPACING;
    let max_chars = chars_per_line(body);
    let max_title_chars = chars_per_line(heading);

    let mut pages = Vec::new();
    for section in sections {
        let mut ops = background(style.background);

        let mut y = PAGE_HEIGHT - MARGIN - heading;
        for line in wrap(&section.title, max_title_chars) {
            let title_x = ((PAGE_WIDTH - estimate_width(&line, heading)) / 2.0).max(MARGIN);
            ops.extend(text_line("F2", heading, style.title_color, title_x, y, &line));
            y -= heading * LINE_SPACING;
        }
        y -= heading * 0.1;

        for line in section.lines().flat_map(|l| wrap(l, max_chars)) {
            if y < MARGIN + body {
                pages.push(std::mem::replace(&mut ops, background(style.background)));
                y = PAGE_HEIGHT - MARGIN - body;
            }
            if !line.is_empty() {
                ops.extend(text_line("F1", body, style.body_color, MARGIN, y, &line));
            }
            y -= body_leading;
        }
        pages.push(ops);
    }
    pages
}

fn background(color: Rgb) -> Vec<Operation> {
    let (r, g, b) = color.unit();
    vec![
        Operation::new("q", vec![]),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new(
            "re",
            vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

fn text_line(font: &str, size: f32, color: Rgb, x: f32, y: f32, text: &str) -> Vec<Operation> {
    let (r, g, b) = color.unit();
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![font.into(), size.into()]),
        Operation::new("rg", vec![r.into(), g.into(), b.into()]),
        Operation::new("Td", vec![x.into(), y.into()]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

fn chars_per_line(size: f32) -> usize {
    ((PAGE_WIDTH - 2.0 * MARGIN) / (size * AVG_CHAR_WIDTH)).floor() as usize
}

fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_CHAR_WIDTH
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap(line: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if line.chars().count() <= max_chars {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..max_chars).collect());
        }
        let word: String = word.into_iter().collect();
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.chars().count();
        if needed > max_chars && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Encode for the WinAnsi standard fonts. Unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(b' '),
            c if (c as u32) < 0x20 => None,
            '\u{20AC}' => Some(0x80),
            '\u{2026}' => Some(0x85),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{2122}' => Some(0x99),
            c if (0x20..0x7F).contains(&(c as u32)) || (0xA0..=0xFF).contains(&(c as u32)) => {
                Some(c as u8)
            }
            _ => Some(b'?'),
        })
        .collect()
}

fn build_document(pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().context("Failed to encode page content")?,
        ));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).context("Failed to serialize PDF")?;
    Ok(buffer)
}
