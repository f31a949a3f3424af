//! PresentationML writer: one slide per section on a 16:9 canvas.

use anyhow::Result;

use super::{write_package, xml_text, DeckRenderer};
use crate::domains::decks::sections::Section;
use crate::domains::decks::templates::{DeckStyle, Rgb};

pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

const EMU_PER_INCH: i64 = 914_400;
const SLIDE_WIDTH: i64 = 9_144_000;
const SLIDE_HEIGHT: i64 = 5_143_500;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

pub struct PptxRenderer;

impl DeckRenderer for PptxRenderer {
    fn render(&self, sections: &[Section], style: &DeckStyle) -> Result<Vec<u8>> {
        let mut parts = vec![
            ("[Content_Types].xml".to_string(), content_types(sections.len())),
            ("_rels/.rels".to_string(), root_rels()),
            ("ppt/presentation.xml".to_string(), presentation(sections.len())),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                presentation_rels(sections.len()),
            ),
            ("ppt/slideMasters/slideMaster1.xml".to_string(), slide_master()),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                relationships(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "theme", "../theme/theme1.xml"),
                ]),
            ),
            ("ppt/slideLayouts/slideLayout1.xml".to_string(), slide_layout()),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            ),
            ("ppt/theme/theme1.xml".to_string(), theme()),
        ];

        for (i, section) in sections.iter().enumerate() {
            let n = i + 1;
            parts.push((format!("ppt/slides/slide{}.xml", n), slide(section, style)));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            ));
        }

        write_package(&parts)
    }

    fn content_type(&self) -> &'static str {
        PPTX_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        "pptx"
    }
}

fn content_types(slide_count: usize) -> String {
    let slides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            )
        })
        .collect();

    format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>{}</Types>"#,
        XML_DECL, slides
    )
}

fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let body: String = rels
        .iter()
        .map(|(id, kind, target)| {
            format!(
                r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
                id, REL_TYPE, kind, target
            )
        })
        .collect();
    format!(r#"{}<Relationships xmlns="{}">{}</Relationships>"#, XML_DECL, REL_NS, body)
}

fn root_rels() -> String {
    relationships(&[("rId1", "officeDocument", "ppt/presentation.xml")])
}

/// rId1 is the master, rId2 the theme, slides follow from rId3.
fn presentation_rels(slide_count: usize) -> String {
    let slide_targets: Vec<(String, String)> = (1..=slide_count)
        .map(|n| (format!("rId{}", n + 2), format!("slides/slide{}.xml", n)))
        .collect();

    let mut rels: Vec<(&str, &str, &str)> = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    rels.extend(
        slide_targets
            .iter()
            .map(|(id, target)| (id.as_str(), "slide", target.as_str())),
    );
    relationships(&rels)
}

fn presentation(slide_count: usize) -> String {
    let slide_ids: String = (1..=slide_count)
        .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 2))
        .collect();

    format!(
        r#"{}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        XML_DECL, NS, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT
    )
}

const EMPTY_SHAPE_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#;

fn slide_master() -> String {
    format!(
        r#"{}<p:sldMaster {}><p:cSld>{}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        XML_DECL, NS, EMPTY_SHAPE_TREE
    )
}

fn slide_layout() -> String {
    format!(
        r#"{}<p:sldLayout {} preserve="1"><p:cSld name="Blank">{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        XML_DECL, NS, EMPTY_SHAPE_TREE
    )
}

fn theme() -> String {
    let fill_styles = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#.repeat(3);
    let line_styles =
        r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#.repeat(3);
    let effect_styles = r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#.repeat(3);

    format!(
        r#"{}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Deck"><a:themeElements><a:clrScheme name="Deck"><a:dk1><a:srgbClr val="000000"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F1F1F"/></a:dk2><a:lt2><a:srgbClr val="EEEEEE"/></a:lt2><a:accent1><a:srgbClr val="7209B7"/></a:accent1><a:accent2><a:srgbClr val="F72585"/></a:accent2><a:accent3><a:srgbClr val="3A0CA3"/></a:accent3><a:accent4><a:srgbClr val="4361EE"/></a:accent4><a:accent5><a:srgbClr val="4CC9F0"/></a:accent5><a:accent6><a:srgbClr val="FFD700"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Deck"><a:majorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Deck"><a:fillStyleLst>{fills}</a:fillStyleLst><a:lnStyleLst>{lines}</a:lnStyleLst><a:effectStyleLst>{effects}</a:effectStyleLst><a:bgFillStyleLst>{fills}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
        XML_DECL,
        fills = fill_styles,
        lines = line_styles,
        effects = effect_styles
    )
}

/// Text box with one paragraph per line. Sizes are in points.
fn text_shape(
    id: u32,
    name: &str,
    (x, y, cx, cy): (i64, i64, i64, i64),
    lines: &[&str],
    size: u32,
    color: Rgb,
    bold: bool,
) -> String {
    let run_props = format!(
        r#"lang="en-US" sz="{}" b="{}""#,
        size * 100,
        if bold { 1 } else { 0 }
    );
    let fill = format!(
        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
        color.hex_digits()
    );

    let paragraphs: String = lines
        .iter()
        .map(|line| {
            if line.is_empty() {
                format!(r#"<a:p><a:endParaRPr {}/></a:p>"#, run_props)
            } else {
                format!(
                    r#"<a:p><a:r><a:rPr {} dirty="0">{}</a:rPr><a:t>{}</a:t></a:r></a:p>"#,
                    run_props,
                    fill,
                    xml_text(line)
                )
            }
        })
        .collect();

    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" rtlCol="0"><a:normAutofit/></a:bodyPr><a:lstStyle/>{}</p:txBody></p:sp>"#,
        id, name, x, y, cx, cy, paragraphs
    )
}

fn slide(section: &Section, style: &DeckStyle) -> String {
    let left = EMU_PER_INCH / 2;
    let width = SLIDE_WIDTH * 9 / 10;
    let title_top = EMU_PER_INCH / 2;
    let body_top = EMU_PER_INCH * 6 / 5;

    let title = text_shape(
        2,
        "Title",
        (left, title_top, width, EMU_PER_INCH * 7 / 10),
        &[section.title.as_str()],
        style.heading_font_size,
        style.title_color,
        true,
    );
    let body_lines: Vec<&str> = section.lines().collect();
    let body = text_shape(
        3,
        "Body",
        (left, body_top, width, SLIDE_HEIGHT - body_top - EMU_PER_INCH / 4),
        &body_lines,
        style.body_font_size,
        style.body_color,
        false,
    );

    format!(
        r#"{}<p:sld {}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>{}{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        XML_DECL,
        NS,
        style.background.hex_digits(),
        EMPTY_SHAPE_TREE,
        title,
        body
    )
}
