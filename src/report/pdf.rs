use std::io::BufWriter;

use printpdf::{BuiltinFont, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::layout::{Align, DrawOp, ReportLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::ReportError;

/// Average Helvetica glyph advance as a fraction of the font size.
const HELVETICA_AVG_ADVANCE: f32 = 0.5;
const PT_TO_MM: f32 = 0.352_778;

/// Render a laid-out report to PDF bytes.
pub fn render(layout: &ReportLayout, title: &str) -> Result<Vec<u8>, ReportError> {
    let (doc, page1, layer1) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(format!("PDF font error: {e}")))?;

    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(page1).get_layer(layer1)];
    for _ in 1..layout.page_count.max(1) {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for op in &layout.ops {
        let layer = layers
            .get(op.page())
            .ok_or_else(|| ReportError::Pdf(format!("draw op on missing page {}", op.page())))?;
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                align,
                text,
                ..
            } => {
                let left = match align {
                    Align::Left => *x,
                    Align::Center => *x - estimated_width(text, *size) / 2.0,
                };
                layer.use_text(text.as_str(), *size, Mm(left), flip(*y), &font);
            }
            DrawOp::Line {
                from,
                to,
                thickness,
                ..
            } => {
                layer.set_outline_thickness(*thickness);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(from.0), flip(from.1)), false),
                        (Point::new(Mm(to.0), flip(to.1)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::Pdf(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::Pdf(format!("PDF buffer error: {e}")))
}

/// Top-left origin → PDF bottom-left origin.
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

fn estimated_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * HELVETICA_AVG_ADVANCE * PT_TO_MM
}
