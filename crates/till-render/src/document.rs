//! # Document Engine
//!
//! Lays receipt markup out on narrow PDF pages.
//!
//! ## Page Layout
//! ```text
//!   ◄──────────── 80 mm ────────────►
//!  ┌─────────────────────────────────┐ ▲
//!  │ RECEIPT              (heading)  │ │  margin
//!  │ 17.10.2026 14:05                │ │
//!  │ ------------------------------- │ │  one row per markup line,
//!  │ Green tea                       │ │  height grows with the
//!  │ 2 x 19.99                 39.98 │ │  number of rows, up to
//!  │ ...                             │ │  `max_page_height_mm`
//!  │ ------------------------------- │ │
//!  │ TOTAL                     56.48 │ │
//!  └─────────────────────────────────┘ ▼
//! ```
//!
//! Rows that do not fit under `max_page_height_mm` continue on further
//! pages of the same width.
//!
//! Text uses DejaVu Sans Mono, embedded in the binary, so item titles in
//! Cyrillic, Greek or accented Latin print as written and columns line up.
//! Body lines longer than the page are wrapped.

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::RenderResult;

/// Converts markup into a fixed-format binary document.
pub trait DocumentEngine: Send + Sync {
    fn convert(&self, markup: &str) -> RenderResult<Vec<u8>>;

    /// MIME type of the produced document.
    fn content_type(&self) -> &'static str;
}

/// Prefix marking a heading line.
pub const HEADING_PREFIX: &str = "# ";

const PT_TO_MM: f32 = 0.352_778;

const REGULAR_FONT: &[u8] = include_bytes!("../fonts/DejaVuSansMono.ttf");
const BOLD_FONT: &[u8] = include_bytes!("../fonts/DejaVuSansMono-Bold.ttf");

/// Glyph advance width as a fraction of the font size (1233/2048 em).
const GLYPH_ADVANCE: f32 = 0.6;

const LINE_SPACING: f32 = 1.35;

// =============================================================================
// Layout
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Style {
    Body,
    Heading,
}

#[derive(Debug, Clone, PartialEq)]
struct Row {
    style: Style,
    text: String,
}

/// PDF [`DocumentEngine`] for receipt printers' paper width.
#[derive(Debug, Clone)]
pub struct PdfEngine {
    /// Page width in millimetres.
    pub page_width_mm: f32,
    /// Margin on every side in millimetres.
    pub margin_mm: f32,
    /// Body font size in points.
    pub body_size_pt: f32,
    /// Heading font size in points.
    pub heading_size_pt: f32,
    /// Tallest page written; further rows start a new page.
    pub max_page_height_mm: f32,
    /// Document title written to the PDF metadata.
    pub title: String,
}

impl Default for PdfEngine {
    fn default() -> Self {
        PdfEngine {
            page_width_mm: 80.0,
            margin_mm: 4.0,
            body_size_pt: 9.0,
            heading_size_pt: 12.0,
            max_page_height_mm: 1000.0,
            title: "Receipt".to_string(),
        }
    }
}

impl PdfEngine {
    fn size_of(&self, style: Style) -> f32 {
        match style {
            Style::Body => self.body_size_pt,
            Style::Heading => self.heading_size_pt,
        }
    }

    fn row_height_mm(&self, style: Style) -> f32 {
        self.size_of(style) * PT_TO_MM * LINE_SPACING
    }

    /// Characters that fit on one line at `style`'s size.
    fn columns(&self, style: Style) -> usize {
        let usable = self.page_width_mm - 2.0 * self.margin_mm;
        let advance = self.size_of(style) * GLYPH_ADVANCE * PT_TO_MM;
        ((usable / advance).floor() as usize).max(1)
    }

    /// Splits markup into styled, wrapped rows.
    fn layout(&self, markup: &str) -> Vec<Row> {
        let mut rows = Vec::new();
        for line in markup.lines() {
            let (style, text) = match line.strip_prefix(HEADING_PREFIX) {
                Some(heading) => (Style::Heading, heading),
                None => (Style::Body, line),
            };

            let chars: Vec<char> = text.trim_end().chars().collect();
            if chars.is_empty() {
                rows.push(Row { style, text: String::new() });
                continue;
            }
            for piece in chars.chunks(self.columns(style)) {
                rows.push(Row {
                    style,
                    text: piece.iter().collect(),
                });
            }
        }
        rows
    }

    /// Splits rows into pages no taller than `max_page_height_mm`.
    ///
    /// Always returns at least one page, possibly empty.
    fn paginate(&self, rows: Vec<Row>) -> Vec<Vec<Row>> {
        let capacity = self.max_page_height_mm - 2.0 * self.margin_mm;
        let mut pages = Vec::new();
        let mut page = Vec::new();
        let mut used = 0.0;

        for row in rows {
            let height = self.row_height_mm(row.style);
            if !page.is_empty() && used + height > capacity {
                pages.push(std::mem::take(&mut page));
                used = 0.0;
            }
            used += height;
            page.push(row);
        }
        pages.push(page);
        pages
    }

    fn page_height_mm(&self, rows: &[Row]) -> f32 {
        let content: f32 = rows.iter().map(|row| self.row_height_mm(row.style)).sum();
        // A blank receipt still gets a printable page
        (content + 2.0 * self.margin_mm)
            .max(self.page_width_mm / 2.0)
            .min(self.max_page_height_mm)
    }

    fn write_rows(
        &self,
        layer: &PdfLayerReference,
        rows: &[Row],
        top_mm: f32,
        regular: &IndirectFontRef,
        bold: &IndirectFontRef,
    ) {
        let mut cursor = top_mm - self.margin_mm;
        for row in rows {
            cursor -= self.row_height_mm(row.style);
            if row.text.is_empty() {
                continue;
            }
            let font = match row.style {
                Style::Body => regular,
                Style::Heading => bold,
            };
            layer.use_text(
                row.text.as_str(),
                self.size_of(row.style),
                Mm(self.margin_mm),
                Mm(cursor),
                font,
            );
        }
    }

    fn fonts(doc: &PdfDocumentReference) -> RenderResult<(IndirectFontRef, IndirectFontRef)> {
        let regular = doc.add_external_font(REGULAR_FONT)?;
        let bold = doc.add_external_font(BOLD_FONT)?;
        Ok((regular, bold))
    }
}

impl DocumentEngine for PdfEngine {
    fn convert(&self, markup: &str) -> RenderResult<Vec<u8>> {
        let pages = self.paginate(self.layout(markup));
        let first_height = self.page_height_mm(pages.first().map(Vec::as_slice).unwrap_or(&[]));

        let (doc, first_page, first_layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(self.page_width_mm),
            Mm(first_height),
            "receipt",
        );
        {
            let (regular, bold) = Self::fonts(&doc)?;
            for (number, rows) in pages.iter().enumerate() {
                let height = self.page_height_mm(rows);
                let (page, layer) = if number == 0 {
                    (first_page, first_layer)
                } else {
                    doc.add_page(Mm(self.page_width_mm), Mm(height), "receipt")
                };
                let layer = doc.get_page(page).get_layer(layer);
                self.write_rows(&layer, rows, height, &regular, &bold);
            }
        }

        if pages.len() > 1 {
            tracing::debug!(pages = pages.len(), "Receipt continued on extra pages");
        }

        Ok(doc.save_to_bytes()?)
    }

    fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::lopdf::content::Content;
    use printpdf::lopdf::{Dictionary, Document, Object, ObjectId};
    use std::collections::HashMap;

    /// Glyph id to character map from a font's ToUnicode CMap.
    fn glyph_map(doc: &Document, font: &Dictionary) -> HashMap<u16, char> {
        let mut glyphs = HashMap::new();
        let Ok(cmap_id) = font.get(b"ToUnicode").and_then(Object::as_reference) else {
            return glyphs;
        };
        let stream = doc.get_object(cmap_id).and_then(Object::as_stream).unwrap();
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());

        for line in String::from_utf8_lossy(&data).lines() {
            let Some((glyph, unicode)) = line.trim().split_once("> <") else {
                continue;
            };
            let glyph = u16::from_str_radix(glyph.trim_start_matches('<'), 16);
            let unicode = u32::from_str_radix(unicode.trim_end_matches('>'), 16);
            if let (Ok(glyph), Ok(Some(ch))) = (glyph, unicode.map(char::from_u32)) {
                glyphs.insert(glyph, ch);
            }
        }
        glyphs
    }

    /// Glyph maps of the fonts in a page's resources, by resource name.
    fn page_fonts(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, HashMap<u16, char>> {
        let page = doc.get_dictionary(page_id).unwrap();
        let (_, resources) = doc.dereference(page.get(b"Resources").unwrap()).unwrap();
        let (_, fonts) = doc
            .dereference(resources.as_dict().unwrap().get(b"Font").unwrap())
            .unwrap();

        fonts
            .as_dict()
            .unwrap()
            .iter()
            .map(|(name, font)| {
                let (_, font) = doc.dereference(font).unwrap();
                (name.clone(), glyph_map(doc, font.as_dict().unwrap()))
            })
            .collect()
    }

    /// Text shown on each page, one line per text operation.
    fn page_texts(pdf: &[u8]) -> Vec<String> {
        let doc = Document::load_mem(pdf).unwrap();

        doc.get_pages()
            .values()
            .map(|&page_id| {
                let fonts = page_fonts(&doc, page_id);
                let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

                let mut text = String::new();
                let mut current = None;
                for op in &content.operations {
                    match op.operator.as_str() {
                        "Tf" => {
                            current = op
                                .operands
                                .first()
                                .and_then(|name| name.as_name().ok())
                                .and_then(|name| fonts.get(name));
                        }
                        "Tj" => {
                            if let (Some(glyphs), Some(Object::String(bytes, _))) =
                                (current, op.operands.first())
                            {
                                for pair in bytes.chunks_exact(2) {
                                    text.extend(glyphs.get(&u16::from_be_bytes([pair[0], pair[1]])));
                                }
                                text.push('\n');
                            }
                        }
                        _ => {}
                    }
                }
                text
            })
            .collect()
    }

    #[test]
    fn test_convert_produces_pdf() {
        let bytes = PdfEngine::default()
            .convert("# RECEIPT\n17.10.2026 14:05\nGreen tea\n2 x 19.99     39.98\n# TOTAL 56.48")
            .unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 200);
    }

    #[test]
    fn test_convert_empty_markup() {
        let bytes = PdfEngine::default().convert("").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_layout_styles_and_wraps() {
        let engine = PdfEngine::default();
        let body_columns = engine.columns(Style::Body);
        let long = "x".repeat(body_columns + 3);

        let rows = engine.layout(&format!("# Title\n\n{}", long));

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], Row { style: Style::Heading, text: "Title".to_string() });
        assert_eq!(rows[1].text, "");
        assert_eq!(rows[2].text.chars().count(), body_columns);
        assert_eq!(rows[3].text, "xxx");
    }

    #[test]
    fn test_page_grows_with_content() {
        let engine = PdfEngine::default();
        let short = engine.layout("a");
        let long = engine.layout(&"a\n".repeat(200));

        assert!(engine.page_height_mm(&long) > engine.page_height_mm(&short));
        assert!(engine.page_height_mm(&short) >= engine.page_width_mm / 2.0);
    }

    #[test]
    fn test_non_latin_titles_are_written() {
        let bytes = PdfEngine::default()
            .convert("# ЧЕК\nЧай зелёный\n2 x 19.99     39.98\nCafé crème\n1 x 3.50       3.50")
            .unwrap();

        let pages = page_texts(&bytes);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("ЧЕК"), "text: {}", pages[0]);
        assert!(pages[0].contains("Чай зелёный"), "text: {}", pages[0]);
        assert!(pages[0].contains("Café crème"), "text: {}", pages[0]);
        assert!(pages[0].contains("39.98"), "text: {}", pages[0]);
    }

    #[test]
    fn test_long_receipt_continues_on_new_pages() {
        let engine = PdfEngine::default();
        let markup: String = (0..2000).map(|n| format!("line {}\n", n)).collect();

        let pages = engine.paginate(engine.layout(&markup));
        assert!(pages.len() > 1);
        assert_eq!(pages.iter().map(Vec::len).sum::<usize>(), 2000);
        for rows in &pages {
            assert!(!rows.is_empty());
            assert!(engine.page_height_mm(rows) <= engine.max_page_height_mm);
        }

        let texts = page_texts(&engine.convert(&markup).unwrap());
        assert_eq!(texts.len(), pages.len());
        assert!(texts[0].starts_with("line 0\n"));
        assert!(texts.last().unwrap().ends_with("line 1999\n"));
    }

    #[test]
    fn test_short_receipt_is_one_page() {
        let engine = PdfEngine::default();
        assert_eq!(engine.paginate(engine.layout("a\nb")).len(), 1);
        assert_eq!(engine.paginate(Vec::new()), vec![Vec::new()]);
    }

    #[test]
    fn test_receipt_width_fits_template_columns() {
        // The built-in template is 34 columns wide
        assert!(PdfEngine::default().columns(Style::Body) >= 34);
    }
}
