//! Renders a [`ReportDocument`] to PDF bytes.
//!
//! Layout works in whole millimetres on an A4 page with a cursor that moves
//! down the page and starts a new one when the next line would cross the
//! bottom margin. Only the built-in Helvetica faces are used, so every
//! character outside printable ASCII is drawn as `?`. Names, titles and
//! categories in other scripts are therefore unreadable in PDFs; the CSV and
//! Excel exports keep them unchanged.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};

use super::document::{Block, Cell, ReportDocument, Table, Tone};
use super::error::ExportError;

const PAGE_WIDTH: u16 = 210;
const PAGE_HEIGHT: u16 = 297;
const MARGIN: u16 = 15;
const CONTENT_WIDTH: u16 = PAGE_WIDTH - 2 * MARGIN;
const VALUE_OFFSET: u16 = 70;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 9.0;

const TITLE_LINE: u16 = 12;
const HEADING_LINE: u16 = 9;
const BODY_LINE: u16 = 6;
const TABLE_LINE: u16 = 5;
const SECTION_GAP: u16 = 4;

/// Renders the document.
///
/// # Errors
///
/// Returns `ExportError::Pdf` if fonts cannot be registered or the document
/// cannot be serialized.
pub fn render(document: &ReportDocument) -> Result<Vec<u8>, ExportError> {
    let mut writer = PdfWriter::new(&document.title)?;

    writer.write_line(&document.title, TITLE_SIZE, TITLE_LINE, true, Tone::Normal);
    for line in &document.header_lines {
        writer.write_line(line, BODY_SIZE, BODY_LINE, false, Tone::Muted);
    }
    writer.gap(SECTION_GAP);

    for section in &document.sections {
        writer.ensure(HEADING_LINE + BODY_LINE);
        writer.write_line(&section.heading, HEADING_SIZE, HEADING_LINE, true, Tone::Normal);

        for block in &section.blocks {
            match block {
                Block::Paragraph(cell) => writer.paragraph(cell),
                Block::KeyValues(pairs) => {
                    for (label, value) in pairs {
                        writer.key_value(label, value);
                    }
                }
                Block::Table(table) => writer.table(table),
                Block::Numbered(items) => {
                    for (i, item) in items.iter().enumerate() {
                        writer.paragraph(&Cell::from(format!("{}. {item}", i + 1)));
                    }
                }
            }
        }
        writer.gap(SECTION_GAP);
    }

    writer.finish()
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: u16,
    pages: u16,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(
            sanitize(title),
            mm(PAGE_WIDTH),
            mm(PAGE_HEIGHT),
            "Page 1".to_string(),
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    /// Starts a new page if fewer than `height` millimetres remain.
    fn ensure(&mut self, height: u16) -> bool {
        if self.y >= MARGIN + height {
            return false;
        }
        self.pages += 1;
        let (page, layer) =
            self.doc
                .add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), format!("Page {}", self.pages));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        true
    }

    fn gap(&mut self, height: u16) {
        self.y = self.y.saturating_sub(height).max(MARGIN);
    }

    fn text_at(&self, text: &str, size: f32, x: u16, bold: bool, tone: Tone) {
        self.layer.set_fill_color(tone_color(tone));
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(sanitize(text), size, mm(x), mm(self.y), font);
    }

    fn write_line(&mut self, text: &str, size: f32, height: u16, bold: bool, tone: Tone) {
        self.ensure(height);
        self.y -= height;
        self.text_at(text, size, MARGIN, bold, tone);
    }

    fn paragraph(&mut self, cell: &Cell) {
        for line in wrap(&cell.text, max_chars(CONTENT_WIDTH)) {
            self.write_line(&line, BODY_SIZE, BODY_LINE, false, cell.tone);
        }
    }

    fn key_value(&mut self, label: &str, value: &Cell) {
        self.ensure(BODY_LINE);
        self.y -= BODY_LINE;
        self.text_at(&format!("{label}:"), BODY_SIZE, MARGIN, true, Tone::Normal);
        let value_text = truncate(&value.text, max_chars(CONTENT_WIDTH - VALUE_OFFSET));
        self.text_at(&value_text, BODY_SIZE, MARGIN + VALUE_OFFSET, false, value.tone);
    }

    fn table(&mut self, table: &Table) {
        let columns = column_layout(&table.widths);

        self.table_header(table, &columns);
        for row in &table.rows {
            if self.ensure(TABLE_LINE) {
                self.table_header(table, &columns);
            }
            self.y -= TABLE_LINE;
            for ((x, width), cell) in columns.iter().zip(row) {
                let text = truncate(&cell.text, max_chars(*width));
                self.text_at(&text, TABLE_SIZE, *x, false, cell.tone);
            }
        }
    }

    fn table_header(&mut self, table: &Table, columns: &[(u16, u16)]) {
        self.ensure(TABLE_LINE * 2);
        self.y -= TABLE_LINE;
        for ((x, width), header) in columns.iter().zip(&table.headers) {
            let text = truncate(header, max_chars(*width));
            self.text_at(&text, TABLE_SIZE, *x, true, Tone::Normal);
        }
    }
}

fn mm(value: u16) -> Mm {
    Mm(f32::from(value))
}

fn tone_color(tone: Tone) -> Color {
    let (r, g, b) = match tone {
        Tone::Normal => (0.0, 0.0, 0.0),
        Tone::Positive => (0.13, 0.55, 0.13),
        Tone::Negative => (0.8, 0.1, 0.1),
        Tone::Warning => (0.9, 0.5, 0.0),
        Tone::Muted => (0.45, 0.45, 0.45),
    };
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Start offset and width in millimetres of each column, scaled so the
/// relative widths fill the content area.
fn column_layout(widths: &[u16]) -> Vec<(u16, u16)> {
    let total: u32 = widths.iter().map(|w| u32::from(*w)).sum::<u32>().max(1);
    let mut x = MARGIN;
    widths
        .iter()
        .map(|w| {
            let width =
                u16::try_from(u32::from(*w) * u32::from(CONTENT_WIDTH) / total).unwrap_or(CONTENT_WIDTH);
            let column = (x, width);
            x = x.saturating_add(width);
            column
        })
        .collect()
}

/// Characters of body text that fit in `width_mm`.
fn max_chars(width_mm: u16) -> usize {
    usize::from(width_mm) * 10 / 17
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

/// Greedy word wrap. Words longer than a line are truncated.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word = truncate(word, max);
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() {
                c
            } else {
                '?'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("one two three four five six", 9);
        assert_eq!(lines, vec!["one two", "three", "four five", "six"]);
    }

    #[test]
    fn test_wrap_empty_keeps_one_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Entertainment", 8), "Entert..");
    }

    #[test]
    fn test_sanitize_replaces_non_ascii() {
        assert_eq!(sanitize("Caf\u{e9} \u{20b9}50"), "Caf? ?50");
    }

    #[test]
    fn test_column_layout_fills_content_width() {
        let columns = column_layout(&[1, 1, 2]);
        assert_eq!(columns, vec![(15, 45), (60, 45), (105, 90)]);
    }
}
