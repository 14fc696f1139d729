//! Format-independent report layout.
//!
//! Builders produce a [`ReportDocument`]; the PDF renderer lays it out on
//! pages. Keeping the layout as data lets the content be checked without
//! parsing PDF bytes.

/// Emphasis applied to a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Default text colour.
    #[default]
    Normal,
    /// Good news, rendered green.
    Positive,
    /// Bad news, rendered red.
    Negative,
    /// Needs a look, rendered orange.
    Warning,
    /// De-emphasized, rendered grey.
    Muted,
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Cell text.
    pub text: String,
    /// Cell colour.
    pub tone: Tone,
}

impl Cell {
    /// A cell with an explicit tone.
    #[must_use]
    pub fn toned(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::toned(text, Tone::Normal)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::toned(text, Tone::Normal)
    }
}

/// A table with relative column widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header labels.
    pub headers: Vec<String>,
    /// Relative column widths, one per header.
    pub widths: Vec<u16>,
    /// Data rows.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(headers: &[&str], widths: &[u16]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            widths: widths.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

/// A unit of content inside a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A line of text.
    Paragraph(Cell),
    /// Label/value pairs.
    KeyValues(Vec<(String, Cell)>),
    /// A table.
    Table(Table),
    /// A numbered list.
    Numbered(Vec<String>),
}

/// A headed group of blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section heading.
    pub heading: String,
    /// Section content.
    pub blocks: Vec<Block>,
}

impl Section {
    /// Creates an empty section.
    #[must_use]
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    /// Adds a paragraph.
    #[must_use]
    pub fn paragraph(mut self, text: impl Into<Cell>) -> Self {
        self.blocks.push(Block::Paragraph(text.into()));
        self
    }

    /// Adds label/value pairs.
    #[must_use]
    pub fn key_values<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Cell>,
    {
        self.blocks.push(Block::KeyValues(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    /// Adds a table, or `empty_message` when the table has no rows.
    #[must_use]
    pub fn table_or(mut self, table: Table, empty_message: &str) -> Self {
        if table.rows.is_empty() {
            self.blocks
                .push(Block::Paragraph(Cell::toned(empty_message, Tone::Muted)));
        } else {
            self.blocks.push(Block::Table(table));
        }
        self
    }

    /// Adds a numbered list.
    #[must_use]
    pub fn numbered(mut self, items: Vec<String>) -> Self {
        self.blocks.push(Block::Numbered(items));
        self
    }
}

/// A complete report ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    /// Title on the first page.
    pub title: String,
    /// Lines printed under the title.
    pub header_lines: Vec<String>,
    /// Body sections in order.
    pub sections: Vec<Section>,
}

impl ReportDocument {
    /// Creates a document with a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            header_lines: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Adds a header line.
    #[must_use]
    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.header_lines.push(text.into());
        self
    }

    /// Appends a section.
    #[must_use]
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Section with the given heading.
    #[must_use]
    pub fn find_section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }

    /// Flattens the document to text, one line per printed line.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = vec![self.title.clone()];
        out.extend(self.header_lines.iter().cloned());
        for section in &self.sections {
            out.push(section.heading.clone());
            for block in &section.blocks {
                match block {
                    Block::Paragraph(cell) => out.push(cell.text.clone()),
                    Block::KeyValues(pairs) => {
                        out.extend(pairs.iter().map(|(k, v)| format!("{k}: {}", v.text)));
                    }
                    Block::Table(table) => {
                        out.push(table.headers.join(" | "));
                        out.extend(table.rows.iter().map(|row| {
                            row.iter()
                                .map(|c| c.text.as_str())
                                .collect::<Vec<_>>()
                                .join(" | ")
                        }));
                    }
                    Block::Numbered(items) => {
                        out.extend(
                            items
                                .iter()
                                .enumerate()
                                .map(|(i, item)| format!("{}. {item}", i + 1)),
                        );
                    }
                }
            }
        }
        out.join("\n")
    }
}
