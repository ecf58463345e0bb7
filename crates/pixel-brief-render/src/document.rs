//! Word document export.
//!
//! A brief is first laid out as a [`DocumentOutline`] of titled sections,
//! then packed into a `.docx` archive.

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use pixel_brief_model::Brief;

/// MIME type of the exported document.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const TITLE_STYLE: &str = "Title";
const HEADING_STYLE: &str = "Heading1";

/// Errors that can occur during export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Order name is required before exporting")]
    MissingOrderName,

    #[error("Failed to write document: {0}")]
    Pack(String),
}

/// One block of the exported document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Level 0 heading
    Title(String),
    /// Level 1 heading
    Heading(String),
    Paragraph(String),
}

/// Ordered blocks of an exported brief.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentOutline {
    pub blocks: Vec<Block>,
}

impl DocumentOutline {
    fn title(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Title(text.into()));
    }

    fn heading(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Heading(text.into()));
    }

    fn paragraph(&mut self, text: impl Into<String>) {
        self.blocks.push(Block::Paragraph(text.into()));
    }

    fn labeled(&mut self, label: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.paragraph(format!("{label}: {value}"));
        }
    }

    /// Pack the outline into `.docx` bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>, ExportError> {
        let docx = self.blocks.iter().fold(
            Docx::new()
                .add_style(
                    Style::new(TITLE_STYLE, StyleType::Paragraph)
                        .name("Title")
                        .size(56)
                        .bold(),
                )
                .add_style(
                    Style::new(HEADING_STYLE, StyleType::Paragraph)
                        .name("Heading 1")
                        .size(32)
                        .bold(),
                ),
            |docx, block| {
                let paragraph = match block {
                    Block::Title(text) => text_paragraph(text).style(TITLE_STYLE),
                    Block::Heading(text) => text_paragraph(text).style(HEADING_STYLE),
                    Block::Paragraph(text) => text_paragraph(text),
                };
                docx.add_paragraph(paragraph)
            },
        );

        let mut buffer = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buffer)
            .map_err(|e| ExportError::Pack(e.to_string()))?;

        Ok(buffer.into_inner())
    }
}

/// Lay out a brief as document sections.
pub fn outline(brief: &Brief) -> DocumentOutline {
    let mut doc = DocumentOutline::default();

    doc.title(brief.header());

    doc.heading("SPECS");
    doc.paragraph(format!("Deadline: {}", brief.deadline.display()));
    doc.paragraph(format!("Platform: {} | {}", brief.platform, brief.layout));
    doc.labeled("Mood", brief.mood.as_ref());

    doc.heading("CONTENT");
    doc.labeled("Headline", brief.headline.as_ref());
    doc.labeled("Sub-text", brief.subtext.as_ref());
    doc.labeled("Price", brief.price.as_ref());
    doc.labeled("Contact", brief.contact_info.as_ref());

    if brief.has_notes() {
        doc.heading("NOTES");
        if let Some(notes) = &brief.design_notes {
            doc.paragraph(notes.clone());
        }
        doc.labeled("Ref", brief.ref_link.as_ref());
    }

    doc
}

/// Export a brief as `.docx` bytes. The brief must carry an order name.
pub fn export_docx(brief: &Brief) -> Result<Vec<u8>, ExportError> {
    if brief.require_order_name().is_err() {
        return Err(ExportError::MissingOrderName);
    }

    let bytes = outline(brief).to_docx()?;
    tracing::debug!(
        order = %brief.order_name,
        bytes = bytes.len(),
        "Exported brief document"
    );
    Ok(bytes)
}

/// A paragraph whose line breaks survive in Word.
fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}
