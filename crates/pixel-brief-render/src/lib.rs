//! Presentation artifacts for a brief.
//!
//! Renders the live HTML preview and the builder page, serves the retro theme
//! stylesheet, and exports a brief as a Word document.

pub mod assets;
pub mod document;
pub mod templates;

pub use assets::ThemeAssets;
pub use document::{export_docx, outline, Block, DocumentOutline, ExportError, DOCX_MIME};
pub use templates::{Flash, FlashKind, PageContext, PreviewContext, RenderError, TemplateEngine};
