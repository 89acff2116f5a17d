//! Render adapter. Implements RendererPort with Markdown documents and CSV item sheets.

pub mod csv_utils;
pub mod markdown;

pub use csv_utils::items_to_csv;
pub use markdown::MarkdownRenderer;
