//! Positioned text extraction from PDF documents.
//!
//! For every visible text run in a document, [`TextPlacementReader`]
//! produces a [`TextPlacement`]: the UTF-8 string, the font that rendered
//! it, and a bounding box in page coordinates (default user space, origin
//! bottom-left). The crate is consumed by downstream tooling — search
//! indexing, data extraction, layout analysis.
//!
//! # Example
//!
//! ```no_run
//! use textplace::TextPlacementReader;
//!
//! let reader = TextPlacementReader::open("document.pdf")?;
//! println!("{} pages, {} placements", reader.page_count(), reader.placement_count());
//! for placement in reader.pages(0, 2) {
//!     println!("p{} ({:.1}, {:.1}): {}", placement.page, placement.x, placement.y, placement.text);
//! }
//! # Ok::<(), textplace::ExtractError>(())
//! ```

mod reader;

pub use reader::TextPlacementReader;
pub use textplace_core::{
    ExtractError, ExtractOptions, ExtractWarning, FontInfo, TextPlacement, WarningCode,
};
