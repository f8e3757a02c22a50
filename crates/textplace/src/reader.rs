//! The reader facade: whole-document extraction and placement access.

use std::collections::HashMap;
use std::path::Path;

use textplace_core::{
    ExtractError, ExtractOptions, ExtractWarning, FontInfo, TextPlacement, WarningCode,
};
use textplace_parse::{BackendError, DocumentProvider, Interpreter, PlacementCollector};

/// Extracted text placements for one document.
///
/// Construction runs the whole extraction eagerly: every page's content
/// streams are interpreted and folded into [`TextPlacement`] records in
/// page order. Per-page failures degrade to warnings; only an unreadable
/// source fails construction.
pub struct TextPlacementReader {
    placements: Vec<TextPlacement>,
    fonts: HashMap<u32, FontInfo>,
    page_count: usize,
    warnings: Vec<ExtractWarning>,
}

impl TextPlacementReader {
    /// Extract from a file path with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        Self::open_with_options(path, ExtractOptions::default())
    }

    /// Extract from a file path.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: ExtractOptions,
    ) -> Result<Self, ExtractError> {
        let provider = DocumentProvider::open(path.as_ref()).map_err(ExtractError::from)?;
        Ok(Self::extract(provider, options))
    }

    /// Extract from an in-memory document with default options.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        Self::from_bytes_with_options(bytes, ExtractOptions::default())
    }

    /// Extract from an in-memory document.
    pub fn from_bytes_with_options(
        bytes: &[u8],
        options: ExtractOptions,
    ) -> Result<Self, ExtractError> {
        let provider = DocumentProvider::from_bytes(bytes).map_err(ExtractError::from)?;
        Ok(Self::extract(provider, options))
    }

    fn extract(provider: DocumentProvider, options: ExtractOptions) -> Self {
        let mut placements = Vec::new();
        let mut warnings = Vec::new();

        let interpreter = Interpreter::new(provider.doc(), options);
        let mut collector = PlacementCollector::new(provider.doc());
        let empty_resources = lopdf::Dictionary::new();

        let page_ids: Vec<lopdf::ObjectId> = provider.page_ids().to_vec();
        for (page_number, &page_id) in page_ids.iter().enumerate() {
            let content = match provider.page_contents(page_id) {
                Ok(content) => content,
                Err(err) => {
                    // A structurally broken page loses its text only.
                    warnings.push(
                        ExtractWarning::new(
                            WarningCode::Other("PAGE_CONTENTS".to_string()),
                            format!("page contents unavailable: {err}"),
                        )
                        .on_page(page_number),
                    );
                    continue;
                }
            };
            let resources = provider.page_resources(page_id).unwrap_or(&empty_resources);

            match interpreter.interpret(&content, resources, &mut collector) {
                Ok(()) => {}
                Err(BackendError::RecursionLimit { limit }) => {
                    warnings.push(
                        ExtractWarning::new(
                            WarningCode::RecursionLimit,
                            format!("form XObject nesting exceeded {limit}; page truncated"),
                        )
                        .on_page(page_number),
                    );
                }
                Err(err) => {
                    warnings.push(
                        ExtractWarning::new(
                            WarningCode::Other("STREAM_ABORTED".to_string()),
                            format!("content stream aborted: {err}"),
                        )
                        .on_page(page_number),
                    );
                }
            }

            // The page keeps whatever was gathered before any abort.
            for placed in collector.take_placements() {
                placements.push(TextPlacement {
                    page: page_number,
                    font_id: placed.font_id,
                    x: placed.global_box.x_min,
                    y: placed.global_box.y_min,
                    width: placed.global_box.width(),
                    height: placed.global_box.height(),
                    text: placed.text,
                });
            }
            for warning in collector.take_warnings() {
                warnings.push(if warning.page.is_none() {
                    warning.on_page(page_number)
                } else {
                    warning
                });
            }
        }

        let fonts = collector.fonts().clone();
        Self {
            placements,
            fonts,
            page_count: provider.page_count(),
            warnings,
        }
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Total number of extracted placements.
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// All placements, in page and stream order.
    pub fn placements(&self) -> &[TextPlacement] {
        &self.placements
    }

    /// Iterate over all placements.
    pub fn iter(&self) -> std::slice::Iter<'_, TextPlacement> {
        self.placements.iter()
    }

    /// Placements whose page lies in `[start_page, end_page)`.
    ///
    /// A negative `end_page` means end of document.
    pub fn pages(
        &self,
        start_page: usize,
        end_page: i64,
    ) -> impl Iterator<Item = &TextPlacement> + '_ {
        self.placements.iter().filter(move |p| {
            p.page >= start_page && (end_page < 0 || (p.page as i64) < end_page)
        })
    }

    /// Descriptions of every font used by the placements, by font id.
    pub fn fonts(&self) -> &HashMap<u32, FontInfo> {
        &self.fonts
    }

    /// Non-fatal issues encountered during extraction.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Document summary as JSON: page count, placement count, and the
    /// font descriptions.
    pub fn summary_json(&self) -> serde_json::Value {
        let mut fonts: Vec<&FontInfo> = self.fonts.values().collect();
        fonts.sort_by_key(|f| f.font_id);
        serde_json::json!({
            "page_count": self.page_count,
            "placement_count": self.placements.len(),
            "fonts": fonts,
        })
    }
}

impl<'a> IntoIterator for &'a TextPlacementReader {
    type Item = &'a TextPlacement;
    type IntoIter = std::slice::Iter<'a, TextPlacement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
