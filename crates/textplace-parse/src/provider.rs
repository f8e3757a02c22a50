//! Document and object provider over lopdf.
//!
//! [`DocumentProvider`] wraps a parsed [`lopdf::Document`] and exposes
//! the capability set the pipeline consumes: pages in document order,
//! inherited page attributes, filter-decoded content streams, and
//! reference resolution. The pipeline never touches xref tables or
//! stream filters directly.

use crate::error::BackendError;

/// A parsed document plus the page order cache.
pub struct DocumentProvider {
    doc: lopdf::Document,
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for DocumentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentProvider")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl DocumentProvider {
    /// Parse a document from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BackendError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Malformed(format!("failed to parse PDF: {e}")))?;
        Ok(Self::from_document(doc))
    }

    /// Read and parse a document from a file path.
    pub fn open(path: &std::path::Path) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an already-parsed document.
    pub fn from_document(doc: lopdf::Document) -> Self {
        // get_pages returns a 1-based BTreeMap; values iterate in
        // document order.
        let page_ids = doc.get_pages().values().copied().collect();
        Self { doc, page_ids }
    }

    /// The underlying document.
    pub fn doc(&self) -> &lopdf::Document {
        &self.doc
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Object ids of the pages, in document order.
    pub fn page_ids(&self) -> &[lopdf::ObjectId] {
        &self.page_ids
    }

    /// Dereference an indirect reference; non-references pass through.
    pub fn resolve<'a>(&'a self, obj: &'a lopdf::Object) -> &'a lopdf::Object {
        match obj {
            lopdf::Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }

    /// The page's content streams, filter-decoded and concatenated.
    ///
    /// `/Contents` may be a single stream or an array of streams; the
    /// pieces are joined with a newline so operators cannot fuse across
    /// stream boundaries.
    pub fn page_contents(&self, page_id: lopdf::ObjectId) -> Result<Vec<u8>, BackendError> {
        let page = self.page_dict(page_id)?;
        let contents = match page.get(b"Contents") {
            Ok(obj) => self.resolve(obj),
            Err(_) => return Ok(Vec::new()),
        };

        let mut streams = Vec::new();
        match contents {
            lopdf::Object::Stream(s) => streams.push(s),
            lopdf::Object::Array(items) => {
                for item in items {
                    if let lopdf::Object::Stream(s) = self.resolve(item) {
                        streams.push(s);
                    }
                }
            }
            _ => {}
        }

        let mut out = Vec::new();
        for stream in streams {
            let data = decode_stream(stream)?;
            if !out.is_empty() {
                out.push(b'\n');
            }
            out.extend_from_slice(&data);
        }
        Ok(out)
    }

    /// Filter-decoded content of an arbitrary stream (XObjects, CMaps).
    pub fn stream_contents(&self, stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
        decode_stream(stream)
    }

    /// The page's `/Resources` dictionary, inherited through the page
    /// tree when absent on the page itself.
    pub fn page_resources(&self, page_id: lopdf::ObjectId) -> Option<&lopdf::Dictionary> {
        let obj = self.inherited(page_id, b"Resources")?;
        match self.resolve(obj) {
            lopdf::Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// The page's `/MediaBox` as `[x1, y1, x2, y2]`, inherited through
    /// the page tree. US Letter when the document declares none.
    pub fn page_media_box(&self, page_id: lopdf::ObjectId) -> [f64; 4] {
        let from_tree = self
            .inherited(page_id, b"MediaBox")
            .map(|o| self.resolve(o))
            .and_then(|o| match o {
                lopdf::Object::Array(a) if a.len() == 4 => {
                    let mut vals = [0.0; 4];
                    for (i, item) in a.iter().enumerate() {
                        vals[i] = match self.resolve(item) {
                            lopdf::Object::Integer(n) => *n as f64,
                            lopdf::Object::Real(f) => f64::from(*f),
                            _ => return None,
                        };
                    }
                    Some(vals)
                }
                _ => None,
            });
        from_tree.unwrap_or([0.0, 0.0, 612.0, 792.0])
    }

    /// Look up a page-tree attribute, walking `/Parent` links until the
    /// key is found or the root is passed.
    fn inherited(&self, page_id: lopdf::ObjectId, key: &[u8]) -> Option<&lopdf::Object> {
        let mut current = page_id;
        // Parent chains in valid documents are shallow; the bound stops
        // reference cycles.
        for _ in 0..64 {
            let dict = self.page_dict(current).ok()?;
            if let Ok(value) = dict.get(key) {
                return Some(value);
            }
            match dict.get(b"Parent") {
                Ok(lopdf::Object::Reference(parent)) => current = *parent,
                _ => return None,
            }
        }
        None
    }

    fn page_dict(&self, page_id: lopdf::ObjectId) -> Result<&lopdf::Dictionary, BackendError> {
        match self.doc.get_object(page_id) {
            Ok(lopdf::Object::Dictionary(d)) => Ok(d),
            Ok(_) => Err(BackendError::Malformed(format!(
                "object {page_id:?} is not a page dictionary"
            ))),
            Err(e) => Err(BackendError::Malformed(format!(
                "failed to resolve page {page_id:?}: {e}"
            ))),
        }
    }
}

/// Decode a stream's content, applying filters when present.
pub(crate) fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Malformed(format!("stream decode failed: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}
