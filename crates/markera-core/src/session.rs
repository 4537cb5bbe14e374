//! The session controller: one owned object holding all viewer state,
//! the loaded document, the region store, the current page/zoom and the
//! captured page view. Nothing here is ambient or global.
//!
//! All mutations happen synchronously inside discrete command handlers;
//! the submission dispatch is the only call that can block, and it holds
//! `&mut self`, so a second submission cannot start while one is in
//! flight.

use crate::error::MarkeraError;
use crate::format::{self, PARSE_FAILURE_MESSAGE};
use crate::geometry::{PageView, Size};
use crate::model::RegionId;
use crate::pdf::PdfInfo;
use crate::store::RegionStore;
use crate::submit::{self, ParseBackend};
use crate::surface;
use std::path::Path;
use tracing::{debug, error};

/// Width the page is laid out at, in display pixels. Matches the fixed
/// viewer column the rectangles are drawn against.
pub const RENDERED_PAGE_WIDTH: f64 = 500.0;

pub const ZOOM_STEP: f64 = 0.1;
pub const MIN_SCALE: f64 = 0.2;

/// The selected document: name, raw bytes and page metadata. Replaced
/// wholesale when a new file is chosen, dropping the previous bytes.
#[derive(Debug)]
pub struct LoadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
    pub info: PdfInfo,
}

#[derive(Debug)]
pub struct Session {
    document: Option<LoadedDocument>,
    store: RegionStore,
    page: u32,
    scale: f64,
    view: Option<PageView>,
    result_text: String,
}

impl Session {
    pub fn new() -> Self {
        Session {
            document: None,
            store: RegionStore::new(),
            page: 1,
            scale: 1.0,
            view: None,
            result_text: String::new(),
        }
    }

    /// Select a file from disk. On success the previous document and all
    /// regions are discarded and the view resets to page 1. On failure
    /// the session is left untouched.
    pub fn select_file(&mut self, path: &Path) -> Result<(), MarkeraError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_document(name, bytes)
    }

    /// Load a document from raw bytes (the file-selection path minus the
    /// disk read).
    pub fn load_document(&mut self, name: String, bytes: Vec<u8>) -> Result<(), MarkeraError> {
        let info = PdfInfo::from_bytes(&bytes).map_err(|e| {
            error!(error = %e, document = %name, "failed to load document");
            e
        })?;
        debug!(document = %name, pages = info.page_count, "document loaded");

        self.document = Some(LoadedDocument { name, bytes, info });
        self.store.clear();
        self.page = 1;
        self.capture_view();
        Ok(())
    }

    /// Recapture the page view from the current page's native size, as a
    /// successful render would. Zoom deliberately does not reach here.
    fn capture_view(&mut self) {
        self.view = self.document.as_ref().and_then(|doc| {
            doc.info.page_size(self.page).map(|native| PageView {
                native,
                rendered: Size {
                    width: RENDERED_PAGE_WIDTH,
                    height: native.height * (RENDERED_PAGE_WIDTH / native.width),
                },
            })
        });
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.info.page_count)
            .unwrap_or(0)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn view(&self) -> Option<PageView> {
        self.view
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.name.as_str())
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Jump to an exact page; rejects pages outside the document.
    pub fn goto_page(&mut self, page: u32) -> Result<(), MarkeraError> {
        if self.document.is_none() {
            return Err(MarkeraError::NoDocument);
        }
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(MarkeraError::PageOutOfRange { page, page_count });
        }
        self.page = page;
        self.capture_view();
        Ok(())
    }

    /// Step forward or back, clamped to the document.
    pub fn change_page(&mut self, offset: i32) {
        let page_count = self.page_count().max(1);
        let target = self.page as i64 + offset as i64;
        self.page = target.clamp(1, page_count as i64) as u32;
        self.capture_view();
    }

    /// Zoom affects display only; the captured view and every stored
    /// rectangle keep their meaning.
    pub fn zoom(&mut self, delta: f64) {
        self.scale = (self.scale + delta).max(MIN_SCALE);
    }

    fn bounds(&self) -> Result<Size, MarkeraError> {
        self.view
            .map(|v| v.rendered)
            .ok_or(MarkeraError::NoDocument)
    }

    /// Add a main region on the current page.
    pub fn add_main(&mut self) -> Result<RegionId, MarkeraError> {
        if self.document.is_none() {
            return Err(MarkeraError::NoDocument);
        }
        Ok(self.store.add_main(self.page))
    }

    /// Add a sub region on the current page, owned by `parent`.
    pub fn add_sub(&mut self, parent: RegionId) -> Result<RegionId, MarkeraError> {
        if self.document.is_none() {
            return Err(MarkeraError::NoDocument);
        }
        self.store.add_sub(parent, self.page)
    }

    pub fn remove(&mut self, id: RegionId) -> Result<(), MarkeraError> {
        self.store.remove(id)
    }

    /// Commit a drag against the current page bounds.
    pub fn drag(&mut self, id: RegionId, x: f64, y: f64) -> Result<(), MarkeraError> {
        let bounds = self.bounds()?;
        surface::commit_drag(&mut self.store, id, x, y, bounds)
    }

    /// Commit a resize against the current page bounds.
    pub fn resize(
        &mut self,
        id: RegionId,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), MarkeraError> {
        let bounds = self.bounds()?;
        surface::commit_resize(&mut self.store, id, x, y, width, height, bounds)
    }

    /// Submit the current selection to the parsing service.
    ///
    /// Declines silently (returns `false`, result text untouched) when no
    /// document is loaded or no regions exist. Otherwise the result text
    /// is replaced: with the formatted per-region texts on success, with
    /// the fixed failure message on any error. The error itself is only
    /// logged.
    pub fn submit(&mut self, backend: &dyn ParseBackend) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };
        if self.store.is_empty() {
            return false;
        }
        let Some(view) = self.view else {
            return false;
        };

        let payload = submit::build_submission(&self.store, &view);
        let outcome = serde_json::to_string(&payload)
            .map_err(MarkeraError::from)
            .and_then(|boxes_json| backend.parse(&doc.name, &doc.bytes, &boxes_json))
            .map(|response| format::format_results(&payload, &response));

        self.result_text = match outcome {
            Ok(text) => text,
            Err(e) => {
                error!(
                    error = %e,
                    backend = backend.backend_name(),
                    "parse submission failed"
                );
                PARSE_FAILURE_MESSAGE.to_string()
            }
        };
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
