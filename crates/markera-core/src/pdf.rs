//! Boundary to the rendering collaborator.
//!
//! Rendering proper is delegated; all the pipeline consumes is the page
//! count and each page's native pixel size, read from the document's
//! MediaBox via lopdf.

use crate::error::MarkeraError;
use crate::geometry::Size;
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PdfInfo {
    pub page_count: u32,
    /// Native size of each page, in document order.
    pub page_sizes: Vec<Size>,
}

impl PdfInfo {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MarkeraError> {
        let doc =
            Document::load_mem(bytes).map_err(|e| MarkeraError::DocumentLoad(e.to_string()))?;
        let pages = doc.get_pages();
        let mut page_sizes = Vec::with_capacity(pages.len());
        for (&number, &page_id) in pages.iter() {
            let size = media_box_size(&doc, page_id).ok_or_else(|| {
                MarkeraError::DocumentLoad(format!("page {number} has no readable MediaBox"))
            })?;
            page_sizes.push(size);
        }
        Ok(PdfInfo {
            page_count: page_sizes.len() as u32,
            page_sizes,
        })
    }

    /// Native size of a page, 1-based.
    pub fn page_size(&self, page: u32) -> Option<Size> {
        if page == 0 {
            return None;
        }
        self.page_sizes.get(page as usize - 1).copied()
    }
}

/// Read a page's MediaBox, walking up the Pages tree for inherited values.
fn media_box_size(doc: &Document, page_id: ObjectId) -> Option<Size> {
    let mut dict = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(obj) = dict.get(b"MediaBox") {
            let obj = match obj {
                Object::Reference(id) => doc.get_object(*id).ok()?,
                other => other,
            };
            let Object::Array(values) = obj else {
                return None;
            };
            let nums: Vec<f64> = values.iter().filter_map(as_number).collect();
            if nums.len() != 4 {
                return None;
            }
            return Some(Size {
                width: (nums[2] - nums[0]).abs(),
                height: (nums[3] - nums[1]).abs(),
            });
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => dict = doc.get_dictionary(*id).ok()?,
            _ => return None,
        }
    }
}

fn as_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
