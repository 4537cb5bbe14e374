//! Commit path for drag and resize interactions.
//!
//! The interaction itself happens in the front-end; what arrives here is
//! the rectangle at gesture end. Both operations clamp against the page
//! bounds and write the result back through the store, so a committed
//! region can never extend past the page edge.

use crate::error::MarkeraError;
use crate::geometry::{clamp_drag, clamp_resize, Size};
use crate::model::RegionId;
use crate::store::RegionStore;

/// Commit a drag: clamp the requested position against the region's
/// current size and write it back.
pub fn commit_drag(
    store: &mut RegionStore,
    id: RegionId,
    x: f64,
    y: f64,
    bounds: Size,
) -> Result<(), MarkeraError> {
    let rect = store.get(id).ok_or(MarkeraError::UnknownRegion(id))?.rect;
    store.update_rect(id, clamp_drag(&rect, x, y, bounds))
}

/// Commit a resize: position is clamped against the new size first, then
/// the size is capped at the page edge.
pub fn commit_resize(
    store: &mut RegionStore,
    id: RegionId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    bounds: Size,
) -> Result<(), MarkeraError> {
    if store.get(id).is_none() {
        return Err(MarkeraError::UnknownRegion(id));
    }
    store.update_rect(id, clamp_resize(x, y, width, height, bounds))
}
