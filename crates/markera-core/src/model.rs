use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique token minted by the store when a region is created. Monotonic
/// within a process, never reused, immutable for the region's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a region is a top-level parsing unit or nested under one.
/// Fixed at creation. The parent link is a lookup key, not an owning
/// pointer; the store resolves it by scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Main,
    Sub { parent: RegionId },
}

/// A rectangle annotation on a rendered page.
///
/// `index` is the 1-based position among siblings of the same kind: main
/// regions are numbered among all main regions, a sub region among the
/// subs of its parent. It is renumbered when siblings are removed, and is
/// never unique across kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub index: u32,
    pub rect: Rect,
    pub kind: RegionKind,
}

impl Region {
    pub fn is_main(&self) -> bool {
        matches!(self.kind, RegionKind::Main)
    }

    pub fn parent_id(&self) -> Option<RegionId> {
        match self.kind {
            RegionKind::Sub { parent } => Some(parent),
            RegionKind::Main => None,
        }
    }
}
