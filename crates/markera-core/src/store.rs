use crate::error::MarkeraError;
use crate::geometry::Rect;
use crate::model::{Region, RegionId, RegionKind};
use std::collections::{BTreeMap, HashMap};

/// Default geometry for newly created regions, in display pixels.
pub const MAIN_DEFAULT_SIZE: f64 = 100.0;
pub const SUB_DEFAULT_SIZE: f64 = 80.0;

/// Regions partitioned by 1-based page number.
///
/// Enumeration order is ascending page number, then list order within a
/// page. A main region and its subs may live on different pages; the
/// parent link is resolved by scanning all pages.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    pages: BTreeMap<u32, Vec<Region>>,
    main_count: u32,
    next_id: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_id(&mut self) -> RegionId {
        self.next_id += 1;
        RegionId(self.next_id)
    }

    /// Create a main region on `page` with default geometry at the origin.
    pub fn add_main(&mut self, page: u32) -> RegionId {
        let id = self.mint_id();
        let region = Region {
            id,
            index: self.main_count + 1,
            rect: Rect::new(0.0, 0.0, MAIN_DEFAULT_SIZE, MAIN_DEFAULT_SIZE),
            kind: RegionKind::Main,
        };
        self.pages.entry(page).or_default().push(region);
        self.main_count += 1;
        id
    }

    /// Create a sub region on `page` owned by `parent`. The new index is
    /// one past the parent's current sub count, counted across all pages.
    pub fn add_sub(&mut self, parent: RegionId, page: u32) -> Result<RegionId, MarkeraError> {
        match self.get(parent) {
            None => return Err(MarkeraError::UnknownRegion(parent)),
            Some(region) if !region.is_main() => {
                return Err(MarkeraError::NotAMainRegion(parent))
            }
            Some(_) => {}
        }
        let index = self
            .iter()
            .filter(|(_, r)| r.parent_id() == Some(parent))
            .count() as u32
            + 1;
        let id = self.mint_id();
        let region = Region {
            id,
            index,
            rect: Rect::new(0.0, 0.0, SUB_DEFAULT_SIZE, SUB_DEFAULT_SIZE),
            kind: RegionKind::Sub { parent },
        };
        self.pages.entry(page).or_default().push(region);
        Ok(id)
    }

    /// Remove a region. Removing a main region cascades to every region
    /// that references it as parent, on every page, then renumbers the
    /// surviving main regions 1..N. Removing a sub region deletes only
    /// that entry. Pages left empty are pruned.
    ///
    /// Afterwards no surviving region references a parent that no longer
    /// exists.
    pub fn remove(&mut self, id: RegionId) -> Result<(), MarkeraError> {
        let is_main = self
            .get(id)
            .map(Region::is_main)
            .ok_or(MarkeraError::UnknownRegion(id))?;

        if is_main {
            for regions in self.pages.values_mut() {
                regions.retain(|r| r.id != id && r.parent_id() != Some(id));
            }
            self.pages.retain(|_, regions| !regions.is_empty());
            self.renumber_mains();
        } else {
            for regions in self.pages.values_mut() {
                regions.retain(|r| r.id != id);
            }
            self.pages.retain(|_, regions| !regions.is_empty());
        }
        Ok(())
    }

    /// Surviving mains get indices 1..N by ascending current index; the
    /// stable sort keeps page enumeration order as the tie-break.
    fn renumber_mains(&mut self) {
        let mut order: Vec<(u32, RegionId)> = self
            .iter()
            .filter(|(_, r)| r.is_main())
            .map(|(_, r)| (r.index, r.id))
            .collect();
        order.sort_by_key(|(index, _)| *index);

        let new_indices: HashMap<RegionId, u32> = order
            .iter()
            .enumerate()
            .map(|(i, (_, id))| (*id, i as u32 + 1))
            .collect();

        for regions in self.pages.values_mut() {
            for region in regions.iter_mut() {
                if let Some(&index) = new_indices.get(&region.id) {
                    region.index = index;
                }
            }
        }
        self.main_count = order.len() as u32;
    }

    /// Write-through used by the interaction surface after clamping.
    pub fn update_rect(&mut self, id: RegionId, rect: Rect) -> Result<(), MarkeraError> {
        for regions in self.pages.values_mut() {
            if let Some(region) = regions.iter_mut().find(|r| r.id == id) {
                region.rect = rect;
                return Ok(());
            }
        }
        Err(MarkeraError::UnknownRegion(id))
    }

    /// Empty the store and reset the main counter. Minted ids stay unique
    /// across clears.
    pub fn clear(&mut self) {
        self.pages.clear();
        self.main_count = 0;
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.pages.values().flatten().find(|r| r.id == id)
    }

    /// The page a region lives on, if it exists.
    pub fn page_of(&self, id: RegionId) -> Option<u32> {
        self.iter().find(|(_, r)| r.id == id).map(|(page, _)| page)
    }

    pub fn regions_on(&self, page: u32) -> &[Region] {
        self.pages
            .get(&page)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All regions with their page, in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Region)> {
        self.pages
            .iter()
            .flat_map(|(page, regions)| regions.iter().map(move |r| (*page, r)))
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn main_count(&self) -> u32 {
        self.main_count
    }
}
