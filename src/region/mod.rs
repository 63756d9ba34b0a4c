//! Labeled regions and the ordered store that owns them.

pub mod extractor;

use serde::Serialize;

use crate::geometry::{BufferPoint, Color};

pub use extractor::extract;

/// An extracted pixel set that has not been labeled yet. At most one exists
/// at a time; the session gates new strokes while it is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegion {
    pub pixels: Vec<BufferPoint>,
}

impl PendingRegion {
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// The durable output of one completed, labeled stroke. `id` and `pixels`
/// never change after creation; only `label` is mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledRegion {
    pub id: String,
    pub label: String,
    pub pixels: Vec<BufferPoint>,
    #[serde(skip)]
    pub color: Color,
}

/// Ordered collection of labeled regions; insertion order is creation order
/// and doubles as compositor paint order.
#[derive(Debug, Clone, Default)]
pub struct RegionStore {
    regions: Vec<LabeledRegion>,
    next_id: u64,
}

impl RegionStore {
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        format!("region-{id}")
    }

    /// Appends a freshly labeled region and returns its generated id.
    pub fn add(
        &mut self,
        pending: PendingRegion,
        label: impl Into<String>,
        color: Color,
    ) -> String {
        let id = self.allocate_id();
        let label = label.into();
        tracing::debug!(%id, %label, pixels = pending.pixels.len(), "region stored");
        self.regions.push(LabeledRegion {
            id: id.clone(),
            label,
            pixels: pending.pixels,
            color,
        });
        id
    }

    /// Removes the region with `id`, returning it. Absent ids are a silent
    /// no-op.
    pub fn remove(&mut self, id: &str) -> Option<LabeledRegion> {
        let index = self.regions.iter().position(|region| region.id == id)?;
        Some(self.regions.remove(index))
    }

    /// Replaces the label in place; `id` and `pixels` stay untouched.
    /// Returns whether the region existed.
    pub fn relabel(&mut self, id: &str, new_label: impl Into<String>) -> bool {
        match self.regions.iter_mut().find(|region| region.id == id) {
            Some(region) => {
                region.label = new_label.into();
                true
            }
            None => {
                tracing::debug!(%id, "relabel for unknown region ignored");
                false
            }
        }
    }

    pub fn find(&self, id: &str) -> Option<&LabeledRegion> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn regions(&self) -> &[LabeledRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }
}
