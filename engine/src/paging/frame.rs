use serde::Serialize;

/// Backreference from an occupied frame to the page living in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameOwner {
    pub process: String,
    pub page: usize,
}

/// Fixed-length array of physical frames, each free or owned by exactly
/// one process page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrameTable {
    slots: Vec<Option<FrameOwner>>,
}

impl FrameTable {
    pub fn new(frame_count: usize) -> Self {
        FrameTable {
            slots: vec![None; frame_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<&FrameOwner> {
        self.slots.get(frame).and_then(Option::as_ref)
    }

    pub fn is_free(&self, frame: usize) -> bool {
        matches!(self.slots.get(frame), Some(None))
    }

    /// Indices of free frames in ascending order.
    pub fn free_frames(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn used_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn occupy(&mut self, frame: usize, owner: FrameOwner) {
        self.slots[frame] = Some(owner);
    }

    pub fn release(&mut self, frame: usize) {
        if let Some(slot) = self.slots.get_mut(frame) {
            *slot = None;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&FrameOwner>> {
        self.slots.iter().map(Option::as_ref)
    }
}
