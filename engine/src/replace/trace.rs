use crate::replace::policy::Replacer;
use serde::Serialize;
use tracing::{debug, trace};

/// Page numbers are opaque labels from the reference string.
pub type PageNo = u32;

/// One serviced reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// 1-based position in the reference string.
    pub step: usize,
    pub page: PageNo,
    /// Frame contents after servicing, in slot order.
    pub frames: Vec<PageNo>,
    pub fault: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementResult {
    pub page_faults: usize,
    pub page_hits: usize,
    pub steps: Vec<TraceStep>,
    /// `hits / references * 100`, or 0 for an empty reference string.
    pub hit_rate: f64,
}

impl ReplacementResult {
    pub fn references(&self) -> usize {
        self.page_faults + self.page_hits
    }

    /// Frame contents after the last reference.
    pub fn final_frames(&self) -> &[PageNo] {
        self.steps.last().map(|s| s.frames.as_slice()).unwrap_or(&[])
    }
}

/// Drive `replacer` over `pages` with `capacity` frames.
///
/// A zero capacity is degenerate: every reference faults and nothing
/// becomes resident.
pub fn simulate<R: Replacer>(replacer: &mut R, pages: &[PageNo], capacity: usize) -> ReplacementResult {
    let mut frames: Vec<PageNo> = Vec::with_capacity(capacity);
    let mut page_faults = 0;
    let mut page_hits = 0;
    let mut steps = Vec::with_capacity(pages.len());

    for (i, &page) in pages.iter().enumerate() {
        let fault = !frames.contains(&page);

        if fault {
            if frames.len() < capacity {
                frames.push(page);
                replacer.loaded(page);
            } else if !frames.is_empty() {
                let evicted = replacer.replace(&mut frames, page, &pages[i + 1..]);
                debug!(step = i + 1, page, evicted, "evicted");
            }
            page_faults += 1;
        } else {
            page_hits += 1;
        }
        replacer.touched(page, i);

        trace!(step = i + 1, page, fault, frames = ?frames);
        steps.push(TraceStep {
            step: i + 1,
            page,
            frames: frames.clone(),
            fault,
        });
    }

    let hit_rate = if pages.is_empty() {
        0.0
    } else {
        page_hits as f64 / pages.len() as f64 * 100.0
    };

    ReplacementResult {
        page_faults,
        page_hits,
        steps,
        hit_rate,
    }
}
