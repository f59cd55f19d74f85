use crate::replace::trace::{PageNo, ReplacementResult, simulate};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An eviction policy over a fixed set of frames.
///
/// The driver handles hits and free slots; `replace` is only called on a
/// fault when every frame is occupied.
pub trait Replacer {
    /// `page` entered a free frame.
    fn loaded(&mut self, _page: PageNo) {}

    /// `page` was referenced at zero-based position `index`, hit or fault.
    fn touched(&mut self, _page: PageNo, _index: usize) {}

    /// Evict one resident page in favour of `incoming` and return the victim.
    /// `upcoming` holds the references not yet serviced.
    fn replace(&mut self, frames: &mut Vec<PageNo>, incoming: PageNo, upcoming: &[PageNo]) -> PageNo;
}

/// Evicts the page admitted earliest. Hits do not reorder the queue.
#[derive(Debug, Default)]
pub struct Fifo {
    queue: VecDeque<PageNo>,
}

impl Replacer for Fifo {
    fn loaded(&mut self, page: PageNo) {
        self.queue.push_back(page);
    }

    fn replace(&mut self, frames: &mut Vec<PageNo>, incoming: PageNo, _upcoming: &[PageNo]) -> PageNo {
        let victim = self.queue.pop_front().unwrap_or(frames[0]);
        if let Some(slot) = frames.iter().position(|&p| p == victim) {
            frames.remove(slot);
        }
        frames.push(incoming);
        self.queue.push_back(incoming);
        victim
    }
}

/// Evicts the resident page whose last reference is oldest.
#[derive(Debug, Default)]
pub struct Lru {
    last_used: HashMap<PageNo, usize>,
}

impl Replacer for Lru {
    fn touched(&mut self, page: PageNo, index: usize) {
        self.last_used.insert(page, index);
    }

    fn replace(&mut self, frames: &mut Vec<PageNo>, incoming: PageNo, _upcoming: &[PageNo]) -> PageNo {
        let slot = frames
            .iter()
            .enumerate()
            .min_by_key(|&(_, page)| self.last_used.get(page).copied().unwrap_or(0))
            .map(|(slot, _)| slot)
            .unwrap_or(0);
        let victim = std::mem::replace(&mut frames[slot], incoming);
        self.last_used.remove(&victim);
        victim
    }
}

/// Evicts the page needed furthest in the future; pages never needed
/// again go first. Ties resolve to the lowest slot.
#[derive(Debug, Default)]
pub struct Optimal;

impl Replacer for Optimal {
    fn replace(&mut self, frames: &mut Vec<PageNo>, incoming: PageNo, upcoming: &[PageNo]) -> PageNo {
        let mut slot = 0;
        let mut furthest = 0usize;
        for (idx, page) in frames.iter().enumerate() {
            let distance = upcoming
                .iter()
                .position(|p| p == page)
                .unwrap_or(usize::MAX);
            if idx == 0 || distance > furthest {
                slot = idx;
                furthest = distance;
            }
        }
        std::mem::replace(&mut frames[slot], incoming)
    }
}

pub fn fifo(pages: &[PageNo], frame_capacity: usize) -> ReplacementResult {
    simulate(&mut Fifo::default(), pages, frame_capacity)
}

pub fn lru(pages: &[PageNo], frame_capacity: usize) -> ReplacementResult {
    simulate(&mut Lru::default(), pages, frame_capacity)
}

pub fn optimal(pages: &[PageNo], frame_capacity: usize) -> ReplacementResult {
    simulate(&mut Optimal, pages, frame_capacity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReplacementPolicy {
    Fifo,
    Lru,
    Optimal,
}

impl ReplacementPolicy {
    pub const ALL: [ReplacementPolicy; 3] = [
        ReplacementPolicy::Fifo,
        ReplacementPolicy::Lru,
        ReplacementPolicy::Optimal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReplacementPolicy::Fifo => "FIFO",
            ReplacementPolicy::Lru => "LRU",
            ReplacementPolicy::Optimal => "Optimal",
        }
    }

    pub fn run(&self, pages: &[PageNo], frame_capacity: usize) -> ReplacementResult {
        match self {
            ReplacementPolicy::Fifo => fifo(pages, frame_capacity),
            ReplacementPolicy::Lru => lru(pages, frame_capacity),
            ReplacementPolicy::Optimal => optimal(pages, frame_capacity),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown replacement policy '{0}'")]
pub struct UnknownPolicy(pub String);

impl FromStr for ReplacementPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(ReplacementPolicy::Fifo),
            "lru" => Ok(ReplacementPolicy::Lru),
            "optimal" | "opt" => Ok(ReplacementPolicy::Optimal),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}
