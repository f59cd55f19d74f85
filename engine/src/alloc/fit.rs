use crate::alloc::result::{Allocation, AllocationResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Chooses a block for one request given the current capacities.
///
/// Implementations only pick; the caller owns the capacity vector and
/// performs the decrement.
pub trait Placement {
    fn place(&mut self, capacities: &[u64], size: u64) -> Option<usize>;
}

/// First block, scanning from 0, with enough room.
#[derive(Debug, Default)]
pub struct FirstFit;

/// Smallest block with enough room; ties go to the lowest index.
#[derive(Debug, Default)]
pub struct BestFit;

/// Largest block with enough room; ties go to the lowest index.
#[derive(Debug, Default)]
pub struct WorstFit;

/// Circular scan resuming where the previous request was served.
#[derive(Debug, Default)]
pub struct NextFit {
    cursor: usize,
}

impl NextFit {
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Placement for FirstFit {
    fn place(&mut self, capacities: &[u64], size: u64) -> Option<usize> {
        capacities.iter().position(|&cap| cap >= size)
    }
}

impl Placement for BestFit {
    fn place(&mut self, capacities: &[u64], size: u64) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, &cap) in capacities.iter().enumerate() {
            if cap < size {
                continue;
            }
            // strict < keeps the earliest minimum
            if best.is_none_or(|b| cap < capacities[b]) {
                best = Some(idx);
            }
        }
        best
    }
}

impl Placement for WorstFit {
    fn place(&mut self, capacities: &[u64], size: u64) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (idx, &cap) in capacities.iter().enumerate() {
            if cap < size {
                continue;
            }
            if worst.is_none_or(|w| cap > capacities[w]) {
                worst = Some(idx);
            }
        }
        worst
    }
}

impl Placement for NextFit {
    fn place(&mut self, capacities: &[u64], size: u64) -> Option<usize> {
        let n = capacities.len();
        if n == 0 {
            return None;
        }

        let mut idx = self.cursor % n;
        let mut last_probed = idx;
        for _ in 0..n {
            if capacities[idx] >= size {
                self.cursor = idx;
                return Some(idx);
            }
            last_probed = idx;
            idx = (idx + 1) % n;
        }

        // One full lap without a fit: park on the last block probed. The
        // classic loop increments past it and ends back on the start block.
        self.cursor = last_probed;
        None
    }
}

/// Serve `processes` in order against a private copy of `blocks`.
pub fn allocate_with<P: Placement>(placement: &mut P, blocks: &[u64], processes: &[u64]) -> AllocationResult {
    let mut capacities = blocks.to_vec();
    let mut allocation = vec![Allocation::Unallocated; processes.len()];

    for (i, &size) in processes.iter().enumerate() {
        match placement.place(&capacities, size) {
            Some(block) => {
                capacities[block] -= size;
                allocation[i] = Allocation::Allocated(block);
                debug!(process = i + 1, size, block, remaining = capacities[block], "placed");
            }
            None => debug!(process = i + 1, size, "no block fits"),
        }
    }

    AllocationResult::from_run(allocation, capacities, blocks)
}

pub fn first_fit(blocks: &[u64], processes: &[u64]) -> AllocationResult {
    allocate_with(&mut FirstFit, blocks, processes)
}

pub fn best_fit(blocks: &[u64], processes: &[u64]) -> AllocationResult {
    allocate_with(&mut BestFit, blocks, processes)
}

pub fn worst_fit(blocks: &[u64], processes: &[u64]) -> AllocationResult {
    allocate_with(&mut WorstFit, blocks, processes)
}

/// The cursor starts at block 0 on every call.
pub fn next_fit(blocks: &[u64], processes: &[u64]) -> AllocationResult {
    allocate_with(&mut NextFit::default(), blocks, processes)
}

/// The four contiguous-allocation strategies, in ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FitStrategy {
    First,
    Best,
    Worst,
    Next,
}

impl FitStrategy {
    pub const ALL: [FitStrategy; 4] = [
        FitStrategy::First,
        FitStrategy::Best,
        FitStrategy::Worst,
        FitStrategy::Next,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FitStrategy::First => "First Fit",
            FitStrategy::Best => "Best Fit",
            FitStrategy::Worst => "Worst Fit",
            FitStrategy::Next => "Next Fit",
        }
    }

    pub fn run(&self, blocks: &[u64], processes: &[u64]) -> AllocationResult {
        match self {
            FitStrategy::First => first_fit(blocks, processes),
            FitStrategy::Best => best_fit(blocks, processes),
            FitStrategy::Worst => worst_fit(blocks, processes),
            FitStrategy::Next => next_fit(blocks, processes),
        }
    }
}

impl fmt::Display for FitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}'")]
pub struct UnknownStrategy(pub String);

impl FromStr for FitStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first-fit" | "ff" => Ok(FitStrategy::First),
            "best" | "best-fit" | "bf" => Ok(FitStrategy::Best),
            "worst" | "worst-fit" | "wf" => Ok(FitStrategy::Worst),
            "next" | "next-fit" | "nf" => Ok(FitStrategy::Next),
            other => Err(UnknownStrategy(other.to_string())),
        }
    }
}
