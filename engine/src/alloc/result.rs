use serde::Serialize;

/// Where a single process request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "block", rename_all = "snake_case")]
pub enum Allocation {
    /// Index into the block list.
    Allocated(usize),
    Unallocated,
}

impl Allocation {
    pub fn block(&self) -> Option<usize> {
        match self {
            Allocation::Allocated(idx) => Some(*idx),
            Allocation::Unallocated => None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        matches!(self, Allocation::Allocated(_))
    }
}

/// Outcome of one contiguous-allocation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// One entry per process, in request order.
    pub allocation: Vec<Allocation>,
    /// Leftover capacity per block after the run.
    pub remaining_blocks: Vec<u64>,
    pub allocated_count: usize,
    /// Sum of `remaining_blocks`.
    pub total_wastage: u64,
    /// Percentage of the original memory handed out, in `[0, 100]`.
    pub utilization: f64,
}

impl AllocationResult {
    /// Build the metrics for a finished run.
    ///
    /// `original` is the untouched block list; zero total memory yields a
    /// utilization of 0 rather than NaN.
    pub fn from_run(allocation: Vec<Allocation>, remaining_blocks: Vec<u64>, original: &[u64]) -> Self {
        let allocated_count = allocation.iter().filter(|a| a.is_allocated()).count();
        let total_wastage: u64 = remaining_blocks.iter().sum();
        let total_memory: u64 = original.iter().sum();
        let utilization = if total_memory == 0 {
            0.0
        } else {
            total_memory.saturating_sub(total_wastage) as f64 / total_memory as f64 * 100.0
        };

        AllocationResult {
            allocation,
            remaining_blocks,
            allocated_count,
            total_wastage,
            utilization,
        }
    }

    /// Ranking score: allocated processes first, utilization as tie breaker.
    pub fn score(&self) -> f64 {
        self.allocated_count as f64 + self.utilization / 100.0
    }

    /// Total size assigned to each block, indexed like `remaining_blocks`.
    pub fn assigned_per_block(&self, processes: &[u64]) -> Vec<u64> {
        let mut assigned = vec![0u64; self.remaining_blocks.len()];
        for (alloc, &size) in self.allocation.iter().zip(processes) {
            if let Some(block) = alloc.block() {
                assigned[block] += size;
            }
        }
        assigned
    }
}
