use crate::alloc::compare::Comparison;
use crate::alloc::fit::FitStrategy;
use crate::alloc::result::{Allocation, AllocationResult};
use crate::paging::session::{MemorySession, Translation};
use crate::replace::policy::ReplacementPolicy;
use crate::replace::trace::ReplacementResult;
use std::fmt::Write;

pub fn allocation(strategy: FitStrategy, result: &AllocationResult, blocks: &[u64], processes: &[u64]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", strategy);
    for (i, (alloc, size)) in result.allocation.iter().zip(processes).enumerate() {
        match alloc {
            Allocation::Allocated(block) => {
                let _ = writeln!(out, "  P{:<3} {:>6} KB -> block {} ({} KB)", i + 1, size, block + 1, blocks[*block]);
            }
            Allocation::Unallocated => {
                let _ = writeln!(out, "  P{:<3} {:>6} KB -> not allocated", i + 1, size);
            }
        }
    }
    let remaining: Vec<String> = result.remaining_blocks.iter().map(u64::to_string).collect();
    let _ = writeln!(out, "  remaining:   [{}]", remaining.join(", "));
    let _ = writeln!(
        out,
        "  allocated {}/{}, wastage {} KB, utilization {:.2}%",
        result.allocated_count,
        processes.len(),
        result.total_wastage,
        result.utilization
    );
    out
}

pub fn comparison(cmp: &Comparison, blocks: &[u64], processes: &[u64]) -> String {
    let mut out = String::new();
    for strategy in FitStrategy::ALL {
        out.push_str(&allocation(strategy, cmp.get(strategy), blocks, processes));
    }
    match cmp.best_algorithm {
        Some(best) => {
            let _ = writeln!(out, "best: {}", best);
        }
        None => out.push_str("best: n/a\n"),
    }
    out
}

pub fn replacement(policy: ReplacementPolicy, result: &ReplacementResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", policy);
    for step in &result.steps {
        let frames: Vec<String> = step.frames.iter().map(|p| p.to_string()).collect();
        let _ = writeln!(
            out,
            "  {:>3}  page {:>3}  [{}]  {}",
            step.step,
            step.page,
            frames.join(" "),
            if step.fault { "fault" } else { "hit" }
        );
    }
    let _ = writeln!(
        out,
        "  faults {}, hits {}, hit rate {:.2}%",
        result.page_faults, result.page_hits, result.hit_rate
    );
    out
}

pub fn session(session: &MemorySession) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "memory {} KB, frame size {} KB, {} frames ({} used, {:.1}%)",
        session.total_memory(),
        session.frame_size(),
        session.frames().len(),
        session.used_frames(),
        session.frame_utilization()
    );
    for (idx, owner) in session.frames().iter().enumerate() {
        match owner {
            Some(owner) => {
                let _ = writeln!(out, "  frame {:>3}: {} page {}", idx, owner.process, owner.page);
            }
            None => {
                let _ = writeln!(out, "  frame {:>3}: free", idx);
            }
        }
    }
    for process in session.processes() {
        let entries: Vec<String> = process
            .page_table
            .iter()
            .map(|e| format!("{}->{}", e.page, e.frame))
            .collect();
        let _ = writeln!(out, "  {} ({} KB): {}", process.name, process.size, entries.join(", "));
    }
    out
}

pub fn translation(t: &Translation) -> String {
    format!(
        "{}: logical {} = page {} offset {} -> frame {} -> physical {}\n",
        t.process, t.logical, t.page, t.offset, t.frame, t.physical
    )
}
