use memsim_engine::alloc::compare::{compare_results, run_all};
use memsim_engine::alloc::fit::{FitStrategy, NextFit, Placement, best_fit, first_fit, next_fit, worst_fit};
use memsim_engine::alloc::result::{Allocation, AllocationResult};

use Allocation::{Allocated, Unallocated};

const BLOCKS: [u64; 5] = [100, 500, 200, 300, 600];
const PROCESSES: [u64; 4] = [212, 417, 112, 426];

fn assert_conserved(result: &AllocationResult, blocks: &[u64], processes: &[u64]) {
    let assigned: u64 = result
        .allocation
        .iter()
        .zip(processes)
        .filter(|(a, _)| a.is_allocated())
        .map(|(_, s)| *s)
        .sum();
    let remaining: u64 = result.remaining_blocks.iter().sum();
    assert_eq!(remaining + assigned, blocks.iter().sum::<u64>());

    for (block, assigned) in result.assigned_per_block(processes).iter().enumerate() {
        assert!(*assigned <= blocks[block], "block {} over-allocated", block);
        assert_eq!(result.remaining_blocks[block], blocks[block] - assigned);
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
}

#[test]
fn test_first_fit_reference_input() {
    let r = first_fit(&BLOCKS, &PROCESSES);
    assert_eq!(r.allocation, vec![Allocated(1), Allocated(4), Allocated(1), Unallocated]);
    assert_eq!(r.remaining_blocks, vec![100, 176, 200, 300, 183]);
    assert_eq!(r.allocated_count, 3);
    assert_eq!(r.total_wastage, 959);
    assert_close(r.utilization, 741.0 / 1700.0 * 100.0);
    assert_conserved(&r, &BLOCKS, &PROCESSES);
}

#[test]
fn test_best_fit_reference_input() {
    let r = best_fit(&BLOCKS, &PROCESSES);
    assert_eq!(r.allocation, vec![Allocated(3), Allocated(1), Allocated(2), Allocated(4)]);
    assert_eq!(r.remaining_blocks, vec![100, 83, 88, 88, 174]);
    assert_eq!(r.allocated_count, 4);
    assert_eq!(r.total_wastage, 533);
    assert_close(r.utilization, 1167.0 / 1700.0 * 100.0);
    assert_conserved(&r, &BLOCKS, &PROCESSES);
}

#[test]
fn test_worst_fit_reference_input() {
    let r = worst_fit(&BLOCKS, &PROCESSES);
    assert_eq!(r.allocation, vec![Allocated(4), Allocated(1), Allocated(4), Unallocated]);
    assert_eq!(r.remaining_blocks, vec![100, 83, 200, 300, 276]);
    assert_eq!(r.allocated_count, 3);
    assert_eq!(r.total_wastage, 959);
    assert_conserved(&r, &BLOCKS, &PROCESSES);
}

#[test]
fn test_next_fit_reference_input() {
    let r = next_fit(&BLOCKS, &PROCESSES);
    assert_eq!(r.allocation, vec![Allocated(1), Allocated(4), Allocated(4), Unallocated]);
    assert_eq!(r.remaining_blocks, vec![100, 288, 200, 300, 71]);
    assert_eq!(r.allocated_count, 3);
    assert_eq!(r.total_wastage, 959);
    assert_conserved(&r, &BLOCKS, &PROCESSES);
}

#[test]
fn test_next_fit_cursor_after_failed_lap() {
    // 200 fits nowhere; the cursor stays on the last block probed (2),
    // so 40 lands in block 2 rather than block 0.
    let r = next_fit(&[50, 10, 100], &[200, 40]);
    assert_eq!(r.allocation, vec![Unallocated, Allocated(2)]);

    let mut nf = NextFit::default();
    assert_eq!(nf.place(&[50, 10, 100], 200), None);
    assert_eq!(nf.cursor(), 2);

    // The classic loop would return to block 1 after the failed lap and
    // serve 5 from there; parking on the last probe serves it from block 0.
    let r = next_fit(&[10, 50, 30], &[40, 100, 5]);
    assert_eq!(r.allocation, vec![Allocated(1), Unallocated, Allocated(0)]);
    assert_eq!(r.remaining_blocks, vec![5, 10, 30]);
}

#[test]
fn test_next_fit_resumes_from_serving_block() {
    let mut nf = NextFit::default();
    let caps = [300, 300, 300];
    assert_eq!(nf.place(&caps, 100), Some(0));
    assert_eq!(nf.place(&[10, 300, 300], 100), Some(1));
    assert_eq!(nf.cursor(), 1);
    // wraps around past the end
    assert_eq!(nf.place(&[300, 10, 10], 100), Some(0));
}

#[test]
fn test_next_fit_cursor_resets_per_run() {
    let a = next_fit(&[100, 100], &[60, 60]);
    let b = next_fit(&[100, 100], &[60, 60]);
    assert_eq!(a.allocation, vec![Allocated(0), Allocated(1)]);
    assert_eq!(a, b);
}

#[test]
fn test_best_and_worst_fit_ties_pick_lowest_index() {
    let blocks = [300, 200, 200, 300];
    assert_eq!(best_fit(&blocks, &[150]).allocation, vec![Allocated(1)]);
    assert_eq!(worst_fit(&blocks, &[150]).allocation, vec![Allocated(0)]);
}

#[test]
fn test_input_blocks_are_not_modified() {
    let blocks = BLOCKS.to_vec();
    for strategy in FitStrategy::ALL {
        let _ = strategy.run(&blocks, &PROCESSES);
    }
    assert_eq!(blocks, BLOCKS.to_vec());
}

#[test]
fn test_empty_processes() {
    for strategy in FitStrategy::ALL {
        let r = strategy.run(&BLOCKS, &[]);
        assert!(r.allocation.is_empty());
        assert_eq!(r.remaining_blocks, BLOCKS.to_vec());
        assert_eq!(r.allocated_count, 0);
        assert_eq!(r.total_wastage, 1700);
        assert_eq!(r.utilization, 0.0);
    }
}

#[test]
fn test_empty_blocks() {
    for strategy in FitStrategy::ALL {
        let r = strategy.run(&[], &PROCESSES);
        assert_eq!(r.allocation, vec![Unallocated; 4]);
        assert!(r.remaining_blocks.is_empty());
        assert_eq!(r.allocated_count, 0);
        assert_eq!(r.total_wastage, 0);
        assert_eq!(r.utilization, 0.0);
        assert!(!r.utilization.is_nan());
    }
}

#[test]
fn test_exact_fit_gives_full_utilization() {
    // first fit splits the big block and strands the second request
    let r = first_fit(&[100, 50], &[50, 100]);
    assert_eq!(r.allocation, vec![Allocated(0), Unallocated]);
    assert_eq!(r.remaining_blocks, vec![50, 50]);
    let r = best_fit(&[100, 50], &[50, 100]);
    assert_eq!(r.allocation, vec![Allocated(1), Allocated(0)]);
    assert_eq!(r.total_wastage, 0);
    assert_close(r.utilization, 100.0);
}

#[test]
fn test_compare_picks_best_fit_on_reference_input() {
    let cmp = run_all(&BLOCKS, &PROCESSES);
    assert_eq!(cmp.best_algorithm, Some(FitStrategy::Best));
    assert_eq!(cmp.get(FitStrategy::Best).allocated_count, 4);
}

#[test]
fn test_compare_ties_go_to_first_in_order() {
    let cmp = run_all(&[100], &[50]);
    assert_eq!(cmp.best_algorithm, Some(FitStrategy::First));

    let r = first_fit(&[100], &[50]);
    assert_eq!(compare_results(None, Some(&r), Some(&r), None), Some(FitStrategy::Best));
    assert_eq!(compare_results(None, None, None, Some(&r)), Some(FitStrategy::Next));
}

#[test]
fn test_compare_skips_results_not_run() {
    assert_eq!(compare_results(None, None, None, None), None);

    let ff = first_fit(&BLOCKS, &PROCESSES);
    let wf = worst_fit(&BLOCKS, &PROCESSES);
    let nf = next_fit(&BLOCKS, &PROCESSES);
    assert_eq!(compare_results(Some(&ff), None, Some(&wf), Some(&nf)), Some(FitStrategy::First));
}

#[test]
fn test_strategy_names_and_parsing() {
    assert_eq!(FitStrategy::Worst.to_string(), "Worst Fit");
    assert_eq!("best".parse::<FitStrategy>(), Ok(FitStrategy::Best));
    assert_eq!("NF".parse::<FitStrategy>(), Ok(FitStrategy::Next));
    let err = "fastest".parse::<FitStrategy>().unwrap_err();
    assert_eq!(err.to_string(), "unknown strategy 'fastest'");
    let err: anyhow::Error = err.into();
    assert!(err.to_string().contains("fastest"));
}

#[test]
fn test_result_serializes_with_explicit_allocation_state() {
    let r = first_fit(&[100], &[50, 80]);
    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["allocatedCount"], 1);
    assert_eq!(json["allocation"][0]["state"], "allocated");
    assert_eq!(json["allocation"][0]["block"], 0);
    assert_eq!(json["allocation"][1]["state"], "unallocated");
}
