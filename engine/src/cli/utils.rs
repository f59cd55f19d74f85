use crate::alloc::result::AllocationResult;
use crate::replace::trace::ReplacementResult;
use anyhow::Result;
use csv::WriterBuilder;
use std::path::Path;
use std::str::FromStr;

/// Split a comma-separated list, dropping entries that do not parse.
pub fn parse_list<T: FromStr>(input: &str) -> Vec<T> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Like [`parse_list`] but also drops zeros, for size lists.
pub fn parse_sizes(input: &str) -> Vec<u64> {
    parse_list::<u64>(input).into_iter().filter(|&n| n > 0).collect()
}

/// One row per reference: step, page, fault flag, then one column per frame.
pub fn export_trace_csv<P: AsRef<Path>>(result: &ReplacementResult, capacity: usize, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let mut headers = vec!["step".to_string(), "page".to_string(), "fault".to_string()];
    headers.extend((0..capacity).map(|i| format!("frame{}", i)));
    wtr.write_record(&headers)?;

    for step in &result.steps {
        let mut row = vec![step.step.to_string(), step.page.to_string(), step.fault.to_string()];
        for slot in 0..capacity {
            row.push(step.frames.get(slot).map(|p| p.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// One row per process: name, size and assigned block (empty if none).
pub fn export_allocation_csv<P: AsRef<Path>>(result: &AllocationResult, processes: &[u64], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["process", "size", "block"])?;

    for (i, (alloc, size)) in result.allocation.iter().zip(processes).enumerate() {
        let block = alloc.block().map(|b| b.to_string()).unwrap_or_default();
        wtr.write_record([format!("P{}", i + 1), size.to_string(), block])?;
    }

    wtr.flush()?;
    Ok(())
}
