use memsim_engine::alloc::fit::FitStrategy;
use memsim_engine::cli::commands::{Command, Outcome, ShellState, parse_command};
use memsim_engine::cli::utils::{parse_list, parse_sizes};
use memsim_engine::config::SimConfig;
use memsim_engine::paging::selector::FirstFreeSelector;
use memsim_engine::replace::policy::ReplacementPolicy;
use std::fs;
use std::io::Write;

fn state() -> ShellState {
    ShellState::with_selector(SimConfig::default(), Box::new(FirstFreeSelector)).unwrap()
}

fn run(state: &mut ShellState, line: &str) -> String {
    match state.run_line(line).unwrap() {
        Outcome::Continue(out) => out,
        Outcome::Exit => panic!("unexpected exit"),
    }
}

#[test]
fn test_parse_list_drops_invalid_entries() {
    assert_eq!(parse_list::<u32>("7, 0,1 ,x,,2"), vec![7, 0, 1, 2]);
    assert_eq!(parse_sizes("100,-5,0,abc,200"), vec![100, 200]);
    assert!(parse_list::<u32>("").is_empty());
}

#[test]
fn test_parse_commands() {
    assert_eq!(parse_command("blocks 100, 200,300").unwrap(), Command::Blocks(vec![100, 200, 300]));
    assert_eq!(parse_command("blocks 100 200 300").unwrap(), Command::Blocks(vec![100, 200, 300]));
    assert_eq!(parse_command("processes 10, 20 30").unwrap(), Command::Processes(vec![10, 20, 30]));
    assert_eq!(parse_command("pages 7 0 1").unwrap(), Command::Pages(vec![7, 0, 1]));
    assert_eq!(parse_command("fit best").unwrap(), Command::Fit(Some(FitStrategy::Best)));
    assert_eq!(parse_command("fit").unwrap(), Command::Fit(None));
    assert_eq!(parse_command("replace lru").unwrap(), Command::Replace(Some(ReplacementPolicy::Lru)));
    assert_eq!(
        parse_command("mem init 2000 200").unwrap(),
        Command::MemInit {
            total_memory: 2000,
            frame_size: 200
        }
    );
    assert_eq!(parse_command("EXIT").unwrap(), Command::Exit);

    assert!(parse_command("frames 0").is_err());
    assert!(parse_command("blocks x,y").is_err());
    assert!(parse_command("fit fastest").is_err());
    assert!(parse_command("mem alloc P1").is_err());
    assert!(parse_command("dance").is_err());
}

#[test]
fn test_fit_all_reports_best() {
    let mut s = state();
    let out = run(&mut s, "fit");
    assert!(out.contains("best: Best Fit"));
    assert!(out.contains("First Fit"));
    assert!(out.contains("Next Fit"));
}

#[test]
fn test_replace_uses_configured_inputs() {
    let mut s = state();
    run(&mut s, "pages 1,2,3,1,2,3");
    run(&mut s, "frames 3");
    let out = run(&mut s, "replace fifo");
    assert!(out.contains("faults 3, hits 3"));
}

#[test]
fn test_paging_session_through_shell() {
    let mut s = state();
    let out = run(&mut s, "mem alloc P1 250");
    assert!(out.contains("P1 allocated with 3 pages"));

    let out = run(&mut s, "mem translate 120");
    assert!(out.contains("physical 120"));

    assert!(s.run_line("mem alloc P1 10").is_err());
    assert!(s.run_line("mem translate 999").is_err());

    run(&mut s, "mem free P1");
    assert_eq!(s.session.used_frames(), 0);
    assert!(run(&mut s, "mem free P1").contains("not allocated"));
}

#[test]
fn test_mem_init_replaces_session() {
    let mut s = state();
    run(&mut s, "mem alloc P1 100");
    let out = run(&mut s, "mem init 500 50");
    assert!(out.contains("10 frames created"));
    assert!(s.session.processes().is_empty());
    assert!(s.run_line("mem init 500 0").is_err());
}

#[test]
fn test_export_trace_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    let mut s = state();

    assert!(s.run_line(&format!("export trace {}", path.display())).is_err());

    run(&mut s, "pages 1,2,1");
    run(&mut s, "frames 2");
    run(&mut s, "replace fifo");
    run(&mut s, &format!("export trace {}", path.display()));

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "step,page,fault,frame0,frame1");
    assert_eq!(lines[1], "1,1,true,1,");
    assert_eq!(lines[3], "3,1,false,1,2");
}

#[test]
fn test_export_fit_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fit.csv");
    let mut s = state();
    run(&mut s, "fit first");
    run(&mut s, &format!("export fit {}", path.display()));

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "process,size,block");
    assert_eq!(lines[1], "P1,212,1");
    assert_eq!(lines[4], "P4,426,");
}

#[test]
fn test_exit() {
    let mut s = state();
    assert!(matches!(s.run_line("quit").unwrap(), Outcome::Exit));
}

#[test]
fn test_config_load_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"frame_capacity": 4, "blocks": [10, 20], "placement_seed": 9}}"#).unwrap();

    let config = SimConfig::load(file.path()).unwrap();
    assert_eq!(config.frame_capacity, 4);
    assert_eq!(config.blocks, vec![10, 20]);
    assert_eq!(config.placement_seed, Some(9));
    assert_eq!(config.processes, SimConfig::default().processes);
    assert_eq!(config.frame_size, 100);
}

#[test]
fn test_config_rejects_zero_frames() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"frame_capacity": 0}}"#).unwrap();
    assert!(SimConfig::load(file.path()).is_err());
    assert!(SimConfig::load("/definitely/not/here.json").is_err());
}

#[test]
fn test_export_trace_keeps_capacity_of_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.csv");
    let mut s = state();

    run(&mut s, "pages 1,2,3");
    run(&mut s, "frames 2");
    run(&mut s, "replace lru");
    run(&mut s, "frames 4");
    let out = run(&mut s, &format!("export trace {}", path.display()));
    assert!(out.starts_with("LRU trace"));

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "step,page,fault,frame0,frame1");
    assert_eq!(lines[3], "3,3,true,3,2");
}

#[test]
fn test_export_fit_keeps_processes_of_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fit.csv");
    let mut s = state();

    run(&mut s, "fit best");
    run(&mut s, "processes 1,2");
    let out = run(&mut s, &format!("export fit {}", path.display()));
    assert!(out.starts_with("Best Fit allocation"));

    let csv = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[1], "P1,212,3");
    assert_eq!(lines[4], "P4,426,4");
}
