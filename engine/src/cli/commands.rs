use crate::alloc::compare::run_all;
use crate::alloc::fit::FitStrategy;
use crate::alloc::result::AllocationResult;
use crate::cli::render;
use crate::cli::utils::{export_allocation_csv, export_trace_csv, parse_list, parse_sizes};
use crate::config::SimConfig;
use crate::paging::selector::{FrameSelector, RandomSelector};
use crate::paging::session::MemorySession;
use crate::replace::policy::ReplacementPolicy;
use crate::replace::trace::{PageNo, ReplacementResult};
use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  blocks <n,n,...>            set memory block sizes
  processes <n,n,...>         set process sizes
  fit [first|best|worst|next] run one strategy, or all four and rank them
  pages <n,n,...>             set the page reference string
  frames <n>                  set the frame count
  replace [fifo|lru|optimal]  run one policy, or all three
  mem init <total> <frame>    initialize paged memory
  mem alloc <name> <size>     allocate a process
  mem free <name>             deallocate a process
  mem translate <address>     translate a logical address
  mem show                    show frames and page tables
  mem reset                   free everything, keep the geometry
  export trace <path>         write the last replacement trace as CSV
  export fit <path>           write the last allocation mapping as CSV
  show                        print current inputs
  help | exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Show,
    Blocks(Vec<u64>),
    Processes(Vec<u64>),
    Fit(Option<FitStrategy>),
    Pages(Vec<PageNo>),
    Frames(usize),
    Replace(Option<ReplacementPolicy>),
    MemInit { total_memory: u64, frame_size: u64 },
    MemAlloc { name: String, size: u64 },
    MemFree(String),
    MemTranslate(u64),
    MemShow,
    MemReset,
    ExportTrace(PathBuf),
    ExportFit(PathBuf),
}

fn number<T: std::str::FromStr>(arg: Option<&str>, what: &str) -> Result<T> {
    let raw = arg.ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse().map_err(|_| anyhow!("invalid {}: '{}'", what, raw))
}

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("").to_ascii_lowercase();
    let rest: Vec<&str> = parts.collect();
    // "1,2,3", "1, 2, 3" and "1 2 3" are all the same list
    let joined = rest.join(",");

    let cmd = match head.as_str() {
        "help" | "?" => Command::Help,
        "exit" | "quit" => Command::Exit,
        "show" => Command::Show,
        "blocks" => {
            let blocks = parse_sizes(&joined);
            if blocks.is_empty() {
                bail!("no valid block sizes");
            }
            Command::Blocks(blocks)
        }
        "processes" => {
            let processes = parse_sizes(&joined);
            if processes.is_empty() {
                bail!("no valid process sizes");
            }
            Command::Processes(processes)
        }
        "fit" => match rest.first() {
            None | Some(&"all") => Command::Fit(None),
            Some(s) => Command::Fit(Some(s.parse()?)),
        },
        "pages" => {
            let pages = parse_list::<PageNo>(&joined);
            if pages.is_empty() {
                bail!("no valid page numbers");
            }
            Command::Pages(pages)
        }
        "frames" => {
            let n: usize = number(rest.first().copied(), "frame count")?;
            if n == 0 {
                bail!("frame count must be at least 1");
            }
            Command::Frames(n)
        }
        "replace" => match rest.first() {
            None | Some(&"all") => Command::Replace(None),
            Some(s) => Command::Replace(Some(s.parse()?)),
        },
        "mem" => parse_mem(&rest)?,
        "export" => {
            let path = rest.get(1).map(PathBuf::from).ok_or_else(|| anyhow!("missing export path"))?;
            match rest.first().copied() {
                Some("trace") => Command::ExportTrace(path),
                Some("fit") => Command::ExportFit(path),
                _ => bail!("export what? (trace|fit)"),
            }
        }
        "" => bail!("empty command"),
        other => bail!("unknown command '{}'", other),
    };
    Ok(cmd)
}

fn parse_mem(args: &[&str]) -> Result<Command> {
    let cmd = match args.first().copied() {
        Some("init") => Command::MemInit {
            total_memory: number(args.get(1).copied(), "total memory")?,
            frame_size: number(args.get(2).copied(), "frame size")?,
        },
        Some("alloc") => Command::MemAlloc {
            name: args.get(1).ok_or_else(|| anyhow!("missing process name"))?.to_string(),
            size: number(args.get(2).copied(), "process size")?,
        },
        Some("free") => Command::MemFree(args.get(1).ok_or_else(|| anyhow!("missing process name"))?.to_string()),
        Some("translate") => Command::MemTranslate(number(args.get(1).copied(), "logical address")?),
        Some("show") | None => Command::MemShow,
        Some("reset") => Command::MemReset,
        Some(other) => bail!("unknown mem subcommand '{}'", other),
    };
    Ok(cmd)
}

pub enum Outcome {
    Continue(String),
    Exit,
}

/// A replacement run together with the inputs it was produced from.
pub struct TraceRun {
    pub policy: ReplacementPolicy,
    pub capacity: usize,
    pub result: ReplacementResult,
}

/// An allocation run together with the inputs it was produced from.
pub struct FitRun {
    pub strategy: FitStrategy,
    pub processes: Vec<u64>,
    pub result: AllocationResult,
}

/// Everything the shell remembers between commands.
pub struct ShellState {
    pub config: SimConfig,
    pub session: MemorySession,
    selector: Box<dyn FrameSelector>,
    last_fit: Option<FitRun>,
    last_trace: Option<TraceRun>,
}

impl ShellState {
    pub fn new(config: SimConfig) -> Result<Self> {
        let selector: Box<dyn FrameSelector> = match config.placement_seed {
            Some(seed) => Box::new(RandomSelector::seeded(seed)),
            None => Box::new(RandomSelector::new()),
        };
        Self::with_selector(config, selector)
    }

    pub fn with_selector(config: SimConfig, selector: Box<dyn FrameSelector>) -> Result<Self> {
        let session = MemorySession::initialize(config.total_memory, config.frame_size)?;
        Ok(ShellState {
            config,
            session,
            selector,
            last_fit: None,
            last_trace: None,
        })
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Outcome> {
        let out = match cmd {
            Command::Exit => return Ok(Outcome::Exit),
            Command::Help => format!("{}\n", HELP),
            Command::Show => format!(
                "blocks: {:?}\nprocesses: {:?}\npages: {:?}\nframes: {}\n",
                self.config.blocks, self.config.processes, self.config.reference_string, self.config.frame_capacity
            ),
            Command::Blocks(blocks) => {
                self.config.blocks = blocks;
                format!("{} blocks set\n", self.config.blocks.len())
            }
            Command::Processes(processes) => {
                self.config.processes = processes;
                format!("{} processes set\n", self.config.processes.len())
            }
            Command::Fit(Some(strategy)) => {
                let result = strategy.run(&self.config.blocks, &self.config.processes);
                let out = render::allocation(strategy, &result, &self.config.blocks, &self.config.processes);
                self.last_fit = Some(FitRun {
                    strategy,
                    processes: self.config.processes.clone(),
                    result,
                });
                out
            }
            Command::Fit(None) => {
                let cmp = run_all(&self.config.blocks, &self.config.processes);
                let out = render::comparison(&cmp, &self.config.blocks, &self.config.processes);
                let best = cmp.best_algorithm.unwrap_or(FitStrategy::First);
                self.last_fit = Some(FitRun {
                    strategy: best,
                    processes: self.config.processes.clone(),
                    result: cmp.get(best).clone(),
                });
                out
            }
            Command::Pages(pages) => {
                self.config.reference_string = pages;
                format!("{} references set\n", self.config.reference_string.len())
            }
            Command::Frames(n) => {
                self.config.frame_capacity = n;
                format!("{} frames\n", n)
            }
            Command::Replace(policy) => {
                let policies = match policy {
                    Some(p) => vec![p],
                    None => ReplacementPolicy::ALL.to_vec(),
                };
                let mut out = String::new();
                let capacity = self.config.frame_capacity;
                for policy in policies {
                    let result = policy.run(&self.config.reference_string, capacity);
                    out.push_str(&render::replacement(policy, &result));
                    self.last_trace = Some(TraceRun {
                        policy,
                        capacity,
                        result,
                    });
                }
                out
            }
            Command::MemInit {
                total_memory,
                frame_size,
            } => {
                self.session = MemorySession::initialize(total_memory, frame_size)?;
                self.config.total_memory = total_memory;
                self.config.frame_size = frame_size;
                format!("{} frames created\n", self.session.frames().len())
            }
            Command::MemAlloc { name, size } => {
                self.session = self.session.allocate(&name, size, self.selector.as_mut())?;
                format!("{} allocated with {} pages\n", name, self.session.pages_for(size))
            }
            Command::MemFree(name) => {
                if self.session.process(&name).is_none() {
                    format!("{} is not allocated\n", name)
                } else {
                    self.session = self.session.deallocate(&name);
                    format!("{} removed from memory\n", name)
                }
            }
            Command::MemTranslate(addr) => render::translation(&self.session.translate(addr)?),
            Command::MemShow => render::session(&self.session),
            Command::MemReset => {
                self.session = self.session.reset();
                "all memory cleared\n".to_string()
            }
            Command::ExportTrace(path) => {
                let run = self.last_trace.as_ref().ok_or_else(|| anyhow!("no replacement run yet"))?;
                export_trace_csv(&run.result, run.capacity, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                format!("{} trace written to {}\n", run.policy, path.display())
            }
            Command::ExportFit(path) => {
                let run = self.last_fit.as_ref().ok_or_else(|| anyhow!("no allocation run yet"))?;
                export_allocation_csv(&run.result, &run.processes, &path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                format!("{} allocation written to {}\n", run.strategy, path.display())
            }
        };
        Ok(Outcome::Continue(out))
    }

    /// Parse and run one input line.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome> {
        let cmd = parse_command(line)?;
        self.execute(cmd)
    }
}
