use crate::paging::error::PagingError;
use crate::paging::frame::{FrameOwner, FrameTable};
use crate::paging::selector::FrameSelector;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Number of distinct palette slots handed out to processes.
pub const PALETTE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageTableEntry {
    pub page: usize,
    pub frame: usize,
}

/// A process resident under paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedProcess {
    pub name: String,
    pub size: u64,
    /// Renderer-side colour index, `0..PALETTE_SIZE`.
    pub palette_slot: usize,
    pub page_table: Vec<PageTableEntry>,
}

impl PagedProcess {
    pub fn frame_of(&self, page: usize) -> Option<usize> {
        self.page_table
            .iter()
            .find(|entry| entry.page == page)
            .map(|entry| entry.frame)
    }
}

/// Successful logical-to-physical translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Translation {
    pub process: String,
    pub logical: u64,
    pub page: usize,
    pub offset: u64,
    pub frame: usize,
    pub physical: u64,
}

/// State transitions accepted by [`MemorySession::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Initialize { total_memory: u64, frame_size: u64 },
    Allocate { name: String, size: u64 },
    Deallocate { name: String },
}

/// Owned paging state: frame geometry, frame array and the processes in
/// allocation order.
///
/// Every mutating operation takes `&self` and returns a fresh session, so a
/// failed operation leaves the caller's value exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySession {
    total_memory: u64,
    frame_size: u64,
    frames: FrameTable,
    processes: Vec<PagedProcess>,
}

impl MemorySession {
    /// All-free memory of `total_memory / frame_size` frames.
    pub fn initialize(total_memory: u64, frame_size: u64) -> Result<Self, PagingError> {
        if frame_size == 0 {
            return Err(PagingError::InvalidFrameSize);
        }
        let frame_count = (total_memory / frame_size) as usize;
        info!(total_memory, frame_size, frame_count, "memory initialized");
        Ok(MemorySession {
            total_memory,
            frame_size,
            frames: FrameTable::new(frame_count),
            processes: Vec::new(),
        })
    }

    pub fn apply(&self, op: Operation, selector: &mut dyn FrameSelector) -> Result<Self, PagingError> {
        match op {
            Operation::Initialize {
                total_memory,
                frame_size,
            } => Self::initialize(total_memory, frame_size),
            Operation::Allocate { name, size } => self.allocate(&name, size, selector),
            Operation::Deallocate { name } => Ok(self.deallocate(&name)),
        }
    }

    /// Same geometry, nothing allocated.
    pub fn reset(&self) -> Self {
        MemorySession {
            total_memory: self.total_memory,
            frame_size: self.frame_size,
            frames: FrameTable::new(self.frames.len()),
            processes: Vec::new(),
        }
    }

    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }

    pub fn frame_size(&self) -> u64 {
        self.frame_size
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn processes(&self) -> &[PagedProcess] {
        &self.processes
    }

    /// Lookup by name; surrounding whitespace is ignored as in `allocate`.
    pub fn process(&self, name: &str) -> Option<&PagedProcess> {
        let name = name.trim();
        self.processes.iter().find(|p| p.name == name)
    }

    pub fn used_frames(&self) -> usize {
        self.frames.used_count()
    }

    pub fn free_frames(&self) -> usize {
        self.frames.len() - self.used_frames()
    }

    /// Occupied frames as a percentage; 0 when there are no frames.
    pub fn frame_utilization(&self) -> f64 {
        if self.frames.is_empty() {
            return 0.0;
        }
        self.used_frames() as f64 / self.frames.len() as f64 * 100.0
    }

    /// Pages needed to hold `size` units.
    pub fn pages_for(&self, size: u64) -> usize {
        size.div_ceil(self.frame_size) as usize
    }

    /// Place a new process in `ceil(size / frame_size)` free frames chosen
    /// by `selector`.
    pub fn allocate(&self, name: &str, size: u64, selector: &mut dyn FrameSelector) -> Result<Self, PagingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PagingError::InvalidProcessName);
        }
        if size == 0 {
            return Err(PagingError::EmptyProcess(name.to_string()));
        }
        if self.process(name).is_some() {
            warn!(process = name, "duplicate process name");
            return Err(PagingError::DuplicateProcess(name.to_string()));
        }

        let needed = self.pages_for(size);
        let free = self.frames.free_frames();
        if free.len() < needed {
            warn!(process = name, needed, available = free.len(), "not enough free frames");
            return Err(PagingError::InsufficientFrames {
                needed,
                available: free.len(),
            });
        }

        let chosen = selector.select(&free, needed);
        validate_selection(&free, needed, &chosen)?;

        let mut next = self.clone();
        let mut page_table = Vec::with_capacity(needed);
        for (page, &frame) in chosen.iter().enumerate() {
            next.frames.occupy(
                frame,
                FrameOwner {
                    process: name.to_string(),
                    page,
                },
            );
            page_table.push(PageTableEntry { page, frame });
            debug!(process = name, page, frame, "page mapped");
        }
        next.processes.push(PagedProcess {
            name: name.to_string(),
            size,
            palette_slot: self.processes.len() % PALETTE_SIZE,
            page_table,
        });

        info!(process = name, size, pages = needed, "process allocated");
        Ok(next)
    }

    /// Release every frame of `name` and drop its page table. Unknown names
    /// leave the session as it is.
    pub fn deallocate(&self, name: &str) -> Self {
        let name = name.trim();
        let Some(pos) = self.processes.iter().position(|p| p.name == name) else {
            debug!(process = name, "deallocate of unknown process ignored");
            return self.clone();
        };

        let mut next = self.clone();
        let process = next.processes.remove(pos);
        for entry in &process.page_table {
            next.frames.release(entry.frame);
        }
        info!(process = name, frames = process.page_table.len(), "process deallocated");
        next
    }

    /// Map a logical address, with processes laid out back to back in
    /// allocation order, to its physical address.
    pub fn translate(&self, logical: u64) -> Result<Translation, PagingError> {
        let mut base = 0u64;
        for process in &self.processes {
            if logical < base + process.size {
                let relative = logical - base;
                let page = (relative / self.frame_size) as usize;
                let offset = relative % self.frame_size;
                let frame = process
                    .frame_of(page)
                    .ok_or_else(|| PagingError::PageNotResident {
                        process: process.name.clone(),
                        page,
                    })?;
                let physical = frame as u64 * self.frame_size + offset;
                debug!(logical, process = %process.name, page, offset, frame, physical, "translated");
                return Ok(Translation {
                    process: process.name.clone(),
                    logical,
                    page,
                    offset,
                    frame,
                    physical,
                });
            }
            base += process.size;
        }
        Err(PagingError::AddressOutOfRange(logical))
    }
}

fn validate_selection(free: &[usize], expected: usize, chosen: &[usize]) -> Result<(), PagingError> {
    let free: HashSet<usize> = free.iter().copied().collect();
    let mut seen = HashSet::with_capacity(chosen.len());
    let valid = chosen.len() == expected && chosen.iter().all(|f| free.contains(f) && seen.insert(*f));
    if valid {
        Ok(())
    } else {
        Err(PagingError::InvalidSelection {
            expected,
            got: chosen.to_vec(),
        })
    }
}
