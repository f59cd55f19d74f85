use thiserror::Error;

/// Rejected paging operations. The session is left untouched whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PagingError {
    #[error("frame size must be at least 1")]
    InvalidFrameSize,

    #[error("process name must not be empty")]
    InvalidProcessName,

    #[error("process '{0}' has size 0")]
    EmptyProcess(String),

    #[error("process '{0}' already exists")]
    DuplicateProcess(String),

    #[error("insufficient frames: need {needed}, only {available} free")]
    InsufficientFrames { needed: usize, available: usize },

    #[error("logical address {0} is out of range")]
    AddressOutOfRange(u64),

    #[error("page {page} of process '{process}' is not resident")]
    PageNotResident { process: String, page: usize },

    #[error("frame selector returned {got:?}, expected {expected} distinct free frames")]
    InvalidSelection { expected: usize, got: Vec<usize> },
}
