pub mod alloc {
    pub mod compare;
    pub mod fit;
    pub mod result;
}

pub mod replace {
    pub mod policy;
    pub mod trace;
}

pub mod paging {
    pub mod error;
    pub mod frame;
    pub mod selector;
    pub mod session;
}

pub mod cli {
    pub mod commands;
    pub mod render;
    pub mod shell;
    pub mod utils;
}

pub mod config;
pub mod telemetry;
