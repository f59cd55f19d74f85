use crate::replace::trace::PageNo;
use crate::telemetry::LogConfig;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "MEMSIM_CONFIG";

/// Simulation defaults. Any field missing from a config file keeps its
/// default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub blocks: Vec<u64>,
    pub processes: Vec<u64>,
    pub reference_string: Vec<PageNo>,
    pub frame_capacity: usize,
    pub total_memory: u64,
    pub frame_size: u64,
    /// Seed for random frame placement; `None` draws from entropy.
    pub placement_seed: Option<u64>,
    pub log: LogConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            blocks: vec![100, 500, 200, 300, 600],
            processes: vec![212, 417, 112, 426],
            reference_string: vec![7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2],
            frame_capacity: 3,
            total_memory: 1000,
            frame_size: 100,
            placement_seed: None,
            log: LogConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `$MEMSIM_CONFIG` if set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_capacity == 0 {
            bail!("frame_capacity must be at least 1");
        }
        if self.frame_size == 0 {
            bail!("frame_size must be at least 1");
        }
        if self.blocks.contains(&0) || self.processes.contains(&0) {
            bail!("block and process sizes must be positive");
        }
        Ok(())
    }
}
