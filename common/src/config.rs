//! Run-wide probe settings.
//!
//! Everything the prober needs is carried in an explicit [`ProbeConfig`]
//! value handed over at construction. Concurrent runs (tests especially)
//! never touch shared mutable globals.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_WORKERS: usize = 200;
pub const DEFAULT_PORT: u16 = 443;

/// Total attempts per probe sequence before an address is written off.
pub const PROBE_ATTEMPTS: u32 = 3;
/// Pause between consecutive attempts of the same sequence.
pub const RETRY_PAUSE: Duration = Duration::from_millis(200);

/// Verification strategy, selected once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// TCP connect check against a fixed port.
    Tcp,
    /// Single echo request through the system ping facility.
    Icmp,
    /// Both checks per address; the mode decides how verdicts combine.
    Combined(CombinedMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinedMode {
    /// Reachable if either sub-check ever succeeds.
    Either,
    /// Reachable only if both sub-checks succeed.
    Both,
}

impl CombinedMode {
    /// Maps the numeric flag value (1 = either, 2 = both) onto a mode.
    ///
    /// Anything else is a configuration error and must abort the run
    /// before any probing starts.
    pub fn from_flag(value: u8) -> Result<Self, ConfigError> {
        match value {
            1 => Ok(Self::Either),
            2 => Ok(Self::Both),
            other => Err(ConfigError::InvalidCombinedMode(other)),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid combined mode {0}: only 1 (either passes) or 2 (both must pass) are allowed")]
    InvalidCombinedMode(u8),
    #[error("worker count must be at least 1")]
    ZeroWorkers,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub strategy: Strategy,
    /// Upper bound on concurrently in-flight probes.
    pub workers: usize,
    /// Port used by the TCP connect check.
    pub port: u16,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Tcp,
            workers: DEFAULT_WORKERS,
            port: DEFAULT_PORT,
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
