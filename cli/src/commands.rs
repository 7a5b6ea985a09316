pub mod run;

use std::path::PathBuf;

use clap::Parser;
use geosift_common::config::{
    CombinedMode, ConfigError, DEFAULT_PORT, DEFAULT_WORKERS, Strategy,
};

#[derive(Parser)]
#[command(name = "geosift")]
#[command(
    about = "Expands published IPv4 blocks, verifies reachability, and emits per-region address and CIDR lists."
)]
pub struct CommandLine {
    /// File holding the published CIDR list, or '-' for stdin
    pub input: PathBuf,

    /// Attribution table: lines of "CIDR TAG" (e.g. "91.108.4.0/22 NL")
    #[arg(long = "geo-db")]
    pub geo_db: PathBuf,

    /// Use ICMP ping instead of the default TCP check
    #[arg(long)]
    pub icmp: bool,

    /// Run both checks per address: 1 = either passes, 2 = both must pass
    #[arg(long)]
    pub combined: Option<u8>,

    /// Number of concurrent probe workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// TCP port used by the connect check
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Check at most this many expanded addresses (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Skip the reachability check and classify every expanded address
    #[arg(long = "skip-check")]
    pub skip_check: bool,

    /// Directory receiving the per-tag result files
    #[arg(long, default_value = "geoip")]
    pub output: PathBuf,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolves the flag combination into a probe strategy.
    ///
    /// `--combined` wins over `--icmp`; an out-of-range mode is the one
    /// error class that aborts the run before any work starts.
    pub fn strategy(&self) -> Result<Strategy, ConfigError> {
        match self.combined {
            Some(mode) => Ok(Strategy::Combined(CombinedMode::from_flag(mode)?)),
            None if self.icmp => Ok(Strategy::Icmp),
            None => Ok(Strategy::Tcp),
        }
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
