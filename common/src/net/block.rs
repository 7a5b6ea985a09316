//! # Published Address Blocks
//!
//! Parses IPv4 CIDR lines and expands them into individually probeable
//! host addresses.
//!
//! Expansion follows the usable-host convention: a block holding more
//! than two addresses loses its network and broadcast addresses, while
//! point-to-point /31 and /32 blocks keep everything.

use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;
use tracing::debug;

/// A published IPv4 block, stored in masked (network) form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    network: Ipv4Network,
}

impl AddressBlock {
    /// Parses one input line.
    ///
    /// Returns `None` for anything that is not IPv4 CIDR notation: empty
    /// lines, lines containing `:` (IPv6), bare addresses without a
    /// prefix, and lines that fail to parse.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.contains(':') || !line.contains('/') {
            return None;
        }
        let parsed = Ipv4Network::from_str(line).ok()?;
        // Re-anchor on the masked base so 10.0.0.7/24 and 10.0.0.0/24
        // denote the same block.
        let network = Ipv4Network::new(parsed.network(), parsed.prefix()).ok()?;
        Some(Self { network })
    }

    pub fn base(&self) -> Ipv4Addr {
        self.network.ip()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// All usable host addresses of the block, ascending.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let start: u32 = self.network.network().into();
        let end: u32 = self.network.broadcast().into();

        // end - start >= 2 means the block spans more than two addresses;
        // written this way it cannot overflow even for 0.0.0.0/0.
        let (lo, hi) = if end - start >= 2 {
            (start + 1, end - 1)
        } else {
            (start, end)
        };
        (lo..=hi).map(Ipv4Addr::from)
    }
}

/// Expands every parseable line into the candidate set.
///
/// Emission preserves input block order; within a block addresses ascend.
/// Malformed lines are skipped, never fatal.
pub fn expand_blocks<'a, I>(lines: I) -> Vec<Ipv4Addr>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut candidates: Vec<Ipv4Addr> = Vec::new();
    for line in lines {
        match AddressBlock::parse(line) {
            Some(block) => candidates.extend(block.hosts()),
            None => {
                if !line.trim().is_empty() {
                    debug!("skipping unparseable block line: {line}");
                }
            }
        }
    }
    candidates
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
