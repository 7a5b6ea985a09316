//! Prefix-to-tag attribution table.
//!
//! The lookup collaborator is a plain text file of `CIDR TAG` lines
//! (`#` starts a comment). On overlapping prefixes the most specific
//! entry wins.

use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use ipnetwork::Ipv4Network;
use tracing::{info, warn};

use geosift_core::grouper::GeoLookup;

pub struct GeoTable {
    /// Sorted most-specific-first so the first containment hit wins.
    entries: Vec<(Ipv4Network, String)>,
}

impl GeoTable {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read attribution table {}", path.display()))?;
        let table = Self::parse(&raw);
        info!("loaded {} attribution entries", table.entries.len());
        Ok(table)
    }

    pub fn parse(raw: &str) -> Self {
        let mut entries: Vec<(Ipv4Network, String)> = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((prefix_str, tag)) = line.split_once(char::is_whitespace) else {
                warn!("ignoring malformed attribution line: {line}");
                continue;
            };
            let tag = tag.trim();
            match Ipv4Network::from_str(prefix_str) {
                Ok(prefix) if !tag.is_empty() => entries.push((prefix, tag.to_string())),
                _ => warn!("ignoring malformed attribution line: {line}"),
            }
        }
        entries.sort_by(|a, b| b.0.prefix().cmp(&a.0.prefix()));
        Self { entries }
    }
}

impl GeoLookup for GeoTable {
    fn lookup(&self, addr: Ipv4Addr) -> Option<String> {
        self.entries
            .iter()
            .find(|(prefix, _)| prefix.contains(addr))
            .map(|(_, tag)| tag.clone())
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
