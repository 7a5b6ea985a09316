//! Buckets reachable addresses by attribution tag.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use tracing::debug;

/// Maps an address to its owning attribution tag, if any.
///
/// Backed by whatever lookup service the caller wires in; a missing or
/// empty tag simply excludes the address from every bucket.
pub trait GeoLookup {
    fn lookup(&self, addr: Ipv4Addr) -> Option<String>;
}

/// Distributes addresses into tag-keyed buckets.
///
/// Each address lands in at most one bucket, decided solely by its own
/// lookup result. Lookup misses are ordinary filtering, not errors.
pub fn group_by_tag(
    addrs: &[Ipv4Addr],
    lookup: &dyn GeoLookup,
) -> HashMap<String, Vec<Ipv4Addr>> {
    let mut buckets: HashMap<String, Vec<Ipv4Addr>> = HashMap::new();
    for &addr in addrs {
        match lookup.lookup(addr) {
            Some(tag) if !tag.is_empty() => buckets.entry(tag).or_default().push(addr),
            _ => debug!("no attribution for {addr}, dropping"),
        }
    }
    buckets
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
