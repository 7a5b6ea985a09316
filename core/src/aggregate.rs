//! # Minimal CIDR Cover
//!
//! Collapses an arbitrary IPv4 address set into the smallest set of
//! power-of-two-aligned prefixes whose union is exactly the input set.
//!
//! The decomposition is greedy and alignment-first: at each cursor the
//! block is as large as the cursor's trailing-zero alignment allows, then
//! shrunk until it fits the remaining range. For a contiguous integer
//! range this yields the provably minimal prefix count; a naive
//! one-address-per-prefix or binary-split scheme does not.

use std::net::Ipv4Addr;

use ipnetwork::Ipv4Network;

/// Produces the minimal prefix cover for an unordered address set.
///
/// Empty input yields an empty cover; a single address yields one /32.
pub fn aggregate_prefixes(addrs: &[Ipv4Addr]) -> anyhow::Result<Vec<Ipv4Network>> {
    if addrs.is_empty() {
        return Ok(Vec::new());
    }

    let mut values: Vec<u32> = addrs.iter().copied().map(u32::from).collect();
    values.sort_unstable();
    values.dedup();

    let mut prefixes: Vec<Ipv4Network> = Vec::new();
    let mut lo = values[0];
    let mut hi = values[0];
    for &value in &values[1..] {
        if value == hi.wrapping_add(1) {
            hi = value;
        } else {
            range_to_prefixes(lo, hi, &mut prefixes)?;
            lo = value;
            hi = value;
        }
    }
    range_to_prefixes(lo, hi, &mut prefixes)?;
    Ok(prefixes)
}

/// Decomposes the closed range `[lo, hi]` into aligned prefixes.
///
/// The cursor runs in u64 so `cur` may legally step past `u32::MAX` when
/// the range ends there.
fn range_to_prefixes(lo: u32, hi: u32, out: &mut Vec<Ipv4Network>) -> anyhow::Result<()> {
    let mut cur = u64::from(lo);
    let end = u64::from(hi);
    while cur <= end {
        // Largest block the cursor's alignment allows, capped at the
        // full address space for cur == 0.
        let mut bits: u32 = if cur == 0 {
            32
        } else {
            cur.trailing_zeros().min(32)
        };
        // Shrink until the block fits the remaining range.
        while bits > 0 && cur + (1u64 << bits) - 1 > end {
            bits -= 1;
        }
        let base = Ipv4Addr::from(cur as u32);
        out.push(Ipv4Network::new(base, (32 - bits) as u8)?);
        cur += 1u64 << bits;
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
