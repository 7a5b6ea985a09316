//! Output ordering helpers.
//!
//! Result files hold text lines, so ordering is defined over strings:
//! lines that parse are compared numerically, anything malformed falls
//! back to plain lexicographic order instead of aborting the run.

use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnetwork::Ipv4Network;

/// Sorts address lines ascending as unsigned 32-bit values.
pub fn sort_address_lines(lines: &mut [String]) {
    lines.sort_by(|a, b| {
        match (Ipv4Addr::from_str(a), Ipv4Addr::from_str(b)) {
            (Ok(lhs), Ok(rhs)) => u32::from(lhs).cmp(&u32::from(rhs)),
            _ => a.cmp(b),
        }
    });
}

/// Sorts prefix lines by base address, then by prefix length.
///
/// At equal base the coarser (shorter) prefix sorts first.
pub fn sort_prefix_lines(lines: &mut [String]) {
    lines.sort_by(|a, b| {
        match (Ipv4Network::from_str(a), Ipv4Network::from_str(b)) {
            (Ok(lhs), Ok(rhs)) => u32::from(lhs.ip())
                .cmp(&u32::from(rhs.ip()))
                .then_with(|| lhs.prefix().cmp(&rhs.prefix())),
            _ => a.cmp(b),
        }
    });
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
