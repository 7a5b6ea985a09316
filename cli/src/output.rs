//! Per-tag result files.
//!
//! Every non-empty bucket produces two artifacts under the output
//! directory: `<TAG>.txt` with the sorted address list and
//! `<TAG>-CIDR.txt` with the sorted minimal prefix cover. Files are
//! newline-joined without a trailing newline.

use std::collections::HashMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use geosift_common::net::sort;
use geosift_core::aggregate;

pub fn write_buckets(
    dir: &Path,
    buckets: &HashMap<String, Vec<Ipv4Addr>>,
) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    for (tag, addrs) in buckets {
        let mut address_lines: Vec<String> = addrs.iter().map(|a| a.to_string()).collect();
        sort::sort_address_lines(&mut address_lines);
        write_lines(&dir.join(format!("{tag}.txt")), &address_lines)?;

        let prefixes = aggregate::aggregate_prefixes(addrs)?;
        let mut prefix_lines: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
        sort::sort_prefix_lines(&mut prefix_lines);
        write_lines(&dir.join(format!("{tag}-CIDR.txt")), &prefix_lines)?;
    }
    Ok(())
}

fn write_lines(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    if lines.is_empty() {
        return Ok(());
    }
    fs::write(path, lines.join("\n"))
        .with_context(|| format!("cannot write {}", path.display()))?;
    debug!("wrote {} lines to {}", lines.len(), path.display());
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

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[test]
    fn bucket_files_are_sorted_and_unterminated() {
        let dir = std::env::temp_dir().join(format!("geosift-output-{}", std::process::id()));
        let buckets = HashMap::from([(
            "NL".to_string(),
            vec![ip("10.0.0.3"), ip("10.0.0.2"), ip("10.0.0.1"), ip("10.0.0.0")],
        )]);

        write_buckets(&dir, &buckets).unwrap();

        let addresses = fs::read_to_string(dir.join("NL.txt")).unwrap();
        assert_eq!(addresses, "10.0.0.0\n10.0.0.1\n10.0.0.2\n10.0.0.3");

        let prefixes = fs::read_to_string(dir.join("NL-CIDR.txt")).unwrap();
        assert_eq!(prefixes, "10.0.0.0/30");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn empty_bucket_produces_no_files() {
        let dir = std::env::temp_dir().join(format!("geosift-empty-{}", std::process::id()));
        let buckets = HashMap::from([("XX".to_string(), Vec::new())]);

        write_buckets(&dir, &buckets).unwrap();

        assert!(!dir.join("XX.txt").exists());
        assert!(!dir.join("XX-CIDR.txt").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
