#![cfg(test)]
//! End-to-end pipeline tests over deterministic mock transports:
//! expand -> probe -> group -> aggregate.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::time::Duration;

use async_trait::async_trait;

use geosift_common::config::{CombinedMode, ProbeConfig, Strategy};
use geosift_common::net::block;
use geosift_core::aggregate;
use geosift_core::grouper::{self, GeoLookup};
use geosift_core::prober::{ProbeTransport, Prober};

/// Reachability decided by a fixed predicate on the last octet.
struct EvenHostsTransport;

#[async_trait]
impl ProbeTransport for EvenHostsTransport {
    async fn connect(&self, addr: Ipv4Addr, _port: u16, _limit: Duration) -> bool {
        addr.octets()[3] % 2 == 0
    }

    async fn ping(&self, addr: Ipv4Addr, _limit: Duration, _wait: Duration) -> bool {
        addr.octets()[3] % 3 == 0
    }
}

struct OctetLookup;

impl GeoLookup for OctetLookup {
    fn lookup(&self, addr: Ipv4Addr) -> Option<String> {
        match addr.octets()[1] {
            0 => Some("NL".to_string()),
            1 => Some("SG".to_string()),
            _ => None,
        }
    }
}

fn config(strategy: Strategy, workers: usize) -> ProbeConfig {
    ProbeConfig {
        strategy,
        workers,
        port: 443,
    }
}

#[tokio::test(start_paused = true)]
async fn full_pipeline_produces_per_tag_prefix_covers() -> anyhow::Result<()> {
    // Two attributed blocks and one block nobody claims.
    let lines = ["198.0.2.0/29", "198.1.2.8/29", "198.9.9.0/30"];
    let candidates = block::expand_blocks(lines);
    // /29 blocks keep six usable hosts each, the /30 keeps two.
    assert_eq!(candidates.len(), 14);

    let prober = Prober::new(config(Strategy::Tcp, 50), EvenHostsTransport)?;
    let reachable = prober.find_reachable(candidates).await?;

    let buckets = grouper::group_by_tag(&reachable, &OctetLookup);
    assert_eq!(buckets.len(), 2);

    // 198.0.2.0/29 usable hosts .1-.6, even ones reachable: .2 .4 .6
    let nl: HashSet<Ipv4Addr> = buckets["NL"].iter().copied().collect();
    assert_eq!(
        nl,
        HashSet::from([
            Ipv4Addr::new(198, 0, 2, 2),
            Ipv4Addr::new(198, 0, 2, 4),
            Ipv4Addr::new(198, 0, 2, 6),
        ])
    );

    // 198.1.2.8/29 usable hosts .9-.14, even ones reachable: .10 .12 .14
    let sg_prefixes = aggregate::aggregate_prefixes(&buckets["SG"])?;
    let rendered: Vec<String> = sg_prefixes.iter().map(|p| p.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["198.1.2.10/32", "198.1.2.12/32", "198.1.2.14/32"]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reachable_set_is_identical_across_worker_widths() {
    let candidates = block::expand_blocks(["10.0.0.0/24", "10.0.4.0/26"]);

    let mut baseline: Option<HashSet<Ipv4Addr>> = None;
    for workers in [1usize, 50, 200] {
        let prober = Prober::new(config(Strategy::Tcp, workers), EvenHostsTransport).unwrap();
        let reachable: HashSet<Ipv4Addr> = prober
            .find_reachable(candidates.clone())
            .await
            .unwrap()
            .into_iter()
            .collect();

        match &baseline {
            None => baseline = Some(reachable),
            Some(expected) => assert_eq!(&reachable, expected, "W = {workers} diverged"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn combined_both_is_the_intersection_of_the_sides() {
    // Usable hosts .1-.14; TCP passes evens, ICMP passes multiples of 3,
    // so "both" keeps exactly the multiples of 6.
    let candidates = block::expand_blocks(["10.0.0.0/28"]);

    let prober = Prober::new(
        config(Strategy::Combined(CombinedMode::Both), 8),
        EvenHostsTransport,
    )
    .unwrap();
    let reachable: HashSet<Ipv4Addr> = prober
        .find_reachable(candidates.clone())
        .await
        .unwrap()
        .into_iter()
        .collect();

    assert_eq!(
        reachable,
        HashSet::from([Ipv4Addr::new(10, 0, 0, 6), Ipv4Addr::new(10, 0, 0, 12)])
    );

    // "either" keeps the union.
    let prober = Prober::new(
        config(Strategy::Combined(CombinedMode::Either), 8),
        EvenHostsTransport,
    )
    .unwrap();
    let either: HashSet<Ipv4Addr> = prober
        .find_reachable(candidates)
        .await
        .unwrap()
        .into_iter()
        .collect();

    let expected: HashSet<Ipv4Addr> = (1u8..=14)
        .filter(|n| n % 2 == 0 || n % 3 == 0)
        .map(|n| Ipv4Addr::new(10, 0, 0, n))
        .collect();
    assert_eq!(either, expected);
}

#[tokio::test(start_paused = true)]
async fn expander_output_reaggregates_to_the_usable_span() {
    // Expanding a /24 drops .0 and .255, so the minimal cover of what is
    // left is the classic 1-254 decomposition, not the original /24.
    let candidates = block::expand_blocks(["192.0.2.0/24"]);
    let prefixes = aggregate::aggregate_prefixes(&candidates).unwrap();

    let rendered: Vec<String> = prefixes.iter().map(|p| p.to_string()).collect();
    assert_eq!(rendered.first().map(String::as_str), Some("192.0.2.1/32"));
    assert_eq!(
        rendered.last().map(String::as_str),
        Some("192.0.2.254/32")
    );

    // Exact round trip: the cover spans .1-.254 with no gaps.
    let mut covered: Vec<u32> = Vec::new();
    for prefix in &prefixes {
        let start: u32 = prefix.network().into();
        let end: u32 = prefix.broadcast().into();
        covered.extend(start..=end);
    }
    covered.sort_unstable();
    let expected: Vec<u32> = candidates.iter().copied().map(u32::from).collect();
    assert_eq!(covered, expected);

    // And aggregation is a fixed point from here on.
    let re_expanded: Vec<Ipv4Addr> = covered.into_iter().map(Ipv4Addr::from).collect();
    let second = aggregate::aggregate_prefixes(&re_expanded).unwrap();
    assert_eq!(second, prefixes);
}

#[test]
fn grouping_buckets_partition_the_reachable_set() {
    let addrs: Vec<Ipv4Addr> = (0u8..4)
        .flat_map(|second| (1u8..=5).map(move |last| Ipv4Addr::new(198, second, 0, last)))
        .collect();

    let buckets: HashMap<String, Vec<Ipv4Addr>> = grouper::group_by_tag(&addrs, &OctetLookup);

    let total: usize = buckets.values().map(Vec::len).sum();
    // Tags exist only for second octets 0 and 1; the rest are dropped.
    assert_eq!(total, 10);
    for (tag, members) in &buckets {
        for addr in members {
            assert_eq!(OctetLookup.lookup(*addr).as_deref(), Some(tag.as_str()));
        }
    }
}
