//! The full pipeline: load blocks, expand, probe, group, aggregate, write.

use std::fs;
use std::io::Read;

use anyhow::Context;
use tracing::{info, warn};

use geosift_common::config::ProbeConfig;
use geosift_common::net::block;
use geosift_core::grouper;
use geosift_core::prober::{Prober, SystemTransport};

use crate::commands::CommandLine;
use crate::geodb::GeoTable;
use crate::output;
use crate::terminal::progress;

pub async fn run(args: CommandLine) -> anyhow::Result<()> {
    // Strategy resolution happens before any work so an invalid mode
    // aborts with a clear diagnostic.
    let strategy = args.strategy()?;

    let geo = GeoTable::load(&args.geo_db)?;

    info!("step 1: loading CIDR list from {}", args.input.display());
    let raw = read_input(&args)?;
    info!("step 2: expanding blocks to host addresses");
    let mut candidates = block::expand_blocks(raw.lines());
    info!("expanded to {} addresses to check", candidates.len());

    if args.limit > 0 && candidates.len() > args.limit {
        warn!("limiting check to the first {} addresses", args.limit);
        candidates.truncate(args.limit);
    }

    let reachable = if args.skip_check {
        warn!("skipping reachability check, classifying every candidate");
        candidates
    } else {
        info!("step 3: finding reachable addresses");
        let config = ProbeConfig {
            strategy,
            workers: args.workers,
            port: args.port,
        };
        let bar = progress::probe_bar(candidates.len() as u64);
        let bar_ref = bar.clone();
        let prober = Prober::new(config, SystemTransport)?
            .with_progress(Box::new(move |done| bar_ref.set_position(done as u64)));

        let reachable = prober.find_reachable(candidates).await?;
        bar.finish_and_clear();
        info!("found {} reachable addresses", reachable.len());
        reachable
    };

    if reachable.is_empty() {
        info!("no addresses to classify");
        return Ok(());
    }

    info!("step 4: grouping addresses by attribution tag");
    let buckets = grouper::group_by_tag(&reachable, &geo);
    info!(
        "saving results for {} tags under {}",
        buckets.len(),
        args.output.display()
    );
    output::write_buckets(&args.output, &buckets)?;

    info!("run completed");
    Ok(())
}

fn read_input(args: &CommandLine) -> anyhow::Result<String> {
    if args.input.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("cannot read block list from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(&args.input)
            .with_context(|| format!("cannot read block list {}", args.input.display()))
    }
}
