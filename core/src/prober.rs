//! The central **abstraction** for reachability probing.
//!
//! This module owns the decision logic of a probe run: retry sequences,
//! strategy combination, and the bounded worker pool. The actual network
//! I/O sits behind the [`ProbeTransport`] trait so the logic here can be
//! exercised against deterministic mock transports.
//!
//! **Architectural Note:**
//! High-level modules should depend on [`Prober`] and [`ProbeTransport`]
//! rather than the concrete [`system`] transport, which is only the live
//! implementation of the capability.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geosift_common::config::{CombinedMode, ConfigError, PROBE_ATTEMPTS, ProbeConfig, RETRY_PAUSE, Strategy};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::info;

pub mod system;

pub use system::SystemTransport;

// Solo strategies probe once per address and keep the bounds tight.
const SOLO_TCP_TIMEOUT: Duration = Duration::from_secs(3);
const SOLO_ICMP_TIMEOUT: Duration = Duration::from_secs(3);
const SOLO_ICMP_WAIT: Duration = Duration::from_secs(2);

// Combined mode runs two full sequences per address, so each side gets a
// looser profile.
const COMBINED_TCP_TIMEOUT: Duration = Duration::from_secs(5);
const COMBINED_ICMP_TIMEOUT: Duration = Duration::from_secs(5);
const COMBINED_ICMP_WAIT: Duration = Duration::from_secs(3);

/// Transport capability behind the prober.
///
/// Attempt-level failures are just `false`; they are never escalated as
/// errors, only fed back into the retry loop.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// TCP connect check; `true` when the handshake completes in time.
    async fn connect(&self, addr: Ipv4Addr, port: u16, limit: Duration) -> bool;

    /// Single echo request; `true` when a reply arrives in time.
    async fn ping(&self, addr: Ipv4Addr, limit: Duration, wait: Duration) -> bool;
}

/// Invoked with the number of completed probes after each verdict.
pub type ProgressCallback = Box<dyn Fn(usize) + Send + Sync>;

/// Bounded-concurrency reachability prober.
pub struct Prober<T: ProbeTransport> {
    config: ProbeConfig,
    transport: Arc<T>,
    on_progress: Option<Arc<ProgressCallback>>,
}

impl<T: ProbeTransport + 'static> Prober<T> {
    pub fn new(config: ProbeConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
            on_progress: None,
        })
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    /// Probes every candidate and returns the reachable subset.
    ///
    /// At most `workers` probes are in flight at any point: the submission
    /// loop parks on a semaphore permit, so excess candidates queue instead
    /// of fanning out into unbounded tasks. Verdicts travel over a channel
    /// that is drained only after every task has joined; partial results
    /// are never exposed mid-run.
    ///
    /// The returned subset carries no ordering guarantee.
    pub async fn find_reachable(&self, candidates: Vec<Ipv4Addr>) -> anyhow::Result<Vec<Ipv4Addr>> {
        info!(
            "checking {} addresses with {} workers (up to {} attempts each)",
            candidates.len(),
            self.config.workers,
            PROBE_ATTEMPTS
        );

        let semaphore = Arc::new(Semaphore::new(self.config.workers));
        let (verdict_tx, mut verdict_rx) = mpsc::unbounded_channel::<Ipv4Addr>();
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<()> = JoinSet::new();

        for addr in candidates {
            let permit = semaphore.clone().acquire_owned().await?;
            let transport = self.transport.clone();
            let strategy = self.config.strategy;
            let port = self.config.port;
            let verdict_tx = verdict_tx.clone();
            let completed = completed.clone();
            let on_progress = self.on_progress.clone();

            tasks.spawn(async move {
                let _permit = permit;
                if verify(transport.as_ref(), strategy, addr, port).await {
                    let _ = verdict_tx.send(addr);
                }
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = on_progress {
                    (*callback)(done);
                }
            });
        }

        // Full join barrier; the last sender clone dies with the last task.
        drop(verdict_tx);
        while tasks.join_next().await.is_some() {}

        let mut reachable: Vec<Ipv4Addr> = Vec::new();
        while let Some(addr) = verdict_rx.recv().await {
            reachable.push(addr);
        }
        Ok(reachable)
    }
}

/// Runs the configured strategy for one address.
async fn verify<T>(transport: &T, strategy: Strategy, addr: Ipv4Addr, port: u16) -> bool
where
    T: ProbeTransport + ?Sized,
{
    match strategy {
        Strategy::Tcp => tcp_sequence(transport, addr, port, SOLO_TCP_TIMEOUT).await,
        Strategy::Icmp => {
            icmp_sequence(transport, addr, SOLO_ICMP_TIMEOUT, SOLO_ICMP_WAIT).await
        }
        Strategy::Combined(mode) => {
            // Both sequences always run to completion; the mode only
            // decides how the two verdicts combine.
            let icmp =
                icmp_sequence(transport, addr, COMBINED_ICMP_TIMEOUT, COMBINED_ICMP_WAIT).await;
            let tcp = tcp_sequence(transport, addr, port, COMBINED_TCP_TIMEOUT).await;
            match mode {
                CombinedMode::Either => icmp || tcp,
                CombinedMode::Both => icmp && tcp,
            }
        }
    }
}

async fn tcp_sequence<T>(transport: &T, addr: Ipv4Addr, port: u16, limit: Duration) -> bool
where
    T: ProbeTransport + ?Sized,
{
    for attempt in 1..=PROBE_ATTEMPTS {
        if transport.connect(addr, port, limit).await {
            return true;
        }
        if attempt < PROBE_ATTEMPTS {
            sleep(RETRY_PAUSE).await;
        }
    }
    false
}

async fn icmp_sequence<T>(transport: &T, addr: Ipv4Addr, limit: Duration, wait: Duration) -> bool
where
    T: ProbeTransport + ?Sized,
{
    for attempt in 1..=PROBE_ATTEMPTS {
        if transport.ping(addr, limit, wait).await {
            return true;
        }
        if attempt < PROBE_ATTEMPTS {
            sleep(RETRY_PAUSE).await;
        }
    }
    false
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
