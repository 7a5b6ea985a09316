//! Live probe transport: real TCP handshakes plus the system ping binary.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

use super::ProbeTransport;

pub struct SystemTransport;

#[async_trait]
impl ProbeTransport for SystemTransport {
    async fn connect(&self, addr: Ipv4Addr, port: u16, limit: Duration) -> bool {
        let socket_addr = SocketAddr::new(IpAddr::V4(addr), port);
        match timeout(limit, TcpStream::connect(socket_addr)).await {
            Ok(Ok(stream)) => {
                // Reachability is decided by the handshake alone.
                drop(stream);
                true
            }
            Ok(Err(err)) => {
                trace!("tcp connect to {socket_addr} failed: {err}");
                false
            }
            Err(_elapsed) => false,
        }
    }

    async fn ping(&self, addr: Ipv4Addr, limit: Duration, wait: Duration) -> bool {
        let mut command = Command::new("ping");
        command
            .arg("-c")
            .arg("1")
            .arg("-W")
            .arg(wait.as_secs().to_string())
            .arg(addr.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            // The attempt deadline must also bound the child process.
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(err) => {
                trace!("ping spawn for {addr} failed: {err}");
                return false;
            }
        };

        match timeout(limit, child.wait_with_output()).await {
            Ok(Ok(output)) => output.status.success(),
            Ok(Err(err)) => {
                trace!("ping for {addr} failed: {err}");
                false
            }
            Err(_elapsed) => false,
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
