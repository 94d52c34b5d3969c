//! Port Allocator (spec §4.4): finds a free TCP port in a range by
//! bind-probing, while honoring an in-batch exclusion set for ports a
//! sibling spawn in the same batch has already claimed but whose child
//! process hasn't bound yet.

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("no free port in range {start}-{end}")]
    NoFreePort { start: u16, end: u16 },
}

impl From<PortError> for swarm_core::Error {
    fn from(e: PortError) -> Self {
        match e {
            PortError::NoFreePort { start, end } => swarm_core::Error::NoFreePort { start, end },
        }
    }
}

/// Probe `start..=end` in order, binding `0.0.0.0:p` and releasing
/// immediately on success. `reserved` excludes ports already handed out
/// earlier in the same spawn batch (spec §4.4 rationale: a freshly-bound
/// port isn't yet occupied by the child agent when the next iteration
/// probes, so the exclusion set prevents handing it out twice).
pub fn allocate(start: u16, end: u16, reserved: &HashSet<u16>) -> Result<u16, PortError> {
    for port in start..=end {
        if reserved.contains(&port) {
            continue;
        }
        let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port);
        if TcpListener::bind(addr).is_ok() {
            debug!(event = "ports.allocate.bound", port);
            return Ok(port);
        }
    }
    Err(PortError::NoFreePort { start, end })
}
