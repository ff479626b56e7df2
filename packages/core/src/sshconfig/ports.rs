//! Local forwarding port allocation
//!
//! Ports live only in the config file itself: the `Port` directive of each
//! managed block. Allocation reads them back before handing out new ones.

use std::collections::BTreeSet;

use super::error::SshConfigError;

/// First port handed out to a managed block
pub const DEFAULT_PORT_BASE: u16 = 2222;

/// Parse a `Port` directive value into a usable local port
pub fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|p| *p > 0)
}

/// Pick a port for a block and reserve it in `used`
///
/// `preferred` is the port already recorded for this alias. It is kept when
/// nobody else holds it; otherwise the lowest free port at or above `base`
/// is taken.
pub fn allocate_port(
    used: &mut BTreeSet<u16>,
    preferred: Option<u16>,
    base: u16,
) -> Result<u16, SshConfigError> {
    if let Some(port) = preferred {
        if used.insert(port) {
            return Ok(port);
        }
        tracing::debug!("Port {} already claimed, allocating a new one", port);
    }

    let port = (base.max(1)..=u16::MAX)
        .find(|p| !used.contains(p))
        .ok_or(SshConfigError::PortsExhausted { base })?;
    used.insert(port);
    Ok(port)
}
