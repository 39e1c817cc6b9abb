//! Network interface enumeration. Normalizes the host interface table into
//! records carrying a usable MAC address, and selects the primary MAC.

use ipnetwork::IpNetwork;
use pnet::datalink;
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

/// One (interface, address) endpoint as reported by the host interface table,
/// before any filtering.
#[derive(Debug, Clone)]
pub struct HostEndpoint {
    pub interface: String,
    pub mac: Option<MacAddr>,
    pub network: IpNetwork,
    pub internal: bool,
}

/// Address family of an interface endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    V4,
    V6,
}

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "v4"),
            AddressFamily::V6 => write!(f, "v6"),
        }
    }
}

/// A normalized, MAC-bearing network endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub interface: String,
    /// Six lowercase colon-separated hex octets
    pub mac: String,
    pub family: AddressFamily,
    pub address: String,
    pub netmask: String,
    pub internal: bool,
}

#[derive(Debug)]
pub enum InterfaceError {
    /// The host refused or could not produce the network-interface table
    HostQueryFailed(String),
}

impl std::fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterfaceError::HostQueryFailed(reason) => {
                write!(f, "Host interface query failed: {}", reason)
            }
        }
    }
}

impl std::error::Error for InterfaceError {}

/// Source of the host network-interface table. The production source talks to
/// the OS; tests inject synthetic tables.
pub trait InterfaceSource {
    fn endpoints(&self) -> Result<Vec<HostEndpoint>, InterfaceError>;
}

/// Production source backed by the OS interface table
pub struct DatalinkSource;

impl InterfaceSource for DatalinkSource {
    fn endpoints(&self) -> Result<Vec<HostEndpoint>, InterfaceError> {
        let mut endpoints = vec![];
        for iface in datalink::interfaces() {
            for network in &iface.ips {
                endpoints.push(HostEndpoint {
                    interface: iface.name.clone(),
                    mac: iface.mac,
                    network: *network,
                    internal: iface.is_loopback(),
                });
            }
        }
        Ok(endpoints)
    }
}

/// Return all non-internal, MAC-bearing endpoints in host enumeration order.
/// Endpoints without a MAC, with the all-zero MAC, or marked internal are
/// dropped. An empty result is not an error.
pub fn enumerate(source: &dyn InterfaceSource) -> Result<Vec<InterfaceRecord>, InterfaceError> {
    let mut records = vec![];

    for endpoint in source.endpoints()? {
        let Some(mac) = endpoint.mac else { continue };
        if mac == MacAddr::zero() || endpoint.internal {
            continue;
        }

        let family = match endpoint.network {
            IpNetwork::V4(_) => AddressFamily::V4,
            IpNetwork::V6(_) => AddressFamily::V6,
        };

        records.push(InterfaceRecord {
            interface: endpoint.interface,
            mac: mac.to_string(),
            family,
            address: endpoint.network.ip().to_string(),
            netmask: endpoint.network.mask().to_string(),
            internal: endpoint.internal,
        });
    }

    Ok(records)
}

/// Filter `enumerate` output by case-insensitive substring containment of
/// `pattern` in the interface name. ASCII case folding only.
pub fn enumerate_by_pattern(
    source: &dyn InterfaceSource,
    pattern: &str,
) -> Result<Vec<InterfaceRecord>, InterfaceError> {
    let pattern = pattern.to_ascii_lowercase();
    let records = enumerate(source)?
        .into_iter()
        .filter(|record| record.interface.to_ascii_lowercase().contains(&pattern))
        .collect();
    Ok(records)
}

/// MAC of the first enumerated record, or `None` when no qualifying interface
/// exists. The policy is "first non-internal"; no wired-over-wireless
/// heuristic.
pub fn primary(source: &dyn InterfaceSource) -> Result<Option<String>, InterfaceError> {
    let records = enumerate(source)?;
    Ok(records.into_iter().next().map(|record| record.mac))
}
