// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CIDR block wrapper so callers never touch `ipnet` directly

use crate::error::{NetscoutError, Result};
use ipnet::IpNet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// A network prefix, always held in its truncated form (host bits cleared)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cidr(IpNet);

impl Cidr {
    /// Parse `a.b.c.d/len` or an IPv6 equivalent
    pub fn parse(s: &str) -> Result<Self> {
        let net = IpNet::from_str(s.trim())
            .map_err(|e| NetscoutError::InvalidCidr(s.to_string(), e.to_string()))?;
        Ok(Cidr(net.trunc()))
    }

    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    /// Highest address in the block (the broadcast address for IPv4)
    pub fn last(&self) -> IpAddr {
        self.0.broadcast()
    }

    pub fn netmask(&self) -> IpAddr {
        self.0.netmask()
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.0.contains(addr)
    }
}

impl FromStr for Cidr {
    type Err = NetscoutError;

    fn from_str(s: &str) -> Result<Self> {
        Cidr::parse(s)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Move `addr` by `delta` addresses. Returns `None` when the result would leave
/// the address space.
pub fn offset(addr: IpAddr, delta: i64) -> Option<IpAddr> {
    match addr {
        IpAddr::V4(v4) => {
            let delta = i32::try_from(delta).ok()?;
            u32::from(v4)
                .checked_add_signed(delta)
                .map(|n| IpAddr::V4(Ipv4Addr::from(n)))
        }
        IpAddr::V6(v6) => u128::from(v6)
            .checked_add_signed(i128::from(delta))
            .map(|n| IpAddr::V6(Ipv6Addr::from(n))),
    }
}

/// Split a CIDR string into its network address and dotted netmask
pub fn network_and_mask(cidr: &str) -> Result<(String, String)> {
    let net = Cidr::parse(cidr)?;
    Ok((net.network().to_string(), net.netmask().to_string()))
}
