//! Input validation and normalization helpers

use crate::contract::UtilsError;
use std::net::{IpAddr, SocketAddr};

/// Validate a vendor prefix and return it upper-cased
///
/// Accepts exactly three colon-separated pairs of hex digits, e.g. `ab:cd:ef`.
pub fn normalize_oui(oui: &str) -> Result<String, UtilsError> {
    let trimmed = oui.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let valid = parts.len() == 3
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_hexdigit()));

    if !valid {
        return Err(UtilsError::InvalidOui {
            oui: oui.to_string(),
        });
    }

    Ok(trimmed.to_ascii_uppercase())
}

/// Build a `host:port` contact point
///
/// Hosts that already name a port are left alone; bare IPv6 literals are
/// bracketed.
pub fn contact_point(host: &str, port: u16) -> String {
    let host = host.trim();

    if host.parse::<SocketAddr>().is_ok() {
        return host.to_string();
    }

    match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port).to_string(),
        Err(_) if host.starts_with('[') && host.ends_with(']') => format!("{}:{}", host, port),
        Err(_) => match host.rsplit_once(':') {
            Some((name, p)) if !name.is_empty() && p.parse::<u16>().is_ok() => host.to_string(),
            _ => format!("{}:{}", host, port),
        },
    }
}
