//! Random test-data generators
//!
//! [`DataGenerator`] wraps any [`Rng`]; the default one draws from the
//! thread-local generator, tests use a seeded `StdRng` for reproducible
//! output.

use super::{sql, validation};
use crate::contract::UtilsError;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::net::Ipv4Addr;

/// Inclusive bounds of the three RFC 1918 private ranges
pub const PRIVATE_RANGES: [(Ipv4Addr, Ipv4Addr); 3] = [
    (Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(10, 255, 255, 255)),
    (Ipv4Addr::new(172, 16, 0, 0), Ipv4Addr::new(172, 31, 255, 255)),
    (Ipv4Addr::new(192, 168, 0, 0), Ipv4Addr::new(192, 168, 255, 255)),
];

/// Vendor prefix used when the caller has none of their own
pub const DEFAULT_OUIS: &[&str] = &["ab:ab:ab"];

/// Smallest serial number produced by [`DataGenerator::get_random_serial_number`]
pub const SERIAL_MIN: u64 = 10_000_000;

/// Largest serial number produced by [`DataGenerator::get_random_serial_number`]
pub const SERIAL_MAX: u64 = 999_999_999_999_999;

/// Date format of [`DataGenerator::get_today_date`]
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Random generator for addresses, serials and dates
#[derive(Debug, Clone)]
pub struct DataGenerator<R = ThreadRng> {
    rng: R,
}

impl DataGenerator<ThreadRng> {
    /// Generator backed by the thread-local RNG
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for DataGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DataGenerator<R> {
    /// Generator backed by the given RNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Any IPv4 address, octets uniform in `0..=255`
    pub fn generate_ipv4(&mut self) -> Ipv4Addr {
        Ipv4Addr::from(self.rng.random::<[u8; 4]>())
    }

    /// Dotted-decimal form of [`generate_ipv4`](Self::generate_ipv4)
    pub fn generate_ip(&mut self) -> String {
        self.generate_ipv4().to_string()
    }

    /// Address drawn from one of [`PRIVATE_RANGES`]
    ///
    /// The range is picked first, uniformly, then an address inside it.
    pub fn generate_private_ipv4(&mut self) -> Ipv4Addr {
        let idx = self.rng.random_range(0..PRIVATE_RANGES.len());
        let (start, end) = PRIVATE_RANGES[idx];
        Ipv4Addr::from(self.rng.random_range(u32::from(start)..=u32::from(end)))
    }

    /// Dotted-decimal form of [`generate_private_ipv4`](Self::generate_private_ipv4)
    pub fn generate_private_ip(&mut self) -> String {
        self.generate_private_ipv4().to_string()
    }

    /// Fully random MAC address, lowercase, e.g. `3c:0f:a1:00:9e:7b`
    pub fn generate_mac(&mut self) -> String {
        let bytes: [u8; 6] = self.rng.random();
        format_hex_pairs(&bytes)
    }

    /// MAC address starting with one of `ouis`, upper-cased
    ///
    /// Pass [`DEFAULT_OUIS`] for the stock prefix. Every entry is validated
    /// before one is picked, so a single malformed prefix always fails.
    pub fn generate_mac_oui(&mut self, ouis: &[&str]) -> Result<String, UtilsError> {
        let prefixes = ouis
            .iter()
            .map(|oui| validation::normalize_oui(oui))
            .collect::<Result<Vec<_>, _>>()?;
        let prefix = prefixes.choose(&mut self.rng).ok_or(UtilsError::EmptyOuiList)?;
        let tail: [u8; 3] = self.rng.random();
        Ok(format!("{}:{}", prefix, format_hex_pairs(&tail).to_ascii_uppercase()))
    }

    /// Today's local date as `YYYY-MM-DD`
    pub fn get_today_date(&self) -> String {
        chrono::Local::now().format(DATE_FORMAT).to_string()
    }

    /// Decimal serial number within `SERIAL_MIN..=SERIAL_MAX`
    pub fn get_random_serial_number(&mut self) -> String {
        self.rng.random_range(SERIAL_MIN..=SERIAL_MAX).to_string()
    }

    /// `"?, ?, ..."` with one placeholder per item
    pub fn repeat_in_query_placeholders<T>(&self, items: &[T]) -> String {
        sql::repeat_in_query_placeholders(items)
    }
}

fn format_hex_pairs(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(":")
}
