//! Link and network settings read from a plain-text file.
//!
//! Each entry starts with a one-letter tag:
//!
//! ```text
//! # comment to end of line
//! h 90:a2:da:00:12:34     hardware (MAC) address, six hex bytes
//! i 192.168.1.177         IP address
//! m 255.255.255.0         netmask
//! g 192.168.1.1           gateway
//! d 192.168.1.1           DNS server
//! ```
//!
//! Whitespace between entries is ignored. Any other leading character is
//! logged and skipped. A malformed address is an error.

use std::fs::File;
use std::io::BufReader;
use std::net::Ipv4Addr;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::http::scanner;
use crate::http::stream::{ByteStream, PeekReader};

#[derive(Debug, Error)]
pub enum NetConfigError {
    #[error("cannot read network config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed hardware address")]
    HardwareAddress,

    #[error("malformed address in '{field}' entry")]
    Address { field: char },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetConfig {
    pub mac: Option<[u8; 6]>,
    pub ip: Option<Ipv4Addr>,
    pub netmask: Option<Ipv4Addr>,
    pub gateway: Option<Ipv4Addr>,
    pub dns: Option<Ipv4Addr>,
}

impl NetConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NetConfigError> {
        let file = File::open(path)?;
        let mut stream = PeekReader::new(BufReader::new(file));
        let config = Self::parse(&mut stream)?;
        if let Some(e) = stream.take_error() {
            return Err(e.into());
        }
        Ok(config)
    }

    pub fn parse<S: ByteStream + ?Sized>(s: &mut S) -> Result<Self, NetConfigError> {
        let mut config = NetConfig::default();

        while let Some(tag) = s.next_byte() {
            match tag {
                b'\n' | b'\r' | b' ' | b'\t' => {}
                b'#' => scanner::skip_line(s),
                b'h' => config.mac = Some(parse_mac(s)?),
                b'i' => config.ip = Some(parse_addr(s, 'i')?),
                b'm' => config.netmask = Some(parse_addr(s, 'm')?),
                b'g' => config.gateway = Some(parse_addr(s, 'g')?),
                b'd' => config.dns = Some(parse_addr(s, 'd')?),
                other => warn!("Unexpected char in network config: {:?}", other as char),
            }
        }

        Ok(config)
    }
}

fn parse_addr<S: ByteStream + ?Sized>(s: &mut S, field: char) -> Result<Ipv4Addr, NetConfigError> {
    scanner::consume(s, b" \t");
    scanner::parse_ipv4(s).ok_or(NetConfigError::Address { field })
}

/// Six hex bytes, each pair followed by any one separator byte.
fn parse_mac<S: ByteStream + ?Sized>(s: &mut S) -> Result<[u8; 6], NetConfigError> {
    scanner::consume(s, b" \t");

    let mut mac = [0u8; 6];
    for (i, byte) in mac.iter_mut().enumerate() {
        if !s.peek().is_some_and(|b| scanner::hex_digit(b).is_some()) {
            return Err(NetConfigError::HardwareAddress);
        }
        *byte = (scanner::parse_hex(s) & 0xff) as u8;
        if i < 5 && s.next_byte().is_none() {
            return Err(NetConfigError::HardwareAddress);
        }
    }
    Ok(mac)
}
