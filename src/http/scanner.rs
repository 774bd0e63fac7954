//! Bounded tokenizing primitives over a [`ByteStream`].
//!
//! None of these allocate and none of them fail: a token longer than its
//! buffer is truncated and the caller is told so through [`Stop::Full`].

use std::net::Ipv4Addr;

use crate::http::buffer::BoundedBuf;
use crate::http::stream::ByteStream;

/// Whitespace that ends tokens on a request line or header line.
pub const WHITESPACE: &[u8] = b" \n\r";

/// Why [`tokenize`] stopped copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// A separator was found. It has been consumed from the stream.
    Separator(u8),
    /// The buffer filled up before a separator was seen. The separator is
    /// still ahead in the stream.
    Full,
    /// The stream ended.
    End,
}

/// Copy bytes into `out` until one of `separators` is found.
///
/// `out` is cleared first. When the buffer is full the next byte is still
/// checked, so a token of exactly `N` bytes followed by a separator reports
/// [`Stop::Separator`].
pub fn tokenize<S, const N: usize>(s: &mut S, separators: &[u8], out: &mut BoundedBuf<N>) -> Stop
where
    S: ByteStream + ?Sized,
{
    out.clear();
    loop {
        let Some(b) = s.peek() else {
            return Stop::End;
        };
        if separators.contains(&b) {
            s.next_byte();
            return Stop::Separator(b);
        }
        if !out.push(b) {
            return Stop::Full;
        }
        s.next_byte();
    }
}

/// Copy bytes into `out` up to, but not including, the next separator.
///
/// Unlike [`tokenize`] the separator stays in the stream, and bytes that
/// do not fit are skipped so the cursor always ends on a separator (or at
/// end of stream). Returns `false` if the value was truncated.
pub fn copy_to<S, const N: usize>(s: &mut S, separators: &[u8], out: &mut BoundedBuf<N>) -> bool
where
    S: ByteStream + ?Sized,
{
    out.clear();
    let mut fits = true;
    while let Some(b) = s.peek() {
        if separators.contains(&b) {
            break;
        }
        fits &= out.push(b);
        s.next_byte();
    }
    fits
}

/// Skip bytes while they are in `separators`.
pub fn consume<S: ByteStream + ?Sized>(s: &mut S, separators: &[u8]) {
    while s.peek().is_some_and(|b| separators.contains(&b)) {
        s.next_byte();
    }
}

/// Skip bytes until one in `separators` is next. The separator is not
/// consumed.
pub fn consume_to<S: ByteStream + ?Sized>(s: &mut S, separators: &[u8]) {
    while s.peek().is_some_and(|b| !separators.contains(&b)) {
        s.next_byte();
    }
}

/// Parse a run of ASCII digits. Returns 0 and consumes nothing if the next
/// byte is not a digit.
pub fn parse_decimal<S: ByteStream + ?Sized>(s: &mut S) -> u32 {
    let mut value: u32 = 0;
    while let Some(b @ b'0'..=b'9') = s.peek() {
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
        s.next_byte();
    }
    value
}

/// Decode a single hex digit.
pub fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse a run of hex digits (either case). Returns 0 and consumes nothing
/// if the next byte is not a hex digit.
pub fn parse_hex<S: ByteStream + ?Sized>(s: &mut S) -> u32 {
    let mut value: u32 = 0;
    while let Some(digit) = s.peek().and_then(hex_digit) {
        value = value.wrapping_mul(16).wrapping_add(u32::from(digit));
        s.next_byte();
    }
    value
}

/// Parse a dotted-quad address.
///
/// Each octet is taken modulo 256. An empty octet reads as 0. Returns
/// `None` if a dot is missing between the first four octets. The byte
/// after the last octet is left in the stream.
pub fn parse_ipv4<S: ByteStream + ?Sized>(s: &mut S) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = (parse_decimal(s) & 0xff) as u8;
        if i < 3 {
            if s.peek() != Some(b'.') {
                return None;
            }
            s.next_byte();
        }
    }
    Some(Ipv4Addr::from(octets))
}

/// Discard everything through the next `\n`, plus one `\r` right after it.
pub fn skip_line<S: ByteStream + ?Sized>(s: &mut S) {
    while let Some(b) = s.next_byte() {
        if b == b'\n' {
            break;
        }
    }
    if s.peek() == Some(b'\r') {
        s.next_byte();
    }
}

/// Find `token` in `table` by exact, case-sensitive comparison. The first
/// match wins.
pub fn lookup<T: AsRef<[u8]>>(token: &[u8], table: &[T]) -> Option<usize> {
    table.iter().position(|entry| entry.as_ref() == token)
}
