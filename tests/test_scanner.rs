use std::net::Ipv4Addr;

use tinyhttpd::http::buffer::BoundedBuf;
use tinyhttpd::http::scanner::{self, Stop, WHITESPACE};
use tinyhttpd::http::stream::{ByteStream, PeekReader};

fn stream(bytes: &[u8]) -> PeekReader<&[u8]> {
    PeekReader::new(bytes)
}

#[test]
fn test_tokenize_stops_at_separator() {
    let mut s = stream(b"GET /index.htm");
    let mut out = BoundedBuf::<16>::new();

    assert_eq!(scanner::tokenize(&mut s, WHITESPACE, &mut out), Stop::Separator(b' '));
    assert_eq!(out, "GET");
    // separator consumed
    assert_eq!(s.peek(), Some(b'/'));
}

#[test]
fn test_tokenize_picks_first_of_several_separators() {
    let mut s = stream(b"/page?x=1 HTTP/1.1");
    let mut out = BoundedBuf::<16>::new();

    assert_eq!(scanner::tokenize(&mut s, b"? ", &mut out), Stop::Separator(b'?'));
    assert_eq!(out, "/page");
}

#[test]
fn test_tokenize_reports_full_buffer() {
    let mut s = stream(b"abcdefgh ");
    let mut out = BoundedBuf::<4>::new();

    assert_eq!(scanner::tokenize(&mut s, WHITESPACE, &mut out), Stop::Full);
    assert_eq!(out, "abcd");
    assert!(out.is_full());
    // separator not reached yet
    assert_eq!(s.peek(), Some(b'e'));
}

#[test]
fn test_tokenize_exact_fit_still_finds_separator() {
    let mut s = stream(b"abcd efg");
    let mut out = BoundedBuf::<4>::new();

    assert_eq!(scanner::tokenize(&mut s, WHITESPACE, &mut out), Stop::Separator(b' '));
    assert_eq!(out, "abcd");
}

#[test]
fn test_tokenize_end_of_stream() {
    let mut s = stream(b"tail");
    let mut out = BoundedBuf::<16>::new();

    assert_eq!(scanner::tokenize(&mut s, WHITESPACE, &mut out), Stop::End);
    assert_eq!(out, "tail");
}

#[test]
fn test_tokenize_empty_token() {
    let mut s = stream(b"\r\nrest");
    let mut out = BoundedBuf::<16>::new();

    assert_eq!(scanner::tokenize(&mut s, WHITESPACE, &mut out), Stop::Separator(b'\r'));
    assert!(out.is_empty());
}

#[test]
fn test_copy_to_leaves_separator() {
    let mut s = stream(b"value&next");
    let mut out = BoundedBuf::<16>::new();

    assert!(scanner::copy_to(&mut s, b"& ", &mut out));
    assert_eq!(out, "value");
    assert_eq!(s.peek(), Some(b'&'));
}

#[test]
fn test_copy_to_skips_overflow() {
    let mut s = stream(b"0123456789 HTTP");
    let mut out = BoundedBuf::<4>::new();

    assert!(!scanner::copy_to(&mut s, b"& ", &mut out));
    assert_eq!(out, "0123");
    assert_eq!(s.peek(), Some(b' '));
}

#[test]
fn test_consume_and_consume_to() {
    let mut s = stream(b"   word;rest");
    scanner::consume(&mut s, b" ");
    assert_eq!(s.peek(), Some(b'w'));

    scanner::consume_to(&mut s, b";");
    assert_eq!(s.peek(), Some(b';'));
}

#[test]
fn test_parse_decimal() {
    let mut s = stream(b"1234\r\n");
    assert_eq!(scanner::parse_decimal(&mut s), 1234);
    assert_eq!(s.peek(), Some(b'\r'));
}

#[test]
fn test_parse_decimal_without_digits_consumes_nothing() {
    let mut s = stream(b"x12");
    assert_eq!(scanner::parse_decimal(&mut s), 0);
    assert_eq!(scanner::parse_decimal(&mut s), 0);
    assert_eq!(s.peek(), Some(b'x'));
}

#[test]
fn test_parse_hex_either_case() {
    let mut s = stream(b"aF:");
    assert_eq!(scanner::parse_hex(&mut s), 0xaf);
    assert_eq!(s.peek(), Some(b':'));

    let mut s = stream(b"zz");
    assert_eq!(scanner::parse_hex(&mut s), 0);
    assert_eq!(s.peek(), Some(b'z'));
}

#[test]
fn test_parse_ipv4() {
    let mut s = stream(b"192.168.1.1\n");
    assert_eq!(scanner::parse_ipv4(&mut s), Some(Ipv4Addr::new(192, 168, 1, 1)));
    assert_eq!(s.peek(), Some(b'\n'));
}

#[test]
fn test_parse_ipv4_needs_four_octets() {
    let mut s = stream(b"1.2.3");
    assert_eq!(scanner::parse_ipv4(&mut s), None);

    let mut s = stream(b"10.0 0.1");
    assert_eq!(scanner::parse_ipv4(&mut s), None);
}

#[test]
fn test_skip_line_handles_crlf_and_lf() {
    let mut s = stream(b"HTTP/1.1\r\nHost: x\n\rnext");
    scanner::skip_line(&mut s);
    assert_eq!(s.peek(), Some(b'H'));

    scanner::skip_line(&mut s);
    // the '\r' right after '\n' goes too
    assert_eq!(s.peek(), Some(b'n'));
}

#[test]
fn test_lookup() {
    let table = ["GET", "POST", "HEAD"];
    assert_eq!(scanner::lookup(b"POST", &table), Some(1));
    assert_eq!(scanner::lookup(b"PUT", &table), None);
    assert_eq!(scanner::lookup(b"get", &table), None);
}

#[test]
fn test_lookup_first_match_wins() {
    let table = ["a", "b", "a"];
    assert_eq!(scanner::lookup(b"a", &table), Some(0));
}
