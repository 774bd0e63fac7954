//! `key=value&key=value` argument lists, from a query string or a form body.

use tracing::debug;

use crate::http::VarName;
use crate::http::scanner;
use crate::http::stream::{ByteStream, Limited};

/// Bytes that end an argument name.
pub const NAME_SEPARATORS: &[u8] = b"=& \n\r";

/// Bytes that end an argument value.
pub const VALUE_SEPARATORS: &[u8] = b"& \n\r";

/// Receives the value of a recognized argument.
///
/// `index` is the position of the name in the [`ArgTable`]. The handler
/// must consume the value bytes and nothing more: when it returns, the next
/// byte of `value` has to be a value separator (`&` or whitespace) or the
/// end of the stream. [`scanner::copy_to`] with [`VALUE_SEPARATORS`] does
/// exactly that.
pub trait ArgHandler {
    fn handle(&mut self, index: usize, value: &mut dyn ByteStream);
}

/// Caller-owned list of recognized argument names and the handler for them.
pub struct ArgTable<'a> {
    names: &'a [&'a str],
    handler: &'a mut dyn ArgHandler,
}

impl<'a> ArgTable<'a> {
    pub fn new(names: &'a [&'a str], handler: &'a mut dyn ArgHandler) -> Self {
        Self { names, handler }
    }
}

/// Parse an argument list from `s`, dispatching recognized names to the
/// table's handler.
///
/// Stops at whitespace, at an empty name or at end of stream, leaving the
/// byte that ended the list in the stream. Unknown names are skipped along
/// with their value. Without a table (or with an empty one) everything up
/// to the next whitespace is discarded.
///
/// Returns the number of handler calls made.
pub fn parse_args<S>(s: &mut S, table: Option<&mut ArgTable<'_>>) -> usize
where
    S: ByteStream + ?Sized,
{
    let mut s = s;
    let Some(table) = table.filter(|t| !t.names.is_empty()) else {
        scanner::consume_to(&mut s, scanner::WHITESPACE);
        return 0;
    };

    let mut name = VarName::new();
    let mut dispatched = 0;

    while s.available() {
        let fits = scanner::copy_to(&mut s, NAME_SEPARATORS, &mut name);
        let sep = match s.peek() {
            Some(sep @ (b'=' | b'&')) if !name.is_empty() => sep,
            _ => break,
        };
        s.next_byte();

        // A truncated name must not match a shorter table entry.
        let index = if fits {
            scanner::lookup(name.as_bytes(), table.names)
        } else {
            None
        };

        match (index, sep) {
            (Some(i), b'=') => {
                table.handler.handle(i, &mut s);
                dispatched += 1;
            }
            (Some(i), _) => {
                let mut empty = Limited::new(&mut s, 0);
                table.handler.handle(i, &mut empty);
                dispatched += 1;
            }
            (None, b'=') => {
                debug!("Ignoring argument {}", name);
                scanner::consume_to(&mut s, VALUE_SEPARATORS);
            }
            (None, _) => {
                debug!("Ignoring argument {}", name);
            }
        }

        if sep == b'=' && s.peek() == Some(b'&') {
            s.next_byte();
        }
    }

    dispatched
}

/// Decode `%XY` escapes and `+` in place, returning the decoded length.
///
/// An escape without two hex digits ends the string: a `?` is written in
/// its place and everything after it is dropped.
pub fn url_decode(buf: &mut [u8]) -> usize {
    let mut read = 0;
    let mut write = 0;

    while read < buf.len() {
        match buf[read] {
            b'%' => {
                let hi = buf.get(read + 1).copied().and_then(scanner::hex_digit);
                let lo = buf.get(read + 2).copied().and_then(scanner::hex_digit);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        buf[write] = (hi << 4) | lo;
                        read += 3;
                    }
                    _ => {
                        buf[write] = b'?';
                        return write + 1;
                    }
                }
            }
            b'+' => {
                buf[write] = b' ';
                read += 1;
            }
            b => {
                buf[write] = b;
                read += 1;
            }
        }
        write += 1;
    }

    write
}
