use std::fmt;

use tracing::debug;

use crate::http::args::{self, ArgTable};
use crate::http::buffer::BoundedBuf;
use crate::http::scanner::{self, Stop, WHITESPACE};
use crate::http::stream::{ByteStream, Limited};
use crate::http::{MAX_URI_LEN, Uri};

/// Method names in table order. The position of a name is its [`Method`].
pub const METHODS: [&str; 3] = ["GET", "POST", "HEAD"];

/// Bytes that end the path part of a request URI.
pub const URI_SEPARATORS: &[u8] = b"? \n\r";

const CONTENT_LENGTH: &str = "Content-Length:";

/// HTTP request methods understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Head,
    /// Any token not in [`METHODS`]. Served like `Get`.
    Unknown,
}

impl Method {
    /// Resolve a method token. Matching is exact and case-sensitive.
    ///
    /// ```
    /// # use tinyhttpd::http::request::Method;
    /// assert_eq!(Method::from_token(b"POST"), Method::Post);
    /// assert_eq!(Method::from_token(b"post"), Method::Unknown);
    /// ```
    pub fn from_token(token: &[u8]) -> Self {
        match scanner::lookup(token, &METHODS) {
            Some(0) => Method::Get,
            Some(1) => Method::Post,
            Some(2) => Method::Head,
            _ => Method::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What was kept of a request after parsing.
///
/// Everything else (protocol version, headers other than `Content-Length`,
/// arguments) is either dispatched to handlers while parsing or dropped.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Root-relative path, without the query string.
    pub uri: Uri,
    pub content_length: u32,
}

/// One header line, as seen by [`read_header`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// The blank line that ends the header section (or end of stream).
    End,
    ContentLength(u32),
    /// Any other header. Its content has been discarded.
    Other,
}

/// Finish the current line after a token that stopped at `stop`.
///
/// If the token already ended on `\n` the line is done and only a `\r`
/// right after it is dropped.
fn finish_line<S: ByteStream + ?Sized>(s: &mut S, stop: Stop) {
    match stop {
        Stop::Separator(b'\n') => {
            if s.peek() == Some(b'\r') {
                s.next_byte();
            }
        }
        Stop::End => {}
        _ => scanner::skip_line(s),
    }
}

/// Read the request line: method, path, optional query string. The
/// protocol version is discarded.
///
/// The path goes into `uri`, truncated to its capacity. A query string is
/// handed to [`args::parse_args`] with the `query` table.
pub fn read_request_line<S>(s: &mut S, uri: &mut Uri, query: Option<&mut ArgTable<'_>>) -> Method
where
    S: ByteStream + ?Sized,
{
    let mut token = BoundedBuf::<MAX_URI_LEN>::new();
    let method = match scanner::tokenize(s, WHITESPACE, &mut token) {
        Stop::Full => {
            scanner::consume_to(s, WHITESPACE);
            s.next_byte();
            Method::Unknown
        }
        _ => Method::from_token(token.as_bytes()),
    };
    if method == Method::Unknown {
        debug!("Unrecognized method {}", token);
    }

    let stop = match scanner::tokenize(s, URI_SEPARATORS, uri) {
        Stop::Full => {
            // Path longer than the buffer: drop the rest, land on the separator.
            scanner::consume_to(s, URI_SEPARATORS);
            match s.next_byte() {
                Some(b) => Stop::Separator(b),
                None => Stop::End,
            }
        }
        other => other,
    };

    // "/page?" with nothing after it carries no query.
    if stop == Stop::Separator(b'?') && s.peek() != Some(b' ') {
        args::parse_args(s, query);
        let end = match s.next_byte() {
            Some(b) => Stop::Separator(b),
            None => Stop::End,
        };
        finish_line(s, end);
    } else {
        finish_line(s, stop);
    }

    method
}

/// Read one header line, recognizing only `Content-Length`.
pub fn read_header<S: ByteStream + ?Sized>(s: &mut S) -> HeaderLine {
    let mut name = BoundedBuf::<MAX_URI_LEN>::new();
    let stop = scanner::tokenize(s, WHITESPACE, &mut name);

    if name.is_empty() {
        if stop == Stop::Separator(b'\r') && s.peek() == Some(b'\n') {
            s.next_byte();
        }
        return HeaderLine::End;
    }

    let line = if stop != Stop::Full && name == CONTENT_LENGTH {
        scanner::consume(s, b" \t");
        HeaderLine::ContentLength(scanner::parse_decimal(s))
    } else {
        HeaderLine::Other
    };

    finish_line(s, stop);
    line
}

/// Read a full request: request line, headers and, for a `POST` with a
/// body, the form arguments.
///
/// The body is read through a [`Limited`] view of `Content-Length` bytes;
/// whatever the form parser leaves of it is drained.
pub fn read_request<S>(
    s: &mut S,
    query: Option<&mut ArgTable<'_>>,
    form: Option<&mut ArgTable<'_>>,
) -> Request
where
    S: ByteStream + ?Sized,
{
    let mut uri = Uri::new();
    let method = read_request_line(s, &mut uri, query);

    let mut content_length = 0;
    loop {
        match read_header(s) {
            HeaderLine::End => break,
            HeaderLine::ContentLength(n) => content_length = n,
            HeaderLine::Other => {}
        }
    }
    debug!("{} {} content-length={}", method, uri, content_length);

    if method == Method::Post && content_length > 0 {
        let mut body = Limited::new(&mut *s, content_length as usize);
        args::parse_args(&mut body, form);
        while body.next_byte().is_some() {}
    }

    Request {
        method,
        uri,
        content_length,
    }
}
