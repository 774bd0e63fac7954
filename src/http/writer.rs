use std::fmt::Display;
use std::io::{self, Write};

use crate::http::response::StatusCode;

pub const HTTP_10: &str = "HTTP/1.0";
pub const HTTP_11: &str = "HTTP/1.1";

/// Serializes a response onto a byte sink as it is produced.
///
/// Nothing is buffered here; callers that write to a socket wrap it in a
/// `BufWriter`.
pub struct ResponseWriter<W> {
    out: W,
    written: usize,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn status_line(&mut self, version: &str, status: StatusCode) -> io::Result<()> {
        let line = format!(
            "{} {} {}\r\n",
            version,
            status.as_u16(),
            status.reason_phrase()
        );
        self.write_all(line.as_bytes())
    }

    pub fn header(&mut self, name: &str, value: impl Display) -> io::Result<()> {
        let line = format!("{}: {}\r\n", name, value);
        self.write_all(line.as_bytes())
    }

    /// Header/body separator.
    pub fn end_headers(&mut self) -> io::Result<()> {
        self.write_all(b"\r\n")
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    /// Bytes written so far, headers included.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
