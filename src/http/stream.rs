use std::io::{self, ErrorKind, Read};

/// A forward-only byte source with one byte of lookahead.
///
/// Every parser in this crate is written against this trait, so the same
/// state machines run over a socket, a file on disk or a byte slice in a
/// test. Implementations block inside `peek`/`next_byte` until a byte is
/// available or the source is exhausted.
pub trait ByteStream {
    /// Look at the current byte without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Consume the current byte.
    ///
    /// Returns `None` at end of stream.
    fn next_byte(&mut self) -> Option<u8>;

    /// Whether there is at least one more byte to read.
    fn available(&mut self) -> bool {
        self.peek().is_some()
    }
}

impl<S: ByteStream + ?Sized> ByteStream for &mut S {
    fn peek(&mut self) -> Option<u8> {
        (**self).peek()
    }

    fn next_byte(&mut self) -> Option<u8> {
        (**self).next_byte()
    }

    fn available(&mut self) -> bool {
        (**self).available()
    }
}

/// Adapts any [`Read`] into a [`ByteStream`].
///
/// Reads one byte at a time and holds at most one byte of lookahead, so
/// nothing past the current request is pulled off the wire. Read errors
/// end the stream; the last one is kept for the owner to inspect.
pub struct PeekReader<R> {
    inner: R,
    lookahead: Option<u8>,
    eof: bool,
    error: Option<io::Error>,
}

impl<R: Read> PeekReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: None,
            eof: false,
            error: None,
        }
    }

    /// Take the error that ended the stream, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) {
        if self.lookahead.is_some() || self.eof {
            return;
        }

        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.eof = true;
                    return;
                }
                Ok(_) => {
                    self.lookahead = Some(byte[0]);
                    return;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.eof = true;
                    self.error = Some(e);
                    return;
                }
            }
        }
    }
}

impl<R: Read> ByteStream for PeekReader<R> {
    fn peek(&mut self) -> Option<u8> {
        self.fill();
        self.lookahead
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.fill();
        self.lookahead.take()
    }
}

/// A view of at most `remaining` bytes of another stream.
///
/// Used for request bodies: once `Content-Length` bytes are consumed the
/// view reports end of stream even if the peer keeps the socket open.
pub struct Limited<S> {
    inner: S,
    remaining: usize,
}

impl<S: ByteStream> Limited<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        Self {
            inner,
            remaining: limit,
        }
    }

    /// Bytes left before the view is exhausted.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl<S: ByteStream> ByteStream for Limited<S> {
    fn peek(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        self.inner.peek()
    }

    fn next_byte(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let b = self.inner.next_byte()?;
        self.remaining -= 1;
        Some(b)
    }
}
