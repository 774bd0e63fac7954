use std::fmt;

use crate::http::args::url_decode;

/// A fixed-capacity byte buffer that truncates instead of growing.
///
/// Lives inline (no heap), so tokens from the wire and from stored pages can
/// be captured on the stack of a single request.
#[derive(Clone, Copy)]
pub struct BoundedBuf<const N: usize> {
    data: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedBuf<N> {
    pub const CAPACITY: usize = N;

    pub const fn new() -> Self {
        Self {
            data: [0; N],
            len: 0,
        }
    }

    /// Append one byte. Returns `false`, leaving the buffer unchanged, when
    /// it is already full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.len == N {
            return false;
        }
        self.data[self.len] = byte;
        self.len += 1;
        true
    }

    /// Append as much of `bytes` as fits. Returns `false` if anything was cut.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> bool {
        bytes.iter().all(|&b| self.push(b))
    }

    /// Insert `prefix` in front of the current contents.
    ///
    /// Returns `false` and leaves the buffer untouched if the result would
    /// not fit.
    pub fn prepend(&mut self, prefix: &[u8]) -> bool {
        let total = prefix.len() + self.len;
        if total > N {
            return false;
        }
        self.data.copy_within(0..self.len, prefix.len());
        self.data[..prefix.len()].copy_from_slice(prefix);
        self.len = total;
        true
    }

    /// Replace the contents with `bytes`, truncating to capacity.
    pub fn set(&mut self, bytes: &[u8]) -> bool {
        self.clear();
        self.extend_from_slice(bytes)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// The contents as text, or `None` if they are not valid UTF-8 (for
    /// example a multi-byte sequence cut by truncation).
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// Decode `%XY` escapes and `+` in place. See [`url_decode`].
    pub fn url_decode(&mut self) {
        self.len = url_decode(&mut self.data[..self.len]);
    }

    /// Drop the first `n` bytes.
    pub fn strip_prefix_len(&mut self, n: usize) {
        let n = n.min(self.len);
        self.data.copy_within(n..self.len, 0);
        self.len -= n;
    }
}

impl<const N: usize> Default for BoundedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

// Only the first `len` bytes are meaningful.
impl<const N: usize> PartialEq for BoundedBuf<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Eq for BoundedBuf<N> {}

impl<const N: usize> PartialEq<[u8]> for BoundedBuf<N> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl<const N: usize> PartialEq<&str> for BoundedBuf<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> fmt::Debug for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedBuf<{}>({:?})", N, String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<const N: usize> fmt::Display for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}
