//! HTTP protocol implementation.
//!
//! A streaming HTTP/1.0-1.1 engine that never buffers a whole request or
//! response. Every token is read straight off a [`stream::ByteStream`] into
//! a fixed-size [`buffer::BoundedBuf`], and pages are streamed from storage
//! to the peer byte by byte.
//!
//! # Architecture
//!
//! - **`stream`**: the byte-source trait plus adapters for `Read` and for bounded bodies
//! - **`buffer`**: fixed-capacity token buffers that truncate instead of growing
//! - **`scanner`**: tokenizing, number and address parsing over a stream
//! - **`request`**: request line and header parsing
//! - **`args`**: `key=value&...` argument dispatch and URL decoding
//! - **`response`**: page rendering with `%name%` substitution, and the 404 page
//! - **`writer`**: status line and header serialization
//! - **`connection`**: the per-connection request/response cycle
//!
//! # Connection lifecycle
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← request line, headers, form body
//!        └──────┬──────┘
//!               │ path resolved under /web
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← page (200) or error page (404)
//!        └──────┬───────────┘
//!               │ response flushed
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← always: one request per connection
//!        └──────────────────┘
//! ```

pub mod args;
pub mod buffer;
pub mod connection;
pub mod request;
pub mod response;
pub mod scanner;
pub mod stream;
pub mod writer;

use buffer::BoundedBuf;

/// Longest path, including the webroot prefix.
pub const MAX_URI_LEN: usize = 31;

/// Longest variable or argument name.
pub const MAX_VAR_LEN: usize = 8;

/// Prefix every request path is resolved under.
pub const WEBROOT: &str = "/web";

/// Served in place of `/`.
pub const DEFAULT_DOCUMENT: &str = "/index.htm";

/// A request path.
pub type Uri = BoundedBuf<MAX_URI_LEN>;

/// An argument name or a `%name%` placeholder.
pub type VarName = BoundedBuf<MAX_VAR_LEN>;
