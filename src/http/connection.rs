use std::io::Write;

use anyhow::Context;
use tracing::{info, warn};

use crate::http::args::ArgTable;
use crate::http::request::{self, Request};
use crate::http::response::{Renderer, StatusCode, Substitute};
use crate::http::stream::ByteStream;
use crate::http::writer::ResponseWriter;
use crate::http::{DEFAULT_DOCUMENT, Uri, WEBROOT};
use crate::storage::Storage;

/// Capabilities the application plugs into a connection. All optional.
#[derive(Default)]
pub struct Hooks<'a> {
    /// Recognized query-string arguments.
    pub query: Option<ArgTable<'a>>,
    /// Recognized form arguments of a `POST` body.
    pub form: Option<ArgTable<'a>>,
    /// `%name%` substitution for text pages.
    pub vars: Option<&'a mut dyn Substitute>,
}

/// Where a request path ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The file exists; holds the webroot-prefixed path.
    Found(Uri),
    /// Nothing to serve; holds the path as the client should see it.
    Missing(Uri),
}

/// Map a request path to a file path under [`WEBROOT`].
///
/// `/` becomes [`DEFAULT_DOCUMENT`]. A path too long to take the prefix is
/// treated as missing.
pub fn resolve<St: Storage>(request_uri: &Uri, storage: &St) -> Resolved {
    let mut uri = *request_uri;
    if uri == "/" {
        uri.set(DEFAULT_DOCUMENT.as_bytes());
    }

    if !uri.prepend(WEBROOT.as_bytes()) {
        return Resolved::Missing(uri);
    }

    match uri.as_str() {
        Some(path) if storage.exists(path) => Resolved::Found(uri),
        _ => {
            uri.strip_prefix_len(WEBROOT.len());
            Resolved::Missing(uri)
        }
    }
}

/// One accepted client: exactly one request, one response, then close.
pub struct Connection<S, W> {
    input: S,
    output: ResponseWriter<W>,
}

impl<S: ByteStream, W: Write> Connection<S, W> {
    pub fn new(input: S, output: W) -> Self {
        Self {
            input,
            output: ResponseWriter::new(output),
        }
    }

    /// Parse the request, dispatching arguments to the tables given.
    pub fn read_request(
        &mut self,
        query: Option<&mut ArgTable<'_>>,
        form: Option<&mut ArgTable<'_>>,
    ) -> Request {
        request::read_request(&mut self.input, query, form)
    }

    /// Resolve the request against `storage` and send the response.
    ///
    /// Returns the status that was sent.
    pub fn respond<St: Storage>(
        &mut self,
        request: &Request,
        storage: &St,
        server_name: &str,
        vars: Option<&mut dyn Substitute>,
    ) -> anyhow::Result<StatusCode> {
        let mut renderer = Renderer::new(server_name, vars);

        let status = match resolve(&request.uri, storage) {
            Resolved::Found(uri) => {
                // resolve() only reports Found for a valid UTF-8 path.
                let path = uri.as_str().unwrap_or_default();
                match storage.open(path) {
                    Ok(mut file) => {
                        renderer
                            .send_page(&mut self.output, path, request.method, &mut file)
                            .context("failed to send page")?;
                        StatusCode::Ok
                    }
                    Err(e) => {
                        warn!("Cannot open {}: {}", path, e);
                        renderer
                            .send_internal_error(&mut self.output)
                            .context("failed to send error page")?;
                        StatusCode::InternalServerError
                    }
                }
            }
            Resolved::Missing(uri) => {
                renderer
                    .send_not_found(&mut self.output, uri.as_bytes())
                    .context("failed to send 404 page")?;
                StatusCode::NotFound
            }
        };

        self.output.flush().context("failed to flush response")?;
        info!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.uri,
            status.as_u16(),
            self.output.written()
        );
        Ok(status)
    }

    /// Run the whole cycle with `hooks`.
    pub fn run<St: Storage>(&mut self, storage: &St, server_name: &str, hooks: Hooks<'_>) -> anyhow::Result<StatusCode> {
        let Hooks {
            mut query,
            mut form,
            vars,
        } = hooks;
        let request = self.read_request(query.as_mut(), form.as_mut());
        self.respond(&request, storage, server_name, vars)
    }

    pub fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    pub fn into_parts(self) -> (S, W) {
        (self.input, self.output.into_inner())
    }
}
