use std::borrow::Cow;
use std::io::{self, Write};

use crate::http::VarName;
use crate::http::request::Method;
use crate::http::scanner::{self, Stop};
use crate::http::writer::{HTTP_10, HTTP_11, ResponseWriter};
use crate::storage::StoredFile;

/// HTTP status codes the server sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use tinyhttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// Supplies the text for a `%name%` placeholder in a text page.
///
/// `uri` is the full path of the page being rendered.
pub trait Substitute {
    fn substitute<'a>(&'a mut self, name: &str, uri: &str) -> Cow<'a, str>;
}

/// How a file is sent, chosen by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind<'a> {
    /// `text/<subtype>`, streamed with variable substitution.
    Text(&'a str),
    /// `image/<subtype>`, streamed verbatim with a `Content-Length`.
    Image(&'static str),
}

impl<'a> ContentKind<'a> {
    /// Classify `path` by the extension of its last segment.
    ///
    /// ```
    /// # use tinyhttpd::http::response::ContentKind;
    /// assert_eq!(ContentKind::of("/web/logo.png"), ContentKind::Image("png"));
    /// assert_eq!(ContentKind::of("/web/index.htm"), ContentKind::Text("html"));
    /// assert_eq!(ContentKind::of("/web/style.css"), ContentKind::Text("css"));
    /// ```
    pub fn of(path: &'a str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        match name.rsplit_once('.').map(|(_, ext)| ext) {
            Some("jpg") => ContentKind::Image("jpeg"),
            Some("png") => ContentKind::Image("png"),
            Some("ico") => ContentKind::Image("x-icon"),
            Some("htm") => ContentKind::Text("html"),
            Some(ext) if !ext.is_empty() => ContentKind::Text(ext),
            _ => ContentKind::Text("plain"),
        }
    }
}

/// Writes pages and error pages for one response.
pub struct Renderer<'a, 'v> {
    server_name: &'a str,
    vars: Option<&'v mut dyn Substitute>,
}

impl<'a, 'v> Renderer<'a, 'v> {
    pub fn new(server_name: &'a str, vars: Option<&'v mut dyn Substitute>) -> Self {
        Self { server_name, vars }
    }

    /// Send `file`, stored at `uri`, as a 200 response.
    ///
    /// Text pages go out with no-cache headers and every `%name%` (up to
    /// [`crate::http::MAX_VAR_LEN`] bytes between the markers) replaced
    /// through the [`Substitute`] hook, if one is set. A `%` without a
    /// closing marker in range is sent as-is. Images are sent verbatim.
    /// `HEAD` gets the headers only.
    pub fn send_page<W, F>(
        &mut self,
        out: &mut ResponseWriter<W>,
        uri: &str,
        method: Method,
        file: &mut F,
    ) -> io::Result<()>
    where
        W: Write,
        F: StoredFile,
    {
        match ContentKind::of(uri) {
            ContentKind::Image(subtype) => {
                out.status_line(HTTP_11, StatusCode::Ok)?;
                out.header("Server", self.server_name)?;
                out.header("Content-Length", file.size())?;
                out.header("Content-Type", format_args!("image/{}", subtype))?;
                out.end_headers()?;
                if method != Method::Head {
                    while let Some(b) = file.next_byte() {
                        out.write_byte(b)?;
                    }
                }
            }
            ContentKind::Text(subtype) => {
                out.status_line(HTTP_10, StatusCode::Ok)?;
                out.header("Server", self.server_name)?;
                out.header("Cache-Control", "no-store, no-cache, must-revalidate")?;
                out.header("Pragma", "no-cache")?;
                out.header("Connection", "close")?;
                out.header("Content-Type", format_args!("text/{}", subtype))?;
                out.end_headers()?;
                if method != Method::Head {
                    self.stream_text(out, uri, file)?;
                }
            }
        }
        Ok(())
    }

    fn stream_text<W, F>(&mut self, out: &mut ResponseWriter<W>, uri: &str, file: &mut F) -> io::Result<()>
    where
        W: Write,
        F: StoredFile,
    {
        let mut name = VarName::new();

        while let Some(b) = file.next_byte() {
            let Some(vars) = self.vars.as_deref_mut().filter(|_| b == b'%') else {
                out.write_byte(b)?;
                continue;
            };

            match (scanner::tokenize(file, b"%", &mut name), name.as_str()) {
                (Stop::Separator(_), Some(var)) => {
                    let text = vars.substitute(var, uri);
                    out.write_all(text.as_bytes())?;
                }
                (Stop::Separator(_), None) => {
                    out.write_byte(b'%')?;
                    out.write_all(name.as_bytes())?;
                    out.write_byte(b'%')?;
                }
                _ => {
                    out.write_byte(b'%')?;
                    out.write_all(name.as_bytes())?;
                }
            }
        }
        Ok(())
    }

    /// Send the 404 page for `path`, which must already be stripped of the
    /// webroot prefix.
    pub fn send_not_found<W: Write>(&mut self, out: &mut ResponseWriter<W>, path: &[u8]) -> io::Result<()> {
        out.status_line(HTTP_11, StatusCode::NotFound)?;
        out.header("Server", self.server_name)?;
        out.header("Content-Type", "text/html")?;
        out.end_headers()?;
        out.write_all(b"<html><head><title>Error 404</title></head><body><h1>Error 404: Sorry, page '")?;
        write_escaped(out, path)?;
        out.write_all(b"' cannot be found!</h1></body>\r\n")
    }

    /// Send a bare 500 response, for a page that exists but cannot be read.
    pub fn send_internal_error<W: Write>(&mut self, out: &mut ResponseWriter<W>) -> io::Result<()> {
        out.status_line(HTTP_11, StatusCode::InternalServerError)?;
        out.header("Server", self.server_name)?;
        out.header("Content-Type", "text/html")?;
        out.end_headers()?;
        out.write_all(b"<html><body><h1>Error 500</h1></body>\r\n")
    }
}

fn write_escaped<W: Write>(out: &mut ResponseWriter<W>, text: &[u8]) -> io::Result<()> {
    for &b in text {
        match b {
            b'<' => out.write_all(b"&lt;")?,
            b'>' => out.write_all(b"&gt;")?,
            b'&' => out.write_all(b"&amp;")?,
            b'\'' => out.write_all(b"&#39;")?,
            b'"' => out.write_all(b"&quot;")?,
            _ => out.write_byte(b)?,
        }
    }
    Ok(())
}
