//! The daemon's application layer: captured arguments and page variables.
//!
//! Query arguments live for one request. Form arguments are kept until the
//! next `POST` that sets them again, so a page can show what was last
//! submitted.

use std::borrow::Cow;
use std::io::Write;

use tracing::debug;

use crate::config::Config;
use crate::http::WEBROOT;
use crate::http::args::{ArgHandler, ArgTable, VALUE_SEPARATORS};
use crate::http::buffer::BoundedBuf;
use crate::http::connection::Connection;
use crate::http::response::{StatusCode, Substitute};
use crate::http::scanner;
use crate::http::stream::ByteStream;
use crate::storage::Storage;

/// Longest argument value kept.
pub const MAX_VALUE_LEN: usize = 64;

/// Decoded argument values, indexed like their name table.
#[derive(Debug, Clone, Default)]
pub struct VarStore {
    values: Vec<Option<String>>,
}

impl VarStore {
    pub fn with_len(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index)?.as_deref()
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = None);
    }
}

impl ArgHandler for VarStore {
    fn handle(&mut self, index: usize, value: &mut dyn ByteStream) {
        let mut buf = BoundedBuf::<MAX_VALUE_LEN>::new();
        if !scanner::copy_to(value, VALUE_SEPARATORS, &mut buf) {
            debug!("Argument {} truncated to {} bytes", index, MAX_VALUE_LEN);
        }
        buf.url_decode();

        if let Some(slot) = self.values.get_mut(index) {
            *slot = Some(String::from_utf8_lossy(buf.as_bytes()).into_owned());
        }
    }
}

/// Resolves `%name%` for one page.
///
/// Built-ins: `uri` (the page path without the webroot), `server`, and
/// `%%`, which yields a literal `%`. Other names are looked up among the
/// query arguments, then the form arguments; unknown names render empty.
pub struct PageVars<'s> {
    pub server_name: &'s str,
    pub query_names: &'s [String],
    pub query: &'s VarStore,
    pub form_names: &'s [String],
    pub form: &'s VarStore,
}

fn find<'v>(names: &[String], store: &'v VarStore, name: &str) -> Option<&'v str> {
    let index = names.iter().position(|n| n == name)?;
    store.get(index)
}

impl PageVars<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        find(self.query_names, self.query, name).or_else(|| find(self.form_names, self.form, name))
    }
}

impl Substitute for PageVars<'_> {
    fn substitute<'a>(&'a mut self, name: &str, uri: &str) -> Cow<'a, str> {
        match name {
            "" => Cow::Borrowed("%"),
            "uri" => Cow::Owned(uri.strip_prefix(WEBROOT).unwrap_or(uri).to_string()),
            "server" => Cow::Borrowed(self.server_name),
            _ => match self.lookup(name) {
                Some(value) => Cow::Borrowed(value),
                None => {
                    debug!("No value for %{}%", name);
                    Cow::Borrowed("")
                }
            },
        }
    }
}

/// Application state shared by every connection the daemon serves.
#[derive(Debug, Clone)]
pub struct Site {
    server_name: String,
    query_names: Vec<String>,
    form_names: Vec<String>,
    query: VarStore,
    form: VarStore,
}

impl Site {
    pub fn new(server_name: impl Into<String>, query_names: Vec<String>, form_names: Vec<String>) -> Self {
        Self {
            server_name: server_name.into(),
            query: VarStore::with_len(query_names.len()),
            form: VarStore::with_len(form_names.len()),
            query_names,
            form_names,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.server.name.clone(),
            cfg.variables.query.clone(),
            cfg.variables.form.clone(),
        )
    }

    /// Last submitted value of form argument `name`.
    pub fn form_value(&self, name: &str) -> Option<&str> {
        find(&self.form_names, &self.form, name)
    }

    /// Serve one request on `conn`.
    pub fn serve<S, W, St>(&mut self, conn: &mut Connection<S, W>, storage: &St) -> anyhow::Result<StatusCode>
    where
        S: ByteStream,
        W: Write,
        St: Storage,
    {
        self.query.clear();

        let query_names: Vec<&str> = self.query_names.iter().map(String::as_str).collect();
        let form_names: Vec<&str> = self.form_names.iter().map(String::as_str).collect();

        let request = {
            let mut query = ArgTable::new(&query_names, &mut self.query);
            let mut form = ArgTable::new(&form_names, &mut self.form);
            conn.read_request(Some(&mut query), Some(&mut form))
        };

        let mut vars = PageVars {
            server_name: &self.server_name,
            query_names: &self.query_names,
            query: &self.query,
            form_names: &self.form_names,
            form: &self.form,
        };
        conn.respond(&request, storage, &self.server_name, Some(&mut vars))
    }
}
