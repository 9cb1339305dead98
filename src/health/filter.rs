//! Proxy/server allow-list filtering.
//!
//! # Design Decisions
//! - Names match exactly, ignoring ASCII case
//! - An empty list is a wildcard for its dimension
//! - Proxy and server checks are independent and combined with AND

use crate::stats::Entry;

/// Optional allow-lists applied before metric emission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    proxies: Vec<String>,
    servers: Vec<String>,
}

impl Filters {
    pub fn new<P, S>(proxies: P, servers: S) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            proxies: proxies.into_iter().map(Into::into).collect(),
            servers: servers.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the entry passes both allow-lists.
    pub fn includes(&self, entry: &Entry) -> bool {
        self.includes_names(&entry.proxy_name, &entry.server_name)
    }

    pub fn includes_names(&self, proxy: &str, server: &str) -> bool {
        allowed(&self.proxies, proxy) && allowed(&self.servers, server)
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty() && self.servers.is_empty()
    }
}

fn allowed(list: &[String], name: &str) -> bool {
    list.is_empty() || list.iter().any(|f| f.eq_ignore_ascii_case(name))
}
