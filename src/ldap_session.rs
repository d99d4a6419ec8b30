//! ldap3-backed directory connection
//!
//! Wraps an `ldap3::LdapConn` that the host has already connected and bound.
//! Every search is issued against the configured base DN and scope, and the
//! raw result entries are decoded once into [`SearchItem`]s.

use std::time::Duration;

use ldap3::{LdapConn, LdapResult, ResultEntry, Scope, SearchEntry};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::directory::{AttributeValue, DirectoryConnection, Entry, SearchItem};
use crate::errors::{DirectoryError, Result};

/// Search scope, serde-friendly mirror of `ldap3::Scope`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Base,
    OneLevel,
    #[default]
    Subtree,
}

impl From<SearchScope> for Scope {
    fn from(scope: SearchScope) -> Self {
        match scope {
            SearchScope::Base => Scope::Base,
            SearchScope::OneLevel => Scope::OneLevel,
            SearchScope::Subtree => Scope::Subtree,
        }
    }
}

/// Search settings applied to every query on a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapSessionConfig {
    /// Search base, e.g. "DC=corp,DC=example,DC=com"
    pub base_dn: String,
    pub scope: SearchScope,
    /// Per-search timeout; `None` leaves the connection's own behavior in place
    #[serde(with = "optional_secs")]
    pub search_timeout: Option<Duration>,
}

impl LdapSessionConfig {
    pub fn new(base_dn: impl Into<String>) -> Self {
        Self {
            base_dn: base_dn.into(),
            ..Self::default()
        }
    }
}

/// An authenticated ldap3 connection exposed as a [`DirectoryConnection`]
pub struct LdapSession {
    conn: LdapConn,
    config: LdapSessionConfig,
}

impl LdapSession {
    pub fn new(conn: LdapConn, config: LdapSessionConfig) -> Self {
        Self { conn, config }
    }
}

impl DirectoryConnection for LdapSession {
    fn search(&mut self, filter: &str, attributes: &[&str]) -> Result<Vec<SearchItem>> {
        let base_dn = self.config.base_dn.as_str();
        info!("LdapSession::search: Starting search in {} with filter {}", base_dn, filter);

        let conn = match self.config.search_timeout {
            Some(limit) => self.conn.with_timeout(limit),
            None => &mut self.conn,
        };

        let search_result = conn
            .search(base_dn, self.config.scope.into(), filter, attributes)
            .map_err(|e| {
                error!("LdapSession::search: Search failed: {}", e);
                DirectoryError::from_ldap(e, base_dn)
            })?;

        check_result(search_result.0, search_result.1, base_dn)
    }
}

/// Accept or reject a completed search by its result code.
///
/// rc 0 returns every item; sizeLimitExceeded (4) and referral (10) still
/// carry usable entries and return them with a warning.
fn check_result(entries: Vec<ResultEntry>, result: LdapResult, base_dn: &str) -> Result<Vec<SearchItem>> {
    match result.rc {
        0 => {
            info!("LdapSession::search: Search returned {} entries", entries.len());
        }
        4 | 10 => {
            warn!(
                "LdapSession::search: Partial result (rc={}), returning {} entries",
                result.rc,
                entries.len()
            );
        }
        _ => {
            error!(
                "LdapSession::search: Search failed with rc={}: {}",
                result.rc, result.text
            );
            return Err(DirectoryError::from_result(&result, base_dn));
        }
    }

    Ok(entries.into_iter().map(decode_result_entry).collect())
}

/// Decode one raw ldap3 result item
fn decode_result_entry(entry: ResultEntry) -> SearchItem {
    if entry.is_ref() {
        SearchItem::Referral(ldap3::parse_refs(entry.0))
    } else if entry.is_intermediate() {
        SearchItem::Intermediate
    } else {
        SearchItem::Entry(SearchEntry::construct(entry).into())
    }
}

impl From<SearchEntry> for Entry {
    fn from(entry: SearchEntry) -> Self {
        let mut attributes = entry
            .attrs
            .into_iter()
            .map(|(name, values)| {
                (name, values.into_iter().map(AttributeValue::Text).collect::<Vec<_>>())
            })
            .collect::<std::collections::HashMap<_, _>>();

        for (name, values) in entry.bin_attrs {
            attributes
                .entry(name)
                .or_default()
                .extend(values.into_iter().map(AttributeValue::Binary));
        }

        Entry {
            dn: entry.dn,
            attributes,
        }
    }
}

mod optional_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
