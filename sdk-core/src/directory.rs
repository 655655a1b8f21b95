//! Directory lookup collaborator
//!
//! The SDK never opens a connection itself; everything it reads comes
//! through [`DirectoryClient`], the seam where an LDAP transport (or a test
//! double) is plugged in.

use std::collections::HashMap;

use crate::error::Result;

/// One directory entry: its (relative) distinguished name and a single
/// string value per attribute. Multi-valued attributes are reduced to their
/// first value by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub attributes: HashMap<String, String>,
}

impl DirectoryEntry {
    pub fn new(name: impl Into<String>, attributes: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Read-only directory operations the policy sources are driven by.
///
/// `search` is a one-level search under `base`; transport failures map to
/// [`crate::error::AdPolicyError::SourceUnavailable`].
pub trait DirectoryClient: Send + Sync {
    fn lookup(&self, base: &str, attributes: &[&str]) -> Result<Option<DirectoryEntry>>;

    fn search(&self, base: &str, filter: &str, attributes: &[&str])
        -> Result<Vec<DirectoryEntry>>;
}

/// Lower-cased leftmost RDN of a DN string, the key under which a PSO is
/// filed (`cn=xxx`). `None` when the DN is empty.
pub fn leaf_rdn(dn: &str) -> Option<String> {
    dn.split(',')
        .next()
        .map(str::trim)
        .filter(|rdn| !rdn.is_empty())
        .map(str::to_lowercase)
}
