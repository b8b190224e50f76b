//! Opaque identifier for one displayed clock instance.
//!
//! The host application assigns every key that shows our action a
//! `context` string. Uniqueness is the host's business; we only compare,
//! hash, and order it.

use serde::{Deserialize, Serialize};

/// Opaque handle naming one displayed instance on the host surface.
///
/// The inner token is never parsed or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceHandle(String);

impl InstanceHandle {
    /// Wrap a host-supplied token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the raw token, e.g. for echoing it back to the host.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceHandle {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for InstanceHandle {
    fn from(token: String) -> Self {
        Self(token)
    }
}
