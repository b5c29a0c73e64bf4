//! Data model for allow-list entries
//!
//! Both remote collections hold single-host CIDRs whose description field
//! doubles as the creation-order signal. The remote APIs expose no native
//! creation time, so every entry this system writes begins its description
//! with a sortable timestamp. That convention is a hard precondition for
//! eviction correctness: lexical order on `description` must equal creation
//! order for every managed entry.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A single admitted network address in a remote allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowEntry {
    /// Single-host CIDR (`/32` for IPv4, `/128` for IPv6)
    pub cidr: String,

    /// Opaque, sortable string encoding creation order.
    /// Rule sets use a Unix timestamp prefix; prefix lists use ISO-8601 UTC.
    pub description: String,
}

/// A security-group rule as the control plane reports it
///
/// Unlike [`AllowEntry`], rules carry the provider-assigned identifier
/// needed for revocation, and their description may be absent entirely
/// (rules written by other tools). Rules without a description are never
/// eviction candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Provider-assigned rule identifier (used for revocation)
    pub rule_id: String,

    /// Single-host CIDR the rule admits
    pub cidr: String,

    /// Description, if the rule has one
    pub description: Option<String>,

    /// Whether this is an egress rule (egress rules are never managed)
    pub is_egress: bool,
}

/// Express a bare IP address as the single-host CIDR this system writes
pub fn host_cidr(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => format!("{}/32", v4),
        IpAddr::V6(v6) => format!("{}/128", v6),
    }
}

/// Process/host metadata embedded into every entry description
///
/// This metadata is functionally part of the persisted remote state, not
/// just a log line: it is how operators attribute an allow-list entry back
/// to the process that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Project name (e.g., repository or deployment name)
    pub project: String,

    /// Instance identifier (e.g., container or worker name)
    pub instance: String,

    /// Hostname of the calling machine
    pub hostname: String,
}

impl CallerIdentity {
    /// Create an identity from explicit values
    pub fn new(
        project: impl Into<String>,
        instance: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            instance: instance.into(),
            hostname: hostname.into(),
        }
    }

    /// Load identity from the environment
    ///
    /// Reads `ALLOWSYNC_PROJECT`, `ALLOWSYNC_INSTANCE` and `HOSTNAME`,
    /// defaulting each missing value to `"unknown"`.
    pub fn from_env() -> Self {
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load identity from an arbitrary key lookup (testable form of
    /// [`CallerIdentity::from_env`])
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).unwrap_or_else(|| "unknown".to_string());

        Self {
            project: get("ALLOWSYNC_PROJECT"),
            instance: get("ALLOWSYNC_INSTANCE"),
            hostname: get("HOSTNAME"),
        }
    }

    /// The metadata suffix appended to every entry description
    pub fn tag(&self) -> String {
        format!(
            "allowsync p:{}, i:{}, h:{}",
            self.project, self.instance, self.hostname
        )
    }
}
