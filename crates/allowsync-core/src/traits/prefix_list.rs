// # Prefix-List Client Trait
//
// Defines the interface to the managed prefix list side of the remote
// control plane. Every mutation is guarded by an optimistic-concurrency
// version token: the remote increments `version` on each successful
// modify, and rejects a modify whose `current_version` is stale.
//
// ## Error mapping contract
//
// Implementations must map the remote failure classes onto the crate's
// [`Error`](crate::Error) variants:
//
// - stale version token → `Error::VersionMismatch`
// - list temporarily not modifiable → `Error::IncorrectState`
// - entry limit reached → `Error::MaxEntriesExceeded`
// - anything else → `Error::ControlPlane` with the remote code preserved
//
// ## Trust level
//
// Clients are single-shot: one remote call per method, no retries, no
// backoff, no caching of the version token. Retry policy is owned by the
// manager.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::AllowEntry;
use crate::error::Result;

/// Current remote state of a managed prefix list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixListState {
    /// Monotonically increasing version, required as the concurrency
    /// token on the next mutation
    pub version: i64,
}

/// Trait for managed prefix list operations
#[async_trait]
pub trait PrefixListClient: Send + Sync {
    /// Read the prefix list's current state (version token included)
    async fn describe(&self, prefix_list_id: &str) -> Result<PrefixListState>;

    /// List all entries, in whatever order the remote returns
    async fn entries(&self, prefix_list_id: &str) -> Result<Vec<AllowEntry>>;

    /// Issue one atomic modify carrying adds and removes together
    ///
    /// The remote applies `add` and `remove` in a single mutation under
    /// `current_version`, or rejects the whole call. Combining both in one
    /// call is what keeps add+evict atomic under concurrent writers.
    async fn modify(
        &self,
        prefix_list_id: &str,
        current_version: i64,
        add: &[AllowEntry],
        remove: &[String],
    ) -> Result<()>;
}
