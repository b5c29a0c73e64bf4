// # Rule-Set Client Trait
//
// Defines the interface to the security-group style side of the remote
// control plane.
//
// ## Error mapping contract
//
// Implementations must map the remote system's failure classes onto the
// crate's [`Error`](crate::Error) variants:
//
// - "permission already exists" → `Error::DuplicatePermission`
// - "rules per group limit exceeded" → `Error::RuleLimitExceeded`
// - anything else → `Error::ControlPlane` with the remote code preserved
//
// The [`RuleSetManager`](crate::RuleSetManager) routes on these classes;
// a client that collapses them into a generic error breaks both the
// idempotent-duplicate path and the evict-and-retry path.
//
// ## Trust level
//
// Clients are single-shot: one remote call per method, no retries, no
// backoff, no caching. Retry policy is owned by the manager.

use async_trait::async_trait;

use crate::entry::RuleEntry;
use crate::error::Result;

/// Trait for security-group rule set operations
#[async_trait]
pub trait RuleSetClient: Send + Sync {
    /// Authorize a single ingress permission on the group
    ///
    /// # Parameters
    ///
    /// - `group_id`: the security group to mutate
    /// - `port`: port opened by the rule (from and to port are equal)
    /// - `protocol`: IP protocol, e.g. `"tcp"`
    /// - `cidr`: single-host CIDR to admit
    /// - `description`: sortable description (timestamp prefix + identity)
    async fn authorize_ingress(
        &self,
        group_id: &str,
        port: u16,
        protocol: &str,
        cidr: &str,
        description: &str,
    ) -> Result<()>;

    /// List all rules of the group, in whatever order the remote returns
    async fn describe_rules(&self, group_id: &str) -> Result<Vec<RuleEntry>>;

    /// Revoke a single ingress rule by its provider-assigned identifier
    async fn revoke_rule(&self, group_id: &str, rule_id: &str) -> Result<()>;
}
