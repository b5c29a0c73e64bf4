// # allowsync-core
//
// Core library for bounded allow-list synchronization.
//
// Keeps two capacity-bounded, remotely hosted allow-lists (a security
// group rule set and a managed prefix list) in sync with a caller's
// current public IP, so a dynamically addressed client keeps access to a
// protected resource without manual firewall edits.
//
// ## Architecture Overview
//
// - **IpResolver**: trait for resolving the caller's current public IP
// - **RuleSetClient / PrefixListClient**: traits over the remote
//   control plane, one per resource kind
// - **RuleSetManager**: add ingress; on "limit exceeded" evict the oldest
//   managed rule and retry
// - **PrefixListManager**: add entry under optimistic concurrency; on
//   conflict retry with jittered backoff; on "full" fold the eviction into
//   the same atomic mutation as the add
//
// Control flow: caller → resolver → manager → control-plane client.
// No component calls back upward; all state lives in the remote resource.
//
// ## Design Principles
//
// 1. **Single entry per invocation**: exactly one "current caller" entry
//    is managed; this is not a set reconciler
// 2. **Fresh reads**: no remote state (version token included) is cached
//    across calls
// 3. **Bounded retries**: every retry loop has a strictly decreasing
//    budget and an early return on terminal states
// 4. **Retry ownership**: clients are single-shot; all retry, backoff and
//    eviction policy lives in the managers

pub mod backoff;
pub mod config;
pub mod entry;
pub mod error;
pub mod manager;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, PrefixListConfig, PrefixListParams, RuleSetConfig, RuleSetParams};
pub use entry::{AllowEntry, CallerIdentity, RuleEntry, host_cidr};
pub use error::{Error, Result};
pub use manager::{AddOutcome, PrefixListManager, RuleSetManager};
pub use traits::{IpResolver, PrefixListClient, PrefixListState, RuleSetClient};
