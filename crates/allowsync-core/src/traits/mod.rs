//! Collaborator seams for the allow-list synchronization system
//!
//! These traits are the boundary of responsibility: the remote control
//! plane and the IP lookup service live behind them. Implementations are
//! single-shot and own no retry logic; all retry, backoff and eviction
//! decisions belong to the managers.
//!
//! - [`IpResolver`]: resolve the caller's current public IP
//! - [`RuleSetClient`]: security-group style rule set operations
//! - [`PrefixListClient`]: managed prefix list operations

pub mod ip_resolver;
pub mod prefix_list;
pub mod rule_set;

pub use ip_resolver::IpResolver;
pub use prefix_list::{PrefixListClient, PrefixListState};
pub use rule_set::RuleSetClient;
