//! Allow-list managers
//!
//! One manager per remote resource kind, structurally parallel but with
//! different concurrency signals:
//!
//! - [`RuleSetManager`]: relies on the remote's duplicate-detection and
//!   limit-rejection responses; evicts then retries with no delay.
//! - [`PrefixListManager`]: relies on the remote's version token; folds
//!   eviction into the same atomic mutation as the add, and retries with
//!   jittered backoff.
//!
//! All state lives in the remote resource. Managers re-read fresh state
//! immediately before each decision, which is what keeps them correct
//! under concurrent writers.

pub mod prefix_list;
pub mod rule_set;

pub use prefix_list::PrefixListManager;
pub use rule_set::{AddOutcome, RuleSetManager};
