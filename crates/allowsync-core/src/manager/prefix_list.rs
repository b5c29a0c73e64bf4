//! Managed prefix list manager
//!
//! Adds the caller's IP as a prefix list entry under optimistic
//! concurrency control. Every mutation carries the list's current version;
//! the remote rejects stale tokens, so the manager re-reads the version
//! immediately before each attempt and never caches it across calls.
//!
//! When the list is full, the eviction is folded into the *same* modify
//! call as the add. Two separate calls would race against concurrent
//! writers and double the chance of a version conflict; one atomic
//! mutation is the correctness technique that distinguishes this manager
//! from the rule-set manager.
//!
//! Per-attempt state machine:
//!
//! ```text
//! START → READ_VERSION → MUTATE → SUCCESS
//!              ↑            ├──→ RETRYABLE_FAILURE → BACKOFF ─┐
//!              └────────────┤                                 │
//!                           └──→ FATAL_FAILURE     ←──────────┘ (budget spent)
//! ```

use std::net::IpAddr;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::backoff::{DEFAULT_JITTER_MAX, jitter_delay};
use crate::config::PrefixListConfig;
use crate::entry::{AllowEntry, CallerIdentity, host_cidr};
use crate::error::{Error, Result};
use crate::traits::PrefixListClient;

/// Maximum modify attempts before a retryable error becomes fatal
const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Manager for a capacity-bounded managed prefix list
pub struct PrefixListManager {
    client: Box<dyn PrefixListClient>,
    config: PrefixListConfig,
    identity: CallerIdentity,
    max_attempts: usize,
    jitter_max: Duration,
}

impl PrefixListManager {
    /// Create a new prefix-list manager
    pub fn new(
        client: Box<dyn PrefixListClient>,
        config: PrefixListConfig,
        identity: CallerIdentity,
    ) -> Self {
        Self {
            client,
            config,
            identity,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            jitter_max: DEFAULT_JITTER_MAX,
        }
    }

    /// Override the attempt ceiling (default 5)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Override the jitter ceiling between retries (default 2s)
    pub fn with_jitter_max(mut self, jitter_max: Duration) -> Self {
        self.jitter_max = jitter_max;
        self
    }

    /// Add `ip` to the managed prefix list
    pub async fn add_entry(&self, ip: IpAddr) -> Result<()> {
        self.add_entry_with(ip, None, None).await
    }

    /// Add `ip`, optionally removing `remove_cidr` in the same mutation
    /// and/or pinning the version token for the first attempt
    ///
    /// Bounded retry loop, `max_attempts` strictly decreasing:
    ///
    /// - a pinned `version` is honored only on the first attempt; every
    ///   retry re-reads the version fresh (a stale token must never be
    ///   reused)
    /// - version mismatch and transient incorrect-state failures back off
    ///   a random `[0, jitter_max)` delay, then retry
    /// - max-entries-exceeded additionally selects the oldest entry for
    ///   removal on the retried attempt
    /// - once the budget is spent, the underlying error propagates
    ///   unmodified; non-retryable errors propagate immediately
    pub async fn add_entry_with(
        &self,
        ip: IpAddr,
        remove_cidr: Option<String>,
        version: Option<i64>,
    ) -> Result<()> {
        let cidr = host_cidr(ip);
        let mut remove_cidr = remove_cidr;
        let mut pinned_version = version;
        let mut attempts_left = self.max_attempts;

        loop {
            let current_version = match pinned_version.take() {
                Some(version) => version,
                None => {
                    let state = self.client.describe(&self.config.prefix_list_id).await?;
                    debug!(
                        prefix_list_id = %self.config.prefix_list_id,
                        version = state.version,
                        "read prefix list version"
                    );
                    state.version
                }
            };

            let add = AllowEntry {
                cidr: cidr.clone(),
                description: self.describe_entry(),
            };
            let remove: Vec<String> = remove_cidr.iter().cloned().collect();

            match self
                .client
                .modify(&self.config.prefix_list_id, current_version, &[add], &remove)
                .await
            {
                Ok(()) => {
                    info!(
                        prefix_list_id = %self.config.prefix_list_id,
                        added = %cidr,
                        removed = remove_cidr.as_deref().unwrap_or("none"),
                        "modified prefix list"
                    );
                    return Ok(());
                }
                Err(err) if err.is_prefix_list_retryable() => {
                    attempts_left -= 1;
                    if attempts_left == 0 {
                        return Err(err);
                    }

                    if matches!(err, Error::MaxEntriesExceeded(_)) {
                        // Oldest entry by description makes room for the add;
                        // folded into the retried mutation, never a separate call.
                        if let Some(oldest) = self.list_entries().await?.into_iter().next() {
                            remove_cidr = Some(oldest.cidr);
                        }
                    }

                    let delay = jitter_delay(self.jitter_max);
                    warn!(
                        prefix_list_id = %self.config.prefix_list_id,
                        error = %err,
                        attempts_left,
                        delay_ms = delay.as_millis() as u64,
                        "retryable prefix list failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// List the prefix list's entries, oldest first
    pub async fn list_entries(&self) -> Result<Vec<AllowEntry>> {
        let mut entries = self.client.entries(&self.config.prefix_list_id).await?;
        entries.sort_by(|a, b| a.description.cmp(&b.description));
        Ok(entries)
    }

    /// Description for a new entry: ISO-8601 UTC prefix, then identity.
    /// The timestamp prefix is the eviction ordering signal.
    fn describe_entry(&self) -> String {
        format!(
            "{} {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            self.identity.tag()
        )
    }
}
