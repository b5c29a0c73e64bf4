//! Security-group style rule set manager
//!
//! Adds the caller's IP as a tcp ingress rule. The remote API has no
//! version token; its only concurrency signals are the duplicate-permission
//! response (idempotent success) and the rule-limit rejection (evict the
//! oldest managed rule, retry immediately).
//!
//! Eviction ordering rests entirely on the description convention: every
//! managed rule's description begins with a Unix timestamp, and rules
//! without a description are treated as foreign and never evicted.

use std::net::IpAddr;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::RuleSetConfig;
use crate::entry::{CallerIdentity, RuleEntry, host_cidr};
use crate::error::{Error, Result};
use crate::traits::RuleSetClient;

/// IP protocol for every managed rule
const PROTOCOL: &str = "tcp";

/// Maximum authorize attempts before the limit error becomes fatal
const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Result of a rule-set add operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new ingress rule was authorized
    Authorized {
        /// CIDR that was admitted
        cidr: String,
        /// How many rules were evicted to make room
        evictions: usize,
    },
    /// The group already held an identical permission (idempotent no-op)
    AlreadyAuthorized {
        /// CIDR that already had access
        cidr: String,
    },
}

/// Manager for a capacity-bounded security group rule set
pub struct RuleSetManager {
    client: Box<dyn RuleSetClient>,
    config: RuleSetConfig,
    identity: CallerIdentity,
    max_attempts: usize,
}

impl RuleSetManager {
    /// Create a new rule-set manager
    pub fn new(
        client: Box<dyn RuleSetClient>,
        config: RuleSetConfig,
        identity: CallerIdentity,
    ) -> Self {
        Self {
            client,
            config,
            identity,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Override the attempt ceiling (default 3)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Add `ip` as a tcp ingress permission on the managed group
    ///
    /// Bounded add/evict/retry loop:
    ///
    /// - duplicate permission → success, nothing to do
    /// - rule limit exceeded → evict the oldest managed rule and retry
    ///   immediately (the eviction is the corrective action, no delay);
    ///   after `max_attempts` failed attempts the limit error propagates
    /// - any other error → fatal, propagated unmodified
    pub async fn add_ingress(&self, ip: IpAddr) -> Result<AddOutcome> {
        let cidr = host_cidr(ip);
        let mut attempts = 0;
        let mut evictions = 0;

        loop {
            attempts += 1;
            let description = self.describe_rule();

            match self
                .client
                .authorize_ingress(
                    &self.config.group_id,
                    self.config.port,
                    PROTOCOL,
                    &cidr,
                    &description,
                )
                .await
            {
                Ok(()) => {
                    info!(
                        group_id = %self.config.group_id,
                        port = self.config.port,
                        %cidr,
                        evictions,
                        "authorized ingress"
                    );
                    return Ok(AddOutcome::Authorized { cidr, evictions });
                }
                Err(Error::DuplicatePermission(_)) => {
                    debug!(group_id = %self.config.group_id, %cidr, "ingress already authorized");
                    return Ok(AddOutcome::AlreadyAuthorized { cidr });
                }
                Err(err @ Error::RuleLimitExceeded(_)) => {
                    if attempts >= self.max_attempts {
                        return Err(err);
                    }
                    warn!(
                        group_id = %self.config.group_id,
                        attempt = attempts,
                        max_attempts = self.max_attempts,
                        "rule limit exceeded, evicting oldest rule"
                    );
                    if self.evict_oldest().await?.is_some() {
                        evictions += 1;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// List the group's managed ingress rules, oldest first
    ///
    /// Rules without a description carry no ordering signal and are
    /// excluded: they were written by some other tool and must never be
    /// destroyed by our eviction.
    pub async fn list_rules(&self) -> Result<Vec<RuleEntry>> {
        let mut rules: Vec<RuleEntry> = self
            .client
            .describe_rules(&self.config.group_id)
            .await?
            .into_iter()
            .filter(|rule| {
                !rule.is_egress && rule.description.as_deref().is_some_and(|d| !d.is_empty())
            })
            .collect();

        rules.sort_by(|a, b| a.description.cmp(&b.description));
        Ok(rules)
    }

    /// Revoke the single oldest managed rule, if any
    ///
    /// No-op when the group has no managed rules. Never removes more than
    /// one rule per call.
    pub async fn evict_oldest(&self) -> Result<Option<RuleEntry>> {
        let Some(oldest) = self.list_rules().await?.into_iter().next() else {
            debug!(group_id = %self.config.group_id, "no managed rules to evict");
            return Ok(None);
        };

        self.client
            .revoke_rule(&self.config.group_id, &oldest.rule_id)
            .await?;

        info!(
            group_id = %self.config.group_id,
            rule_id = %oldest.rule_id,
            cidr = %oldest.cidr,
            "evicted oldest ingress rule"
        );
        Ok(Some(oldest))
    }

    /// Description for a new rule: Unix timestamp prefix, then identity.
    /// The timestamp prefix is the eviction ordering signal.
    fn describe_rule(&self) -> String {
        format!("{} {}", Utc::now().timestamp(), self.identity.tag())
    }
}
