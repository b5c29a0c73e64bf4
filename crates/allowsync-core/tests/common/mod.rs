//! Test doubles and common utilities for manager contract tests
//!
//! The scripted clients stand in for the remote control plane: each call
//! pops the next scripted outcome (defaulting to success) and records what
//! the manager asked for, so tests can assert on exact call sequences.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use allowsync_core::entry::{AllowEntry, CallerIdentity, RuleEntry};
use allowsync_core::error::{Error, Result};
use allowsync_core::traits::{PrefixListClient, PrefixListState, RuleSetClient};
use allowsync_core::{PrefixListConfig, RuleSetConfig};

/// A rule-set config pointing at a fixed test group
pub fn rule_set_config() -> RuleSetConfig {
    RuleSetConfig {
        group_id: "sg-0dca03885a00d9ade".to_string(),
        port: 5432,
        credentials: None,
    }
}

/// A prefix-list config pointing at a fixed test list
pub fn prefix_list_config() -> PrefixListConfig {
    PrefixListConfig {
        prefix_list_id: "pl-036a11494222c3d5c".to_string(),
        credentials: None,
    }
}

/// A fixed caller identity for deterministic descriptions
pub fn test_identity() -> CallerIdentity {
    CallerIdentity::new("testproj", "web.1", "test-host")
}

/// Build a rule entry with the given ordering description
pub fn ingress_rule(rule_id: &str, cidr: &str, description: Option<&str>) -> RuleEntry {
    RuleEntry {
        rule_id: rule_id.to_string(),
        cidr: cidr.to_string(),
        description: description.map(str::to_string),
        is_egress: false,
    }
}

/// Scripted outcome for one authorize_ingress call
#[derive(Debug, Clone, Copy)]
pub enum AuthorizeOutcome {
    Ok,
    Duplicate,
    LimitExceeded,
    AccessDenied,
}

impl AuthorizeOutcome {
    fn into_result(self) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::Duplicate => Err(Error::duplicate_permission("rule already exists")),
            Self::LimitExceeded => Err(Error::rule_limit_exceeded("60/60 rules in use")),
            Self::AccessDenied => Err(Error::control_plane("AccessDenied", "not authorized")),
        }
    }
}

struct RuleSetInner {
    script: Mutex<VecDeque<AuthorizeOutcome>>,
    rules: Mutex<Vec<RuleEntry>>,
    authorize_calls: AtomicUsize,
    authorized: Mutex<Vec<(String, String)>>,
    revoked: Mutex<Vec<String>>,
}

/// A controlled RuleSetClient driven by a script of outcomes
///
/// Cloning shares all state, so a clone can be boxed into the manager
/// while the original stays available for assertions.
#[derive(Clone)]
pub struct ScriptedRuleSetClient {
    inner: Arc<RuleSetInner>,
}

impl ScriptedRuleSetClient {
    /// Create a client holding the given initial rules
    pub fn new(rules: Vec<RuleEntry>) -> Self {
        Self {
            inner: Arc::new(RuleSetInner {
                script: Mutex::new(VecDeque::new()),
                rules: Mutex::new(rules),
                authorize_calls: AtomicUsize::new(0),
                authorized: Mutex::new(Vec::new()),
                revoked: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Script the outcomes of successive authorize_ingress calls
    /// (calls beyond the script succeed)
    pub fn script(self, outcomes: &[AuthorizeOutcome]) -> Self {
        self.inner.script.lock().unwrap().extend(outcomes.iter().copied());
        self
    }

    /// Number of authorize_ingress calls made
    pub fn authorize_calls(&self) -> usize {
        self.inner.authorize_calls.load(Ordering::SeqCst)
    }

    /// `(cidr, description)` pairs of every authorize attempt
    pub fn authorized(&self) -> Vec<(String, String)> {
        self.inner.authorized.lock().unwrap().clone()
    }

    /// Rule IDs revoked, in order
    pub fn revoked(&self) -> Vec<String> {
        self.inner.revoked.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RuleSetClient for ScriptedRuleSetClient {
    async fn authorize_ingress(
        &self,
        _group_id: &str,
        _port: u16,
        _protocol: &str,
        cidr: &str,
        description: &str,
    ) -> Result<()> {
        self.inner.authorize_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .authorized
            .lock()
            .unwrap()
            .push((cidr.to_string(), description.to_string()));

        let outcome = self
            .inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(AuthorizeOutcome::Ok);
        outcome.into_result()
    }

    async fn describe_rules(&self, _group_id: &str) -> Result<Vec<RuleEntry>> {
        Ok(self.inner.rules.lock().unwrap().clone())
    }

    async fn revoke_rule(&self, _group_id: &str, rule_id: &str) -> Result<()> {
        self.inner.revoked.lock().unwrap().push(rule_id.to_string());
        self.inner
            .rules
            .lock()
            .unwrap()
            .retain(|rule| rule.rule_id != rule_id);
        Ok(())
    }
}

/// Scripted outcome for one modify call
#[derive(Debug, Clone, Copy)]
pub enum ModifyOutcome {
    Ok,
    VersionMismatch,
    IncorrectState,
    MaxEntries,
    AccessDenied,
}

impl ModifyOutcome {
    fn into_result(self) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::VersionMismatch => Err(Error::version_mismatch("current version is stale")),
            Self::IncorrectState => Err(Error::incorrect_state("modify in progress")),
            Self::MaxEntries => Err(Error::max_entries_exceeded("entry limit reached")),
            Self::AccessDenied => Err(Error::control_plane("AccessDenied", "not authorized")),
        }
    }
}

/// One recorded modify call: exactly what the manager sent
#[derive(Debug, Clone)]
pub struct RecordedModify {
    pub current_version: i64,
    pub add: Vec<AllowEntry>,
    pub remove: Vec<String>,
}

struct PrefixListInner {
    version: AtomicI64,
    entries: Mutex<Vec<AllowEntry>>,
    script: Mutex<VecDeque<ModifyOutcome>>,
    describe_calls: AtomicUsize,
    modify_calls: Mutex<Vec<RecordedModify>>,
    /// When true, every failed modify bumps the version, simulating the
    /// concurrent writer that won the race
    bump_version_on_failure: std::sync::atomic::AtomicBool,
}

/// A controlled PrefixListClient driven by a script of outcomes
#[derive(Clone)]
pub struct ScriptedPrefixListClient {
    inner: Arc<PrefixListInner>,
}

impl ScriptedPrefixListClient {
    /// Create a client at the given version holding the given entries
    pub fn new(version: i64, entries: Vec<AllowEntry>) -> Self {
        Self {
            inner: Arc::new(PrefixListInner {
                version: AtomicI64::new(version),
                entries: Mutex::new(entries),
                script: Mutex::new(VecDeque::new()),
                describe_calls: AtomicUsize::new(0),
                modify_calls: Mutex::new(Vec::new()),
                bump_version_on_failure: std::sync::atomic::AtomicBool::new(false),
            }),
        }
    }

    /// Script the outcomes of successive modify calls
    /// (calls beyond the script succeed)
    pub fn script(self, outcomes: &[ModifyOutcome]) -> Self {
        self.inner.script.lock().unwrap().extend(outcomes.iter().copied());
        self
    }

    /// Simulate a concurrent writer: bump the version on every failed modify
    pub fn with_concurrent_writer(self) -> Self {
        self.inner
            .bump_version_on_failure
            .store(true, Ordering::SeqCst);
        self
    }

    /// Number of describe (version read) calls made
    pub fn describe_calls(&self) -> usize {
        self.inner.describe_calls.load(Ordering::SeqCst)
    }

    /// Every modify call the manager issued, in order
    pub fn modify_calls(&self) -> Vec<RecordedModify> {
        self.inner.modify_calls.lock().unwrap().clone()
    }

    /// Current entries, as the remote would report them
    pub fn current_entries(&self) -> Vec<AllowEntry> {
        self.inner.entries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PrefixListClient for ScriptedPrefixListClient {
    async fn describe(&self, _prefix_list_id: &str) -> Result<PrefixListState> {
        self.inner.describe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PrefixListState {
            version: self.inner.version.load(Ordering::SeqCst),
        })
    }

    async fn entries(&self, _prefix_list_id: &str) -> Result<Vec<AllowEntry>> {
        Ok(self.inner.entries.lock().unwrap().clone())
    }

    async fn modify(
        &self,
        _prefix_list_id: &str,
        current_version: i64,
        add: &[AllowEntry],
        remove: &[String],
    ) -> Result<()> {
        self.inner.modify_calls.lock().unwrap().push(RecordedModify {
            current_version,
            add: add.to_vec(),
            remove: remove.to_vec(),
        });

        let outcome = self
            .inner
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ModifyOutcome::Ok);

        match outcome.into_result() {
            Ok(()) => {
                let mut entries = self.inner.entries.lock().unwrap();
                entries.retain(|entry| !remove.contains(&entry.cidr));
                entries.extend(add.iter().cloned());
                self.inner.version.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Err(err) => {
                if self.inner.bump_version_on_failure.load(Ordering::SeqCst) {
                    self.inner.version.fetch_add(1, Ordering::SeqCst);
                }
                Err(err)
            }
        }
    }
}
