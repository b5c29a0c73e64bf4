//! Configuration types for the allow-list synchronization system
//!
//! Configuration is resolved exactly once, at construction time, into an
//! explicit value object. Per-field precedence is:
//!
//! 1. explicit caller-supplied parameter
//! 2. combined colon-delimited credential string
//! 3. discrete environment values
//!
//! Nothing in the core re-reads the environment after resolution.
//!
//! ## Environment variables
//!
//! ### Rule set
//! - `ALLOWSYNC_RULE_SET_COMBO`: `access_key:secret_key:region:group_id:port`
//! - `ALLOWSYNC_GROUP_ID`, `ALLOWSYNC_PORT`
//! - `ALLOWSYNC_ACCESS_KEY_ID`, `ALLOWSYNC_SECRET_ACCESS_KEY`, `ALLOWSYNC_REGION`
//!
//! ### Prefix list
//! - `ALLOWSYNC_PREFIX_LIST_COMBO`: `access_key:secret_key:region:prefix_list_id`
//! - `ALLOWSYNC_PREFIX_LIST_ID`
//! - `ALLOWSYNC_ACCESS_KEY_ID`, `ALLOWSYNC_SECRET_ACCESS_KEY`, `ALLOWSYNC_REGION`

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Opaque credentials for constructing a remote control-plane client
///
/// The core never interprets these; they are handed verbatim to whoever
/// builds the concrete client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access key ID
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Region
    pub region: String,
}

/// Explicit caller-supplied overrides for rule-set configuration
#[derive(Debug, Clone, Default)]
pub struct RuleSetParams {
    /// Security group ID
    pub group_id: Option<String>,
    /// TCP port the ingress rule opens
    pub port: Option<u16>,
    /// Credentials for the control-plane client
    pub credentials: Option<Credentials>,
}

/// Resolved rule-set manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Security group ID to manage
    pub group_id: String,

    /// TCP port the ingress rule opens
    pub port: u16,

    /// Credentials, if sourced here rather than from a provider default chain
    pub credentials: Option<Credentials>,
}

impl RuleSetConfig {
    /// Resolve configuration from explicit parameters and the environment
    pub fn resolve(params: RuleSetParams) -> Result<Self> {
        Self::resolve_from(params, &|key| std::env::var(key).ok())
    }

    /// Resolve from explicit parameters and an arbitrary key lookup
    /// (testable form of [`RuleSetConfig::resolve`])
    pub fn resolve_from(
        params: RuleSetParams,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let combo = env("ALLOWSYNC_RULE_SET_COMBO")
            .map(|raw| parse_rule_set_combo(&raw))
            .transpose()?;

        let group_id = params
            .group_id
            .or_else(|| combo.as_ref().map(|c| c.group_id.clone()))
            .or_else(|| env("ALLOWSYNC_GROUP_ID"))
            .ok_or_else(|| Error::config("security group ID not configured"))?;

        let port = match params.port.or(combo.as_ref().map(|c| c.port)) {
            Some(port) => port,
            None => env("ALLOWSYNC_PORT")
                .ok_or_else(|| Error::config("ingress port not configured"))?
                .parse()
                .map_err(|_| Error::config("ALLOWSYNC_PORT is not a valid port number"))?,
        };

        let credentials = params
            .credentials
            .or_else(|| combo.map(|c| c.credentials))
            .or_else(|| discrete_credentials(env));

        let config = Self {
            group_id,
            port,
            credentials,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<()> {
        if self.group_id.is_empty() {
            return Err(Error::config("security group ID cannot be empty"));
        }
        if self.port == 0 {
            return Err(Error::config("ingress port must be > 0"));
        }
        Ok(())
    }
}

/// Explicit caller-supplied overrides for prefix-list configuration
#[derive(Debug, Clone, Default)]
pub struct PrefixListParams {
    /// Managed prefix list ID
    pub prefix_list_id: Option<String>,
    /// Credentials for the control-plane client
    pub credentials: Option<Credentials>,
}

/// Resolved prefix-list manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixListConfig {
    /// Managed prefix list ID
    pub prefix_list_id: String,

    /// Credentials, if sourced here rather than from a provider default chain
    pub credentials: Option<Credentials>,
}

impl PrefixListConfig {
    /// Resolve configuration from explicit parameters and the environment
    pub fn resolve(params: PrefixListParams) -> Result<Self> {
        Self::resolve_from(params, &|key| std::env::var(key).ok())
    }

    /// Resolve from explicit parameters and an arbitrary key lookup
    /// (testable form of [`PrefixListConfig::resolve`])
    pub fn resolve_from(
        params: PrefixListParams,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let combo = env("ALLOWSYNC_PREFIX_LIST_COMBO")
            .map(|raw| parse_prefix_list_combo(&raw))
            .transpose()?;

        let prefix_list_id = params
            .prefix_list_id
            .or_else(|| combo.as_ref().map(|c| c.prefix_list_id.clone()))
            .or_else(|| env("ALLOWSYNC_PREFIX_LIST_ID"))
            .ok_or_else(|| Error::config("prefix list ID not configured"))?;

        let credentials = params
            .credentials
            .or_else(|| combo.map(|c| c.credentials))
            .or_else(|| discrete_credentials(env));

        let config = Self {
            prefix_list_id,
            credentials,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the resolved configuration
    pub fn validate(&self) -> Result<()> {
        if self.prefix_list_id.is_empty() {
            return Err(Error::config("prefix list ID cannot be empty"));
        }
        Ok(())
    }
}

struct RuleSetCombo {
    credentials: Credentials,
    group_id: String,
    port: u16,
}

struct PrefixListCombo {
    credentials: Credentials,
    prefix_list_id: String,
}

fn parse_rule_set_combo(raw: &str) -> Result<RuleSetCombo> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 5 {
        return Err(Error::config(format!(
            "ALLOWSYNC_RULE_SET_COMBO must have 5 colon-delimited fields \
             (access_key:secret_key:region:group_id:port), got {}",
            parts.len()
        )));
    }

    let port = parts[4]
        .parse()
        .map_err(|_| Error::config("ALLOWSYNC_RULE_SET_COMBO port field is not a valid port"))?;

    Ok(RuleSetCombo {
        credentials: Credentials {
            access_key_id: parts[0].to_string(),
            secret_access_key: parts[1].to_string(),
            region: parts[2].to_string(),
        },
        group_id: parts[3].to_string(),
        port,
    })
}

fn parse_prefix_list_combo(raw: &str) -> Result<PrefixListCombo> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(Error::config(format!(
            "ALLOWSYNC_PREFIX_LIST_COMBO must have 4 colon-delimited fields \
             (access_key:secret_key:region:prefix_list_id), got {}",
            parts.len()
        )));
    }

    Ok(PrefixListCombo {
        credentials: Credentials {
            access_key_id: parts[0].to_string(),
            secret_access_key: parts[1].to_string(),
            region: parts[2].to_string(),
        },
        prefix_list_id: parts[3].to_string(),
    })
}

/// Assemble credentials from discrete environment values, if all are present
fn discrete_credentials(env: &dyn Fn(&str) -> Option<String>) -> Option<Credentials> {
    Some(Credentials {
        access_key_id: env("ALLOWSYNC_ACCESS_KEY_ID")?,
        secret_access_key: env("ALLOWSYNC_SECRET_ACCESS_KEY")?,
        region: env("ALLOWSYNC_REGION")?,
    })
}
