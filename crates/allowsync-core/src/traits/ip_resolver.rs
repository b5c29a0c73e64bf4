// # IP Resolver Trait
//
// Defines the interface for resolving the caller's current public IP.
//
// ## Implementations
//
// - HTTP lookup service: `allowsync-ip-http` crate
// - Future: cloud metadata endpoints, STUN
//
// Callers that already know their address can bypass this seam entirely
// and hand the managers an `IpAddr` directly.

use async_trait::async_trait;
use std::net::IpAddr;

use crate::error::Result;

/// Trait for public-IP resolution
///
/// Implementations perform a single outbound read and return the result.
/// No retry, no caching: failures propagate unmodified to the caller,
/// which decides whether resolution failure is fatal.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Resolve the caller's current public IP address
    async fn resolve(&self) -> Result<IpAddr>;
}
