use async_trait::async_trait;

/// Fallback location recorded when resolution fails, times out, or is
/// not configured.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// Seam for the external IP-to-location lookup
///
/// The network implementation lives outside this crate. Implementations
/// return `None` on any failure; the login pipeline maps that to
/// [`UNKNOWN_LOCATION`] and keeps going; a degraded location is never
/// an error.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self, ip_address: &str) -> Option<String>;
}

/// Resolver that never knows where anyone is. Default for deployments
/// without a geolocation provider.
pub struct UnknownLocationResolver;

#[async_trait]
impl LocationResolver for UnknownLocationResolver {
    async fn resolve(&self, _ip_address: &str) -> Option<String> {
        None
    }
}

/// Resolver returning a fixed location. Used by tests and local setups.
pub struct FixedLocationResolver {
    location: String,
}

impl FixedLocationResolver {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }
}

#[async_trait]
impl LocationResolver for FixedLocationResolver {
    async fn resolve(&self, _ip_address: &str) -> Option<String> {
        Some(self.location.clone())
    }
}
