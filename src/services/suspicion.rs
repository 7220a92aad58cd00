use std::collections::HashSet;
use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::stores::EventStore;
use crate::types::internal::LoginStatus;

/// Number of qualifying past logins that form a user's baseline.
const BASELINE_WINDOW: u64 = 5;

/// Classifies a login as suspicious relative to the user's own baseline
///
/// Pure read; never writes and never flags a user with no qualifying
/// history (the first login is never suspicious).
pub struct SuspicionClassifier {
    event_store: Arc<EventStore>,
}

impl SuspicionClassifier {
    pub fn new(event_store: Arc<EventStore>) -> Self {
        Self { event_store }
    }

    /// True when the origin address or the device descriptor is absent
    /// from the user's 5 most recent successful/suspicious logins.
    pub async fn is_suspicious<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        ip_address: &str,
        device_info: &str,
    ) -> Result<bool, InternalError> {
        let recent = self
            .event_store
            .recent_login_attempts(
                conn,
                user_id,
                &[LoginStatus::Success, LoginStatus::Suspicious],
                BASELINE_WINDOW,
            )
            .await?;

        if recent.is_empty() {
            return Ok(false);
        }

        let recent_ips: HashSet<&str> = recent.iter().map(|a| a.ip_address.as_str()).collect();
        let recent_devices: HashSet<&str> =
            recent.iter().map(|a| a.device_info.as_str()).collect();

        // Either signal deviating from the baseline is enough
        Ok(!recent_ips.contains(ip_address) || !recent_devices.contains(device_info))
    }
}
