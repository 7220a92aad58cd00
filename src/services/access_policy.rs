use crate::types::internal::{AccessDecision, RiskLevel, UserRole};

/// Restricted path substrings, scanned in this exact order. Scan stops at
/// the first match; list order is the contract, not path specificity.
pub const RESTRICTED_PATHS: [&str; 5] = [
    "/confidential/",
    "/admin/",
    "/hr/salary",
    "/credentials",
    "/passwords",
];

/// Restricted-path policy for file access checks
pub struct AccessPolicy;

impl AccessPolicy {
    /// Evaluate a path against the restricted list for the given role.
    ///
    /// Admins are always authorized. For everyone else, the first matching
    /// substring denies access; the denial is `Critical` when the path
    /// contains `/admin/` anywhere (regardless of which substring matched
    /// first), `High` otherwise. Paths matching nothing are low risk.
    pub fn evaluate(role: UserRole, file_path: &str) -> AccessDecision {
        for restricted in RESTRICTED_PATHS {
            if file_path.contains(restricted) {
                if role != UserRole::Admin {
                    let risk_level = if file_path.contains("/admin/") {
                        RiskLevel::Critical
                    } else {
                        RiskLevel::High
                    };
                    return AccessDecision {
                        authorized: false,
                        risk_level,
                    };
                }
                // First match ends the scan even when it grants access
                break;
            }
        }

        AccessDecision {
            authorized: true,
            risk_level: RiskLevel::Low,
        }
    }
}
