use serde::{Deserialize, Serialize};

/// Outcome recorded on a login_attempts row.
///
/// A successful authentication yields exactly one of `Success`/`Suspicious`;
/// `Failed` means authentication did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Failed,
    Suspicious,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginStatus::Success => "success",
            LoginStatus::Failed => "failed",
            LoginStatus::Suspicious => "suspicious",
        }
    }
}

impl std::fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Employee,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "employee",
            UserRole::Admin => "admin",
        }
    }

    /// Parse a role column value. Unknown strings fall back to the
    /// least-privileged role.
    pub fn from_db(value: &str) -> Self {
        match value {
            "admin" => UserRole::Admin,
            _ => UserRole::Employee,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Allowed,
    Denied,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessAction::Allowed => "allowed",
            AccessAction::Denied => "denied",
        }
    }
}

/// New login_attempts row, ready for insertion.
#[derive(Clone, Debug)]
pub struct NewLoginAttempt {
    pub user_id: Option<String>,
    pub username: String,
    pub ip_address: String,
    pub device_info: String,
    pub location: String,
    pub status: LoginStatus,
    pub is_suspicious: bool,
    pub timestamp: i64,
}

/// New file_accesses row, ready for insertion.
#[derive(Clone, Debug)]
pub struct NewFileAccess {
    pub user_id: String,
    pub username: String,
    pub file_path: String,
    pub action: AccessAction,
    pub risk_level: RiskLevel,
    pub is_authorized: bool,
    pub timestamp: i64,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: UserRole,
}

/// Result of evaluating a file path against the restricted-path policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessDecision {
    pub authorized: bool,
    pub risk_level: RiskLevel,
}

/// Result of running a login observation through the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum LoginEvaluation {
    /// Authentication succeeded and the attempt was recorded.
    Accepted {
        suspicious: bool,
        risk_score: i32,
        location: String,
    },
    /// Bad credentials or unknown username; a failed attempt was recorded.
    /// `risk_score` is present when the username matched a known user.
    Rejected { risk_score: Option<i32> },
    /// Credentials were valid but the account is suspended. No event row
    /// is recorded for this case.
    Suspended,
}
