pub mod events;

pub use events::{
    AccessAction, AccessDecision, LoginEvaluation, LoginStatus, NewFileAccess, NewLoginAttempt,
    NewUser, RiskLevel, UserRole,
};
