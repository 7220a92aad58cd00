// Services layer - Business logic and orchestration
pub mod access_policy;
pub mod file_access_service;
pub mod geo;
pub mod login_service;
pub mod reporting;
pub mod risk_scorer;
pub mod suspicion;

pub use access_policy::AccessPolicy;
pub use file_access_service::FileAccessService;
pub use geo::{FixedLocationResolver, LocationResolver, UnknownLocationResolver};
pub use login_service::LoginService;
pub use reporting::ReportingService;
pub use risk_scorer::RiskScorer;
pub use suspicion::SuspicionClassifier;
