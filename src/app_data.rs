use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::BootstrapSettings;
use crate::ml::{AnomalyDetector, FeatureExtractor};
use crate::services::{
    FileAccessService, LocationResolver, LoginService, ReportingService, RiskScorer,
    SuspicionClassifier,
};
use crate::stores::{EventStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// Every store and service is created exactly once here and shared via Arc;
/// nothing in the pipeline reaches for process-wide state. The one
/// process-wide cache (the anomaly model) lives inside the injected
/// `AnomalyDetector`.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub event_store: Arc<EventStore>,
    pub risk_scorer: Arc<RiskScorer>,
    pub suspicion: Arc<SuspicionClassifier>,
    pub login_service: Arc<LoginService>,
    pub file_access_service: Arc<FileAccessService>,
    pub reporting: Arc<ReportingService>,
    pub anomaly_detector: Arc<AnomalyDetector>,
}

impl AppData {
    /// Wire up all stores and services over an initialized database.
    pub fn init(
        db: DatabaseConnection,
        settings: &BootstrapSettings,
        resolver: Arc<dyn LocationResolver>,
    ) -> Self {
        let user_store = Arc::new(UserStore::new());
        let event_store = Arc::new(EventStore::new());

        let risk_scorer = Arc::new(RiskScorer::new(event_store.clone(), user_store.clone()));
        let suspicion = Arc::new(SuspicionClassifier::new(event_store.clone()));

        let login_service = Arc::new(LoginService::new(
            db.clone(),
            user_store.clone(),
            event_store.clone(),
            suspicion.clone(),
            risk_scorer.clone(),
            resolver,
        ));

        let file_access_service = Arc::new(FileAccessService::new(
            db.clone(),
            event_store.clone(),
            risk_scorer.clone(),
        ));

        let reporting = Arc::new(ReportingService::new(
            db.clone(),
            event_store.clone(),
            user_store.clone(),
        ));

        let anomaly_detector = Arc::new(AnomalyDetector::new(
            settings.model_artifact_path().clone(),
            FeatureExtractor::new(event_store.clone()),
        ));

        Self {
            db,
            user_store,
            event_store,
            risk_scorer,
            suspicion,
            login_service,
            file_access_service,
            reporting,
            anomaly_detector,
        }
    }
}
