// ML layer - feature extraction, isolation forest, offline training,
// and the serving-time anomaly detector
pub mod detector;
pub mod features;
pub mod forest;
pub mod trainer;

pub use detector::{AnomalyDetector, AnomalyScore};
pub use features::{FeatureExtractor, FEATURE_LEN};
pub use forest::{IsolationForest, TrainConfig};
