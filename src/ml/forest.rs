use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::internal::ModelError;

/// Hyperparameters for offline training.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Ensemble size.
    pub trees: usize,
    /// Expected outlier fraction; fixes the decision threshold.
    pub contamination: f64,
    /// RNG seed for reproducible forests.
    pub seed: u64,
    /// Subsample size per tree (capped at the dataset size).
    pub max_samples: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            trees: 100,
            contamination: 0.15,
            seed: 42,
            max_samples: 256,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// Unsupervised outlier-detection ensemble over fixed-length feature vectors
///
/// Trained offline from historical data and serialized to a self-describing
/// JSON artifact; serving only deserializes and evaluates. Conventions
/// follow the usual isolation-forest formulation: short average isolation
/// paths mean outliers, and `decision_function` is negative for points the
/// trained threshold classifies as anomalous.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IsolationForest {
    n_features: usize,
    trees: Vec<Node>,
    /// c(psi) normalization term, fixed by the training subsample size.
    path_norm: f64,
    /// Contamination quantile of the training scores; decision threshold.
    offset: f64,
    config: TrainConfig,
}

impl IsolationForest {
    /// Train an ensemble over `data` (rows of equal length).
    pub fn fit(data: &[Vec<f64>], config: TrainConfig) -> Result<Self, ModelError> {
        if data.is_empty() {
            return Err(ModelError::EmptyDataset);
        }
        let n_features = data[0].len();
        for (i, row) in data.iter().enumerate() {
            if row.len() != n_features {
                return Err(ModelError::BadValue {
                    line: i + 1,
                    message: format!("expected {} values, found {}", n_features, row.len()),
                });
            }
        }

        let psi = config.max_samples.min(data.len()).max(2);
        let max_depth = (psi as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut trees = Vec::with_capacity(config.trees);
        for _ in 0..config.trees {
            let sample = sample_without_replacement(&mut rng, data.len(), psi);
            trees.push(build_node(&mut rng, data, &sample, 0, max_depth, n_features));
        }

        let path_norm = average_path_length(psi);

        let mut forest = Self {
            n_features,
            trees,
            path_norm,
            offset: 0.0,
            config,
        };

        // Fix the decision threshold so that `contamination` of the
        // training data scores below it
        let mut scores: Vec<f64> = data.iter().map(|row| forest.score_samples(row)).collect();
        scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        forest.offset = quantile(&scores, forest.config.contamination);

        Ok(forest)
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Raw anomaly score in (-1, 0]; lower means more isolated.
    pub fn score_samples(&self, x: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), self.n_features);

        let total: f64 = self
            .trees
            .iter()
            .map(|tree| path_length(tree, x, 0.0))
            .sum();
        let mean_path = total / self.trees.len() as f64;

        -(2f64.powf(-mean_path / self.path_norm))
    }

    /// Signed distance from the trained threshold; negative ⇒ outlier.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.score_samples(x) - self.offset
    }

    /// Binary classification under the trained contamination threshold.
    pub fn is_outlier(&self, x: &[f64]) -> bool {
        self.decision_function(x) < 0.0
    }

    /// Serialize the model to a JSON artifact at `path`.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = serde_json::to_vec_pretty(self).map_err(|source| ModelError::ArtifactParse {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, json).map_err(|source| ModelError::ArtifactWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a previously saved artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = fs::read(path).map_err(|source| ModelError::ArtifactRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_slice(&bytes).map_err(|source| ModelError::ArtifactParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Partial Fisher-Yates: `count` distinct indices out of `n`.
fn sample_without_replacement(rng: &mut StdRng, n: usize, count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..count.min(n) {
        let j = rng.gen_range(i..n);
        indices.swap(i, j);
    }
    indices.truncate(count.min(n));
    indices
}

fn build_node(
    rng: &mut StdRng,
    data: &[Vec<f64>],
    idx: &[usize],
    depth: usize,
    max_depth: usize,
    n_features: usize,
) -> Node {
    if depth >= max_depth || idx.len() <= 1 {
        return Node::Leaf { size: idx.len() };
    }

    let feature = rng.gen_range(0..n_features);
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &i in idx {
        let v = data[i][feature];
        min = min.min(v);
        max = max.max(v);
    }

    // Constant feature on this subsample: nothing left to isolate along it
    if !(max > min) {
        return Node::Leaf { size: idx.len() };
    }

    let threshold = rng.gen_range(min..max);

    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        idx.iter().partition(|&&i| data[i][feature] < threshold);

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_node(
            rng, data, &left_idx, depth + 1, max_depth, n_features,
        )),
        right: Box::new(build_node(
            rng, data, &right_idx, depth + 1, max_depth, n_features,
        )),
    }
}

fn path_length(node: &Node, x: &[f64], depth: f64) -> f64 {
    match node {
        Node::Leaf { size } => depth + average_path_length(*size),
        Node::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if x[*feature] < *threshold {
                path_length(left, x, depth + 1.0)
            } else {
                path_length(right, x, depth + 1.0)
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points,
/// the standard isolation-forest normalization term.
fn average_path_length(n: usize) -> f64 {
    const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        n => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolation quantile of an ascending-sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let q = q.clamp(0.0, 1.0);
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}
