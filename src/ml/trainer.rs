use std::fs;
use std::path::Path;

use crate::errors::internal::ModelError;
use crate::ml::forest::{IsolationForest, TrainConfig};

/// Dataset columns consumed by training, selected by name in this order.
pub const FEATURE_COLUMNS: [&str; 3] = [
    "failed_logins",
    "unusual_time_access",
    "ip_reputation_score",
];

/// Offline batch trainer: CSV dataset in, serialized model artifact out.
///
/// Never runs at serving time; the detector only loads what this wrote.
pub fn train_from_csv(
    dataset: &Path,
    artifact: &Path,
    config: TrainConfig,
) -> Result<IsolationForest, ModelError> {
    let data = load_training_data(dataset)?;

    tracing::info!(
        rows = data.len(),
        trees = config.trees,
        contamination = config.contamination,
        seed = config.seed,
        "training isolation forest"
    );

    let forest = IsolationForest::fit(&data, config)?;
    forest.save(artifact)?;

    tracing::info!(path = %artifact.display(), "model artifact written");

    Ok(forest)
}

/// Read the feature columns out of a headed CSV file.
///
/// Column order in the file does not matter; selection is by header name.
/// Rows are projected into [`FEATURE_COLUMNS`] order.
pub fn load_training_data(path: &Path) -> Result<Vec<Vec<f64>>, ModelError> {
    let contents = fs::read_to_string(path).map_err(|source| ModelError::DatasetRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut lines = contents.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(ModelError::EmptyDataset),
        }
    };

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let mut indices = [0usize; FEATURE_COLUMNS.len()];
    for (slot, name) in FEATURE_COLUMNS.iter().enumerate() {
        indices[slot] = columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ModelError::MissingColumn(name.to_string()))?;
    }

    let mut data = Vec::new();
    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let mut row = Vec::with_capacity(FEATURE_COLUMNS.len());
        for (&idx, name) in indices.iter().zip(FEATURE_COLUMNS.iter()) {
            let field = fields.get(idx).ok_or_else(|| ModelError::BadValue {
                line: line_no + 1,
                message: format!("missing value for column {name}"),
            })?;
            let value: f64 = field.parse().map_err(|_| ModelError::BadValue {
                line: line_no + 1,
                message: format!("{name}: cannot parse {field:?} as a number"),
            })?;
            row.push(value);
        }
        data.push(row);
    }

    if data.is_empty() {
        return Err(ModelError::EmptyDataset);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_columns_selected_by_name_any_order() {
        let (_dir, path) = write_csv(
            "ip_reputation_score,failed_logins,extra,unusual_time_access\n\
             0.9,3,junk,1\n\
             0.1,0,junk,0\n",
        );

        let data = load_training_data(&path).unwrap();
        assert_eq!(data, vec![vec![3.0, 1.0, 0.9], vec![0.0, 0.0, 0.1]]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let (_dir, path) = write_csv("failed_logins,unusual_time_access\n1,0\n");

        let err = load_training_data(&path).unwrap_err();
        match err {
            ModelError::MissingColumn(name) => assert_eq!(name, "ip_reputation_score"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_value_reports_line() {
        let (_dir, path) = write_csv(
            "failed_logins,unusual_time_access,ip_reputation_score\n\
             1,0,0.5\n\
             oops,0,0.5\n",
        );

        let err = load_training_data(&path).unwrap_err();
        assert!(matches!(err, ModelError::BadValue { line: 3, .. }));
    }

    #[test]
    fn test_header_only_file_is_empty_dataset() {
        let (_dir, path) =
            write_csv("failed_logins,unusual_time_access,ip_reputation_score\n");

        let err = load_training_data(&path).unwrap_err();
        assert!(matches!(err, ModelError::EmptyDataset));
    }

    #[test]
    fn test_train_writes_loadable_artifact() {
        let mut rows = String::from("failed_logins,unusual_time_access,ip_reputation_score\n");
        for i in 0..100 {
            rows.push_str(&format!("{},{},0.{}\n", i % 4, i % 2, i % 10));
        }
        let (_dir, data_path) = write_csv(&rows);

        let out_dir = tempfile::tempdir().unwrap();
        let artifact = out_dir.path().join("model.json");

        let trained = train_from_csv(&data_path, &artifact, TrainConfig::default()).unwrap();
        let loaded = IsolationForest::load(&artifact).unwrap();

        let probe = [50.0, 40.0, 12.0];
        assert_eq!(
            trained.decision_function(&probe),
            loaded.decision_function(&probe)
        );
    }
}
