//! Reading artifacts from a dbt project's target directory
//!
//! One immutable snapshot per load: manifest.json is required, while
//! run_results.json is optional (a project may be compiled but never run).

use crate::manifest::Manifest;
use crate::run_results::RunResults;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Manifest artifact file name
pub const MANIFEST_FILE: &str = "manifest.json";

/// Run results artifact file name
pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Artifact loading errors
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("{artifact} not found at {path}")]
    NotFound { artifact: &'static str, path: String },

    #[error("failed to parse {artifact}: {message}")]
    Parse {
        artifact: &'static str,
        message: String,
    },

    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl ArtifactError {
    /// Whether this error is a missing-file condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    artifact: &'static str,
) -> Result<T, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::NotFound {
                artifact,
                path: path.display().to_string(),
            }
        } else {
            ArtifactError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        }
    })?;

    serde_json::from_str(&contents).map_err(|e| ArtifactError::Parse {
        artifact,
        message: e.to_string(),
    })
}

/// Load and validate a manifest.json file
pub fn read_manifest(path: &Path) -> Result<Manifest, ArtifactError> {
    read_artifact(path, MANIFEST_FILE)
}

/// Load and validate a run_results.json file
pub fn read_run_results(path: &Path) -> Result<RunResults, ArtifactError> {
    read_artifact(path, RUN_RESULTS_FILE)
}

/// One parsed snapshot of a target directory
#[derive(Debug, Clone)]
pub struct TargetArtifacts {
    /// The parsed manifest
    pub manifest: Manifest,

    /// The parsed run results, when the file exists
    pub run_results: Option<RunResults>,
}

impl TargetArtifacts {
    /// Read manifest.json and (if present) run_results.json from a target dir
    pub fn read(target_dir: &Path) -> Result<Self, ArtifactError> {
        let manifest = read_manifest(&target_dir.join(MANIFEST_FILE))?;

        let run_results = match read_run_results(&target_dir.join(RUN_RESULTS_FILE)) {
            Ok(results) => Some(results),
            Err(err) if err.is_not_found() => None,
            Err(err) => return Err(err),
        };

        Ok(Self {
            manifest,
            run_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_MANIFEST: &str = r#"{
        "metadata": {"project_name": "p", "invocation_id": "i"},
        "nodes": {}
    }"#;

    #[test]
    fn missing_manifest_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = TargetArtifacts::read(dir.path()).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("manifest.json"));
    }

    #[test]
    fn malformed_manifest_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "{not json").unwrap();

        let err = TargetArtifacts::read(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn missing_run_results_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MINIMAL_MANIFEST).unwrap();

        let artifacts = TargetArtifacts::read(dir.path()).unwrap();
        assert!(artifacts.run_results.is_none());
        assert_eq!(artifacts.manifest.metadata.project_name, "p");
    }

    #[test]
    fn malformed_run_results_is_not_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MINIMAL_MANIFEST).unwrap();
        std::fs::write(dir.path().join(RUN_RESULTS_FILE), "[]").unwrap();

        let err = TargetArtifacts::read(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }

    #[test]
    fn reads_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), MINIMAL_MANIFEST).unwrap();
        std::fs::write(
            dir.path().join(RUN_RESULTS_FILE),
            r#"{"results": [], "args": {}}"#,
        )
        .unwrap();

        let artifacts = TargetArtifacts::read(dir.path()).unwrap();
        assert!(artifacts.run_results.is_some());
    }
}
