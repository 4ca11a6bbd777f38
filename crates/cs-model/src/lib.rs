//! cs-model: record types, payload validation and the snapshot file format.

pub mod migrate;
pub mod schema;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{
    ValidationError, validate_new_train, validate_snapshot, validate_train_name,
    validate_train_patch, validate_wagon_spec,
};

use std::path::Path;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk encoding of a snapshot, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SnapshotFormat::Yaml
            }
            _ => SnapshotFormat::Json,
        }
    }
}

pub fn load_yaml(path: &Path) -> ModelResult<Snapshot> {
    let content = std::fs::read_to_string(path)?;
    let mut snapshot: Snapshot = serde_yaml::from_str(&content)?;
    snapshot = migrate_to_latest(snapshot)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

pub fn save_yaml(path: &Path, snapshot: &Snapshot) -> ModelResult<()> {
    validate_snapshot(snapshot)?;
    let content = serde_yaml::to_string(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ModelResult<Snapshot> {
    let content = std::fs::read_to_string(path)?;
    let mut snapshot: Snapshot = serde_json::from_str(&content)?;
    snapshot = migrate_to_latest(snapshot)?;
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

pub fn save_json(path: &Path, snapshot: &Snapshot) -> ModelResult<()> {
    validate_snapshot(snapshot)?;
    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> ModelResult<Snapshot> {
    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => load_json(path),
        SnapshotFormat::Yaml => load_yaml(path),
    }
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> ModelResult<()> {
    match SnapshotFormat::from_path(path) {
        SnapshotFormat::Json => save_json(path, snapshot),
        SnapshotFormat::Yaml => save_yaml(path, snapshot),
    }
}
