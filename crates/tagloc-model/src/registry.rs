//! Named calibration records, loaded once per (name, resolution).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;
use tagloc_core::Resolution;

use crate::{blob, CalibrationRecord, DistanceModel, ModelError};

/// File extension of calibration blobs inside a model directory.
pub const MODEL_EXTENSION: &str = "calib";

/// Cache key: model name plus the resolution it was requested at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    pub name: String,
    pub resolution: Resolution,
}

/// Loads calibration records from a directory and keeps them for the life of
/// the registry.
///
/// Lookups take a read lock. A miss loads the blob without holding any lock
/// and then inserts it only if no other caller got there first, so two racing
/// first loads of the same key end up sharing one record.
#[derive(Debug)]
pub struct ModelRegistry {
    model_dir: PathBuf,
    cache: RwLock<HashMap<ModelKey, Arc<CalibrationRecord>>>,
}

impl ModelRegistry {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    /// Path the blob for `name` is read from.
    pub fn model_path(&self, name: &str) -> PathBuf {
        self.model_dir.join(format!("{name}.{MODEL_EXTENSION}"))
    }

    /// Distance model `name` for a camera producing `resolution` images.
    pub fn load(&self, name: &str, resolution: Resolution) -> Result<DistanceModel, ModelError> {
        let key = ModelKey {
            name: name.to_string(),
            resolution,
        };
        if let Some(record) = self.cache.read().get(&key) {
            debug!("distance model '{}' ({}) served from cache", name, resolution);
            return Ok(DistanceModel::validated(name, Arc::clone(record)));
        }

        let path = self.model_path(name);
        let record = blob::load_named(&path, name)?;
        record.ensure_resolution(name, resolution)?;
        debug!(
            "loaded distance model '{}' ({}, marker size {} m) from {}",
            name,
            record.resolution,
            record.marker_size,
            path.display()
        );

        let mut cache = self.cache.write();
        let shared = cache.entry(key).or_insert_with(|| Arc::new(record));
        Ok(DistanceModel::validated(name, Arc::clone(shared)))
    }

    /// Register an in-memory record under `name` at its own resolution.
    ///
    /// An existing entry for the same key is kept and returned.
    pub fn insert(
        &self,
        name: &str,
        record: CalibrationRecord,
    ) -> Result<DistanceModel, ModelError> {
        record.validate(name)?;
        let key = ModelKey {
            name: name.to_string(),
            resolution: record.resolution,
        };
        let mut cache = self.cache.write();
        let shared = cache.entry(key).or_insert_with(|| Arc::new(record));
        Ok(DistanceModel::validated(name, Arc::clone(shared)))
    }

    /// Number of cached (name, resolution) entries.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_cached(&self, name: &str, resolution: Resolution) -> bool {
        self.cache.read().contains_key(&ModelKey {
            name: name.to_string(),
            resolution,
        })
    }
}
