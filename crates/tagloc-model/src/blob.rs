//! Persisted calibration format.
//!
//! A blob is the 4-byte magic `TLCB` followed by an `lz4` block (uncompressed
//! size prepended) holding a `bincode` encoding of [`StoredCalibration`]. The
//! enum variant is the format version, so older layouts are recognised and
//! rejected explicitly instead of being probed field by field.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tagloc_core::Resolution;

use crate::{CalibrationRecord, DistanceModelComponent, ModelError};

/// Leading bytes of every calibration blob.
pub const MAGIC: &[u8; 4] = b"TLCB";

/// Version written by this build.
pub const CURRENT_VERSION: u32 = 2;

/// Calibration written before marker sizes were recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationV1 {
    pub resolution: Resolution,
    pub x_model: DistanceModelComponent,
    pub z_model: DistanceModelComponent,
}

/// Every known on-disk layout, tagged by version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StoredCalibration {
    V1(CalibrationV1),
    V2(CalibrationRecord),
}

impl StoredCalibration {
    pub fn version(&self) -> u32 {
        match self {
            StoredCalibration::V1(_) => 1,
            StoredCalibration::V2(_) => 2,
        }
    }

    /// Upgrade to the current record, failing for layouts that lack fields.
    pub fn into_record(self, name: &str) -> Result<CalibrationRecord, ModelError> {
        let version = self.version();
        match self {
            StoredCalibration::V1(_) => Err(ModelError::MissingMarkerSize {
                name: name.to_string(),
                version,
            }),
            StoredCalibration::V2(record) => {
                record.validate(name)?;
                Ok(record)
            }
        }
    }
}

/// Serialize any stored layout into blob bytes.
pub fn encode_stored(stored: &StoredCalibration) -> Result<Vec<u8>, ModelError> {
    let payload = bincode::serde::encode_to_vec(stored, bincode::config::standard())?;
    let compressed = lz4_flex::compress_prepend_size(&payload);
    let mut out = Vec::with_capacity(MAGIC.len() + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Serialize a record in the current format.
pub fn encode_record(record: &CalibrationRecord) -> Result<Vec<u8>, ModelError> {
    encode_stored(&StoredCalibration::V2(record.clone()))
}

/// Parse blob bytes without upgrading; `name` labels errors.
pub fn decode_stored(bytes: &[u8], name: &str) -> Result<StoredCalibration, ModelError> {
    let body = bytes
        .strip_prefix(MAGIC.as_slice())
        .ok_or_else(|| ModelError::incompatible(name, "missing calibration header"))?;
    let payload = lz4_flex::decompress_size_prepended(body)
        .map_err(|e| ModelError::incompatible(name, format!("corrupt compressed payload: {e}")))?;
    let (stored, read): (StoredCalibration, usize) =
        bincode::serde::decode_from_slice(&payload, bincode::config::standard()).map_err(|e| {
            ModelError::incompatible(
                name,
                format!("unsupported layout (this build reads versions 1..={CURRENT_VERSION}): {e}"),
            )
        })?;
    if read != payload.len() {
        return Err(ModelError::incompatible(
            name,
            "trailing bytes after calibration payload",
        ));
    }
    Ok(stored)
}

/// Parse blob bytes into a current-format record.
pub fn decode_record(bytes: &[u8], name: &str) -> Result<CalibrationRecord, ModelError> {
    decode_stored(bytes, name)?.into_record(name)
}

/// Write `record` to `path` in the current format.
pub fn save_record(path: &Path, record: &CalibrationRecord) -> Result<(), ModelError> {
    record.validate(&path.display().to_string())?;
    fs::write(path, encode_record(record)?)?;
    Ok(())
}

/// Read a record from `path`; the file stem names the model in errors.
pub fn load_record(path: &Path) -> Result<CalibrationRecord, ModelError> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    load_named(path, &name)
}

/// Read a record from `path`, labelling errors with `name`.
pub fn load_named(path: &Path, name: &str) -> Result<CalibrationRecord, ModelError> {
    let bytes = fs::read(path).map_err(|source| ModelError::UnknownModel {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    })?;
    decode_record(&bytes, name)
}
