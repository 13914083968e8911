use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use tagloc_core::{MarkerSize, MarkerSizeTable, RawDetection, Resolution};
use tagloc_model::{DistanceModel, ModelError, ModelRegistry};

use crate::{build_token, Token, TokenError};

fn default_model_dir() -> PathBuf {
    PathBuf::from("calibrations")
}

/// Where calibrations live and how large each marker is.
///
/// ```json
/// {
///   "model_dir": "calibrations",
///   "default_marker_size": { "width": 0.25, "height": 0.25 },
///   "marker_sizes": { "23": { "width": 0.1, "height": 0.1 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizerConfig {
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default)]
    pub default_marker_size: MarkerSize,
    #[serde(default)]
    pub marker_sizes: BTreeMap<u32, MarkerSize>,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            default_marker_size: MarkerSize::default(),
            marker_sizes: BTreeMap::new(),
        }
    }
}

impl LocalizerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("malformed localizer config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read localizer config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    pub fn marker_size_table(&self) -> MarkerSizeTable {
        MarkerSizeTable {
            default: self.default_marker_size,
            sizes: self.marker_sizes.clone(),
        }
    }
}

/// Model registry plus marker sizes: everything needed to turn detections
/// into tokens. Shareable across threads.
#[derive(Debug)]
pub struct Localizer {
    registry: ModelRegistry,
    sizes: MarkerSizeTable,
}

impl Localizer {
    pub fn new(config: &LocalizerConfig) -> Self {
        Self::with_parts(
            ModelRegistry::new(&config.model_dir),
            config.marker_size_table(),
        )
    }

    pub fn with_parts(registry: ModelRegistry, sizes: MarkerSizeTable) -> Self {
        Self { registry, sizes }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn sizes(&self) -> &MarkerSizeTable {
        &self.sizes
    }

    /// Calibrated model `name` for images of `resolution`.
    pub fn model(&self, name: &str, resolution: Resolution) -> Result<DistanceModel, ModelError> {
        self.registry.load(name, resolution)
    }

    /// Token for one detection in an image of `resolution`.
    ///
    /// With `model_name == None` the token has pixel geometry only.
    pub fn build_token(
        &self,
        detection: &RawDetection,
        resolution: Resolution,
        model_name: Option<&str>,
    ) -> Result<Token, TokenError> {
        let model = self.resolve(resolution, model_name)?;
        build_token(detection, model.as_ref(), &self.sizes)
    }

    /// Tokens for every detection of one frame, in detection order.
    pub fn build_tokens(
        &self,
        detections: &[RawDetection],
        resolution: Resolution,
        model_name: Option<&str>,
    ) -> Result<Vec<Token>, TokenError> {
        let model = self.resolve(resolution, model_name)?;
        let tokens = detections
            .iter()
            .map(|d| build_token(d, model.as_ref(), &self.sizes))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("built {} tokens at {}", tokens.len(), resolution);
        Ok(tokens)
    }

    fn resolve(
        &self,
        resolution: Resolution,
        model_name: Option<&str>,
    ) -> Result<Option<DistanceModel>, ModelError> {
        model_name
            .map(|name| self.registry.load(name, resolution))
            .transpose()
    }
}
