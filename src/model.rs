//! Layout model capability.
//!
//! The layout model itself is an external collaborator. This module defines
//! the interface the service depends on, the model-native region record, and
//! a model that replays regions recorded from a previous run.

use crate::error::{LayoutEvalError, Result};
use crate::types::{BoundingBox, Detection};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// A document layout detector.
///
/// Implementations are loaded once per process and shared between requests,
/// so `detect` takes `&self` and must be safe to call concurrently.
pub trait LayoutModel: Send + Sync {
    /// Detect layout regions in an RGB image.
    fn detect(&self, image: &RgbImage) -> Result<Vec<Detection>>;

    /// Human readable model name, used in logs.
    fn name(&self) -> &str;
}

/// A layout region as emitted by PP-Structure style models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRegion {
    /// Layout label, e.g. `"Title"` or `"table"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Corners in `[x1, y1, x2, y2]` format.
    pub bbox: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl RawRegion {
    /// Convert to a [`Detection`], or explain why the region is unusable.
    fn to_detection(&self) -> std::result::Result<Detection, String> {
        let [x1, y1, x2, y2] = <[f64; 4]>::try_from(self.bbox.as_slice())
            .map_err(|_| format!("expected 4 bbox values, got {}", self.bbox.len()))?;

        let bbox = BoundingBox::from_xyxy(x1, y1, x2, y2);
        bbox.validate().map_err(|err| err.to_string())?;

        let confidence = self.score.unwrap_or(1.0);
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("score {} outside [0, 1]", confidence));
        }

        Ok(Detection::new(bbox, &self.kind, confidence))
    }
}

/// Convert model output into detections, skipping malformed regions.
///
/// A malformed region is logged and dropped; it never fails the request.
pub fn regions_to_detections(regions: &[RawRegion]) -> Vec<Detection> {
    regions
        .iter()
        .enumerate()
        .filter_map(|(index, region)| match region.to_detection() {
            Ok(detection) => Some(detection),
            Err(reason) => {
                warn!(index, kind = %region.kind, %reason, "skipping malformed layout region");
                None
            }
        })
        .collect()
}

/// A layout model that returns a fixed, previously recorded set of regions.
///
/// Useful for evaluating stored model output and for tests.
#[derive(Debug, Clone)]
pub struct RecordedLayoutModel {
    name: String,
    detections: Vec<Detection>,
}

impl RecordedLayoutModel {
    pub fn new(name: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            name: name.into(),
            detections,
        }
    }

    /// Load recorded regions from a JSON array of [`RawRegion`]s.
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let regions: Vec<RawRegion> = serde_json::from_str(json_str)?;
        Ok(Self::new("recorded", regions_to_detections(&regions)))
    }

    /// Load recorded regions from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            LayoutEvalError::ModelError(format!("cannot open {}: {}", path.display(), err))
        })?;
        let regions: Vec<RawRegion> = serde_json::from_reader(BufReader::new(file))?;
        let detections = regions_to_detections(&regions);

        info!(
            path = %path.display(),
            regions = regions.len(),
            detections = detections.len(),
            "loaded recorded layout"
        );

        Ok(Self::new(path.display().to_string(), detections))
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl LayoutModel for RecordedLayoutModel {
    fn detect(&self, _image: &RgbImage) -> Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
