//! Core data types for layout detections, annotations and evaluations.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutEvalError, Result};

/// Represents a bounding box in COCO format (x, y, width, height).
///
/// Coordinates are in LTWH (Left-Top-Width-Height) format, in image pixels
/// with the origin at the top-left corner:
/// - x: Left coordinate
/// - y: Top coordinate
/// - width: Box width
/// - height: Box height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a bounding box from corner coordinates `[x1, y1, x2, y2]`.
    pub fn from_xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Convert to corner coordinates `[x1, y1, x2, y2]`.
    pub fn to_xyxy(&self) -> [f64; 4] {
        [self.x, self.y, self.right(), self.bottom()]
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check that every coordinate is finite and both dimensions are non-negative.
    pub fn validate(&self) -> Result<()> {
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(LayoutEvalError::InvalidBoundingBox(format!(
                "non-finite coordinates in {:?}",
                values
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(LayoutEvalError::InvalidBoundingBox(format!(
                "negative dimensions {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A layout region produced by the layout model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Lowercased category label, e.g. `"title"` or `"table"`.
    pub category: String,
    /// Confidence in [0, 1].
    pub confidence: f32,
}

impl Detection {
    /// Create a detection, normalizing the category label to lowercase.
    pub fn new(bbox: BoundingBox, category: impl AsRef<str>, confidence: f32) -> Self {
        Self {
            bbox,
            category: category.as_ref().to_lowercase(),
            confidence,
        }
    }
}

/// Represents a category in the ground truth document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Raw annotation as it appears in the ground truth JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Bounding box in [x, y, width, height] format
    pub bbox: Vec<f64>,
    pub category_id: i64,
}

impl Annotation {
    /// Convert the bbox array to a BoundingBox struct.
    pub fn to_bbox(&self) -> Result<BoundingBox> {
        if self.bbox.len() != 4 {
            return Err(LayoutEvalError::InvalidAnnotation(format!(
                "Expected 4 bbox values, got {}",
                self.bbox.len()
            )));
        }
        Ok(BoundingBox::new(
            self.bbox[0],
            self.bbox[1],
            self.bbox[2],
            self.bbox[3],
        ))
    }
}

/// COCO-subset ground truth document.
///
/// Both lists are optional at the serde level so that a missing list is
/// reported as [`LayoutEvalError::MissingField`] instead of a generic JSON
/// error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroundTruthDocument {
    pub categories: Option<Vec<Category>>,
    pub annotations: Option<Vec<Annotation>>,
}

/// A validated ground truth annotation with its category name resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct GroundTruthAnnotation {
    pub bbox: BoundingBox,
    pub category_id: i64,
    /// Lowercased category name.
    pub category: String,
}

/// Classification of a single detection or annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A detection paired with a ground truth annotation.
    TruePositive {
        detection: usize,
        annotation: usize,
        /// The detection's box.
        bbox: BoundingBox,
        category: String,
        iou: f64,
    },
    /// A detection that matched nothing.
    FalsePositive {
        detection: usize,
        bbox: BoundingBox,
        category: String,
    },
    /// A ground truth annotation that no detection matched.
    FalseNegative {
        annotation: usize,
        bbox: BoundingBox,
        category: String,
    },
}

impl Outcome {
    /// The box drawn for this outcome.
    pub fn bbox(&self) -> &BoundingBox {
        match self {
            Outcome::TruePositive { bbox, .. }
            | Outcome::FalsePositive { bbox, .. }
            | Outcome::FalseNegative { bbox, .. } => bbox,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            Outcome::TruePositive { category, .. }
            | Outcome::FalsePositive { category, .. }
            | Outcome::FalseNegative { category, .. } => category,
        }
    }

    /// Short status label: `TP`, `FP` or `FN`.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::TruePositive { .. } => "TP",
            Outcome::FalsePositive { .. } => "FP",
            Outcome::FalseNegative { .. } => "FN",
        }
    }
}

/// Result of matching detections against ground truth for one image.
///
/// Outcomes are ordered: true positives in selection order, then false
/// positives by detection index, then false negatives by annotation index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub outcomes: Vec<Outcome>,
}

impl MatchResult {
    pub fn true_positives(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::TruePositive { .. }))
            .count()
    }

    pub fn false_positives(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::FalsePositive { .. }))
            .count()
    }

    pub fn false_negatives(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::FalseNegative { .. }))
            .count()
    }

    /// IoU values of all true positive pairs.
    pub fn matched_ious(&self) -> impl Iterator<Item = f64> + '_ {
        self.outcomes.iter().filter_map(|o| match o {
            Outcome::TruePositive { iou, .. } => Some(*iou),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Evaluation metrics for a single image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    /// Mean IoU over true positive pairs.
    pub iou_mean: f64,
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

impl Metrics {
    /// Copy of these metrics with the ratios rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * factor).round() / factor;
        Self {
            precision: round(self.precision),
            recall: round(self.recall),
            f1_score: round(self.f1_score),
            iou_mean: round(self.iou_mean),
            ..self.clone()
        }
    }
}

/// Response payload of the evaluate operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(flatten)]
    pub metrics: Metrics,
    /// PNG data URI of the rendered evaluation image.
    pub image: String,
}

/// Response payload of the health check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}
