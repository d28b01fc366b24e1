//! # layout-eval
//!
//! Document layout detection and evaluation against COCO-style ground truth.
//!
//! The library wraps a layout detection model behind two operations:
//! - **detect**: draw the model's layout regions on the page image
//! - **evaluate**: match the regions against ground truth and report
//!   precision, recall, F1 and mean IoU with a color-coded image
//!   (TP green, FP red, FN blue)
//!
//! ## Quick Start
//!
//! ```rust
//! use layout_eval::config::EvalConfig;
//! use layout_eval::evaluator::evaluate;
//! use layout_eval::loader::load_ground_truth_from_str;
//! use layout_eval::types::{BoundingBox, Detection};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let annotations = load_ground_truth_from_str(r#"{
//!     "categories": [{"id": 1, "name": "title"}],
//!     "annotations": [{"bbox": [0, 0, 10, 10], "category_id": 1}]
//! }"#)?;
//! let detections = vec![Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "title", 0.9)];
//!
//! let evaluation = evaluate(&detections, &annotations, &EvalConfig::default())?;
//! assert_eq!(evaluation.metrics.f1_score, 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Ground Truth Format
//!
//! ```json
//! {
//!   "categories": [{"id": 1, "name": "title"}],
//!   "annotations": [{"bbox": [x, y, width, height], "category_id": 1}]
//! }
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod loader;
pub mod metrics;
pub mod matching;
pub mod evaluator;
pub mod model;
pub mod visualize;
pub mod service;

// Re-export commonly used types and functions
pub use error::{LayoutEvalError, Result};
pub use types::{
    BoundingBox, Detection, GroundTruthAnnotation, MatchResult, Metrics, Outcome,
    EvaluationReport, HealthStatus,
};
pub use config::EvalConfig;
pub use loader::{load_ground_truth_from_file, load_ground_truth_from_slice, load_ground_truth_from_str};
pub use matching::match_detections;
pub use metrics::{aggregate, calculate_iou};
pub use model::{LayoutModel, RecordedLayoutModel};
pub use service::LayoutService;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_compiles() {
        // Basic smoke test to ensure the library compiles
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.validate().is_ok());
    }
}
