//! Main evaluation orchestrator: match detections, then aggregate metrics.

use crate::config::EvalConfig;
use crate::error::Result;
use crate::matching::match_detections;
use crate::metrics::aggregate;
use crate::types::{Detection, GroundTruthAnnotation, MatchResult, Metrics};
use tracing::info;

/// Matching outcome and derived metrics for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: MatchResult,
    pub metrics: Metrics,
}

/// Evaluate layout detections against ground truth annotations.
///
/// Uses `config.iou_threshold` as the inclusive match threshold.
///
/// # Example
///
/// ```
/// use layout_eval::config::EvalConfig;
/// use layout_eval::evaluator::evaluate;
///
/// let evaluation = evaluate(&[], &[], &EvalConfig::default()).unwrap();
/// assert_eq!(evaluation.metrics.precision, 0.0);
/// ```
pub fn evaluate(
    detections: &[Detection],
    annotations: &[GroundTruthAnnotation],
    config: &EvalConfig,
) -> Result<Evaluation> {
    let result = match_detections(detections, annotations, config.iou_threshold)?;
    let metrics = aggregate(&result);

    info!(
        detections = detections.len(),
        annotations = annotations.len(),
        tp = metrics.tp,
        fp = metrics.fp,
        fn_ = metrics.fn_,
        f1 = metrics.f1_score,
        "evaluated layout"
    );

    Ok(Evaluation { result, metrics })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn test_threshold_from_config() {
        // IoU of these boxes is 0.6
        let detections = vec![Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 6.0), "text", 0.9)];
        let annotations = vec![GroundTruthAnnotation {
            bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            category_id: 1,
            category: "text".to_string(),
        }];

        let lenient = evaluate(&detections, &annotations, &EvalConfig::default()).unwrap();
        assert_eq!(lenient.metrics.tp, 1);

        let strict = EvalConfig {
            iou_threshold: 0.75,
            ..EvalConfig::default()
        };
        let strict = evaluate(&detections, &annotations, &strict).unwrap();
        assert_eq!(strict.metrics.tp, 0);
        assert_eq!(strict.metrics.fp, 1);
        assert_eq!(strict.metrics.fn_, 1);
    }
}
