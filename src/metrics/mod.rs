//! Metrics calculation for layout evaluation.

pub mod iou;
pub mod precision_recall;
pub mod f1_score;

pub use iou::{calculate_iou, calculate_iou_matrix};
pub use precision_recall::{calculate_precision_recall, PrecisionRecall};
pub use f1_score::{calculate_f1_from_pr, calculate_f1_score};

use crate::types::{MatchResult, Metrics};

/// Aggregate a match result into precision, recall, F1 and mean IoU.
///
/// `iou_mean` is averaged over true positive pairs only and is 0.0 when
/// there are none.
///
/// # Example
///
/// ```
/// use layout_eval::metrics::aggregate;
/// use layout_eval::types::MatchResult;
///
/// let metrics = aggregate(&MatchResult::default());
/// assert_eq!(metrics.tp, 0);
/// assert_eq!(metrics.f1_score, 0.0);
/// ```
pub fn aggregate(result: &MatchResult) -> Metrics {
    let tp = result.true_positives();
    let fp = result.false_positives();
    let fn_ = result.false_negatives();

    let pr = calculate_precision_recall(tp, fp, fn_);
    let f1_score = calculate_f1_from_pr(&pr);

    let iou_total: f64 = result.matched_ious().sum();
    let iou_mean = if tp > 0 { iou_total / tp as f64 } else { 0.0 };

    Metrics {
        precision: pr.precision,
        recall: pr.recall,
        f1_score,
        iou_mean,
        tp,
        fp,
        fn_,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BoundingBox, Outcome};

    fn tp(iou: f64) -> Outcome {
        Outcome::TruePositive {
            detection: 0,
            annotation: 0,
            bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            category: "text".to_string(),
            iou,
        }
    }

    #[test]
    fn test_aggregate_mixed() {
        let result = MatchResult {
            outcomes: vec![
                tp(0.8),
                tp(0.6),
                Outcome::FalsePositive {
                    detection: 2,
                    bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                    category: "text".to_string(),
                },
                Outcome::FalseNegative {
                    annotation: 2,
                    bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                    category: "title".to_string(),
                },
            ],
        };

        let metrics = aggregate(&result);
        assert_eq!((metrics.tp, metrics.fp, metrics.fn_), (2, 1, 1));
        assert!((metrics.precision - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics.recall - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics.f1_score - 2.0 / 3.0).abs() < 1e-10);
        assert!((metrics.iou_mean - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&MatchResult::default()), Metrics::default());
    }
}
