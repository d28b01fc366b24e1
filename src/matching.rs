//! Detection matching utilities for evaluating predictions against ground truth.

use crate::config::validate_threshold;
use crate::error::Result;
use crate::metrics::iou::calculate_iou;
use crate::types::{Detection, GroundTruthAnnotation, MatchResult, Outcome};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// A candidate (detection, annotation) pair whose IoU clears the threshold.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    detection: usize,
    annotation: usize,
    iou: f64,
}

impl Candidate {
    /// Highest IoU first, then lower detection index, then lower annotation index.
    fn selection_order(&self, other: &Self) -> Ordering {
        other
            .iou
            .total_cmp(&self.iou)
            .then(self.detection.cmp(&other.detection))
            .then(self.annotation.cmp(&other.annotation))
    }
}

/// Match layout detections to ground truth annotations for a single image.
///
/// Matching is greedy and scoped to each category: within a category the
/// highest-IoU pair at or above `iou_threshold` is taken first, both sides are
/// consumed, and the process repeats until no qualifying pair remains. Ties
/// are broken by detection order, then annotation order, so identical input
/// always produces an identical result.
///
/// Unconsumed detections become false positives, including detections whose
/// category never appears in the ground truth. Unconsumed annotations become
/// false negatives.
///
/// # Errors
///
/// Returns [`crate::LayoutEvalError::InvalidThreshold`] if `iou_threshold` is
/// outside `[0, 1]`.
///
/// # Example
///
/// ```
/// use layout_eval::matching::match_detections;
/// use layout_eval::types::{BoundingBox, Detection, GroundTruthAnnotation};
///
/// let detections = vec![Detection::new(BoundingBox::new(0.0, 0.0, 10.0, 10.0), "title", 0.9)];
/// let annotations = vec![GroundTruthAnnotation {
///     bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
///     category_id: 1,
///     category: "title".to_string(),
/// }];
///
/// let result = match_detections(&detections, &annotations, 0.5).unwrap();
/// assert_eq!(result.true_positives(), 1);
/// ```
pub fn match_detections(
    detections: &[Detection],
    annotations: &[GroundTruthAnnotation],
    iou_threshold: f64,
) -> Result<MatchResult> {
    validate_threshold(iou_threshold)?;

    let detection_groups = group_by_category(detections.iter().map(|d| d.category.as_str()));
    let annotation_groups = group_by_category(annotations.iter().map(|a| a.category.as_str()));

    let mut detection_used = vec![false; detections.len()];
    let mut annotation_used = vec![false; annotations.len()];
    let mut outcomes = Vec::with_capacity(detections.len() + annotations.len());

    for (category, detection_indices) in &detection_groups {
        let Some(annotation_indices) = annotation_groups.get(category) else {
            continue;
        };

        let mut candidates = Vec::new();
        for &d in detection_indices {
            for &a in annotation_indices {
                let iou = calculate_iou(&detections[d].bbox, &annotations[a].bbox);
                if iou >= iou_threshold {
                    candidates.push(Candidate {
                        detection: d,
                        annotation: a,
                        iou,
                    });
                }
            }
        }
        candidates.sort_by(Candidate::selection_order);

        let mut matched = 0usize;
        for candidate in candidates {
            if detection_used[candidate.detection] || annotation_used[candidate.annotation] {
                continue;
            }
            detection_used[candidate.detection] = true;
            annotation_used[candidate.annotation] = true;
            matched += 1;

            let detection = &detections[candidate.detection];
            outcomes.push(Outcome::TruePositive {
                detection: candidate.detection,
                annotation: candidate.annotation,
                bbox: detection.bbox,
                category: detection.category.clone(),
                iou: candidate.iou,
            });
        }

        debug!(
            category = %category,
            detections = detection_indices.len(),
            annotations = annotation_indices.len(),
            matched,
            "matched category"
        );
    }

    for (index, detection) in detections.iter().enumerate() {
        if !detection_used[index] {
            outcomes.push(Outcome::FalsePositive {
                detection: index,
                bbox: detection.bbox,
                category: detection.category.clone(),
            });
        }
    }

    for (index, annotation) in annotations.iter().enumerate() {
        if !annotation_used[index] {
            outcomes.push(Outcome::FalseNegative {
                annotation: index,
                bbox: annotation.bbox,
                category: annotation.category.clone(),
            });
        }
    }

    Ok(MatchResult { outcomes })
}

/// Group item indices by category name, preserving input order within a group.
pub fn group_by_category<'a, I>(categories: I) -> BTreeMap<&'a str, Vec<usize>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();

    for (index, category) in categories.into_iter().enumerate() {
        groups.entry(category).or_default().push(index);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn detection(bbox: [f64; 4], category: &str) -> Detection {
        Detection::new(BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]), category, 0.9)
    }

    fn annotation(bbox: [f64; 4], category: &str) -> GroundTruthAnnotation {
        GroundTruthAnnotation {
            bbox: BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]),
            category_id: 1,
            category: category.to_string(),
        }
    }

    #[test]
    fn test_perfect_match() {
        let detections = vec![detection([10.0, 10.0, 50.0, 50.0], "title")];
        let annotations = vec![annotation([10.0, 10.0, 50.0, 50.0], "title")];

        let result = match_detections(&detections, &annotations, 0.5).unwrap();
        assert_eq!(result.outcomes.len(), 1);
        assert!(matches!(result.outcomes[0], Outcome::TruePositive { iou, .. } if iou > 0.99));
    }

    #[test]
    fn test_no_match() {
        let detections = vec![detection([10.0, 10.0, 50.0, 50.0], "title")];
        let annotations = vec![annotation([200.0, 200.0, 50.0, 50.0], "title")];

        let result = match_detections(&detections, &annotations, 0.5).unwrap();
        assert_eq!(result.false_positives(), 1);
        assert_eq!(result.false_negatives(), 1);
        assert_eq!(result.true_positives(), 0);
    }

    #[test]
    fn test_category_mismatch_is_not_a_match() {
        let detections = vec![detection([0.0, 0.0, 10.0, 10.0], "table")];
        let annotations = vec![annotation([0.0, 0.0, 10.0, 10.0], "figure")];

        let result = match_detections(&detections, &annotations, 0.5).unwrap();
        assert_eq!(result.true_positives(), 0);
        assert_eq!(result.false_positives(), 1);
        assert_eq!(result.false_negatives(), 1);
    }

    #[test]
    fn test_highest_iou_pair_wins() {
        // Detection 0 overlaps annotation 0 moderately; detection 1 overlaps it
        // exactly. Greedy selection must give the annotation to detection 1.
        let detections = vec![
            detection([0.0, 0.0, 10.0, 12.0], "text"),
            detection([0.0, 0.0, 10.0, 10.0], "text"),
        ];
        let annotations = vec![annotation([0.0, 0.0, 10.0, 10.0], "text")];

        let result = match_detections(&detections, &annotations, 0.5).unwrap();
        assert!(matches!(
            result.outcomes[0],
            Outcome::TruePositive { detection: 1, annotation: 0, .. }
        ));
        assert!(matches!(result.outcomes[1], Outcome::FalsePositive { detection: 0, .. }));
    }

    #[test]
    fn test_ties_prefer_earlier_detection() {
        let detections = vec![
            detection([0.0, 0.0, 10.0, 10.0], "text"),
            detection([0.0, 0.0, 10.0, 10.0], "text"),
        ];
        let annotations = vec![annotation([0.0, 0.0, 10.0, 10.0], "text")];

        let result = match_detections(&detections, &annotations, 0.5).unwrap();
        assert!(matches!(result.outcomes[0], Outcome::TruePositive { detection: 0, .. }));
        assert!(matches!(result.outcomes[1], Outcome::FalsePositive { detection: 1, .. }));
    }

    #[test]
    fn test_invalid_threshold() {
        assert!(match_detections(&[], &[], 1.5).is_err());
        assert!(match_detections(&[], &[], -0.1).is_err());
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(["text", "title", "text"]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["text"], vec![0, 2]);
        assert_eq!(groups["title"], vec![1]);
    }
}
