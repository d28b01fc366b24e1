//! JSON loading utilities for COCO-style ground truth documents.

use crate::error::{LayoutEvalError, Result};
use crate::types::{GroundTruthAnnotation, GroundTruthDocument};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load ground truth annotations from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
///
/// # Example
///
/// ```no_run
/// use layout_eval::loader::load_ground_truth_from_file;
///
/// let annotations = load_ground_truth_from_file("page_001.json").unwrap();
/// println!("Loaded {} annotations", annotations.len());
/// ```
pub fn load_ground_truth_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<GroundTruthAnnotation>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let document: GroundTruthDocument = serde_json::from_reader(reader)?;

    resolve_document(document)
}

/// Load ground truth annotations from a JSON string.
///
/// # Example
///
/// ```
/// use layout_eval::loader::load_ground_truth_from_str;
///
/// let json = r#"{
///     "categories": [{"id": 1, "name": "Title"}],
///     "annotations": [{"bbox": [0, 0, 10, 10], "category_id": 1}]
/// }"#;
/// let annotations = load_ground_truth_from_str(json).unwrap();
/// assert_eq!(annotations[0].category, "title");
/// ```
pub fn load_ground_truth_from_str(json_str: &str) -> Result<Vec<GroundTruthAnnotation>> {
    let document: GroundTruthDocument = serde_json::from_str(json_str)?;
    resolve_document(document)
}

/// Load ground truth annotations from raw JSON bytes, e.g. an uploaded file.
pub fn load_ground_truth_from_slice(bytes: &[u8]) -> Result<Vec<GroundTruthAnnotation>> {
    let document: GroundTruthDocument = serde_json::from_slice(bytes)?;
    resolve_document(document)
}

/// Validate the document and resolve every annotation's category name.
fn resolve_document(document: GroundTruthDocument) -> Result<Vec<GroundTruthAnnotation>> {
    let categories = document
        .categories
        .ok_or_else(|| LayoutEvalError::MissingField("categories".to_string()))?;
    let annotations = document
        .annotations
        .ok_or_else(|| LayoutEvalError::MissingField("annotations".to_string()))?;

    let mut names: HashMap<i64, String> = HashMap::with_capacity(categories.len());
    for category in categories {
        if names.insert(category.id, category.name.to_lowercase()).is_some() {
            return Err(LayoutEvalError::InvalidAnnotation(format!(
                "Duplicate category id {}",
                category.id
            )));
        }
    }

    annotations
        .into_iter()
        .enumerate()
        .map(|(index, annotation)| {
            let bbox = annotation.to_bbox().map_err(|err| match err {
                LayoutEvalError::InvalidAnnotation(msg) => {
                    LayoutEvalError::InvalidAnnotation(format!("Annotation {}: {}", index, msg))
                }
                other => other,
            })?;
            bbox.validate().map_err(|err| match err {
                LayoutEvalError::InvalidBoundingBox(msg) => {
                    LayoutEvalError::InvalidBoundingBox(format!("Annotation {}: {}", index, msg))
                }
                other => other,
            })?;

            let category = names.get(&annotation.category_id).cloned().ok_or_else(|| {
                LayoutEvalError::UnknownCategory(format!(
                    "Annotation {} references category_id {} which is not declared",
                    index, annotation.category_id
                ))
            })?;

            Ok(GroundTruthAnnotation {
                bbox,
                category_id: annotation.category_id,
                category,
            })
        })
        .collect()
}
