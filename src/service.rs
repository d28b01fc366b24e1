//! Request-level operations: detect, evaluate and health.
//!
//! A [`LayoutService`] owns the shared layout model and the evaluation
//! settings. It holds no mutable state, so one instance can serve any number
//! of concurrent requests.

use crate::config::EvalConfig;
use crate::error::{LayoutEvalError, Result};
use crate::evaluator::evaluate;
use crate::loader::load_ground_truth_from_slice;
use crate::model::LayoutModel;
use crate::types::{EvaluationReport, HealthStatus};
use crate::visualize::{encode_png, png_data_uri, render_evaluation, render_layout};
use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, info};

/// Layout detection and evaluation over raw request bytes.
#[derive(Clone)]
pub struct LayoutService {
    model: Arc<dyn LayoutModel>,
    config: EvalConfig,
}

impl LayoutService {
    /// Create a service around an already-loaded model.
    pub fn new(model: Arc<dyn LayoutModel>, config: EvalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { model, config })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Run the model and return a PNG with its regions drawn by category.
    pub fn detect(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        let image = decode_image(image_bytes)?;
        let detections = self.model.detect(&image)?;

        info!(
            model = self.model.name(),
            width = image.width(),
            height = image.height(),
            detections = detections.len(),
            "detected layout"
        );

        let rendered = render_layout(&image, &detections, self.config.line_width);
        encode_png(&rendered)
    }

    /// Run the model, compare against the ground truth document and return the
    /// rounded metrics together with the rendered evaluation image.
    pub fn evaluate(&self, image_bytes: &[u8], ground_truth_bytes: &[u8]) -> Result<EvaluationReport> {
        let image = decode_image(image_bytes)?;
        let annotations = load_ground_truth_from_slice(ground_truth_bytes)?;
        let detections = self.model.detect(&image)?;

        debug!(
            model = self.model.name(),
            detections = detections.len(),
            annotations = annotations.len(),
            "evaluating layout"
        );

        let evaluation = evaluate(&detections, &annotations, &self.config)?;
        let rendered = render_evaluation(&image, &evaluation.result, self.config.line_width);
        let png = encode_png(&rendered)?;

        Ok(EvaluationReport {
            metrics: evaluation.metrics.rounded(self.config.report_decimals),
            image: png_data_uri(&png),
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::ok()
    }
}

/// Decode uploaded image bytes into an RGB image.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    if bytes.is_empty() {
        return Err(LayoutEvalError::EmptyImage);
    }
    Ok(image::load_from_memory(bytes)?.to_rgb8())
}
