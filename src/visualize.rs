//! Box rendering and PNG encoding.
//!
//! Evaluation images use a fixed status palette (TP green, FP red, FN blue);
//! detection images color each region by its layout category.

use crate::error::Result;
use crate::types::{BoundingBox, Detection, MatchResult, Outcome};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::io::Cursor;

pub const TRUE_POSITIVE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const FALSE_POSITIVE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const FALSE_NEGATIVE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

/// Color for categories missing from the layout palette.
pub const DEFAULT_CATEGORY_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Outline color for a layout category. Unknown categories are gray.
pub fn category_color(category: &str) -> Rgb<u8> {
    match category.to_lowercase().as_str() {
        "title" => Rgb([255, 0, 0]),
        "text" => Rgb([0, 255, 0]),
        "list" => Rgb([255, 165, 0]),
        "table" => Rgb([0, 255, 255]),
        "figure" => Rgb([0, 0, 255]),
        "header" => Rgb([255, 0, 255]),
        "footer" => Rgb([128, 0, 128]),
        "reference" => Rgb([165, 42, 42]),
        _ => DEFAULT_CATEGORY_COLOR,
    }
}

/// Outline color for a match outcome.
pub fn outcome_color(outcome: &Outcome) -> Rgb<u8> {
    match outcome {
        Outcome::TruePositive { .. } => TRUE_POSITIVE_COLOR,
        Outcome::FalsePositive { .. } => FALSE_POSITIVE_COLOR,
        Outcome::FalseNegative { .. } => FALSE_NEGATIVE_COLOR,
    }
}

/// Draw every outcome of `result` on a copy of `image`.
///
/// True positives are drawn with the detection's box.
pub fn render_evaluation(image: &RgbImage, result: &MatchResult, line_width: u32) -> RgbImage {
    let mut canvas = image.clone();
    for outcome in &result.outcomes {
        draw_box(&mut canvas, outcome.bbox(), outcome_color(outcome), line_width);
    }
    canvas
}

/// Draw layout detections on a copy of `image`, colored by category.
pub fn render_layout(image: &RgbImage, detections: &[Detection], line_width: u32) -> RgbImage {
    let mut canvas = image.clone();
    for detection in detections {
        draw_box(
            &mut canvas,
            &detection.bbox,
            category_color(&detection.category),
            line_width,
        );
    }
    canvas
}

/// Draw a hollow box `line_width` pixels thick, growing inward.
///
/// The box is clamped to the image; zero-area boxes and boxes lying wholly
/// outside the image are skipped.
pub fn draw_box(image: &mut RgbImage, bbox: &BoundingBox, color: Rgb<u8>, line_width: u32) {
    if image.width() == 0 || image.height() == 0 || bbox.width <= 0.0 || bbox.height <= 0.0 {
        return;
    }

    let (w, h) = (image.width() as f64, image.height() as f64);
    let x_min = bbox.x.floor().max(0.0);
    let y_min = bbox.y.floor().max(0.0);
    let x_max = bbox.right().ceil().min(w - 1.0);
    let y_max = bbox.bottom().ceil().min(h - 1.0);

    if x_max < x_min || y_max < y_min {
        return;
    }

    let (x_min, y_min, x_max, y_max) = (x_min as i32, y_min as i32, x_max as i32, y_max as i32);

    for thickness in 0..line_width.max(1) as i32 {
        let left = x_min + thickness;
        let top = y_min + thickness;
        let right = x_max - thickness;
        let bottom = y_max - thickness;

        if right < left || bottom < top {
            break;
        }

        let rect = Rect::at(left, top).of_size((right - left + 1) as u32, (bottom - top + 1) as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// Encode an RGB image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Wrap PNG bytes in a `data:image/png;base64,...` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> RgbImage {
        RgbImage::new(width, height)
    }

    #[test]
    fn test_render_evaluation_colors() {
        let result = MatchResult {
            outcomes: vec![
                Outcome::TruePositive {
                    detection: 0,
                    annotation: 0,
                    bbox: BoundingBox::new(2.0, 2.0, 10.0, 10.0),
                    category: "text".to_string(),
                    iou: 1.0,
                },
                Outcome::FalsePositive {
                    detection: 1,
                    bbox: BoundingBox::new(20.0, 2.0, 10.0, 10.0),
                    category: "text".to_string(),
                },
                Outcome::FalseNegative {
                    annotation: 1,
                    bbox: BoundingBox::new(2.0, 20.0, 10.0, 10.0),
                    category: "title".to_string(),
                },
            ],
        };

        let image = blank(40, 40);
        let rendered = render_evaluation(&image, &result, 2);

        assert_eq!(rendered.dimensions(), image.dimensions());
        assert_eq!(*rendered.get_pixel(2, 2), TRUE_POSITIVE_COLOR);
        assert_eq!(*rendered.get_pixel(3, 3), TRUE_POSITIVE_COLOR);
        assert_eq!(*rendered.get_pixel(20, 2), FALSE_POSITIVE_COLOR);
        assert_eq!(*rendered.get_pixel(2, 20), FALSE_NEGATIVE_COLOR);
        // Interior is untouched
        assert_eq!(*rendered.get_pixel(7, 7), Rgb([0, 0, 0]));
        // Caller's image is untouched
        assert_eq!(*image.get_pixel(2, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_render_layout_palette() {
        let detections = vec![
            Detection::new(BoundingBox::new(0.0, 0.0, 5.0, 5.0), "table", 0.9),
            Detection::new(BoundingBox::new(10.0, 10.0, 5.0, 5.0), "equation", 0.9),
        ];
        let rendered = render_layout(&blank(20, 20), &detections, 1);
        assert_eq!(*rendered.get_pixel(0, 0), Rgb([0, 255, 255]));
        assert_eq!(*rendered.get_pixel(10, 10), DEFAULT_CATEGORY_COLOR);
    }

    #[test]
    fn test_boxes_outside_image_are_clamped_or_skipped() {
        let mut image = blank(10, 10);
        draw_box(&mut image, &BoundingBox::new(50.0, 50.0, 5.0, 5.0), FALSE_POSITIVE_COLOR, 2);
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));

        draw_box(&mut image, &BoundingBox::new(-5.0, -5.0, 100.0, 100.0), FALSE_POSITIVE_COLOR, 1);
        assert_eq!(*image.get_pixel(0, 0), FALSE_POSITIVE_COLOR);
        assert_eq!(*image.get_pixel(9, 9), FALSE_POSITIVE_COLOR);
        assert_eq!(*image.get_pixel(5, 5), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let png = encode_png(&blank(7, 3)).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (7, 3));

        let uri = png_data_uri(&png);
        assert!(uri.starts_with("data:image/png;base64,"));
    }
}
