use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::is_below_threshold;
use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Fixed UI colors
// ---------------------------------------------------------------------------

/// Card accent for the row-count metric.
pub const COUNT_BLUE: Color32 = Color32::from_rgb(0x1a, 0x73, 0xe8);

/// Scores at or above the attention threshold.
pub const SCORE_GREEN: Color32 = Color32::from_rgb(0x2e, 0x7d, 0x32);

/// Scores below the attention threshold.
pub const SCORE_RED: Color32 = Color32::from_rgb(0xd3, 0x2f, 0x2f);

/// Green or red depending on which side of the threshold `score` falls.
pub fn score_color(score: f64) -> Color32 {
    if is_below_threshold(score) {
        SCORE_RED
    } else {
        SCORE_GREEN
    }
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a grouping column to distinct colours, so a
/// series keeps its colour while filters change.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &std::collections::BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<CellValue, Color32> = unique_values
            .iter()
            .zip(palette.into_iter())
            .map(|(v, c): (&CellValue, Color32)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given cell value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}
