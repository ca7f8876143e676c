use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a categorical column to distinct colours, so
/// a category keeps its colour across charts and filter changes.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<String>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values
            .iter()
            .zip(palette)
            .map(|(v, c)| (v.clone(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a category label.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}
