use std::collections::BTreeMap;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

use crate::error::SetupError;

/// Line colours used when no override is given, in assignment order.
pub const DEFAULT_MODEL_COLORS: [&str; 8] = [
    "black", "red", "blue", "green", "cyan", "yellow", "magenta", "orange",
];

/// Line styles, cycled per lead-time range.
pub const LINE_STYLES: [&str; 4] = ["-", ":", "--", "-."];

/// Marker styles, cycled per lead-time range.
pub const MARKER_STYLES: [&str; 4] = ["D", "^", "o", "v"];

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues, as hex.
pub fn generate_palette(n: usize) -> Vec<String> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            format!(
                "#{:02x}{:02x}{:02x}",
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Resolve a colour name (`"red"`) or hex code (`"#ff8800"`) to RGB.
/// Renderer-specific codes such as `"C0"` stay unresolved.
pub fn resolve_rgb(color: &str) -> Option<Srgb<u8>> {
    palette::named::from_str(&color.to_ascii_lowercase())
        .or_else(|| Srgb::<u8>::from_str(color).ok())
}

/// Line style and marker for the n-th lead-time range of a panel.
pub fn line_style(index: usize) -> (&'static str, &'static str) {
    (
        LINE_STYLES[index % LINE_STYLES.len()],
        MARKER_STYLES[index % MARKER_STYLES.len()],
    )
}

// ---------------------------------------------------------------------------
// Model → colour mapping
// ---------------------------------------------------------------------------

/// Maps model versions to line colours. Built once by the setup compiler and
/// handed to the renderer with the rest of the plot setup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelColors {
    mapping: BTreeMap<String, String>,
    default_color: String,
}

impl ModelColors {
    /// Assign the default colours in model order; extra models get generated hues.
    pub fn with_defaults(models: &[String]) -> Self {
        let extra = models.len().saturating_sub(DEFAULT_MODEL_COLORS.len());
        let colors: Vec<String> = DEFAULT_MODEL_COLORS
            .iter()
            .map(|c| c.to_string())
            .chain(generate_palette(extra))
            .collect();
        Self::zip(models, &colors)
    }

    /// Assign user colours in model order. Fails if there are fewer colours than models.
    pub fn with_override(models: &[String], colors: &[String]) -> Result<Self, SetupError> {
        if colors.len() < models.len() {
            return Err(SetupError::TooFewColors {
                colors: colors.len(),
                models: models.len(),
            });
        }
        for c in colors {
            if resolve_rgb(c).is_none() {
                log::debug!("colour '{c}' is passed to the renderer unresolved");
            }
        }
        Ok(Self::zip(models, colors))
    }

    fn zip(models: &[String], colors: &[String]) -> Self {
        let mut mapping = BTreeMap::new();
        for (m, c) in models.iter().zip(colors.iter()) {
            mapping.entry(m.clone()).or_insert_with(|| c.clone());
        }
        ModelColors {
            mapping,
            default_color: "gray".to_string(),
        }
    }

    /// Look up the colour of a model version.
    pub fn color_for(&self, model: &str) -> &str {
        self.mapping
            .get(model)
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    /// Return the legend entries (model → colour).
    pub fn legend_entries(&self) -> Vec<(String, String)> {
        self.mapping
            .iter()
            .map(|(m, c)| (m.clone(), c.clone()))
            .collect()
    }
}
