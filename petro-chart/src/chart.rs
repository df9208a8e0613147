use serde::{Deserialize, Serialize};

use crate::{
    curve::{Curve, CurveKey},
    error::InputError,
    palette,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    #[default]
    Line,
    Fill,
    /// Categorical blocks. Inside a line pad this draws like `Line`.
    Row,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillSide {
    Left,
    #[default]
    Right,
}

/// Which clip border a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderSide {
    Min,
    Max,
}

impl BorderSide {
    /// The "no clip" value of this side.
    pub fn unset(self) -> f64 {
        match self {
            BorderSide::Min => f64::NEG_INFINITY,
            BorderSide::Max => f64::INFINITY,
        }
    }
}

/// Clip border from user text. Only plain digit strings count as a value,
/// everything else (signs, decimals, blanks) means "no clip" on that side.
pub fn parse_border_text(text: &str, side: BorderSide) -> f64 {
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        text.parse().unwrap_or(side.unset())
    } else {
        side.unset()
    }
}

/// Row border from user text. Accepts `,` as decimal separator.
pub fn parse_border_value(text: &str) -> Result<f64, InputError> {
    match text.trim().replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputError::NotANumber(text.to_string())),
    }
}

/// Replaces every value above `max` by `max` and every value below `min` by `min`.
/// NaN passes through.
pub fn clip(dots: &[f64], min: f64, max: f64) -> Vec<f64> {
    dots.iter()
        .map(|&v| {
            let v = if v > max { max } else { v };
            if v < min {
                min
            } else {
                v
            }
        })
        .collect()
}

/// Sorted border values for row segmentation. Always bounded by both infinities.
#[derive(Clone, Debug, PartialEq)]
pub struct Borders(Vec<f64>);

impl Default for Borders {
    fn default() -> Self {
        Self(vec![f64::NEG_INFINITY, f64::INFINITY])
    }
}

impl Borders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_finite(values: impl IntoIterator<Item = f64>) -> Self {
        let mut borders = Self::default();
        for value in values {
            borders.insert(value);
        }
        borders
    }

    /// Adds a finite value. Returns false for infinities, NaN and values
    /// already present.
    pub fn insert(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.0.binary_search_by(|b| b.total_cmp(&value)) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, value);
                true
            }
        }
    }

    /// Removes a finite value. The sentinels cannot be removed.
    pub fn remove(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.0.iter().position(|&b| b == value) {
            Some(pos) => {
                self.0.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn finite(&self) -> impl Iterator<Item = f64> + '_ {
        self.0[1..self.0.len() - 1].iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false, the sentinels are never removed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of intervals between consecutive borders.
    pub fn segments(&self) -> usize {
        self.0.len() - 1
    }

    /// Interval index holding `value`, intervals are closed on the lower side.
    pub fn segment_of(&self, value: f64) -> Option<usize> {
        if value.is_nan() {
            return None;
        }
        let idx = self.0.partition_point(|&b| b <= value);
        Some(idx.saturating_sub(1).min(self.segments() - 1))
    }
}

/// One curve drawn inside a pad.
#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub(crate) curve: CurveKey,
    pub display_type: DisplayType,
    pub color: String,
    pub fill_side: FillSide,
    pub(crate) min_border: f64,
    pub(crate) max_border: f64,
    pub(crate) borders: Borders,
    pub(crate) border_colors: Vec<String>,
}

impl Chart {
    pub fn new(curve: CurveKey) -> Self {
        Self {
            curve,
            display_type: DisplayType::Line,
            color: "black".to_string(),
            fill_side: FillSide::Right,
            min_border: f64::NEG_INFINITY,
            max_border: f64::INFINITY,
            borders: Borders::new(),
            border_colors: vec!["blue".to_string()],
        }
    }

    pub fn curve(&self) -> &CurveKey {
        &self.curve
    }

    pub fn min_border(&self) -> f64 {
        self.min_border
    }

    pub fn max_border(&self) -> f64 {
        self.max_border
    }

    pub fn set_border_text(&mut self, side: BorderSide, text: &str) {
        self.set_border(side, parse_border_text(text, side));
    }

    /// Sets a clip border directly. NaN unsets it.
    pub fn set_border(&mut self, side: BorderSide, value: f64) {
        let value = if value.is_nan() { side.unset() } else { value };
        match side {
            BorderSide::Min => self.min_border = value,
            BorderSide::Max => self.max_border = value,
        }
    }

    pub fn borders(&self) -> &Borders {
        &self.borders
    }

    pub fn borders_mut(&mut self) -> &mut Borders {
        &mut self.borders
    }

    pub fn border_colors(&self) -> &[String] {
        &self.border_colors
    }

    pub fn set_border_colors(&mut self, colors: Vec<String>) {
        self.border_colors = colors;
    }

    /// The curve's dots with both clip borders applied.
    pub fn clipped_dots(&self, curve: &Curve) -> Vec<f64> {
        clip(curve.dots(), self.min_border, self.max_border)
    }

    /// One colour per row segment. Configured colours come first.
    pub fn border_colors_for(&self, segments: usize) -> Vec<String> {
        palette::fill_colors(&self.border_colors, segments)
    }

    /// Pins a random palette colour to every segment.
    pub fn shuffle_border_colors(&mut self, seed: u64) {
        self.border_colors = palette::shuffled_colors(self.borders.segments(), seed);
    }
}
