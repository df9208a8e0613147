use serde::{Deserialize, Serialize};

use crate::chart::Chart;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadMode {
    #[default]
    Line,
    Row,
}

/// Rendering options shared by all charts of a pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadOptions {
    pub mode: PadMode,
    pub log_scale: bool,
    pub fixed_border_scale: bool,
    pub grid_lines: u32,
    pub width: u32,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            mode: PadMode::Line,
            log_scale: false,
            fixed_border_scale: false,
            grid_lines: 5,
            width: 3,
        }
    }
}

/// A vertical track of charts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pad {
    pub(crate) charts: Vec<Chart>,
    pub(crate) options: PadOptions,
}

impl Pad {
    pub fn new(options: PadOptions) -> Self {
        Self {
            charts: Vec::new(),
            options,
        }
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    pub fn chart(&self, index: usize) -> Option<&Chart> {
        self.charts.get(index)
    }

    pub fn chart_mut(&mut self, index: usize) -> Option<&mut Chart> {
        self.charts.get_mut(index)
    }

    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    pub fn add_chart(&mut self, chart: Chart) {
        self.charts.push(chart);
    }

    pub fn remove_chart(&mut self, index: usize) -> Option<Chart> {
        (index < self.charts.len()).then(|| self.charts.remove(index))
    }

    /// Header cells this pad fills. Row pads show at most one.
    pub fn header_cells(&self) -> usize {
        match self.options.mode {
            PadMode::Line => self.charts.len(),
            PadMode::Row => self.charts.len().min(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveKey;

    #[test]
    fn test_add_remove_chart() {
        let mut pad = Pad::default();
        pad.add_chart(Chart::new(CurveKey::new("GR", "w")));
        pad.add_chart(Chart::new(CurveKey::new("NPHI", "w")));
        assert_eq!(pad.header_cells(), 2);
        assert!(pad.remove_chart(5).is_none());
        let removed = pad.remove_chart(0).unwrap();
        assert_eq!(removed.curve(), &CurveKey::new("GR", "w"));
        assert_eq!(pad.charts()[0].curve(), &CurveKey::new("NPHI", "w"));
        pad.options.mode = PadMode::Row;
        assert_eq!(pad.header_cells(), 1);
    }
}
