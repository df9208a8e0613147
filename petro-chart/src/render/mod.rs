//! Turns pads and the depth window into draw instructions. Nothing here
//! draws, the output is consumed by a presentation layer such as the SVG
//! export.

mod logic;
mod row;

pub use logic::{
    dots_range, grid_positions, log_grid_positions, n_round, nan_min_max, padded_log_range,
    padded_range, positive_min_max, round_to, split_mass_nan,
};

use crate::{
    chart::{Chart, DisplayType, FillSide},
    curve::{Curve, CurveKey},
    curve_store::CurveStore,
    depth_window::DepthWindow,
    pad::{Pad, PadMode},
};

const CLIP_MARKER_COLOR: &str = "white";
const CLIP_MARKER_WIDTH: f64 = 2.0;
const FILL_OPACITY: f64 = 0.5;
const ROW_SUMMARY_COLOR: &str = "blue";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("curve {0} is not loaded")]
    UnknownCurve(CurveKey),

    #[error("no depth axis for curve {0}")]
    NoDepthAxis(CurveKey),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    /// Dotted overlay on samples sitting at a clip border.
    ClipMarker,
}

/// A polyline. NaN in `xs` leaves a gap.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: String,
    pub style: LineStyle,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FillPolygon {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub color: String,
    pub opacity: f64,
}

/// A coloured depth interval of a row pad.
#[derive(Clone, Debug, PartialEq)]
pub struct RowBlock {
    pub top: f64,
    pub bottom: f64,
    pub segment: usize,
    pub color: String,
}

/// Header line of one chart: name, colour and the labelled value range.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub name: String,
    pub color: String,
    pub min_label: String,
    pub unit: String,
    pub max_label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PadRender {
    pub index: usize,
    pub width: u32,
    pub mode: PadMode,
    pub x_range: (f64, f64),
    /// `(end, start)`, depth grows downwards.
    pub y_range: (f64, f64),
    pub log_scale: bool,
    pub series: Vec<Series>,
    pub fills: Vec<FillPolygon>,
    pub blocks: Vec<RowBlock>,
    pub grid_lines: Vec<f64>,
    pub summaries: Vec<Summary>,
    pub empty_cells: usize,
}

impl PadRender {
    fn empty(index: usize, pad: &Pad, window: &DepthWindow, empty_cells: usize) -> Self {
        Self {
            index,
            width: pad.options.width,
            mode: pad.options.mode,
            x_range: (0.0, 1.0),
            y_range: (window.end(), window.start()),
            log_scale: pad.options.log_scale,
            series: Vec::new(),
            fills: Vec::new(),
            blocks: Vec::new(),
            grid_lines: Vec::new(),
            summaries: Vec::new(),
            empty_cells,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionRender {
    /// `(start, end)` of the depth window, `None` before any file is loaded.
    pub window: Option<(f64, f64)>,
    /// Header rows every pad is padded to.
    pub header_rows: usize,
    pub pads: Vec<PadRender>,
}

/// Renders the pads from `first_visible` on.
pub fn render_session(
    pads: &[Pad],
    first_visible: usize,
    store: &CurveStore,
    window: Option<&DepthWindow>,
) -> Result<SessionRender, RenderError> {
    let header_rows = pads.iter().map(|p| p.charts.len()).max().unwrap_or(0);
    let Some(window) = window else {
        return Ok(SessionRender {
            window: None,
            header_rows,
            pads: Vec::new(),
        });
    };
    let pads = pads
        .iter()
        .enumerate()
        .skip(first_visible)
        .map(|(index, pad)| render_pad(index, pad, store, window, header_rows))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SessionRender {
        window: Some((window.start(), window.end())),
        header_rows,
        pads,
    })
}

struct Visible<'a> {
    chart: &'a Chart,
    curve: &'a Curve,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

fn visible<'a>(
    chart: &'a Chart,
    store: &'a CurveStore,
    window: &DepthWindow,
) -> Result<Visible<'a>, RenderError> {
    let curve = store
        .curve(chart.curve())
        .ok_or_else(|| RenderError::UnknownCurve(chart.curve().clone()))?;
    let depth = store
        .depth_axis(curve.depth_axis())
        .ok_or_else(|| RenderError::NoDepthAxis(chart.curve().clone()))?;
    let clipped = chart.clipped_dots(curve);
    let (xs, ys) = dots_range(&clipped, depth, window.start(), window.end());
    Ok(Visible {
        chart,
        curve,
        xs,
        ys,
    })
}

fn labels(range: Option<(f64, f64)>) -> (String, String) {
    match range {
        Some((lo, hi)) => {
            let places = n_round((hi - lo).abs());
            (
                format!("{}", round_to(lo, places)),
                format!("{}", round_to(hi, places)),
            )
        }
        None => (String::new(), String::new()),
    }
}

pub fn render_pad(
    index: usize,
    pad: &Pad,
    store: &CurveStore,
    window: &DepthWindow,
    header_rows: usize,
) -> Result<PadRender, RenderError> {
    let empty_cells = header_rows.saturating_sub(pad.header_cells());
    let mut out = PadRender::empty(index, pad, window, empty_cells);
    match pad.options.mode {
        PadMode::Line => render_lines(pad, store, window, &mut out)?,
        PadMode::Row => render_rows(pad, store, window, &mut out)?,
    }
    Ok(out)
}

fn render_lines(
    pad: &Pad,
    store: &CurveStore,
    window: &DepthWindow,
    out: &mut PadRender,
) -> Result<(), RenderError> {
    let charts = pad
        .charts
        .iter()
        .map(|chart| visible(chart, store, window))
        .collect::<Result<Vec<_>, _>>()?;

    let log_scale = pad.options.log_scale;
    // a log axis only has room for positive values
    let shown = |x: f64| x.is_finite() && (!log_scale || x > 0.0);

    let all: Vec<f64> = charts.iter().flat_map(|v| v.xs.iter().copied()).collect();
    let extremes = if log_scale {
        positive_min_max(&all)
    } else {
        nan_min_max(&all)
    };
    let (mut lo, mut hi) = match extremes {
        Some((lo, hi)) => (Some(lo), Some(hi)),
        None => (None, None),
    };
    if pad.options.fixed_border_scale {
        for v in &charts {
            if shown(v.chart.min_border()) {
                lo = Some(v.chart.min_border());
            }
            if shown(v.chart.max_border()) {
                hi = Some(v.chart.max_border());
            }
        }
    }
    let range = lo.zip(hi);
    if log_scale {
        out.x_range = range.map_or((1.0, 10.0), |(lo, hi)| padded_log_range(lo, hi));
        out.grid_lines = log_grid_positions(out.x_range, pad.options.grid_lines);
    } else {
        out.x_range = range.map_or((0.0, 1.0), |(lo, hi)| padded_range(lo, hi));
        out.grid_lines = grid_positions(out.x_range, pad.options.grid_lines);
    }
    let (min_label, max_label) = labels(range);

    for v in &charts {
        let chart = v.chart;
        out.series.push(Series {
            xs: v.xs.clone(),
            ys: v.ys.clone(),
            color: chart.color.clone(),
            style: LineStyle::Solid,
            width: 1.0,
        });
        let at_min: Vec<f64> = v
            .xs
            .iter()
            .map(|&x| if x <= chart.min_border() { x } else { f64::NAN })
            .collect();
        let at_max: Vec<f64> = v
            .xs
            .iter()
            .map(|&x| if x >= chart.max_border() { x } else { f64::NAN })
            .collect();
        for marked in [at_min, at_max] {
            if marked.iter().any(|x| !x.is_nan()) {
                out.series.push(Series {
                    xs: marked,
                    ys: v.ys.clone(),
                    color: CLIP_MARKER_COLOR.to_string(),
                    style: LineStyle::ClipMarker,
                    width: CLIP_MARKER_WIDTH,
                });
            }
        }

        if chart.display_type == DisplayType::Fill {
            if let Some((lo, hi)) = range {
                let side = match chart.fill_side {
                    FillSide::Left => lo,
                    FillSide::Right => hi,
                };
                let (xx, yy) = split_mass_nan(&v.xs, &v.ys);
                for (mut xs, mut ys) in xx.into_iter().zip(yy) {
                    let (Some(&first), Some(&last)) = (ys.first(), ys.last()) else {
                        continue;
                    };
                    xs.extend([side, side]);
                    ys.extend([last, first]);
                    out.fills.push(FillPolygon {
                        xs,
                        ys,
                        color: chart.color.clone(),
                        opacity: FILL_OPACITY,
                    });
                }
            }
        }

        out.summaries.push(Summary {
            name: chart.curve().to_string(),
            color: chart.color.clone(),
            min_label: min_label.clone(),
            unit: v.curve.unit().to_string(),
            max_label: max_label.clone(),
        });
    }
    Ok(())
}

fn render_rows(
    pad: &Pad,
    store: &CurveStore,
    window: &DepthWindow,
    out: &mut PadRender,
) -> Result<(), RenderError> {
    let Some(chart) = pad.charts.first() else {
        return Ok(());
    };
    let v = visible(chart, store, window)?;
    let borders = chart.borders();
    let colors = chart.border_colors_for(borders.segments());
    out.blocks = row::segment_blocks(&v.xs, &v.ys, borders, &colors);

    let (min_label, max_label) = labels(nan_min_max(&v.xs));
    out.summaries.push(Summary {
        name: chart.curve().to_string(),
        color: ROW_SUMMARY_COLOR.to_string(),
        min_label,
        unit: v.curve.unit().to_string(),
        max_label,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{
        chart::BorderSide,
        pad::PadOptions,
        reader::{LogData, LogReader, RawCurve},
    };

    struct Reader;

    impl LogReader for Reader {
        fn read(&self, _path: &Path) -> Result<LogData, String> {
            let raw = |name: &str, unit: &str, dots: Vec<f64>| RawCurve {
                name: name.into(),
                unit: unit.into(),
                dots,
            };
            let nan = f64::NAN;
            Ok(LogData {
                curves: vec![
                    raw("DEPT", "M", (0..20).map(|i| i as f64 * 10.0).collect()),
                    raw(
                        "GR",
                        "API",
                        vec![
                            10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0, 110.0,
                            120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0, 200.0,
                        ],
                    ),
                    raw(
                        "PHI",
                        "V/V",
                        vec![
                            0.1, 0.2, nan, 0.3, 0.4, nan, nan, 0.2, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1,
                            0.1, 0.1, 0.1, 0.1, 0.1, 0.1,
                        ],
                    ),
                    raw(
                        "RES",
                        "OHMM",
                        (0..20)
                            .map(|i| if i == 1 { 0.0 } else { 10f64.powf(i as f64 / 6.0) })
                            .collect(),
                    ),
                ],
            })
        }
    }

    fn store() -> CurveStore {
        let mut store = CurveStore::new();
        store.add_file(Path::new("w.las"), &Reader).unwrap();
        store
    }

    fn pad_with(keys: &[&str], options: PadOptions) -> Pad {
        let mut pad = Pad::new(options);
        for key in keys {
            pad.add_chart(Chart::new(CurveKey::new(key, "w")));
        }
        pad
    }

    #[test]
    fn test_line_pad() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let pad = pad_with(&["GR"], PadOptions::default());
        let out = render_pad(0, &pad, &store, &window, 2).unwrap();
        // strict window bounds drop depth 0 and 190
        assert_eq!(out.series.len(), 1);
        assert_eq!(out.series[0].xs.len(), 18);
        assert_eq!(out.series[0].xs[0], 20.0);
        let (x0, x1) = out.x_range;
        assert!((x0 - 16.6).abs() < 1e-9 && (x1 - 193.4).abs() < 1e-9);
        assert_eq!(out.y_range, (190.0, 0.0));
        assert_eq!(out.grid_lines.len(), 5);
        assert_eq!(out.summaries[0].name, "'GR' w");
        assert_eq!(out.summaries[0].min_label, "20");
        assert_eq!(out.summaries[0].max_label, "190");
        assert_eq!(out.summaries[0].unit, "API");
        assert_eq!(out.empty_cells, 1);
    }

    #[test]
    fn test_clip_markers_and_fixed_scale() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let mut pad = pad_with(
            &["GR"],
            PadOptions {
                fixed_border_scale: true,
                grid_lines: 0,
                ..Default::default()
            },
        );
        let chart = pad.chart_mut(0).unwrap();
        chart.set_border_text(BorderSide::Max, "100");
        let out = render_pad(0, &pad, &store, &window, 1).unwrap();
        assert_eq!(out.series.len(), 2);
        let marker = &out.series[1];
        assert_eq!(marker.style, LineStyle::ClipMarker);
        assert_eq!(marker.color, "white");
        assert!(marker.xs[..8].iter().all(|x| x.is_nan()));
        assert!(marker.xs[8..].iter().all(|&x| x == 100.0));
        assert_eq!(out.summaries[0].max_label, "100");
        assert!(out.grid_lines.is_empty());
    }

    #[test]
    fn test_log_pad_range_is_positive() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let pad = pad_with(
            &["RES"],
            PadOptions {
                log_scale: true,
                grid_lines: 2,
                ..Default::default()
            },
        );
        let out = render_pad(0, &pad, &store, &window, 1).unwrap();
        let (x0, x1) = out.x_range;
        // the zero at depth 10 cannot be shown and does not pull the range down
        let lowest = 10f64.powf(2.0 / 6.0);
        assert!(x0 > 0.0 && x0 < lowest);
        assert!(x1 > 1000.0);
        assert_eq!(out.grid_lines.len(), 2);
        assert!(out.grid_lines.iter().all(|g| *g > x0 && *g < x1));
        assert!(out.grid_lines[1] / out.grid_lines[0] > 5.0);
        assert_eq!(out.series[0].xs.len(), 18);
    }

    #[test]
    fn test_log_pad_fixed_scale_ignores_non_positive_border() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let mut pad = pad_with(
            &["RES"],
            PadOptions {
                log_scale: true,
                fixed_border_scale: true,
                ..Default::default()
            },
        );
        let chart = pad.chart_mut(0).unwrap();
        chart.set_border(BorderSide::Min, 0.0);
        chart.set_border(BorderSide::Max, 100.0);
        let out = render_pad(0, &pad, &store, &window, 1).unwrap();
        assert!(out.x_range.0 > 0.0);
        assert!((out.x_range.1 - 102.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_polygons() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let mut pad = pad_with(&["PHI"], PadOptions::default());
        let chart = pad.chart_mut(0).unwrap();
        chart.display_type = DisplayType::Fill;
        chart.fill_side = FillSide::Left;
        let out = render_pad(0, &pad, &store, &window, 1).unwrap();
        // samples at 10, then 30..40, then 70..180
        assert_eq!(out.fills.len(), 3);
        assert_eq!(out.fills[0].xs, vec![0.2, 0.1, 0.1]);
        assert_eq!(out.fills[0].ys, vec![10.0, 10.0, 10.0]);
        assert_eq!(out.fills[1].xs, vec![0.3, 0.4, 0.1, 0.1]);
        assert_eq!(out.fills[1].ys, vec![30.0, 40.0, 40.0, 30.0]);
        assert!(out.fills.iter().all(|f| f.opacity == 0.5));
        assert_eq!(out.summaries[0].min_label, "0.1");
    }

    #[test]
    fn test_row_pad() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let mut pad = pad_with(
            &["GR", "PHI"],
            PadOptions {
                mode: PadMode::Row,
                ..Default::default()
            },
        );
        pad.chart_mut(0).unwrap().borders_mut().insert(100.0);
        let out = render_pad(0, &pad, &store, &window, 3).unwrap();
        assert_eq!(out.x_range, (0.0, 1.0));
        assert_eq!(out.blocks.len(), 2);
        assert_eq!((out.blocks[0].top, out.blocks[0].bottom), (10.0, 90.0));
        assert_eq!(out.blocks[0].color, "blue");
        assert_eq!((out.blocks[1].top, out.blocks[1].bottom), (90.0, 180.0));
        assert_eq!(out.summaries.len(), 1);
        assert_eq!(out.summaries[0].color, "blue");
        assert_eq!(out.empty_cells, 2);
    }

    #[test]
    fn test_empty_pads() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let line = render_pad(0, &Pad::default(), &store, &window, 0).unwrap();
        assert_eq!(line.x_range, (0.0, 1.0));
        assert!(line.summaries.is_empty());
        let row = Pad::new(PadOptions {
            mode: PadMode::Row,
            ..Default::default()
        });
        let row = render_pad(1, &row, &store, &window, 0).unwrap();
        assert!(row.blocks.is_empty());
    }

    #[test]
    fn test_unknown_curve() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let pad = pad_with(&["XX"], PadOptions::default());
        assert!(matches!(
            render_pad(0, &pad, &store, &window, 1),
            Err(RenderError::UnknownCurve(_))
        ));
    }

    #[test]
    fn test_render_session_header_rows() {
        let store = store();
        let window = DepthWindow::new(0.0, 190.0);
        let pads = vec![
            pad_with(&["GR", "PHI"], PadOptions::default()),
            pad_with(&["GR"], PadOptions::default()),
        ];
        let out = render_session(&pads, 1, &store, Some(&window)).unwrap();
        assert_eq!(out.header_rows, 2);
        assert_eq!(out.pads.len(), 1);
        assert_eq!(out.pads[0].index, 1);
        assert_eq!(out.pads[0].empty_cells, 1);
        assert_eq!(out.window, Some((0.0, 190.0)));
    }
}
