use std::fmt;

use crate::svg::{self, opts, Params, Tag};

/// A drawable part of a track. Converted into svg tags relative to the
/// track's position in the figure.
trait Element {
    fn to_tags(&self, track: &Track, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>>;
}

/// Pixel rectangle a track occupies inside the figure.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

// ----------------------------------------------------------------------------
//
//
// Figure
//
//
// ----------------------------------------------------------------------------

/// The Figure lays out tracks from left to right. Each track has a header of
/// `header_rows` cells on top and the plot area below.
#[derive(Debug)]
pub struct Figure {
    height: u64,
    header_row_height: f64,
    tracks: Vec<Track>,
}

impl Figure {
    pub fn new(height: u64, header_row_height: f64) -> Self {
        Self {
            height,
            header_row_height,
            tracks: Vec::new(),
        }
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn width(&self) -> u64 {
        self.tracks.iter().map(|t| t.width).sum::<f64>().ceil() as u64
    }

    fn header_rows(&self) -> usize {
        self.tracks.iter().map(|t| t.header.len()).max().unwrap_or(0)
    }

    /// Render this `Figure` to raw SVG markup.
    pub fn render(&self) -> Result<String, fmt::Error> {
        let header_height = self.header_rows() as f64 * self.header_row_height;
        let plot_height = (self.height as f64 - header_height).max(1.0);

        let mut root = Tag::<svg::Svg>::new(self.width(), self.height, None);
        root.add_child(Tag::<svg::Rect>::new(
            0.0,
            0.0,
            self.width() as f64,
            self.height as f64,
            opts(&[("fill", "white")]),
        ));

        let mut x = 0.0;
        for track in self.tracks.iter() {
            let mut group = Tag::<svg::Group>::new(None);
            for (row, cell) in track.header.iter().enumerate() {
                let frame = Frame {
                    x,
                    y: row as f64 * self.header_row_height,
                    width: track.width,
                    height: self.header_row_height,
                };
                group.add_children(cell.to_tags(track, &frame));
            }
            let frame = Frame {
                x,
                y: header_height,
                width: track.width,
                height: plot_height,
            };
            group.add_children(track.to_tags(&frame));
            root.add_child(group);
            x += track.width;
        }
        log::debug!("rendered figure with {} tracks", self.tracks.len());
        svg::render(&root)
    }
}

// ----------------------------------------------------------------------------
//
//
// Track
//
//
// ----------------------------------------------------------------------------

/// A vertical plot with depth increasing downwards.
#[derive(Debug)]
pub struct Track {
    width: f64,
    xlim: [f64; 2],
    /// Depth at the top and at the bottom edge.
    ylim: [f64; 2],
    log_x: bool,
    depth_ticks: bool,
    blocks: Vec<Block>,
    fills: Vec<FillPlot>,
    lines: Vec<LinePlot>,
    grid_lines: Vec<f64>,
    header: Vec<HeaderCell>,
}

impl Track {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            xlim: [0.0, 1.0],
            ylim: [0.0, 1.0],
            log_x: false,
            depth_ticks: false,
            blocks: Vec::new(),
            fills: Vec::new(),
            lines: Vec::new(),
            grid_lines: Vec::new(),
            header: Vec::new(),
        }
    }

    pub fn with_xlim(mut self, xmin: f64, xmax: f64) -> Self {
        self.xlim = [xmin, xmax];
        self
    }

    pub fn with_ylim(mut self, top: f64, bottom: f64) -> Self {
        self.ylim = [top, bottom];
        self
    }

    pub fn with_log_x(mut self, flag: bool) -> Self {
        self.log_x = flag;
        self
    }

    /// Label the depth axis along the track (used for the scale track).
    pub fn with_depth_ticks(mut self, flag: bool) -> Self {
        self.depth_ticks = flag;
        self
    }

    pub fn add_line(&mut self, line: LinePlot) {
        self.lines.push(line);
    }

    pub fn add_fill(&mut self, fill: FillPlot) {
        self.fills.push(fill);
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn add_grid_line(&mut self, x: f64) {
        self.grid_lines.push(x);
    }

    pub fn add_header_cell(&mut self, cell: HeaderCell) {
        self.header.push(cell);
    }

    fn transformations(&self, frame: &Frame) -> (impl Fn(f64) -> f64, impl Fn(f64) -> f64) {
        let Frame {
            x: fx,
            y: fy,
            width: fw,
            height: fh,
        } = *frame;
        let log_x = self.log_x;
        let tx = move |v: f64| if log_x { v.log10() } else { v };
        let (xmin, xmax) = (tx(self.xlim[0]), tx(self.xlim[1]));
        let [top, bottom] = self.ylim;

        let x = move |v: f64| fx + (tx(v) - xmin) / (xmax - xmin) * fw;
        let y = move |d: f64| fy + (d - top) / (bottom - top) * fh;
        (x, y)
    }

    fn to_tags(&self, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let mut children: Vec<Box<dyn svg::RenderTag>> = vec![Box::new(Tag::<svg::Rect>::new(
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            opts(&[("fill", "none"), ("stroke", "black")]),
        ))];
        children.extend(self.blocks.iter().flat_map(|b| b.to_tags(self, frame)));
        children.extend(self.fills.iter().flat_map(|f| f.to_tags(self, frame)));
        children.extend(self.lines.iter().flat_map(|l| l.to_tags(self, frame)));

        let (x, _) = self.transformations(frame);
        for gx in self.grid_lines.iter() {
            let px = x(*gx);
            children.push(Box::new(Tag::<svg::Line>::new(
                px,
                frame.y,
                px,
                frame.y + frame.height,
                opts(&[("stroke", "black"), ("stroke-width", "0.5")]),
            )));
        }
        if self.depth_ticks {
            children.extend(self.depth_tick_tags(frame));
        }
        children
    }

    fn depth_tick_tags(&self, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let (_, y) = self.transformations(frame);
        let [top, bottom] = self.ylim;
        let center = frame.x + frame.width / 2.0;
        let mut tags: Vec<Box<dyn svg::RenderTag>> = vec![Box::new(Tag::<svg::Line>::new(
            center,
            frame.y,
            center,
            frame.y + frame.height,
            opts(&[("stroke", "black")]),
        ))];
        for d in tick_positions(top.min(bottom), top.max(bottom)) {
            tags.push(Box::new(Tag::<svg::Line>::new(
                center - 4.0,
                y(d),
                center,
                y(d),
                opts(&[("stroke", "black")]),
            )));
            tags.push(Box::new(Tag::<svg::Text>::new(
                center - 6.0,
                y(d) + 4.0,
                &format!("{d}"),
                opts(&[("text-anchor", "end"), ("font-size", "9pt")]),
            )));
        }
        tags
    }
}

// ----------------------------------------------------------------------------
//
//
// Plot elements
//
//
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LinePlot {
    points: Vec<(f64, f64)>,
    style: Params,
}

impl LinePlot {
    /// `xs` are values, `ys` depths.
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            style: Params::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.style.insert("stroke".to_string(), color.to_string());
        self
    }

    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.style
            .insert("stroke-width".to_string(), format!("{linewidth}"));
        self
    }

    pub fn dotted(mut self) -> Self {
        self.style
            .insert("stroke-dasharray".to_string(), "1,2".to_string());
        self
    }
}

impl Element for LinePlot {
    // Non-finite points (NaN samples, non-positive values on a log axis)
    // break the line into several polylines.
    fn to_tags(&self, track: &Track, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y) = track.transformations(frame);
        let mut segments = vec![Vec::new()];
        for (xi, yi) in self.points.iter() {
            let (px, py) = (x(*xi), y(*yi));
            if px.is_finite() && py.is_finite() {
                if let Some(segment) = segments.last_mut() {
                    segment.push((px, py));
                }
            } else if segments.last().is_some_and(|s| !s.is_empty()) {
                segments.push(Vec::new());
            }
        }
        segments
            .into_iter()
            .filter(|s| s.len() > 1)
            .map(|s| -> Box<dyn svg::RenderTag> {
                Box::new(Tag::<svg::Polyline>::new(s, Some(self.style.clone())))
            })
            .collect()
    }
}

/// Closed area, drawn translucent.
#[derive(Debug, Clone)]
pub struct FillPlot {
    points: Vec<(f64, f64)>,
    color: String,
    opacity: f64,
}

impl FillPlot {
    pub fn new(xs: &[f64], ys: &[f64], color: &str, opacity: f64) -> Self {
        Self {
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            color: color.to_string(),
            opacity,
        }
    }
}

impl Element for FillPlot {
    fn to_tags(&self, track: &Track, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let (x, y) = track.transformations(frame);
        let points: Vec<_> = self
            .points
            .iter()
            .map(|(xi, yi)| (x(*xi), y(*yi)))
            .filter(|(px, py)| px.is_finite() && py.is_finite())
            .collect();
        if points.len() < 3 {
            return Vec::new();
        }
        let opacity = format!("{}", self.opacity);
        vec![Box::new(Tag::<svg::Polygon>::new(
            points,
            opts(&[
                ("fill", self.color.as_str()),
                ("fill-opacity", opacity.as_str()),
                ("stroke", "none"),
            ]),
        ))]
    }
}

/// Full-width coloured depth interval of a categorical track.
#[derive(Debug, Clone)]
pub struct Block {
    top: f64,
    bottom: f64,
    color: String,
}

impl Block {
    pub fn new(top: f64, bottom: f64, color: &str) -> Self {
        Self {
            top,
            bottom,
            color: color.to_string(),
        }
    }
}

impl Element for Block {
    fn to_tags(&self, track: &Track, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let (_, y) = track.transformations(frame);
        let (y0, y1) = (y(self.top), y(self.bottom));
        vec![Box::new(Tag::<svg::Rect>::new(
            frame.x,
            y0.min(y1),
            frame.width,
            (y1 - y0).abs(),
            opts(&[("fill", self.color.as_str()), ("stroke", "none")]),
        ))]
    }
}

/// Header cell above a track: curve name, a line in the curve colour and the
/// scale labels `left  unit  right`.
#[derive(Debug, Clone, Default)]
pub struct HeaderCell {
    pub title: String,
    pub color: String,
    pub left: String,
    pub unit: String,
    pub right: String,
}

impl HeaderCell {
    pub fn new(title: &str, color: &str, left: &str, unit: &str, right: &str) -> Self {
        Self {
            title: title.to_string(),
            color: color.to_string(),
            left: left.to_string(),
            unit: unit.to_string(),
            right: right.to_string(),
        }
    }

    /// Placeholder keeping headers of neighbouring tracks aligned.
    pub fn empty() -> Self {
        Self::new("", "grey", "", "", "")
    }
}

impl Element for HeaderCell {
    fn to_tags(&self, _track: &Track, frame: &Frame) -> Vec<Box<dyn svg::RenderTag>> {
        let Frame {
            x,
            y,
            width,
            height,
        } = *frame;
        let font = [("font-size", "8pt")];
        let mut tags: Vec<Box<dyn svg::RenderTag>> = vec![
            Box::new(Tag::<svg::Rect>::new(
                x,
                y,
                width,
                height,
                opts(&[("fill", "lightgray"), ("stroke", "black")]),
            )),
            Box::new(Tag::<svg::Line>::new(
                x + 2.0,
                y + height / 2.0,
                x + width - 2.0,
                y + height / 2.0,
                opts(&[("stroke", self.color.as_str())]),
            )),
        ];
        let texts = [
            (x + width / 2.0, y + height * 0.4, &self.title, "middle"),
            (x + 2.0, y + height * 0.9, &self.left, "start"),
            (x + width / 2.0, y + height * 0.9, &self.unit, "middle"),
            (x + width - 2.0, y + height * 0.9, &self.right, "end"),
        ];
        for (tx, ty, text, anchor) in texts {
            if text.is_empty() {
                continue;
            }
            let mut style = opts(&font).unwrap_or_default();
            style.insert("text-anchor".to_string(), anchor.to_string());
            tags.push(Box::new(Tag::<svg::Text>::new(tx, ty, text, Some(style))));
        }
        tags
    }
}

// ----------------------------------------------------------------------------
//
//
// Helpers
//
//
// ----------------------------------------------------------------------------

/// Round tick positions between `min` and `max`, between 3 and 10 of them.
fn tick_positions(min: f64, max: f64) -> Vec<f64> {
    let span = max - min;
    if !(span.is_finite() && span > 0.0) {
        return Vec::new();
    }
    let mut step = 10.0f64.powi(span.log10().floor() as i32);
    while span / step <= 3.0 {
        step /= 2.0;
    }
    while span / step > 10.0 {
        step *= 2.0;
    }
    let mut pos = Vec::new();
    let mut x = (min / step).ceil() * step;
    while x <= max {
        pos.push(x);
        x += step;
    }
    pos
}
