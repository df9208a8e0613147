//! Draws a rendered session as SVG: a depth scale track followed by one
//! track per visible pad.

use std::path::Path;

use app_core::string_error::ErrorStringExt;
use svg_export::{Block, FillPlot, Figure, HeaderCell, LinePlot, Track};

use crate::{
    config::Config,
    palette::css_color,
    render::{LineStyle, PadRender, SessionRender},
};

fn scale_track(render: &SessionRender, config: &Config) -> Track {
    let (start, end) = render.window.unwrap_or((0.0, 1.0));
    let mut track = Track::new(config.svg_pad_width as f64)
        .with_ylim(start, end)
        .with_depth_ticks(true);
    track.add_header_cell(HeaderCell::new("MD", "black", "", "meters", ""));
    for _ in 1..render.header_rows {
        track.add_header_cell(HeaderCell::empty());
    }
    track
}

fn pad_track(pad: &PadRender, config: &Config) -> Track {
    let (bottom, top) = pad.y_range;
    let mut track = Track::new(pad.width as f64 * config.svg_pad_width as f64)
        .with_xlim(pad.x_range.0, pad.x_range.1)
        .with_ylim(top, bottom)
        .with_log_x(pad.log_scale);
    for block in &pad.blocks {
        track.add_block(Block::new(block.top, block.bottom, css_color(&block.color)));
    }
    for fill in &pad.fills {
        track.add_fill(FillPlot::new(
            &fill.xs,
            &fill.ys,
            css_color(&fill.color),
            fill.opacity,
        ));
    }
    for x in &pad.grid_lines {
        track.add_grid_line(*x);
    }
    for series in &pad.series {
        let line = LinePlot::new(&series.xs, &series.ys)
            .with_color(css_color(&series.color))
            .with_linewidth(series.width);
        track.add_line(match series.style {
            LineStyle::Solid => line,
            LineStyle::ClipMarker => line.dotted(),
        });
    }
    for summary in &pad.summaries {
        track.add_header_cell(HeaderCell::new(
            &summary.name,
            css_color(&summary.color),
            &summary.min_label,
            &summary.unit,
            &summary.max_label,
        ));
    }
    for _ in 0..pad.empty_cells {
        track.add_header_cell(HeaderCell::empty());
    }
    track
}

pub fn to_figure(render: &SessionRender, config: &Config) -> Figure {
    let mut figure = Figure::new(config.svg_height, config.header_row_height as f64);
    figure.add_track(scale_track(render, config));
    for pad in render.pads.iter().take(config.max_visible_pads) {
        figure.add_track(pad_track(pad, config));
    }
    figure
}

pub fn save_svg(render: &SessionRender, config: &Config, path: &Path) -> Result<(), String> {
    log::debug!("requested to save svg at '{:?}'", path);
    let markup = to_figure(render, config)
        .render()
        .err_to_string("could not render svg")?;
    std::fs::write(path, markup).err_to_string("could not write svg")?;
    Ok(())
}
