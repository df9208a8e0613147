#![warn(clippy::all, rust_2018_idioms)]

//! Render well-log tracks (side-by-side vertical plots sharing one depth
//! axis) to SVG markup.

pub mod svg;
mod tracks;

pub use tracks::{Block, FillPlot, Figure, HeaderCell, LinePlot, Track};
