use std::{path::PathBuf, rc::Rc, time::Instant};

use app_core::{
    event::{AppEvent, EventQueue},
    string_error::ErrorStringExt,
};
use derive_new::new;

use crate::{
    chart::{BorderSide, DisplayType, FillSide},
    curve::CurveKey,
    depth_window::Direction,
    pad::PadOptions,
    reader::LogReader,
    session::Session,
    template::ProjectPaths,
};

/// Applies every queued command. Failures are reported to the session's
/// observers as `Change::UserError`.
pub fn run_events(queue: &mut EventQueue<Session>, session: &mut Session) -> usize {
    queue.run(session, |session, err| session.report_error(err))
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

#[derive(new)]
pub struct AddFile {
    path: PathBuf,
    reader: Rc<dyn LogReader>,
}

/// Adds a pad, holding `curve` if one is given.
#[derive(new)]
pub struct AddPad {
    curve: Option<CurveKey>,
    options: PadOptions,
}

#[derive(new)]
pub struct RemovePad {
    index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Left,
    Right,
}

#[derive(new)]
pub struct MovePad {
    index: usize,
    direction: MoveDirection,
}

#[derive(new)]
pub struct AddChart {
    pad: usize,
    curve: CurveKey,
}

#[derive(new)]
pub struct RemoveChart {
    pad: usize,
    chart: usize,
}

#[derive(new)]
pub struct SetChartColor {
    pad: usize,
    chart: usize,
    color: String,
}

#[derive(new)]
pub struct SetChartType {
    pad: usize,
    chart: usize,
    display_type: DisplayType,
}

#[derive(new)]
pub struct SetFillSide {
    pad: usize,
    chart: usize,
    side: FillSide,
}

/// Clip border as typed by the user.
#[derive(new)]
pub struct SetClipBorder {
    pad: usize,
    chart: usize,
    side: BorderSide,
    text: String,
}

#[derive(new)]
pub struct AddRowBorder {
    pad: usize,
    text: String,
}

#[derive(new)]
pub struct RemoveRowBorder {
    pad: usize,
    value: f64,
}

#[derive(new)]
pub struct ShuffleRowColors {
    pad: usize,
    seed: u64,
}

#[derive(new)]
pub struct SetPadOptions {
    pad: usize,
    options: PadOptions,
}

#[derive(new)]
pub struct ZoomAt {
    center: f64,
}

#[derive(new)]
pub struct Expand {}

#[derive(new)]
pub struct Pan {
    direction: Direction,
}

/// Mouse wheel panning, subject to the scroll cooldown.
#[derive(new)]
pub struct Scroll {
    direction: Direction,
    at: Instant,
}

#[derive(new)]
pub struct ResetWindow {}

#[derive(new)]
pub struct ScrollPads {
    delta: isize,
}

#[derive(new)]
pub struct SaveTemplate {
    path: PathBuf,
    project: ProjectPaths,
}

#[derive(new)]
pub struct LoadTemplate {
    path: PathBuf,
    project: ProjectPaths,
    reader: Rc<dyn LogReader>,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for AddFile {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.add_file(&self.path, self.reader.as_ref())
            .err_to_string(&format!("could not add {:?}", self.path))?;
        Ok(())
    }
}

impl AppEvent for AddPad {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        if let Some(curve) = &self.curve {
            if !app.store().contains(curve) {
                return Err(format!("could not add pad: curve {curve} is not loaded"));
            }
        }
        let index = app
            .add_pad(self.options)
            .err_to_string("could not add pad")?;
        if let Some(curve) = self.curve.clone() {
            app.add_chart(index, curve)
                .err_to_string("could not add chart")?;
        }
        Ok(())
    }
}

impl AppEvent for RemovePad {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.remove_pad(self.index)
            .err_to_string("could not remove pad")?;
        Ok(())
    }
}

impl AppEvent for MovePad {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        let moved = match self.direction {
            MoveDirection::Left => app.move_pad_left(self.index),
            MoveDirection::Right => app.move_pad_right(self.index),
        };
        if !moved {
            log::debug!("pad {} cannot move {:?}", self.index, self.direction);
        }
        Ok(())
    }
}

impl AppEvent for AddChart {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.add_chart(self.pad, self.curve.clone())
            .err_to_string("could not add chart")?;
        Ok(())
    }
}

impl AppEvent for RemoveChart {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.remove_chart(self.pad, self.chart)
            .err_to_string("could not remove chart")?;
        Ok(())
    }
}

impl AppEvent for SetChartColor {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.set_chart_color(self.pad, self.chart, self.color.clone())
            .err_to_string("could not set colour")?;
        Ok(())
    }
}

impl AppEvent for SetChartType {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.set_chart_type(self.pad, self.chart, self.display_type)
            .err_to_string("could not set chart type")?;
        Ok(())
    }
}

impl AppEvent for SetFillSide {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.set_fill_side(self.pad, self.chart, self.side)
            .err_to_string("could not set fill side")?;
        Ok(())
    }
}

impl AppEvent for SetClipBorder {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.set_clip_border(self.pad, self.chart, self.side, &self.text)
            .err_to_string("could not set border")?;
        Ok(())
    }
}

impl AppEvent for AddRowBorder {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.add_row_border(self.pad, &self.text)
            .err_to_string("could not add border")?;
        Ok(())
    }
}

impl AppEvent for RemoveRowBorder {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.remove_row_border(self.pad, self.value)
            .err_to_string("could not remove border")?;
        Ok(())
    }
}

impl AppEvent for ShuffleRowColors {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.shuffle_row_colors(self.pad, self.seed)
            .err_to_string("could not shuffle colours")?;
        Ok(())
    }
}

impl AppEvent for SetPadOptions {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.set_pad_options(self.pad, self.options)
            .err_to_string("could not change pad")?;
        Ok(())
    }
}

impl AppEvent for ZoomAt {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.zoom_at(self.center);
        Ok(())
    }
}

impl AppEvent for Expand {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.expand();
        Ok(())
    }
}

impl AppEvent for Pan {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.pan(self.direction);
        Ok(())
    }
}

impl AppEvent for Scroll {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.scroll(self.direction, self.at);
        Ok(())
    }
}

impl AppEvent for ResetWindow {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.reset_window();
        Ok(())
    }
}

impl AppEvent for ScrollPads {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.scroll_pads(self.delta);
        Ok(())
    }
}

impl AppEvent for SaveTemplate {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.save_template_to(&self.path, &self.project)
            .err_to_string("could not save template")?;
        Ok(())
    }
}

impl AppEvent for LoadTemplate {
    type App = Session;

    fn apply(&self, app: &mut Self::App) -> Result<(), String> {
        app.load_template(&self.path, &self.project, self.reader.as_ref())
            .err_to_string("could not load template")?;
        Ok(())
    }
}
