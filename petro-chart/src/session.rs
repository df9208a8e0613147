//! The session owns every piece of mutable state: loaded curves, pads and
//! the depth window. Observers are told about each change.

use std::{
    fmt,
    path::Path,
    time::{Duration, Instant},
};

use crate::{
    chart::{parse_border_value, BorderSide, Chart, DisplayType, FillSide},
    curve::{CurveKey, FileId},
    depth_window::{DepthWindow, Direction, ScrollDebounce},
    error::InputError,
    pad::{Pad, PadOptions},
    reader::LogReader,
    render::{self, RenderError, SessionRender},
    template::{self, ProjectPaths, TemplateDocument, TemplateError},
    CurveStore,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    FilesChanged,
    PadsChanged,
    WindowChanged,
    UserError(String),
}

type Observer = Box<dyn FnMut(&Change)>;

#[derive(Default)]
pub struct Session {
    pub(crate) store: CurveStore,
    pub(crate) pads: Vec<Pad>,
    pub(crate) window: Option<DepthWindow>,
    pub(crate) first_visible: usize,
    debounce: ScrollDebounce,
    observers: Vec<Observer>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("files", &self.store.file_count())
            .field("pads", &self.pads.len())
            .field("window", &self.window)
            .field("first_visible", &self.first_visible)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_cooldown(cooldown: Duration) -> Self {
        Self {
            debounce: ScrollDebounce::new(cooldown),
            ..Self::default()
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&Change) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn notify(&mut self, change: Change) {
        for observer in self.observers.iter_mut() {
            observer(&change);
        }
    }

    /// Forwards a failed user action to the observers.
    pub fn report_error(&mut self, message: String) {
        self.notify(Change::UserError(message));
    }

    pub fn store(&self) -> &CurveStore {
        &self.store
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    pub fn pad(&self, index: usize) -> Option<&Pad> {
        self.pads.get(index)
    }

    pub fn window(&self) -> Option<&DepthWindow> {
        self.window.as_ref()
    }

    pub fn first_visible_pad(&self) -> usize {
        self.first_visible
    }

    fn pad_mut(&mut self, index: usize) -> Result<&mut Pad, InputError> {
        self.pads.get_mut(index).ok_or(InputError::NoSuchPad(index))
    }

    fn chart_mut(&mut self, pad: usize, chart: usize) -> Result<&mut Chart, InputError> {
        self.pad_mut(pad)?
            .chart_mut(chart)
            .ok_or(InputError::NoSuchChart { pad, chart })
    }

    fn known_curve(&self, key: &CurveKey) -> Result<(), InputError> {
        if self.store.contains(key) {
            Ok(())
        } else {
            Err(InputError::UnknownCurve(key.clone()))
        }
    }

    /// Widens the window to the store's extent, creating it on first load.
    /// Widens the window extent to every loaded file and shows all of it.
    /// Returns whether the visible window changed.
    pub(crate) fn sync_window(&mut self) -> bool {
        let Some((lo, hi)) = self.store.extent() else {
            return false;
        };
        match self.window.as_mut() {
            Some(window) => {
                window.extend(lo, hi);
                window.reset()
            }
            None => {
                self.window = Some(DepthWindow::new(lo, hi));
                true
            }
        }
    }

    /// Loads a log file. The depth window is reset to the full extent of all
    /// loaded files.
    pub fn add_file(&mut self, path: &Path, reader: &dyn LogReader) -> Result<FileId, InputError> {
        let id = self.store.add_file(path, reader)?;
        let window_changed = self.sync_window();
        self.notify(Change::FilesChanged);
        if window_changed {
            self.notify(Change::WindowChanged);
        }
        Ok(id)
    }

    pub fn add_pad(&mut self, options: PadOptions) -> Result<usize, InputError> {
        if options.width == 0 {
            return Err(InputError::InvalidWidth);
        }
        self.pads.push(Pad::new(options));
        self.notify(Change::PadsChanged);
        Ok(self.pads.len() - 1)
    }

    /// New default pad showing `curve`.
    pub fn add_pad_with_curve(&mut self, curve: CurveKey) -> Result<usize, InputError> {
        self.known_curve(&curve)?;
        let mut pad = Pad::default();
        pad.add_chart(Chart::new(curve));
        self.pads.push(pad);
        self.notify(Change::PadsChanged);
        Ok(self.pads.len() - 1)
    }

    /// Removes a pad, later pads shift left.
    pub fn remove_pad(&mut self, index: usize) -> Result<Pad, InputError> {
        if index >= self.pads.len() {
            return Err(InputError::NoSuchPad(index));
        }
        let pad = self.pads.remove(index);
        self.first_visible = self.first_visible.min(self.pads.len().saturating_sub(1));
        self.notify(Change::PadsChanged);
        Ok(pad)
    }

    /// Swaps a pad with its left neighbour. No-op for the first pad.
    pub fn move_pad_left(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.pads.len() {
            return false;
        }
        self.pads.swap(index - 1, index);
        self.notify(Change::PadsChanged);
        true
    }

    /// Swaps a pad with its right neighbour. No-op for the last pad.
    pub fn move_pad_right(&mut self, index: usize) -> bool {
        if index + 1 >= self.pads.len() {
            return false;
        }
        self.pads.swap(index, index + 1);
        self.notify(Change::PadsChanged);
        true
    }

    pub fn set_first_visible_pad(&mut self, index: usize) -> bool {
        let index = index.min(self.pads.len().saturating_sub(1));
        if index == self.first_visible {
            return false;
        }
        self.first_visible = index;
        self.notify(Change::PadsChanged);
        true
    }

    /// Scrolls the pad list by `delta` pads.
    pub fn scroll_pads(&mut self, delta: isize) -> bool {
        let target = self.first_visible.saturating_add_signed(delta);
        self.set_first_visible_pad(target)
    }

    pub fn add_chart(&mut self, pad: usize, curve: CurveKey) -> Result<(), InputError> {
        self.known_curve(&curve)?;
        self.pad_mut(pad)?.add_chart(Chart::new(curve));
        self.notify(Change::PadsChanged);
        Ok(())
    }

    pub fn remove_chart(&mut self, pad: usize, chart: usize) -> Result<Chart, InputError> {
        let removed = self
            .pad_mut(pad)?
            .remove_chart(chart)
            .ok_or(InputError::NoSuchChart { pad, chart })?;
        self.notify(Change::PadsChanged);
        Ok(removed)
    }

    pub fn set_chart_color(
        &mut self,
        pad: usize,
        chart: usize,
        color: String,
    ) -> Result<(), InputError> {
        self.chart_mut(pad, chart)?.color = color;
        self.notify(Change::PadsChanged);
        Ok(())
    }

    pub fn set_chart_type(
        &mut self,
        pad: usize,
        chart: usize,
        display_type: DisplayType,
    ) -> Result<(), InputError> {
        self.chart_mut(pad, chart)?.display_type = display_type;
        self.notify(Change::PadsChanged);
        Ok(())
    }

    pub fn set_fill_side(&mut self, pad: usize, chart: usize, side: FillSide) -> Result<(), InputError> {
        self.chart_mut(pad, chart)?.fill_side = side;
        self.notify(Change::PadsChanged);
        Ok(())
    }

    /// Sets a clip border from user text, see [`crate::chart::parse_border_text`].
    pub fn set_clip_border(
        &mut self,
        pad: usize,
        chart: usize,
        side: BorderSide,
        text: &str,
    ) -> Result<(), InputError> {
        self.chart_mut(pad, chart)?.set_border_text(side, text);
        self.notify(Change::PadsChanged);
        Ok(())
    }

    pub fn set_min_border_text(&mut self, pad: usize, chart: usize, text: &str) -> Result<(), InputError> {
        self.set_clip_border(pad, chart, BorderSide::Min, text)
    }

    pub fn set_max_border_text(&mut self, pad: usize, chart: usize, text: &str) -> Result<(), InputError> {
        self.set_clip_border(pad, chart, BorderSide::Max, text)
    }

    /// Adds a row border to the first chart of a pad. Returns false if the
    /// value was already present.
    pub fn add_row_border(&mut self, pad: usize, text: &str) -> Result<bool, InputError> {
        let pad_ref = self.pad_mut(pad)?;
        let value = parse_border_value(text)?;
        let chart = pad_ref.chart_mut(0).ok_or(InputError::NoChart)?;
        let added = chart.borders_mut().insert(value);
        if added {
            self.notify(Change::PadsChanged);
        }
        Ok(added)
    }

    pub fn remove_row_border(&mut self, pad: usize, value: f64) -> Result<bool, InputError> {
        let chart = self.pad_mut(pad)?.chart_mut(0).ok_or(InputError::NoChart)?;
        let removed = chart.borders_mut().remove(value);
        if removed {
            self.notify(Change::PadsChanged);
        }
        Ok(removed)
    }

    /// Pins random palette colours to the row segments of a pad.
    pub fn shuffle_row_colors(&mut self, pad: usize, seed: u64) -> Result<(), InputError> {
        self.pad_mut(pad)?
            .chart_mut(0)
            .ok_or(InputError::NoChart)?
            .shuffle_border_colors(seed);
        self.notify(Change::PadsChanged);
        Ok(())
    }

    pub fn set_pad_options(&mut self, pad: usize, options: PadOptions) -> Result<(), InputError> {
        if options.width == 0 {
            return Err(InputError::InvalidWidth);
        }
        self.pad_mut(pad)?.options = options;
        self.notify(Change::PadsChanged);
        Ok(())
    }

    fn update_window(&mut self, f: impl FnOnce(&mut DepthWindow) -> bool) -> bool {
        let changed = self.window.as_mut().is_some_and(f);
        if changed {
            self.notify(Change::WindowChanged);
        }
        changed
    }

    /// Shows `[start, end]`, see [`DepthWindow::set_border`].
    pub fn set_window(&mut self, start: f64, end: f64) -> bool {
        self.update_window(|w| w.set_border(start, end))
    }

    pub fn zoom_at(&mut self, center: f64) -> bool {
        self.update_window(|w| w.zoom_at(center))
    }

    pub fn expand(&mut self) -> bool {
        self.update_window(DepthWindow::expand)
    }

    pub fn pan(&mut self, direction: Direction) -> bool {
        self.update_window(|w| w.pan(direction))
    }

    /// Pans from a scroll wheel, rate limited by the scroll cooldown.
    pub fn scroll(&mut self, direction: Direction, now: Instant) -> bool {
        if self.window.is_none() || !self.debounce.try_fire(now) {
            return false;
        }
        self.pan(direction)
    }

    pub fn reset_window(&mut self) -> bool {
        self.update_window(DepthWindow::reset)
    }

    pub fn render(&self) -> Result<SessionRender, RenderError> {
        render::render_session(&self.pads, self.first_visible, &self.store, self.window.as_ref())
    }

    pub fn save_template(&self, project: &ProjectPaths) -> TemplateDocument {
        template::save(self, project)
    }

    pub fn save_template_to(&self, path: &Path, project: &ProjectPaths) -> Result<(), TemplateError> {
        template::save_to_path(&self.save_template(project), path)
    }

    /// Replaces curves, pads and window with the template's. On error the
    /// session is left as it was.
    pub fn load_template(
        &mut self,
        path: &Path,
        project: &ProjectPaths,
        reader: &dyn LogReader,
    ) -> Result<(), TemplateError> {
        let loaded = template::load_from_path(path, project, reader)?;
        self.store = loaded.store;
        self.pads = loaded.pads;
        self.window = loaded.window;
        self.first_visible = 0;
        log::info!("loaded template {:?}", path);
        self.notify(Change::FilesChanged);
        self.notify(Change::PadsChanged);
        self.notify(Change::WindowChanged);
        Ok(())
    }
}
