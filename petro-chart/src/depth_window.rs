//! The visible depth interval and its navigation.

use std::time::{Duration, Instant};

/// Smallest depth span the window may show.
pub const MIN_SPAN: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Shallower, towards `min_y`.
    TowardMin,
    /// Deeper, towards `max_y`.
    TowardMax,
}

/// Visible `[start, end]` inside the well extent `[min_y, max_y]`.
///
/// `min_y <= start < end <= max_y` and `end - start >= MIN_SPAN` hold after
/// every operation, unless the whole extent is shorter than `MIN_SPAN`, in
/// which case the window is the extent and cannot move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthWindow {
    start: f64,
    end: f64,
    min_y: f64,
    max_y: f64,
}

impl DepthWindow {
    /// A window showing the full extent.
    pub fn new(min_y: f64, max_y: f64) -> Self {
        let (min_y, max_y) = if min_y <= max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        Self {
            start: min_y,
            end: max_y,
            min_y,
            max_y,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, depth: f64) -> bool {
        self.start < depth && depth < self.end
    }

    /// Moves the window to `[new_start, new_end]`, clamped to the extent.
    /// Returns whether the window changed. Spans under `MIN_SPAN` and
    /// requests equal to the current window are ignored.
    pub fn set_border(&mut self, new_start: f64, new_end: f64) -> bool {
        if !new_start.is_finite() || !new_end.is_finite() {
            return false;
        }
        let (new_start, new_end) = if new_start <= new_end {
            (new_start, new_end)
        } else {
            (new_end, new_start)
        };
        if new_end - new_start < MIN_SPAN || (new_start == self.start && new_end == self.end) {
            return false;
        }
        let new_start = new_start.max(self.min_y);
        let new_end = new_end.min(self.max_y);
        if new_end - new_start < MIN_SPAN || (new_start == self.start && new_end == self.end) {
            return false;
        }
        log::debug!("depth window [{}, {}] -> [{}, {}]", self.start, self.end, new_start, new_end);
        self.start = new_start;
        self.end = new_end;
        true
    }

    /// Zooms in to half the current span, centred on `center`.
    pub fn zoom_at(&mut self, center: f64) -> bool {
        let quarter = self.span() / 4.0;
        self.set_border(center - quarter, center + quarter)
    }

    /// Zooms out to twice the current span around its midpoint.
    pub fn expand(&mut self) -> bool {
        let span = self.span();
        let middle = self.start + span / 2.0;
        self.set_border(middle - span, middle + span)
    }

    /// Shifts by half the span. A shift crossing the extent lands exactly on
    /// its boundary instead.
    pub fn pan(&mut self, direction: Direction) -> bool {
        let span = self.span();
        let delta = span / 2.0;
        match direction {
            Direction::TowardMin => {
                if self.start <= self.min_y {
                    false
                } else if self.start - delta < self.min_y {
                    self.set_border(self.min_y, self.min_y + span)
                } else {
                    self.set_border(self.start - delta, self.end - delta)
                }
            }
            Direction::TowardMax => {
                if self.end >= self.max_y {
                    false
                } else if self.end + delta > self.max_y {
                    self.set_border(self.max_y - span, self.max_y)
                } else {
                    self.set_border(self.start + delta, self.end + delta)
                }
            }
        }
    }

    /// Shows the full extent again.
    pub fn reset(&mut self) -> bool {
        let changed = self.start != self.min_y || self.end != self.max_y;
        self.start = self.min_y;
        self.end = self.max_y;
        changed
    }

    /// Widens the extent to include `[min_y, max_y]`. The window itself stays.
    pub fn extend(&mut self, min_y: f64, max_y: f64) {
        self.min_y = self.min_y.min(min_y);
        self.max_y = self.max_y.max(max_y);
    }
}

/// Lets scroll-driven panning through at most once per cooldown.
#[derive(Clone, Copy, Debug)]
pub struct ScrollDebounce {
    cooldown: Duration,
    last: Option<Instant>,
}

impl Default for ScrollDebounce {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl ScrollDebounce {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether a scroll event arriving at `now` may act. Accepted events
    /// restart the cooldown.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last {
            Some(last) => now.saturating_duration_since(last) > self.cooldown,
            None => true,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(w: &DepthWindow) -> (f64, f64) {
        (w.start(), w.end())
    }

    #[test]
    fn test_zoom_at() {
        let mut w = DepthWindow::new(0.0, 1000.0);
        assert!(w.zoom_at(500.0));
        assert_eq!(bounds(&w), (250.0, 750.0));
        assert!(w.zoom_at(500.0));
        assert_eq!(bounds(&w), (375.0, 625.0));
    }

    #[test]
    fn test_zoom_near_edge_is_clamped() {
        let mut w = DepthWindow::new(0.0, 1000.0);
        assert!(w.zoom_at(10.0));
        assert_eq!(bounds(&w), (0.0, 260.0));
    }

    #[test]
    fn test_set_border_rejections() {
        let mut w = DepthWindow::new(0.0, 1000.0);
        assert!(!w.set_border(100.0, 105.0));
        assert!(!w.set_border(0.0, 1000.0));
        assert!(!w.set_border(-50.0, 2000.0));
        assert!(!w.set_border(f64::NAN, 100.0));
        // clamped span would be too short
        assert!(!w.set_border(-100.0, 5.0));
        assert_eq!(bounds(&w), (0.0, 1000.0));
        assert!(w.set_border(300.0, 200.0));
        assert_eq!(bounds(&w), (200.0, 300.0));
    }

    #[test]
    fn test_expand() {
        let mut w = DepthWindow::new(0.0, 1000.0);
        w.set_border(400.0, 500.0);
        assert!(w.expand());
        assert_eq!(bounds(&w), (350.0, 550.0));
        assert!(w.set_border(0.0, 100.0));
        assert!(w.expand());
        assert_eq!(bounds(&w), (0.0, 150.0));
    }

    #[test]
    fn test_pan_stops_at_extent() {
        let mut w = DepthWindow::new(0.0, 1000.0);
        w.set_border(600.0, 800.0);
        assert!(w.pan(Direction::TowardMax));
        assert_eq!(bounds(&w), (700.0, 900.0));
        assert!(w.pan(Direction::TowardMax));
        assert_eq!(bounds(&w), (800.0, 1000.0));
        assert!(!w.pan(Direction::TowardMax));
        assert_eq!(bounds(&w), (800.0, 1000.0));
        assert!(w.pan(Direction::TowardMin));
        assert_eq!(bounds(&w), (700.0, 900.0));
    }

    #[test]
    fn test_reset_and_extend() {
        let mut w = DepthWindow::new(100.0, 200.0);
        w.set_border(120.0, 150.0);
        w.extend(50.0, 180.0);
        assert_eq!((w.min_y(), w.max_y()), (50.0, 200.0));
        assert_eq!(bounds(&w), (120.0, 150.0));
        assert!(w.reset());
        assert_eq!(bounds(&w), (50.0, 200.0));
        assert!(!w.reset());
    }

    #[test]
    fn test_tiny_extent_is_fixed() {
        let mut w = DepthWindow::new(0.0, 4.0);
        assert_eq!(bounds(&w), (0.0, 4.0));
        assert!(!w.zoom_at(2.0));
        assert!(!w.expand());
        assert!(!w.pan(Direction::TowardMax));
    }

    #[test]
    fn test_scroll_debounce() {
        let mut debounce = ScrollDebounce::new(Duration::from_millis(500));
        let t0 = Instant::now();
        assert!(debounce.try_fire(t0));
        assert!(!debounce.try_fire(t0 + Duration::from_millis(200)));
        assert!(!debounce.try_fire(t0 + Duration::from_millis(500)));
        assert!(debounce.try_fire(t0 + Duration::from_millis(501)));
        assert!(!debounce.try_fire(t0 + Duration::from_millis(900)));
    }
}
