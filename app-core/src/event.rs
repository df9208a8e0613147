/// A user command that mutates the application state `App`.
pub trait AppEvent {
    type App;
    fn apply(&self, app: &mut Self::App) -> Result<(), String>;
}

/// The EventQueue stores events until the application drains it.
pub struct EventQueue<A> {
    /// Stores events for later processing.
    queue: Vec<Box<dyn AppEvent<App = A>>>,
}

impl<A> Default for EventQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> std::fmt::Debug for EventQueue<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("queued", &self.queue.len())
            .finish()
    }
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = A>>) {
        self.queue.push(event);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Apply all queued events in submission order.
    ///
    /// Failed events are dropped after `on_error` was called with their
    /// message. Returns the number of events that succeeded.
    pub fn run(&mut self, app: &mut A, mut on_error: impl FnMut(&mut A, String)) -> usize {
        let mut finished = 0;
        for event in std::mem::take(&mut self.queue) {
            match event.apply(app) {
                Ok(()) => finished += 1,
                Err(err) => {
                    log::error!("event failed: {err}");
                    on_error(app, err);
                }
            }
        }
        finished
    }
}
