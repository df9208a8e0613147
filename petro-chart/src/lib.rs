#![warn(clippy::all, rust_2018_idioms)]

//! Core of the well-log pad viewer: curves loaded from log files, charts and
//! pads configured on top of them, the shared depth window, the decision
//! logic producing draw instructions and the session template.

pub mod chart;
pub mod config;
pub mod curve;
pub mod curve_store;
pub mod depth_window;
pub mod error;
pub mod events;
pub mod export;
pub mod pad;
pub mod palette;
pub mod reader;
pub mod render;
pub mod session;
pub mod template;

pub use chart::{Borders, Chart, DisplayType, FillSide};
pub use config::Config;
pub use curve::{Curve, CurveKey, DepthAxisId, FileId};
pub use curve_store::{CurveStore, StoreError};
pub use depth_window::{DepthWindow, Direction, ScrollDebounce, MIN_SPAN};
pub use error::InputError;
pub use pad::{Pad, PadMode, PadOptions};
pub use reader::{LasReader, LogData, LogReader, RawCurve};
pub use render::{PadRender, RenderError, SessionRender};
pub use session::{Change, Session};
pub use template::{ProjectPaths, TemplateDocument, TemplateError};
