//! Session templates: the loaded files plus every pad and chart setting,
//! stored as a JSON document.

use std::path::{Path, PathBuf};

use app_core::storage::{self, StorageError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    chart::{BorderSide, Borders, Chart, DisplayType, FillSide},
    curve::CurveKey,
    pad::{Pad, PadMode, PadOptions},
    reader::LogReader,
    session::Session,
};

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("template {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("template could not be applied: {}", .0.join("; "))]
    PartiallyInvalid(Vec<String>),

    #[error(transparent)]
    Io(StorageError),
}

impl From<StorageError> for TemplateError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => Self::NotFound(path),
            StorageError::Malformed { path, source } => Self::Malformed {
                path,
                reason: source.to_string(),
            },
            err @ StorageError::Io { .. } => Self::Io(err),
        }
    }
}

/// Where log files of a project live. Templates store file paths as
/// `<files_dir>/<file name>` relative to `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub files_dir: String,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            files_dir: "Files".to_string(),
        }
    }
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>, files_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            files_dir: files_dir.into(),
        }
    }

    pub fn relative(&self, path: &Path) -> String {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}/{}", self.files_dir, name)
    }

    pub fn resolve(&self, entry: &str) -> PathBuf {
        let path = Path::new(entry);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub pads: Vec<PadDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadDescriptor {
    #[serde(default)]
    pub log: bool,
    #[serde(rename = "type", default)]
    pub mode: PadMode,
    #[serde(default)]
    pub border_scale_fixed: bool,
    #[serde(
        default = "default_line_quantity",
        deserialize_with = "de_line_quantity"
    )]
    pub line_quantity: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub charts: Vec<ChartDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub name: CurveKey,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(rename = "type", default)]
    pub display_type: DisplayType,
    #[serde(default)]
    pub fill_side: FillSide,
    #[serde(
        default = "neg_infinity",
        serialize_with = "ser_border",
        deserialize_with = "de_min_border"
    )]
    pub min_border: f64,
    #[serde(
        default = "infinity",
        serialize_with = "ser_border",
        deserialize_with = "de_max_border"
    )]
    pub max_border: f64,
    /// Finite members only, the infinite bounds are implied.
    #[serde(default, deserialize_with = "de_borders")]
    pub borders: Vec<f64>,
    #[serde(default = "default_border_colors")]
    pub borders_color: Vec<String>,
    /// Informational. Units are taken from the loaded curve.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
}

fn default_line_quantity() -> u32 {
    PadOptions::default().grid_lines
}

fn default_width() -> u32 {
    PadOptions::default().width
}

fn default_color() -> String {
    "black".to_string()
}

fn default_border_colors() -> Vec<String> {
    vec!["blue".to_string()]
}

fn neg_infinity() -> f64 {
    f64::NEG_INFINITY
}

fn infinity() -> f64 {
    f64::INFINITY
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u64),
    Float(f64),
    Text(String),
}

impl Number {
    fn to_f64(&self) -> f64 {
        match self {
            Number::Int(v) => *v as f64,
            Number::Float(v) => *v,
            Number::Text(t) => t.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

fn ser_border<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

fn border_from(raw: Option<Number>, side: BorderSide) -> f64 {
    match raw.map(|n| n.to_f64()) {
        Some(v) if !v.is_nan() => v,
        _ => side.unset(),
    }
}

fn de_min_border<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Option::<Number>::deserialize(d).map(|raw| border_from(raw, BorderSide::Min))
}

fn de_max_border<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Option::<Number>::deserialize(d).map(|raw| border_from(raw, BorderSide::Max))
}

fn de_borders<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<f64>, D::Error> {
    let raw = Vec::<Option<Number>>::deserialize(d)?;
    Ok(raw
        .into_iter()
        .flatten()
        .map(|n| n.to_f64())
        .filter(|v| v.is_finite())
        .collect())
}

fn de_line_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    use serde::de::Error;
    let raw = Number::deserialize(d)?;
    let value = raw.to_f64();
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(D::Error::custom("line_quantity must be a non-negative integer"))
    }
}

impl ChartDescriptor {
    fn from_chart(chart: &Chart, unit: &str) -> Self {
        Self {
            name: chart.curve().clone(),
            color: chart.color.clone(),
            display_type: chart.display_type,
            fill_side: chart.fill_side,
            min_border: chart.min_border(),
            max_border: chart.max_border(),
            borders: chart.borders().finite().collect(),
            borders_color: chart.border_colors().to_vec(),
            unit: unit.to_string(),
        }
    }

    fn to_chart(&self) -> Chart {
        let mut chart = Chart::new(self.name.clone());
        chart.color = self.color.clone();
        chart.display_type = self.display_type;
        chart.fill_side = self.fill_side;
        chart.set_border(BorderSide::Min, self.min_border);
        chart.set_border(BorderSide::Max, self.max_border);
        *chart.borders_mut() = Borders::from_finite(self.borders.iter().copied());
        chart.set_border_colors(self.borders_color.clone());
        chart
    }
}

impl PadDescriptor {
    fn options(&self) -> PadOptions {
        PadOptions {
            mode: self.mode,
            log_scale: self.log,
            fixed_border_scale: self.border_scale_fixed,
            grid_lines: self.line_quantity,
            width: self.width,
        }
    }
}

/// Older templates were written with bare `Infinity`, `-Infinity` and `NaN`
/// tokens, which are not JSON. Outside of strings they are rewritten as
/// strings, which the border decoders read back as numbers.
fn quote_non_finite(raw: &str) -> String {
    const TOKENS: [(&str, &str); 3] = [
        ("-Infinity", "\"-inf\""),
        ("Infinity", "\"inf\""),
        ("NaN", "\"nan\""),
    ];

    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;
    'scan: while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else {
            for (token, quoted) in TOKENS {
                if let Some(tail) = rest.strip_prefix(token) {
                    out.push_str(quoted);
                    rest = tail;
                    continue 'scan;
                }
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Snapshot of a session. File paths are rewritten relative to the project.
pub fn save(session: &Session, project: &ProjectPaths) -> TemplateDocument {
    let files = session.store.files().map(|p| project.relative(p)).collect();
    let pads = session
        .pads
        .iter()
        .map(|pad| {
            let options = pad.options();
            PadDescriptor {
                log: options.log_scale,
                mode: options.mode,
                border_scale_fixed: options.fixed_border_scale,
                line_quantity: options.grid_lines,
                width: options.width,
                charts: pad
                    .charts()
                    .iter()
                    .map(|chart| {
                        let unit = session
                            .store
                            .curve(chart.curve())
                            .map(|c| c.unit())
                            .unwrap_or_default();
                        ChartDescriptor::from_chart(chart, unit)
                    })
                    .collect(),
            }
        })
        .collect();
    TemplateDocument { files, pads }
}

pub fn save_to_path(document: &TemplateDocument, path: &Path) -> Result<(), TemplateError> {
    storage::save_json(document, path)?;
    log::info!("saved template to {:?}", path);
    Ok(())
}

pub fn load_from_path(
    path: &Path,
    project: &ProjectPaths,
    reader: &dyn LogReader,
) -> Result<Session, TemplateError> {
    let raw = storage::read_text(path)?;
    let document: TemplateDocument = storage::parse_json(&quote_non_finite(&raw), path)?;
    into_session(&document, project, reader)
}

/// Builds a fresh session from a document. Every file must load and every
/// chart must name a loaded curve, otherwise all problems are reported at once.
pub fn into_session(
    document: &TemplateDocument,
    project: &ProjectPaths,
    reader: &dyn LogReader,
) -> Result<Session, TemplateError> {
    let mut session = Session::new();
    let mut problems = Vec::new();

    for entry in &document.files {
        let path = project.resolve(entry);
        match session.store.add_file(&path, reader) {
            Ok(_) => {
                session.sync_window();
            }
            Err(err) => problems.push(format!("file {entry}: {err}")),
        }
    }

    for (index, descriptor) in document.pads.iter().enumerate() {
        if descriptor.width == 0 {
            problems.push(format!("pad {index}: width must be positive"));
        }
        let mut pad = Pad::new(descriptor.options());
        for chart in &descriptor.charts {
            if session.store.contains(&chart.name) {
                pad.add_chart(chart.to_chart());
            } else {
                problems.push(format!("pad {index}: curve {} is not loaded", chart.name));
            }
        }
        session.pads.push(pad);
    }

    if problems.is_empty() {
        Ok(session)
    } else {
        log::warn!("template rejected with {} problem(s)", problems.len());
        Err(TemplateError::PartiallyInvalid(problems))
    }
}
