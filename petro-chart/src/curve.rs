use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a loaded log file, in load order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FileId(pub(crate) usize);

/// Index of a depth axis in the curve store. Every loaded file contributes
/// exactly one.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DepthAxisId(pub(crate) usize);

/// Lookup key of a curve: `'<mnemonic>' <short file name>`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CurveKey(String);

impl CurveKey {
    pub fn new(mnemonic: &str, short_file_name: &str) -> Self {
        Self(format!("'{mnemonic}' {short_file_name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurveKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CurveKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A named depth-indexed series. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct Curve {
    pub(crate) mnemonic: String,
    pub(crate) dots: Vec<f64>,
    pub(crate) unit: String,
    pub(crate) source: FileId,
    pub(crate) depth_axis: DepthAxisId,
}

impl Curve {
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn dots(&self) -> &[f64] {
        &self.dots
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn source(&self) -> FileId {
        self.source
    }

    pub fn depth_axis(&self) -> DepthAxisId {
        self.depth_axis
    }
}
