//! All curves of the loaded log files, keyed by `'<mnemonic>' <short file name>`.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    curve::{Curve, CurveKey, DepthAxisId, FileId},
    reader::{LogData, LogReader},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a file named '{0}' is already loaded")]
    DuplicateFile(String),

    #[error("{0:?} has no usable file name")]
    NoFileName(PathBuf),

    #[error("{0}")]
    Read(String),

    #[error("{0:?} contains no curves")]
    NoCurves(PathBuf),

    #[error("depth axis of {0:?} is empty")]
    EmptyDepth(PathBuf),

    #[error("depth axis of {0:?} is not monotonic")]
    NonMonotonicDepth(PathBuf),

    #[error("curve '{curve}' of {path:?} has {len} samples, depth axis has {depth_len}")]
    LengthMismatch {
        path: PathBuf,
        curve: String,
        len: usize,
        depth_len: usize,
    },
}

#[derive(Debug, Clone)]
struct LoadedFile {
    path: PathBuf,
    short_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CurveStore {
    files: Vec<LoadedFile>,
    depth_axes: Vec<Vec<f64>>,
    curves: HashMap<CurveKey, Curve>,
    order: Vec<CurveKey>,
}

/// File stem used to build curve keys.
pub fn short_name(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

enum Direction {
    Increasing,
    Decreasing,
}

fn depth_direction(depth: &[f64]) -> Option<Direction> {
    if depth.iter().any(|d| !d.is_finite()) {
        return None;
    }
    if depth.windows(2).all(|w| w[0] < w[1]) {
        Some(Direction::Increasing)
    } else if depth.windows(2).all(|w| w[0] > w[1]) {
        Some(Direction::Decreasing)
    } else {
        None
    }
}

impl CurveStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `path` and registers all its curves. On error the store is unchanged.
    pub fn add_file(&mut self, path: &Path, reader: &dyn LogReader) -> Result<FileId, StoreError> {
        let short = short_name(path).ok_or_else(|| StoreError::NoFileName(path.to_path_buf()))?;
        if self.files.iter().any(|f| f.short_name == short) {
            return Err(StoreError::DuplicateFile(short));
        }
        let data = reader.read(path).map_err(StoreError::Read)?;
        self.insert(path, short, data)
    }

    fn insert(&mut self, path: &Path, short: String, data: LogData) -> Result<FileId, StoreError> {
        let mut raw = data.curves;
        if raw.is_empty() {
            return Err(StoreError::NoCurves(path.to_path_buf()));
        }
        let depth_len = raw[0].dots.len();
        if depth_len == 0 {
            return Err(StoreError::EmptyDepth(path.to_path_buf()));
        }
        if let Some(bad) = raw.iter().find(|c| c.dots.len() != depth_len) {
            return Err(StoreError::LengthMismatch {
                path: path.to_path_buf(),
                curve: bad.name.clone(),
                len: bad.dots.len(),
                depth_len,
            });
        }
        match depth_direction(&raw[0].dots) {
            Some(Direction::Increasing) => {}
            Some(Direction::Decreasing) => {
                log::info!("depth axis of {:?} is decreasing, reversing all curves", path);
                raw.iter_mut().for_each(|c| c.dots.reverse());
            }
            None => return Err(StoreError::NonMonotonicDepth(path.to_path_buf())),
        }

        let file = FileId(self.files.len());
        let axis = DepthAxisId(self.depth_axes.len());
        self.depth_axes.push(raw[0].dots.clone());
        for curve in raw {
            let key = CurveKey::new(&curve.name, &short);
            if self.curves.contains_key(&key) {
                log::warn!("curve {} appears twice in {:?}, keeping the first", key, path);
                continue;
            }
            self.order.push(key.clone());
            self.curves.insert(
                key,
                Curve {
                    mnemonic: curve.name,
                    dots: curve.dots,
                    unit: curve.unit,
                    source: file,
                    depth_axis: axis,
                },
            );
        }
        log::debug!("loaded {:?} as '{}'", path, short);
        self.files.push(LoadedFile {
            path: path.to_path_buf(),
            short_name: short,
        });
        Ok(file)
    }

    pub fn curve(&self, key: &CurveKey) -> Option<&Curve> {
        self.curves.get(key)
    }

    pub fn contains(&self, key: &CurveKey) -> bool {
        self.curves.contains_key(key)
    }

    /// Curve keys in load order.
    pub fn keys(&self) -> impl Iterator<Item = &CurveKey> {
        self.order.iter()
    }

    /// Paths of the loaded files in load order.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn depth_axis(&self, id: DepthAxisId) -> Option<&[f64]> {
        self.depth_axes.get(id.0).map(Vec::as_slice)
    }

    pub fn depth_axis_for(&self, key: &CurveKey) -> Option<&[f64]> {
        self.curve(key).and_then(|c| self.depth_axis(c.depth_axis))
    }

    /// First depth axis with exactly `len` samples. Only meant for
    /// documents that predate explicit curve keys.
    pub fn depth_axis_by_len(&self, len: usize) -> Option<&[f64]> {
        self.depth_axes
            .iter()
            .find(|axis| axis.len() == len)
            .map(Vec::as_slice)
    }

    /// Overall `(min_y, max_y)` of every loaded depth axis.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for axis in &self.depth_axes {
            // axes are validated strictly increasing on load
            if let (Some(&first), Some(&last)) = (axis.first(), axis.last()) {
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(first), hi.max(last)),
                    None => (first, last),
                });
            }
        }
        range
    }

    /// First non-depth curve of the first file, or the depth curve if the
    /// file has nothing else.
    pub fn default_curve(&self) -> Option<&CurveKey> {
        let first = FileId(0);
        let mut of_first = self
            .order
            .iter()
            .filter(|k| self.curves.get(*k).map(|c| c.source) == Some(first));
        let depth = of_first.next();
        of_first.next().or(depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::RawCurve;

    struct FakeReader(Vec<(&'static str, Vec<f64>)>);

    impl LogReader for FakeReader {
        fn read(&self, _path: &Path) -> Result<LogData, String> {
            Ok(LogData {
                curves: self
                    .0
                    .iter()
                    .map(|(name, dots)| RawCurve {
                        name: name.to_string(),
                        unit: "u".into(),
                        dots: dots.clone(),
                    })
                    .collect(),
            })
        }
    }

    struct FailingReader;

    impl LogReader for FailingReader {
        fn read(&self, path: &Path) -> Result<LogData, String> {
            Err(format!("{path:?}: broken"))
        }
    }

    fn reader() -> FakeReader {
        FakeReader(vec![
            ("DEPT", vec![100.0, 101.0, 102.0]),
            ("GR", vec![10.0, 20.0, 30.0]),
            ("RHOB", vec![2.1, 2.2, 2.3]),
        ])
    }

    #[test]
    fn test_add_file() {
        let mut store = CurveStore::new();
        let id = store.add_file(Path::new("data/well_1.las"), &reader()).unwrap();
        assert_eq!(id, FileId(0));
        let keys: Vec<_> = store.keys().map(|k| k.as_str().to_string()).collect();
        assert_eq!(keys, vec!["'DEPT' well_1", "'GR' well_1", "'RHOB' well_1"]);
        let gr = store.curve(&CurveKey::new("GR", "well_1")).unwrap();
        assert_eq!(gr.dots(), &[10.0, 20.0, 30.0]);
        assert_eq!(gr.unit(), "u");
        assert_eq!(
            store.depth_axis_for(&CurveKey::new("GR", "well_1")).unwrap(),
            &[100.0, 101.0, 102.0]
        );
        assert_eq!(store.extent(), Some((100.0, 102.0)));
        assert_eq!(store.default_curve(), Some(&CurveKey::new("GR", "well_1")));
    }

    #[test]
    fn test_duplicate_short_name() {
        let mut store = CurveStore::new();
        store.add_file(Path::new("a/well.las"), &reader()).unwrap();
        let res = store.add_file(Path::new("b/well.las"), &reader());
        assert!(matches!(res, Err(StoreError::DuplicateFile(name)) if name == "well"));
        assert_eq!(store.file_count(), 1);
        assert_eq!(store.keys().count(), 3);
    }

    #[test]
    fn test_decreasing_depth_is_reversed() {
        let reader = FakeReader(vec![
            ("DEPT", vec![102.0, 101.0, 100.0]),
            ("GR", vec![30.0, 20.0, 10.0]),
        ]);
        let mut store = CurveStore::new();
        store.add_file(Path::new("up.las"), &reader).unwrap();
        assert_eq!(
            store.depth_axis_for(&CurveKey::new("GR", "up")).unwrap(),
            &[100.0, 101.0, 102.0]
        );
        assert_eq!(
            store.curve(&CurveKey::new("GR", "up")).unwrap().dots(),
            &[10.0, 20.0, 30.0]
        );
    }

    #[test]
    fn test_rejected_files_leave_store_unchanged() {
        let mut store = CurveStore::new();
        let zigzag = FakeReader(vec![("DEPT", vec![1.0, 3.0, 2.0])]);
        assert!(matches!(
            store.add_file(Path::new("z.las"), &zigzag),
            Err(StoreError::NonMonotonicDepth(_))
        ));
        let short = FakeReader(vec![("DEPT", vec![1.0, 2.0]), ("GR", vec![1.0])]);
        assert!(matches!(
            store.add_file(Path::new("s.las"), &short),
            Err(StoreError::LengthMismatch { len: 1, depth_len: 2, .. })
        ));
        assert!(matches!(
            store.add_file(Path::new("f.las"), &FailingReader),
            Err(StoreError::Read(_))
        ));
        assert!(matches!(
            store.add_file(Path::new("e.las"), &FakeReader(vec![])),
            Err(StoreError::NoCurves(_))
        ));
        assert!(store.is_empty());
        assert_eq!(store.extent(), None);
    }

    #[test]
    fn test_depth_axis_by_len_picks_first_match() {
        let mut store = CurveStore::new();
        store.add_file(Path::new("one.las"), &reader()).unwrap();
        let other = FakeReader(vec![("DEPT", vec![5.0, 6.0, 7.0])]);
        store.add_file(Path::new("two.las"), &other).unwrap();
        assert_eq!(store.depth_axis_by_len(3).unwrap(), &[100.0, 101.0, 102.0]);
        assert_eq!(store.depth_axis_by_len(4), None);
        // explicit keys disambiguate equal lengths
        assert_eq!(
            store.depth_axis_for(&CurveKey::new("DEPT", "two")).unwrap(),
            &[5.0, 6.0, 7.0]
        );
        assert_eq!(store.extent(), Some((5.0, 102.0)));
    }
}
