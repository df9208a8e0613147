//! The seam to log file parsers.

use std::path::Path;

use las_reader::LasFile;

/// One curve as delivered by a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCurve {
    pub name: String,
    pub unit: String,
    pub dots: Vec<f64>,
}

/// Curves of one file in file order. The first curve is the depth axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogData {
    pub curves: Vec<RawCurve>,
}

pub trait LogReader {
    fn read(&self, path: &Path) -> Result<LogData, String>;
}

/// Reads LAS 2.0 files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LasReader;

impl LogReader for LasReader {
    fn read(&self, path: &Path) -> Result<LogData, String> {
        let las = LasFile::from_path(path)?;
        if let Some(well) = las.well_value("WELL") {
            log::info!("read well '{}' from {:?}", well, path);
        }
        Ok(LogData {
            curves: las
                .curves
                .into_iter()
                .map(|c| RawCurve {
                    name: c.mnemonic,
                    unit: c.unit,
                    dots: c.dots,
                })
                .collect(),
        })
    }
}
