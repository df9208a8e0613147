#![warn(clippy::all, rust_2018_idioms)]

//! Reader for LAS 2.0 well-log files (ASCII, wrapped or unwrapped).
//!
//! A LAS file is split into sections introduced by a `~` line. Only the
//! version (`~V`), well (`~W`), curve (`~C`) and ASCII data (`~A`) sections
//! are interpreted, everything else is skipped. The first curve of the file
//! is its depth index.

use app_core::string_error::ErrorStringExt;
use std::path::Path;

/// One `MNEM.UNIT  VALUE : DESCRIPTION` line of a header section.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderItem {
    pub mnemonic: String,
    pub unit: String,
    pub value: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LasCurve {
    pub mnemonic: String,
    pub unit: String,
    pub description: String,
    pub dots: Vec<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct LasFile {
    pub version: Vec<HeaderItem>,
    pub well: Vec<HeaderItem>,
    pub curves: Vec<LasCurve>,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Section {
    Preamble,
    Version,
    Well,
    Curves,
    Data,
    Other,
}

impl From<&str> for Section {
    // Only the first letter after the tilde identifies a section.
    fn from(line: &str) -> Self {
        match line.trim_start_matches('~').chars().next() {
            Some('V' | 'v') => Section::Version,
            Some('W' | 'w') => Section::Well,
            Some('C' | 'c') => Section::Curves,
            Some('A' | 'a') => Section::Data,
            _ => Section::Other,
        }
    }
}

impl LasFile {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).err_to_string("unable to read log file")?;
        let raw_input = String::from_utf8_lossy(&bytes);
        Self::from_string(&raw_input).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn from_string(raw_input: &str) -> Result<Self, String> {
        let mut las = LasFile::default();
        let mut section = Section::Preamble;
        let mut values = Vec::new();

        for (line_no, line) in raw_input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('~') {
                section = Section::from(line);
                log::debug!("line {}: entering section {:?}", line_no + 1, section);
                continue;
            }
            match section {
                Section::Version | Section::Well | Section::Curves => {
                    let Some(item) = parse_header_line(line) else {
                        log::warn!("unable to parse header line {}: '{}'", line_no + 1, line);
                        continue;
                    };
                    match section {
                        Section::Version => las.version.push(item),
                        Section::Well => las.well.push(item),
                        _ => las.push_curve_definition(item),
                    }
                }
                Section::Data => {
                    for token in line.split_whitespace() {
                        values.push(token.parse::<f64>().unwrap_or_else(|_| {
                            log::warn!(
                                "unable to parse '{}' in line {} as float, using NaN",
                                token,
                                line_no + 1
                            );
                            f64::NAN
                        }));
                    }
                }
                Section::Preamble | Section::Other => (),
            }
        }

        if las.curves.is_empty() {
            return Err("file does not define any curves".to_string());
        }
        if las.version_value("WRAP").is_some_and(|w| w.eq_ignore_ascii_case("YES")) {
            log::debug!("reading wrapped data section");
        }
        las.distribute_values(values);
        Ok(las)
    }

    /// The depth index, i.e. the first curve.
    pub fn depth(&self) -> Option<&LasCurve> {
        self.curves.first()
    }

    pub fn curve(&self, mnemonic: &str) -> Option<&LasCurve> {
        self.curves.iter().find(|c| c.mnemonic == mnemonic)
    }

    pub fn well_value(&self, mnemonic: &str) -> Option<&str> {
        header_value(&self.well, mnemonic)
    }

    pub fn version_value(&self, mnemonic: &str) -> Option<&str> {
        header_value(&self.version, mnemonic)
    }

    /// The value replacing missing samples, `-999.25` by convention.
    pub fn null_value(&self) -> Option<f64> {
        self.well_value("NULL").and_then(|v| v.parse().ok())
    }

    // Repeated mnemonics get a `:1`, `:2`, ... suffix so every curve stays
    // addressable by name.
    fn push_curve_definition(&mut self, item: HeaderItem) {
        let HeaderItem {
            mnemonic,
            unit,
            description,
            ..
        } = item;
        let taken = |name: &str| self.curves.iter().any(|c| c.mnemonic == name);
        let mnemonic = if taken(&mnemonic) {
            let mut n = 1;
            while taken(&format!("{mnemonic}:{n}")) {
                n += 1;
            }
            format!("{mnemonic}:{n}")
        } else {
            mnemonic
        };
        self.curves.push(LasCurve {
            mnemonic,
            unit,
            description,
            dots: Vec::new(),
        });
    }

    // Data values are stored row by row, which holds for wrapped and
    // unwrapped files alike.
    fn distribute_values(&mut self, values: Vec<f64>) {
        let n = self.curves.len();
        let rows = values.len() / n;
        if values.len() % n != 0 {
            log::warn!(
                "data section holds {} values which is not a multiple of {} curves, dropping last partial row",
                values.len(),
                n
            );
        }
        let null = self.null_value();
        for curve in self.curves.iter_mut() {
            curve.dots = Vec::with_capacity(rows);
        }
        for row in values.chunks_exact(n) {
            for (curve, value) in self.curves.iter_mut().zip(row) {
                let value = match null {
                    Some(null) if *value == null => f64::NAN,
                    _ => *value,
                };
                curve.dots.push(value);
            }
        }
    }
}

fn header_value<'a>(items: &'a [HeaderItem], mnemonic: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.mnemonic.eq_ignore_ascii_case(mnemonic))
        .map(|item| item.value.as_str())
}

/// Split `MNEM.UNIT  VALUE : DESCRIPTION`. The unit starts right after the
/// first dot and ends at the first space, the description follows the last
/// colon.
fn parse_header_line(line: &str) -> Option<HeaderItem> {
    let (mnemonic, rest) = line.split_once('.')?;
    let (unit, rest) = match rest.find(char::is_whitespace) {
        Some(pos) => (&rest[..pos], &rest[pos..]),
        None => (rest, ""),
    };
    let (value, description) = match rest.rfind(':') {
        Some(pos) => (&rest[..pos], &rest[pos + 1..]),
        None => (rest, ""),
    };
    let mnemonic = mnemonic.trim();
    if mnemonic.is_empty() {
        return None;
    }
    Some(HeaderItem {
        mnemonic: mnemonic.to_string(),
        unit: unit.trim().to_string(),
        value: value.trim().to_string(),
        description: description.trim().to_string(),
    })
}

// -------------------------------- Tests ------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
~VERSION INFORMATION
 VERS.                 2.0 : CWLS LOG ASCII STANDARD
 WRAP.                  NO : ONE LINE PER DEPTH STEP
~WELL INFORMATION
 STRT.M            1670.0 : START DEPTH
 STOP.M            1670.5 : STOP DEPTH
 NULL.           -999.25 : NULL VALUE
 WELL.       ANY WELL #1 : WELL
~CURVE INFORMATION
 DEPT.M                   : 1  DEPTH
 GR  .GAPI                : 2  GAMMA RAY
 NPHI.V/V                 : 3  NEUTRON POROSITY
# comment in between
~A  DEPTH     GR       NPHI
1670.000   123.4   0.25
1670.250   -999.25 0.27
1670.500   98.0    0.30
";

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_parse_header_line() {
        let item = parse_header_line("NULL.           -999.25 : NULL VALUE").unwrap();
        assert_eq!(item.mnemonic, "NULL");
        assert_eq!(item.unit, "");
        assert_eq!(item.value, "-999.25");
        assert_eq!(item.description, "NULL VALUE");

        let item = parse_header_line("TIME.hh:mm  12:30 : LOG TIME").unwrap();
        assert_eq!(item.unit, "hh:mm");
        assert_eq!(item.value, "12:30");
        assert_eq!(item.description, "LOG TIME");

        assert!(parse_header_line("no dot here").is_none());
    }

    #[test]
    fn test_read_unwrapped_file() {
        init();
        let las = LasFile::from_string(SAMPLE).unwrap();
        assert_eq!(las.curves.len(), 3);
        assert_eq!(las.depth().unwrap().mnemonic, "DEPT");
        assert_eq!(las.depth().unwrap().unit, "M");
        assert_eq!(las.depth().unwrap().dots, vec![1670.0, 1670.25, 1670.5]);
        assert_eq!(las.curve("NPHI").unwrap().unit, "V/V");
        assert_eq!(las.well_value("WELL"), Some("ANY WELL #1"));
        assert_eq!(las.null_value(), Some(-999.25));

        let gr = &las.curve("GR").unwrap().dots;
        assert_eq!(gr[0], 123.4);
        assert!(gr[1].is_nan());
        assert_eq!(gr[2], 98.0);
    }

    #[test]
    fn test_read_wrapped_file() {
        init();
        let raw = "\
~V
 WRAP. YES : multiple lines per depth step
~C
 DEPT.M : depth
 A   .  : a
 B   .  : b
~A
 10.0
 1.0 2.0
 11.0
 3.0 4.0
";
        let las = LasFile::from_string(raw).unwrap();
        assert_eq!(las.depth().unwrap().dots, vec![10.0, 11.0]);
        assert_eq!(las.curve("B").unwrap().dots, vec![2.0, 4.0]);
    }

    #[test]
    fn test_duplicate_mnemonics_get_suffix() {
        let raw = "~C\n DEPT.M : d\n GR.API : a\n GR.API : b\n~A\n1 2 3\n";
        let las = LasFile::from_string(raw).unwrap();
        let names: Vec<_> = las.curves.iter().map(|c| c.mnemonic.as_str()).collect();
        assert_eq!(names, vec!["DEPT", "GR", "GR:1"]);
    }

    #[test]
    fn test_partial_row_is_dropped() {
        init();
        let raw = "~C\n DEPT.M : d\n GR.API : a\n~A\n1 2\n3\n";
        let las = LasFile::from_string(raw).unwrap();
        assert_eq!(las.depth().unwrap().dots, vec![1.0]);
    }

    #[test]
    fn test_file_without_curves_fails() {
        assert!(LasFile::from_string("~V\n VERS. 2.0 : v\n").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("well_1.las");
        std::fs::write(&path, SAMPLE).unwrap();
        let las = LasFile::from_path(&path).unwrap();
        assert_eq!(las.curves.len(), 3);
        assert!(LasFile::from_path(&dir.path().join("missing.las")).is_err());
    }
}
