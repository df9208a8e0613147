use app_core::string_error::ErrorStringExt;
use std::{
    convert::Infallible,
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::template::ProjectPaths;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub project_root: PathBuf,
    pub files_dir: String,
    pub scroll_cooldown: Duration,
    /// SVG width of one pad width unit.
    pub svg_pad_width: u64,
    pub svg_height: u64,
    pub header_row_height: u64,
    pub max_visible_pads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            files_dir: "Files".to_string(),
            scroll_cooldown: Duration::from_secs(1),
            svg_pad_width: 60,
            svg_height: 800,
            header_row_height: 40,
            max_visible_pads: 5,
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str, target: &mut T) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    } else {
        log::warn!("could not parse '{key}' as number")
    }
}

impl Config {
    pub fn from_config_file() -> Result<Self, String> {
        #[allow(deprecated)]
        let Some(home) = std::env::home_dir() else {
            return Err("could not determine home directory to load config file".into());
        };
        Self::from_path(&home.join(PathBuf::from(".petro_chart")))
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let config_raw = {
            let mut file = std::fs::File::open(path).err_to_string("could not open config file")?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        config_raw.parse::<Self>().map_err(|never| match never {})
    }

    pub fn project(&self) -> ProjectPaths {
        ProjectPaths::new(self.project_root.clone(), self.files_dir.clone())
    }
}

/// Reads `key=value` lines. Unknown keys are skipped, bad values keep their
/// default.
impl FromStr for Config {
    type Err = Infallible;

    fn from_str(config_raw: &str) -> Result<Self, Self::Err> {
        let mut config = Self::default();
        for line in config_raw.lines() {
            // Lines starting with "#" are considered comments.
            if line.starts_with('#') {
                continue;
            }
            let mut iter = line.splitn(2, '=');
            let key = iter.next().map(str::trim);
            let val = iter.next();
            match (key, val) {
                (Some("project_root"), Some(path_str)) => {
                    config.project_root = PathBuf::from(path_str.trim());
                }
                (Some("files_dir"), Some(dir)) => {
                    config.files_dir = dir.trim().to_string();
                }
                (Some("scroll_cooldown_ms"), Some(ms_str)) => {
                    let mut ms = config.scroll_cooldown.as_millis() as u64;
                    parse_number("scroll_cooldown_ms", ms_str, &mut ms);
                    config.scroll_cooldown = Duration::from_millis(ms);
                }
                (Some("svg_pad_width"), Some(width_str)) => {
                    parse_number("svg_pad_width", width_str, &mut config.svg_pad_width);
                }
                (Some("svg_height"), Some(height_str)) => {
                    parse_number("svg_height", height_str, &mut config.svg_height);
                }
                (Some("header_row_height"), Some(height_str)) => {
                    parse_number("header_row_height", height_str, &mut config.header_row_height);
                }
                (Some("max_visible_pads"), Some(count_str)) => {
                    parse_number("max_visible_pads", count_str, &mut config.max_visible_pads);
                }
                _ => continue,
            }
        }
        Ok(config)
    }
}
