use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{BikeshareError, Result};
use crate::table::City;

/// Default data directory when neither `--data-dir` nor `BIKESHARE_DATA_DIR` is set.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Maps each city to the CSV source it is loaded from.
///
/// Built once at startup and handed to the loader. A config file is a plain
/// JSON object keyed by city code:
/// ```json
/// {
///   "C": "chicago.csv",
///   "N": "/srv/bikeshare/new_york_city.csv"
/// }
/// ```
/// Relative paths are resolved against the config file's directory. Cities
/// left out have no source.
#[derive(Debug, Clone, Default)]
pub struct CityConfig {
    sources: HashMap<City, PathBuf>,
}

impl CityConfig {
    /// The stock mapping: every city's default file name under `dir`.
    pub fn with_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let sources = City::ALL
            .into_iter()
            .map(|city| (city, dir.join(city.default_file_name())))
            .collect();
        Self { sources }
    }

    /// Loads the mapping from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        Self::from_json(&content, base)
    }

    fn from_json(content: &str, base: &Path) -> Result<Self> {
        let entries: HashMap<String, PathBuf> = serde_json::from_str(content)?;

        let mut sources = HashMap::new();
        for (code, file) in entries {
            match code.parse::<City>() {
                Ok(city) => {
                    sources.insert(city, base.join(file));
                }
                Err(_) => warn!(code = %code, "Ignoring unknown city code in config"),
            }
        }

        Ok(Self { sources })
    }

    /// Returns the source path configured for `city`.
    pub fn source(&self, city: City) -> Result<&Path> {
        self.sources
            .get(&city)
            .map(PathBuf::as_path)
            .ok_or_else(|| BikeshareError::SourceNotFound(city.to_string()))
    }
}
