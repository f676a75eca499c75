//! Scenario loading: format detection, file discovery, and deserialization.
//!
//! Scenario files may be RON, TOML or JSON; the format is chosen by
//! extension. A directory of scenarios is loaded in file-name order so runs
//! are reproducible.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use surfer_core::error::SimError;

use crate::schema::{ResolvedScenario, ScenarioFile};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading scenarios.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The extension is not `ron`, `toml` or `json`.
    #[error("{file} is not a scenario file")]
    UnsupportedFormat { file: PathBuf },

    /// Two scenario files with the same base name but different formats exist.
    #[error("scenario {a} is also defined by {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// The file did not match the scenario schema.
    #[error("could not read scenario {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A date field is not an RFC 3339 timestamp.
    #[error("{field} is not an RFC 3339 timestamp: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    /// A quantity field could not be parsed or has the wrong dimension.
    #[error("invalid quantity for {field}: {detail}")]
    Quantity { field: &'static str, detail: String },

    /// A numeric field is outside its allowed range.
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// The resolved configuration or a model parameter was rejected by the
    /// engine.
    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Serde front-ends a scenario can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Every accepted format.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Pick the format for a scenario file from its extension (case-sensitive).
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|format| Some(format.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read `path` and deserialize it in the format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let text = std::fs::read_to_string(path)?;
    deserialize_str(&text, format).map_err(|detail| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    })
}

/// Deserialize in-memory content of a known format.
pub fn deserialize_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, String> {
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

/// Load and resolve one scenario file. The file stem names the scenario
/// unless the file sets `name`.
pub fn load_scenario(path: &Path) -> Result<ResolvedScenario, DataLoadError> {
    let file: ScenarioFile = deserialize_file(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scenario");
    let resolved = file.resolve(stem)?;
    log::info!(
        "loaded scenario '{}' from {}: {} steps of {} s",
        resolved.name,
        path.display(),
        resolved.config.expected_steps(),
        resolved.config.delta_seconds(),
    );
    Ok(resolved)
}

/// Find every scenario file in `dir`, sorted by file name.
///
/// Files with other extensions are skipped. Two files sharing a stem in
/// different formats are an error.
pub fn discover_scenarios(dir: &Path) -> Result<Vec<PathBuf>, DataLoadError> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if detect_format(&path).is_err() {
            log::debug!("skipping non-scenario file {}", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    for pair in paths.windows(2) {
        if pair[0].file_stem() == pair[1].file_stem() {
            return Err(DataLoadError::ConflictingFormats {
                a: pair[0].clone(),
                b: pair[1].clone(),
            });
        }
    }
    Ok(paths)
}

/// Load and resolve every scenario in `dir`, in file-name order.
pub fn load_scenario_dir(dir: &Path) -> Result<Vec<ResolvedScenario>, DataLoadError> {
    discover_scenarios(dir)?
        .iter()
        .map(|path| load_scenario(path))
        .collect()
}

// ===========================================================================
// Tests
// ===========================================================================
