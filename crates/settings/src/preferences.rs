use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use lsldetails_core::{ScanOptions, DEFAULT_BATCH_SIZE, DEFAULT_MARKER_SUFFIX, DEFAULT_PANE_CAPTION};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const PREFERENCES_VERSION: u32 = 1;
const MAX_BATCH_SIZE: usize = 64;

/// Failures while loading or persisting `preferences.json`.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("cannot access preferences file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preferences file {path} is not valid JSON")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("preferences could not be encoded")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub caption: CaptionPreferences,
    #[serde(default)]
    pub enumeration: EnumerationPreferences,
    #[serde(default)]
    pub output: OutputPreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            caption: CaptionPreferences::default(),
            enumeration: EnumerationPreferences::default(),
            output: OutputPreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.caption.sanitize();
        self.enumeration.sanitize();
        self.output.sanitize();
    }
}

/// How deferred projects are marked in the solution tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionPreferences {
    #[serde(default = "default_marker_suffix")]
    pub marker_suffix: String,
    #[serde(default = "default_true")]
    pub skip_already_marked: bool,
}

fn default_true() -> bool {
    true
}

fn default_marker_suffix() -> String {
    DEFAULT_MARKER_SUFFIX.to_string()
}

impl Default for CaptionPreferences {
    fn default() -> Self {
        Self {
            marker_suffix: default_marker_suffix(),
            skip_already_marked: true,
        }
    }
}

impl CaptionPreferences {
    fn sanitize(&mut self) {
        if self.marker_suffix.is_empty() {
            self.marker_suffix = default_marker_suffix();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationPreferences {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl Default for EnumerationPreferences {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

impl EnumerationPreferences {
    fn sanitize(&mut self) {
        self.batch_size = self.batch_size.clamp(1, MAX_BATCH_SIZE);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPreferences {
    #[serde(default = "default_pane_caption")]
    pub pane_caption: String,
}

fn default_pane_caption() -> String {
    DEFAULT_PANE_CAPTION.to_string()
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            pane_caption: default_pane_caption(),
        }
    }
}

impl OutputPreferences {
    fn sanitize(&mut self) {
        if self.pane_caption.trim().is_empty() {
            self.pane_caption = default_pane_caption();
        }
    }
}

/// Preferences bound to the JSON file they were loaded from.
/// 與來源 JSON 檔案綁定的偏好設定。
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// A missing file yields sanitized defaults; nothing is written.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref();
        let data = if path.exists() {
            read_preferences(path)?
        } else {
            let mut defaults = Preferences::default();
            defaults.sanitize();
            defaults
        };
        Ok(Self::new(path, data))
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    /// Applies `op`, sanitizes the result and persists it.
    pub fn update(&mut self, op: impl FnOnce(&mut Preferences)) -> Result<(), PreferencesError> {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        write_atomic(&self.path, &self.data)
    }

    pub fn export_to(&self, target: impl AsRef<Path>) -> Result<(), PreferencesError> {
        write_atomic(target.as_ref(), &self.data)
    }

    /// Replaces the stored preferences with `source`. The previous file, if
    /// any, is kept next to it with a `.bak` extension.
    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let incoming = read_preferences(source.as_ref())?;
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| io_error(&backup, source))?;
        }
        self.data = incoming;
        self.save()
    }
}

fn io_error(path: &Path, source: io::Error) -> PreferencesError {
    PreferencesError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn read_preferences(path: &Path) -> Result<Preferences, PreferencesError> {
    let contents = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let mut data: Preferences =
        serde_json::from_str(&contents).map_err(|source| PreferencesError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
    data.sanitize();
    Ok(data)
}

fn write_atomic(path: &Path, data: &Preferences) -> Result<(), PreferencesError> {
    let payload = serde_json::to_string_pretty(data).map_err(PreferencesError::Encode)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    let staging = path.with_extension("tmp");
    fs::write(&staging, payload).map_err(|source| io_error(&staging, source))?;
    fs::rename(&staging, path).map_err(|source| io_error(path, source))
}

impl From<&Preferences> for ScanOptions {
    fn from(prefs: &Preferences) -> Self {
        Self {
            marker_suffix: prefs.caption.marker_suffix.clone(),
            skip_already_marked: prefs.caption.skip_already_marked,
            batch_size: prefs.enumeration.batch_size,
            pane_caption: prefs.output.pane_caption.clone(),
        }
    }
}
