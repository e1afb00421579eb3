use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accent tags offered to the user.
pub const ACCENTS: &[&str] = &["en-US", "en-GB", "en-AU", "en-CA"];

/// Storage key the settings blob is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "toeic-tts-settings-v1";

pub const DEFAULT_ACCENT: &str = "en-US";

pub const DEFAULT_RATE: f32 = 1.0;

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// User-facing speech settings.
///
/// `voice_a` / `voice_b` hold voice names and may refer to voices the host no
/// longer offers; they are re-resolved whenever they are used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsSettings {
    pub rate: f32,
    pub accent: String,
    pub voice_a: String,
    pub voice_b: String,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            accent: DEFAULT_ACCENT.to_string(),
            voice_a: String::new(),
            voice_b: String::new(),
        }
    }
}

/// On-disk shape. A field that is missing, `null` or of the wrong type is
/// ignored on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSettings {
    rate: Option<Value>,
    accent: Option<Value>,
    voice_a: Option<Value>,
    voice_b: Option<Value>,
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

impl TtsSettings {
    /// Overlay persisted values onto `self`, keeping current values for
    /// unusable fields.
    fn merge(&mut self, persisted: PersistedSettings) {
        if let Some(rate) = persisted.rate.as_ref().and_then(Value::as_f64) {
            self.rate = normalize_rate(rate as f32);
        }
        if let Some(accent) = string_field(persisted.accent) {
            self.accent = accent;
        }
        if let Some(a) = string_field(persisted.voice_a) {
            self.voice_a = a;
        }
        if let Some(b) = string_field(persisted.voice_b) {
            self.voice_b = b;
        }
    }
}

/// Clamp a requested rate to the `rate > 0` invariant.
pub fn normalize_rate(rate: f32) -> f32 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        DEFAULT_RATE
    }
}

/// Minimal string key-value store that outlives the process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store, useful for tests and hosts without persistent storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store under the platform data directory (e.g. `~/.local/share/dialogue-tts`).
    pub fn in_data_dir() -> Result<Self, StorageError> {
        let base = dirs::data_dir()
            .ok_or_else(|| StorageError::Unavailable("no data directory".to_string()))?;
        Ok(Self::new(base.join("dialogue-tts")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// Read the settings blob stored under `key` and overlay it onto `defaults`.
///
/// Returns `Ok(None)` when nothing has been stored yet.
pub fn load(
    store: &dyn KeyValueStore,
    key: &str,
    defaults: &TtsSettings,
) -> Result<Option<TtsSettings>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    let persisted: PersistedSettings = serde_json::from_str(&raw)?;
    let mut settings = defaults.clone();
    settings.merge(persisted);
    Ok(Some(settings))
}

/// Write `settings` under `key` as `{rate, accent, voiceA, voiceB}`.
pub fn save(store: &dyn KeyValueStore, key: &str, settings: &TtsSettings) -> Result<(), StorageError> {
    let json = serde_json::to_string(settings)?;
    store.set(key, &json)
}
