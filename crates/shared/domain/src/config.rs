use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Durable record key used by the reference deployment.
pub const DEFAULT_STORAGE_KEY: &str = "cookieConsent";

/// Top-level engine configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfigInner {
    pub storage: StorageConfig,
    pub prompt: PromptConfig,
    pub signal: SignalConfig,
    pub diagnostics: DiagnosticsConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten, default)]
    inner: Arc<EngineConfigInner>,
}

impl Deref for EngineConfig {
    type Target = EngineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for EngineConfig {
    fn deref_mut(&mut self) -> &mut EngineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Which persistent store backs the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit. Useful for tests and embedding.
    Memory,
    /// One JSON file per key under `data_dir`.
    #[default]
    File,
}

/// Durable preference record location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub key: String,
}

/// Preference prompt behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Location on which the prompt is never shown automatically.
    pub privacy_policy_path: String,
}

/// Consent-mode signaling knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Settle budget attached to the initial "default" signal.
    pub wait_for_update_ms: u64,
}

/// Operator-facing diagnostics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Grace period before warning that a consent-mode service found no active bridge.
    pub consent_mode_warning_ms: u64,
}

/// Logging output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub filter: Option<String>,
}

impl SignalConfig {
    #[must_use]
    pub const fn wait_for_update(&self) -> Duration {
        Duration::from_millis(self.wait_for_update_ms)
    }
}

impl DiagnosticsConfig {
    #[must_use]
    pub const fn consent_mode_warning(&self) -> Duration {
        Duration::from_millis(self.consent_mode_warning_ms)
    }
}

// --- Default ---

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("data"),
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { privacy_policy_path: "/privacy".to_owned() }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { wait_for_update_ms: 500 }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self { consent_mode_warning_ms: 3000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, directory: None, json: false, filter: None }
    }
}
