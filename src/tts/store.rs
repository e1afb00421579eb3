use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use derive_builder::Builder;

use crate::{Callback, ErrorCallback, SpeechError, SpeechHost, Utterance, Voice};

use super::select::{pick_two_distinct, ENGLISH_PREFIX};
use super::settings::{
    self, normalize_rate, KeyValueStore, TtsSettings, DEFAULT_ACCENT, DEFAULT_RATE,
    DEFAULT_STORAGE_KEY,
};
use super::voices::{get_voices_once, DEFAULT_VOICES_TIMEOUT};

/// Parameters for configuring a [`TtsStore`].
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct TtsConfig {
    /// Key the settings blob is persisted under.
    #[builder(setter(into))]
    pub storage_key: String,
    /// How long to wait for the host to populate its voice list.
    pub voices_timeout: Duration,
    /// Accent used until the user picks one.
    #[builder(setter(into))]
    pub default_accent: String,
    /// Speech rate used until the user picks one.
    pub default_rate: f32,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            voices_timeout: DEFAULT_VOICES_TIMEOUT,
            default_accent: DEFAULT_ACCENT.to_string(),
            default_rate: DEFAULT_RATE,
        }
    }
}

/// Conversational role; each role speaks with its own voice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    A,
    B,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::A => f.write_str("A"),
            Role::B => f.write_str("B"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Role::A),
            "B" | "b" => Ok(Role::B),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Lifecycle callbacks for a single [`TtsStore::speak`] call.
#[derive(Default)]
pub struct SpeakOptions {
    pub on_start: Option<Callback>,
    pub on_end: Option<Callback>,
    pub on_error: Option<ErrorCallback>,
}

impl SpeakOptions {
    pub fn on_start(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    pub fn on_end(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(SpeechError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }
}

/// Speech settings, voice catalog and playback driver.
///
/// Every setter persists the settings. A missing host or storage turns the
/// corresponding operations into no-ops.
///
/// ```rust,no_run
/// # async fn run(host: std::sync::Arc<dyn dialogue_tts::SpeechHost>) {
/// use std::sync::Arc;
/// use dialogue_tts::tts::{MemoryStore, Role, SpeakOptions, TtsConfig, TtsStore};
///
/// let mut tts = TtsStore::new(Some(host), Some(Arc::new(MemoryStore::new())), TtsConfig::default());
/// tts.init().await;
/// tts.speak("Hello!", Role::B, SpeakOptions::default().on_end(|| println!("done")));
/// # }
/// ```
pub struct TtsStore {
    settings: TtsSettings,
    voices: Vec<Voice>,
    ready: bool,
    host: Option<Arc<dyn SpeechHost>>,
    storage: Option<Arc<dyn KeyValueStore>>,
    config: TtsConfig,
}

impl TtsStore {
    pub fn new(
        host: Option<Arc<dyn SpeechHost>>,
        storage: Option<Arc<dyn KeyValueStore>>,
        config: TtsConfig,
    ) -> Self {
        let settings = TtsSettings {
            rate: normalize_rate(config.default_rate),
            accent: config.default_accent.clone(),
            ..TtsSettings::default()
        };
        Self {
            settings,
            voices: Vec::new(),
            ready: false,
            host,
            storage,
            config,
        }
    }

    pub fn settings(&self) -> &TtsSettings {
        &self.settings
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Whether [`TtsStore::init`] has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Voices matching the current accent.
    pub fn voices_for_accent(&self) -> Vec<&Voice> {
        self.voices
            .iter()
            .filter(|v| v.matches_lang(&self.settings.accent))
            .collect()
    }

    pub fn all_english_voices(&self) -> Vec<&Voice> {
        self.voices
            .iter()
            .filter(|v| v.matches_lang(ENGLISH_PREFIX))
            .collect()
    }

    /// Load persisted settings, resolve the voice list and persist the result.
    pub async fn init(&mut self) {
        self.restore();
        self.refresh_voices().await;
        self.ready = true;
        self.persist();
        log::info!(
            "TTS ready: accent={}, voiceA='{}', voiceB='{}'",
            self.settings.accent,
            self.settings.voice_a,
            self.settings.voice_b
        );
    }

    fn restore(&mut self) {
        let Some(storage) = self.storage.as_deref() else {
            return;
        };
        match settings::load(storage, &self.config.storage_key, &self.settings) {
            Ok(Some(loaded)) => self.settings = loaded,
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring unreadable TTS settings: {e}"),
        }
    }

    /// Re-query the host voice list and re-validate the configured voices.
    pub async fn refresh_voices(&mut self) {
        let voices = match self.host.as_deref() {
            Some(host) => get_voices_once(host, self.config.voices_timeout).await,
            None => Vec::new(),
        };
        self.apply_voices(voices);
    }

    /// Replace the voice catalog.
    ///
    /// Configured voices are kept when both are still offered; otherwise both
    /// are re-picked for the current accent.
    pub fn apply_voices(&mut self, voices: Vec<Voice>) {
        self.voices = voices;
        let has_a = self.find_voice(&self.settings.voice_a).is_some();
        let has_b = self.find_voice(&self.settings.voice_b).is_some();
        if !has_a || !has_b {
            self.repick();
        }
        self.persist();
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.settings.rate = normalize_rate(rate);
        self.persist();
    }

    /// Switch accent and re-pick both voices, discarding previous choices.
    pub fn set_accent(&mut self, accent: impl Into<String>) {
        self.settings.accent = accent.into();
        self.repick();
        self.persist();
    }

    pub fn set_voice_a(&mut self, name: impl Into<String>) {
        self.settings.voice_a = name.into();
        self.persist();
    }

    pub fn set_voice_b(&mut self, name: impl Into<String>) {
        self.settings.voice_b = name.into();
        self.persist();
    }

    fn repick(&mut self) {
        if let Some((a, b)) = pick_two_distinct(&self.voices, &self.settings.accent) {
            log::debug!(
                "Picked voices '{}' / '{}' for accent {}",
                a.name,
                b.name,
                self.settings.accent
            );
            self.settings.voice_a = a.name.clone();
            self.settings.voice_b = b.name.clone();
        }
    }

    fn find_voice(&self, name: &str) -> Option<&Voice> {
        self.voices.iter().find(|v| v.name == name)
    }

    /// Voice for `role`: the configured one, else the first accent voice, else
    /// the first English voice, else the first voice at all.
    pub fn get_voice(&self, role: Role) -> Option<&Voice> {
        let target = match role {
            Role::A => &self.settings.voice_a,
            Role::B => &self.settings.voice_b,
        };
        self.find_voice(target)
            .or_else(|| {
                self.voices
                    .iter()
                    .find(|v| v.matches_lang(&self.settings.accent))
            })
            .or_else(|| self.voices.iter().find(|v| v.matches_lang(ENGLISH_PREFIX)))
            .or_else(|| self.voices.first())
    }

    /// Speak `text` with the voice for `role`.
    ///
    /// Anything currently playing is canceled first, so the latest line always
    /// wins. Without a host this does nothing and no callback fires.
    pub fn speak(&self, text: &str, role: Role, options: SpeakOptions) {
        let Some(host) = self.host.as_deref() else {
            return;
        };
        host.cancel();
        host.speak(self.utterance(text, role, options));
    }

    fn utterance(&self, text: &str, role: Role, options: SpeakOptions) -> Utterance {
        let voice = self.get_voice(role).cloned();
        let lang = match &voice {
            Some(v) => v.lang.clone(),
            None if !self.settings.accent.is_empty() => self.settings.accent.clone(),
            None => DEFAULT_ACCENT.to_string(),
        };
        Utterance {
            text: text.to_string(),
            rate: self.settings.rate,
            voice,
            lang,
            on_start: options.on_start,
            on_end: options.on_end,
            on_error: options.on_error,
        }
    }

    /// Cancel all pending and active speech.
    pub fn cancel(&self) {
        if let Some(host) = self.host.as_deref() {
            host.cancel();
        }
    }

    fn persist(&self) {
        let Some(storage) = self.storage.as_deref() else {
            return;
        };
        if let Err(e) = settings::save(storage, &self.config.storage_key, &self.settings) {
            log::warn!("TTS settings not saved: {e}");
        }
    }
}
