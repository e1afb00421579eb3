//! # dialogue-tts
//!
//! A Rust library that drives text-to-speech playback of two-speaker dialogues
//! for listening practice.
//!
//! ## Features
//!
//! - **Voice pairing**: Picks two distinct voices (roles A and B) for an accent,
//!   degrading gracefully when the host has fewer voices
//! - **Persistent settings**: Rate, accent and chosen voices survive across sessions
//! - **Play queue**: Sequential playback across dialogues
//! - **Content catalog**: Categories, manifests and dialogue documents
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use dialogue_tts::tts::{MemoryStore, Role, SpeakOptions, TtsConfig, TtsStore};
//!
//! let mut tts = TtsStore::new(Some(host), Some(Arc::new(MemoryStore::new())), TtsConfig::default());
//! tts.init().await;
//! tts.set_accent("en-GB");
//! tts.speak("Good morning, how can I help you?", Role::A, SpeakOptions::default());
//! ```
//!
//! The host speech engine (a browser's `speechSynthesis`, a system TTS daemon,
//! ...) is reached through the [`SpeechHost`] trait.

pub mod content;
pub mod queue;
pub mod tts;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A voice offered by the host speech engine.
///
/// Voices are owned by the host; this crate only refers to them by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voice {
    /// Unique voice identifier
    pub name: String,
    /// BCP-47-like language tag (e.g. `"en-US"`)
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    /// Whether the language tag starts with `prefix`.
    pub fn matches_lang(&self, prefix: &str) -> bool {
        self.lang.starts_with(prefix)
    }
}

/// Errors reported by a speech host.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Utterance was canceled")]
    Canceled,
    #[error("Utterance was interrupted by another utterance")]
    Interrupted,
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Operation not supported by this speech host")]
    Unsupported,
}

/// Lifecycle callback fired on utterance start or end.
pub type Callback = Box<dyn FnOnce() + Send>;

/// Lifecycle callback fired when an utterance fails.
pub type ErrorCallback = Box<dyn FnOnce(SpeechError) + Send>;

/// Listener invoked by the host whenever its voice list changes.
pub type VoicesChangedListener = Box<dyn FnMut() + Send>;

/// A single unit of requested speech.
///
/// Hosts report progress by calling [`Utterance::started`], [`Utterance::ended`]
/// or [`Utterance::failed`]; each callback fires at most once.
pub struct Utterance {
    pub text: String,
    /// Speech rate multiplier, always > 0
    pub rate: f32,
    /// Specific voice, or `None` to let the host choose one for `lang`
    pub voice: Option<Voice>,
    pub lang: String,
    pub on_start: Option<Callback>,
    pub on_end: Option<Callback>,
    pub on_error: Option<ErrorCallback>,
}

impl Utterance {
    pub fn started(&mut self) {
        if let Some(cb) = self.on_start.take() {
            cb();
        }
    }

    pub fn ended(&mut self) {
        if let Some(cb) = self.on_end.take() {
            cb();
        }
    }

    pub fn failed(&mut self, err: SpeechError) {
        if let Some(cb) = self.on_error.take() {
            cb(err);
        }
    }
}

impl fmt::Debug for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utterance")
            .field("text", &self.text)
            .field("rate", &self.rate)
            .field("voice", &self.voice)
            .field("lang", &self.lang)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Common interface for host text-to-speech capabilities.
///
/// The host owns a single speech channel shared by the whole process. Voice
/// lists may be empty until the host has finished loading them; hosts that can
/// notify about that should override [`SpeechHost::add_voices_changed`].
pub trait SpeechHost: Send + Sync {
    /// Currently known voices. May be empty while the host is still loading.
    fn get_voices(&self) -> Vec<Voice>;

    /// Register a listener for voice list changes.
    ///
    /// Returns [`SpeechError::Unsupported`] by default.
    fn add_voices_changed(&self, listener: VoicesChangedListener) -> Result<(), SpeechError> {
        drop(listener);
        Err(SpeechError::Unsupported)
    }

    /// Remove the listener registered with [`SpeechHost::add_voices_changed`].
    fn remove_voices_changed(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    /// Cancel every pending and active utterance.
    fn cancel(&self);

    /// Queue an utterance for playback.
    fn speak(&self, utterance: Utterance);
}
