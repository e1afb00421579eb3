//! Recording speech host shared by the tts tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::{SpeechError, SpeechHost, Utterance, Voice, VoicesChangedListener};

#[derive(Default)]
pub struct FakeHost {
    voices: Mutex<Vec<Voice>>,
    listener: Mutex<Option<VoicesChangedListener>>,
    registrations: AtomicUsize,
    no_listener_support: bool,
    /// "cancel" and "speak:<text>" in call order
    calls: Mutex<Vec<String>>,
    utterances: Mutex<Vec<Utterance>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        let host = Self::new();
        *host.voices.lock().unwrap() = voices;
        host
    }

    pub fn without_listener_support(mut self) -> Self {
        self.no_listener_support = true;
        self
    }

    /// Replace the voice list and notify the registered listener, if any.
    pub fn load_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
        if let Some(listener) = self.listener.lock().unwrap().as_mut() {
            listener();
        }
    }

    pub fn listener_registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }

    pub fn has_listener(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take_utterances(&self) -> Vec<Utterance> {
        std::mem::take(&mut *self.utterances.lock().unwrap())
    }
}

impl SpeechHost for FakeHost {
    fn get_voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    fn add_voices_changed(&self, listener: VoicesChangedListener) -> Result<(), SpeechError> {
        if self.no_listener_support {
            return Err(SpeechError::Unsupported);
        }
        self.registrations.fetch_add(1, Ordering::SeqCst);
        *self.listener.lock().unwrap() = Some(listener);
        Ok(())
    }

    fn remove_voices_changed(&self) -> Result<(), SpeechError> {
        if self.no_listener_support {
            return Err(SpeechError::Unsupported);
        }
        *self.listener.lock().unwrap() = None;
        Ok(())
    }

    fn cancel(&self) {
        self.calls.lock().unwrap().push("cancel".to_string());
    }

    fn speak(&self, utterance: Utterance) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("speak:{}", utterance.text));
        self.utterances.lock().unwrap().push(utterance);
    }
}
