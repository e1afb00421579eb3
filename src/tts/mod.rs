//! Voice selection, persisted speech settings and the playback driver.
//!
//! # Components
//!
//! | Module | Role |
//! |---|---|
//! | [`settings`] | Settings blob and the key-value stores it persists to |
//! | [`voices`] | One-shot resolution of the host voice list |
//! | [`select`] | Tiered voice-pair selection for roles A and B |
//! | [`store`] | [`TtsStore`]: settings, catalog and `speak` |
//!
//! # Voice pairing
//!
//! For accent `en-GB` and the catalog `Alex (en-US)`, `Fred (en-US)`,
//! `Daniel (en-GB)`, only one British voice exists, so role B borrows the
//! first other English voice:
//!
//! ```rust
//! use dialogue_tts::{tts::pick_two_distinct, Voice};
//!
//! let voices = vec![
//!     Voice::new("Alex", "en-US"),
//!     Voice::new("Fred", "en-US"),
//!     Voice::new("Daniel", "en-GB"),
//! ];
//! let (a, b) = pick_two_distinct(&voices, "en-GB").unwrap();
//! assert_eq!((a.name.as_str(), b.name.as_str()), ("Daniel", "Alex"));
//! ```

pub mod select;
pub mod settings;
pub mod store;
pub mod voices;

#[cfg(test)]
pub(crate) mod testing;

pub use select::pick_two_distinct;
pub use settings::{FileStore, KeyValueStore, MemoryStore, StorageError, TtsSettings, ACCENTS};
pub use store::{Role, SpeakOptions, TtsConfig, TtsConfigBuilder, TtsStore};
pub use voices::get_voices_once;
