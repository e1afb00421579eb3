use std::time::Duration;

use tokio::sync::oneshot;

use crate::{SpeechHost, Voice};

/// How long to wait for the host's voices-changed notification.
pub const DEFAULT_VOICES_TIMEOUT: Duration = Duration::from_millis(1200);

/// Resolve the host voice list once.
///
/// Hosts commonly return an empty list until their voices have loaded. In that
/// case a voices-changed listener races against `timeout`; whichever fires
/// first wins and the list is queried again. The result may still be empty.
pub async fn get_voices_once(host: &dyn SpeechHost, timeout: Duration) -> Vec<Voice> {
    let voices = host.get_voices();
    if !voices.is_empty() {
        return voices;
    }

    let (tx, rx) = oneshot::channel::<()>();
    let mut tx = Some(tx);
    let listener = Box::new(move || {
        if let Some(tx) = tx.take() {
            let _ = tx.send(());
        }
    });
    if let Err(e) = host.add_voices_changed(listener) {
        log::debug!("voices-changed listener not registered ({e}), relying on timeout");
    }

    // Some hosts only start loading voices once they have been asked for them.
    let _ = host.get_voices();

    // A dropped sender (listener never registered) disables the first branch.
    tokio::select! {
        Ok(()) = rx => log::debug!("voices-changed notification received"),
        _ = tokio::time::sleep(timeout) => log::debug!("voice list wait timed out after {timeout:?}"),
    }

    if let Err(e) = host.remove_voices_changed() {
        log::debug!("voices-changed listener not removed: {e}");
    }

    let voices = host.get_voices();
    log::info!("Resolved {} voices", voices.len());
    voices
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tts::testing::FakeHost;

    fn catalog() -> Vec<Voice> {
        vec![Voice::new("Alex", "en-US"), Voice::new("Daniel", "en-GB")]
    }

    #[tokio::test]
    async fn returns_immediately_when_voices_are_loaded() {
        let host = FakeHost::with_voices(catalog());
        let voices = get_voices_once(&host, DEFAULT_VOICES_TIMEOUT).await;
        assert_eq!(voices, catalog());
        assert_eq!(host.listener_registrations(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn notification_wins_over_timeout() {
        let host = Arc::new(FakeHost::new());
        let loader = Arc::clone(&host);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            loader.load_voices(catalog());
        });

        let start = tokio::time::Instant::now();
        let voices = get_voices_once(host.as_ref(), DEFAULT_VOICES_TIMEOUT).await;
        assert_eq!(voices, catalog());
        assert!(start.elapsed() < DEFAULT_VOICES_TIMEOUT);
        assert_eq!(host.listener_registrations(), 1);
        assert!(!host.has_listener());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_resolves_with_empty_list() {
        let host = FakeHost::new();
        let start = tokio::time::Instant::now();
        let voices = get_voices_once(&host, DEFAULT_VOICES_TIMEOUT).await;
        assert!(voices.is_empty());
        assert!(start.elapsed() >= DEFAULT_VOICES_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_listener_falls_back_to_timeout() {
        let host = FakeHost::new().without_listener_support();
        let start = tokio::time::Instant::now();
        let voices = get_voices_once(&host, Duration::from_millis(50)).await;
        assert!(voices.is_empty());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn voices_loaded_without_notification_are_picked_up_after_timeout() {
        let host = Arc::new(FakeHost::new().without_listener_support());
        let loader = Arc::clone(&host);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.load_voices(catalog());
        });

        let voices = get_voices_once(host.as_ref(), Duration::from_millis(50)).await;
        assert_eq!(voices, catalog());
    }
}
