use std::sync::mpsc;
use std::sync::Arc;

use dialogue_tts::{
    content::{Dialogue, DialogueScript},
    queue::{PlayQueue, PlayQueueItem, QueueOptions},
    tts::{FileStore, KeyValueStore, MemoryStore, SpeakOptions, TtsConfig, TtsStore},
    SpeechHost, Utterance, Voice,
};

/// Prints utterances instead of speaking them and finishes each one at once.
struct ConsoleHost;

impl SpeechHost for ConsoleHost {
    fn get_voices(&self) -> Vec<Voice> {
        vec![
            Voice::new("Daniel", "en-GB"),
            Voice::new("Alex", "en-US"),
            Voice::new("Samantha", "en-US"),
        ]
    }

    fn cancel(&self) {}

    fn speak(&self, mut utterance: Utterance) {
        utterance.started();
        let voice = utterance
            .voice
            .as_ref()
            .map(|v| v.name.as_str())
            .unwrap_or("<default>");
        println!("[{voice} @ {:.1}x] {}", utterance.rate, utterance.text);
        utterance.ended();
    }
}

const DIALOGUES: &[&str] = &[
    r#"{"id":"office-001","title":"Printer trouble","turns":[
        {"en":"The printer jammed again."},
        {"en":"Did you try the second tray?"}]}"#,
    r#"{"id":"office-002","title":"Lunch plans","turns":[
        {"en":"Are you free for lunch?","speaker":"B"},
        {"en":"Sure, around noon?","speaker":"A"}]}"#,
];

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let host: Arc<dyn SpeechHost> = Arc::new(ConsoleHost);
    let storage: Arc<dyn KeyValueStore> = match FileStore::in_data_dir() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            log::warn!("Settings will not persist: {e}");
            Arc::new(MemoryStore::new())
        }
    };
    let mut tts = TtsStore::new(Some(host), Some(storage), TtsConfig::default());
    tts.init().await;
    tts.set_accent("en-GB");
    tts.set_rate(0.9);
    println!(
        "Voices: A={} B={}",
        tts.settings().voice_a,
        tts.settings().voice_b
    );

    let dialogues = DIALOGUES
        .iter()
        .map(|raw| Dialogue::from_json(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut queue = PlayQueue::new();
    queue.set_queue(
        dialogues
            .iter()
            .map(|d| PlayQueueItem::new("office", &d.id, &d.title, format!("/{}.json", d.id)))
            .collect(),
        QueueOptions::default(),
    );

    let (done_tx, done_rx) = mpsc::channel();
    let mut item = queue.current().cloned();
    while let Some(current) = item {
        let dialogue = dialogues
            .iter()
            .find(|d| d.id == current.dialogue_id)
            .ok_or("dialogue missing from queue")?;
        let script = DialogueScript::from_dialogue(dialogue, queue.speak_title_first());
        for line in &script.lines {
            let tx = done_tx.clone();
            tts.speak(&line.text, line.role, SpeakOptions::default().on_end(move || {
                let _ = tx.send(());
            }));
            done_rx.recv()?;
        }
        item = queue.next().cloned();
    }

    Ok(())
}
