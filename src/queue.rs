//! Play queue across dialogues.

use serde::{Deserialize, Serialize};

/// A dialogue reference placed in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayQueueItem {
    pub category_id: String,
    pub dialogue_id: String,
    pub title: String,
    /// Path of the dialogue document
    pub path: String,
}

impl PlayQueueItem {
    pub fn new(
        category_id: impl Into<String>,
        dialogue_id: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            category_id: category_id.into(),
            dialogue_id: dialogue_id.into(),
            title: title.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueOptions {
    /// Overrides [`PlayQueue::speak_title_first`] when set.
    pub speak_title_first: Option<bool>,
}

/// Ordered list of dialogues with a current position.
///
/// The position only moves forward and never passes the last item.
#[derive(Debug, Clone)]
pub struct PlayQueue {
    items: Vec<PlayQueueItem>,
    index: usize,
    speak_title_first: bool,
}

impl Default for PlayQueue {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: 0,
            speak_title_first: true,
        }
    }
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue and rewind to the first item.
    pub fn set_queue(&mut self, items: Vec<PlayQueueItem>, options: QueueOptions) {
        self.items = items;
        self.index = 0;
        if let Some(flag) = options.speak_title_first {
            self.speak_title_first = flag;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index = 0;
    }

    /// Advance to and return the next item, or `None` at the end.
    pub fn next(&mut self) -> Option<&PlayQueueItem> {
        if !self.has_next() {
            return None;
        }
        self.index += 1;
        self.items.get(self.index)
    }

    pub fn current(&self) -> Option<&PlayQueueItem> {
        self.items.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.items.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[PlayQueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn speak_title_first(&self) -> bool {
        self.speak_title_first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<PlayQueueItem> {
        ids.iter()
            .map(|id| {
                PlayQueueItem::new(
                    "daily-life",
                    *id,
                    format!("Dialogue {id}"),
                    format!("/content/conversation/daily-life/{id}.json"),
                )
            })
            .collect()
    }

    #[test]
    fn empty_queue_has_no_current() {
        let mut queue = PlayQueue::new();
        assert!(queue.current().is_none());
        assert!(!queue.has_next());
        assert!(queue.next().is_none());
        assert!(queue.speak_title_first());
    }

    #[test]
    fn set_queue_starts_at_first_item() {
        let mut queue = PlayQueue::new();
        queue.set_queue(items(&["1"]), QueueOptions::default());
        assert_eq!(queue.current().unwrap().dialogue_id, "1");
        assert!(!queue.has_next());

        queue.set_queue(items(&["1", "2"]), QueueOptions::default());
        assert_eq!(queue.current().unwrap().dialogue_id, "1");
        assert!(queue.has_next());
    }

    #[test]
    fn next_pins_at_last_item() {
        let mut queue = PlayQueue::new();
        queue.set_queue(items(&["1", "2", "3"]), QueueOptions::default());

        assert_eq!(queue.next().unwrap().dialogue_id, "2");
        assert_eq!(queue.current().unwrap().dialogue_id, "2");
        assert_eq!(queue.next().unwrap().dialogue_id, "3");
        assert!(queue.next().is_none());
        assert!(queue.next().is_none());
        assert_eq!(queue.current().unwrap().dialogue_id, "3");
        assert_eq!(queue.index(), 2);
    }

    #[test]
    fn set_queue_rewinds_and_overrides_title_flag() {
        let mut queue = PlayQueue::new();
        queue.set_queue(
            items(&["1", "2"]),
            QueueOptions {
                speak_title_first: Some(false),
            },
        );
        queue.next();
        assert_eq!(queue.index(), 1);

        queue.set_queue(items(&["7", "8"]), QueueOptions::default());
        assert_eq!(queue.index(), 0);
        assert_eq!(queue.current().unwrap().dialogue_id, "7");
        assert!(!queue.speak_title_first());
    }

    #[test]
    fn clear_empties_and_rewinds() {
        let mut queue = PlayQueue::new();
        queue.set_queue(items(&["1", "2"]), QueueOptions::default());
        queue.next();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.index(), 0);
        assert!(queue.current().is_none());
    }

    #[test]
    fn items_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(&items(&["1"])[0]).unwrap();
        assert_eq!(json["categoryId"], "daily-life");
        assert_eq!(json["dialogueId"], "1");
    }
}
