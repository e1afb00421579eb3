use crate::tts::Role;

use super::catalog::Dialogue;

/// One spoken line of a dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub text: String,
    pub role: Role,
}

/// The lines of a dialogue in playback order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueScript {
    pub lines: Vec<ScriptLine>,
}

impl DialogueScript {
    /// Build the script for `dialogue`.
    ///
    /// The title, when requested and present, is read by role A. Turns with an
    /// empty `en` are skipped. A turn's role comes from its `speaker` field
    /// (`"A"`/`"B"`); otherwise roles alternate by turn position.
    pub fn from_dialogue(dialogue: &Dialogue, speak_title_first: bool) -> Self {
        let mut lines = Vec::with_capacity(dialogue.turns.len() + 1);

        let title = dialogue.title.trim();
        if speak_title_first && !title.is_empty() {
            lines.push(ScriptLine {
                text: title.to_string(),
                role: Role::A,
            });
        }

        for (idx, turn) in dialogue.turns.iter().enumerate() {
            let text = turn.en.trim();
            if text.is_empty() {
                continue;
            }
            let role = turn
                .speaker
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(if idx % 2 == 0 { Role::A } else { Role::B });
            lines.push(ScriptLine {
                text: text.to_string(),
                role,
            });
        }

        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ScriptLine> {
        self.lines.get(idx)
    }
}
