//! Voice-pair selection for the two dialogue roles.
//!
//! Selection walks [`TIERS`] top to bottom and takes the first tier that
//! produces a pair. A tier may pair a voice with itself; both roles then speak
//! with the same voice, which is preferred over leaving a role silent.

use std::collections::HashSet;

use crate::Voice;

/// Language prefix shared by every English voice.
pub const ENGLISH_PREFIX: &str = "en-";

/// Two voices, for roles A and B.
pub type VoicePair<'a> = (&'a Voice, &'a Voice);

/// A single candidate-selection strategy.
pub type Tier = for<'a> fn(&'a [Voice], &str) -> Option<VoicePair<'a>>;

/// Strategies in priority order.
pub const TIERS: &[Tier] = &[
    accent_pair,
    accent_with_english_partner,
    any_english,
    any_voice,
];

/// Pick voices for roles A and B given an accent prefix such as `"en-GB"`.
///
/// Returns `None` only when `voices` is empty.
pub fn pick_two_distinct<'a>(voices: &'a [Voice], accent_prefix: &str) -> Option<VoicePair<'a>> {
    TIERS.iter().find_map(|tier| tier(voices, accent_prefix))
}

/// Accent-matching voices, de-duplicated by name in first-seen order.
fn unique_accent_voices<'a>(voices: &'a [Voice], accent_prefix: &str) -> Vec<&'a Voice> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = Vec::new();
    for voice in voices.iter().filter(|v| v.matches_lang(accent_prefix)) {
        if seen.insert(voice.name.as_str()) {
            unique.push(voice);
        }
    }
    unique
}

/// Two distinct voices of the requested accent.
pub fn accent_pair<'a>(voices: &'a [Voice], accent_prefix: &str) -> Option<VoicePair<'a>> {
    match unique_accent_voices(voices, accent_prefix).as_slice() {
        [a, b, ..] => Some((*a, *b)),
        _ => None,
    }
}

/// The only accent voice, partnered with a differently named English voice
/// when there is one, otherwise with itself.
pub fn accent_with_english_partner<'a>(
    voices: &'a [Voice],
    accent_prefix: &str,
) -> Option<VoicePair<'a>> {
    let unique = unique_accent_voices(voices, accent_prefix);
    let &[only] = unique.as_slice() else {
        return None;
    };
    let partner = voices
        .iter()
        .find(|v| v.matches_lang(ENGLISH_PREFIX) && v.name != only.name)
        .unwrap_or(only);
    Some((only, partner))
}

/// First two English voices of any accent.
pub fn any_english<'a>(voices: &'a [Voice], _accent_prefix: &str) -> Option<VoicePair<'a>> {
    let english: Vec<&Voice> = voices
        .iter()
        .filter(|v| v.matches_lang(ENGLISH_PREFIX))
        .take(2)
        .collect();
    first_two_or_self(&english)
}

/// First two voices regardless of language.
pub fn any_voice<'a>(voices: &'a [Voice], _accent_prefix: &str) -> Option<VoicePair<'a>> {
    let all: Vec<&Voice> = voices.iter().take(2).collect();
    first_two_or_self(&all)
}

fn first_two_or_self<'a>(candidates: &[&'a Voice]) -> Option<VoicePair<'a>> {
    match candidates {
        [a, b, ..] => Some((*a, *b)),
        [only] => Some((*only, *only)),
        [] => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str, lang: &str) -> Voice {
        Voice::new(name, lang)
    }

    fn names(pair: Option<VoicePair<'_>>) -> Option<(&str, &str)> {
        pair.map(|(a, b)| (a.name.as_str(), b.name.as_str()))
    }

    #[test]
    fn two_accent_voices_are_distinct_and_match_accent() {
        let voices = vec![
            v("Alex", "en-US"),
            v("Daniel", "en-GB"),
            v("Samantha", "en-US"),
            v("Fred", "en-US"),
        ];
        let (a, b) = pick_two_distinct(&voices, "en-US").unwrap();
        assert_ne!(a.name, b.name);
        assert!(a.lang.starts_with("en-US") && b.lang.starts_with("en-US"));
        assert_eq!((a.name.as_str(), b.name.as_str()), ("Alex", "Samantha"));
    }

    #[test]
    fn duplicate_names_are_collapsed_within_accent() {
        let voices = vec![
            v("Alex", "en-US"),
            v("Alex", "en-US"),
            v("Samantha", "en-US"),
        ];
        assert_eq!(
            names(pick_two_distinct(&voices, "en-US")),
            Some(("Alex", "Samantha"))
        );
    }

    #[test]
    fn single_accent_voice_pairs_with_other_english_voice() {
        let voices = vec![v("A", "en-US"), v("B", "en-US"), v("C", "en-GB")];
        assert_eq!(names(pick_two_distinct(&voices, "en-GB")), Some(("C", "A")));
    }

    #[test]
    fn single_accent_voice_without_partner_pairs_with_itself() {
        let voices = vec![v("C", "en-GB"), v("Thomas", "fr-FR")];
        assert_eq!(names(pick_two_distinct(&voices, "en-GB")), Some(("C", "C")));
    }

    #[test]
    fn duplicated_single_accent_voice_still_pairs_with_itself() {
        let voices = vec![v("C", "en-GB"), v("C", "en-GB")];
        assert_eq!(names(pick_two_distinct(&voices, "en-GB")), Some(("C", "C")));
    }

    #[test]
    fn no_accent_voice_falls_back_to_any_english() {
        let voices = vec![v("Amelie", "fr-CA"), v("A", "en-US"), v("C", "en-GB")];
        assert_eq!(names(pick_two_distinct(&voices, "en-AU")), Some(("A", "C")));
    }

    #[test]
    fn single_english_voice_without_accent_match_pairs_with_itself() {
        let voices = vec![v("Amelie", "fr-CA"), v("A", "en-US")];
        assert_eq!(names(pick_two_distinct(&voices, "en-AU")), Some(("A", "A")));
    }

    #[test]
    fn no_english_falls_back_to_first_two_voices() {
        let voices = vec![v("Amelie", "fr-CA"), v("Anna", "de-DE"), v("Yuri", "ru-RU")];
        assert_eq!(
            names(pick_two_distinct(&voices, "en-US")),
            Some(("Amelie", "Anna"))
        );

        let one = vec![v("Anna", "de-DE")];
        assert_eq!(names(pick_two_distinct(&one, "en-US")), Some(("Anna", "Anna")));
    }

    #[test]
    fn empty_catalog_yields_none() {
        assert!(pick_two_distinct(&[], "en-US").is_none());
    }

    #[test]
    fn tiers_decline_outside_their_case() {
        let voices = vec![v("A", "en-US")];
        assert!(accent_pair(&voices, "en-US").is_none());
        assert!(accent_with_english_partner(&voices, "en-GB").is_none());
        assert!(any_english(&[v("Anna", "de-DE")], "en-US").is_none());
        assert!(any_voice(&[], "en-US").is_none());
    }
}
