//! The normalization pipeline.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use watchlist_core::{Entity, IndexedEntity};

use crate::debug::{NopObserver, Stage, StageObserver};
use crate::tables;

/// Normalizes names and entities into canonical comparison form.
///
/// Stateless and cheap; construct once and share freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct Preparer;

impl Preparer {
    pub fn new() -> Self {
        Preparer
    }

    /// Normalize one name through all stages.
    pub fn prepare_name(&self, name: &str) -> String {
        self.prepare_name_with(name, &NopObserver)
    }

    /// Normalize one name, reporting each stage's output to `observer`.
    pub fn prepare_name_with(&self, name: &str, observer: &dyn StageObserver) -> String {
        let lowered = name.to_lowercase();
        observer.observe(Stage::Lowercase, &lowered);

        let folded = transliterate(&lowered);
        observer.observe(Stage::Transliterate, &folded);

        let collapsed = collapse_whitespace(&folded);
        observer.observe(Stage::Whitespace, &collapsed);

        let filtered = remove_stop_words(&collapsed);
        observer.observe(Stage::StopWords, &filtered);

        let stripped = strip_punctuation(&filtered);
        observer.observe(Stage::Punctuation, &stripped);

        let expanded = expand_abbreviations(&stripped);
        observer.observe(Stage::Abbreviations, &expanded);

        expanded
    }

    /// Annotate an entity with canonical forms for its primary and
    /// alternate names.
    ///
    /// Returns `None` when the primary name normalizes to empty; such
    /// records are dropped by ingest. Alternate names that normalize to
    /// empty are silently skipped.
    pub fn prepare_entity(&self, entity: Entity) -> Option<IndexedEntity> {
        let canonical_name = self.prepare_name(&entity.name);
        if canonical_name.is_empty() {
            return None;
        }

        let canonical_alt_names = entity
            .alt_names
            .iter()
            .map(|alt| self.prepare_name(alt))
            .filter(|alt| !alt.is_empty())
            .collect();

        Some(IndexedEntity {
            entity,
            canonical_name,
            canonical_alt_names,
        })
    }
}

/// NFKD-decompose, drop combining marks, and fold the handful of letters
/// decomposition leaves outside ASCII.
fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        match tables::ascii_fold(c) {
            Some(folded) => out.push_str(folded),
            None => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove corporate stop-words as whole tokens. Tokens are compared with
/// surrounding punctuation trimmed so the pass is stable whether or not
/// punctuation stripping has already run.
fn remove_stop_words(input: &str) -> String {
    input
        .split(' ')
        .filter(|token| {
            let bare = token.trim_matches(|c: char| !c.is_alphanumeric());
            !tables::is_stop_word(bare)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop everything except letters, digits, and spaces, then re-collapse.
fn strip_punctuation(input: &str) -> String {
    let kept: String = input
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();
    collapse_whitespace(&kept)
}

fn expand_abbreviations(input: &str) -> String {
    input
        .split(' ')
        .map(|token| tables::expand_abbreviation(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::RecordingObserver;
    use watchlist_core::{EntityType, SourceList};

    fn prepare(name: &str) -> String {
        Preparer::new().prepare_name(name)
    }

    #[test]
    fn test_lowercase_and_whitespace() {
        assert_eq!(prepare("  AK  TRANSNEFT   OAO "), "ak transneft oao");
    }

    #[test]
    fn test_diacritics_stripped() {
        assert_eq!(prepare("Société Générale"), "societe generale");
        assert_eq!(prepare("Łukasz Bražinskas"), "lukasz brazinskas");
        assert_eq!(prepare("Müller Straße"), "muller strasse");
    }

    #[test]
    fn test_stop_words_whole_tokens_only() {
        assert_eq!(prepare("Apple, Inc."), "apple");
        assert_eq!(prepare("Gazprom OAO Ltd"), "gazprom oao");
        // "inc" inside a word is kept
        assert_eq!(prepare("Innsbruck Incline"), "innsbruck incline");
    }

    #[test]
    fn test_punctuation_keeps_digits() {
        assert_eq!(prepare("O'Neill & Sons #42"), "o neill sons 42");
    }

    #[test]
    fn test_abbreviation_expansion() {
        assert_eq!(prepare("St. Petersburg Shipping"), "saint petersburg shipping");
        assert_eq!(prepare("Mt Ararat Trading"), "mount ararat trading");
    }

    #[test]
    fn test_idempotent() {
        for name in [
            "AK TRANSNEFT OAO",
            "Société Générale S.A.",
            "St. Petersburg Shipping, Ltd.",
            "O'Neill & Sons #42",
            "The Co",
        ] {
            let once = prepare(name);
            assert_eq!(prepare(&once), once, "prepare not idempotent for {name:?}");
        }
    }

    #[test]
    fn test_empty_output_is_legal() {
        assert_eq!(prepare("The Co."), "");
        assert_eq!(prepare("!!!"), "");
    }

    #[test]
    fn test_observer_sees_all_stages() {
        let observer = RecordingObserver::new();
        let out = Preparer::new().prepare_name_with("Apple, Inc.", &observer);
        assert_eq!(out, "apple");

        let stages = observer.stages();
        assert_eq!(stages.len(), 6);
        assert_eq!(stages[0], (Stage::Lowercase, "apple, inc.".to_string()));
        assert_eq!(stages[3], (Stage::StopWords, "apple,".to_string()));
        assert_eq!(stages.last().unwrap().1, "apple");
    }

    #[test]
    fn test_prepare_entity() {
        let preparer = Preparer::new();
        let entity = Entity::new(
            EntityType::Business,
            "AK TRANSNEFT OAO",
            SourceList::UsOfacSsi,
            "17254",
        )
        .with_alt_names(vec!["OAO AK TRANSNEFT".into(), "The Co".into()]);

        let indexed = preparer.prepare_entity(entity).unwrap();
        assert_eq!(indexed.canonical_name, "ak transneft oao");
        // alt that normalized to empty was dropped
        assert_eq!(indexed.canonical_alt_names, vec!["oao ak transneft"]);
        // original strings preserved for display
        assert_eq!(indexed.entity.name, "AK TRANSNEFT OAO");
    }

    #[test]
    fn test_prepare_entity_empty_name() {
        let preparer = Preparer::new();
        let entity = Entity::new(EntityType::Business, "The Co.", SourceList::UsOfacSdn, "1");
        assert!(preparer.prepare_entity(entity).is_none());
    }
}
