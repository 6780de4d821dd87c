//! Fixed tables used by the normalization pipeline.

/// Corporate and legal-form tokens removed during normalization.
///
/// Matched as whole tokens only, after surrounding punctuation is trimmed,
/// so `"Inc."` and `"inc"` are both removed but `"Innsbruck"` is not.
pub const STOP_WORDS: &[&str] = &[
    "ag",
    "co",
    "corp",
    "corporation",
    "gmbh",
    "inc",
    "incorporated",
    "limited",
    "llc",
    "llp",
    "lp",
    "ltd",
    "plc",
    "sa",
    "sarl",
    "the",
];

/// Abbreviations expanded after punctuation stripping.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("govt", "government"),
    ("intl", "international"),
    ("mt", "mount"),
    ("st", "saint"),
];

/// ASCII folds for letters NFKD decomposition leaves untouched.
/// Sorted by code point for binary search.
pub const ASCII_FOLDS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('æ', "ae"),
    ('ø', "o"),
    ('þ', "th"),
    ('đ', "d"),
    ('ħ', "h"),
    ('ł', "l"),
    ('œ', "oe"),
    ('ŧ', "t"),
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

pub fn expand_abbreviation(token: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .binary_search_by_key(&token, |&(abbr, _)| abbr)
        .ok()
        .map(|i| ABBREVIATIONS[i].1)
}

pub fn ascii_fold(c: char) -> Option<&'static str> {
    ASCII_FOLDS
        .binary_search_by_key(&c, |&(ch, _)| ch)
        .ok()
        .map(|i| ASCII_FOLDS[i].1)
}
