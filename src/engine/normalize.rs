//! Arabic text normalization and collation shared by indexing, querying and sorting.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

const TATWEEL: char = '\u{0640}';

/// Combining marks removed before comparison: harakat, tanween, shadda,
/// sukun, hamza marks, superscript alef and the Quranic annotation signs.
fn is_arabic_mark(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E4}'
        | '\u{06E7}'..='\u{06E8}'
        | '\u{06EA}'..='\u{06ED}')
}

/// Normalize Arabic text for diacritic-insensitive comparison.
///
/// Applies canonical composition first (so decomposed hamza carriers fold
/// into their precomposed letters), then strips tatweel and diacritics and
/// collapses whitespace runs to a single space.
pub fn normalize_arabic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.nfc() {
        if c == TATWEEL || is_arabic_mark(c) {
            continue;
        }
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// Primary collation key: normalized text with letter variants folded
/// (hamza carriers to their base letter, taa marbuta to haa, alef maqsura to yaa).
pub fn collation_key(text: &str) -> String {
    normalize_arabic(text)
        .chars()
        .map(|c| match c {
            'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
            'ة' => 'ه',
            'ى' | 'ئ' => 'ي',
            'ؤ' => 'و',
            other => other,
        })
        .collect()
}

/// Arabic-aware string ordering. Falls back to code point order on the
/// raw strings so the result is total and deterministic.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
