use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Normalize decoded string operands before they are split into glyphs.
///
/// Applies NFC normalization, expands the Latin ligatures and drops the
/// Unicode replacement character. Whitespace is left untouched since word
/// splitting depends on it.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == ch) {
            Some((_, expanded)) => out.push_str(expanded),
            None if ch == '\u{FFFD}' => {}
            None => out.push(ch),
        }
    }
    out
}
