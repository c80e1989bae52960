use crate::word::{ContentBounds, Word};

/// Words selected for one form on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct FormContent {
    pub words: Vec<Word>,
    pub full_text: String,
    pub word_count: usize,
}

/// Select the words whose top-left corner lies inside `bounds`.
///
/// Stream order is preserved and words are not clipped, so a word that
/// starts inside the region but runs past an edge is included whole.
pub fn assign_content(words: &[Word], bounds: &ContentBounds) -> FormContent {
    let words: Vec<Word> = words.iter().filter(|w| bounds.contains(w)).cloned().collect();
    let full_text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    FormContent {
        word_count: words.len(),
        words,
        full_text,
    }
}
