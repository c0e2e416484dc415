// WHY: standalone normalization so predicates compare lines in a canonical form
// Pasted Arabic text arrives with diacritics, bidi marks and mixed dash/comma variants

/// Normalize a line for classification: unify separators, collapse whitespace,
/// strip diacritics and invisible direction marks, trim.
pub fn normalize_line(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    normalize_line_into(text, &mut result);
    result
}

/// Normalize into supplied buffer to avoid allocation
pub fn normalize_line_into(text: &str, buffer: &mut String) {
    buffer.clear();
    buffer.reserve(text.len());

    let mut prev_was_space = false;

    for ch in text.chars() {
        match ch {
            '\u{064B}'..='\u{065F}' | '\u{0670}' => {
                // Tashkeel is dropped without touching the spacing state
            }
            '\u{200E}' | '\u{200F}' | '\u{FEFF}' => {}
            '-' | '\u{2013}' | '\u{2014}' => {
                buffer.push('-');
                prev_was_space = false;
            }
            '\u{060C}' | ',' => {
                buffer.push(',');
                prev_was_space = false;
            }
            _ if ch.is_whitespace() => {
                if !prev_was_space {
                    buffer.push(' ');
                    prev_was_space = true;
                }
            }
            _ => {
                buffer.push(ch);
                prev_was_space = false;
            }
        }
    }

    let trimmed = buffer.trim();
    if trimmed.len() != buffer.len() {
        let trimmed_content = trimmed.to_string();
        buffer.clear();
        buffer.push_str(&trimmed_content);
    }
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Length in characters, matching how the editor measures line length
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn has_sentence_punctuation(text: &str) -> bool {
    text.chars().any(|ch| matches!(ch, '.' | '!' | '?' | '\u{061F}'))
}

/// Text between a leading "(" and trailing ")", if the line is paren-shaped
pub fn text_inside_parens(text: &str) -> Option<&str> {
    text.trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
}
