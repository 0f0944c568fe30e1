//! Sentence and word tokenization
//!
//! The minimal tokenizer contract the chunker depends on: an ordered
//! sequence of sentences, and a word count per chunk. Sentences end at
//! `.`, `!`, or `?` followed by whitespace, or at a line break.

/// Splits text into sentences
///
/// Sentence boundaries are sentence-final punctuation followed by
/// whitespace (or end of input) and newlines. Returned sentences are
/// trimmed and never empty.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut current, &mut sentences);
            continue;
        }

        current.push(c);

        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                Some(next) if next.is_whitespace() => flush(&mut current, &mut sentences),
                None => flush(&mut current, &mut sentences),
                _ => {}
            }
        }
    }

    flush(&mut current, &mut sentences);
    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

/// Counts word tokens in a text (whitespace-separated)
pub fn count_tokens(text: &str) -> usize {
    text.split_whitespace().count()
}
