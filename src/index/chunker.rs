//! Markdown cleaning and overlapping-window chunking
//!
//! Two passes turn a crawled Markdown document into embedding-sized chunks:
//!
//! 1. **Cleaning** strips Markdown structure (heading markers, bold/italic,
//!    inline code, list prefixes) and removes the front-matter metadata
//!    block delimited by the first pair of `---`-only lines, leaving plain
//!    text lines.
//! 2. **Windowing** grows a running window sentence by sentence up to
//!    `chunk_size` characters, emits it once full (if it reached
//!    `min_chunk_size`), and seeds the next window with the previous
//!    window's trailing `chunk_overlap` characters so a fact split across
//!    a boundary is still whole in at least one chunk.
//!
//! All sizes are `char` counts, so multi-byte text never splits mid-
//! character.

use crate::config::ChunkingConfig;
use crate::index::text::split_sentences;

/// Cleans Markdown content down to plain text lines
///
/// The metadata block — the lines between the first two `---`-only lines,
/// delimiters included — is removed. A lone `---` separator with no
/// closing delimiter is dropped by itself. Formatting markers are stripped
/// from every remaining line, and empty lines vanish.
pub fn clean_markdown(content: &str) -> String {
    let delimiter_count = content
        .lines()
        .filter(|line| line.trim() == "---")
        .count();
    let block_delimited = delimiter_count >= 2;

    let mut cleaned = Vec::new();
    let mut delimiters_seen = 0;
    let mut in_metadata = false;

    for line in content.lines() {
        if delimiters_seen < 2 && line.trim() == "---" {
            delimiters_seen += 1;
            in_metadata = block_delimited && delimiters_seen == 1;
            continue;
        }

        if in_metadata {
            continue;
        }

        let line = strip_heading_markers(line);
        let line = strip_paired_markers(&line, "**");
        let line = strip_paired_markers(&line, "*");
        let line = strip_paired_markers(&line, "`");
        let line = strip_list_prefix(&line);

        let line = line.trim();
        if !line.is_empty() {
            cleaned.push(line.to_string());
        }
    }

    cleaned.join("\n")
}

/// Removes leading `#` heading markers
fn strip_heading_markers(line: &str) -> String {
    if line.starts_with('#') {
        line.trim_start_matches('#').trim_start().to_string()
    } else {
        line.to_string()
    }
}

/// Removes paired formatting markers, keeping the enclosed text
fn strip_paired_markers(line: &str, marker: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find(marker) {
        let after_open = start + marker.len();
        match rest[after_open..].find(marker) {
            Some(close_rel) => {
                out.push_str(&rest[..start]);
                out.push_str(&rest[after_open..after_open + close_rel]);
                rest = &rest[after_open + close_rel + marker.len()..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Removes a leading list-item prefix (`- `, `* `, `+ `, or `N. `)
fn strip_list_prefix(line: &str) -> String {
    let trimmed = line.trim_start();

    if let Some(first) = trimmed.chars().next() {
        if matches!(first, '-' | '*' | '+') {
            return trimmed[first.len_utf8()..].trim_start().to_string();
        }
    }

    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(stripped) = rest.strip_prefix('.') {
            return stripped.trim_start().to_string();
        }
    }

    trimmed.to_string()
}

/// Lazy iterator over chunk windows
///
/// Produced by [`chunk_windows`]; yields each completed window as an owned
/// string. The sequence is finite and non-restartable.
pub struct ChunkWindows<I> {
    sentences: I,
    window: String,
    window_chars: usize,
    config: ChunkingConfig,
}

impl<I> Iterator for ChunkWindows<I>
where
    I: Iterator<Item = String>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let sentence = match self.sentences.next() {
                Some(s) => s,
                None => {
                    // Final window: emit once if large enough
                    if self.window_chars >= self.config.min_chunk_size {
                        let chunk = self.window.trim().to_string();
                        self.window.clear();
                        self.window_chars = 0;
                        return Some(chunk);
                    }
                    return None;
                }
            };

            let sentence_chars = sentence.chars().count();
            let candidate_chars = if self.window.is_empty() {
                sentence_chars
            } else {
                self.window_chars + 1 + sentence_chars
            };

            if candidate_chars <= self.config.chunk_size {
                if !self.window.is_empty() {
                    self.window.push(' ');
                }
                self.window.push_str(&sentence);
                self.window_chars = candidate_chars;
                continue;
            }

            let emit = if self.window_chars >= self.config.min_chunk_size {
                Some(self.window.trim().to_string())
            } else {
                None
            };

            // Seed the next window with trailing overlap from the previous one
            let overlap = tail_chars(&self.window, self.config.chunk_overlap).to_string();
            self.window.clear();
            if !overlap.is_empty() {
                self.window.push_str(&overlap);
                self.window.push(' ');
            }
            self.window.push_str(&sentence);
            self.window_chars = self.window.chars().count();

            if let Some(chunk) = emit {
                return Some(chunk);
            }
        }
    }
}

/// Builds the lazy chunk-window iterator over a sentence sequence
pub fn chunk_windows<I>(sentences: I, config: ChunkingConfig) -> ChunkWindows<I::IntoIter>
where
    I: IntoIterator<Item = String>,
{
    ChunkWindows {
        sentences: sentences.into_iter(),
        window: String::new(),
        window_chars: 0,
        config,
    }
}

/// Cleans a Markdown document and collects its chunk windows
pub fn chunk_text(content: &str, config: &ChunkingConfig) -> Vec<String> {
    let cleaned = clean_markdown(content);
    let sentences = split_sentences(&cleaned);
    chunk_windows(sentences, *config).collect()
}

/// Returns the trailing `n` characters of a string (the whole string if shorter)
fn tail_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }

    let skip = total - n;
    match s.char_indices().nth(skip) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
