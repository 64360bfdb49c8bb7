use once_cell::sync::Lazy;
use regex::Regex;

// @module: Display-sized chunking of caption text with proportional ratio math

/// Upper bound on characters per display chunk
pub const MAX_CHUNK_CHARS: usize = 100;

// @const: Missing-space repair between a sentence end and a capital letter
static MISSING_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])([A-Z])").unwrap());

/// Sentence-ending punctuation that is followed by a zero-width split
fn is_fullwidth_terminal(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

/// Characters that qualify as a natural break inside a long sentence
fn is_break_char(c: char) -> bool {
    c.is_whitespace() || matches!(c, '，' | '、' | '；' | '。' | '！' | '？')
}

/// Split one text block into display-sized chunks.
///
/// Sentences are cut first (whitespace after `.!?`, zero-width after
/// full-width terminals), then each sentence is recursively halved at the
/// break nearest its midpoint until every chunk fits `MAX_CHUNK_CHARS`.
/// Degenerate input that produces no chunks is returned whole.
pub fn chunks_of(text: &str) -> Vec<String> {
    let chunks: Vec<String> = split_sentences(text)
        .iter()
        .flat_map(|s| {
            let chars: Vec<char> = s.chars().collect();
            split_long(&chars)
        })
        .collect();

    if chunks.is_empty() {
        vec![text.to_string()]
    } else {
        chunks
    }
}

/// Compute cumulative character-ratio boundaries for a chunk list.
///
/// Returns `chunks.len() + 1` ascending floats spanning `[0, 1]`.
pub fn ratios_of(chunks: &[String]) -> Vec<f64> {
    let total: usize = chunks.iter().map(|c| c.chars().count()).sum();
    let total = total.max(1) as f64;

    let mut ratios = Vec::with_capacity(chunks.len() + 1);
    ratios.push(0.0);

    let mut acc = 0usize;
    for chunk in chunks {
        acc += chunk.chars().count();
        ratios.push(acc as f64 / total);
    }

    ratios
}

/// Return the chunk whose half-open ratio interval `[ratio[i], ratio[i+1])`
/// contains `r`. Values at or past the last boundary fall back to the last
/// chunk so floating error can never produce an empty result.
pub fn chunk_at<'a>(chunks: &'a [String], ratios: &[f64], r: f64) -> &'a str {
    for i in 0..chunks.len() {
        if r >= ratios[i] && r < ratios[i + 1] {
            return &chunks[i];
        }
    }
    chunks.last().map(String::as_str).unwrap_or("")
}

/// Cut text into sentences, repairing missing spacing first
fn split_sentences(text: &str) -> Vec<String> {
    let spaced = MISSING_SPACE_REGEX.replace_all(text, "${1} ${2}");

    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in spaced.chars() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            flush(&mut sentences, &mut current);
        } else {
            current.push(c);
            if is_fullwidth_terminal(c) {
                flush(&mut sentences, &mut current);
            }
        }
        prev = Some(c);
    }
    flush(&mut sentences, &mut current);

    sentences
}

fn flush(sentences: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}

/// Recursively split a sentence at the break nearest its midpoint.
///
/// The search alternates left/right with growing offset; when no break
/// exists anywhere, a hard cut at exactly `MAX_CHUNK_CHARS` guarantees
/// termination with every leaf at or under the threshold.
fn split_long(chars: &[char]) -> Vec<String> {
    if chars.len() <= MAX_CHUNK_CHARS {
        return vec![chars.iter().collect()];
    }

    let mid = chars.len() / 2;
    for d in 0..=mid {
        let candidates = [mid as isize - d as isize, (mid + d) as isize];
        for pos in candidates {
            if pos <= 0 || pos as usize >= chars.len() {
                continue;
            }
            let pos = pos as usize;
            if is_break_char(chars[pos]) {
                let left = trim_chars(&chars[..pos + 1]);
                let right = trim_chars(&chars[pos + 1..]);
                if !left.is_empty() && !right.is_empty() {
                    let mut result = split_long(left);
                    result.extend(split_long(right));
                    return result;
                }
            }
        }
    }

    // No natural break anywhere: hard cut at the threshold
    let mut result = split_long(&chars[..MAX_CHUNK_CHARS]);
    result.extend(split_long(&chars[MAX_CHUNK_CHARS..]));
    result
}

/// Strip leading and trailing whitespace from a char slice
fn trim_chars(chars: &[char]) -> &[char] {
    let start = chars
        .iter()
        .position(|c| !c.is_whitespace())
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map_or(start, |i| i + 1);
    &chars[start..end]
}
