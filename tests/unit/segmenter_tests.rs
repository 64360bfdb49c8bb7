/*!
 * Tests for display-sized chunking and ratio math
 */

use subsync::segmenter::{chunk_at, chunks_of, ratios_of, MAX_CHUNK_CHARS};

/// Short text with no sentence boundary passes through untouched
#[test]
fn test_chunksOf_withShortText_shouldBeIdempotent() {
    let text = "Just a short line with no break";
    assert_eq!(chunks_of(text), vec![text.to_string()]);
}

#[test]
fn test_chunksOf_withTwoSentences_shouldSplitAtSentenceBoundary() {
    assert_eq!(chunks_of("A. B."), vec!["A.".to_string(), "B.".to_string()]);
}

#[test]
fn test_chunksOf_withMissingSpacing_shouldRepairBeforeSplitting() {
    // No space between the period and the capital letter
    assert_eq!(
        chunks_of("Hello.World is big."),
        vec!["Hello.".to_string(), "World is big.".to_string()]
    );
}

#[test]
fn test_chunksOf_withFullwidthTerminals_shouldSplitZeroWidth() {
    assert_eq!(
        chunks_of("你好。再见！真的？"),
        vec!["你好。".to_string(), "再见！".to_string(), "真的？".to_string()]
    );
}

#[test]
fn test_chunksOf_withQuestionAndExclamation_shouldSplitAfterWhitespace() {
    assert_eq!(
        chunks_of("Really? Yes! Fine."),
        vec!["Really?".to_string(), "Yes!".to_string(), "Fine.".to_string()]
    );
}

/// 200 characters without any break anywhere: exactly two hard cuts at the
/// threshold
#[test]
fn test_chunksOf_withNoBreaksAt200Chars_shouldHardCutIntoTwo() {
    let text = "x".repeat(200);
    let chunks = chunks_of(&text);

    assert_eq!(chunks.len(), 2);
    assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
    assert_eq!(chunks[0].chars().count(), 100);
    assert_eq!(chunks[1].chars().count(), 100);
}

/// 200 characters with one space near the midpoint: the cut lands there
#[test]
fn test_chunksOf_withSingleSpaceNearMidpoint_shouldCutAtTheSpace() {
    let text = format!("{} {}", "a".repeat(99), "b".repeat(100));
    let chunks = chunks_of(&text);

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], "a".repeat(99));
    assert_eq!(chunks[1], "b".repeat(100));
}

#[test]
fn test_chunksOf_withCjkPunctuationInLongRun_shouldCutAtThePunctuation() {
    // The comma sits exactly at the midpoint of a 121-char run
    let text = format!("{}，{}", "甲".repeat(60), "乙".repeat(60));
    let chunks = chunks_of(&text);

    assert_eq!(chunks.len(), 2);
    // The break char stays on the left half, like a trailing comma should
    assert_eq!(chunks[0], format!("{}，", "甲".repeat(60)));
    assert_eq!(chunks[1], "乙".repeat(60));
}

#[test]
fn test_chunksOf_withWhitespaceOnlyInput_shouldReturnInputWhole() {
    // Degenerate input never yields an empty chunk list
    let text = "   ";
    assert_eq!(chunks_of(text), vec![text.to_string()]);
}

#[test]
fn test_ratiosOf_withEqualChunks_shouldSpanZeroToOne() {
    let chunks = vec!["ab".to_string(), "ab".to_string()];
    let ratios = ratios_of(&chunks);

    assert_eq!(ratios, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_ratiosOf_shouldBeNonDecreasingAndCountChars() {
    let chunks = vec!["a".to_string(), "bcd".to_string(), "ef".to_string()];
    let ratios = ratios_of(&chunks);

    assert_eq!(ratios.len(), chunks.len() + 1);
    assert_eq!(ratios[0], 0.0);
    assert_eq!(*ratios.last().unwrap(), 1.0);
    assert!(ratios.windows(2).all(|w| w[0] <= w[1]));
    assert!((ratios[1] - 1.0 / 6.0).abs() < 1e-12);
    assert!((ratios[2] - 4.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_ratiosOf_withMultibyteChars_shouldCountCharsNotBytes() {
    let chunks = vec!["你好".to_string(), "ab".to_string()];
    let ratios = ratios_of(&chunks);

    assert_eq!(ratios, vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_chunkAt_withInteriorRatio_shouldUseHalfOpenIntervals() {
    let chunks = vec!["a".to_string(), "b".to_string()];
    let ratios = ratios_of(&chunks);

    assert_eq!(chunk_at(&chunks, &ratios, 0.0), "a");
    assert_eq!(chunk_at(&chunks, &ratios, 0.49), "a");
    // Exactly on the shared boundary belongs to the later chunk
    assert_eq!(chunk_at(&chunks, &ratios, 0.5), "b");
}

#[test]
fn test_chunkAt_atOrPastOne_shouldFallBackToLastChunk() {
    let chunks = vec!["a".to_string(), "b".to_string()];
    let ratios = ratios_of(&chunks);

    assert_eq!(chunk_at(&chunks, &ratios, 1.0), "b");
    assert_eq!(chunk_at(&chunks, &ratios, 1.0 + 1e-9), "b");
}
