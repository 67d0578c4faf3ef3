//! Segmenter — splits document text into overlapping fixed-size windows.
//!
//! Pure and deterministic: the same text and parameters always produce the
//! same segments, in left-to-right order, covering every character of the
//! input (the overlap region is duplicated, never skipped).

/// One contiguous window of the source text.
///
/// `start` is the character offset of the window within the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub text: String,
}

/// Splits `text` into windows of `size` characters, each overlapping its
/// predecessor by `overlap` characters.
///
/// - Empty text yields no segments.
/// - `size == 0` yields the whole text as a single segment.
/// - `overlap >= size` cannot stall the loop: when the computed next start
///   would not advance past the current one, the next window begins at the
///   current window's end instead (zero effective overlap for that step).
///
/// Sizes are in characters, not bytes, so multi-byte input never splits
/// inside a code point.
pub fn segment(text: &str, size: usize, overlap: usize) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }
    if size == 0 {
        return vec![Segment {
            start: 0,
            text: text.to_string(),
        }];
    }

    // Byte offset of every char boundary, so windows can be sliced without
    // landing inside a multi-byte sequence.
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let char_len = boundaries.len() - 1;

    let mut segments = Vec::new();
    let mut start = 0usize;

    while start < char_len {
        let end = (start + size).min(char_len);
        segments.push(Segment {
            start,
            text: text[boundaries[start]..boundaries[end]].to_string(),
        });
        if end >= char_len {
            break;
        }
        // Step back by the overlap, but never to (or before) the current
        // start — that would loop forever.
        start = if end.saturating_sub(overlap) > start {
            end - overlap
        } else {
            end
        };
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Rebuilds the original text from segments by skipping each segment's
    /// overlap with its predecessor.
    fn reconstruct(segments: &[Segment]) -> String {
        let mut out = String::new();
        let mut covered = 0usize;
        for seg in segments {
            let seg_chars: Vec<char> = seg.text.chars().collect();
            let skip = covered.saturating_sub(seg.start);
            out.extend(seg_chars[skip..].iter());
            covered = seg.start + seg_chars.len();
        }
        out
    }

    #[test]
    fn test_empty_text_yields_no_segments() {
        assert!(segment("", 100, 10).is_empty());
    }

    #[test]
    fn test_zero_size_returns_whole_text() {
        let segs = segment("hello world", 0, 0);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "hello world");
        assert_eq!(segs[0].start, 0);
    }

    #[test]
    fn test_short_text_single_segment() {
        let segs = segment("short", 100, 10);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "short");
    }

    #[test]
    fn test_windows_overlap_by_configured_amount() {
        let text = "abcdefghij"; // 10 chars
        let segs = segment(text, 4, 2);
        assert_eq!(segs[0].text, "abcd");
        assert_eq!(segs[1].start, 2);
        assert_eq!(segs[1].text, "cdef");
    }

    #[test]
    fn test_coverage_reconstructs_input_exactly() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(40);
        for (size, overlap) in [(50, 0), (50, 10), (64, 63), (7, 3)] {
            let segs = segment(&text, size, overlap);
            assert_eq!(reconstruct(&segs), text, "size={size} overlap={overlap}");
        }
    }

    #[test]
    fn test_overlap_equal_to_size_still_terminates() {
        let text = "x".repeat(100);
        let segs = segment(&text, 10, 10);
        // Falls back to advancing a full window per step.
        assert_eq!(segs.len(), 10);
        assert_eq!(reconstruct(&segs), text);
    }

    #[test]
    fn test_overlap_larger_than_size_still_terminates() {
        let text = "y".repeat(95);
        let segs = segment(&text, 10, 50);
        assert_eq!(segs.len(), 10);
        assert_eq!(reconstruct(&segs), text);
    }

    #[test]
    fn test_multibyte_text_never_splits_code_points() {
        let text = "héllo wörld ünïcodé tëxt".repeat(5);
        let segs = segment(&text, 7, 2);
        assert_eq!(reconstruct(&segs), text);
        for seg in &segs {
            assert!(seg.text.chars().count() <= 7);
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "determinism check ".repeat(30);
        assert_eq!(segment(&text, 40, 8), segment(&text, 40, 8));
    }
}
