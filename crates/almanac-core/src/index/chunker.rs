//! Text splitting for embedding
//!
//! Recursive character splitting: text is broken at paragraph breaks
//! first, then lines, then words, and only as a last resort mid-word,
//! before the pieces are packed into overlapping windows. Cut points
//! are byte-count based, not semantic.

use super::IndexedChunk;

/// Separators tried in order when a piece is still too large
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Split `text` into overlapping chunks of at most `chunk_size` bytes.
///
/// Every cut lands on a UTF-8 character boundary, preferring separator
/// boundaries when one is in reach. Consecutive chunks share up to
/// `overlap` bytes of trailing text.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<IndexedChunk> {
    debug_assert!(overlap < chunk_size);

    if text.len() <= chunk_size {
        return vec![IndexedChunk {
            text: text.to_string(),
            position: 0,
        }];
    }

    let mut pieces = Vec::new();
    collect_pieces(text, 0, 0, chunk_size, &mut pieces);
    pack(text, &pieces, chunk_size, overlap)
}

/// Break text into contiguous `(offset, len)` pieces no larger than
/// `max_len`, escalating from coarse separators to fine ones.
fn collect_pieces(
    text: &str,
    base: usize,
    level: usize,
    max_len: usize,
    out: &mut Vec<(usize, usize)>,
) {
    if text.len() <= max_len {
        if !text.is_empty() {
            out.push((base, text.len()));
        }
        return;
    }

    match SEPARATORS.get(level) {
        Some(sep) => {
            // split_inclusive keeps the separator attached to the piece
            // before it, so pieces tile the input exactly
            let mut offset = 0;
            for piece in text.split_inclusive(sep) {
                collect_pieces(piece, base + offset, level + 1, max_len, out);
                offset += piece.len();
            }
        }
        None => {
            // No separator left: cut fixed windows on char boundaries
            let mut start = 0;
            while start < text.len() {
                let mut end = (start + max_len).min(text.len());
                while end > start && !text.is_char_boundary(end) {
                    end -= 1;
                }
                if end == start {
                    // max_len is smaller than one character; take it whole
                    end = start + 1;
                    while end < text.len() && !text.is_char_boundary(end) {
                        end += 1;
                    }
                }
                out.push((base + start, end - start));
                start = end;
            }
        }
    }
}

/// Pack contiguous pieces into windows of at most `chunk_size` bytes,
/// restarting each new window up to `overlap` bytes before the cut.
fn pack(
    text: &str,
    pieces: &[(usize, usize)],
    chunk_size: usize,
    overlap: usize,
) -> Vec<IndexedChunk> {
    let mut chunks = Vec::new();
    let mut start = match pieces.first() {
        Some(&(offset, _)) => offset,
        None => return chunks,
    };
    let mut end = start;

    for &(offset, len) in pieces {
        let piece_end = offset + len;
        if piece_end - start > chunk_size && end > start {
            chunks.push(IndexedChunk {
                text: text[start..end].to_string(),
                position: start,
            });
            // Back up for overlap, but never so far that the window
            // holding the next piece would exceed chunk_size
            let overlap_start = end.saturating_sub(overlap);
            let fit_start = piece_end.saturating_sub(chunk_size);
            let mut next = overlap_start.max(fit_start).max(start);
            while !text.is_char_boundary(next) {
                next += 1;
            }
            start = next;
        }
        end = piece_end;
    }

    if end > start {
        chunks.push(IndexedChunk {
            text: text[start..end].to_string(),
            position: start,
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous_coverage(chunks: &[IndexedChunk], total_len: usize) {
        assert_eq!(chunks[0].position, 0);
        for pair in chunks.windows(2) {
            assert!(pair[1].position <= pair[0].position + pair[0].text.len());
        }
        let last = chunks.last().unwrap();
        assert_eq!(last.position + last.text.len(), total_len);
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("nothing to split here", 64, 16);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "nothing to split here");
        assert_eq!(chunks[0].position, 0);
    }

    #[test]
    fn windows_respect_the_size_limit() {
        let text = "The annual report lists revenue, costs and headcount. ".repeat(40);
        let chunks = split_text(&text, 200, 40);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 200, "oversized chunk: {}", chunk.text.len());
        }
        assert_contiguous_coverage(&chunks, text.len());
    }

    #[test]
    fn consecutive_windows_share_overlap() {
        let text = "alpha beta gamma delta ".repeat(50);
        let chunks = split_text(&text, 120, 30);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let shared = pair[0].position + pair[0].text.len() - pair[1].position;
            assert!(shared > 0, "no overlap between windows");
            assert_eq!(
                &text[pair[1].position..pair[1].position + shared],
                &pair[0].text[pair[0].text.len() - shared..]
            );
        }
    }

    #[test]
    fn paragraph_breaks_are_preferred_cut_points() {
        let text = format!("{}\n\n{}", "intro ".repeat(20), "body ".repeat(20));
        let chunks = split_text(&text, 130, 10);
        // the first window closes at the paragraph break, not mid-sentence
        assert!(chunks[0].text.ends_with("\n\n"));
    }

    #[test]
    fn unbroken_text_is_cut_at_char_boundaries() {
        // 600 bytes of two-byte chars with no separators anywhere
        let text = "ß".repeat(300);
        let chunks = split_text(&text, 64, 8);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.text.len() <= 64);
            assert!(chunk.text.chars().all(|c| c == 'ß'));
        }
        assert_contiguous_coverage(&chunks, text.len());
    }

    #[test]
    fn mixed_width_text_never_panics() {
        let text = "Schneefälle über München, 雪 ❄ überall\n\n".repeat(30);
        let chunks = split_text(&text, 90, 20);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(!chunk.text.is_empty());
            assert!(chunk.text.len() <= 90);
        }
    }
}
