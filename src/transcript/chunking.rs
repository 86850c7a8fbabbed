use log::debug;

use super::parser::Segment;

/// Split segments into groups for separate synthesis calls
///
/// Segments are packed greedily in order. A group is closed before adding a
/// segment that would push the running text length past `max_chars`. A segment
/// longer than the budget on its own is never split and ends up alone in its
/// group. Lengths are raw text characters, not markup characters, so the
/// markup built from a group can be larger than `max_chars`.
pub fn split_segments_for_chunks(segments: &[Segment], max_chars: usize) -> Vec<Vec<Segment>> {
    let mut chunks: Vec<Vec<Segment>> = Vec::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut current_len = 0;

    for segment in segments {
        let segment_len = segment.char_len();
        if !current.is_empty() && current_len + segment_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if segment_len > max_chars {
            debug!("Segment of {} ({} chars) exceeds the chunk budget", segment.speaker, segment_len);
        }

        current.push(segment.clone());
        current_len += segment_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
