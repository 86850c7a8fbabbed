/*!
 * Speaker-segmented transcript handling.
 *
 * - `parser`: turns raw transcript text into ordered speaker segments
 * - `intro`: heuristic detection of an introductory block (reporting only)
 * - `chunking`: partitions segments into size-bounded groups for synthesis
 */

pub mod chunking;
pub mod intro;
pub mod parser;

pub use self::chunking::split_segments_for_chunks;
pub use self::intro::{detect_intro, IntroInfo};
pub use self::parser::{
    extract_speakers, parse_speaker_segments, render_transcript, summarize_speakers, Segment,
};
