//! Reading time estimation

use super::post::ContentBlock;

/// Average reading speed used for the estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Count whitespace-separated words; a missing value has none
fn count_words(text: Option<&str>) -> usize {
    text.map(|t| t.split_whitespace().count()).unwrap_or(0)
}

/// Total words across every heading and paragraph
pub fn word_count(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .map(|block| {
            count_words(block.heading.as_deref())
                + block
                    .body
                    .iter()
                    .map(|p| count_words(p.text.as_deref()))
                    .sum::<usize>()
        })
        .sum()
}

/// Estimated minutes to read a post body, rounded half away from zero
pub fn estimate_reading_time(content: &[ContentBlock]) -> u32 {
    let words = word_count(content);
    let minutes = (words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE;
    u32::try_from(minutes).unwrap_or(u32::MAX)
}
