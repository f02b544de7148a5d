//! Reading time estimate for article pages

use super::PostDetail;

/// Assumed reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// Count the words of an article.
///
/// Paragraphs of a section are joined without a separator before
/// splitting, so a word ending one paragraph and a word starting the next
/// count as one when there is no whitespace between them.
pub fn count_words(detail: &PostDetail) -> usize {
    detail
        .sections
        .iter()
        .map(|section| {
            let body: String = section.paragraphs.concat();
            section.heading.split_whitespace().count() + body.split_whitespace().count()
        })
        .sum()
}

/// Estimated minutes to read an article; never less than one
pub fn estimate_reading_minutes(detail: &PostDetail) -> u32 {
    (count_words(detail) / WORDS_PER_MINUTE + 1) as u32
}
