//! Content module - display models, normalization and reading time

mod normalize;
mod post;
mod reading_time;

pub use normalize::{normalize_page, normalize_post, normalize_post_detail, parse_publication_date};
pub use post::{Page, Post, PostDetail, Section};
pub use reading_time::{count_words, estimate_reading_minutes, WORDS_PER_MINUTE};
